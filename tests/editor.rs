//! Tests for the command-driven editor.
mod common;
use common::*;
use routeflow::error::EditorError;
use routeflow::layout::PlacementStrategy;
use routeflow::prelude::*;
use tokio_test::block_on;

fn added(outcome: CommandOutcome) -> NodeId {
    match outcome {
        CommandOutcome::NodeAdded { id, .. } => id,
        other => panic!("expected a new node, got {:?}", other),
    }
}

fn add_to(editor: &mut Editor, definition: &str, source: NodeId, branch: Branch) -> CommandOutcome {
    editor.apply(EditorCommand::AddConnectedNode {
        definition: definition.to_string(),
        source,
        branch,
    })
}

/// Builds `AMOUNT > 100 ? STRIPE : ADYEN` through editor commands.
fn amount_editor() -> (Editor, NodeId) {
    let mut editor = Editor::default();
    let start = start_id(editor.graph());
    let condition = added(add_to(&mut editor, "amount", start, Branch::Unlabeled));
    editor.apply(EditorCommand::UpdateCondition {
        id: condition,
        operator: Some(">".to_string()),
        value: Some("100".to_string()),
    });
    added(add_to(&mut editor, "provider-stripe", condition, Branch::True));
    added(add_to(&mut editor, "provider-adyen", condition, Branch::False));
    (editor, condition)
}

#[test]
fn test_new_editor_has_labeled_start() {
    let editor = Editor::default();
    let start = editor.graph().start().unwrap();
    assert_eq!(start.position, Position::new(150.0, 100.0));
    assert_eq!(start.fields.label, "Transaction start");
    assert_eq!(editor.merchant(), None);
}

#[test]
fn test_commands_build_exportable_flow() {
    let (editor, _) = amount_editor();
    assert_eq!(editor.export().unwrap(), amount_flow());
    assert_tree(editor.graph());
}

#[test]
fn test_add_connected_node_uses_placer() {
    let mut editor = Editor::default();
    let start = start_id(editor.graph());
    match add_to(&mut editor, "amount", start, Branch::Unlabeled) {
        CommandOutcome::NodeAdded {
            id,
            placement: Some(placement),
            edge: Some(_),
        } => {
            assert_eq!(placement.strategy, PlacementStrategy::Candidate(0));
            assert_eq!(placement.position, Position::new(500.0, 100.0));
            assert_eq!(editor.graph().node(id).unwrap().fields.label, "Amount");
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_add_to_occupied_slot_is_rejected() {
    let (mut editor, condition) = amount_editor();
    let before = editor.graph().len();

    let outcome = add_to(&mut editor, "provider-cielo", condition, Branch::True);
    assert_eq!(
        outcome,
        CommandOutcome::Rejected(EditorError::SlotOccupied {
            node: condition,
            branch: Branch::True
        })
    );
    assert_eq!(editor.graph().len(), before);
}

#[test]
fn test_add_below_provider_rolls_back() {
    let (mut editor, condition) = amount_editor();
    let stripe = editor.graph().slot(condition, Branch::True).unwrap().target;
    let before = editor.graph().len();

    let outcome = add_to(&mut editor, "provider-cielo", stripe, Branch::True);
    assert!(matches!(
        outcome,
        CommandOutcome::Rejected(EditorError::InvalidConnection { .. })
    ));
    assert_eq!(editor.graph().len(), before);
    assert_tree(editor.graph());
}

#[test]
fn test_unknown_definition_is_rejected() {
    let mut editor = Editor::default();
    let outcome = editor.apply(EditorCommand::AddNode {
        definition: "loyalty".to_string(),
        position: Position::default(),
    });
    assert_eq!(
        outcome,
        CommandOutcome::Rejected(EditorError::UnknownDefinition("loyalty".to_string()))
    );
}

#[test]
fn test_add_node_then_connect() {
    let mut editor = Editor::default();
    let start = start_id(editor.graph());
    let provider = added(editor.apply(EditorCommand::AddNode {
        definition: "provider-rede".to_string(),
        position: Position::new(400.0, 100.0),
    }));
    assert_eq!(editor.graph().node(provider).unwrap().position, Position::new(400.0, 100.0));

    let outcome = editor.apply(EditorCommand::Connect {
        source: start,
        target: provider,
        branch: Branch::Unlabeled,
    });
    assert!(matches!(outcome, CommandOutcome::Connected(_)));
    assert_eq!(editor.export().unwrap(), vec![FlowItem::provider("REDE")]);
}

#[test]
fn test_update_condition_requires_condition() {
    let (mut editor, condition) = amount_editor();
    let stripe = editor.graph().slot(condition, Branch::True).unwrap().target;

    let outcome = editor.apply(EditorCommand::UpdateCondition {
        id: stripe,
        operator: Some("<".to_string()),
        value: None,
    });
    assert_eq!(outcome, CommandOutcome::Rejected(EditorError::NotACondition(stripe)));

    // Only the provided fields change
    editor.apply(EditorCommand::UpdateCondition {
        id: condition,
        operator: None,
        value: Some("250".to_string()),
    });
    let fields = &editor.graph().node(condition).unwrap().fields;
    assert_eq!(fields.operator.as_deref(), Some(">"));
    assert_eq!(fields.value.as_deref(), Some("250"));
}

#[test]
fn test_delete_commands() {
    let (mut editor, condition) = amount_editor();
    let start = start_id(editor.graph());

    let outcome = editor.apply(EditorCommand::DeleteNode(start));
    assert_eq!(
        outcome,
        CommandOutcome::Rejected(EditorError::Graph(GraphError::CannotDeleteStart(start)))
    );

    match editor.apply(EditorCommand::DeleteNode(condition)) {
        CommandOutcome::Removed(removed) => assert_eq!(removed.nodes.len(), 3),
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(editor.graph().len(), 1);

    let missing = EdgeId(999);
    assert_eq!(
        editor.apply(EditorCommand::DeleteEdge(missing)),
        CommandOutcome::Rejected(EditorError::EdgeNotFound(missing))
    );
}

#[test]
fn test_load_and_layout_commands() {
    let mut editor = Editor::default();
    let summary = WorkflowSummary {
        name: "shop".to_string(),
        description: None,
        merchant_code: Some("M7".to_string()),
        flow: false_chain_flow(),
    };

    assert_eq!(editor.apply(EditorCommand::Load(summary)), CommandOutcome::Loaded { dropped: 0 });
    assert_eq!(editor.merchant(), Some("M7"));
    assert_eq!(editor.graph().len(), 8);
    assert_eq!(editor.export().unwrap(), false_chain_flow());

    match editor.apply(EditorCommand::AutoLayout) {
        CommandOutcome::LaidOut(outcome) => {
            assert_eq!(outcome.positions.len(), 8);
            assert!(outcome.unreachable.is_empty());
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    assert_eq!(editor.apply(EditorCommand::Clear), CommandOutcome::Cleared);
    assert_eq!(editor.graph().len(), 1);
    assert_eq!(editor.merchant(), None);
    assert_eq!(editor.graph().start().unwrap().position, Position::new(150.0, 100.0));
}

#[test]
fn test_workflow_request_is_btree() {
    let (editor, _) = amount_editor();
    let request = editor.workflow_request("shop", Some("default routing")).unwrap();
    assert_eq!(request.decision_type, routeflow::flow::DecisionType::Btree);
    assert_eq!(request.flow, amount_flow());
    assert_eq!(request.description.as_deref(), Some("default routing"));
}

#[test]
fn test_save_open_and_test_run() {
    let engine = InMemoryDecisionEngine::new();
    let (editor, _) = amount_editor();
    assert!(block_on(editor.save(&engine, "shop", None)).success);

    let mut other = Editor::default();
    let refused = block_on(other.test_run(&engine, "150", "VISA", "1"));
    assert!(!refused.success);

    let opened = block_on(other.open(&engine, "M1"));
    assert_eq!(opened.data, Some(0));
    assert_eq!(other.merchant(), Some("M1"));
    assert_eq!(other.export().unwrap(), amount_flow());

    let run = block_on(other.test_run(&engine, "150", "VISA", "1"));
    assert_eq!(run.data, Some(vec!["STRIPE".to_string()]));

    let missing = block_on(other.open(&engine, "M404"));
    assert!(!missing.success);
    assert_eq!(other.merchant(), Some("M1"));
}
