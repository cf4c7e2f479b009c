//! Tests for the conversion between flow documents and graphs.
mod common;
use common::*;
use routeflow::config::LoaderLayout;
use routeflow::flow::{parse_document, render_document};
use routeflow::graph::GraphSnapshot;
use routeflow::layout::Lane;
use routeflow::prelude::*;
use routeflow::transform::serialize;

#[test]
fn test_amount_flow_round_trips_unchanged() {
    let flow = amount_flow();
    let loaded = load(&flow);

    assert_eq!(loaded.dropped, 0);
    assert_eq!(loaded.graph.len(), 4);
    assert_eq!(serialize(&loaded.graph).unwrap(), flow);
}

#[test]
fn test_wire_json_round_trips_unchanged() {
    let flow = parse_document(AMOUNT_FLOW_JSON).unwrap();
    assert_eq!(flow, amount_flow());

    let exported = serialize(&load(&flow).graph).unwrap();
    let rendered: serde_json::Value = serde_json::from_str(&render_document(&exported).unwrap()).unwrap();
    let original: serde_json::Value = serde_json::from_str(AMOUNT_FLOW_JSON).unwrap();
    assert_eq!(rendered, original);
}

#[test]
fn test_false_chain_round_trips_unchanged() {
    let flow = false_chain_flow();
    assert_eq!(serialize(&load(&flow).graph).unwrap(), flow);
}

#[test]
fn test_loader_positions_follow_lane_grid() {
    let loaded = load(&amount_flow());
    let graph = &loaded.graph;
    let position = |key: &str| graph.node(find(graph, key)).unwrap().position;

    assert_eq!(graph.start().unwrap().position, Position::new(150.0, 300.0));
    assert_eq!(position("100"), Position::new(500.0, 300.0));
    assert_eq!(position("STRIPE"), Position::new(850.0, 300.0));
    assert_eq!(position("ADYEN"), Position::new(850.0, 500.0));
}

#[test]
fn test_loader_edges_carry_branches() {
    let loaded = load(&amount_flow());
    let graph = &loaded.graph;
    let condition = find(graph, "100");

    let from_start: Vec<_> = graph.outgoing(start_id(graph)).collect();
    assert_eq!(from_start.len(), 1);
    assert_eq!(from_start[0].branch, Branch::Unlabeled);
    assert_eq!(graph.slot(condition, Branch::True).unwrap().target, find(graph, "STRIPE"));
    assert_eq!(graph.slot(condition, Branch::False).unwrap().target, find(graph, "ADYEN"));
    assert_tree(graph);
}

#[test]
fn test_false_branches_get_increasing_lines() {
    let loaded = load(&false_chain_flow());
    let graph = &loaded.graph;
    let lane = |key: &str| loaded.lanes[&find(graph, key)];

    assert_eq!(loaded.lanes[&start_id(graph)], Lane { level: 0, line: 0 });
    assert_eq!(lane("100"), Lane { level: 1, line: 0 });
    assert_eq!(lane("STRIPE"), Lane { level: 2, line: 0 });

    let first_false = lane("VISA");
    let second_false = lane("3");
    assert_eq!(first_false, Lane { level: 2, line: 1 });
    assert_eq!(second_false, Lane { level: 3, line: 2 });
    assert!(second_false.line > first_false.line);
    assert_eq!(lane("CIELO").line, first_false.line);
    assert_eq!(lane("REDE").line, second_false.line);
}

#[test]
fn test_lines_follow_depth_first_true_first_order() {
    // A ? (B ? P1 : P2) : P3. The false lane under B is reached before A's.
    let flow = vec![FlowItem::condition(
        "AMOUNT",
        "GREATER_THAN",
        "100",
        vec![FlowItem::condition(
            "BRAND",
            "EQUALS",
            "VISA",
            vec![FlowItem::provider("STRIPE")],
            vec![FlowItem::provider("ADYEN")],
        )],
        vec![FlowItem::provider("CIELO")],
    )];
    let loaded = load(&flow);
    let graph = &loaded.graph;

    assert_eq!(loaded.lanes[&find(graph, "STRIPE")], Lane { level: 3, line: 0 });
    assert_eq!(loaded.lanes[&find(graph, "ADYEN")], Lane { level: 3, line: 1 });
    assert_eq!(loaded.lanes[&find(graph, "CIELO")], Lane { level: 2, line: 2 });
    assert_eq!(serialize(graph).unwrap(), flow);
}

#[test]
fn test_providers_sharing_a_slot_are_stacked() {
    let flow = vec![FlowItem::provider("STRIPE"), FlowItem::provider("ADYEN")];
    let loaded = load(&flow);
    let graph = &loaded.graph;

    assert_eq!(graph.node(find(graph, "STRIPE")).unwrap().position, Position::new(500.0, 300.0));
    assert_eq!(graph.node(find(graph, "ADYEN")).unwrap().position, Position::new(580.0, 390.0));
    assert_eq!(graph.outgoing(start_id(graph)).count(), 2);
    assert_eq!(serialize(graph).unwrap(), flow);
}

#[test]
fn test_provider_labels_come_from_catalog() {
    let loaded = load(&[FlowItem::provider("STRIPE"), FlowItem::provider("ACME")]);
    let graph = &loaded.graph;

    assert_eq!(graph.node(find(graph, "STRIPE")).unwrap().fields.label, "Stripe");
    assert_eq!(graph.node(find(graph, "ACME")).unwrap().fields.label, "Provider ACME");
}

#[test]
fn test_uncataloged_condition_is_dropped_with_subtree() {
    let catalog = NodeCatalog::from_json(
        r#"[
            { "id": "initial", "type": "initial", "label": "Start" },
            { "id": "amount", "type": "condition", "label": "Amount", "hasOperator": true }
        ]"#,
    )
    .unwrap();
    let flow = vec![
        FlowItem::condition(
            "METADATA",
            "CONTAINS",
            "vip",
            vec![FlowItem::provider("STRIPE")],
            vec![FlowItem::provider("ADYEN")],
        ),
        FlowItem::provider("CIELO"),
    ];

    let loaded = TreeToGraphBuilder::new(&catalog, &LoaderLayout::default()).build(&flow);
    assert_eq!(loaded.dropped, 3);
    assert_eq!(loaded.graph.len(), 2);
    assert_eq!(loaded.graph.start().unwrap().fields.label, "Start");
    assert_eq!(serialize(&loaded.graph).unwrap(), vec![FlowItem::provider("CIELO")]);
}

#[test]
fn test_unknown_wire_identifiers_fall_back() {
    let flow = vec![FlowItem::condition(
        "LOYALTY_TIER",
        "ROUGHLY",
        "gold",
        vec![FlowItem::provider("STRIPE")],
        vec![],
    )];
    let exported = serialize(&load(&flow).graph).unwrap();

    let expected = vec![FlowItem::condition(
        "AMOUNT",
        "EQUALS",
        "gold",
        vec![FlowItem::provider("STRIPE")],
        vec![],
    )];
    assert_eq!(exported, expected);
}

#[test]
fn test_empty_document_loads_start_only() {
    let loaded = load(&[]);
    assert_eq!(loaded.graph.len(), 1);
    assert!(loaded.graph.edges().is_empty());
    assert_eq!(serialize(&loaded.graph).unwrap(), Vec::<FlowItem>::new());
}

#[test]
fn test_serialize_without_start_fails() {
    let graph = Graph::from_snapshot(GraphSnapshot::default());
    assert_eq!(serialize(&graph), Err(SerializeError::NoStartNode));
}

#[test]
fn test_serialize_fills_missing_condition_fields() {
    let mut graph = Graph::new(Position::default());
    let start = start_id(&graph);
    let fields = NodeFields {
        field: Some("card".to_string()),
        ..NodeFields::default()
    };
    let condition = graph.add_node(NodeKind::Condition, Position::default(), fields).unwrap();
    graph.connect(start, condition, Branch::Unlabeled).unwrap();

    let exported = serialize(&graph).unwrap();
    assert_eq!(exported, vec![FlowItem::condition("BRAND", "EQUALS", "", vec![], vec![])]);

    let json = render_document(&exported).unwrap();
    assert!(!json.contains("trueFlow"));
    assert!(!json.contains("falseFlow"));
}

#[test]
fn test_provider_without_value_serializes_its_label() {
    let start = Node {
        id: NodeId(1),
        kind: NodeKind::Start,
        fields: NodeFields::default(),
        position: Position::default(),
    };
    let provider = Node {
        id: NodeId(2),
        kind: NodeKind::Provider,
        fields: NodeFields::default().with_label("Stripe"),
        position: Position::default(),
    };
    let edge = Edge {
        id: EdgeId(1),
        source: NodeId(1),
        target: NodeId(2),
        branch: Branch::Unlabeled,
    };
    let graph = Graph::from_snapshot(GraphSnapshot {
        nodes: vec![start, provider],
        edges: vec![edge],
    });

    assert_eq!(serialize(&graph).unwrap(), vec![FlowItem::provider("Stripe")]);
}

#[test]
fn test_unlabeled_condition_edge_serializes_as_true() {
    let mut graph = load(&amount_flow()).graph;
    let condition = find(&graph, "100");
    let stripe = find(&graph, "STRIPE");
    let true_edge = graph.slot(condition, Branch::True).unwrap().id;

    let mut snapshot = graph.snapshot();
    for edge in &mut snapshot.edges {
        if edge.id == true_edge {
            edge.branch = Branch::Unlabeled;
        }
    }
    graph = Graph::from_snapshot(snapshot);

    assert_eq!(graph.slot(condition, Branch::Unlabeled).unwrap().target, stripe);
    assert_eq!(serialize(&graph).unwrap(), amount_flow());
}

#[test]
fn test_deep_document_round_trips() {
    let mut flow = vec![FlowItem::provider("STRIPE")];
    for _ in 0..2_000 {
        flow = vec![FlowItem::condition("AMOUNT", "GREATER_THAN", "1", flow, vec![])];
    }
    let loaded = load(&flow);
    assert_eq!(loaded.graph.len(), 2_002);
    assert_eq!(loaded.lanes[&find(&loaded.graph, "STRIPE")], Lane { level: 2_001, line: 0 });

    let exported = serialize(&loaded.graph).unwrap();
    assert_eq!(exported.iter().map(FlowItem::size).sum::<usize>(), 2_001);
}
