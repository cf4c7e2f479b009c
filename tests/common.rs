//! Common test fixtures for building flow documents and graphs.
use routeflow::config::LoaderLayout;
use routeflow::prelude::*;
use routeflow::transform::LoadedGraph;
use std::collections::HashSet;

/// `AMOUNT > 100 ? STRIPE : ADYEN`
#[allow(dead_code)]
pub fn amount_flow() -> Vec<FlowItem> {
    vec![FlowItem::condition(
        "AMOUNT",
        "GREATER_THAN",
        "100",
        vec![FlowItem::provider("STRIPE")],
        vec![FlowItem::provider("ADYEN")],
    )]
}

/// The same document as [`amount_flow`], as it travels on the wire.
#[allow(dead_code)]
pub const AMOUNT_FLOW_JSON: &str = r#"[
  {
    "typeFlow": "CONDITION",
    "condition": { "field": "AMOUNT", "operator": "GREATER_THAN", "value": "100" },
    "trueFlow": [ { "typeFlow": "PROVIDER", "providerName": "STRIPE" } ],
    "falseFlow": [ { "typeFlow": "PROVIDER", "providerName": "ADYEN" } ]
  }
]"#;

/// A chain of false branches, each opening a new lane:
///
/// `AMOUNT > 100 ? STRIPE : (BRAND = VISA ? CIELO : (INSTALLMENT >= 3 ? REDE : GETNET))`
#[allow(dead_code)]
pub fn false_chain_flow() -> Vec<FlowItem> {
    vec![FlowItem::condition(
        "AMOUNT",
        "GREATER_THAN",
        "100",
        vec![FlowItem::provider("STRIPE")],
        vec![FlowItem::condition(
            "BRAND",
            "EQUALS",
            "VISA",
            vec![FlowItem::provider("CIELO")],
            vec![FlowItem::condition(
                "INSTALLMENT",
                "GREATER_THAN_OR_EQUAL_TO",
                "3",
                vec![FlowItem::provider("REDE")],
                vec![FlowItem::provider("GETNET")],
            )],
        )],
    )]
}

#[allow(dead_code)]
pub fn load(flow: &[FlowItem]) -> LoadedGraph {
    TreeToGraphBuilder::new(&NodeCatalog::default(), &LoaderLayout::default()).build(flow)
}

#[allow(dead_code)]
pub fn start_id(graph: &Graph) -> NodeId {
    graph.start().map(|n| n.id).expect("graph has a start node")
}

/// The first node whose provider name or condition value is `key`.
#[allow(dead_code)]
pub fn find(graph: &Graph, key: &str) -> NodeId {
    graph
        .nodes()
        .iter()
        .find(|n| n.fields.value.as_deref() == Some(key))
        .map(|n| n.id)
        .unwrap_or_else(|| panic!("no node with value '{}'", key))
}

#[allow(dead_code)]
pub fn add_condition(graph: &mut Graph, field: &str, operator: &str, value: &str) -> NodeId {
    graph
        .add_node(
            NodeKind::Condition,
            Position::default(),
            NodeFields::condition(field, operator, value),
        )
        .expect("condition node is valid")
}

#[allow(dead_code)]
pub fn add_provider(graph: &mut Graph, name: &str) -> NodeId {
    graph
        .add_node(NodeKind::Provider, Position::default(), NodeFields::provider(name))
        .expect("provider node is valid")
}

/// Asserts the routing-tree invariants on `graph`.
#[allow(dead_code)]
pub fn assert_tree(graph: &Graph) {
    let starts = graph.nodes().iter().filter(|n| n.is_start()).count();
    assert_eq!(starts, 1, "exactly one start node");

    let mut targets = HashSet::new();
    let mut slots = HashSet::new();
    for edge in graph.edges() {
        assert!(targets.insert(edge.target), "{} has two parents", edge.target);
        assert!(
            slots.insert((edge.source, edge.branch)),
            "{} uses its {:?} slot twice",
            edge.source,
            edge.branch
        );
        assert!(graph.node(edge.source).is_some(), "dangling source {}", edge.source);
        assert!(graph.node(edge.target).is_some(), "dangling target {}", edge.target);
    }
}
