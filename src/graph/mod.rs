//! The mutable node/edge store shared by every editing, layout and
//! serialization operation.
//!
//! Nodes and edges live in insertion-ordered vectors; an id → index map gives
//! constant-time lookups. Insertion order matters: serialization emits
//! siblings in edge order and the layout fallback grid uses node order.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

mod edge;
mod mutation;
mod node;

pub use edge::*;
pub use mutation::Removed;
pub use node::*;

/// Label given to the start node when no catalog definition supplies one.
pub const START_LABEL: &str = "Transaction start";

#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: AHashMap<NodeId, usize>,
    next_node_id: u64,
    next_edge_id: u64,
}

/// Plain serializable form of a graph, used by the CLI and for fixtures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Creates a graph holding only a start node at `start`.
    pub fn new(start: Position) -> Self {
        Self::seeded(start, START_LABEL).0
    }

    /// Creates a graph holding only a start node and hands back its id.
    pub(crate) fn seeded(start: Position, label: &str) -> (Self, NodeId) {
        let mut graph = Self::empty();
        let id = graph.push_node(
            NodeKind::Start,
            NodeFields::default().with_label(label),
            start,
        );
        (graph, id)
    }

    fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            index: AHashMap::new(),
            next_node_id: 1,
            next_edge_id: 1,
        }
    }

    /// Rebuilds a graph from a snapshot. No invariant is checked: a snapshot
    /// coming from outside may lack a start node, which serialization reports.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let next_node_id = snapshot.nodes.iter().map(|n| n.id.0).max().unwrap_or(0) + 1;
        let next_edge_id = snapshot.edges.iter().map(|e| e.id.0).max().unwrap_or(0) + 1;
        let mut graph = Self {
            nodes: snapshot.nodes,
            edges: snapshot.edges,
            index: AHashMap::new(),
            next_node_id,
            next_edge_id,
        };
        graph.reindex();
        graph
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let i = self.index_of(id)?;
        self.nodes.get_mut(i)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn start(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_start())
    }

    /// Outgoing edges of `id` in insertion order.
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.source == id)
    }

    pub fn incoming(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.target == id)
    }

    /// The edge currently occupying `branch` on `id`, if any.
    pub fn slot(&self, id: NodeId, branch: Branch) -> Option<&Edge> {
        self.outgoing(id).find(|e| e.branch == branch)
    }

    pub fn set_position(&mut self, id: NodeId, position: Position) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Appends a node without any invariant check.
    pub(crate) fn push_node(
        &mut self,
        kind: NodeKind,
        fields: NodeFields,
        position: Position,
    ) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.index.insert(id, self.nodes.len());
        self.nodes.push(Node {
            id,
            kind,
            fields,
            position,
        });
        id
    }

    /// Appends an edge without any invariant check.
    pub(crate) fn push_edge(&mut self, source: NodeId, target: NodeId, branch: Branch) -> EdgeId {
        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        self.edges.push(Edge {
            id,
            source,
            target,
            branch,
        });
        id
    }

    fn reindex(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id, i))
            .collect();
    }
}
