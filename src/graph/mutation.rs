use super::{Branch, Edge, EdgeId, Graph, Node, NodeFields, NodeId, NodeKind, Position, START_LABEL};
use crate::error::GraphError;
use ahash::AHashSet;
use tracing::debug;

/// Everything a cascading delete took out of the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removed {
    /// The deleted node followed by its descendants in discovery order.
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

impl Graph {
    /// Inserts a node. Only the fields `kind` requires are validated.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        position: Position,
        fields: NodeFields,
    ) -> Result<NodeId, GraphError> {
        match kind {
            NodeKind::Start => {
                if let Some(existing) = self.start() {
                    return Err(GraphError::DuplicateStart(existing.id));
                }
            }
            NodeKind::Condition => {
                if fields.field.as_deref().is_none_or(str::is_empty) {
                    return Err(GraphError::MissingField {
                        kind,
                        field: "field",
                    });
                }
            }
            NodeKind::Provider => {
                let named = [fields.value.as_deref(), fields.provider_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .any(|s| !s.is_empty());
                if !named {
                    return Err(GraphError::MissingField {
                        kind,
                        field: "providerName",
                    });
                }
            }
        }
        Ok(self.push_node(kind, fields, position))
    }

    /// Connects `source` to `target` on `branch`.
    ///
    /// Returns `None` without touching the graph when the slot is already
    /// taken or when the edge would break the tree shape.
    pub fn connect(&mut self, source: NodeId, target: NodeId, branch: Branch) -> Option<EdgeId> {
        if let Err(reason) = self.check_connect(source, target, branch) {
            debug!(%source, %target, ?branch, reason, "connect rejected");
            return None;
        }
        Some(self.push_edge(source, target, branch))
    }

    fn check_connect(
        &self,
        source: NodeId,
        target: NodeId,
        branch: Branch,
    ) -> Result<(), &'static str> {
        let source_node = self.node(source).ok_or("unknown source")?;
        let target_node = self.node(target).ok_or("unknown target")?;
        if source == target {
            return Err("self loop");
        }
        match (source_node.kind, branch) {
            (NodeKind::Start, Branch::Unlabeled) => {}
            (NodeKind::Condition, Branch::True | Branch::False) => {}
            (NodeKind::Provider, _) => return Err("provider nodes are terminal"),
            _ => return Err("branch does not exist on source"),
        }
        if self.slot(source, branch).is_some() {
            return Err("slot already connected");
        }
        if target_node.is_start() {
            return Err("start node cannot be a target");
        }
        if self.incoming(target).next().is_some() {
            return Err("target already has a parent");
        }
        if self.is_ancestor(target, source) {
            return Err("edge would close a cycle");
        }
        Ok(())
    }

    /// Walks parent links upwards from `node` looking for `candidate`.
    fn is_ancestor(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = node;
        for _ in 0..self.nodes.len() {
            match self.incoming(current).next() {
                Some(edge) if edge.source == candidate => return true,
                Some(edge) => current = edge.source,
                None => return false,
            }
        }
        false
    }

    /// Deletes `id` together with its whole downstream subtree.
    ///
    /// Descendants are never reattached to the deleted node's parent.
    pub fn delete_node(&mut self, id: NodeId) -> Result<Removed, GraphError> {
        let node = self.node(id).ok_or(GraphError::NodeNotFound(id))?;
        if node.is_start() {
            return Err(GraphError::CannotDeleteStart(id));
        }

        let mut order = vec![id];
        let mut doomed: AHashSet<NodeId> = AHashSet::from_iter([id]);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            for edge in self.outgoing(current) {
                // A snapshot may carry an edge back into the start node.
                if self.node(edge.target).is_some_and(Node::is_start) {
                    continue;
                }
                if doomed.insert(edge.target) {
                    order.push(edge.target);
                    stack.push(edge.target);
                }
            }
        }

        let mut removed_edges = Vec::new();
        self.edges.retain(|e: &Edge| {
            let touches = doomed.contains(&e.source) || doomed.contains(&e.target);
            if touches {
                removed_edges.push(e.id);
            }
            !touches
        });
        self.nodes.retain(|n| !doomed.contains(&n.id));
        self.reindex();

        debug!(%id, nodes = order.len(), edges = removed_edges.len(), "subtree deleted");
        Ok(Removed {
            nodes: order,
            edges: removed_edges,
        })
    }

    /// Removes a single edge. The subtree below it stays in the graph,
    /// unreachable from the start node.
    pub fn delete_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let at = self.edges.iter().position(|e| e.id == id)?;
        Some(self.edges.remove(at))
    }

    /// Drops everything and leaves a fresh start node at `start`.
    /// Id counters keep running so stale ids never alias new nodes.
    pub fn clear(&mut self, start: Position) {
        self.nodes.clear();
        self.edges.clear();
        self.index.clear();
        self.push_node(
            NodeKind::Start,
            NodeFields::default().with_label(START_LABEL),
            start,
        );
    }
}
