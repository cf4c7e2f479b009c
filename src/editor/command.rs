use crate::error::EditorError;
use crate::flow::WorkflowSummary;
use crate::graph::{Branch, Edge, EdgeId, NodeId, Position, Removed};
use crate::layout::{LayoutOutcome, Placement};

/// A single user intent, as emitted by whatever surface drives the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// Drops a node of the given catalog type at a fixed position.
    AddNode { definition: String, position: Position },
    /// Creates a node and connects it to `branch` of `source` in one step,
    /// placing it next to the source.
    AddConnectedNode {
        definition: String,
        source: NodeId,
        branch: Branch,
    },
    Connect {
        source: NodeId,
        target: NodeId,
        branch: Branch,
    },
    DeleteNode(NodeId),
    DeleteEdge(EdgeId),
    UpdateCondition {
        id: NodeId,
        operator: Option<String>,
        value: Option<String>,
    },
    AutoLayout,
    Clear,
    Load(WorkflowSummary),
}

/// What a command did to the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    NodeAdded {
        id: NodeId,
        /// How the position was found, for nodes placed automatically.
        placement: Option<Placement>,
        edge: Option<EdgeId>,
    },
    Connected(EdgeId),
    Removed(Removed),
    EdgeRemoved(Edge),
    Updated(NodeId),
    LaidOut(LayoutOutcome),
    Cleared,
    Loaded { dropped: usize },
    Rejected(EditorError),
}

impl CommandOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, CommandOutcome::Rejected(_))
    }
}

impl From<Result<CommandOutcome, EditorError>> for CommandOutcome {
    fn from(result: Result<CommandOutcome, EditorError>) -> Self {
        result.unwrap_or_else(CommandOutcome::Rejected)
    }
}
