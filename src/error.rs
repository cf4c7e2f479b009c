use crate::graph::{Branch, EdgeId, NodeId, NodeKind};
use thiserror::Error;

/// Errors that can occur while turning a graph into a flow document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializeError {
    #[error("The graph has no start node, so there is nothing to export")]
    NoStartNode,
}

/// Errors raised by the mutation operations on a `Graph`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node '{0}' not found in the graph")]
    NodeNotFound(NodeId),

    #[error("A start node already exists ('{0}'); a graph holds exactly one")]
    DuplicateStart(NodeId),

    #[error("The start node '{0}' cannot be deleted")]
    CannotDeleteStart(NodeId),

    #[error("A {kind:?} node requires the '{field}' field")]
    MissingField { kind: NodeKind, field: &'static str },
}

/// Reasons an editor command was refused. The graph is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("No node type named '{0}' in the catalog")]
    UnknownDefinition(String),

    #[error("The {branch:?} slot of '{node}' is already connected")]
    SlotOccupied { node: NodeId, branch: Branch },

    #[error("Connecting '{source_node}' to '{target}' would break the routing tree")]
    InvalidConnection { source_node: NodeId, target: NodeId },

    #[error("Edge '{0}' not found in the graph")]
    EdgeNotFound(EdgeId),

    #[error("Node '{0}' is not a condition")]
    NotACondition(NodeId),

    #[error("Cannot export: {0}")]
    Export(#[from] SerializeError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors that can occur while talking to the remote decision engine.
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error("Request to the decision engine failed: {0}")]
    Transport(String),

    #[error("Decision engine returned status {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },

    #[error("Could not decode the decision engine response: {0}")]
    Decode(String),

    #[error("No workflow stored for merchant '{0}'")]
    MerchantNotFound(String),
}

impl EngineError {
    /// The message the remote side attached to the failure, if any.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            EngineError::Status { message, .. } => message.as_deref(),
            EngineError::MerchantNotFound(_) => None,
            EngineError::Transport(_) | EngineError::Decode(_) => None,
        }
    }
}

/// Errors that can occur when loading an `EditorConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors that can occur when parsing an externally supplied node catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to parse node catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Node catalog defines '{0}' more than once")]
    DuplicateDefinition(String),
}
