use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node, unique within one `Graph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// The three roles a node can play in a routing tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// The unique entry point. Not represented in the wire document.
    #[serde(alias = "initial")]
    Start,
    /// A branching decision with a True and a False slot.
    Condition,
    /// A terminal naming the payment provider to route to.
    Provider,
}

/// Top-left corner of a node on the editor canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The editable payload of a node.
///
/// `field` holds the domain field id (`amount`, `card`, ...) and `operator` the
/// domain operator symbol (`=`, `>=`, `not_in`, ...). Translation to wire
/// identifiers happens in `registry`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub label: String,
}

impl NodeFields {
    pub fn condition(field: &str, operator: &str, value: &str) -> Self {
        Self {
            field: Some(field.to_string()),
            operator: Some(operator.to_string()),
            value: Some(value.to_string()),
            ..Self::default()
        }
    }

    pub fn provider(name: &str) -> Self {
        Self {
            value: Some(name.to_string()),
            provider_name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    #[serde(flatten)]
    pub fields: NodeFields,
    pub position: Position,
}

impl Node {
    pub fn is_start(&self) -> bool {
        self.kind == NodeKind::Start
    }

    /// The provider name emitted for this node: its value, falling back to
    /// the stored provider name and finally to the label.
    pub fn provider_name(&self) -> &str {
        let fields = &self.fields;
        [fields.value.as_deref(), fields.provider_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or(&fields.label)
    }
}
