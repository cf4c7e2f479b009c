use super::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an edge, unique within one `Graph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge-{}", self.0)
    }
}

/// The outgoing slot an edge leaves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Branch {
    /// The single slot of the start node.
    Unlabeled,
    True,
    False,
}

impl Branch {
    /// Unlabeled edges continue the current lane the same way True edges do.
    pub fn follows_true_lane(self) -> bool {
        matches!(self, Branch::True | Branch::Unlabeled)
    }

    pub fn from_flag(is_true: bool) -> Self {
        if is_true { Branch::True } else { Branch::False }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub branch: Branch,
}
