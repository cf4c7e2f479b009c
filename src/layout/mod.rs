//! Coordinates for graph nodes: the global re-flow used on demand and the
//! single-node placement used while editing.

use crate::graph::NodeId;
use ahash::AHashMap;

mod engine;
mod geometry;
mod placer;

pub use engine::{LayoutEngine, LayoutOutcome};
pub use geometry::{Clearance, Lane, LaneGrid};
pub use placer::{Placement, PlacementStrategy, PositionPlacer};

/// Level and line of each laid-out node.
pub type LaneMap = AHashMap<NodeId, Lane>;
