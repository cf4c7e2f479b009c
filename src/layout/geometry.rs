use crate::graph::Position;
use serde::{Deserialize, Serialize};

/// Derived layout coordinates of a node: depth from the start node and the
/// lane it was reached on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lane {
    pub level: u32,
    pub line: u32,
}

/// The grid shared by the loader and the auto-layout: one column per level,
/// one row per line, with a small shift for each node already in the cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneGrid {
    pub origin: Position,
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    pub slot_offset: f64,
}

impl LaneGrid {
    pub fn y(&self, line: u32) -> f64 {
        if line == 0 {
            self.origin.y
        } else {
            self.origin.y + f64::from(line) * self.vertical_spacing
        }
    }

    pub fn x(&self, level: u32, occupants: usize) -> f64 {
        self.origin.x
            + f64::from(level) * self.horizontal_spacing
            + occupants as f64 * self.slot_offset
    }

    pub fn position(&self, lane: Lane, occupants: usize) -> Position {
        Position::new(self.x(lane.level, occupants), self.y(lane.line))
    }
}

/// Minimum centre-to-centre distance on each axis below which two node
/// footprints overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clearance {
    pub x: f64,
    pub y: f64,
}

impl Clearance {
    /// Axis-aligned bounding-box test. Both axes must be too close.
    pub fn collides(&self, a: Position, b: Position) -> bool {
        (a.x - b.x).abs() < self.x && (a.y - b.y).abs() < self.y
    }

    pub fn collides_any<'a>(
        &self,
        candidate: Position,
        mut others: impl Iterator<Item = &'a Position>,
    ) -> bool {
        others.any(|p| self.collides(candidate, *p))
    }
}
