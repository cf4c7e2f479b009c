use crate::config::PlacerConfig;
use crate::graph::{Branch, Graph, Position};
use rand::Rng;
use std::f64::consts::PI;

const SPIRAL_STEPS_PER_TURN: usize = 8;

/// Which search stage produced a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementStrategy {
    /// Index into the branch-specific candidate list.
    Candidate(usize),
    /// Step of the spiral search.
    Spiral(usize),
    /// Nothing was free; a randomized offset was used.
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Position,
    pub strategy: PlacementStrategy,
}

/// Finds a free spot for a node attached to one branch of a source node.
pub struct PositionPlacer<'a> {
    config: &'a PlacerConfig,
}

impl<'a> PositionPlacer<'a> {
    pub fn new(config: &'a PlacerConfig) -> Self {
        Self { config }
    }

    pub fn place(&self, graph: &Graph, source: Position, branch: Branch) -> Placement {
        self.place_with_rng(graph, source, branch, &mut rand::rng())
    }

    /// Same as [`place`](Self::place) with a caller-supplied RNG, which is
    /// only consulted when both the candidates and the spiral are exhausted.
    pub fn place_with_rng<R: Rng>(
        &self,
        graph: &Graph,
        source: Position,
        branch: Branch,
        rng: &mut R,
    ) -> Placement {
        let clearance = self.config.clearance();
        let is_free = |p: Position| {
            !clearance.collides_any(p, graph.nodes().iter().map(|n| &n.position))
        };
        let base = self.base_position(source, branch);

        if let Some((i, position)) = self
            .candidates(base, branch)
            .into_iter()
            .enumerate()
            .find(|&(_, p)| is_free(p))
        {
            return Placement {
                position,
                strategy: PlacementStrategy::Candidate(i),
            };
        }

        if let Some((i, position)) = self.spiral(base).find(|&(_, p)| is_free(p)) {
            return Placement {
                position,
                strategy: PlacementStrategy::Spiral(i),
            };
        }

        let h = self.config.horizontal_spacing;
        Placement {
            position: Position::new(
                base.x + h + rng.random::<f64>() * self.config.random_spread_x,
                base.y + (rng.random::<f64>() - 0.5) * self.config.random_spread_y,
            ),
            strategy: PlacementStrategy::Random,
        }
    }

    /// The search origin: shifted up for True, down for False.
    pub fn base_position(&self, source: Position, branch: Branch) -> Position {
        let dy = match branch {
            Branch::True => -self.config.branch_offset,
            Branch::False => self.config.branch_offset,
            Branch::Unlabeled => 0.0,
        };
        source.offset(0.0, dy)
    }

    /// Candidate spots in preference order. True prefers the row above,
    /// False the row below, the start slot its own row.
    pub fn candidates(&self, base: Position, branch: Branch) -> Vec<Position> {
        let h = self.config.horizontal_spacing;
        let v = self.config.vertical_spacing;
        let far = h * 1.5;
        let offsets = match branch {
            Branch::True => vec![(h, -v), (h, 0.0), (h, v), (far, -v), (far, 0.0)],
            Branch::False => vec![(h, v), (h, 0.0), (h, -v), (far, v), (far, 0.0)],
            Branch::Unlabeled => vec![(h, 0.0), (h, -v), (h, v), (far, 0.0)],
        };
        offsets
            .into_iter()
            .map(|(dx, dy)| base.offset(dx, dy))
            .collect()
    }

    /// Points on a widening spiral around `base`: 45° apart, radius growing
    /// by half the horizontal spacing after each full turn.
    fn spiral(&self, base: Position) -> impl Iterator<Item = (usize, Position)> + '_ {
        let h = self.config.horizontal_spacing;
        let step = 2.0 * PI / SPIRAL_STEPS_PER_TURN as f64;
        (0..self.config.spiral_steps).map(move |i| {
            let turn = (i / SPIRAL_STEPS_PER_TURN) as f64;
            let angle = (i % SPIRAL_STEPS_PER_TURN) as f64 * step;
            let radius = h + turn * h * 0.5;
            (
                i,
                base.offset(angle.cos() * radius, angle.sin() * radius),
            )
        })
    }
}
