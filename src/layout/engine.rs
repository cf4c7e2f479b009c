use super::{Lane, LaneMap};
use crate::config::AutoLayoutConfig;
use crate::graph::{Graph, NodeId, Position};
use ahash::AHashMap;
use itertools::Itertools;
use tracing::debug;

/// Result of a full re-flow.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutcome {
    /// New position of every node, in graph node order.
    pub positions: Vec<(NodeId, Position)>,
    /// Level and line of every node reachable from the start node.
    pub lanes: LaneMap,
    /// Nodes parked on the fallback grid.
    pub unreachable: Vec<NodeId>,
}

struct Placed {
    id: NodeId,
    lane: Lane,
    position: Position,
}

enum Frame {
    /// Schedule the children of an already placed node.
    Visit { node: NodeId, lane: Lane },
    /// Place `target`; `line` is `None` when a fresh lane must be opened.
    Place {
        target: NodeId,
        level: u32,
        line: Option<u32>,
    },
}

/// Recomputes every position of an existing graph.
pub struct LayoutEngine<'a> {
    config: &'a AutoLayoutConfig,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(config: &'a AutoLayoutConfig) -> Self {
        Self { config }
    }

    /// Computes a layout without touching the graph. `None` when the graph
    /// has no start node.
    pub fn compute(&self, graph: &Graph) -> Option<LayoutOutcome> {
        let start = graph.start()?.id;
        let grid = self.config.grid();

        let mut placed: Vec<Placed> = Vec::with_capacity(graph.len());
        let mut placed_at: AHashMap<NodeId, usize> = AHashMap::with_capacity(graph.len());
        let mut occupants: AHashMap<Lane, usize> = AHashMap::new();
        let mut next_line = 1u32;

        let root = Lane { level: 0, line: 0 };
        placed_at.insert(start, 0);
        placed.push(Placed {
            id: start,
            lane: root,
            position: self.config.origin,
        });
        *occupants.entry(root).or_default() += 1;

        let mut stack = vec![Frame::Visit {
            node: start,
            lane: root,
        }];
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Visit { node, lane } => {
                    let (same_lane, new_lane): (Vec<_>, Vec<_>) = graph
                        .outgoing(node)
                        .partition(|e| e.branch.follows_true_lane());
                    // Pushed in reverse so True children come off the stack
                    // first, each finishing its subtree before the next.
                    for edge in new_lane.iter().rev() {
                        stack.push(Frame::Place {
                            target: edge.target,
                            level: lane.level + 1,
                            line: None,
                        });
                    }
                    for edge in same_lane.iter().rev() {
                        stack.push(Frame::Place {
                            target: edge.target,
                            level: lane.level + 1,
                            line: Some(lane.line),
                        });
                    }
                }
                Frame::Place {
                    target,
                    level,
                    line,
                } => {
                    if placed_at.contains_key(&target) || graph.node(target).is_none() {
                        continue;
                    }
                    let line = line.unwrap_or_else(|| {
                        let fresh = next_line;
                        next_line += 1;
                        fresh
                    });
                    let lane = Lane { level, line };
                    let count = occupants.get(&lane).copied().unwrap_or(0);
                    let position = self.avoid_overlap(grid.position(lane, count), lane, &placed);

                    placed_at.insert(target, placed.len());
                    placed.push(Placed {
                        id: target,
                        lane,
                        position,
                    });
                    *occupants.entry(lane).or_default() += 1;
                    stack.push(Frame::Visit { node: target, lane });
                }
            }
        }

        self.separate_remaining(&mut placed);

        let mut unreachable = Vec::new();
        let positions = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, node)| match placed_at.get(&node.id) {
                Some(&at) => (node.id, placed[at].position),
                None => {
                    unreachable.push(node.id);
                    (node.id, self.fallback_position(i, next_line))
                }
            })
            .collect();

        let lanes = placed.iter().map(|p| (p.id, p.lane)).collect();
        debug!(
            placed = placed.len(),
            unreachable = unreachable.len(),
            lines = next_line,
            "layout computed"
        );
        Some(LayoutOutcome {
            positions,
            lanes,
            unreachable,
        })
    }

    /// Computes a layout and writes the positions back into the graph.
    pub fn apply(&self, graph: &mut Graph) -> Option<LayoutOutcome> {
        let outcome = self.compute(graph)?;
        for &(id, position) in &outcome.positions {
            graph.set_position(id, position);
        }
        Some(outcome)
    }

    /// Nudges a freshly computed position away from already placed nodes,
    /// for a bounded number of attempts.
    fn avoid_overlap(&self, mut position: Position, lane: Lane, placed: &[Placed]) -> Position {
        let clearance = self.config.clearance();
        for _ in 0..self.config.max_attempts {
            match placed
                .iter()
                .find(|p| clearance.collides(position, p.position))
            {
                Some(p) if p.lane == lane => position.y += self.config.node_spacing,
                Some(_) => position.x += self.config.horizontal_nudge,
                None => break,
            }
        }
        position
    }

    /// One all-pairs sweep over the placed set. Moves the deeper node of each
    /// colliding pair, or the later one when both sit on the same level.
    fn separate_remaining(&self, placed: &mut [Placed]) {
        let clearance = self.config.clearance();
        for (i, j) in (0..placed.len()).tuple_combinations() {
            if !clearance.collides(placed[i].position, placed[j].position) {
                continue;
            }
            let mover = if placed[j].lane.level >= placed[i].lane.level {
                j
            } else {
                i
            };
            if placed[i].lane.line == placed[j].lane.line {
                placed[mover].position.y += self.config.node_spacing;
            } else {
                placed[mover].position.x += self.config.final_horizontal_nudge;
            }
        }
    }

    fn fallback_position(&self, index: usize, next_line: u32) -> Position {
        let cfg = self.config;
        let columns = cfg.fallback_columns.max(1);
        Position::new(
            cfg.origin.x + (index / columns) as f64 * cfg.horizontal_spacing,
            cfg.origin.y
                + f64::from(next_line + 1) * cfg.vertical_spacing
                + (index % columns) as f64 * cfg.fallback_row_height,
        )
    }
}
