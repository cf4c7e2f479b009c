use crate::config::LoaderLayout;
use crate::flow::{ConditionFlow, FlowItem};
use crate::graph::{Branch, Graph, NodeFields, NodeId, NodeKind, Position, START_LABEL};
use crate::layout::{Lane, LaneMap};
use crate::registry::{NodeCatalog, field_from_wire, operator_from_wire};
use ahash::AHashMap;
use tracing::{debug, warn};

/// A graph rebuilt from a flow document.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub graph: Graph,
    /// Level and line assigned to every created node, start included.
    pub lanes: LaneMap,
    /// Flow items discarded because their field has no catalog definition,
    /// counting everything nested under them.
    pub dropped: usize,
}

enum LineRequest {
    Inherit(u32),
    /// Open a new lane once the sequence is reached.
    Fresh,
}

enum Frame<'d> {
    Sequence {
        items: &'d [FlowItem],
        parent: NodeId,
        level: u32,
        line: LineRequest,
        is_true: bool,
    },
    Item {
        item: &'d FlowItem,
        parent: NodeId,
        lane: Lane,
        is_true: bool,
    },
}

/// Rebuilds a positioned graph from a stored flow document.
pub struct TreeToGraphBuilder<'a> {
    catalog: &'a NodeCatalog,
    layout: &'a LoaderLayout,
}

impl<'a> TreeToGraphBuilder<'a> {
    pub fn new(catalog: &'a NodeCatalog, layout: &'a LoaderLayout) -> Self {
        Self { catalog, layout }
    }

    pub fn build(&self, flow: &[FlowItem]) -> LoadedGraph {
        let start_label = self
            .catalog
            .start()
            .map_or(START_LABEL, |def| def.label.as_str());
        let (graph, start) = Graph::seeded(self.layout.origin, start_label);
        let mut state = BuildState {
            graph,
            lanes: LaneMap::new(),
            slots: AHashMap::new(),
            next_line: 1,
            dropped: 0,
        };
        state.lanes.insert(start, Lane { level: 0, line: 0 });

        let mut stack = vec![Frame::Sequence {
            items: flow,
            parent: start,
            level: 1,
            line: LineRequest::Inherit(0),
            is_true: true,
        }];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Sequence {
                    items,
                    parent,
                    level,
                    line,
                    is_true,
                } => {
                    let line = match line {
                        LineRequest::Inherit(line) => line,
                        LineRequest::Fresh => {
                            let fresh = state.next_line;
                            state.next_line += 1;
                            fresh
                        }
                    };
                    let lane = Lane { level, line };
                    stack.extend(items.iter().rev().map(|item| Frame::Item {
                        item,
                        parent,
                        lane,
                        is_true,
                    }));
                }
                Frame::Item {
                    item: FlowItem::Condition(condition),
                    parent,
                    lane,
                    is_true,
                } => {
                    let Some(id) = self.place_condition(&mut state, condition, parent, lane, is_true)
                    else {
                        state.dropped += 1 + condition
                            .true_flow
                            .iter()
                            .chain(&condition.false_flow)
                            .map(FlowItem::size)
                            .sum::<usize>();
                        continue;
                    };
                    // False pushed first so the True subtree is finished
                    // before the False lane gets its number.
                    if !condition.false_flow.is_empty() {
                        stack.push(Frame::Sequence {
                            items: &condition.false_flow,
                            parent: id,
                            level: lane.level + 1,
                            line: LineRequest::Fresh,
                            is_true: false,
                        });
                    }
                    if !condition.true_flow.is_empty() {
                        stack.push(Frame::Sequence {
                            items: &condition.true_flow,
                            parent: id,
                            level: lane.level + 1,
                            line: LineRequest::Inherit(lane.line),
                            is_true: true,
                        });
                    }
                }
                Frame::Item {
                    item: FlowItem::Provider(provider),
                    parent,
                    lane,
                    is_true,
                } => {
                    self.place_provider(&mut state, &provider.provider_name, parent, lane, is_true);
                }
            }
        }

        debug!(
            nodes = state.graph.len(),
            edges = state.graph.edges().len(),
            dropped = state.dropped,
            "flow loaded into graph"
        );
        LoadedGraph {
            graph: state.graph,
            lanes: state.lanes,
            dropped: state.dropped,
        }
    }

    fn place_condition(
        &self,
        state: &mut BuildState,
        flow: &ConditionFlow,
        parent: NodeId,
        lane: Lane,
        is_true: bool,
    ) -> Option<NodeId> {
        let domain_field = field_from_wire(&flow.condition.field);
        let Some(def) = self
            .catalog
            .get(domain_field)
            .filter(|d| d.kind == NodeKind::Condition)
        else {
            warn!(
                field = %flow.condition.field,
                domain_field,
                "no node definition for condition field; dropping it and its branches"
            );
            return None;
        };

        let occupants = state.occupants(lane, is_true);
        let position = self.layout.grid().position(lane, occupants);
        let fields = NodeFields {
            field: Some(def.id.clone()),
            operator: Some(operator_from_wire(&flow.condition.operator).to_string()),
            value: Some(flow.condition.value.clone()),
            provider_name: None,
            label: def.label.clone(),
        };
        Some(state.attach(NodeKind::Condition, fields, position, parent, lane, is_true))
    }

    fn place_provider(
        &self,
        state: &mut BuildState,
        name: &str,
        parent: NodeId,
        lane: Lane,
        is_true: bool,
    ) -> NodeId {
        let label = match self.catalog.find_provider(name) {
            Some(def) => def.label.clone(),
            None => format!("Provider {}", name),
        };
        let occupants = state.occupants(lane, is_true);
        let grid = self.layout.grid();
        // Providers sharing a slot stack downwards instead of overlapping.
        let position = Position::new(
            grid.x(lane.level, occupants),
            grid.y(lane.line) + occupants as f64 * self.layout.provider_stack_offset,
        );
        let fields = NodeFields::provider(name).with_label(label);
        state.attach(NodeKind::Provider, fields, position, parent, lane, is_true)
    }
}

struct BuildState {
    graph: Graph,
    lanes: LaneMap,
    /// Nodes already placed per (level, line, direction) slot.
    slots: AHashMap<(Lane, bool), usize>,
    next_line: u32,
    dropped: usize,
}

impl BuildState {
    fn occupants(&self, lane: Lane, is_true: bool) -> usize {
        self.slots.get(&(lane, is_true)).copied().unwrap_or(0)
    }

    fn attach(
        &mut self,
        kind: NodeKind,
        fields: NodeFields,
        position: Position,
        parent: NodeId,
        lane: Lane,
        is_true: bool,
    ) -> NodeId {
        let id = self.graph.push_node(kind, fields, position);
        *self.slots.entry((lane, is_true)).or_default() += 1;
        self.lanes.insert(id, lane);

        // The parent is looked up in the graph being built, where its kind
        // is already settled.
        let branch = match self.graph.node(parent).map(|n| n.kind) {
            Some(NodeKind::Start) => Branch::Unlabeled,
            _ => Branch::from_flag(is_true),
        };
        self.graph.push_edge(parent, id, branch);
        id
    }
}
