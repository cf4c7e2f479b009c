use crate::error::SerializeError;
use crate::flow::{Condition, ConditionFlow, FlowItem};
use crate::graph::{Branch, Graph, NodeId, NodeKind};
use crate::registry::{Operator, field_to_wire, operator_to_wire};
use ahash::{AHashMap, AHashSet};

enum Frame {
    Enter(NodeId),
    /// All children of the node have been emitted; assemble its items.
    Exit(NodeId),
}

/// Walks a graph from its start node and emits the nested flow document.
pub struct GraphToTreeBuilder<'g> {
    graph: &'g Graph,
}

impl<'g> GraphToTreeBuilder<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    pub fn build(&self) -> Result<Vec<FlowItem>, SerializeError> {
        let start = self.graph.start().ok_or(SerializeError::NoStartNode)?.id;

        let mut emitted: AHashMap<NodeId, Vec<FlowItem>> = AHashMap::new();
        let mut entered: AHashSet<NodeId> = AHashSet::new();
        let mut stack = vec![Frame::Enter(start)];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(id) => {
                    if !entered.insert(id) {
                        continue;
                    }
                    let Some(node) = self.graph.node(id) else {
                        continue;
                    };
                    if node.kind == NodeKind::Provider {
                        emitted.insert(id, vec![FlowItem::provider(node.provider_name())]);
                        continue;
                    }
                    stack.push(Frame::Exit(id));
                    let children: Vec<NodeId> = self.graph.outgoing(id).map(|e| e.target).collect();
                    stack.extend(children.into_iter().rev().map(Frame::Enter));
                }
                Frame::Exit(id) => {
                    let items = self.assemble(id, &mut emitted);
                    emitted.insert(id, items);
                }
            }
        }

        Ok(emitted.remove(&start).unwrap_or_default())
    }

    fn assemble(&self, id: NodeId, emitted: &mut AHashMap<NodeId, Vec<FlowItem>>) -> Vec<FlowItem> {
        let mut take = |branch_filter: &dyn Fn(Branch) -> bool| -> Vec<FlowItem> {
            self.graph
                .outgoing(id)
                .filter(|e| branch_filter(e.branch))
                .flat_map(|e| emitted.remove(&e.target).unwrap_or_default())
                .collect()
        };

        let Some(node) = self.graph.node(id) else {
            return Vec::new();
        };
        match node.kind {
            NodeKind::Condition => {
                let fields = &node.fields;
                let true_flow = take(&|b: Branch| b.follows_true_lane());
                let false_flow = take(&|b: Branch| b == Branch::False);
                vec![FlowItem::Condition(ConditionFlow {
                    condition: Condition {
                        field: field_to_wire(fields.field.as_deref().unwrap_or_default()),
                        operator: operator_to_wire(
                            fields
                                .operator
                                .as_deref()
                                .unwrap_or(Operator::Equals.symbol()),
                        )
                        .to_string(),
                        value: fields.value.clone().unwrap_or_default(),
                    },
                    true_flow,
                    false_flow,
                })]
            }
            _ => take(&|_: Branch| true),
        }
    }
}

/// Serializes `graph` into the flow document rooted at its start node.
pub fn serialize(graph: &Graph) -> Result<Vec<FlowItem>, SerializeError> {
    GraphToTreeBuilder::new(graph).build()
}
