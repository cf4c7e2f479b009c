//! Command-driven editing of a routing graph.
//!
//! The editor owns the graph, the node catalog and the configuration. Every
//! change goes through [`Editor::apply`]; nodes never carry callbacks or
//! references back into the editor.

mod command;

pub use command::{CommandOutcome, EditorCommand};

use crate::config::EditorConfig;
use crate::engine::DecisionEngine;
use crate::engine::actions::{self, ActionOutcome};
use crate::error::{EditorError, GraphError, SerializeError};
use crate::flow::{DecisionType, EvaluationRequest, FlowItem, WorkflowRequest, WorkflowSummary};
use crate::graph::{Branch, EdgeId, Graph, NodeId, NodeKind, Position};
use crate::layout::{LayoutEngine, PositionPlacer};
use crate::registry::NodeCatalog;
use crate::transform::{TreeToGraphBuilder, serialize};
use tracing::{debug, info, warn};

pub struct Editor {
    graph: Graph,
    catalog: NodeCatalog,
    config: EditorConfig,
    /// Merchant whose workflow was loaded last.
    merchant: Option<String>,
}

impl Editor {
    pub fn new(catalog: NodeCatalog, config: EditorConfig) -> Self {
        let mut graph = Graph::new(config.start_position);
        relabel_start(&mut graph, &catalog);
        Self {
            graph,
            catalog,
            config,
            merchant: None,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn catalog(&self) -> &NodeCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn merchant(&self) -> Option<&str> {
        self.merchant.as_deref()
    }

    /// Moves a node, as a drag on the canvas would.
    pub fn move_node(&mut self, id: NodeId, position: Position) -> bool {
        self.graph.set_position(id, position)
    }

    pub fn apply(&mut self, command: EditorCommand) -> CommandOutcome {
        let outcome: CommandOutcome = match command {
            EditorCommand::AddNode {
                definition,
                position,
            } => self.add_node(&definition, position).into(),
            EditorCommand::AddConnectedNode {
                definition,
                source,
                branch,
            } => self.add_connected_node(&definition, source, branch).into(),
            EditorCommand::Connect {
                source,
                target,
                branch,
            } => self.connect(source, target, branch).into(),
            EditorCommand::DeleteNode(id) => match self.graph.delete_node(id) {
                Ok(removed) => CommandOutcome::Removed(removed),
                Err(err) => CommandOutcome::Rejected(err.into()),
            },
            EditorCommand::DeleteEdge(id) => match self.graph.delete_edge(id) {
                Some(edge) => CommandOutcome::EdgeRemoved(edge),
                None => CommandOutcome::Rejected(EditorError::EdgeNotFound(id)),
            },
            EditorCommand::UpdateCondition {
                id,
                operator,
                value,
            } => self.update_condition(id, operator, value).into(),
            EditorCommand::AutoLayout => {
                match LayoutEngine::new(&self.config.layout).apply(&mut self.graph) {
                    Some(outcome) => CommandOutcome::LaidOut(outcome),
                    None => CommandOutcome::Rejected(SerializeError::NoStartNode.into()),
                }
            }
            EditorCommand::Clear => {
                self.graph.clear(self.config.start_position);
                relabel_start(&mut self.graph, &self.catalog);
                self.merchant = None;
                CommandOutcome::Cleared
            }
            EditorCommand::Load(summary) => self.load(summary),
        };

        if let CommandOutcome::Rejected(reason) = &outcome {
            debug!(%reason, "command rejected");
        }
        outcome
    }

    fn add_node(&mut self, definition: &str, position: Position) -> Result<CommandOutcome, EditorError> {
        let def = self
            .catalog
            .get(definition)
            .ok_or_else(|| EditorError::UnknownDefinition(definition.to_string()))?;
        let id = self.graph.add_node(def.kind, position, def.instantiate())?;
        Ok(CommandOutcome::NodeAdded {
            id,
            placement: None,
            edge: None,
        })
    }

    fn add_connected_node(
        &mut self,
        definition: &str,
        source: NodeId,
        branch: Branch,
    ) -> Result<CommandOutcome, EditorError> {
        let source_position = self
            .graph
            .node(source)
            .ok_or(GraphError::NodeNotFound(source))?
            .position;
        if self.graph.slot(source, branch).is_some() {
            return Err(EditorError::SlotOccupied {
                node: source,
                branch,
            });
        }
        let def = self
            .catalog
            .get(definition)
            .ok_or_else(|| EditorError::UnknownDefinition(definition.to_string()))?;

        let placement = PositionPlacer::new(&self.config.placer).place(&self.graph, source_position, branch);
        let id = self.graph.add_node(def.kind, placement.position, def.instantiate())?;
        let Some(edge) = self.graph.connect(source, id, branch) else {
            // Roll back so a refused edge never leaves an orphan behind.
            self.graph.delete_node(id)?;
            return Err(EditorError::InvalidConnection {
                source_node: source,
                target: id,
            });
        };
        Ok(CommandOutcome::NodeAdded {
            id,
            placement: Some(placement),
            edge: Some(edge),
        })
    }

    fn connect(&mut self, source: NodeId, target: NodeId, branch: Branch) -> Result<CommandOutcome, EditorError> {
        if self.graph.slot(source, branch).is_some() {
            return Err(EditorError::SlotOccupied {
                node: source,
                branch,
            });
        }
        let edge: EdgeId = self
            .graph
            .connect(source, target, branch)
            .ok_or(EditorError::InvalidConnection {
                source_node: source,
                target,
            })?;
        Ok(CommandOutcome::Connected(edge))
    }

    fn update_condition(
        &mut self,
        id: NodeId,
        operator: Option<String>,
        value: Option<String>,
    ) -> Result<CommandOutcome, EditorError> {
        let node = self.graph.node_mut(id).ok_or(GraphError::NodeNotFound(id))?;
        if node.kind != NodeKind::Condition {
            return Err(EditorError::NotACondition(id));
        }
        if operator.is_some() {
            node.fields.operator = operator;
        }
        if value.is_some() {
            node.fields.value = value;
        }
        Ok(CommandOutcome::Updated(id))
    }

    fn load(&mut self, summary: WorkflowSummary) -> CommandOutcome {
        let loaded = TreeToGraphBuilder::new(&self.catalog, &self.config.loader).build(&summary.flow);
        if loaded.dropped > 0 {
            warn!(
                workflow = %summary.name,
                dropped = loaded.dropped,
                "some flow items had no node type and were left out"
            );
        }
        info!(
            workflow = %summary.name,
            merchant = ?summary.merchant_code,
            nodes = loaded.graph.len(),
            "workflow loaded"
        );
        self.graph = loaded.graph;
        self.merchant = summary.merchant_code;
        CommandOutcome::Loaded {
            dropped: loaded.dropped,
        }
    }

    /// Serializes the current graph into a flow document.
    pub fn export(&self) -> Result<Vec<FlowItem>, SerializeError> {
        serialize(&self.graph)
    }

    /// The persist body for the current graph. The editor always produces
    /// nested decision trees.
    pub fn workflow_request(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<WorkflowRequest, SerializeError> {
        Ok(WorkflowRequest {
            name: name.to_string(),
            description: description.map(str::to_string),
            flow: self.export()?,
            decision_type: DecisionType::Btree,
        })
    }

    /// Serializes the graph now and stores it remotely.
    pub async fn save(
        &self,
        engine: &dyn DecisionEngine,
        name: &str,
        description: Option<&str>,
    ) -> ActionOutcome<()> {
        match self.workflow_request(name, description) {
            Ok(request) => actions::save(engine, request).await,
            Err(err) => ActionOutcome::failed(EditorError::from(err).to_string()),
        }
    }

    /// Fetches a merchant's workflow and loads it, returning how many flow
    /// items were dropped.
    pub async fn open(&mut self, engine: &dyn DecisionEngine, merchant_id: &str) -> ActionOutcome<usize> {
        let fetched = actions::fetch(engine, merchant_id).await;
        let Some(data) = fetched.data else {
            return ActionOutcome {
                success: false,
                message: fetched.message,
                data: None,
            };
        };
        match self.apply(EditorCommand::Load(data.into())) {
            CommandOutcome::Loaded { dropped } => ActionOutcome::ok(dropped),
            other => ActionOutcome::failed(format!("unexpected load outcome: {:?}", other)),
        }
    }

    /// Routes a sample transaction through the loaded merchant's stored
    /// workflow.
    pub async fn test_run(
        &self,
        engine: &dyn DecisionEngine,
        amount: &str,
        brand: &str,
        installments: &str,
    ) -> ActionOutcome<Vec<String>> {
        let Some(merchant) = self.merchant.clone() else {
            return ActionOutcome::failed("Load a merchant workflow before testing it.");
        };
        let request = EvaluationRequest {
            merchant_id: merchant,
            amount: amount.to_string(),
            brand: brand.to_string(),
            installments: installments.to_string(),
        };
        actions::evaluate(engine, request).await
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(NodeCatalog::default(), EditorConfig::default())
    }
}

fn relabel_start(graph: &mut Graph, catalog: &NodeCatalog) {
    let Some(def) = catalog.start() else {
        return;
    };
    let Some(id) = graph.start().map(|n| n.id) else {
        return;
    };
    if let Some(node) = graph.node_mut(id) {
        node.fields.label = def.label.clone();
    }
}
