//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the routeflow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use routeflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/flow.json")?;
//! let flow = routeflow::flow::parse_document(&json)?;
//!
//! let loaded = TreeToGraphBuilder::new(&NodeCatalog::default(), &LoaderLayout::default()).build(&flow);
//! let exported = GraphToTreeBuilder::new(&loaded.graph).build()?;
//! assert_eq!(flow, exported);
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::graph::{Branch, Edge, EdgeId, Graph, Node, NodeFields, NodeId, NodeKind, Position};

// Wire document
pub use crate::flow::{FlowItem, WorkflowData, WorkflowRequest, WorkflowSummary};

// Conversion, layout and editing
pub use crate::editor::{CommandOutcome, Editor, EditorCommand};
pub use crate::layout::{LayoutEngine, PositionPlacer};
pub use crate::registry::{Field, NodeCatalog, Operator};
pub use crate::transform::{GraphToTreeBuilder, TreeToGraphBuilder};

// Remote engine and local evaluation
pub use crate::engine::{DecisionEngine, InMemoryDecisionEngine};
pub use crate::evaluator::{Evaluation, EvaluationContext, Evaluator};

// Configuration and errors
pub use crate::config::{EditorConfig, LoaderLayout};
pub use crate::error::{EditorError, EngineError, GraphError, SerializeError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
