//! # RouteFlow - Payment Routing Graph Core
//!
//! **RouteFlow** is the model behind a visual editor for merchant payment-routing
//! rules. Operators draw a tree of condition and provider nodes; RouteFlow keeps
//! that tree consistent, lays it out, and converts it to and from the nested
//! decision-tree document consumed by the remote decision engine.
//!
//! ## Core Workflow
//!
//! 1.  **Edit**: Drive an [`Editor`](editor::Editor) with [`EditorCommand`](editor::EditorCommand)s. Nodes are placed next to their parent without overlapping existing ones.
//! 2.  **Export**: Serialize the graph into a flow document (`Vec<FlowItem>`) rooted at the start node.
//! 3.  **Persist / Test**: Hand the document to a [`DecisionEngine`](engine::DecisionEngine), either the HTTP client or the in-memory engine.
//! 4.  **Load**: Rebuild a positioned graph from a stored document, and re-flow it on demand with the [`LayoutEngine`](layout::LayoutEngine).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use routeflow::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut editor = Editor::default();
//!     let start = editor.graph().start().map(|n| n.id).ok_or("no start node")?;
//!
//!     // Start -> Amount > 100 ? Stripe : Adyen
//!     let amount = match editor.apply(EditorCommand::AddConnectedNode {
//!         definition: "amount".to_string(),
//!         source: start,
//!         branch: Branch::Unlabeled,
//!     }) {
//!         CommandOutcome::NodeAdded { id, .. } => id,
//!         other => return Err(format!("unexpected outcome: {:?}", other).into()),
//!     };
//!     editor.apply(EditorCommand::UpdateCondition {
//!         id: amount,
//!         operator: Some(">".to_string()),
//!         value: Some("100".to_string()),
//!     });
//!     for (definition, branch) in [("provider-stripe", Branch::True), ("provider-adyen", Branch::False)] {
//!         editor.apply(EditorCommand::AddConnectedNode {
//!             definition: definition.to_string(),
//!             source: amount,
//!             branch,
//!         });
//!     }
//!
//!     let flow = editor.export()?;
//!     println!("{}", routeflow::flow::render_document(&flow)?);
//!
//!     let evaluation = Evaluator::new(&flow).evaluate(&EvaluationContext::new().with("AMOUNT", "150"));
//!     println!("-> Providers: {:?}", evaluation.providers);
//!     println!("-> Reason: {}", evaluation.reason());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod flow;
pub mod graph;
pub mod layout;
pub mod prelude;
pub mod registry;
pub mod transform;
