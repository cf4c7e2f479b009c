//! The remote decision engine that stores workflows and routes transactions
//! through them.
//!
//! The editor only ever talks to a [`DecisionEngine`]; which one sits behind
//! it is chosen by the caller. Every call takes owned data, so a persisted
//! document is a snapshot of the graph at call time.

use crate::error::EngineError;
use crate::flow::{EvaluationRequest, WorkflowData, WorkflowRequest, WorkflowSummary};
use futures::future::BoxFuture;

pub mod actions;
#[cfg(feature = "http")]
mod http;
mod memory;

#[cfg(feature = "http")]
pub use http::HttpDecisionEngine;
pub use memory::InMemoryDecisionEngine;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Storage and evaluation of routing workflows.
pub trait DecisionEngine: Send + Sync {
    /// Stores a workflow. The last write for a merchant wins.
    fn persist(&self, request: WorkflowRequest) -> BoxFuture<'_, Result<()>>;

    /// Lists every stored workflow.
    fn list(&self) -> BoxFuture<'_, Result<Vec<WorkflowSummary>>>;

    /// Fetches the workflow stored for one merchant.
    fn fetch(&self, merchant_id: &str) -> BoxFuture<'_, Result<WorkflowData>>;

    /// Routes a sample transaction and returns the providers chosen.
    fn evaluate(&self, request: EvaluationRequest) -> BoxFuture<'_, Result<Vec<String>>>;
}
