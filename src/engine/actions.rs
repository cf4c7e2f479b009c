//! Remote calls wrapped into outcomes a user interface can show directly.
//!
//! No error escapes this layer: a failure becomes an unsuccessful
//! [`ActionOutcome`] carrying the remote message, or a generic one when the
//! remote gave none.

use super::DecisionEngine;
use crate::error::EngineError;
use crate::flow::{EvaluationRequest, WorkflowData, WorkflowRequest, WorkflowSummary};
use serde::Serialize;
use tracing::error;

/// Shown when a failure carries no message of its own.
pub const UNEXPECTED_ERROR: &str = "Unexpected error, try again in a few minutes.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ActionOutcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    fn from_result(result: Result<T, EngineError>, context: &str) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => {
                error!(error = %err, "{}", context);
                Self::failed(err.remote_message().unwrap_or(UNEXPECTED_ERROR))
            }
        }
    }
}

pub async fn save(engine: &dyn DecisionEngine, request: WorkflowRequest) -> ActionOutcome<()> {
    ActionOutcome::from_result(engine.persist(request).await, "failed to save workflow")
}

pub async fn list(engine: &dyn DecisionEngine) -> ActionOutcome<Vec<WorkflowSummary>> {
    ActionOutcome::from_result(engine.list().await, "failed to list workflows")
}

pub async fn fetch(engine: &dyn DecisionEngine, merchant_id: &str) -> ActionOutcome<WorkflowData> {
    ActionOutcome::from_result(engine.fetch(merchant_id).await, "failed to fetch workflow")
}

pub async fn evaluate(
    engine: &dyn DecisionEngine,
    request: EvaluationRequest,
) -> ActionOutcome<Vec<String>> {
    ActionOutcome::from_result(engine.evaluate(request).await, "failed to test workflow")
}
