use super::FlowItem;
use serde::{Deserialize, Serialize};

/// How the remote engine should interpret a stored flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DecisionType {
    Rules,
    /// Nested decision tree. This is what the editor produces.
    #[default]
    Btree,
}

/// Body of a persist call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub flow: Vec<FlowItem>,
    #[serde(default)]
    pub decision_type: DecisionType,
}

/// One entry of the stored-workflow listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_code: Option<String>,
    #[serde(default)]
    pub flow: Vec<FlowItem>,
}

/// A single stored workflow, as returned by a fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_code: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub decision_type: DecisionType,
    #[serde(default)]
    pub flow: Vec<FlowItem>,
}

impl From<WorkflowData> for WorkflowSummary {
    fn from(data: WorkflowData) -> Self {
        Self {
            name: data.name,
            description: data.description,
            merchant_code: data.merchant_code,
            flow: data.flow,
        }
    }
}

/// Transaction attributes submitted for a dry-run evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub merchant_id: String,
    pub amount: String,
    pub brand: String,
    pub installments: String,
}
