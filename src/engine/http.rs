use super::{DecisionEngine, Result};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::flow::{EvaluationRequest, WorkflowData, WorkflowRequest, WorkflowSummary};
use futures::future::BoxFuture;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Talks to the decision engine's REST API.
pub struct HttpDecisionEngine {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct DecodeBody<'a> {
    amount: &'a str,
    brand: &'a str,
    installments: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpDecisionEngine {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds a client honoring the configured base URL and timeout.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| EngineError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends path segments to the base URL, escaping each one.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let invalid = |reason: String| {
            EngineError::Transport(format!("invalid base URL {}: {}", self.base_url, reason))
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        debug!(status = status.as_u16(), ?message, "decision engine rejected request");
        Err(EngineError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| EngineError::Decode(e.to_string()))
    }
}

impl DecisionEngine for HttpDecisionEngine {
    fn persist(&self, request: WorkflowRequest) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let url = self.url(&["orquestration"])?;
            self.send(self.client.post(url).json(&request)).await?;
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<WorkflowSummary>>> {
        Box::pin(async move {
            let url = self.url(&["orquestration"])?;
            let response = self.send(self.client.get(url)).await?;
            Self::json(response).await
        })
    }

    fn fetch(&self, merchant_id: &str) -> BoxFuture<'_, Result<WorkflowData>> {
        let url = self.url(&["orquestration", merchant_id]);
        Box::pin(async move {
            let response = self.send(self.client.get(url?)).await?;
            Self::json(response).await
        })
    }

    fn evaluate(&self, request: EvaluationRequest) -> BoxFuture<'_, Result<Vec<String>>> {
        Box::pin(async move {
            let url = self.url(&["orquestration", &request.merchant_id, "decode"])?;
            let body = DecodeBody {
                amount: &request.amount,
                brand: &request.brand,
                installments: &request.installments,
            };
            let response = self.send(self.client.post(url).json(&body)).await?;
            Self::json(response).await
        })
    }
}
