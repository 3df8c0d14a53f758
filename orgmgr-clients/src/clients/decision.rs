//! Bouncer decision point client.
//!
//! Posts the policy context to the judge endpoint and reads back the
//! resolution.

use super::config::{ClientsConfig, ServiceEndpoint};
use super::{handle_response, http_client};
use crate::error::ClientError;
use crate::retry::{with_retry_if, RetryConfig};
use async_trait::async_trait;
use orgmgr_access::{DecisionError, DecisionPoint, PolicyContext, Resolution};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Decision point reached over HTTP.
#[derive(Clone)]
pub struct DecisionClient {
    client: Client,
    endpoint: ServiceEndpoint,
    ruleset_id: String,
    retry: RetryConfig,
}

/// Body of a judge request.
#[derive(Debug, Serialize)]
pub struct JudgeRequest<'a> {
    pub ruleset_id: &'a str,
    pub context: &'a PolicyContext,
}

/// Body of a judge response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeResponse {
    pub resolution: Resolution,
}

impl DecisionClient {
    pub fn new(
        endpoint: ServiceEndpoint,
        ruleset_id: impl Into<String>,
        timeout: Duration,
        retry: RetryConfig,
    ) -> Self {
        Self {
            client: http_client(timeout),
            endpoint,
            ruleset_id: ruleset_id.into(),
            retry,
        }
    }

    pub fn from_config(config: &ClientsConfig) -> Self {
        Self::new(
            config.bouncer.clone(),
            config.ruleset_id.clone(),
            config.timeout(),
            config.retry(),
        )
    }

    /// Ask for a resolution of the context.
    #[instrument(skip(self, context), fields(operation = %context.operation))]
    pub async fn judge(&self, context: &PolicyContext) -> Result<Resolution, ClientError> {
        let body = JudgeRequest {
            ruleset_id: &self.ruleset_id,
            context,
        };

        let resolution = with_retry_if(
            &self.retry,
            || self.send(&body),
            ClientError::is_retryable,
        )
        .await?;

        debug!(?resolution, "Judged");
        Ok(resolution)
    }

    async fn send(&self, body: &JudgeRequest<'_>) -> Result<Resolution, ClientError> {
        let url = self.endpoint.url("/v1/judge");
        let request = self.endpoint.authorize(self.client.post(&url).json(body));

        let response = request.send().await?;
        let judged: JudgeResponse = handle_response("bouncer", response).await?;
        Ok(judged.resolution)
    }
}

#[async_trait]
impl DecisionPoint for DecisionClient {
    async fn decide(&self, context: &PolicyContext) -> Result<Resolution, DecisionError> {
        self.judge(context).await.map_err(DecisionError::from)
    }
}
