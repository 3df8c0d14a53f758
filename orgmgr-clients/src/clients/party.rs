//! Party management client.

use super::config::{ClientsConfig, ServiceEndpoint};
use super::{check_status, http_client};
use crate::error::ClientError;
use crate::retry::{with_retry_if, RetryConfig};
use async_trait::async_trait;
use orgmgr_service::{CollaboratorError, PartyProvisioner};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Creates billing parties for new organizations.
#[derive(Clone)]
pub struct PartyClient {
    client: Client,
    endpoint: ServiceEndpoint,
    retry: RetryConfig,
}

/// Body of a party creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePartyRequest {
    pub user_id: String,
    pub email: String,
}

impl PartyClient {
    pub fn new(endpoint: ServiceEndpoint, timeout: Duration, retry: RetryConfig) -> Self {
        Self {
            client: http_client(timeout),
            endpoint,
            retry,
        }
    }

    pub fn from_config(config: &ClientsConfig) -> Self {
        Self::new(
            config.party_management.clone(),
            config.timeout(),
            config.retry(),
        )
    }

    /// Create the party. A party that already exists counts as created.
    #[instrument(skip(self, email))]
    pub async fn provision(
        &self,
        party_id: &str,
        user_id: &str,
        email: &str,
    ) -> Result<(), ClientError> {
        let url = self.endpoint.url(&format!("/v1/parties/{}", party_id));
        let body = CreatePartyRequest {
            user_id: user_id.to_string(),
            email: email.to_string(),
        };

        let result = with_retry_if(
            &self.retry,
            || self.send(&url, &body),
            ClientError::is_retryable,
        )
        .await;

        match result {
            Ok(()) => {
                info!("Party created");
                Ok(())
            }
            Err(ClientError::ApiError { status, .. }) if status == StatusCode::CONFLICT.as_u16() => {
                warn!("Party already exists");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn send(&self, url: &str, body: &CreatePartyRequest) -> Result<(), ClientError> {
        let request = self.endpoint.authorize(self.client.post(url).json(body));
        let response = request.send().await?;
        check_status("party-management", response).await?;
        Ok(())
    }
}

#[async_trait]
impl PartyProvisioner for PartyClient {
    async fn create_party(
        &self,
        party_id: &str,
        user_id: &str,
        email: &str,
    ) -> Result<(), CollaboratorError> {
        self.provision(party_id, user_id, email)
            .await
            .map_err(CollaboratorError::from)
    }
}
