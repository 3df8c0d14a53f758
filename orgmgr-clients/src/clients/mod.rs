//! Collaborator service clients.
//!
//! - Bouncer: policy decision point judging every operation
//! - Party management: billing party creation for new organizations
//! - Mail sender: invitation delivery
//!
//! Each client implements the matching contract from `orgmgr-access` or
//! `orgmgr-service`, so the manager can be wired to real services.

pub mod config;
pub mod decision;
pub mod mail;
pub mod party;

pub use config::{ClientsConfig, ServiceEndpoint};
pub use decision::DecisionClient;
pub use mail::MailClient;
pub use party::PartyClient;

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{error, warn};

use crate::error::ClientError;

pub(crate) fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to build HTTP client")
}

/// Map error statuses, then decode the body.
pub(crate) async fn handle_response<T>(
    service: &'static str,
    response: reqwest::Response,
) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    let response = check_status(service, response).await?;
    response
        .json()
        .await
        .map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

/// Map error statuses, leaving the body unread.
pub(crate) async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        error!(service, "Authentication failed");
        return Err(ClientError::AuthenticationFailed);
    }

    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        warn!(service, status = status.as_u16(), %message, "API error");
        return Err(ClientError::ApiError {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}
