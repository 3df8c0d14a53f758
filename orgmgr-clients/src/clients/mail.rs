//! Invitation mail client.

use super::config::{ClientsConfig, ServiceEndpoint};
use super::{check_status, http_client};
use crate::error::ClientError;
use crate::retry::{with_retry_if, RetryConfig};
use async_trait::async_trait;
use orgmgr_service::{CollaboratorError, Notifier};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument};

/// Subject line of every invitation mail.
pub const INVITATION_SUBJECT: &str = "Confirm joining the organization";

/// Sends invitation links through the mail sender service.
#[derive(Clone)]
pub struct MailClient {
    client: Client,
    endpoint: ServiceEndpoint,
    dashboard_url: String,
    mail_from: String,
    retry: RetryConfig,
}

/// Body of a mail request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MailMessage {
    pub to: Vec<String>,
    pub from: String,
    pub subject: String,
    pub body: String,
}

impl MailClient {
    pub fn new(
        endpoint: ServiceEndpoint,
        dashboard_url: impl Into<String>,
        mail_from: impl Into<String>,
        timeout: Duration,
        retry: RetryConfig,
    ) -> Self {
        Self {
            client: http_client(timeout),
            endpoint,
            dashboard_url: dashboard_url.into(),
            mail_from: mail_from.into(),
            retry,
        }
    }

    pub fn from_config(config: &ClientsConfig) -> Self {
        Self::new(
            config.mail_sender.clone(),
            config.dashboard_url.clone(),
            config.mail_from.clone(),
            config.timeout(),
            config.retry(),
        )
    }

    /// The message inviting `recipient` with `accept_token`.
    pub fn invitation_message(&self, accept_token: &str, recipient: &str) -> MailMessage {
        MailMessage {
            to: vec![recipient.to_string()],
            from: self.mail_from.clone(),
            subject: INVITATION_SUBJECT.to_string(),
            body: format!("{}{}", self.dashboard_url, accept_token),
        }
    }

    /// Mail the invitation link.
    #[instrument(skip(self, accept_token))]
    pub async fn send_invitation_mail(
        &self,
        accept_token: &str,
        recipient: &str,
    ) -> Result<(), ClientError> {
        let message = self.invitation_message(accept_token, recipient);

        with_retry_if(
            &self.retry,
            || self.send(&message),
            ClientError::is_retryable,
        )
        .await?;

        info!("Invitation mail sent");
        Ok(())
    }

    async fn send(&self, message: &MailMessage) -> Result<(), ClientError> {
        let url = self.endpoint.url("/v1/messages");
        let request = self.endpoint.authorize(self.client.post(&url).json(message));
        let response = request.send().await?;
        check_status("mail-sender", response).await?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for MailClient {
    async fn send_invitation(
        &self,
        accept_token: &str,
        recipient_email: &str,
    ) -> Result<(), CollaboratorError> {
        self.send_invitation_mail(accept_token, recipient_email)
            .await
            .map_err(CollaboratorError::from)
    }
}
