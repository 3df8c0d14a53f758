//! Collaborator service configuration.
//!
//! Endpoints, credentials and timeouts for the decision point, party
//! management and mail sender. Loaded from environment variables with
//! defaults suitable for local development.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::retry::RetryConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required environment variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Configuration for every collaborator client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientsConfig {
    /// Policy decision point.
    pub bouncer: ServiceEndpoint,

    /// Party management service.
    pub party_management: ServiceEndpoint,

    /// Mail sender.
    pub mail_sender: ServiceEndpoint,

    /// Ruleset the decision point evaluates contexts against.
    pub ruleset_id: String,

    /// Prefix of the link mailed to invitees; the accept token is appended.
    pub dashboard_url: String,

    /// Sender address of invitation mails.
    pub mail_from: String,

    /// Request timeout in seconds.
    pub default_timeout_secs: u64,

    /// Attempts per call, the first one included.
    pub max_retries: u32,
}

impl Default for ClientsConfig {
    fn default() -> Self {
        Self {
            bouncer: ServiceEndpoint::local("http://localhost:8022"),
            party_management: ServiceEndpoint::local("http://localhost:8023"),
            mail_sender: ServiceEndpoint::local("http://localhost:8024"),
            ruleset_id: "service/authz/api".to_string(),
            dashboard_url: "http://localhost:3000/organizations/accept-invitation/".to_string(),
            mail_from: "no-reply@localhost".to_string(),
            default_timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl ClientsConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `BOUNCER_URL` / `BOUNCER_API_KEY`: Decision point
    /// - `PARTY_MANAGEMENT_URL` / `PARTY_MANAGEMENT_API_KEY`: Party management
    /// - `MAIL_SENDER_URL` / `MAIL_SENDER_API_KEY`: Mail sender
    /// - `BOUNCER_RULESET_ID`: Ruleset to evaluate (default: service/authz/api)
    /// - `DASHBOARD_URL`: Invitation link prefix
    /// - `MAIL_FROM`: Invitation sender address
    /// - `SERVICE_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
    /// - `SERVICE_MAX_RETRIES`: Attempts per call (default: 3)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            bouncer: ServiceEndpoint::from_env("BOUNCER", default.bouncer),
            party_management: ServiceEndpoint::from_env(
                "PARTY_MANAGEMENT",
                default.party_management,
            ),
            mail_sender: ServiceEndpoint::from_env("MAIL_SENDER", default.mail_sender),
            ruleset_id: std::env::var("BOUNCER_RULESET_ID").unwrap_or(default.ruleset_id),
            dashboard_url: std::env::var("DASHBOARD_URL").unwrap_or(default.dashboard_url),
            mail_from: std::env::var("MAIL_FROM").unwrap_or(default.mail_from),
            default_timeout_secs: std::env::var("SERVICE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.default_timeout_secs),
            max_retries: std::env::var("SERVICE_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.max_retries),
        }
    }

    /// Request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }

    /// Retry policy derived from the attempt limit.
    pub fn retry(&self) -> RetryConfig {
        RetryConfig::with_attempts(self.max_retries)
    }

    /// Reject values the clients cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, endpoint) in [
            ("BOUNCER_URL", &self.bouncer),
            ("PARTY_MANAGEMENT_URL", &self.party_management),
            ("MAIL_SENDER_URL", &self.mail_sender),
        ] {
            if !(endpoint.base_url.starts_with("http://")
                || endpoint.base_url.starts_with("https://"))
            {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("not an http(s) URL: {}", endpoint.base_url),
                });
            }
        }
        if self.ruleset_id.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar("BOUNCER_RULESET_ID".to_string()));
        }
        if self.mail_from.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar("MAIL_FROM".to_string()));
        }
        if self.default_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "SERVICE_TIMEOUT_SECS".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// A single collaborator endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    /// Base URL, e.g. "https://bouncer.internal".
    pub base_url: String,

    /// Bearer key for service-to-service authentication.
    pub api_key: Option<String>,
}

impl ServiceEndpoint {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
        }
    }

    fn local(base_url: &str) -> Self {
        Self::new(base_url, None)
    }

    /// Read `<PREFIX>_URL` and `<PREFIX>_API_KEY`.
    fn from_env(prefix: &str, default: Self) -> Self {
        Self {
            base_url: std::env::var(format!("{prefix}_URL")).unwrap_or(default.base_url),
            api_key: std::env::var(format!("{prefix}_API_KEY")).ok(),
        }
    }

    /// Build a full URL by appending a path to the base URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Attach the bearer key, if any.
    pub(crate) fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}
