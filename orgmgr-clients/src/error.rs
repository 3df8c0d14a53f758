//! Client errors.

use orgmgr_access::DecisionError;
use orgmgr_service::CollaboratorError;
use thiserror::Error;

/// Failure talking to a collaborator service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Service answered with an error status.
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Error body returned by the service.
        message: String,
    },

    /// Service answered with a body we could not use.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Service rejected our credentials.
    #[error("Authentication failed")]
    AuthenticationFailed,
}

impl ClientError {
    /// Transport failures and server-side errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::RequestFailed(_) => true,
            ClientError::ApiError { status, .. } => *status >= 500,
            ClientError::InvalidResponse(_) | ClientError::AuthenticationFailed => false,
        }
    }
}

impl From<ClientError> for DecisionError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::InvalidResponse(message) => DecisionError::InvalidResponse(message),
            other => DecisionError::Unavailable(other.to_string()),
        }
    }
}

impl From<ClientError> for CollaboratorError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ApiError { status, message } if status < 500 => {
                CollaboratorError::Rejected(format!("{}: {}", status, message))
            }
            other => CollaboratorError::Unavailable(other.to_string()),
        }
    }
}
