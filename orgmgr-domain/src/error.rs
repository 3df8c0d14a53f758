//! Error types for organization management operations
//!
//! This module defines the error taxonomy shared by every crate in the
//! workspace: lookup failures, authorization denials, invitation terminal-state
//! violations, the last-role guard and dependency failures.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Organization management error types.
///
/// Invitation errors carry the prior-state detail (expiry time, acceptance
/// time, revocation reason) so callers can build user-facing messages.
#[derive(Debug, Error)]
pub enum OrgError {
    /// Referenced organization, member, invitation or role is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Decision point restricted the operation, or the caller does not match
    /// the referenced resource
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Invitation expiry time has passed
    #[error("Invitation expired at {expires_at}")]
    InvitationExpired {
        /// When the invitation expired
        expires_at: DateTime<Utc>,
    },

    /// Invitation was already redeemed
    #[error("Invitation already accepted at {accepted_at}")]
    InvitationAlreadyAccepted {
        /// When the invitation was accepted
        accepted_at: DateTime<Utc>,
    },

    /// Invitation was revoked by an organization administrator
    #[error("Invitation revoked: {reason}")]
    InvitationRevoked {
        /// Reason given at revocation
        reason: String,
    },

    /// Attempted removal of a member's only active role in an organization
    #[error("Cannot remove the last active role of an organization member")]
    LastRoleViolation,

    /// Decision point or provisioning call failed
    #[error("Dependency failure: {0}")]
    DependencyFailure(String),

    /// Request failed domain validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Domain store failure
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for organization management operations.
pub type OrgResult<T> = Result<T, OrgError>;

impl OrgError {
    /// Shorthand for a not-found error naming the entity and its id.
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        OrgError::NotFound(format!("{} {}", entity, id))
    }

    /// Check if this error should be logged at error level.
    ///
    /// Lookup failures, denials and invitation state violations are expected
    /// outcomes of user input.
    pub fn is_server_error(&self) -> bool {
        matches!(self, OrgError::DependencyFailure(_) | OrgError::Storage(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            OrgError::NotFound(_) => 404,
            OrgError::AccessDenied(_) => 403,
            OrgError::InvitationExpired { .. }
            | OrgError::InvitationAlreadyAccepted { .. }
            | OrgError::InvitationRevoked { .. }
            | OrgError::LastRoleViolation
            | OrgError::Validation(_) => 400,
            OrgError::DependencyFailure(_) => 502,
            OrgError::Storage(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            OrgError::NotFound(_) => "NOT_FOUND",
            OrgError::AccessDenied(_) => "ACCESS_DENIED",
            OrgError::InvitationExpired { .. } => "INVITATION_EXPIRED",
            OrgError::InvitationAlreadyAccepted { .. } => "INVITATION_ALREADY_ACCEPTED",
            OrgError::InvitationRevoked { .. } => "INVITATION_REVOKED",
            OrgError::LastRoleViolation => "LAST_ROLE",
            OrgError::DependencyFailure(_) => "DEPENDENCY_FAILURE",
            OrgError::Validation(_) => "VALIDATION_ERROR",
            OrgError::Storage(_) => "STORAGE_ERROR",
        }
    }
}
