//! External collaborators
//!
//! Contracts for the services organization management calls out to but does
//! not implement: billing party provisioning and invitation delivery.

use async_trait::async_trait;
use thiserror::Error;

/// Collaborator call failure.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// Service could not be reached or failed internally
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Service refused the request
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Creates the billing/ledger party that backs a new organization.
#[async_trait]
pub trait PartyProvisioner: Send + Sync {
    /// Create the party.
    ///
    /// Implementations treat "party already exists" as success.
    async fn create_party(
        &self,
        party_id: &str,
        user_id: &str,
        email: &str,
    ) -> Result<(), CollaboratorError>;
}

/// Delivers invitations to invitees.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send the accept token to the recipient.
    async fn send_invitation(
        &self,
        accept_token: &str,
        recipient_email: &str,
    ) -> Result<(), CollaboratorError>;
}
