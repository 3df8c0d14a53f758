//! Invitation lifecycle management
//!
//! Creates invitations, serves them, revokes them, sweeps the expired ones and
//! validates accept tokens. Acceptance itself is finished by the
//! [`MembershipManager`](crate::MembershipManager), which grants the
//! membership in the same commit.

use std::sync::Arc;

use chrono::{Duration, Utc};
use orgmgr_domain::{
    Invitation, InvitationRequest, InvitationStatusName, OrgError, OrgResult, Organization,
};
use orgmgr_store::{ChangeSet, DomainStore, Precondition, StoreError};
use tracing::{debug, info, instrument, warn};

use crate::collaborators::Notifier;

/// Invitation lifecycle manager.
#[derive(Clone)]
pub struct InvitationManager {
    store: Arc<dyn DomainStore>,
    notifier: Arc<dyn Notifier>,
    lifetime: Duration,
}

impl InvitationManager {
    pub fn new(store: Arc<dyn DomainStore>, notifier: Arc<dyn Notifier>, lifetime: Duration) -> Self {
        Self {
            store,
            notifier,
            lifetime,
        }
    }

    /// Create a pending invitation and notify the invitee.
    ///
    /// Notification failures are logged and never fail the call.
    #[instrument(skip(self, request), fields(email = %request.invitee.email()))]
    pub async fn create(&self, org_id: &str, request: InvitationRequest) -> OrgResult<Invitation> {
        let org = self.organization(org_id).await?;

        let email = request.invitee.email().trim();
        if email.is_empty() {
            return Err(OrgError::Validation("invitee email is required".to_string()));
        }
        if request.invitee.roles.is_empty() {
            return Err(OrgError::Validation(
                "invitee needs at least one role".to_string(),
            ));
        }
        for spec in &request.invitee.roles {
            org.validate_role_spec(spec)?;
        }

        let invitation = Invitation::new(&org.id, request, self.lifetime)?;
        self.store
            .commit(ChangeSet::new().put_invitation(invitation.clone()))
            .await?;

        info!(
            invitation_id = %invitation.id,
            expires_at = %invitation.expires_at,
            "Invitation created"
        );

        if let Err(e) = self
            .notifier
            .send_invitation(&invitation.accept_token, invitation.invitee.email())
            .await
        {
            warn!(
                invitation_id = %invitation.id,
                error = %e,
                "Failed to send invitation, continuing"
            );
        }

        Ok(invitation)
    }

    /// Get an invitation by ID.
    pub async fn get(&self, id: &str) -> OrgResult<Invitation> {
        debug!(invitation_id = %id, "Get invitation");
        self.store
            .find_invitation(id)
            .await?
            .ok_or_else(|| OrgError::not_found("invitation", id))
    }

    /// List an organization's invitations.
    ///
    /// With a status filter every matching invitation is returned. Without
    /// one, pending invitations whose expiry has passed are left out even if no
    /// sweep has marked them yet.
    pub async fn list(
        &self,
        org_id: &str,
        status: Option<InvitationStatusName>,
    ) -> OrgResult<Vec<Invitation>> {
        self.organization(org_id).await?;

        let invitations = self.store.organization_invitations(org_id, status).await?;
        if status.is_some() {
            return Ok(invitations);
        }

        let now = Utc::now();
        Ok(invitations
            .into_iter()
            .filter(|i| !i.is_lazily_hidden(now))
            .collect())
    }

    /// Revoke a pending invitation of the organization.
    ///
    /// An invitation accepted or expired after it was read is reported as not
    /// found and left as it is.
    #[instrument(skip(self))]
    pub async fn revoke(&self, org_id: &str, id: &str, reason: &str) -> OrgResult<Invitation> {
        let mut invitation = self
            .store
            .find_invitation(id)
            .await?
            .filter(|i| i.organization_id == org_id)
            .ok_or_else(|| OrgError::not_found("invitation", id))?;

        invitation.revoke(reason, Utc::now())?;
        let changes = ChangeSet::new()
            .require(Precondition::InvitationPending { id: id.to_string() })
            .put_invitation(invitation.clone());

        match self.store.commit(changes).await {
            Ok(()) => {}
            Err(StoreError::PreconditionFailed(detail)) => {
                debug!(%detail, "Invitation left pending state before revocation");
                return Err(OrgError::not_found("pending invitation", id));
            }
            Err(e) => return Err(e.into()),
        }

        info!(invitation_id = %id, "Invitation revoked");
        Ok(invitation)
    }

    /// Mark every pending invitation past its expiry as expired.
    ///
    /// Each invitation is committed on its own and only while still pending,
    /// so one accepted or revoked in the meantime is skipped without holding
    /// back the rest. Returns how many invitations moved. Running it again
    /// right away moves none.
    #[instrument(skip(self))]
    pub async fn sweep_expired(&self) -> OrgResult<usize> {
        let now = Utc::now();
        let mut expired = 0;

        for mut invitation in self.store.pending_invitations().await? {
            if !invitation.expire(now) {
                continue;
            }

            let id = invitation.id.clone();
            let changes = ChangeSet::new()
                .require(Precondition::InvitationPending { id: id.clone() })
                .put_invitation(invitation);

            match self.store.commit(changes).await {
                Ok(()) => expired += 1,
                Err(StoreError::PreconditionFailed(reason)) => {
                    debug!(invitation_id = %id, %reason, "Skipped invitation no longer pending");
                }
                Err(e) => return Err(e.into()),
            }
        }

        if expired > 0 {
            info!(expired, "Expired stale invitations");
        } else {
            debug!("No invitations to expire");
        }
        Ok(expired)
    }

    /// Validate an accept token and return its invitation unchanged.
    ///
    /// # Errors
    ///
    /// - `NotFound` when no invitation carries the token
    /// - `InvitationExpired` when the expiry has passed, whatever the status
    /// - `InvitationRevoked` carrying the revocation reason
    /// - `InvitationAlreadyAccepted` carrying the prior acceptance time
    pub async fn redeem(&self, token: &str) -> OrgResult<Invitation> {
        let invitation = self
            .store
            .find_invitation_by_token(token)
            .await?
            .ok_or_else(|| OrgError::NotFound("invitation for token".to_string()))?;

        invitation.check_redeemable(Utc::now())?;
        Ok(invitation)
    }

    async fn organization(&self, org_id: &str) -> OrgResult<Organization> {
        self.store
            .find_organization(org_id)
            .await?
            .ok_or_else(|| OrgError::not_found("organization", org_id))
    }
}
