//! Invitation domain models
//!
//! An invitation is a time-bounded capability to join an organization with a
//! predefined set of roles. It moves through a small state machine:
//!
//! ```text
//! Pending ──expire──▶ Expired
//!    │
//!    ├──revoke──▶ Revoked
//!    │
//!    └──accept──▶ Accepted
//! ```
//!
//! Expired, Revoked and Accepted are terminal. Every transition is a method on
//! [`Invitation`] that rejects illegal moves.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{OrgError, OrgResult};
use crate::organization::Metadata;
use crate::roles::MemberRoleSpec;

/// Number of random bytes behind an accept token.
const ACCEPT_TOKEN_BYTES: usize = 32;

/// Generate an unguessable accept token.
pub fn generate_accept_token() -> String {
    let mut bytes = [0u8; ACCEPT_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Kind of contact an invitation is delivered to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    #[default]
    Email,
}

/// Where the invitation is sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InviteeContact {
    #[serde(rename = "type", default)]
    pub contact_type: ContactType,
    pub email: String,
}

impl InviteeContact {
    pub fn email(email: impl Into<String>) -> Self {
        Self {
            contact_type: ContactType::Email,
            email: email.into(),
        }
    }
}

/// Who is invited and with which roles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Invitee {
    pub contact: InviteeContact,

    /// Role templates granted on acceptance
    #[serde(default)]
    pub roles: Vec<MemberRoleSpec>,
}

impl Invitee {
    /// Invitee reachable by email with the given role templates.
    pub fn by_email(email: impl Into<String>, roles: Vec<MemberRoleSpec>) -> Self {
        Self {
            contact: InviteeContact::email(email),
            roles,
        }
    }

    pub fn email(&self) -> &str {
        &self.contact.email
    }
}

/// Request to invite someone into an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationRequest {
    pub invitee: Invitee,

    #[serde(default)]
    pub metadata: Metadata,
}

impl InvitationRequest {
    pub fn new(invitee: Invitee) -> Self {
        Self {
            invitee,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Invitation status together with the data that only exists in that status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted {
        accepted_at: DateTime<Utc>,
        accepted_member_id: String,
    },
    Expired,
    Revoked {
        revoked_at: DateTime<Utc>,
        revocation_reason: String,
    },
}

impl InvitationStatus {
    pub fn name(&self) -> InvitationStatusName {
        match self {
            Self::Pending => InvitationStatusName::Pending,
            Self::Accepted { .. } => InvitationStatusName::Accepted,
            Self::Expired => InvitationStatusName::Expired,
            Self::Revoked { .. } => InvitationStatusName::Revoked,
        }
    }
}

/// Status without payload, used for filtering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatusName {
    Pending,
    Accepted,
    Expired,
    Revoked,
}

impl InvitationStatusName {
    /// Parse status from string representation (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "expired" => Some(Self::Expired),
            "revoked" => Some(Self::Revoked),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        }
    }
}

impl std::fmt::Display for InvitationStatusName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invitation to join an organization.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use orgmgr_domain::{Invitation, InvitationRequest, Invitee, MemberRoleSpec, RoleId};
///
/// let request = InvitationRequest::new(Invitee::by_email(
///     "bob@example.com",
///     vec![MemberRoleSpec::new(RoleId::Accountant)],
/// ));
/// let mut invitation = Invitation::new("org-1", request, Duration::days(7)).unwrap();
/// assert!(invitation.is_pending());
///
/// invitation.accept("bob", Utc::now()).unwrap();
/// assert!(invitation.accept("bob", Utc::now()).is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invitation {
    /// Unique invitation ID
    pub id: String,

    /// Organization the invitee will join
    pub organization_id: String,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,

    pub invitee: Invitee,

    #[serde(default)]
    pub metadata: Metadata,

    #[serde(flatten)]
    pub status: InvitationStatus,

    /// Capability credential redeemed by the invitee
    pub accept_token: String,
}

impl Invitation {
    /// Creates a pending invitation expiring `lifetime` from now, with a fresh
    /// accept token.
    ///
    /// # Errors
    ///
    /// `Validation` when the expiry time is not representable.
    pub fn new(
        organization_id: impl Into<String>,
        request: InvitationRequest,
        lifetime: Duration,
    ) -> OrgResult<Self> {
        let created_at = Utc::now();
        let expires_at = created_at.checked_add_signed(lifetime).ok_or_else(|| {
            OrgError::Validation(format!(
                "invitation lifetime of {} days is out of range",
                lifetime.num_days()
            ))
        })?;

        Ok(Self {
            id: Uuid::now_v7().to_string(),
            organization_id: organization_id.into(),
            created_at,
            expires_at,
            invitee: request.invitee,
            metadata: request.metadata,
            status: InvitationStatus::Pending,
            accept_token: generate_accept_token(),
        })
    }

    /// Override the expiry time.
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = expires_at;
        self
    }

    pub fn status_name(&self) -> InvitationStatusName {
        self.status.name()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, InvitationStatus::Pending)
    }

    /// Time-based expiry, independent of the stored status.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Pending rows whose expiry has passed but that no sweep has reached yet.
    /// Unfiltered listings leave these out.
    pub fn is_lazily_hidden(&self, now: DateTime<Utc>) -> bool {
        self.is_pending() && self.is_expired_at(now)
    }

    /// Validate that the invitation can still be redeemed.
    ///
    /// Checks run in a fixed order: time-based expiry first, then revocation,
    /// then prior acceptance.
    pub fn check_redeemable(&self, now: DateTime<Utc>) -> OrgResult<()> {
        if self.is_expired_at(now) {
            return Err(OrgError::InvitationExpired {
                expires_at: self.expires_at,
            });
        }

        match &self.status {
            InvitationStatus::Pending => Ok(()),
            InvitationStatus::Revoked {
                revocation_reason, ..
            } => Err(OrgError::InvitationRevoked {
                reason: revocation_reason.clone(),
            }),
            InvitationStatus::Accepted { accepted_at, .. } => {
                Err(OrgError::InvitationAlreadyAccepted {
                    accepted_at: *accepted_at,
                })
            }
            InvitationStatus::Expired => Err(OrgError::InvitationExpired {
                expires_at: self.expires_at,
            }),
        }
    }

    /// Pending → Accepted.
    pub fn accept(&mut self, member_id: impl Into<String>, now: DateTime<Utc>) -> OrgResult<()> {
        self.check_redeemable(now)?;
        self.status = InvitationStatus::Accepted {
            accepted_at: now,
            accepted_member_id: member_id.into(),
        };
        Ok(())
    }

    /// Pending → Revoked. Any other status reports the invitation as not found.
    pub fn revoke(&mut self, reason: impl Into<String>, now: DateTime<Utc>) -> OrgResult<()> {
        if !self.is_pending() {
            return Err(OrgError::not_found("pending invitation", &self.id));
        }
        self.status = InvitationStatus::Revoked {
            revoked_at: now,
            revocation_reason: reason.into(),
        };
        Ok(())
    }

    /// Pending → Expired when `expires_at < now`. Returns whether it moved.
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_pending() && self.expires_at < now {
            self.status = InvitationStatus::Expired;
            true
        } else {
            false
        }
    }

    pub fn accepted_at(&self) -> Option<DateTime<Utc>> {
        match &self.status {
            InvitationStatus::Accepted { accepted_at, .. } => Some(*accepted_at),
            _ => None,
        }
    }

    pub fn accepted_member_id(&self) -> Option<&str> {
        match &self.status {
            InvitationStatus::Accepted {
                accepted_member_id, ..
            } => Some(accepted_member_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::RoleId;

    fn invitation() -> Invitation {
        let request = InvitationRequest::new(Invitee::by_email(
            "bob@example.com",
            vec![MemberRoleSpec::new(RoleId::Manager)],
        ));
        Invitation::new("org-1", request, Duration::days(7)).unwrap()
    }

    #[test]
    fn test_new_invitation_is_pending() {
        let inv = invitation();
        assert!(inv.is_pending());
        assert_eq!(inv.expires_at - inv.created_at, Duration::days(7));
        assert_eq!(inv.invitee.email(), "bob@example.com");
        assert!(!inv.accept_token.is_empty());
    }

    #[test]
    fn test_unrepresentable_lifetime_is_rejected() {
        let request = InvitationRequest::new(Invitee::by_email(
            "bob@example.com",
            vec![MemberRoleSpec::new(RoleId::Manager)],
        ));
        let result = Invitation::new("org-1", request, Duration::days(i64::from(u32::MAX)));
        assert!(matches!(result, Err(OrgError::Validation(_))));
    }

    #[test]
    fn test_accept_tokens_are_unique() {
        let a = generate_accept_token();
        let b = generate_accept_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(!a.contains('='));
    }

    #[test]
    fn test_accept_records_member() {
        let mut inv = invitation();
        let now = Utc::now();
        inv.accept("user-1", now).unwrap();

        assert_eq!(inv.status_name(), InvitationStatusName::Accepted);
        assert_eq!(inv.accepted_at(), Some(now));
        assert_eq!(inv.accepted_member_id(), Some("user-1"));
    }

    #[test]
    fn test_second_accept_reports_prior_time() {
        let mut inv = invitation();
        let first = Utc::now();
        inv.accept("user-1", first).unwrap();

        match inv.accept("user-2", Utc::now()) {
            Err(OrgError::InvitationAlreadyAccepted { accepted_at }) => {
                assert_eq!(accepted_at, first)
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(inv.accepted_member_id(), Some("user-1"));
    }

    #[test]
    fn test_time_expiry_takes_priority() {
        let mut inv = invitation();
        inv.revoke("wrong address", Utc::now()).unwrap();
        let inv = inv.with_expires_at(Utc::now() - Duration::hours(1));

        assert!(matches!(
            inv.check_redeemable(Utc::now()),
            Err(OrgError::InvitationExpired { .. })
        ));
    }

    #[test]
    fn test_revoked_carries_reason() {
        let mut inv = invitation();
        inv.revoke("wrong address", Utc::now()).unwrap();

        match inv.check_redeemable(Utc::now()) {
            Err(OrgError::InvitationRevoked { reason }) => assert_eq!(reason, "wrong address"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_revoke_requires_pending() {
        let mut inv = invitation();
        inv.accept("user-1", Utc::now()).unwrap();
        assert!(matches!(
            inv.revoke("late", Utc::now()),
            Err(OrgError::NotFound(_))
        ));
        assert_eq!(inv.status_name(), InvitationStatusName::Accepted);
    }

    #[test]
    fn test_expire_only_moves_pending_past_expiry() {
        let mut fresh = invitation();
        assert!(!fresh.expire(Utc::now()));

        let mut stale = invitation().with_expires_at(Utc::now() - Duration::minutes(1));
        assert!(stale.expire(Utc::now()));
        assert!(!stale.expire(Utc::now()));
        assert_eq!(stale.status_name(), InvitationStatusName::Expired);

        let mut accepted = invitation();
        accepted.accept("user-1", Utc::now()).unwrap();
        let mut accepted = accepted.with_expires_at(Utc::now() - Duration::minutes(1));
        assert!(!accepted.expire(Utc::now()));
        assert_eq!(accepted.status_name(), InvitationStatusName::Accepted);
    }

    #[test]
    fn test_lazily_hidden() {
        let stale = invitation().with_expires_at(Utc::now() - Duration::minutes(1));
        assert!(stale.is_lazily_hidden(Utc::now()));
        assert!(!invitation().is_lazily_hidden(Utc::now()));
    }

    #[test]
    fn test_status_serializes_flat() {
        let mut inv = invitation();
        inv.revoke("duplicate", Utc::now()).unwrap();

        let json = serde_json::to_value(&inv).unwrap();
        assert_eq!(json["status"], "revoked");
        assert_eq!(json["revocation_reason"], "duplicate");
        assert_eq!(json["invitee"]["contact"]["type"], "email");

        let back: Invitation = serde_json::from_value(json).unwrap();
        assert_eq!(back, inv);
    }
}
