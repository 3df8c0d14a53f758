//! Member domain models
//!
//! This module provides the Member entity and the MemberRole entitlements that
//! bind a member to roles within organizations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::organization::Organization;
use crate::roles::{MemberRoleSpec, RoleId, RoleScope};

/// A user's membership record, created lazily on the first join.
///
/// The member id is the external user identity. Roles are stored separately
/// and reference the member by id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    /// External user identity
    pub id: String,

    /// Email the user joined with
    pub email: String,
}

impl Member {
    /// Creates a member record.
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}

/// Role held by a member within one organization.
///
/// # Examples
///
/// ```
/// use orgmgr_domain::{MemberRole, MemberRoleSpec, RoleId};
///
/// let spec = MemberRoleSpec::new(RoleId::Accountant);
/// let role = MemberRole::from_spec("user-1", "org-1", &spec);
/// assert!(role.is_active_in("org-1"));
/// assert!(!role.is_active_in("org-2"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberRole {
    /// Unique member role ID
    pub id: String,

    /// Member holding the role
    pub member_id: String,

    /// Organization the role applies in
    pub organization_id: String,

    /// Granted role
    pub role_id: RoleId,

    /// Optional narrowing to a single resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<RoleScope>,

    /// Whether the role is in effect
    pub active: bool,
}

impl MemberRole {
    /// Materialise a role template as an active role of a member.
    pub fn from_spec(
        member_id: impl Into<String>,
        organization_id: impl Into<String>,
        spec: &MemberRoleSpec,
    ) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            member_id: member_id.into(),
            organization_id: organization_id.into(),
            role_id: spec.role_id,
            scope: spec.scope.clone(),
            active: true,
        }
    }

    /// Check if the role is active within the given organization.
    pub fn is_active_in(&self, organization_id: &str) -> bool {
        self.active && self.organization_id == organization_id
    }

    /// Identifier of the scoped resource, if any.
    pub fn scope_resource_id(&self) -> Option<&str> {
        self.scope.as_ref().map(|s| s.resource_id.as_str())
    }

    /// Template this role was created from.
    pub fn spec(&self) -> MemberRoleSpec {
        MemberRoleSpec {
            role_id: self.role_id,
            scope: self.scope.clone(),
        }
    }
}

/// Roles of a member that are active within one organization.
pub fn active_roles_in<'a>(
    roles: &'a [MemberRole],
    organization_id: &'a str,
) -> impl Iterator<Item = &'a MemberRole> + 'a {
    roles.iter().filter(move |r| r.is_active_in(organization_id))
}

/// Member profile paired with the roles relevant to one organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgMember {
    /// Member profile
    pub member: Member,

    /// Active roles in the organization
    pub roles: Vec<MemberRole>,
}

/// Result of joining or inquiring about an organization membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationMembership {
    /// Member with the roles relevant to the organization
    pub member: OrgMember,

    /// The organization
    pub organization: Organization,
}
