//! Organization domain models
//!
//! This module provides the Organization entity, the request to create one, and
//! the cursor-paginated page type used when listing a user's organizations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::OrgResult;
use crate::roles::{self, MemberRoleSpec, RoleDefinition, RoleId};

/// Opaque key-value metadata attached to organizations and invitations.
pub type Metadata = HashMap<String, serde_json::Value>;

/// Page size used when a listing does not specify one.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// An organization is the tenant and billing entity that owns members, a role
/// catalogue and a party identity.
///
/// Membership is not stored on the organization; it is an explicit link
/// collection kept by the domain store.
///
/// # Examples
///
/// ```
/// use orgmgr_domain::Organization;
///
/// let org = Organization::new("Acme", "user-1");
/// assert_eq!(org.name, "Acme");
/// assert!(org.is_owned_by("user-1"));
/// assert_ne!(org.party, org.id);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    /// Unique identifier for the organization
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Owner user ID (the user who created the org), immutable
    pub owner: String,

    /// Billing/ledger identity provisioned with the organization, immutable
    pub party: String,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// Custom metadata for extensibility
    #[serde(default)]
    pub metadata: Metadata,

    /// Roles available to members of this organization
    #[serde(default)]
    pub roles: Vec<RoleDefinition>,
}

impl Organization {
    /// Creates a new organization with the default role catalogue.
    ///
    /// The organization is created with:
    /// - A newly generated UUID v7 ID
    /// - A newly generated UUID v7 party ID
    /// - Current timestamp for created_at
    /// - Empty metadata
    ///
    /// # Arguments
    ///
    /// * `name` - The organization name
    /// * `owner` - The user ID who owns this organization
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            name: name.into(),
            owner: owner.into(),
            party: Uuid::now_v7().to_string(),
            created_at: Utc::now(),
            metadata: Metadata::new(),
            roles: roles::default_catalogue(),
        }
    }

    /// Set the organization metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Replace the role catalogue.
    pub fn with_roles(mut self, roles: Vec<RoleDefinition>) -> Self {
        self.roles = roles;
        self
    }

    /// Check if the given user owns this organization.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner == user_id
    }

    /// Look up a role in this organization's catalogue.
    pub fn role(&self, role_id: RoleId) -> Option<&RoleDefinition> {
        self.roles.iter().find(|r| r.role_id == role_id)
    }

    /// Validate a role template against this organization's catalogue.
    pub fn validate_role_spec(&self, spec: &MemberRoleSpec) -> OrgResult<()> {
        roles::validate_spec(&self.roles, spec)
    }

    /// Rename the organization. Owner and party never change.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

/// Request to create an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOrganization {
    /// Organization name
    pub name: String,

    /// Custom metadata
    #[serde(default)]
    pub metadata: Metadata,
}

impl NewOrganization {
    /// Creates a request with empty metadata.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: Metadata::new(),
        }
    }
}

/// One page of a cursor-paginated organization listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationPage {
    /// Organizations in this page, ordered by id
    pub result: Vec<Organization>,

    /// Id of the last organization in this page when more remain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

impl OrganizationPage {
    /// Cut one page from the remaining, id-ordered candidates.
    ///
    /// `limit` of `None` or `0` falls back to [`DEFAULT_PAGE_LIMIT`]. The
    /// continuation token is set only when candidates were left out.
    ///
    /// # Examples
    ///
    /// ```
    /// use orgmgr_domain::{Organization, OrganizationPage};
    ///
    /// let orgs: Vec<_> = (0..3).map(|i| Organization::new(format!("org-{i}"), "u")).collect();
    /// let page = OrganizationPage::from_remaining(orgs.clone(), Some(2));
    /// assert_eq!(page.result.len(), 2);
    /// assert_eq!(page.continuation_token.as_deref(), Some(orgs[1].id.as_str()));
    ///
    /// let last = OrganizationPage::from_remaining(orgs[2..].to_vec(), Some(2));
    /// assert!(last.continuation_token.is_none());
    /// ```
    pub fn from_remaining(mut remaining: Vec<Organization>, limit: Option<usize>) -> Self {
        let limit = match limit {
            None | Some(0) => DEFAULT_PAGE_LIMIT,
            Some(n) => n,
        };

        if remaining.len() <= limit {
            return Self {
                result: remaining,
                continuation_token: None,
            };
        }

        remaining.truncate(limit);
        let continuation_token = remaining.last().map(|o| o.id.clone());
        Self {
            result: remaining,
            continuation_token,
        }
    }
}
