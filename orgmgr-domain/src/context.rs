//! Member context for organization switching
//!
//! This module provides the MemberContext type that records which organization a
//! member is currently working in, so the selection survives across sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Member's current working organization.
///
/// At most one context exists per member. It is created on the first switch,
/// updated on later switches and never deleted implicitly.
///
/// # Examples
///
/// ```
/// use orgmgr_domain::MemberContext;
///
/// let mut ctx = MemberContext::new("user-1", "org-1");
/// ctx.switch_organization("org-2");
/// assert_eq!(ctx.organization_id, "org-2");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberContext {
    /// Member (user) ID
    pub member_id: String,

    /// Currently selected organization
    pub organization_id: String,

    /// Last updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl MemberContext {
    /// Creates a context pointing at the given organization.
    pub fn new(member_id: impl Into<String>, organization_id: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            organization_id: organization_id.into(),
            updated_at: Utc::now(),
        }
    }

    /// Switch to a different organization.
    pub fn switch_organization(&mut self, organization_id: impl Into<String>) {
        self.organization_id = organization_id.into();
        self.updated_at = Utc::now();
    }
}
