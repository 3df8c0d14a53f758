//! # Resource Descriptors
//!
//! A resource descriptor names the entities an in-flight operation touches.
//! Each facade operation builds one from its request before the access check.

use orgmgr_domain::RoleId;
use serde::{Deserialize, Serialize};

/// Identifiers of the resources referenced by a request.
///
/// # Example
///
/// ```
/// use orgmgr_access::ResourceDescriptor;
/// use orgmgr_domain::RoleId;
///
/// let resource = ResourceDescriptor::organization("org-1")
///     .with_member("user-2")
///     .with_role(RoleId::Manager, Some("shop-1".to_string()));
///
/// assert_eq!(resource.org_id.as_deref(), Some("org-1"));
/// assert_eq!(resource.role_id, Some(RoleId::Manager));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Organization, resolved to owner and party through the store
    pub org_id: Option<String>,

    /// Member the operation targets
    pub member_id: Option<String>,

    /// Invitation the operation targets
    pub invitation_id: Option<String>,

    /// Invitee email
    pub email: Option<String>,

    /// Accept token, resolved to its organization
    pub invitation_token: Option<String>,

    /// Role named by the request
    pub role_id: Option<RoleId>,

    /// Resource the named role is scoped to
    pub scope_resource_id: Option<String>,

    /// Member role, resolved to its role and scope through the store
    pub member_role_id: Option<String>,
}

impl ResourceDescriptor {
    /// Descriptor without any resource.
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor referencing an organization.
    pub fn organization(org_id: impl Into<String>) -> Self {
        Self {
            org_id: Some(org_id.into()),
            ..Self::default()
        }
    }

    /// Descriptor referencing an invitation by its accept token.
    pub fn invitation_token(token: impl Into<String>) -> Self {
        Self {
            invitation_token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn with_member(mut self, member_id: impl Into<String>) -> Self {
        self.member_id = Some(member_id.into());
        self
    }

    pub fn with_invitation(mut self, invitation_id: impl Into<String>) -> Self {
        self.invitation_id = Some(invitation_id.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_role(mut self, role_id: RoleId, scope_resource_id: Option<String>) -> Self {
        self.role_id = Some(role_id);
        self.scope_resource_id = scope_resource_id;
        self
    }

    pub fn with_member_role(mut self, member_role_id: impl Into<String>) -> Self {
        self.member_role_id = Some(member_role_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_descriptor() {
        let resource = ResourceDescriptor::organization("o").with_member("m");
        assert_eq!(resource.org_id.as_deref(), Some("o"));
        assert_eq!(resource.member_id.as_deref(), Some("m"));
        assert!(resource.invitation_id.is_none());
        assert_ne!(resource, ResourceDescriptor::new());
    }

    #[test]
    fn test_invitation_descriptor() {
        let resource = ResourceDescriptor::organization("org-1")
            .with_invitation("inv-1")
            .with_email("bob@example.com");

        assert_eq!(resource.invitation_id.as_deref(), Some("inv-1"));
        assert_eq!(resource.email.as_deref(), Some("bob@example.com"));
        assert!(resource.invitation_token.is_none());
    }
}
