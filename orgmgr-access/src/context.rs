//! Policy context
//!
//! The structure handed to the decision point. It is plain data: the operation
//! name, who is calling and which resources are involved, already resolved to
//! the attributes policies match on.

use orgmgr_domain::{MemberRole, Organization, RoleId};
use serde::{Deserialize, Serialize};

use crate::operations::Operation;

/// Role attributes as seen by policies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleFragment {
    pub role_id: RoleId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_resource_id: Option<String>,
}

impl From<&MemberRole> for RoleFragment {
    fn from(role: &MemberRole) -> Self {
        Self {
            role_id: role.role_id,
            scope_resource_id: role.scope_resource_id().map(str::to_string),
        }
    }
}

/// Organization attributes as seen by policies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationFragment {
    pub id: String,
    pub owner: String,
    pub party: String,
}

impl From<&Organization> for OrganizationFragment {
    fn from(org: &Organization) -> Self {
        Self {
            id: org.id.clone(),
            owner: org.owner.clone(),
            party: org.party.clone(),
        }
    }
}

/// One organization the caller belongs to, with the caller's roles in it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserOrgFragment {
    pub id: String,
    pub owner: String,
    pub party: String,

    #[serde(default)]
    pub roles: Vec<RoleFragment>,
}

/// The calling user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserFragment {
    pub id: String,
    pub email: String,

    /// Owned and joined organizations
    #[serde(default)]
    pub orgs: Vec<UserOrgFragment>,
}

/// Member the operation targets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberFragment {
    pub id: String,
}

/// Invitation the operation targets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvitationFragment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Everything the decision point needs to judge one operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyContext {
    pub operation: Operation,

    pub user: UserFragment,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<OrganizationFragment>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<MemberFragment>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitation: Option<InvitationFragment>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleFragment>,
}

impl PolicyContext {
    /// Context carrying only the operation and the caller.
    pub fn new(operation: Operation, user: UserFragment) -> Self {
        Self {
            operation,
            user,
            organization: None,
            member: None,
            invitation: None,
            role: None,
        }
    }

    /// Encode as JSON for transport.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_json_shape() {
        let mut ctx = PolicyContext::new(
            Operation::AssignMemberRole,
            UserFragment {
                id: "alice".into(),
                email: "alice@example.com".into(),
                orgs: Vec::new(),
            },
        );
        ctx.member = Some(MemberFragment { id: "bob".into() });
        ctx.role = Some(RoleFragment {
            role_id: RoleId::Manager,
            scope_resource_id: Some("shop-1".into()),
        });

        let json = ctx.to_json();
        assert_eq!(json["operation"], "assign_member_role");
        assert_eq!(json["member"]["id"], "bob");
        assert_eq!(json["role"]["role_id"], "Manager");
        assert_eq!(json["role"]["scope_resource_id"], "shop-1");
        assert!(json.get("organization").is_none());
        assert!(json.get("invitation").is_none());
    }
}
