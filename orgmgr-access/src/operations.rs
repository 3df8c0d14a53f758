//! # Operations
//!
//! Defines every access-checked operation. The stable snake_case name of an
//! operation is what the decision point sees and what denial messages carry.

use serde::{Deserialize, Serialize};

/// Operations mediated by the decision point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    // Organizations
    /// Create an organization owned by the caller.
    CreateOrg,
    /// Read one organization.
    GetOrg,
    /// Rename an organization.
    ModifyOrg,
    /// List the caller's organizations.
    ListOrgMembership,

    // Members and roles
    /// Read one member of an organization.
    GetOrgMember,
    /// List the members of an organization.
    ListOrgMembers,
    /// Grant a role to a member.
    AssignMemberRole,
    /// Take a role away from a member.
    RemoveMemberRole,
    /// Remove a member and their roles from an organization.
    ExpelOrgMember,

    // Invitations
    /// Invite someone into an organization.
    CreateInvitation,
    /// Read one invitation.
    GetInvitation,
    /// List the invitations of an organization.
    ListInvitations,
    /// Revoke a pending invitation.
    RevokeInvitation,

    // Caller's own membership
    /// Redeem an invitation token.
    JoinOrg,
    /// Leave an organization.
    CancelOrgMembership,
    /// Read the caller's membership in an organization.
    InquireOrgMembership,

    // Context
    /// Select the caller's working organization.
    SwitchContext,
    /// Read the caller's working organization.
    GetContext,

    // Role catalogue
    /// Read one role of the organization catalogue.
    GetRole,
    /// List the organization catalogue.
    ListRoles,
}

impl Operation {
    /// All operations, in declaration order.
    pub const ALL: [Operation; 20] = [
        Operation::CreateOrg,
        Operation::GetOrg,
        Operation::ModifyOrg,
        Operation::ListOrgMembership,
        Operation::GetOrgMember,
        Operation::ListOrgMembers,
        Operation::AssignMemberRole,
        Operation::RemoveMemberRole,
        Operation::ExpelOrgMember,
        Operation::CreateInvitation,
        Operation::GetInvitation,
        Operation::ListInvitations,
        Operation::RevokeInvitation,
        Operation::JoinOrg,
        Operation::CancelOrgMembership,
        Operation::InquireOrgMembership,
        Operation::SwitchContext,
        Operation::GetContext,
        Operation::GetRole,
        Operation::ListRoles,
    ];

    /// Get the string representation of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateOrg => "create_org",
            Operation::GetOrg => "get_org",
            Operation::ModifyOrg => "modify_org",
            Operation::ListOrgMembership => "list_org_membership",
            Operation::GetOrgMember => "get_org_member",
            Operation::ListOrgMembers => "list_org_members",
            Operation::AssignMemberRole => "assign_member_role",
            Operation::RemoveMemberRole => "remove_member_role",
            Operation::ExpelOrgMember => "expel_org_member",
            Operation::CreateInvitation => "create_invitation",
            Operation::GetInvitation => "get_invitation",
            Operation::ListInvitations => "list_invitations",
            Operation::RevokeInvitation => "revoke_invitation",
            Operation::JoinOrg => "join_org",
            Operation::CancelOrgMembership => "cancel_org_membership",
            Operation::InquireOrgMembership => "inquire_org_membership",
            Operation::SwitchContext => "switch_context",
            Operation::GetContext => "get_context",
            Operation::GetRole => "get_role",
            Operation::ListRoles => "list_roles",
        }
    }

    /// Parse operation from string representation.
    ///
    /// # Example
    ///
    /// ```
    /// use orgmgr_access::Operation;
    ///
    /// assert_eq!(Operation::parse("join_org"), Some(Operation::JoinOrg));
    /// assert_eq!(Operation::parse("drop_org"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == s)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::parse(op.as_str()), Some(op));
        }
    }

    #[test]
    fn test_serde_matches_as_str() {
        for op in Operation::ALL {
            let json = serde_json::to_value(op).unwrap();
            assert_eq!(json, serde_json::Value::String(op.as_str().to_string()));
        }
    }
}
