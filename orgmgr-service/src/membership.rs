//! Membership and role management
//!
//! Owns the rules around who belongs to an organization and with which roles:
//! joining through an invitation, role assignment and removal, expulsion and
//! the read views over members.

use std::sync::Arc;

use chrono::Utc;
use orgmgr_domain::{
    active_roles_in, Caller, Member, MemberRole, MemberRoleSpec, OrgError, OrgMember, OrgResult,
    Organization, OrganizationMembership,
};
use orgmgr_store::{ChangeSet, DomainStore, Precondition, StoreError};
use tracing::{debug, info, instrument, warn};

use crate::invitation::InvitationManager;

/// Membership and role manager.
#[derive(Clone)]
pub struct MembershipManager {
    store: Arc<dyn DomainStore>,
    invitations: InvitationManager,
}

impl MembershipManager {
    pub fn new(store: Arc<dyn DomainStore>, invitations: InvitationManager) -> Self {
        Self { store, invitations }
    }

    /// Redeem an invitation and make the caller a member of its organization.
    ///
    /// The member record, the granted roles, the membership link and the
    /// accepted invitation are written in one commit that only succeeds while
    /// the invitation is still pending.
    #[instrument(skip(self, token, caller), fields(user_id = %caller.id))]
    pub async fn join(&self, token: &str, caller: &Caller) -> OrgResult<OrganizationMembership> {
        let invitation = self.invitations.redeem(token).await?;

        if !caller.email_matches(invitation.invitee.email()) {
            warn!(
                invitation_id = %invitation.id,
                "Invitation redeemed with a different email"
            );
            return Err(OrgError::AccessDenied(
                "invitation was issued to a different email".to_string(),
            ));
        }

        let org = self.organization(&invitation.organization_id).await?;
        let member = match self.store.find_member(&caller.id).await? {
            Some(member) => member,
            None => Member::new(&caller.id, &caller.email),
        };

        let granted: Vec<MemberRole> = invitation
            .invitee
            .roles
            .iter()
            .map(|spec| MemberRole::from_spec(&member.id, &org.id, spec))
            .collect();

        let mut accepted = invitation.clone();
        accepted.accept(&member.id, Utc::now())?;

        let mut changes = ChangeSet::new()
            .require(Precondition::InvitationPending {
                id: invitation.id.clone(),
            })
            .put_member(member.clone());
        for role in &granted {
            changes = changes.put_member_role(role.clone());
        }
        let changes = changes
            .link_member(&org.id, &member.id)
            .put_invitation(accepted);

        match self.store.commit(changes).await {
            Ok(()) => {}
            Err(StoreError::PreconditionFailed(reason)) => {
                debug!(%reason, "Invitation changed while joining");
                let current = self.invitations.get(&invitation.id).await?;
                current.check_redeemable(Utc::now())?;
                return Err(OrgError::Storage(reason));
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            org_id = %org.id,
            invitation_id = %invitation.id,
            roles = granted.len(),
            "Member joined organization"
        );

        let roles = self.active_roles(&org.id, &member.id).await?;
        Ok(OrganizationMembership {
            member: OrgMember { member, roles },
            organization: org,
        })
    }

    /// Grant a role to an existing member.
    ///
    /// Duplicates of an already held role are allowed.
    #[instrument(skip(self, spec), fields(role_id = %spec.role_id))]
    pub async fn assign_role(
        &self,
        org_id: &str,
        user_id: &str,
        spec: &MemberRoleSpec,
    ) -> OrgResult<MemberRole> {
        let org = self.organization(org_id).await?;
        self.require_member(org_id, user_id).await?;
        org.validate_role_spec(spec)?;

        let role = MemberRole::from_spec(user_id, org_id, spec);
        self.store
            .commit(ChangeSet::new().put_member_role(role.clone()))
            .await?;

        info!(member_role_id = %role.id, "Role assigned");
        Ok(role)
    }

    /// Take a role away from a member.
    ///
    /// The role is detached from the member and deleted from the store. The
    /// returned value is the role as it was before removal.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the organization, the membership or the role is
    ///   missing, or the role belongs to someone else
    /// - `LastRoleViolation` when it is the member's only active role in the
    ///   organization
    #[instrument(skip(self))]
    pub async fn remove_role(
        &self,
        org_id: &str,
        user_id: &str,
        member_role_id: &str,
    ) -> OrgResult<MemberRole> {
        self.organization(org_id).await?;
        self.require_member(org_id, user_id).await?;

        let roles = self.store.member_roles(user_id).await?;
        let active: Vec<&MemberRole> = active_roles_in(&roles, org_id).collect();
        if active.len() == 1 {
            return Err(OrgError::LastRoleViolation);
        }

        let role = active
            .into_iter()
            .find(|r| r.id == member_role_id)
            .cloned()
            .ok_or_else(|| OrgError::not_found("member role", member_role_id))?;

        self.store
            .commit(ChangeSet::new().detach_member_role(&role.id))
            .await?;

        info!("Role removed");
        Ok(role)
    }

    /// Remove a member and every role they hold in the organization.
    ///
    /// Roles in other organizations are untouched.
    #[instrument(skip(self))]
    pub async fn expel_member(&self, org_id: &str, user_id: &str) -> OrgResult<()> {
        self.organization(org_id).await?;
        self.require_member(org_id, user_id).await?;

        let mut changes = ChangeSet::new();
        for role in self.store.member_roles(user_id).await? {
            if role.organization_id == org_id {
                changes = changes.detach_member_role(role.id);
            }
        }
        let detached = changes.len();
        self.store
            .commit(changes.unlink_member(org_id, user_id))
            .await?;

        info!(roles = detached, "Member expelled");
        Ok(())
    }

    /// Members of the organization with their active roles in it, ordered by
    /// member ID.
    pub async fn list_members(&self, org_id: &str) -> OrgResult<Vec<OrgMember>> {
        self.organization(org_id).await?;

        let members = self.store.organization_members(org_id).await?;
        let mut result = Vec::with_capacity(members.len());
        for member in members {
            let roles = self.active_roles(org_id, &member.id).await?;
            result.push(OrgMember { member, roles });
        }
        Ok(result)
    }

    /// One member of the organization with their active roles in it.
    pub async fn get_member(&self, org_id: &str, user_id: &str) -> OrgResult<OrgMember> {
        self.organization(org_id).await?;
        let member = self.require_member(org_id, user_id).await?;
        let roles = self.active_roles(org_id, user_id).await?;
        Ok(OrgMember { member, roles })
    }

    /// Leave an organization. Roles stay as they are.
    #[instrument(skip(self))]
    pub async fn cancel_membership(&self, org_id: &str, user_id: &str) -> OrgResult<()> {
        self.organization(org_id).await?;
        self.member_record(user_id).await?;

        self.store
            .commit(ChangeSet::new().unlink_member(org_id, user_id))
            .await?;

        info!("Membership cancelled");
        Ok(())
    }

    /// The user's membership in an organization.
    pub async fn get_membership(
        &self,
        org_id: &str,
        user_id: &str,
    ) -> OrgResult<OrganizationMembership> {
        let organization = self.organization(org_id).await?;
        let member = self.member_record(user_id).await?;
        let roles = self.active_roles(org_id, user_id).await?;

        Ok(OrganizationMembership {
            member: OrgMember { member, roles },
            organization,
        })
    }

    async fn organization(&self, org_id: &str) -> OrgResult<Organization> {
        self.store
            .find_organization(org_id)
            .await?
            .ok_or_else(|| OrgError::not_found("organization", org_id))
    }

    async fn member_record(&self, user_id: &str) -> OrgResult<Member> {
        self.store
            .find_member(user_id)
            .await?
            .ok_or_else(|| OrgError::not_found("member", user_id))
    }

    /// Member record of a user linked to the organization.
    async fn require_member(&self, org_id: &str, user_id: &str) -> OrgResult<Member> {
        if !self.store.is_member(org_id, user_id).await? {
            return Err(OrgError::NotFound(format!(
                "member {} in organization {}",
                user_id, org_id
            )));
        }
        self.member_record(user_id).await
    }

    async fn active_roles(&self, org_id: &str, user_id: &str) -> OrgResult<Vec<MemberRole>> {
        let roles = self.store.member_roles(user_id).await?;
        Ok(active_roles_in(&roles, org_id).cloned().collect())
    }
}
