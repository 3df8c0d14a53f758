//! Organization manager facade
//!
//! One entry point per externally exposed operation. Each builds the resource
//! descriptor for its request, passes the access check, then delegates to the
//! owning service.

use std::sync::Arc;

use orgmgr_access::{AccessChecker, DecisionPoint, Operation, ResourceDescriptor};
use orgmgr_domain::{
    Caller, Invitation, InvitationRequest, InvitationStatusName, MemberContext, MemberRole,
    MemberRoleSpec, NewOrganization, OrgError, OrgMember, OrgResult, Organization,
    OrganizationMembership, OrganizationPage, RoleDefinition, RoleId,
};
use orgmgr_store::DomainStore;

use crate::collaborators::{Notifier, PartyProvisioner};
use crate::config::{ConfigError, OrgManagerConfig};
use crate::context::ContextService;
use crate::invitation::InvitationManager;
use crate::membership::MembershipManager;
use crate::organization::OrganizationService;
use crate::pagination::OrganizationPager;
use crate::roles::RoleCatalogueService;
use crate::sweeper::ExpirySweeper;

/// Access-checked front of every organization-management operation.
#[derive(Clone)]
pub struct OrgManager {
    access: AccessChecker,
    organizations: OrganizationService,
    pager: OrganizationPager,
    members: MembershipManager,
    invitations: InvitationManager,
    contexts: ContextService,
    roles: RoleCatalogueService,
    config: OrgManagerConfig,
}

impl OrgManager {
    /// Wire every service over one store.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `config` fails validation.
    pub fn new(
        store: Arc<dyn DomainStore>,
        decision: Arc<dyn DecisionPoint>,
        parties: Arc<dyn PartyProvisioner>,
        notifier: Arc<dyn Notifier>,
        config: OrgManagerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let invitations =
            InvitationManager::new(store.clone(), notifier, config.invitation_lifetime());

        Ok(Self {
            access: AccessChecker::new(store.clone(), decision, config.access),
            organizations: OrganizationService::new(store.clone(), parties),
            pager: OrganizationPager::new(store.clone()),
            members: MembershipManager::new(store.clone(), invitations.clone()),
            contexts: ContextService::new(store.clone()),
            roles: RoleCatalogueService::new(store),
            invitations,
            config,
        })
    }

    pub fn config(&self) -> &OrgManagerConfig {
        &self.config
    }

    /// Sweeper bound to this manager's invitations and configured period.
    pub fn sweeper(&self) -> ExpirySweeper {
        ExpirySweeper::new(self.invitations.clone(), self.config.sweep_interval())
    }

    // Organizations

    pub async fn create_org(
        &self,
        caller: &Caller,
        request: NewOrganization,
    ) -> OrgResult<Organization> {
        self.access
            .check_rights(Operation::CreateOrg, caller, None)
            .await?;
        self.organizations.create(caller, request).await
    }

    pub async fn get_org(&self, caller: &Caller, org_id: &str) -> OrgResult<Organization> {
        let resource = ResourceDescriptor::organization(org_id);
        self.access
            .check_rights(Operation::GetOrg, caller, Some(&resource))
            .await?;
        self.organizations
            .get(org_id)
            .await?
            .ok_or_else(|| OrgError::not_found("organization", org_id))
    }

    pub async fn modify_org(
        &self,
        caller: &Caller,
        org_id: &str,
        name: &str,
    ) -> OrgResult<Organization> {
        let resource = ResourceDescriptor::organization(org_id);
        self.access
            .check_rights(Operation::ModifyOrg, caller, Some(&resource))
            .await?;
        self.organizations.modify(org_id, name).await
    }

    /// The caller's organizations, one page at a time.
    pub async fn list_org_membership(
        &self,
        caller: &Caller,
        limit: Option<usize>,
        continuation_token: Option<&str>,
    ) -> OrgResult<OrganizationPage> {
        self.access
            .check_rights(Operation::ListOrgMembership, caller, None)
            .await?;
        self.pager
            .find_all_organizations(&caller.id, limit, continuation_token)
            .await
    }

    // Members and roles

    pub async fn get_org_member(
        &self,
        caller: &Caller,
        org_id: &str,
        user_id: &str,
    ) -> OrgResult<OrgMember> {
        let resource = ResourceDescriptor::organization(org_id).with_member(user_id);
        self.access
            .check_rights(Operation::GetOrgMember, caller, Some(&resource))
            .await?;
        self.members.get_member(org_id, user_id).await
    }

    pub async fn list_org_members(&self, caller: &Caller, org_id: &str) -> OrgResult<Vec<OrgMember>> {
        let resource = ResourceDescriptor::organization(org_id);
        self.access
            .check_rights(Operation::ListOrgMembers, caller, Some(&resource))
            .await?;
        self.members.list_members(org_id).await
    }

    pub async fn assign_member_role(
        &self,
        caller: &Caller,
        org_id: &str,
        user_id: &str,
        spec: MemberRoleSpec,
    ) -> OrgResult<MemberRole> {
        let resource = ResourceDescriptor::organization(org_id)
            .with_member(user_id)
            .with_role(spec.role_id, spec.scope_resource_id().map(str::to_string));
        self.access
            .check_rights(Operation::AssignMemberRole, caller, Some(&resource))
            .await?;
        self.members.assign_role(org_id, user_id, &spec).await
    }

    pub async fn remove_member_role(
        &self,
        caller: &Caller,
        org_id: &str,
        user_id: &str,
        member_role_id: &str,
    ) -> OrgResult<MemberRole> {
        let resource = ResourceDescriptor::organization(org_id)
            .with_member(user_id)
            .with_member_role(member_role_id);
        self.access
            .check_rights(Operation::RemoveMemberRole, caller, Some(&resource))
            .await?;
        self.members.remove_role(org_id, user_id, member_role_id).await
    }

    pub async fn expel_org_member(
        &self,
        caller: &Caller,
        org_id: &str,
        user_id: &str,
    ) -> OrgResult<()> {
        let resource = ResourceDescriptor::organization(org_id).with_member(user_id);
        self.access
            .check_rights(Operation::ExpelOrgMember, caller, Some(&resource))
            .await?;
        self.members.expel_member(org_id, user_id).await
    }

    // Invitations

    pub async fn create_invitation(
        &self,
        caller: &Caller,
        org_id: &str,
        request: InvitationRequest,
    ) -> OrgResult<Invitation> {
        let resource =
            ResourceDescriptor::organization(org_id).with_email(request.invitee.email());
        self.access
            .check_rights(Operation::CreateInvitation, caller, Some(&resource))
            .await?;
        self.invitations.create(org_id, request).await
    }

    pub async fn get_invitation(
        &self,
        caller: &Caller,
        org_id: &str,
        invitation_id: &str,
    ) -> OrgResult<Invitation> {
        let resource = ResourceDescriptor::organization(org_id).with_invitation(invitation_id);
        self.access
            .check_rights(Operation::GetInvitation, caller, Some(&resource))
            .await?;

        let invitation = self.invitations.get(invitation_id).await?;
        if invitation.organization_id != org_id {
            return Err(OrgError::not_found("invitation", invitation_id));
        }
        Ok(invitation)
    }

    pub async fn list_invitations(
        &self,
        caller: &Caller,
        org_id: &str,
        status: Option<InvitationStatusName>,
    ) -> OrgResult<Vec<Invitation>> {
        let resource = ResourceDescriptor::organization(org_id);
        self.access
            .check_rights(Operation::ListInvitations, caller, Some(&resource))
            .await?;
        self.invitations.list(org_id, status).await
    }

    pub async fn revoke_invitation(
        &self,
        caller: &Caller,
        org_id: &str,
        invitation_id: &str,
        reason: &str,
    ) -> OrgResult<Invitation> {
        let resource = ResourceDescriptor::organization(org_id).with_invitation(invitation_id);
        self.access
            .check_rights(Operation::RevokeInvitation, caller, Some(&resource))
            .await?;
        self.invitations.revoke(org_id, invitation_id, reason).await
    }

    /// Expire stale invitations. A system task, not checked against the
    /// decision point.
    pub async fn sweep_expired_invitations(&self) -> OrgResult<usize> {
        self.invitations.sweep_expired().await
    }

    // Caller's own membership

    pub async fn join_org(
        &self,
        caller: &Caller,
        invitation_token: &str,
    ) -> OrgResult<OrganizationMembership> {
        let resource = ResourceDescriptor::invitation_token(invitation_token);
        self.access
            .check_rights(Operation::JoinOrg, caller, Some(&resource))
            .await?;
        self.members.join(invitation_token, caller).await
    }

    pub async fn cancel_org_membership(&self, caller: &Caller, org_id: &str) -> OrgResult<()> {
        let resource = ResourceDescriptor::organization(org_id);
        self.access
            .check_rights(Operation::CancelOrgMembership, caller, Some(&resource))
            .await?;
        self.members.cancel_membership(org_id, &caller.id).await
    }

    pub async fn inquire_org_membership(
        &self,
        caller: &Caller,
        org_id: &str,
    ) -> OrgResult<OrganizationMembership> {
        let resource = ResourceDescriptor::organization(org_id);
        self.access
            .check_rights(Operation::InquireOrgMembership, caller, Some(&resource))
            .await?;
        self.members.get_membership(org_id, &caller.id).await
    }

    // Context

    pub async fn switch_context(&self, caller: &Caller, org_id: &str) -> OrgResult<MemberContext> {
        let resource = ResourceDescriptor::organization(org_id);
        self.access
            .check_rights(Operation::SwitchContext, caller, Some(&resource))
            .await?;
        self.contexts.switch_context(&caller.id, org_id).await
    }

    pub async fn get_context(&self, caller: &Caller) -> OrgResult<MemberContext> {
        self.access
            .check_rights(Operation::GetContext, caller, None)
            .await?;
        self.contexts.find_context(&caller.id).await
    }

    // Role catalogue

    pub async fn get_role(
        &self,
        caller: &Caller,
        org_id: &str,
        role_id: RoleId,
    ) -> OrgResult<RoleDefinition> {
        let resource = ResourceDescriptor::organization(org_id).with_role(role_id, None);
        self.access
            .check_rights(Operation::GetRole, caller, Some(&resource))
            .await?;
        self.roles.get_role(org_id, role_id).await
    }

    pub async fn list_roles(
        &self,
        caller: &Caller,
        org_id: &str,
    ) -> OrgResult<Vec<RoleDefinition>> {
        let resource = ResourceDescriptor::organization(org_id);
        self.access
            .check_rights(Operation::ListRoles, caller, Some(&resource))
            .await?;
        self.roles.list_roles(org_id).await
    }
}
