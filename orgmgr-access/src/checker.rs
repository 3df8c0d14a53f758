//! Access checker
//!
//! Turns an operation, the caller and a resource descriptor into a
//! [`PolicyContext`], then asks the decision point. Checking fails closed: a
//! resource that cannot be resolved stops the operation before the decision
//! point is called.

use std::sync::Arc;

use chrono::Utc;
use orgmgr_domain::{Caller, OrgError, OrgResult};
use orgmgr_store::DomainStore;
use tracing::{debug, error, info, instrument, warn};

use crate::config::AccessConfig;
use crate::context::{
    InvitationFragment, MemberFragment, OrganizationFragment, PolicyContext, RoleFragment,
};
use crate::decision::DecisionPoint;
use crate::operations::Operation;
use crate::resources::ResourceDescriptor;
use crate::user::UserContextProvider;

/// Gate in front of every sensitive operation.
#[derive(Clone)]
pub struct AccessChecker {
    store: Arc<dyn DomainStore>,
    decision: Arc<dyn DecisionPoint>,
    users: UserContextProvider,
    config: AccessConfig,
}

impl std::fmt::Debug for AccessChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessChecker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AccessChecker {
    pub fn new(
        store: Arc<dyn DomainStore>,
        decision: Arc<dyn DecisionPoint>,
        config: AccessConfig,
    ) -> Self {
        Self {
            users: UserContextProvider::new(store.clone()),
            store,
            decision,
            config,
        }
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// Check whether the caller may perform the operation on the resource.
    ///
    /// # Errors
    ///
    /// - Resolution errors for referenced resources (`NotFound`, invitation
    ///   terminal-state errors)
    /// - `AccessDenied` when the decision point restricts the operation
    /// - `DependencyFailure` when the decision point fails
    #[instrument(skip(self, caller, resource), fields(user_id = %caller.id))]
    pub async fn check_rights(
        &self,
        operation: Operation,
        caller: &Caller,
        resource: Option<&ResourceDescriptor>,
    ) -> OrgResult<()> {
        if !self.config.enabled {
            debug!("Access checking disabled");
            return Ok(());
        }

        let context = self.build_context(operation, caller, resource).await?;

        info!("Checking rights to perform {}", operation);
        match self.decision.decide(&context).await {
            Ok(resolution) if resolution.is_allowed() => Ok(()),
            Ok(_) => {
                warn!("Decision point restricted {}", operation);
                Err(OrgError::AccessDenied(format!(
                    "No rights to perform {}",
                    operation
                )))
            }
            Err(e) => {
                error!(error = %e, "Decision point failed");
                Err(OrgError::DependencyFailure(e.to_string()))
            }
        }
    }

    /// Assemble the policy context without consulting the decision point.
    pub async fn build_context(
        &self,
        operation: Operation,
        caller: &Caller,
        resource: Option<&ResourceDescriptor>,
    ) -> OrgResult<PolicyContext> {
        let user = self.users.user_fragment(&caller.id, &caller.email).await?;
        let mut context = PolicyContext::new(operation, user);

        let Some(resource) = resource else {
            return Ok(context);
        };

        context.member = resource
            .member_id
            .clone()
            .map(|id| MemberFragment { id });

        if resource.invitation_id.is_some() || resource.email.is_some() {
            context.invitation = Some(InvitationFragment {
                id: resource.invitation_id.clone(),
                email: resource.email.clone(),
            });
        }

        context.role = resource.role_id.map(|role_id| RoleFragment {
            role_id,
            scope_resource_id: resource.scope_resource_id.clone(),
        });

        if let Some(org_id) = &resource.org_id {
            debug!(org_id = %org_id, "Resolving organization");
            context.organization = Some(self.organization_fragment(org_id).await?);
        }

        if let Some(token) = &resource.invitation_token {
            debug!("Resolving organization by invitation token");
            let invitation = self
                .store
                .find_invitation_by_token(token)
                .await?
                .ok_or_else(|| OrgError::NotFound("invitation for token".to_string()))?;
            invitation.check_redeemable(Utc::now())?;
            context.organization =
                Some(self.organization_fragment(&invitation.organization_id).await?);
        }

        if let Some(member_role_id) = &resource.member_role_id {
            debug!(member_role_id = %member_role_id, "Resolving member role");
            let role = self
                .store
                .find_member_role(member_role_id)
                .await?
                .ok_or_else(|| OrgError::not_found("member role", member_role_id))?;
            context.role = Some(RoleFragment::from(&role));
        }

        Ok(context)
    }

    async fn organization_fragment(&self, org_id: &str) -> OrgResult<OrganizationFragment> {
        let org = self
            .store
            .find_organization(org_id)
            .await?
            .ok_or_else(|| OrgError::not_found("organization", org_id))?;
        Ok(OrganizationFragment::from(&org))
    }
}
