//! In-memory domain store
//!
//! Suitable for single-process deployments and testing. All tables sit behind
//! one `RwLock`; a commit stages its changes on a copy of the tables while
//! holding the write guard and swaps the copy in only when every change
//! applied cleanly.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use orgmgr_domain::{
    Invitation, InvitationStatusName, Member, MemberContext, MemberRole, Organization,
};

use crate::changeset::{Change, ChangeSet, Precondition};
use crate::error::{StoreError, StoreResult};
use crate::store::DomainStore;

#[derive(Debug, Clone, Default)]
struct Tables {
    organizations: BTreeMap<String, Organization>,
    members: BTreeMap<String, Member>,
    member_roles: BTreeMap<String, MemberRole>,
    /// (organization_id, member_id)
    memberships: BTreeSet<(String, String)>,
    invitations: BTreeMap<String, Invitation>,
    /// accept token -> invitation id
    tokens: HashMap<String, String>,
    contexts: HashMap<String, MemberContext>,
}

impl Tables {
    fn check(&self, precondition: &Precondition) -> StoreResult<()> {
        match precondition {
            Precondition::InvitationPending { id } => match self.invitations.get(id) {
                Some(invitation) if invitation.is_pending() => Ok(()),
                Some(invitation) => Err(StoreError::PreconditionFailed(format!(
                    "invitation {} is {}",
                    id,
                    invitation.status_name()
                ))),
                None => Err(StoreError::PreconditionFailed(format!(
                    "invitation {} does not exist",
                    id
                ))),
            },
        }
    }

    fn require_organization(&self, id: &str) -> StoreResult<()> {
        if self.organizations.contains_key(id) {
            Ok(())
        } else {
            Err(StoreError::Integrity(format!("organization {} does not exist", id)))
        }
    }

    fn require_member(&self, id: &str) -> StoreResult<()> {
        if self.members.contains_key(id) {
            Ok(())
        } else {
            Err(StoreError::Integrity(format!("member {} does not exist", id)))
        }
    }

    fn apply(&mut self, change: Change) -> StoreResult<()> {
        match change {
            Change::PutOrganization(organization) => {
                self.organizations.insert(organization.id.clone(), organization);
            }
            Change::PutMember(member) => {
                self.members.insert(member.id.clone(), member);
            }
            Change::PutMemberRole(role) => {
                self.require_organization(&role.organization_id)?;
                self.require_member(&role.member_id)?;
                self.member_roles.insert(role.id.clone(), role);
            }
            Change::DetachMemberRole { id } => {
                if self.member_roles.remove(&id).is_none() {
                    return Err(StoreError::Integrity(format!(
                        "member role {} does not exist",
                        id
                    )));
                }
            }
            Change::LinkMember {
                organization_id,
                member_id,
            } => {
                self.require_organization(&organization_id)?;
                self.require_member(&member_id)?;
                self.memberships.insert((organization_id, member_id));
            }
            Change::UnlinkMember {
                organization_id,
                member_id,
            } => {
                self.memberships.remove(&(organization_id, member_id));
            }
            Change::PutInvitation(invitation) => {
                self.require_organization(&invitation.organization_id)?;
                if let Some(owner) = self.tokens.get(&invitation.accept_token) {
                    if owner != &invitation.id {
                        return Err(StoreError::Conflict(
                            "accept token is already in use".to_string(),
                        ));
                    }
                }
                if let Some(previous) = self.invitations.get(&invitation.id) {
                    if previous.accept_token != invitation.accept_token {
                        self.tokens.remove(&previous.accept_token);
                    }
                }
                self.tokens
                    .insert(invitation.accept_token.clone(), invitation.id.clone());
                self.invitations.insert(invitation.id.clone(), invitation);
            }
            Change::PutMemberContext(context) => {
                self.require_organization(&context.organization_id)?;
                self.contexts.insert(context.member_id.clone(), context);
            }
        }
        Ok(())
    }

    fn is_linked(&self, organization_id: &str, member_id: &str) -> bool {
        self.memberships
            .contains(&(organization_id.to_string(), member_id.to_string()))
    }
}

/// In-memory domain store implementation.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DomainStore for MemoryStore {
    async fn find_organization(&self, id: &str) -> StoreResult<Option<Organization>> {
        Ok(self.tables.read().await.organizations.get(id).cloned())
    }

    async fn organizations_by_owner(&self, owner: &str) -> StoreResult<Vec<Organization>> {
        let tables = self.tables.read().await;
        Ok(tables
            .organizations
            .values()
            .filter(|o| o.is_owned_by(owner))
            .cloned()
            .collect())
    }

    async fn organizations_for_user(
        &self,
        user_id: &str,
        after: Option<&str>,
    ) -> StoreResult<Vec<Organization>> {
        let tables = self.tables.read().await;
        Ok(tables
            .organizations
            .values()
            .filter(|o| after.map_or(true, |token| o.id.as_str() > token))
            .filter(|o| o.is_owned_by(user_id) || tables.is_linked(&o.id, user_id))
            .cloned()
            .collect())
    }

    async fn find_member(&self, id: &str) -> StoreResult<Option<Member>> {
        Ok(self.tables.read().await.members.get(id).cloned())
    }

    async fn is_member(&self, organization_id: &str, member_id: &str) -> StoreResult<bool> {
        Ok(self.tables.read().await.is_linked(organization_id, member_id))
    }

    async fn organization_members(&self, organization_id: &str) -> StoreResult<Vec<Member>> {
        let tables = self.tables.read().await;
        Ok(tables
            .memberships
            .iter()
            .filter(|(org, _)| org == organization_id)
            .filter_map(|(_, member)| tables.members.get(member).cloned())
            .collect())
    }

    async fn member_roles(&self, member_id: &str) -> StoreResult<Vec<MemberRole>> {
        let tables = self.tables.read().await;
        Ok(tables
            .member_roles
            .values()
            .filter(|r| r.member_id == member_id)
            .cloned()
            .collect())
    }

    async fn find_member_role(&self, id: &str) -> StoreResult<Option<MemberRole>> {
        Ok(self.tables.read().await.member_roles.get(id).cloned())
    }

    async fn find_invitation(&self, id: &str) -> StoreResult<Option<Invitation>> {
        Ok(self.tables.read().await.invitations.get(id).cloned())
    }

    async fn find_invitation_by_token(&self, token: &str) -> StoreResult<Option<Invitation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tokens
            .get(token)
            .and_then(|id| tables.invitations.get(id))
            .cloned())
    }

    async fn organization_invitations(
        &self,
        organization_id: &str,
        status: Option<InvitationStatusName>,
    ) -> StoreResult<Vec<Invitation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .invitations
            .values()
            .filter(|i| i.organization_id == organization_id)
            .filter(|i| status.map_or(true, |s| i.status_name() == s))
            .cloned()
            .collect())
    }

    async fn pending_invitations(&self) -> StoreResult<Vec<Invitation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .invitations
            .values()
            .filter(|i| i.is_pending())
            .cloned()
            .collect())
    }

    async fn find_member_context(&self, member_id: &str) -> StoreResult<Option<MemberContext>> {
        Ok(self.tables.read().await.contexts.get(member_id).cloned())
    }

    async fn commit(&self, changes: ChangeSet) -> StoreResult<()> {
        let (preconditions, changes) = changes.into_parts();
        let count = changes.len();

        let mut tables = self.tables.write().await;
        for precondition in &preconditions {
            tables.check(precondition)?;
        }

        let mut staged = tables.clone();
        for change in changes {
            staged.apply(change)?;
        }
        *tables = staged;

        debug!(changes = count, "Committed change set");
        Ok(())
    }
}
