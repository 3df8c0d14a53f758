//! Domain store abstraction

use async_trait::async_trait;
use orgmgr_domain::{
    Invitation, InvitationStatusName, Member, MemberContext, MemberRole, Organization,
};

use crate::changeset::ChangeSet;
use crate::error::StoreResult;

/// Durable state for organizations, members, roles, invitations and member
/// contexts.
///
/// Reads return owned snapshots. Writes go exclusively through
/// [`commit`](DomainStore::commit), which applies a whole [`ChangeSet`] or
/// nothing.
#[async_trait]
pub trait DomainStore: Send + Sync {
    /// Find an organization by ID.
    async fn find_organization(&self, id: &str) -> StoreResult<Option<Organization>>;

    /// Organizations owned by the user, ordered by ID.
    async fn organizations_by_owner(&self, owner: &str) -> StoreResult<Vec<Organization>>;

    /// Organizations the user owns or is linked to as a member.
    ///
    /// Deduplicated and ordered by ID ascending. With `after`, only IDs
    /// strictly greater than it are returned.
    async fn organizations_for_user(
        &self,
        user_id: &str,
        after: Option<&str>,
    ) -> StoreResult<Vec<Organization>>;

    /// Find a member by ID.
    async fn find_member(&self, id: &str) -> StoreResult<Option<Member>>;

    /// Check whether the member is in the organization's membership set.
    async fn is_member(&self, organization_id: &str, member_id: &str) -> StoreResult<bool>;

    /// Members linked to the organization, ordered by ID.
    async fn organization_members(&self, organization_id: &str) -> StoreResult<Vec<Member>>;

    /// Every role attached to the member, across all organizations.
    async fn member_roles(&self, member_id: &str) -> StoreResult<Vec<MemberRole>>;

    /// Find a member role by ID.
    async fn find_member_role(&self, id: &str) -> StoreResult<Option<MemberRole>>;

    /// Find an invitation by ID.
    async fn find_invitation(&self, id: &str) -> StoreResult<Option<Invitation>>;

    /// Find an invitation by its accept token.
    async fn find_invitation_by_token(&self, token: &str) -> StoreResult<Option<Invitation>>;

    /// Invitations of the organization, optionally restricted to one status.
    async fn organization_invitations(
        &self,
        organization_id: &str,
        status: Option<InvitationStatusName>,
    ) -> StoreResult<Vec<Invitation>>;

    /// Every pending invitation, across all organizations.
    async fn pending_invitations(&self) -> StoreResult<Vec<Invitation>>;

    /// Find the member's current context.
    async fn find_member_context(&self, member_id: &str) -> StoreResult<Option<MemberContext>>;

    /// Apply a change set atomically.
    async fn commit(&self, changes: ChangeSet) -> StoreResult<()>;
}
