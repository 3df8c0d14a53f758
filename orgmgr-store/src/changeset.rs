//! Atomic change sets
//!
//! Every mutating operation describes its writes as a [`ChangeSet`] and hands it
//! to [`DomainStore::commit`](crate::DomainStore::commit). A backend applies all
//! changes or none, after checking every precondition.

use orgmgr_domain::{Invitation, Member, MemberContext, MemberRole, Organization};

/// A single write.
#[derive(Debug, Clone)]
pub enum Change {
    /// Insert or replace an organization
    PutOrganization(Organization),

    /// Insert or replace a member
    PutMember(Member),

    /// Insert or replace a member role
    PutMemberRole(MemberRole),

    /// Detach a member role from its member
    DetachMemberRole {
        /// Member role ID
        id: String,
    },

    /// Add a member to an organization's membership set
    LinkMember {
        organization_id: String,
        member_id: String,
    },

    /// Remove a member from an organization's membership set
    UnlinkMember {
        organization_id: String,
        member_id: String,
    },

    /// Insert or replace an invitation
    PutInvitation(Invitation),

    /// Insert or replace a member context
    PutMemberContext(MemberContext),
}

/// Condition checked against committed state before any change is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// The invitation exists and is still pending
    InvitationPending {
        /// Invitation ID
        id: String,
    },
}

/// Ordered set of writes committed atomically.
///
/// # Examples
///
/// ```
/// use orgmgr_domain::{Member, Organization};
/// use orgmgr_store::{ChangeSet, Precondition};
///
/// let org = Organization::new("Acme", "alice");
/// let changes = ChangeSet::new()
///     .require(Precondition::InvitationPending { id: "inv-1".into() })
///     .put_member(Member::new("bob", "bob@example.com"))
///     .link_member(&org.id, "bob");
///
/// assert_eq!(changes.len(), 2);
/// assert_eq!(changes.preconditions().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    preconditions: Vec<Precondition>,
    changes: Vec<Change>,
}

impl ChangeSet {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a precondition.
    pub fn require(mut self, precondition: Precondition) -> Self {
        self.preconditions.push(precondition);
        self
    }

    /// Append a change.
    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Append a change, builder style.
    pub fn with(mut self, change: Change) -> Self {
        self.push(change);
        self
    }

    pub fn put_organization(self, organization: Organization) -> Self {
        self.with(Change::PutOrganization(organization))
    }

    pub fn put_member(self, member: Member) -> Self {
        self.with(Change::PutMember(member))
    }

    pub fn put_member_role(self, role: MemberRole) -> Self {
        self.with(Change::PutMemberRole(role))
    }

    pub fn detach_member_role(self, id: impl Into<String>) -> Self {
        self.with(Change::DetachMemberRole { id: id.into() })
    }

    pub fn link_member(self, organization_id: impl Into<String>, member_id: impl Into<String>) -> Self {
        self.with(Change::LinkMember {
            organization_id: organization_id.into(),
            member_id: member_id.into(),
        })
    }

    pub fn unlink_member(
        self,
        organization_id: impl Into<String>,
        member_id: impl Into<String>,
    ) -> Self {
        self.with(Change::UnlinkMember {
            organization_id: organization_id.into(),
            member_id: member_id.into(),
        })
    }

    pub fn put_invitation(self, invitation: Invitation) -> Self {
        self.with(Change::PutInvitation(invitation))
    }

    pub fn put_member_context(self, context: MemberContext) -> Self {
        self.with(Change::PutMemberContext(context))
    }

    pub fn preconditions(&self) -> &[Precondition] {
        &self.preconditions
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Number of changes (preconditions not counted).
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Split into preconditions and changes.
    pub fn into_parts(self) -> (Vec<Precondition>, Vec<Change>) {
        (self.preconditions, self.changes)
    }
}
