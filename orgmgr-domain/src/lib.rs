//! # Organization Manager Domain
//!
//! This crate provides the domain model shared by every orgmgr crate.
//!
//! ## Overview
//!
//! The orgmgr-domain crate handles:
//! - **Organizations**: Tenant and billing entities with a role catalogue
//! - **Members**: Users who joined at least one organization, and their roles
//! - **Invitations**: Time-bounded join capabilities and their state machine
//! - **Roles**: The closed role and scope vocabulary
//! - **Context**: The member's currently selected organization
//! - **Errors**: The error taxonomy used across the workspace
//!
//! ## Architecture
//!
//! ```text
//! Organization ─── roles (catalogue)
//!   │
//!   ├─ (organization_id, member_id) links ─→ Member
//!   │                                          └─ MemberRole (per org, active flag)
//!   └─ Invitation ── Invitee ── MemberRoleSpec (templates)
//!
//! Member ─→ MemberContext (current org)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Duration;
//! use orgmgr_domain::{
//!     Invitation, InvitationRequest, Invitee, MemberRole, MemberRoleSpec, Organization, RoleId,
//! };
//!
//! let org = Organization::new("Acme", "alice");
//!
//! let request = InvitationRequest::new(Invitee::by_email(
//!     "bob@example.com",
//!     vec![MemberRoleSpec::new(RoleId::Manager)],
//! ));
//! let invitation = Invitation::new(&org.id, request, Duration::days(7)).unwrap();
//!
//! let granted: Vec<_> = invitation
//!     .invitee
//!     .roles
//!     .iter()
//!     .map(|spec| MemberRole::from_spec("bob", &org.id, spec))
//!     .collect();
//! assert_eq!(granted.len(), 1);
//! ```

pub mod context;
pub mod error;
pub mod identity;
pub mod invitation;
pub mod member;
pub mod organization;
pub mod roles;

// Re-export main types for convenience
pub use context::MemberContext;
pub use error::{OrgError, OrgResult};
pub use identity::Caller;
pub use invitation::{
    generate_accept_token, ContactType, Invitation, InvitationRequest, InvitationStatus,
    InvitationStatusName, Invitee, InviteeContact,
};
pub use member::{active_roles_in, Member, MemberRole, OrgMember, OrganizationMembership};
pub use organization::{
    Metadata, NewOrganization, Organization, OrganizationPage, DEFAULT_PAGE_LIMIT,
};
pub use roles::{MemberRoleSpec, ResourceScopeId, RoleDefinition, RoleId, RoleScope};
