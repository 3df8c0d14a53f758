//! # Organization Manager Services
//!
//! This crate implements organization management on top of the domain store,
//! with every externally exposed operation mediated by the access checker.
//!
//! ## Overview
//!
//! The orgmgr-service crate handles:
//! - **Invitations**: Creation, listing, revocation, expiry sweeps and token
//!   validation
//! - **Membership**: Joining, role assignment and removal, expulsion
//! - **Organizations**: Creation with party provisioning, renaming, lookup
//! - **Pagination**: Cursor-based listing of a user's organizations
//! - **Context**: The member's working organization
//! - **Role Catalogue**: Roles an organization offers
//! - **OrgManager**: The access-checked facade over all of the above
//!
//! ## Architecture
//!
//! ```text
//! OrgManager
//!   ├─ AccessChecker ─→ DecisionPoint
//!   ├─ OrganizationService ─→ PartyProvisioner
//!   ├─ InvitationManager ─→ Notifier
//!   ├─ MembershipManager ─→ InvitationManager
//!   ├─ OrganizationPager
//!   ├─ ContextService
//!   └─ RoleCatalogueService
//!            │
//!            ▼
//!       DomainStore
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use orgmgr_access::DecisionPoint;
//! use orgmgr_domain::{Caller, NewOrganization};
//! use orgmgr_service::{Notifier, OrgManager, OrgManagerConfig, PartyProvisioner};
//! use orgmgr_store::MemoryStore;
//!
//! async fn example(
//!     decision: Arc<dyn DecisionPoint>,
//!     parties: Arc<dyn PartyProvisioner>,
//!     notifier: Arc<dyn Notifier>,
//! ) {
//!     let manager = OrgManager::new(
//!         Arc::new(MemoryStore::new()),
//!         decision,
//!         parties,
//!         notifier,
//!         OrgManagerConfig::from_env(),
//!     )
//!     .unwrap();
//!
//!     let alice = Caller::new("alice", "alice@example.com");
//!     let org = manager
//!         .create_org(&alice, NewOrganization::new("Acme"))
//!         .await
//!         .unwrap();
//!     println!("created {}", org.id);
//! }
//! ```

pub mod collaborators;
pub mod config;
pub mod context;
pub mod invitation;
pub mod manager;
pub mod membership;
pub mod organization;
pub mod pagination;
pub mod roles;
pub mod sweeper;

// Re-export main types for convenience
pub use collaborators::{CollaboratorError, Notifier, PartyProvisioner};
pub use config::{ConfigError, OrgManagerConfig};
pub use context::ContextService;
pub use invitation::InvitationManager;
pub use manager::OrgManager;
pub use membership::MembershipManager;
pub use organization::OrganizationService;
pub use pagination::OrganizationPager;
pub use roles::RoleCatalogueService;
pub use sweeper::ExpirySweeper;
