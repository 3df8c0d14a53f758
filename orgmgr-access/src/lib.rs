//! # Organization Manager Access Control
//!
//! This crate mediates every sensitive organization-management operation
//! through an external policy decision point.
//!
//! ## Overview
//!
//! The orgmgr-access crate handles:
//! - **Operations**: The closed set of access-checked operations
//! - **Resources**: Descriptors naming what a request touches
//! - **Policy Context**: The resolved, serializable input to the decision point
//! - **Decision Point**: The contract an external policy engine implements
//! - **Access Checker**: Context assembly plus the fail-closed decision call
//!
//! ## Architecture
//!
//! ```text
//! Operation + Caller + ResourceDescriptor
//!   │
//!   ├─ UserContextProvider ─→ user fragment (orgs + roles)
//!   ├─ DomainStore         ─→ organization / invitation token / member role
//!   ▼
//! PolicyContext ─→ DecisionPoint::decide ─→ Allowed | Restricted
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use orgmgr_access::{AccessChecker, AccessConfig, DecisionPoint, Operation, ResourceDescriptor};
//! use orgmgr_domain::Caller;
//! use orgmgr_store::MemoryStore;
//!
//! async fn check(decision: Arc<dyn DecisionPoint>) {
//!     let store = Arc::new(MemoryStore::new());
//!     let checker = AccessChecker::new(store, decision, AccessConfig::from_env());
//!
//!     let caller = Caller::new("user-1", "user@example.com");
//!     let resource = ResourceDescriptor::organization("org-1");
//!     checker
//!         .check_rights(Operation::GetOrg, &caller, Some(&resource))
//!         .await
//!         .unwrap();
//! }
//! ```

pub mod checker;
pub mod config;
pub mod context;
pub mod decision;
pub mod operations;
pub mod resources;
pub mod user;

// Re-export main types for convenience
pub use checker::AccessChecker;
pub use config::AccessConfig;
pub use context::{
    InvitationFragment, MemberFragment, OrganizationFragment, PolicyContext, RoleFragment,
    UserFragment, UserOrgFragment,
};
pub use decision::{DecisionError, DecisionPoint, Resolution};
pub use operations::Operation;
pub use resources::ResourceDescriptor;
pub use user::UserContextProvider;
