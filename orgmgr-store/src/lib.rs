//! # Organization Manager Store
//!
//! This crate provides the persistence abstraction behind organization
//! management.
//!
//! ## Overview
//!
//! The orgmgr-store crate handles:
//! - **DomainStore**: Read access to organizations, members, roles, invitations
//!   and member contexts
//! - **ChangeSet**: All-or-nothing writes with preconditions
//! - **MemoryStore**: In-memory backend for single-process use and testing
//!
//! ## Features
//!
//! - `memory` (default): In-memory store
//!
//! ## Usage
//!
//! ```rust,no_run
//! use orgmgr_domain::Organization;
//! use orgmgr_store::{ChangeSet, DomainStore, MemoryStore};
//!
//! async fn store_example() {
//!     let store = MemoryStore::new();
//!     let org = Organization::new("Acme", "alice");
//!
//!     store
//!         .commit(ChangeSet::new().put_organization(org.clone()))
//!         .await
//!         .unwrap();
//!
//!     assert!(store.find_organization(&org.id).await.unwrap().is_some());
//! }
//! ```

pub mod changeset;
pub mod error;
#[cfg(feature = "memory")]
pub mod memory;
pub mod store;

// Re-exports
pub use changeset::{Change, ChangeSet, Precondition};
pub use error::{StoreError, StoreResult};
#[cfg(feature = "memory")]
pub use memory::MemoryStore;
pub use store::DomainStore;
