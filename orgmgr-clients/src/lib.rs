//! # Organization Manager Clients
//!
//! HTTP implementations of the collaborator contracts the organization
//! manager depends on.
//!
//! ## Clients
//!
//! - [`DecisionClient`]: `DecisionPoint` backed by the Bouncer judge API
//! - [`PartyClient`]: `PartyProvisioner` backed by party management
//! - [`MailClient`]: `Notifier` backed by the mail sender
//!
//! Every call retries transport failures and 5xx answers with exponential
//! backoff; 4xx answers return at once.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use orgmgr_clients::{ClientsConfig, DecisionClient, MailClient, PartyClient};
//! use orgmgr_service::{OrgManager, OrgManagerConfig};
//! use orgmgr_store::MemoryStore;
//!
//! let clients = ClientsConfig::from_env();
//! clients.validate().unwrap();
//!
//! let manager = OrgManager::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(DecisionClient::from_config(&clients)),
//!     Arc::new(PartyClient::from_config(&clients)),
//!     Arc::new(MailClient::from_config(&clients)),
//!     OrgManagerConfig::from_env(),
//! )
//! .unwrap();
//! ```

pub mod clients;
pub mod error;
pub mod retry;

pub use clients::{ClientsConfig, DecisionClient, MailClient, PartyClient, ServiceEndpoint};
pub use error::ClientError;
pub use retry::{with_retry_if, RetryConfig};
