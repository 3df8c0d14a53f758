//! Caller identity
//!
//! The host verifies the bearer token and hands the resulting subject to every
//! operation as a [`Caller`].

use serde::{Deserialize, Serialize};

/// Authenticated subject of the current request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Caller {
    /// Subject (user ID)
    pub id: String,

    /// User email
    pub email: String,
}

impl Caller {
    /// Creates a caller identity.
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }

    /// Check if the given address is this caller's email, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use orgmgr_domain::Caller;
    ///
    /// let caller = Caller::new("user-1", "Bob@Example.com");
    /// assert!(caller.email_matches("bob@example.COM"));
    /// assert!(!caller.email_matches("alice@example.com"));
    /// ```
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }
}
