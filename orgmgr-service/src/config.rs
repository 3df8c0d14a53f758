//! Organization manager configuration.
//!
//! Loaded from environment variables with defaults suitable for local
//! development.

use orgmgr_access::AccessConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Longest invitation lifetime accepted, in days.
pub const MAX_INVITATION_LIFETIME_DAYS: u32 = 365;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Organization manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgManagerConfig {
    /// Days an invitation stays redeemable.
    pub invitation_lifetime_days: u32,

    /// Access check toggle.
    pub access: AccessConfig,

    /// Seconds between expiry sweeps.
    pub sweep_interval_secs: u64,
}

impl Default for OrgManagerConfig {
    fn default() -> Self {
        Self {
            invitation_lifetime_days: 7,
            access: AccessConfig::default(),
            sweep_interval_secs: 300,
        }
    }
}

impl OrgManagerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `INVITATION_LIFETIME_DAYS`: Invitation lifetime in days (default: 7)
    /// - `ACCESS_CHECK_ENABLED`: Whether to consult the decision point (default: true)
    /// - `INVITATION_SWEEP_INTERVAL_SECS`: Expiry sweep period (default: 300)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            invitation_lifetime_days: std::env::var("INVITATION_LIFETIME_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.invitation_lifetime_days),
            access: AccessConfig::from_env(),
            sweep_interval_secs: std::env::var("INVITATION_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.sweep_interval_secs),
        }
    }

    /// Set the invitation lifetime.
    pub fn with_invitation_lifetime_days(mut self, days: u32) -> Self {
        self.invitation_lifetime_days = days;
        self
    }

    /// Set the access check toggle.
    pub fn with_access(mut self, access: AccessConfig) -> Self {
        self.access = access;
        self
    }

    /// Invitation lifetime as a duration.
    pub fn invitation_lifetime(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.invitation_lifetime_days))
    }

    /// Sweep period as a duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Reject values the services cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.invitation_lifetime_days == 0 {
            return Err(ConfigError::InvalidValue {
                key: "INVITATION_LIFETIME_DAYS".to_string(),
                message: "must be at least one day".to_string(),
            });
        }
        if self.invitation_lifetime_days > MAX_INVITATION_LIFETIME_DAYS {
            return Err(ConfigError::InvalidValue {
                key: "INVITATION_LIFETIME_DAYS".to_string(),
                message: format!("must be at most {} days", MAX_INVITATION_LIFETIME_DAYS),
            });
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "INVITATION_SWEEP_INTERVAL_SECS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
