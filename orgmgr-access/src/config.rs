//! Access check configuration.

use serde::{Deserialize, Serialize};

/// Toggle for the access checker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessConfig {
    /// When false every operation is allowed without consulting the decision
    /// point.
    pub enabled: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AccessConfig {
    /// Configuration with checking turned off.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ACCESS_CHECK_ENABLED`: Whether to consult the decision point (default: true)
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var("ACCESS_CHECK_ENABLED")
                .map(|s| parse_flag(&s))
                .unwrap_or(Self::default().enabled),
        }
    }
}

/// Anything other than "false" or "0" turns a flag on.
pub(crate) fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    !(value.eq_ignore_ascii_case("false") || value == "0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enabled() {
        assert!(AccessConfig::default().enabled);
        assert!(!AccessConfig::disabled().enabled);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("FALSE"));
        assert!(!parse_flag(" 0 "));
    }
}
