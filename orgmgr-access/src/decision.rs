//! Decision point contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::PolicyContext;

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Allowed,
    Restricted,
}

impl Resolution {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Resolution::Allowed)
    }
}

/// The decision point could not produce a resolution.
///
/// This is never a denial. Callers surface it as a dependency failure.
#[derive(Debug, Error)]
pub enum DecisionError {
    /// Decision point could not be reached
    #[error("Decision point unavailable: {0}")]
    Unavailable(String),

    /// Decision point answered with something that is not a resolution
    #[error("Invalid decision response: {0}")]
    InvalidResponse(String),
}

/// External policy engine judging whether an operation is allowed.
#[async_trait]
pub trait DecisionPoint: Send + Sync {
    /// Evaluate the context.
    async fn decide(&self, context: &PolicyContext) -> Result<Resolution, DecisionError>;
}
