//! Errors raised by rules engines at the adapter boundary.

use std::fmt::Debug;

/// Error type for state mutation and contract checks
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdapterError {
    /// The state rejected a move. The state is unchanged.
    #[error("illegal move {mv}: {reason}")]
    IllegalMove { mv: String, reason: String },

    /// The adapter broke one of the guarantees the search relies on.
    #[error("adapter contract violation: {0}")]
    ContractViolation(String),
}

impl AdapterError {
    /// Build an `IllegalMove` error for any debuggable move.
    pub fn illegal(mv: &impl Debug, reason: impl Into<String>) -> Self {
        AdapterError::IllegalMove {
            mv: format!("{:?}", mv),
            reason: reason.into(),
        }
    }

    /// Build a `ContractViolation` error.
    pub fn violation(msg: impl Into<String>) -> Self {
        AdapterError::ContractViolation(msg.into())
    }

    /// Whether this error only concerns the one move that was attempted.
    pub fn is_illegal_move(&self) -> bool {
        matches!(self, AdapterError::IllegalMove { .. })
    }
}
