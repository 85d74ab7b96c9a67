//! Cross-cutting error types.
//!
//! Domain-specific errors (`DatabaseError`, `OracleError`, seating errors) are
//! defined in their respective crates. This module only carries the errors
//! that any crate can raise while handling core types.

use thiserror::Error;

/// Errors that can be raised by any desk crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Data failed validation (format, range, unknown enum value).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    #[must_use]
    pub fn invalid_transition(
        entity_type: &str,
        id: &str,
        from: impl std::fmt::Display,
        to: impl std::fmt::Display,
    ) -> Self {
        Self::InvalidTransition {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_names_both_states() {
        let err = CoreError::invalid_transition("exam", "exm-1", "active", "draft");
        assert_eq!(
            err.to_string(),
            "Invalid state transition: exam exm-1 from active to draft"
        );
    }
}
