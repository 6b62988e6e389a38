//! Domain error types
//!
//! Validation failures and invalid state transitions raised by domain
//! constructors and the deploy phase machine.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid repository path format
    #[error("Invalid repo path: {0}")]
    InvalidPath(String),

    /// Invalid remote version identifier
    #[error("Invalid version id: {0}")]
    InvalidVersionId(String),

    /// Invalid content hash format (expected 64-char lowercase SHA-256 hex)
    #[error("Invalid content hash: {0}")]
    InvalidHash(String),

    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Invalid deploy phase transition attempt
    #[error("Invalid phase transition from {from} to {to}")]
    InvalidPhase {
        /// The current phase
        from: String,
        /// The attempted target phase
        to: String,
    },

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::InvalidPath("../escape".to_string());
        assert_eq!(err.to_string(), "Invalid repo path: ../escape");

        let err = DomainError::InvalidPhase {
            from: "Idle".to_string(),
            to: "Committing".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid phase transition from Idle to Committing"
        );
    }

    #[test]
    fn test_error_equality() {
        let err1 = DomainError::InvalidHash("zz".to_string());
        let err2 = DomainError::InvalidHash("zz".to_string());
        assert_eq!(err1, err2);
        assert_ne!(err1, DomainError::InvalidHash("yy".to_string()));
    }
}
