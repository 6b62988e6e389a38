//! Error types for the conflict engine

use thiserror::Error;

use deckhand_core::ports::content_store::StoreError;

/// Errors that can occur during classification and resolution
#[derive(Debug, Error)]
pub enum ConflictError {
    /// Fetched remote content failed shape checks and cannot be trusted
    /// for comparison
    #[error("content validation failed for {path}: {reason}")]
    ContentValidation { path: String, reason: String },

    /// The remote content store failed mid-reconciliation or mid-pull
    #[error("remote store error: {0}")]
    Store(#[from] StoreError),

    /// Workspace or fingerprint persistence failed
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
