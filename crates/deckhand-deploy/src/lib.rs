//! Deckhand Deploy - the deploy orchestrator
//!
//! Drives a full deploy attempt end to end: change detection against the
//! fingerprint cache, remote version probing, conflict classification and
//! resolution, and a strictly sequential best-effort commit batch with
//! per-file failure isolation.
//!
//! ## Key Components
//!
//! - [`DeployEngine`] - the orchestrator (deploy and push-assets variants)
//! - [`detector`] - pure change detection over a workspace snapshot
//! - [`phase`] - the deploy phase state machine
//! - [`committer`] - the sequential commit batch
//! - [`manifest`] - the shared asset manifest document
//! - [`DirWorkspaceSource`] - directory-backed `IWorkspaceSource` adapter

pub mod committer;
pub mod detector;
pub mod engine;
pub mod filesystem;
pub mod manifest;
pub mod phase;

pub use engine::{DeployEngine, DeployEvent, DeployOutcome, DeployReport};
pub use filesystem::DirWorkspaceSource;
pub use phase::DeployPhase;

use thiserror::Error;

use deckhand_core::ports::content_store::StoreError;
use deckhand_core::ports::credential_source::CredentialError;

/// Total-failure taxonomy for a deploy attempt
///
/// These are the "nothing was written" failures. Per-file commit failures
/// and cancellation are not errors; they are outcomes carried in the
/// [`DeployReport`] so the per-file result list always accompanies them.
#[derive(Debug, Error)]
pub enum DeployError {
    /// No credential is configured; never entered `fetching`
    #[error("not authenticated: configure a token before deploying")]
    NotAuthenticated,

    /// A credential exists but is unusable
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The remote content store failed before any write happened
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Fetched remote content failed shape validation
    #[error("content validation failed: {0}")]
    ContentValidation(String),

    /// The manifest's remote version moved since we last saw it
    #[error("stale remote state for {path}: refusing to guess a merge")]
    StaleRemoteState { path: String },

    /// Workspace, fingerprint, or arbiter plumbing failed
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

impl From<CredentialError> for DeployError {
    fn from(e: CredentialError) -> Self {
        match e {
            CredentialError::NotAuthenticated => DeployError::NotAuthenticated,
            CredentialError::InvalidToken(reason) => DeployError::InvalidToken(reason),
        }
    }
}

impl From<deckhand_conflict::ConflictError> for DeployError {
    fn from(e: deckhand_conflict::ConflictError) -> Self {
        use deckhand_conflict::ConflictError;
        match e {
            ConflictError::ContentValidation { path, reason } => {
                DeployError::ContentValidation(format!("{path}: {reason}"))
            }
            ConflictError::Store(e) => DeployError::Store(e),
            ConflictError::Storage(e) => DeployError::Persistence(e),
        }
    }
}
