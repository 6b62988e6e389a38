//! Remote content store port (driven/secondary port)
//!
//! The narrow gateway interface behind which every remote API call lives,
//! so the conflict engine and orchestrator can be tested with a fake store
//! and no network.
//!
//! ## Design Notes
//!
//! - Returns a dedicated [`StoreError`] rather than `anyhow::Error`: the
//!   orchestrator must discriminate rate-limit, precondition, and
//!   authentication failures loss-free across this boundary.
//! - A missing remote file is a valid outcome (`Ok(None)` on fetch,
//!   `None` in the version-id map), never an error.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::newtypes::{RepoPath, VersionId};

/// Errors surfaced by the remote content store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The bearer credential was rejected by the remote
    #[error("not authenticated with the remote content store")]
    NotAuthenticated,

    /// The request quota is exhausted; a hard stop, not a retryable error
    #[error("rate limit exceeded{}", reset_hint(.reset_at))]
    RateLimited {
        /// When the quota resets, if the remote said so
        reset_at: Option<DateTime<Utc>>,
    },

    /// The write's optimistic-concurrency precondition did not hold
    #[error("precondition failed for {path}: remote version changed")]
    PreconditionFailed {
        /// The path whose remote version moved underneath us
        path: RepoPath,
    },

    /// A network-level failure (connect, timeout, TLS)
    #[error("network error: {0}")]
    Network(String),

    /// The remote answered with something we could not interpret
    #[error("invalid response from remote: {0}")]
    InvalidResponse(String),
}

fn reset_hint(reset_at: &Option<DateTime<Utc>>) -> String {
    match reset_at {
        Some(at) => format!(", resets at {at}"),
        None => String::new(),
    }
}

/// A remote file's current version id and content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteContent {
    pub version_id: VersionId,
    pub content: Vec<u8>,
}

/// Port trait for the remote content repository
///
/// ## Implementation Notes
///
/// - `write` with `content = None` deletes the file.
/// - `expected_version_id` is passed through as the write's
///   optimistic-concurrency precondition; `None` means "create, must not
///   exist" for new files.
/// - Implementations must not retry: failures are surfaced to the
///   orchestrator, which decides what to do with them.
#[async_trait::async_trait]
pub trait IContentStore: Send + Sync {
    /// Fetches the current remote version id for each path.
    ///
    /// `None` in the result map means the path does not exist remotely,
    /// which is a valid, non-error outcome.
    async fn fetch_version_ids(
        &self,
        paths: &[RepoPath],
    ) -> Result<HashMap<RepoPath, Option<VersionId>>, StoreError>;

    /// Fetches the current remote content and version id for one path.
    ///
    /// Returns `Ok(None)` if the path does not exist remotely.
    async fn fetch_content(&self, path: &RepoPath) -> Result<Option<RemoteContent>, StoreError>;

    /// Performs a single-file create, update, or delete.
    ///
    /// Returns the new version id for creates and updates, `None` for
    /// deletes. `message` becomes the remote commit message.
    async fn write(
        &self,
        path: &RepoPath,
        content: Option<&[u8]>,
        expected_version_id: Option<&VersionId>,
        message: &str,
    ) -> Result<Option<VersionId>, StoreError>;
}
