//! Per-file commit results
//!
//! One `CommitResult` per attempted write. A failed result never leads to
//! a fingerprint update for that path.

use serde::{Deserialize, Serialize};

use super::newtypes::{RepoPath, VersionId};

/// Outcome of a single write in the commit batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitResult {
    pub path: RepoPath,
    pub success: bool,
    /// New remote version id; `None` on failure, and for deletions
    pub new_version_id: Option<VersionId>,
    /// Failure reason; `None` on success
    pub error: Option<String>,
}

impl CommitResult {
    /// A confirmed write. `new_version_id` is `None` for deletions.
    pub fn succeeded(path: RepoPath, new_version_id: Option<VersionId>) -> Self {
        Self {
            path,
            success: true,
            new_version_id,
            error: None,
        }
    }

    /// A failed write with its reason.
    pub fn failed(path: RepoPath, error: impl Into<String>) -> Self {
        Self {
            path,
            success: false,
            new_version_id: None,
            error: Some(error.into()),
        }
    }
}
