//! Detected changes and conflict records
//!
//! `FileChange` and `ConflictInfo` are ephemeral: they are recomputed from
//! scratch on every deploy attempt and never persisted. The change kind is
//! derived by the detector, never asserted by a caller.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::newtypes::{ContentHash, RepoPath, VersionId};

/// How a local file differs from the fingerprint cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// No fingerprint entry exists for this path
    Added,
    /// A fingerprint entry exists with a different content hash
    Modified,
    /// A fingerprint entry exists but the local source no longer does
    Deleted,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
        };
        write!(f, "{}", s)
    }
}

/// A single detected difference between the local working state and the
/// fingerprint cache
///
/// Constructed only through [`FileChange::added`], [`FileChange::modified`],
/// and [`FileChange::deleted`], which enforce the content/hash presence
/// invariant: both are present except for deletions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    path: RepoPath,
    kind: ChangeKind,
    content: Option<Vec<u8>>,
    content_hash: Option<ContentHash>,
    local_version_id: Option<VersionId>,
}

impl FileChange {
    /// A file with no fingerprint entry.
    pub fn added(path: RepoPath, content: Vec<u8>, content_hash: ContentHash) -> Self {
        Self {
            path,
            kind: ChangeKind::Added,
            content: Some(content),
            content_hash: Some(content_hash),
            local_version_id: None,
        }
    }

    /// A file whose hash disagrees with its fingerprint entry.
    pub fn modified(
        path: RepoPath,
        content: Vec<u8>,
        content_hash: ContentHash,
        local_version_id: VersionId,
    ) -> Self {
        Self {
            path,
            kind: ChangeKind::Modified,
            content: Some(content),
            content_hash: Some(content_hash),
            local_version_id: Some(local_version_id),
        }
    }

    /// A fingerprinted path with no corresponding local file.
    pub fn deleted(path: RepoPath, local_version_id: VersionId) -> Self {
        Self {
            path,
            kind: ChangeKind::Deleted,
            content: None,
            content_hash: None,
            local_version_id: Some(local_version_id),
        }
    }

    pub fn path(&self) -> &RepoPath {
        &self.path
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// Local content bytes; `None` only for deletions.
    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    /// Canonical hash of the local content; `None` only for deletions.
    pub fn content_hash(&self) -> Option<&ContentHash> {
        self.content_hash.as_ref()
    }

    /// The remote version id the fingerprint cache recorded when this change
    /// was computed. `None` means the engine believes the path is new.
    pub fn local_version_id(&self) -> Option<&VersionId> {
        self.local_version_id.as_ref()
    }

    /// Replaces the recorded version id with a freshly fetched one.
    ///
    /// Used when an `overwrite` resolution re-arms the write precondition
    /// against the remote's current version.
    pub fn rearm_precondition(&mut self, version_id: VersionId) {
        self.local_version_id = Some(version_id);
    }
}

/// A detected change annotated with the freshly fetched remote state
#[derive(Debug, Clone)]
pub struct ConflictInfo {
    change: FileChange,
    remote_version_id: Option<VersionId>,
    has_conflict: bool,
}

impl ConflictInfo {
    pub fn new(change: FileChange, remote_version_id: Option<VersionId>, has_conflict: bool) -> Self {
        Self {
            change,
            remote_version_id,
            has_conflict,
        }
    }

    pub fn change(&self) -> &FileChange {
        &self.change
    }

    pub fn into_change(self) -> FileChange {
        self.change
    }

    pub fn path(&self) -> &RepoPath {
        self.change.path()
    }

    /// The remote's current version id, fetched during this attempt.
    pub fn remote_version_id(&self) -> Option<&VersionId> {
        self.remote_version_id.as_ref()
    }

    pub fn has_conflict(&self) -> bool {
        self.has_conflict
    }

    /// Marks the conflict as settled without changing the remote snapshot.
    pub fn mark_resolved(&mut self) {
        self.has_conflict = false;
    }

    pub fn change_mut(&mut self) -> &mut FileChange {
        &mut self.change
    }
}

/// Per-file decision for a genuine conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Local content wins; the write proceeds with the just-fetched remote
    /// version id as its precondition
    Overwrite,
    /// Remote content wins; it is applied locally and the path leaves the
    /// commit set
    Pull,
    /// The path leaves the commit set with no local or remote mutation
    Skip,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resolution::Overwrite => "overwrite",
            Resolution::Pull => "pull",
            Resolution::Skip => "skip",
        };
        write!(f, "{}", s)
    }
}

/// One decision per conflicting path, produced by the external collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConflict {
    pub path: RepoPath,
    pub resolution: Resolution,
}

impl ResolvedConflict {
    pub fn new(path: RepoPath, resolution: Resolution) -> Self {
        Self { path, resolution }
    }
}
