//! Local working-state provider port (driven/secondary port)
//!
//! Exposes a snapshot read of the current structured documents and binary
//! assets. Read-only from the engine's perspective, except for
//! `apply_remote`, which writes back content the user chose to pull during
//! conflict resolution.

use crate::domain::newtypes::RepoPath;

/// A file from the local working state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// Logical path, identical to the remote repository path
    pub path: RepoPath,
    pub content: Vec<u8>,
    /// True for structured (JSON) documents, false for binary assets
    pub is_document: bool,
}

impl LocalFile {
    pub fn document(path: RepoPath, content: Vec<u8>) -> Self {
        Self {
            path,
            content,
            is_document: true,
        }
    }

    pub fn asset(path: RepoPath, content: Vec<u8>) -> Self {
        Self {
            path,
            content,
            is_document: false,
        }
    }
}

/// Port trait for the local working state
#[async_trait::async_trait]
pub trait IWorkspaceSource: Send + Sync {
    /// Reads the current working state: all documents and assets.
    async fn snapshot(&self) -> anyhow::Result<Vec<LocalFile>>;

    /// Applies remote content to the local working state (pull resolution).
    async fn apply_remote(&self, path: &RepoPath, content: &[u8]) -> anyhow::Result<()>;
}
