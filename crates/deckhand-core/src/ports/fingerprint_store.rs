//! Fingerprint store port (driven/secondary port)
//!
//! Durable map from logical path to the last successfully published state.
//! Entries are mutated in memory and only persisted when `save()` is
//! invoked, so the orchestrator can batch several logical updates into one
//! durable write — and discard unsaved absorptions on cancellation.
//!
//! Uses `anyhow::Result` because persistence failures here are uniformly
//! fatal to a deploy attempt and need no finer classification.

use std::collections::BTreeMap;

use crate::domain::fingerprint::FingerprintEntry;
use crate::domain::newtypes::RepoPath;

/// Port trait for the path→fingerprint cache
#[async_trait::async_trait]
pub trait IFingerprintStore: Send + Sync {
    /// Returns the entry for a path, if one exists.
    async fn get(&self, path: &RepoPath) -> anyhow::Result<Option<FingerprintEntry>>;

    /// Inserts or replaces the entry for a path (in memory only).
    async fn set(&self, path: RepoPath, entry: FingerprintEntry) -> anyhow::Result<()>;

    /// Removes the entry for a path (in memory only).
    async fn remove(&self, path: &RepoPath) -> anyhow::Result<()>;

    /// Returns a snapshot of all entries.
    async fn get_all(&self) -> anyhow::Result<BTreeMap<RepoPath, FingerprintEntry>>;

    /// Persists the in-memory state durably.
    async fn save(&self) -> anyhow::Result<()>;
}
