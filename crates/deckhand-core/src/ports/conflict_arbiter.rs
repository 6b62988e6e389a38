//! Conflict resolution protocol boundary (driven/secondary port)
//!
//! For genuine conflicts the engine emits the full conflict list and waits
//! for per-file decisions before any remote write occurs. There is no
//! default: an unanswered conflict aborts the whole deploy.

use crate::domain::change::{ConflictInfo, ResolvedConflict};

/// Port trait for collecting conflict decisions from the collaborator
#[async_trait::async_trait]
pub trait IConflictArbiter: Send + Sync {
    /// Requests one decision per conflicting path.
    ///
    /// Returns `Ok(None)` to cancel the deploy entirely; a returned list
    /// missing a decision for any conflicted path is treated the same way
    /// by the engine.
    async fn resolve(
        &self,
        conflicts: &[ConflictInfo],
    ) -> anyhow::Result<Option<Vec<ResolvedConflict>>>;
}
