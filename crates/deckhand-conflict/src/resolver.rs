//! Application of resolution decisions to the commit set
//!
//! Decisions are validated for completeness before any side effect runs:
//! resolution happens strictly before the first write, so a cancellation
//! (or a single unanswered conflict, which counts as one) must leave the
//! workspace, the fingerprint store, and the remote untouched.

use std::collections::HashMap;

use anyhow::Context;
use tracing::{info, warn};

use deckhand_core::domain::canonical::hash_content;
use deckhand_core::domain::change::{ConflictInfo, Resolution, ResolvedConflict};
use deckhand_core::domain::fingerprint::FingerprintEntry;
use deckhand_core::domain::newtypes::RepoPath;
use deckhand_core::ports::content_store::IContentStore;
use deckhand_core::ports::fingerprint_store::IFingerprintStore;
use deckhand_core::ports::workspace_source::IWorkspaceSource;

use crate::error::ConflictError;

/// Result of applying conflict decisions
#[derive(Debug)]
pub enum ResolutionOutcome {
    /// The collaborator declined (or left a conflict unanswered); nothing
    /// was touched
    Cancelled,
    /// The commit set after resolution, plus what left it and why
    Resolved {
        commit: Vec<ConflictInfo>,
        pulled: Vec<RepoPath>,
        skipped: Vec<RepoPath>,
    },
}

/// Applies per-file decisions to a classified change set.
///
/// Safe changes pass through to the commit set untouched. For conflicting
/// paths: `overwrite` re-arms the write precondition with the just-fetched
/// remote version id, `pull` applies remote content locally and absorbs its
/// version id, `skip` drops the path with no mutation on either side.
pub async fn apply_resolutions(
    conflicts: Vec<ConflictInfo>,
    decisions: Option<Vec<ResolvedConflict>>,
    store: &dyn IContentStore,
    workspace: &dyn IWorkspaceSource,
    fingerprints: &dyn IFingerprintStore,
) -> Result<ResolutionOutcome, ConflictError> {
    let Some(decisions) = decisions else {
        info!("Conflict resolution cancelled");
        return Ok(ResolutionOutcome::Cancelled);
    };

    let by_path: HashMap<&RepoPath, Resolution> = decisions
        .iter()
        .map(|d| (&d.path, d.resolution))
        .collect();

    // An unanswered conflict is a cancellation; check before side effects.
    for info in conflicts.iter().filter(|i| i.has_conflict()) {
        if !by_path.contains_key(info.path()) {
            warn!(path = %info.path(), "No decision for conflicting path; cancelling");
            return Ok(ResolutionOutcome::Cancelled);
        }
    }

    let mut commit = Vec::with_capacity(conflicts.len());
    let mut pulled = Vec::new();
    let mut skipped = Vec::new();

    for mut info in conflicts {
        if !info.has_conflict() {
            commit.push(info);
            continue;
        }

        // Completeness was checked above.
        let Some(resolution) = by_path.get(info.path()).copied() else {
            return Ok(ResolutionOutcome::Cancelled);
        };

        match resolution {
            Resolution::Overwrite => {
                info!(path = %info.path(), "Resolution: overwrite, local content wins");
                if let Some(remote_id) = info.remote_version_id().cloned() {
                    info.change_mut().rearm_precondition(remote_id);
                }
                info.mark_resolved();
                commit.push(info);
            }
            Resolution::Pull => {
                info!(path = %info.path(), "Resolution: pull, remote content wins");
                pull_remote(&info, store, workspace, fingerprints).await?;
                pulled.push(info.path().clone());
            }
            Resolution::Skip => {
                info!(path = %info.path(), "Resolution: skip");
                skipped.push(info.path().clone());
            }
        }
    }

    Ok(ResolutionOutcome::Resolved {
        commit,
        pulled,
        skipped,
    })
}

/// Applies remote content locally and absorbs its version id.
async fn pull_remote(
    info: &ConflictInfo,
    store: &dyn IContentStore,
    workspace: &dyn IWorkspaceSource,
    fingerprints: &dyn IFingerprintStore,
) -> Result<(), ConflictError> {
    match store.fetch_content(info.path()).await? {
        Some(remote) => {
            workspace
                .apply_remote(info.path(), &remote.content)
                .await
                .with_context(|| format!("applying pulled content for {}", info.path()))?;
            let entry =
                FingerprintEntry::new(remote.version_id, hash_content(&remote.content));
            fingerprints
                .set(info.path().clone(), entry)
                .await
                .with_context(|| format!("recording pulled fingerprint for {}", info.path()))?;
        }
        None => {
            // Remote vanished since classification; there is nothing left
            // to pull, so the stale fingerprint goes away instead.
            warn!(path = %info.path(), "Remote gone at pull time; dropping fingerprint");
            fingerprints
                .remove(info.path())
                .await
                .with_context(|| format!("dropping fingerprint for {}", info.path()))?;
        }
    }
    Ok(())
}
