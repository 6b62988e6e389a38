//! Sequential commit batch
//!
//! Writes the final commit set one file at a time, in order. Per-file
//! failures do not abort the batch; rate-limit exhaustion does, because
//! further attempts would burn quota with no chance of success. Fingerprint
//! updates are staged only after a confirmed write, so the cache always
//! reflects exactly what landed remotely.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use deckhand_core::domain::change::{ChangeKind, ConflictInfo};
use deckhand_core::domain::commit::CommitResult;
use deckhand_core::domain::fingerprint::FingerprintEntry;
use deckhand_core::ports::content_store::{IContentStore, StoreError};
use deckhand_core::ports::fingerprint_store::IFingerprintStore;

use crate::engine::DeployEvent;

/// Executes the commit set sequentially, returning one result per path.
///
/// Writes are never concurrent: each precondition was derived from a fetch
/// earlier in this attempt, and parallel writes would invalidate each
/// other's. Staged fingerprint mutations are in-memory; the caller decides
/// when to persist them.
pub async fn commit_batch(
    commit: Vec<ConflictInfo>,
    store: &dyn IContentStore,
    fingerprints: &dyn IFingerprintStore,
    message_prefix: &str,
    events: Option<&UnboundedSender<DeployEvent>>,
) -> Vec<CommitResult> {
    let mut results = Vec::with_capacity(commit.len());
    let mut items = commit.into_iter();

    while let Some(info) = items.next() {
        let (result, rate_limited) =
            commit_one(&info, store, fingerprints, message_prefix).await;

        match &result {
            CommitResult { success: true, .. } => {
                info!(path = %result.path, version = ?result.new_version_id, "Committed");
                emit(
                    events,
                    DeployEvent::FileCommitted {
                        path: result.path.clone(),
                        new_version_id: result.new_version_id.clone(),
                    },
                );
            }
            CommitResult { error, .. } => {
                let reason = error.as_deref().unwrap_or("unknown");
                warn!(path = %result.path, error = reason, "Commit failed");
                emit(
                    events,
                    DeployEvent::FileFailed {
                        path: result.path.clone(),
                        error: reason.to_string(),
                    },
                );
            }
        }

        results.push(result);

        if rate_limited {
            // Hard stop: mark everything left unattempted and bail.
            warn!("Rate limit exhausted; stopping the batch");
            for remaining in items {
                let result = CommitResult::failed(
                    remaining.path().clone(),
                    "rate limit exceeded; write not attempted",
                );
                emit(
                    events,
                    DeployEvent::FileFailed {
                        path: result.path.clone(),
                        error: "rate limit exceeded; write not attempted".to_string(),
                    },
                );
                results.push(result);
            }
            break;
        }
    }

    results
}

/// Commits one item; the flag reports rate-limit exhaustion.
async fn commit_one(
    info: &ConflictInfo,
    store: &dyn IContentStore,
    fingerprints: &dyn IFingerprintStore,
    message_prefix: &str,
) -> (CommitResult, bool) {
    let change = info.change();
    let path = change.path();

    // A delete whose remote is already absent needs no remote call: the
    // fingerprint entry goes away and the path counts as committed.
    if change.kind() == ChangeKind::Deleted && info.remote_version_id().is_none() {
        info!(path = %path, "Remote already absent; local-only delete");
        let result = match fingerprints.remove(path).await {
            Ok(()) => CommitResult::succeeded(path.clone(), None),
            Err(e) => CommitResult::failed(path.clone(), format!("fingerprint removal: {e:#}")),
        };
        return (result, false);
    }

    let message = match change.kind() {
        ChangeKind::Added | ChangeKind::Modified => {
            format!("{message_prefix}: update {path}")
        }
        ChangeKind::Deleted => format!("{message_prefix}: delete {path}"),
    };

    let written = store
        .write(
            path,
            change.content(),
            change.local_version_id(),
            &message,
        )
        .await;

    match written {
        Ok(new_version_id) => {
            let staged = match (&new_version_id, change.content_hash()) {
                (Some(version_id), Some(hash)) => {
                    let entry = FingerprintEntry::new(version_id.clone(), hash.clone());
                    fingerprints.set(path.clone(), entry).await
                }
                _ => fingerprints.remove(path).await,
            };
            let result = match staged {
                Ok(()) => CommitResult::succeeded(path.clone(), new_version_id),
                Err(e) => {
                    CommitResult::failed(path.clone(), format!("fingerprint staging: {e:#}"))
                }
            };
            (result, false)
        }
        Err(e @ StoreError::RateLimited { .. }) => {
            (CommitResult::failed(path.clone(), e.to_string()), true)
        }
        Err(e) => (CommitResult::failed(path.clone(), e.to_string()), false),
    }
}

fn emit(events: Option<&UnboundedSender<DeployEvent>>, event: DeployEvent) {
    if let Some(tx) = events {
        // A dropped receiver just means nobody is listening.
        let _ = tx.send(event);
    }
}
