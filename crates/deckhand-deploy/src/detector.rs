//! Change detection
//!
//! Pure comparison of a workspace snapshot against the fingerprint cache.
//! The change kind is derived here and nowhere else:
//!
//! - no fingerprint entry → `added`
//! - entry present, canonical hash differs → `modified`
//! - entry present, no local file → `deleted`
//!
//! Hashing uses the canonical form throughout, so key-order churn in a
//! document never produces a spurious `modified`.

use std::collections::BTreeMap;

use tracing::debug;

use deckhand_core::domain::canonical::hash_content;
use deckhand_core::domain::change::FileChange;
use deckhand_core::domain::fingerprint::FingerprintEntry;
use deckhand_core::domain::newtypes::RepoPath;
use deckhand_core::ports::workspace_source::LocalFile;

/// Computes the candidate change set.
///
/// Output is ordered: all adds/modifications in snapshot order, then
/// deletions in fingerprint order. Unchanged files produce nothing.
pub fn detect_changes(
    snapshot: &[LocalFile],
    fingerprints: &BTreeMap<RepoPath, FingerprintEntry>,
) -> Vec<FileChange> {
    let mut changes = Vec::new();

    for file in snapshot {
        let hash = hash_content(&file.content);
        match fingerprints.get(&file.path) {
            None => {
                debug!(path = %file.path, "Detected added file");
                changes.push(FileChange::added(
                    file.path.clone(),
                    file.content.clone(),
                    hash,
                ));
            }
            Some(entry) if entry.content_hash() != &hash => {
                debug!(path = %file.path, "Detected modified file");
                changes.push(FileChange::modified(
                    file.path.clone(),
                    file.content.clone(),
                    hash,
                    entry.remote_version_id().clone(),
                ));
            }
            Some(_) => {}
        }
    }

    for (path, entry) in fingerprints {
        if !snapshot.iter().any(|f| &f.path == path) {
            debug!(path = %path, "Detected deleted file");
            changes.push(FileChange::deleted(
                path.clone(),
                entry.remote_version_id().clone(),
            ));
        }
    }

    changes
}
