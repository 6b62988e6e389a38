//! Conflict classification
//!
//! Pairs every detected change with the freshly fetched remote version id
//! and decides whether the two can disagree. Classification is pure: it
//! never touches the network, the workspace, or the fingerprint store.
//!
//! Rules per change kind:
//! - `added`: flagged when a remote version already exists for a path the
//!   engine believes is new. Baseline reconciliation gets a chance to clear
//!   the flag before it is treated as a genuine conflict.
//! - `modified`: flagged when the recorded version id disagrees with the
//!   fetched one (including a remote that vanished).
//! - `deleted`: flagged when a remote version exists and differs from the
//!   recorded one. A remote that is already absent is a safe local-only
//!   no-op.

use std::collections::HashMap;

use tracing::{debug, info};

use deckhand_core::domain::change::{ChangeKind, ConflictInfo, FileChange};
use deckhand_core::domain::newtypes::{RepoPath, VersionId};

/// Annotates each change with remote state and a conflict flag.
///
/// `remote_ids` must contain an entry for every change path; a missing
/// entry is treated as "absent remotely", which only a probe bug would
/// produce.
pub fn classify_changes(
    changes: Vec<FileChange>,
    remote_ids: &HashMap<RepoPath, Option<VersionId>>,
) -> Vec<ConflictInfo> {
    changes
        .into_iter()
        .map(|change| {
            let remote_id = remote_ids.get(change.path()).cloned().flatten();
            let has_conflict = is_conflicting(&change, remote_id.as_ref());

            if has_conflict {
                info!(
                    path = %change.path(),
                    kind = %change.kind(),
                    local_version = ?change.local_version_id(),
                    remote_version = ?remote_id,
                    "Conflict candidate: remote state disagrees"
                );
            } else {
                debug!(path = %change.path(), kind = %change.kind(), "Safe change");
            }

            ConflictInfo::new(change, remote_id, has_conflict)
        })
        .collect()
}

fn is_conflicting(change: &FileChange, remote_id: Option<&VersionId>) -> bool {
    match change.kind() {
        ChangeKind::Added => remote_id.is_some(),
        ChangeKind::Modified => change.local_version_id() != remote_id,
        ChangeKind::Deleted => match remote_id {
            Some(remote) => change.local_version_id() != Some(remote),
            None => false,
        },
    }
}
