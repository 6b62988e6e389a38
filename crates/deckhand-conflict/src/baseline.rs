//! Baseline reconciliation
//!
//! Clears false-positive conflicts for `added` files: when a path the
//! engine believes is new already exists remotely with structurally equal
//! content, the remote version id is absorbed into the fingerprint store
//! and the file leaves the change set with zero writes.
//!
//! Absorptions are staged in memory only; the orchestrator decides when
//! (and whether) to persist them.

use anyhow::Context;
use tracing::{debug, warn};

use deckhand_core::domain::canonical::hash_content;
use deckhand_core::domain::change::{ChangeKind, ConflictInfo};
use deckhand_core::domain::fingerprint::FingerprintEntry;
use deckhand_core::domain::newtypes::RepoPath;
use deckhand_core::ports::content_store::IContentStore;
use deckhand_core::ports::fingerprint_store::IFingerprintStore;

use crate::equivalence::contents_equivalent;
use crate::error::ConflictError;

/// What baseline reconciliation did to the change set
#[derive(Debug)]
pub struct BaselineOutcome {
    /// Changes still in play, genuine conflicts included
    pub remaining: Vec<ConflictInfo>,
    /// Paths absorbed with zero writes
    pub reconciled: Vec<RepoPath>,
}

/// Runs baseline reconciliation over a classified change set.
///
/// Only `added`-with-existing-remote candidates are examined; every other
/// change passes through untouched. Fetch failures abort: nothing has been
/// written yet, so the attempt is still non-destructive.
pub async fn reconcile_baseline(
    conflicts: Vec<ConflictInfo>,
    store: &dyn IContentStore,
    fingerprints: &dyn IFingerprintStore,
) -> Result<BaselineOutcome, ConflictError> {
    let mut remaining = Vec::with_capacity(conflicts.len());
    let mut reconciled = Vec::new();

    for mut info in conflicts {
        if !(info.has_conflict() && info.change().kind() == ChangeKind::Added) {
            remaining.push(info);
            continue;
        }

        let Some(remote) = store.fetch_content(info.path()).await? else {
            // Remote vanished between the probe and this fetch. The add is
            // safe again: it proceeds as a plain create.
            debug!(path = %info.path(), "Remote disappeared before baseline check");
            info.mark_resolved();
            remaining.push(info);
            continue;
        };

        let local = info.change().content().ok_or_else(|| {
            ConflictError::ContentValidation {
                path: info.path().to_string(),
                reason: "added change carries no content".to_string(),
            }
        })?;

        if contents_equivalent(local, &remote.content) {
            warn!(
                path = %info.path(),
                remote_version = %remote.version_id,
                "Absorbing remote version: content already equal"
            );
            let entry = FingerprintEntry::new(remote.version_id, hash_content(local));
            fingerprints
                .set(info.path().clone(), entry)
                .await
                .with_context(|| format!("absorbing baseline for {}", info.path()))?;
            reconciled.push(info.path().clone());
        } else {
            remaining.push(info);
        }
    }

    Ok(BaselineOutcome {
        remaining,
        reconciled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    use deckhand_core::domain::canonical::hash_bytes;
    use deckhand_core::domain::change::FileChange;
    use deckhand_core::domain::newtypes::VersionId;
    use deckhand_core::ports::content_store::{RemoteContent, StoreError};

    fn path(s: &str) -> RepoPath {
        RepoPath::new(s.to_string()).unwrap()
    }

    fn vid(s: &str) -> VersionId {
        VersionId::new(s.to_string()).unwrap()
    }

    struct FakeStore {
        contents: HashMap<RepoPath, RemoteContent>,
    }

    #[async_trait::async_trait]
    impl IContentStore for FakeStore {
        async fn fetch_version_ids(
            &self,
            paths: &[RepoPath],
        ) -> Result<HashMap<RepoPath, Option<VersionId>>, StoreError> {
            Ok(paths
                .iter()
                .map(|p| {
                    (
                        p.clone(),
                        self.contents.get(p).map(|c| c.version_id.clone()),
                    )
                })
                .collect())
        }

        async fn fetch_content(
            &self,
            path: &RepoPath,
        ) -> Result<Option<RemoteContent>, StoreError> {
            Ok(self.contents.get(path).cloned())
        }

        async fn write(
            &self,
            _path: &RepoPath,
            _content: Option<&[u8]>,
            _expected_version_id: Option<&VersionId>,
            _message: &str,
        ) -> Result<Option<VersionId>, StoreError> {
            panic!("baseline reconciliation must never write");
        }
    }

    #[derive(Default)]
    struct FakeFingerprints {
        entries: Mutex<BTreeMap<RepoPath, FingerprintEntry>>,
    }

    #[async_trait::async_trait]
    impl IFingerprintStore for FakeFingerprints {
        async fn get(&self, path: &RepoPath) -> anyhow::Result<Option<FingerprintEntry>> {
            Ok(self.entries.lock().unwrap().get(path).cloned())
        }

        async fn set(&self, path: RepoPath, entry: FingerprintEntry) -> anyhow::Result<()> {
            self.entries.lock().unwrap().insert(path, entry);
            Ok(())
        }

        async fn remove(&self, path: &RepoPath) -> anyhow::Result<()> {
            self.entries.lock().unwrap().remove(path);
            Ok(())
        }

        async fn get_all(&self) -> anyhow::Result<BTreeMap<RepoPath, FingerprintEntry>> {
            Ok(self.entries.lock().unwrap().clone())
        }

        async fn save(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn added_conflict(p: &str, content: &[u8], remote_vid: &str) -> ConflictInfo {
        let change = FileChange::added(path(p), content.to_vec(), hash_bytes(content));
        ConflictInfo::new(change, Some(vid(remote_vid)), true)
    }

    #[tokio::test]
    async fn test_equal_content_is_absorbed() {
        let store = FakeStore {
            contents: HashMap::from([(
                path("b.json"),
                RemoteContent {
                    version_id: vid("sha9"),
                    content: br#"{"x":1}"#.to_vec(),
                },
            )]),
        };
        let fingerprints = FakeFingerprints::default();

        let outcome = reconcile_baseline(
            vec![added_conflict("b.json", br#"{"x": 1}"#, "sha9")],
            &store,
            &fingerprints,
        )
        .await
        .unwrap();

        assert!(outcome.remaining.is_empty());
        assert_eq!(outcome.reconciled, vec![path("b.json")]);

        let entry = fingerprints.get(&path("b.json")).await.unwrap().unwrap();
        assert_eq!(entry.remote_version_id().as_str(), "sha9");
    }

    #[tokio::test]
    async fn test_unequal_content_stays_conflicted() {
        let store = FakeStore {
            contents: HashMap::from([(
                path("b.json"),
                RemoteContent {
                    version_id: vid("sha9"),
                    content: br#"{"x":2}"#.to_vec(),
                },
            )]),
        };
        let fingerprints = FakeFingerprints::default();

        let outcome = reconcile_baseline(
            vec![added_conflict("b.json", br#"{"x":1}"#, "sha9")],
            &store,
            &fingerprints,
        )
        .await
        .unwrap();

        assert_eq!(outcome.remaining.len(), 1);
        assert!(outcome.remaining[0].has_conflict());
        assert!(outcome.reconciled.is_empty());
        assert!(fingerprints.get(&path("b.json")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_vanished_remote_becomes_safe_add() {
        let store = FakeStore {
            contents: HashMap::new(),
        };
        let fingerprints = FakeFingerprints::default();

        let outcome = reconcile_baseline(
            vec![added_conflict("b.json", br#"{"x":1}"#, "sha9")],
            &store,
            &fingerprints,
        )
        .await
        .unwrap();

        assert_eq!(outcome.remaining.len(), 1);
        assert!(!outcome.remaining[0].has_conflict());
    }

    #[tokio::test]
    async fn test_non_added_changes_pass_through() {
        let store = FakeStore {
            contents: HashMap::new(),
        };
        let fingerprints = FakeFingerprints::default();

        let change = FileChange::modified(
            path("a.json"),
            b"{}".to_vec(),
            hash_bytes(b"{}"),
            vid("sha1"),
        );
        let info = ConflictInfo::new(change, Some(vid("sha2")), true);

        let outcome = reconcile_baseline(vec![info], &store, &fingerprints)
            .await
            .unwrap();

        assert_eq!(outcome.remaining.len(), 1);
        assert!(outcome.remaining[0].has_conflict());
    }
}
