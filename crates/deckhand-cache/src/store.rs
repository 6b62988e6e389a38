//! JSON-file fingerprint store
//!
//! Persists a versioned document at a configurable path (by default
//! `.deckhand/fingerprints.json`):
//!
//! ```json
//! {
//!   "version": 1,
//!   "savedAt": "2026-08-31T12:00:00Z",
//!   "entries": { "docs/a.json": { ... } }
//! }
//! ```
//!
//! Writes go to `<path>.tmp` and are renamed into place, so a crash
//! mid-save never leaves a torn cache file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use deckhand_core::domain::fingerprint::FingerprintEntry;
use deckhand_core::domain::newtypes::RepoPath;
use deckhand_core::ports::fingerprint_store::IFingerprintStore;

use crate::CacheError;

/// Current on-disk format version
const FORMAT_VERSION: u32 = 1;

/// On-disk cache payload
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheFile {
    version: u32,
    saved_at: DateTime<Utc>,
    entries: BTreeMap<RepoPath, FingerprintEntry>,
}

/// `IFingerprintStore` backed by a single JSON file
///
/// Mutations only touch the in-memory map; the file is rewritten in full
/// on `save()`. A missing file loads as an empty store.
#[derive(Debug)]
pub struct JsonFingerprintStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<RepoPath, FingerprintEntry>>,
}

impl JsonFingerprintStore {
    /// Loads the store from `path`, or starts empty if the file does not
    /// exist yet.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let entries = Self::read_entries(&path)?;
        debug!(path = %path.display(), entries = entries.len(), "Loaded fingerprint cache");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Path of the backing cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<RepoPath, FingerprintEntry>, CacheError> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(path)?;
        let file: CacheFile = serde_json::from_str(&contents)?;
        if file.version != FORMAT_VERSION {
            return Err(CacheError::UnsupportedVersion(file.version));
        }
        Ok(file.entries)
    }

    fn write_entries(
        path: &Path,
        entries: &BTreeMap<RepoPath, FingerprintEntry>,
    ) -> Result<(), CacheError> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }

        let file = CacheFile {
            version: FORMAT_VERSION,
            saved_at: Utc::now(),
            entries: entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            // Best effort: do not leave the temp file behind on failure.
            if std::fs::remove_file(&tmp).is_err() {
                warn!(path = %tmp.display(), "Could not remove stale temp cache file");
            }
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl IFingerprintStore for JsonFingerprintStore {
    async fn get(&self, path: &RepoPath) -> anyhow::Result<Option<FingerprintEntry>> {
        Ok(self.entries.lock().await.get(path).cloned())
    }

    async fn set(&self, path: RepoPath, entry: FingerprintEntry) -> anyhow::Result<()> {
        self.entries.lock().await.insert(path, entry);
        Ok(())
    }

    async fn remove(&self, path: &RepoPath) -> anyhow::Result<()> {
        self.entries.lock().await.remove(path);
        Ok(())
    }

    async fn get_all(&self) -> anyhow::Result<BTreeMap<RepoPath, FingerprintEntry>> {
        Ok(self.entries.lock().await.clone())
    }

    async fn save(&self) -> anyhow::Result<()> {
        let entries = self.entries.lock().await;
        debug!(path = %self.path.display(), entries = entries.len(), "Saving fingerprint cache");
        Self::write_entries(&self.path, &entries)?;
        Ok(())
    }
}
