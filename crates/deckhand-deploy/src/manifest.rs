//! Shared asset manifest document
//!
//! The manifest is a JSON document living in the remote repository that
//! registers every published asset by name. Remote content is never
//! trusted blindly: it is parsed and shape-checked before any comparison
//! or merge, and registration is strictly additive — an existing entry is
//! never overwritten.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use deckhand_core::domain::newtypes::{ContentHash, RepoPath};

use crate::DeployError;

/// Manifest format version this build reads and writes
pub const MANIFEST_VERSION: u32 = 1;

/// One registered asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    /// Repository path of the asset file
    pub path: RepoPath,
    /// Canonical content hash of the asset
    pub hash: ContentHash,
    /// Size in bytes
    pub size: u64,
}

/// The parsed manifest document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    version: u32,
    assets: BTreeMap<String, AssetEntry>,
}

impl AssetManifest {
    /// A manifest with no registered assets, for repositories that have
    /// never published one.
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            assets: BTreeMap::new(),
        }
    }

    /// Parses and shape-checks fetched manifest content.
    pub fn parse(bytes: &[u8]) -> Result<Self, DeployError> {
        let manifest: AssetManifest = serde_json::from_slice(bytes)
            .map_err(|e| DeployError::ContentValidation(format!("manifest: {e}")))?;
        if manifest.version != MANIFEST_VERSION {
            return Err(DeployError::ContentValidation(format!(
                "manifest: unsupported version {}",
                manifest.version
            )));
        }
        Ok(manifest)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    /// Registers a new asset. Returns false (and changes nothing) if the
    /// name is already taken.
    pub fn register(&mut self, name: impl Into<String>, entry: AssetEntry) -> bool {
        let name = name.into();
        if self.assets.contains_key(&name) {
            return false;
        }
        self.assets.insert(name, entry);
        true
    }

    pub fn assets(&self) -> &BTreeMap<String, AssetEntry> {
        &self.assets
    }

    /// Serializes for upload. Keys are already sorted (`BTreeMap`), so the
    /// output is deterministic.
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec_pretty(self).unwrap_or_default()
    }
}
