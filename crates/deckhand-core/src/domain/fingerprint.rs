//! Fingerprint entries - the only persistent state the engine owns
//!
//! One entry per published path, recording what we last successfully
//! published. Entries are written only after a confirmed remote write or
//! during baseline reconciliation, never speculatively.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::{ContentHash, VersionId};

/// Last-known published state for a single path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintEntry {
    /// Remote version id at the time of the last successful publish
    remote_version_id: VersionId,
    /// Canonical content hash at the time of the last successful publish
    content_hash: ContentHash,
    /// When this entry was recorded
    updated_at: DateTime<Utc>,
}

impl FingerprintEntry {
    /// Creates an entry timestamped now.
    pub fn new(remote_version_id: VersionId, content_hash: ContentHash) -> Self {
        Self {
            remote_version_id,
            content_hash,
            updated_at: Utc::now(),
        }
    }

    /// Creates an entry with an explicit timestamp (used when loading).
    pub fn with_timestamp(
        remote_version_id: VersionId,
        content_hash: ContentHash,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            remote_version_id,
            content_hash,
            updated_at,
        }
    }

    pub fn remote_version_id(&self) -> &VersionId {
        &self.remote_version_id
    }

    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::canonical::hash_bytes;

    #[test]
    fn test_new_sets_timestamp() {
        let before = Utc::now();
        let entry = FingerprintEntry::new(
            VersionId::new("sha1".to_string()).unwrap(),
            hash_bytes(b"v1"),
        );
        let after = Utc::now();

        assert!(entry.updated_at() >= before && entry.updated_at() <= after);
        assert_eq!(entry.remote_version_id().as_str(), "sha1");
    }

    #[test]
    fn test_serde_roundtrip() {
        let entry = FingerprintEntry::new(
            VersionId::new("sha1".to_string()).unwrap(),
            hash_bytes(b"v1"),
        );
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("remoteVersionId"));
        let parsed: FingerprintEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, parsed);
    }
}
