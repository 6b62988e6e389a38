//! Deckhand Cache - Fingerprint persistence
//!
//! JSON-file-backed cache recording, per logical path, the last remote
//! version id and content hash the engine successfully published or
//! absorbed.
//!
//! ## Architecture
//!
//! This crate implements the `IFingerprintStore` port from `deckhand-core`
//! using a single JSON file as the storage backend. It is a driven
//! (secondary) adapter in the hexagonal architecture. Mutations happen in
//! memory; `save()` writes the whole map atomically (temp file + rename).
//!
//! ## Key Components
//!
//! - [`JsonFingerprintStore`] - Full `IFingerprintStore` implementation
//! - [`CacheError`] - Error types for cache operations

pub mod store;

pub use store::JsonFingerprintStore;

/// Errors that can occur during cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Reading or writing the cache file failed
    #[error("Cache I/O failed: {0}")]
    Io(String),

    /// Serialization or deserialization of the cache file failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The cache file declares a format version this build cannot read
    #[error("Unsupported cache format version {0}")]
    UnsupportedVersion(u32),
}

impl From<std::io::Error> for CacheError {
    fn from(e: std::io::Error) -> Self {
        CacheError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::Serialization(e.to_string())
    }
}
