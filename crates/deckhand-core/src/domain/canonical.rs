//! Canonical serialization and content hashing
//!
//! Change detection and baseline staleness checks both hash documents over
//! the same canonical form: JSON with lexicographically ordered keys. This
//! guarantees that structurally equal documents hash identically no matter
//! how their keys were ordered when produced.
//!
//! `serde_json::Map` is backed by a `BTreeMap` (the `preserve_order` feature
//! is not enabled anywhere in this workspace), so parse-then-serialize is
//! the canonical form.

use serde_json::Value;
use sha2::{Digest, Sha256};

use super::newtypes::ContentHash;

/// Serialize a parsed JSON document to its canonical byte form.
///
/// Keys come out lexicographically ordered; numbers, strings, and nesting
/// are serialized with serde_json's compact representation.
pub fn canonical_json_bytes(value: &Value) -> Vec<u8> {
    // Serializing a Value cannot fail: it contains no non-string map keys
    // and no non-finite floats survive parsing.
    serde_json::to_vec(value).unwrap_or_default()
}

/// SHA-256 digest of raw bytes, rendered as lowercase hex.
pub fn hash_bytes(bytes: &[u8]) -> ContentHash {
    let digest = Sha256::digest(bytes);
    let hex = hex::encode(digest);
    // 64 lowercase hex chars by construction
    ContentHash::new(hex).expect("sha-256 hex digest is always a valid ContentHash")
}

/// Canonical content hash of a parsed JSON document.
pub fn hash_document(value: &Value) -> ContentHash {
    hash_bytes(&canonical_json_bytes(value))
}

/// Hash arbitrary file content.
///
/// Bytes that parse as JSON are hashed over their canonical serialization;
/// anything else (binary assets, plain text) is hashed as-is.
pub fn hash_content(bytes: &[u8]) -> ContentHash {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => hash_document(&value),
        Err(_) => hash_bytes(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_order_does_not_change_hash() {
        let a: Value = serde_json::from_str(r#"{"b": 2, "a": 1, "nested": {"y": 0, "x": 9}}"#)
            .unwrap();
        let b: Value = serde_json::from_str(r#"{"a": 1, "nested": {"x": 9, "y": 0}, "b": 2}"#)
            .unwrap();

        assert_eq!(hash_document(&a), hash_document(&b));
    }

    #[test]
    fn test_different_values_hash_differently() {
        let a: Value = serde_json::from_str(r#"{"x": 1}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"x": 2}"#).unwrap();

        assert_ne!(hash_document(&a), hash_document(&b));
    }

    #[test]
    fn test_canonical_bytes_sorted() {
        let v: Value = serde_json::from_str(r#"{"zeta": 1, "alpha": 2}"#).unwrap();
        let bytes = canonical_json_bytes(&v);
        assert_eq!(bytes, br#"{"alpha":2,"zeta":1}"#.to_vec());
    }

    #[test]
    fn test_hash_content_json_is_canonical() {
        let h1 = hash_content(br#"{"b":2,"a":1}"#);
        let h2 = hash_content(br#"{ "a": 1, "b": 2 }"#);
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_hash_content_binary_is_raw() {
        let bytes = [0x89u8, 0x50, 0x4e, 0x47];
        let h = hash_bytes(&bytes);
        assert_eq!(hash_content(&bytes), h);
    }

    #[test]
    fn test_hash_empty() {
        // Known SHA-256 of the empty string
        assert_eq!(
            hash_bytes(b"").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
