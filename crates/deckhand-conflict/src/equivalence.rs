//! Structural content equivalence
//!
//! Decides whether two byte blobs represent "the same" content for
//! baseline-reconciliation purposes, tolerating serialization noise that a
//! byte compare would flag:
//!
//! 1. Both parse as JSON → deep structural comparison (key order and
//!    whitespace are irrelevant)
//! 2. Both are UTF-8 → trimmed text comparison
//! 3. Otherwise → exact byte comparison

use serde_json::Value;

/// True when `local` and `remote` are structurally equivalent.
pub fn contents_equivalent(local: &[u8], remote: &[u8]) -> bool {
    if let (Ok(local_doc), Ok(remote_doc)) = (
        serde_json::from_slice::<Value>(local),
        serde_json::from_slice::<Value>(remote),
    ) {
        return local_doc == remote_doc;
    }

    if let (Ok(local_text), Ok(remote_text)) =
        (std::str::from_utf8(local), std::str::from_utf8(remote))
    {
        return local_text.trim() == remote_text.trim();
    }

    local == remote
}
