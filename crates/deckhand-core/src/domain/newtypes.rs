//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for the identifiers the deploy engine passes
//! around. Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

// ============================================================================
// Path type
// ============================================================================

/// A logical file path within the remote content repository
///
/// RepoPath ensures the path is:
/// - Relative (no leading slash)
/// - Normalized (no `.` or `..` components, no double slashes)
/// - Non-empty
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoPath(String);

impl RepoPath {
    /// Create a new RepoPath
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPath` if the path is empty, absolute,
    /// contains traversal components, or has double slashes.
    pub fn new(path: String) -> Result<Self, DomainError> {
        if path.is_empty() {
            return Err(DomainError::InvalidPath(
                "Repo path cannot be empty".to_string(),
            ));
        }

        if path.starts_with('/') {
            return Err(DomainError::InvalidPath(format!(
                "Repo path must be relative: {path}"
            )));
        }

        if path.contains("//") {
            return Err(DomainError::InvalidPath(format!(
                "Repo path contains double slashes: {path}"
            )));
        }

        if path.split('/').any(|c| c == "." || c == "..") {
            return Err(DomainError::InvalidPath(format!(
                "Repo path contains traversal components: {path}"
            )));
        }

        if path.ends_with('/') {
            return Err(DomainError::InvalidPath(format!(
                "Repo path cannot end with a slash: {path}"
            )));
        }

        Ok(Self(path))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the file name component (the part after the last slash)
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Join a path component
    ///
    /// # Errors
    /// Returns error if the component is invalid.
    pub fn join(&self, component: &str) -> Result<Self, DomainError> {
        if component.is_empty() || component.contains('/') || component.contains("..") {
            return Err(DomainError::InvalidPath(format!(
                "Invalid path component: {component}"
            )));
        }
        Self::new(format!("{}/{component}", self.0))
    }
}

impl Display for RepoPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RepoPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for RepoPath {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RepoPath> for String {
    fn from(path: RepoPath) -> Self {
        path.0
    }
}

// ============================================================================
// Remote version identifier
// ============================================================================

/// The remote store's opaque content identifier
///
/// Used as an optimistic-concurrency token on writes. The value is opaque;
/// only non-emptiness is validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionId(String);

impl VersionId {
    /// Create a new VersionId
    ///
    /// # Errors
    /// Returns error if the id is empty.
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::InvalidVersionId(
                "Version id cannot be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VersionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VersionId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for VersionId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<VersionId> for String {
    fn from(id: VersionId) -> Self {
        id.0
    }
}

// ============================================================================
// Content hash
// ============================================================================

/// SHA-256 content hash in lowercase hex
///
/// The digest is always computed over the canonical serialization of a
/// document (sorted keys), so structurally equal documents hash identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    /// Expected length of a SHA-256 hex digest
    const EXPECTED_LEN: usize = 64;

    /// Create a new ContentHash
    ///
    /// # Errors
    /// Returns error if the string is not 64 lowercase hex characters.
    pub fn new(hash: String) -> Result<Self, DomainError> {
        if hash.len() != Self::EXPECTED_LEN {
            return Err(DomainError::InvalidHash(format!(
                "Hash has wrong length: expected {} chars, got {}",
                Self::EXPECTED_LEN,
                hash.len()
            )));
        }

        if !hash
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(DomainError::InvalidHash(format!(
                "Hash is not lowercase hex: {hash}"
            )));
        }

        Ok(Self(hash))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentHash {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for ContentHash {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

// ============================================================================
// Deploy attempt identifier
// ============================================================================

/// Identifier for a single deploy attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(Uuid);

impl AttemptId {
    /// Create a new random AttemptId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an AttemptId from an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for AttemptId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AttemptId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidId(format!("Invalid AttemptId: {e}")))
    }
}

impl From<Uuid> for AttemptId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod repo_path_tests {
        use super::*;

        #[test]
        fn test_new_valid() {
            let path = RepoPath::new("docs/page.json".to_string()).unwrap();
            assert_eq!(path.as_str(), "docs/page.json");
        }

        #[test]
        fn test_empty_fails() {
            assert!(RepoPath::new(String::new()).is_err());
        }

        #[test]
        fn test_absolute_fails() {
            assert!(RepoPath::new("/docs/page.json".to_string()).is_err());
        }

        #[test]
        fn test_traversal_fails() {
            assert!(RepoPath::new("docs/../secret".to_string()).is_err());
            assert!(RepoPath::new("./docs".to_string()).is_err());
        }

        #[test]
        fn test_double_slash_fails() {
            assert!(RepoPath::new("docs//page.json".to_string()).is_err());
        }

        #[test]
        fn test_trailing_slash_fails() {
            assert!(RepoPath::new("docs/".to_string()).is_err());
        }

        #[test]
        fn test_file_name() {
            let path = RepoPath::new("assets/img/logo.png".to_string()).unwrap();
            assert_eq!(path.file_name(), "logo.png");

            let flat = RepoPath::new("manifest.json".to_string()).unwrap();
            assert_eq!(flat.file_name(), "manifest.json");
        }

        #[test]
        fn test_join() {
            let path = RepoPath::new("assets".to_string()).unwrap();
            let joined = path.join("logo.png").unwrap();
            assert_eq!(joined.as_str(), "assets/logo.png");

            assert!(path.join("../up").is_err());
            assert!(path.join("a/b").is_err());
        }

        #[test]
        fn test_serde_roundtrip() {
            let path = RepoPath::new("docs/page.json".to_string()).unwrap();
            let json = serde_json::to_string(&path).unwrap();
            let parsed: RepoPath = serde_json::from_str(&json).unwrap();
            assert_eq!(path, parsed);
        }

        #[test]
        fn test_serde_rejects_invalid() {
            let result: Result<RepoPath, _> = serde_json::from_str("\"/abs\"");
            assert!(result.is_err());
        }

        #[test]
        fn test_ordering() {
            let a = RepoPath::new("a.json".to_string()).unwrap();
            let b = RepoPath::new("b.json".to_string()).unwrap();
            assert!(a < b);
        }
    }

    mod version_id_tests {
        use super::*;

        #[test]
        fn test_valid_id() {
            let id = VersionId::new("3f2a9c".to_string()).unwrap();
            assert_eq!(id.as_str(), "3f2a9c");
        }

        #[test]
        fn test_empty_fails() {
            assert!(VersionId::new(String::new()).is_err());
            assert!(VersionId::new("   ".to_string()).is_err());
        }

        #[test]
        fn test_serde_roundtrip() {
            let id = VersionId::new("sha1".to_string()).unwrap();
            let json = serde_json::to_string(&id).unwrap();
            let parsed: VersionId = serde_json::from_str(&json).unwrap();
            assert_eq!(id, parsed);
        }
    }

    mod content_hash_tests {
        use super::*;

        const VALID: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

        #[test]
        fn test_valid_hash() {
            let hash = ContentHash::new(VALID.to_string()).unwrap();
            assert_eq!(hash.as_str(), VALID);
        }

        #[test]
        fn test_wrong_length_fails() {
            assert!(ContentHash::new("abcd".to_string()).is_err());
        }

        #[test]
        fn test_uppercase_fails() {
            assert!(ContentHash::new(VALID.to_uppercase()).is_err());
        }

        #[test]
        fn test_non_hex_fails() {
            let bad = format!("z{}", &VALID[1..]);
            assert!(ContentHash::new(bad).is_err());
        }
    }

    mod attempt_id_tests {
        use super::*;

        #[test]
        fn test_new_creates_unique_ids() {
            assert_ne!(AttemptId::new(), AttemptId::new());
        }

        #[test]
        fn test_from_str() {
            let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
            let id: AttemptId = uuid_str.parse().unwrap();
            assert_eq!(id.to_string(), uuid_str);
        }

        #[test]
        fn test_from_str_invalid() {
            let result: Result<AttemptId, _> = "not-a-uuid".parse();
            assert!(result.is_err());
        }
    }
}
