//! Domain layer - entities, value objects, and invariants
//!
//! Everything in this module is pure: no I/O, no clocks beyond timestamps
//! taken at construction, no network.

pub mod canonical;
pub mod change;
pub mod commit;
pub mod errors;
pub mod fingerprint;
pub mod newtypes;

pub use change::{ChangeKind, ConflictInfo, FileChange, ResolvedConflict, Resolution};
pub use commit::CommitResult;
pub use errors::DomainError;
pub use fingerprint::FingerprintEntry;
pub use newtypes::{AttemptId, ContentHash, RepoPath, VersionId};
