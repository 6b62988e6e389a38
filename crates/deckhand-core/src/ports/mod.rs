//! Port traits (driven/secondary ports)
//!
//! Adapters in sibling crates implement these interfaces; the deploy
//! orchestrator depends only on the traits.

pub mod conflict_arbiter;
pub mod content_store;
pub mod credential_source;
pub mod fingerprint_store;
pub mod workspace_source;

pub use conflict_arbiter::IConflictArbiter;
pub use content_store::{IContentStore, RemoteContent, StoreError};
pub use credential_source::{CredentialError, ICredentialSource};
pub use fingerprint_store::IFingerprintStore;
pub use workspace_source::{IWorkspaceSource, LocalFile};
