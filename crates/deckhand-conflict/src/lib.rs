//! Deckhand Conflict - Conflict classification and resolution
//!
//! Provides:
//! - Version-id-based conflict classification per change kind
//! - Structural content equivalence (parsed JSON, trimmed text, raw bytes)
//! - Baseline reconciliation: silently absorbing remote version ids when
//!   local and remote content are already equal
//! - Application of per-file resolution decisions to the commit set

pub mod baseline;
pub mod classifier;
pub mod equivalence;
pub mod error;
pub mod resolver;

pub use baseline::{reconcile_baseline, BaselineOutcome};
pub use classifier::classify_changes;
pub use error::ConflictError;
pub use resolver::{apply_resolutions, ResolutionOutcome};
