//! Deckhand Remote - contents-API client
//!
//! Async HTTP adapter for the remote content repository:
//! - Single-file fetch/create/update/delete with per-file optimistic
//!   concurrency
//! - Rate-limit header parsing with hard-stop semantics
//! - Bundled credential sources (static token, environment variable)
//!
//! ## Modules
//!
//! - [`client`] - Typed HTTP client for the contents API
//! - [`rate_limit`] - Rate-limit header parsing
//! - [`provider`] - `IContentStore` implementation over the client
//! - [`auth`] - Bundled `ICredentialSource` implementations

pub mod auth;
pub mod client;
pub mod provider;
pub mod rate_limit;

pub use client::ContentsClient;
pub use provider::RemoteContentStore;
