//! Credential provider port (driven/secondary port)
//!
//! Supplies the bearer credential for the remote content store. "Not
//! authenticated" and "invalid token" are distinct outcomes: the first
//! means no credential is configured at all, the second that one exists
//! but is unusable.

use thiserror::Error;

/// Errors from the credential provider
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// No credential is configured
    #[error("not authenticated: no credential configured")]
    NotAuthenticated,

    /// A credential exists but is malformed or unusable
    #[error("invalid token: {0}")]
    InvalidToken(String),
}

/// Port trait for obtaining a bearer credential
#[async_trait::async_trait]
pub trait ICredentialSource: Send + Sync {
    /// Returns the bearer token to authenticate remote requests with.
    async fn bearer_token(&self) -> Result<String, CredentialError>;
}
