//! Bundled credential sources
//!
//! Two `ICredentialSource` implementations ship with the remote adapter:
//! a static token (tests, scripted use) and an environment-variable
//! lookup (the CLI default, with the variable name taken from config).

use deckhand_core::ports::credential_source::{CredentialError, ICredentialSource};

/// Credential source holding a fixed token
pub struct StaticCredentialSource {
    token: String,
}

impl StaticCredentialSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait::async_trait]
impl ICredentialSource for StaticCredentialSource {
    async fn bearer_token(&self) -> Result<String, CredentialError> {
        validate_token(&self.token)
    }
}

/// Credential source reading the token from an environment variable
pub struct EnvCredentialSource {
    var_name: String,
}

impl EnvCredentialSource {
    pub fn new(var_name: impl Into<String>) -> Self {
        Self {
            var_name: var_name.into(),
        }
    }
}

#[async_trait::async_trait]
impl ICredentialSource for EnvCredentialSource {
    async fn bearer_token(&self) -> Result<String, CredentialError> {
        match std::env::var(&self.var_name) {
            Ok(value) => validate_token(&value),
            Err(_) => Err(CredentialError::NotAuthenticated),
        }
    }
}

/// Rejects empty and non-header-safe tokens before they reach the wire.
fn validate_token(token: &str) -> Result<String, CredentialError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(CredentialError::NotAuthenticated);
    }
    if token.chars().any(|c| c.is_control() || c == ' ') {
        return Err(CredentialError::InvalidToken(
            "token contains whitespace or control characters".to_string(),
        ));
    }
    Ok(token.to_string())
}
