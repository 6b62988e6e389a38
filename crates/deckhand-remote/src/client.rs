//! Contents API client
//!
//! Typed HTTP client for the remote content repository. Handles bearer
//! authentication, base64 body encoding, endpoint construction, and the
//! mapping from HTTP statuses to [`StoreError`] kinds:
//!
//! - 404 on fetch → `Ok(None)` ("does not exist remotely")
//! - 401 → `NotAuthenticated`
//! - 409 / 412 / 422 → `PreconditionFailed`
//! - 403 / 429 with a zero-remaining rate-limit header → `RateLimited`
//!
//! No retries happen here: failures are surfaced to the orchestrator.

use base64::Engine as _;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use deckhand_core::domain::newtypes::{RepoPath, VersionId};
use deckhand_core::ports::content_store::{RemoteContent, StoreError};

use crate::rate_limit::RateLimitStatus;

// ============================================================================
// Wire types
// ============================================================================

/// Response from `GET /contents/{path}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentResponse {
    version_id: String,
    /// Base64-encoded file content (may contain line breaks)
    content: String,
    /// Content transfer encoding; only "base64" is understood
    encoding: Option<String>,
}

/// Request body for `PUT /contents/{path}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WriteRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_id: Option<&'a str>,
}

/// Response from `PUT /contents/{path}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteResponse {
    version_id: String,
}

/// Request body for `DELETE /contents/{path}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    message: &'a str,
    version_id: &'a str,
}

// ============================================================================
// ContentsClient
// ============================================================================

/// HTTP client for the remote contents API
///
/// Wraps `reqwest::Client` with bearer authentication and endpoint
/// construction.
pub struct ContentsClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests
    base_url: String,
    /// Bearer token for authenticating requests
    token: String,
}

impl ContentsClient {
    /// Creates a new client against `base_url` with the given bearer token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
            token: token.into(),
        }
    }

    /// Returns the base URL for API requests.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates an authenticated request builder for a contents path.
    fn request(&self, method: Method, path: &RepoPath) -> RequestBuilder {
        let url = format!("{}/contents/{}", self.base_url, path.as_str());
        self.client.request(method, &url).bearer_auth(&self.token)
    }

    /// Fetches the current version id and content for one path.
    ///
    /// A 404 is a valid outcome meaning "does not exist remotely".
    pub async fn get_content(
        &self,
        path: &RepoPath,
    ) -> Result<Option<RemoteContent>, StoreError> {
        debug!(path = %path, "GET contents");

        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = Self::check_status(response, path).await?;

        let body: ContentResponse = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("contents body: {e}")))?;

        if let Some(encoding) = body.encoding.as_deref() {
            if encoding != "base64" {
                return Err(StoreError::InvalidResponse(format!(
                    "unsupported content encoding: {encoding}"
                )));
            }
        }

        let content = decode_base64_body(&body.content)?;
        let version_id = VersionId::new(body.version_id)
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        Ok(Some(RemoteContent {
            version_id,
            content,
        }))
    }

    /// Creates or updates one file.
    ///
    /// `expected_version_id` is the optimistic-concurrency precondition;
    /// omit it only for files that must not yet exist.
    pub async fn put_content(
        &self,
        path: &RepoPath,
        content: &[u8],
        expected_version_id: Option<&VersionId>,
        message: &str,
    ) -> Result<VersionId, StoreError> {
        debug!(
            path = %path,
            bytes = content.len(),
            has_precondition = expected_version_id.is_some(),
            "PUT contents"
        );

        let body = WriteRequest {
            message,
            content: base64::engine::general_purpose::STANDARD.encode(content),
            version_id: expected_version_id.map(VersionId::as_str),
        };

        let response = self
            .request(Method::PUT, path)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let response = Self::check_status(response, path).await?;

        let body: WriteResponse = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("write body: {e}")))?;

        VersionId::new(body.version_id).map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    /// Deletes one file, guarded by its expected version id.
    pub async fn delete_content(
        &self,
        path: &RepoPath,
        expected_version_id: &VersionId,
        message: &str,
    ) -> Result<(), StoreError> {
        debug!(path = %path, "DELETE contents");

        let body = DeleteRequest {
            message,
            version_id: expected_version_id.as_str(),
        };

        let response = self
            .request(Method::DELETE, path)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Self::check_status(response, path).await?;
        Ok(())
    }

    /// Maps non-success statuses to [`StoreError`] kinds.
    ///
    /// Rate-limit exhaustion is checked before the generic status mapping
    /// so a throttled 403/429 surfaces as `RateLimited`, not as an opaque
    /// HTTP failure.
    async fn check_status(response: Response, path: &RepoPath) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let rate = RateLimitStatus::from_headers(response.headers());
        if (status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS)
            && rate.is_exhausted()
        {
            return Err(StoreError::RateLimited {
                reset_at: rate.reset_at,
            });
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(StoreError::NotAuthenticated),
            StatusCode::CONFLICT
            | StatusCode::PRECONDITION_FAILED
            | StatusCode::UNPROCESSABLE_ENTITY => Err(StoreError::PreconditionFailed {
                path: path.clone(),
            }),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(StoreError::InvalidResponse(format!(
                    "unexpected status {status} for {path}: {body}"
                )))
            }
        }
    }
}

/// Decodes a base64 body, tolerating the line breaks some content APIs
/// insert into long payloads.
fn decode_base64_body(body: &str) -> Result<Vec<u8>, StoreError> {
    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| StoreError::InvalidResponse(format!("invalid base64 content: {e}")))
}
