//! Shared test helpers for contents API integration tests
//!
//! Provides wiremock-based mock server setup. Each helper mounts one
//! endpoint shape and returns nothing; `setup_store` wires a
//! RemoteContentStore at the mock server.

use base64::Engine as _;
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use deckhand_core::domain::newtypes::RepoPath;
use deckhand_remote::{ContentsClient, RemoteContentStore};

pub const TEST_TOKEN: &str = "test-access-token";

/// Starts a mock server and returns it with a store pointing at it.
pub async fn setup_store() -> (MockServer, RemoteContentStore) {
    let server = MockServer::start().await;
    let client = ContentsClient::new(server.uri(), TEST_TOKEN);
    (server, RemoteContentStore::new(client))
}

pub fn repo_path(s: &str) -> RepoPath {
    RepoPath::new(s.to_string()).unwrap()
}

/// Mounts GET for one path returning the given version id and content.
pub async fn mount_get(server: &MockServer, repo_path: &str, version_id: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/contents/{repo_path}")))
        .and(bearer_token(TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "versionId": version_id,
            "content": base64::engine::general_purpose::STANDARD.encode(content),
            "encoding": "base64"
        })))
        .mount(server)
        .await;
}

/// Mounts GET for one path returning 404.
pub async fn mount_get_missing(server: &MockServer, repo_path: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/contents/{repo_path}")))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

/// Mounts PUT for one path returning the given new version id.
pub async fn mount_put(server: &MockServer, repo_path: &str, new_version_id: &str) {
    Mock::given(method("PUT"))
        .and(path(format!("/contents/{repo_path}")))
        .and(bearer_token(TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "versionId": new_version_id
        })))
        .mount(server)
        .await;
}

/// Mounts PUT for one path returning 409 (precondition failure).
pub async fn mount_put_conflict(server: &MockServer, repo_path: &str) {
    Mock::given(method("PUT"))
        .and(path(format!("/contents/{repo_path}")))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "error": "version mismatch"
        })))
        .mount(server)
        .await;
}

/// Mounts DELETE for one path returning success.
pub async fn mount_delete(server: &MockServer, repo_path: &str) {
    Mock::given(method("DELETE"))
        .and(path(format!("/contents/{repo_path}")))
        .and(bearer_token(TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(server)
        .await;
}
