//! Integration tests for rate-limit hard-stop behavior

use deckhand_core::ports::content_store::{IContentStore, StoreError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

const RESET_EPOCH: i64 = 1767225600; // 2026-01-01T00:00:00Z

fn throttled(status: u16) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .append_header("x-ratelimit-remaining", "0")
        .append_header("x-ratelimit-reset", RESET_EPOCH.to_string().as_str())
}

#[tokio::test]
async fn test_exhausted_429_maps_to_rate_limited() {
    let (server, store) = common::setup_store().await;
    Mock::given(method("GET"))
        .and(path("/contents/docs/a.json"))
        .respond_with(throttled(429))
        .mount(&server)
        .await;

    let err = store
        .fetch_content(&common::repo_path("docs/a.json"))
        .await
        .unwrap_err();

    match err {
        StoreError::RateLimited { reset_at } => {
            assert_eq!(reset_at.unwrap().timestamp(), RESET_EPOCH);
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_exhausted_403_maps_to_rate_limited() {
    let (server, store) = common::setup_store().await;
    Mock::given(method("PUT"))
        .and(path("/contents/docs/a.json"))
        .respond_with(throttled(403))
        .mount(&server)
        .await;

    let err = store
        .write(
            &common::repo_path("docs/a.json"),
            Some(b"{}"),
            None,
            "deckhand: add docs/a.json",
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::RateLimited { .. }));
}

#[tokio::test]
async fn test_403_without_exhausted_quota_is_not_rate_limited() {
    let (server, store) = common::setup_store().await;
    Mock::given(method("GET"))
        .and(path("/contents/docs/a.json"))
        .respond_with(
            ResponseTemplate::new(403).append_header("x-ratelimit-remaining", "17"),
        )
        .mount(&server)
        .await;

    let err = store
        .fetch_content(&common::repo_path("docs/a.json"))
        .await
        .unwrap_err();

    // Plain forbidden, not a quota stop.
    assert!(matches!(err, StoreError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_probe_stops_at_first_rate_limit() {
    let (server, store) = common::setup_store().await;
    common::mount_get(&server, "docs/a.json", "v-a", b"{}").await;
    Mock::given(method("GET"))
        .and(path("/contents/docs/b.json"))
        .respond_with(throttled(429))
        .mount(&server)
        .await;

    let paths = vec![
        common::repo_path("docs/a.json"),
        common::repo_path("docs/b.json"),
        common::repo_path("docs/c.json"),
    ];
    let err = store.fetch_version_ids(&paths).await.unwrap_err();

    assert!(matches!(err, StoreError::RateLimited { .. }));
    // docs/c.json was never requested.
    let requests = server.received_requests().await.unwrap();
    assert!(requests
        .iter()
        .all(|r| !r.url.path().contains("docs/c.json")));
}
