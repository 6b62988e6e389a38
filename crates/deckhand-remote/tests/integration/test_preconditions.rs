//! Integration tests for optimistic-concurrency precondition failures

use deckhand_core::domain::newtypes::VersionId;
use deckhand_core::ports::content_store::{IContentStore, StoreError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_stale_update_is_precondition_failure() {
    let (server, store) = common::setup_store().await;
    common::mount_put_conflict(&server, "docs/a.json").await;

    let stale = VersionId::new("v-old".to_string()).unwrap();
    let err = store
        .write(
            &common::repo_path("docs/a.json"),
            Some(b"{}"),
            Some(&stale),
            "deckhand: update docs/a.json",
        )
        .await
        .unwrap_err();

    match err {
        StoreError::PreconditionFailed { path } => {
            assert_eq!(path.as_str(), "docs/a.json");
        }
        other => panic!("expected PreconditionFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unprocessable_entity_is_precondition_failure() {
    let (server, store) = common::setup_store().await;
    Mock::given(method("PUT"))
        .and(path("/contents/docs/a.json"))
        .respond_with(ResponseTemplate::new(422))
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

    assert!(matches!(err, StoreError::PreconditionFailed { .. }));
}

#[tokio::test]
async fn test_stale_delete_is_precondition_failure() {
    let (server, store) = common::setup_store().await;
    Mock::given(method("DELETE"))
        .and(path("/contents/docs/old.json"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let stale = VersionId::new("v-old".to_string()).unwrap();
    let err = store
        .write(
            &common::repo_path("docs/old.json"),
            None,
            Some(&stale),
            "deckhand: delete docs/old.json",
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::PreconditionFailed { .. }));
}
