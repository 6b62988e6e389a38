//! Integration tests for basic fetch / write / delete flows

use deckhand_core::domain::newtypes::VersionId;
use deckhand_core::ports::content_store::{IContentStore, StoreError};
use wiremock::matchers::{body_json_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

// ============================================================================
// Fetch tests
// ============================================================================

#[tokio::test]
async fn test_fetch_content_returns_decoded_body() {
    let (server, store) = common::setup_store().await;
    common::mount_get(&server, "docs/a.json", "v1", br#"{"title":"a"}"#).await;

    let remote = store
        .fetch_content(&common::repo_path("docs/a.json"))
        .await
        .expect("fetch failed")
        .expect("expected content");

    assert_eq!(remote.version_id.as_str(), "v1");
    assert_eq!(remote.content, br#"{"title":"a"}"#);
}

#[tokio::test]
async fn test_fetch_missing_file_is_none() {
    let (server, store) = common::setup_store().await;
    common::mount_get_missing(&server, "docs/gone.json").await;

    let remote = store
        .fetch_content(&common::repo_path("docs/gone.json"))
        .await
        .expect("fetch failed");

    assert!(remote.is_none());
}

#[tokio::test]
async fn test_fetch_version_ids_mixes_present_and_absent() {
    let (server, store) = common::setup_store().await;
    common::mount_get(&server, "docs/a.json", "v-a", b"{}").await;
    common::mount_get_missing(&server, "docs/b.json").await;

    let paths = vec![
        common::repo_path("docs/a.json"),
        common::repo_path("docs/b.json"),
    ];
    let ids = store.fetch_version_ids(&paths).await.expect("probe failed");

    assert_eq!(ids.len(), 2);
    assert_eq!(
        ids[&common::repo_path("docs/a.json")].as_ref().unwrap().as_str(),
        "v-a"
    );
    assert!(ids[&common::repo_path("docs/b.json")].is_none());
}

#[tokio::test]
async fn test_fetch_unauthorized_maps_to_not_authenticated() {
    let (server, store) = common::setup_store().await;
    Mock::given(method("GET"))
        .and(path("/contents/docs/a.json"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = store
        .fetch_content(&common::repo_path("docs/a.json"))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::NotAuthenticated));
}

#[tokio::test]
async fn test_fetch_malformed_body_is_invalid_response() {
    let (server, store) = common::setup_store().await;
    Mock::given(method("GET"))
        .and(path("/contents/docs/a.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let err = store
        .fetch_content(&common::repo_path("docs/a.json"))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::InvalidResponse(_)));
}

// ============================================================================
// Write tests
// ============================================================================

#[tokio::test]
async fn test_write_update_returns_new_version_id() {
    let (server, store) = common::setup_store().await;
    common::mount_put(&server, "docs/a.json", "v2").await;

    let old = VersionId::new("v1".to_string()).unwrap();
    let new_id = store
        .write(
            &common::repo_path("docs/a.json"),
            Some(br#"{"title":"a2"}"#),
            Some(&old),
            "deckhand: update docs/a.json",
        )
        .await
        .expect("write failed");

    assert_eq!(new_id.unwrap().as_str(), "v2");
}

#[tokio::test]
async fn test_write_create_sends_no_precondition() {
    let (server, store) = common::setup_store().await;

    // Exact body match proves the create carries no versionId field.
    let expected = serde_json::json!({
        "message": "deckhand: add docs/new.json",
        "content": "e30="
    });
    Mock::given(method("PUT"))
        .and(path("/contents/docs/new.json"))
        .and(body_json_string(expected.to_string()))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "versionId": "v-new"
        })))
        .mount(&server)
        .await;

    let new_id = store
        .write(
            &common::repo_path("docs/new.json"),
            Some(b"{}"),
            None,
            "deckhand: add docs/new.json",
        )
        .await
        .expect("create failed");

    assert_eq!(new_id.unwrap().as_str(), "v-new");
}

#[tokio::test]
async fn test_delete_returns_none() {
    let (server, store) = common::setup_store().await;
    common::mount_delete(&server, "docs/old.json").await;

    let old = VersionId::new("v9".to_string()).unwrap();
    let result = store
        .write(
            &common::repo_path("docs/old.json"),
            None,
            Some(&old),
            "deckhand: delete docs/old.json",
        )
        .await
        .expect("delete failed");

    assert!(result.is_none());
}

#[tokio::test]
async fn test_delete_without_version_id_is_rejected_locally() {
    let (server, store) = common::setup_store().await;
    // No mock mounted: the adapter must refuse before any request.
    drop(server);

    let err = store
        .write(
            &common::repo_path("docs/old.json"),
            None,
            None,
            "deckhand: delete docs/old.json",
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::InvalidResponse(_)));
}
