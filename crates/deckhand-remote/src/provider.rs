//! `IContentStore` implementation over the contents API client

use std::collections::HashMap;

use tracing::debug;

use deckhand_core::domain::newtypes::{RepoPath, VersionId};
use deckhand_core::ports::content_store::{IContentStore, RemoteContent, StoreError};

use crate::client::ContentsClient;

/// Remote content store backed by the contents API
///
/// Thin adapter over [`ContentsClient`]: the client owns HTTP and wire
/// concerns, this type owns the port contract (missing files as `None`,
/// delete as `write` with no content).
pub struct RemoteContentStore {
    client: ContentsClient,
}

impl RemoteContentStore {
    pub fn new(client: ContentsClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl IContentStore for RemoteContentStore {
    /// Fetches version ids one path at a time, in order.
    ///
    /// Sequential on purpose: concurrent probes would burn rate-limit
    /// quota faster and lose the deterministic request order the logs
    /// rely on. The first hard failure aborts the whole probe.
    async fn fetch_version_ids(
        &self,
        paths: &[RepoPath],
    ) -> Result<HashMap<RepoPath, Option<VersionId>>, StoreError> {
        debug!(count = paths.len(), "Fetching remote version ids");

        let mut ids = HashMap::with_capacity(paths.len());
        for path in paths {
            let version_id = self
                .client
                .get_content(path)
                .await?
                .map(|remote| remote.version_id);
            ids.insert(path.clone(), version_id);
        }
        Ok(ids)
    }

    async fn fetch_content(&self, path: &RepoPath) -> Result<Option<RemoteContent>, StoreError> {
        self.client.get_content(path).await
    }

    async fn write(
        &self,
        path: &RepoPath,
        content: Option<&[u8]>,
        expected_version_id: Option<&VersionId>,
        message: &str,
    ) -> Result<Option<VersionId>, StoreError> {
        match content {
            Some(bytes) => {
                let new_id = self
                    .client
                    .put_content(path, bytes, expected_version_id, message)
                    .await?;
                Ok(Some(new_id))
            }
            None => {
                let version_id =
                    expected_version_id.ok_or_else(|| {
                        StoreError::InvalidResponse(
                            format!("delete of {path} requires a version id"),
                        )
                    })?;
                self.client.delete_content(path, version_id, message).await?;
                Ok(None)
            }
        }
    }
}
