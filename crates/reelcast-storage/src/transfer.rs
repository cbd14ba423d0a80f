//! Asset transfer service.
//!
//! Copies a remotely hosted asset (the generation provider's result URL)
//! into durable storage under a caller-supplied name. The operation is a
//! single unit: callers record the durable URL only after it returns, so a
//! failed transfer never leaves a partial object referenced by a job.

use tracing::{debug, info};

use crate::client::{BlobClient, ObjectInfo};
use crate::error::{StorageError, StorageResult};

const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// A transferred asset now living in durable storage.
#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub key: String,
    pub url: String,
}

/// Fetches asset bytes over HTTP and stores them durably.
#[derive(Clone)]
pub struct AssetTransfer {
    http: reqwest::Client,
    blobs: BlobClient,
}

impl AssetTransfer {
    pub fn new(blobs: BlobClient) -> Self {
        Self {
            http: reqwest::Client::new(),
            blobs,
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self::new(BlobClient::from_env()?))
    }

    /// Copy the asset at `source_url` into durable storage under `name`.
    /// Returns a stable, publicly retrievable URL.
    pub async fn store_remote(&self, source_url: &str, name: &str) -> StorageResult<StoredAsset> {
        debug!("Fetching asset from {}", source_url);

        let response = self
            .http
            .get(source_url)
            .send()
            .await
            .map_err(|e| StorageError::fetch_failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::fetch_failed(format!(
                "source returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::fetch_failed(e.to_string()))?
            .to_vec();

        let url = self
            .blobs
            .upload_bytes(bytes, name, VIDEO_CONTENT_TYPE)
            .await?;

        info!("Asset saved to durable storage: {}", url);
        Ok(StoredAsset {
            key: name.to_string(),
            url,
        })
    }

    /// List stored assets. Operator housekeeping, not part of the pipeline.
    pub async fn list_assets(&self) -> StorageResult<Vec<ObjectInfo>> {
        self.blobs.list_objects("").await
    }

    /// Delete a stored asset by its public URL.
    pub async fn delete_asset(&self, url: &str) -> StorageResult<()> {
        let key = self.blobs.key_from_url(url)?;
        self.blobs.delete_object(&key).await?;
        info!("Asset deleted: {}", url);
        Ok(())
    }
}
