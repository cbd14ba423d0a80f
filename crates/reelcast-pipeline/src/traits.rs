//! Collaborator traits at the pipeline seams.
//!
//! The orchestrator only needs the submit/poll/result behavior of each
//! external service, not its wire format. The concrete HTTP clients
//! implement these traits; tests substitute fakes.

use async_trait::async_trait;

use reelcast_providers::{GeneratedAsset, GenerateOptions, GeneratorError, PublishError};
use reelcast_providers::{GraphPublisher, VideoGenClient};
use reelcast_storage::{AssetTransfer, StorageError, StoredAsset};

/// Turns a prompt into a provider-hosted video asset.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<GeneratedAsset, GeneratorError>;
}

/// Copies a remotely hosted asset into durable storage.
#[async_trait]
pub trait Archiver: Send + Sync {
    async fn store_remote(&self, source_url: &str, name: &str)
        -> Result<StoredAsset, StorageError>;
}

/// Publishes a durable asset, returning a publish confirmation id.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, asset_url: &str, caption: &str) -> Result<String, PublishError>;
}

#[async_trait]
impl Generator for VideoGenClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<GeneratedAsset, GeneratorError> {
        VideoGenClient::generate(self, prompt, options).await
    }
}

#[async_trait]
impl Archiver for AssetTransfer {
    async fn store_remote(
        &self,
        source_url: &str,
        name: &str,
    ) -> Result<StoredAsset, StorageError> {
        AssetTransfer::store_remote(self, source_url, name).await
    }
}

#[async_trait]
impl Publisher for GraphPublisher {
    async fn publish(&self, asset_url: &str, caption: &str) -> Result<String, PublishError> {
        GraphPublisher::publish(self, asset_url, caption).await
    }
}
