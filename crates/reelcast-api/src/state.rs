//! Application state.

use std::sync::Arc;

use reelcast_pipeline::{Orchestrator, PipelineHandle, PipelineWorker};
use reelcast_providers::{GraphPublisher, VideoGenClient};
use reelcast_storage::AssetTransfer;
use reelcast_store::MemoryStore;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub orchestrator: Arc<Orchestrator>,
    pub pipeline: PipelineHandle,
    pub transfer: Arc<AssetTransfer>,
}

impl AppState {
    /// Create application state from the environment: in-memory store,
    /// concrete provider clients, and a running pipeline worker.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store = Arc::new(MemoryStore::new());
        let generator = Arc::new(VideoGenClient::from_env()?);
        let transfer = Arc::new(AssetTransfer::from_env()?);
        let publisher = Arc::new(GraphPublisher::from_env()?);

        let orchestrator = Arc::new(Orchestrator::new(
            store,
            generator,
            transfer.clone(),
            publisher,
        ));
        let pipeline = PipelineWorker::spawn(Arc::clone(&orchestrator));

        Ok(Self {
            config,
            orchestrator,
            pipeline,
            transfer,
        })
    }
}
