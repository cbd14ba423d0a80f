//! Asset housekeeping handlers.
//!
//! Operator-facing views over durable storage; not part of the pipeline's
//! happy path.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AssetEntry {
    pub key: String,
    pub url: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct AssetsResponse {
    pub assets: Vec<AssetEntry>,
}

/// GET /api/assets
pub async fn list_assets(State(state): State<AppState>) -> ApiResult<Json<AssetsResponse>> {
    let assets = state
        .transfer
        .list_assets()
        .await?
        .into_iter()
        .map(|obj| AssetEntry {
            key: obj.key,
            url: obj.url,
            size: obj.size,
            last_modified: obj.last_modified,
        })
        .collect();

    Ok(Json(AssetsResponse { assets }))
}

#[derive(Debug, Deserialize)]
pub struct DeleteAssetQuery {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteAssetResponse {
    pub success: bool,
    pub message: String,
}

/// DELETE /api/assets?url=...
pub async fn delete_asset(
    State(state): State<AppState>,
    Query(query): Query<DeleteAssetQuery>,
) -> ApiResult<Json<DeleteAssetResponse>> {
    state.transfer.delete_asset(&query.url).await?;
    info!(url = %query.url, "asset deleted");

    Ok(Json(DeleteAssetResponse {
        success: true,
        message: "asset deleted".to_string(),
    }))
}
