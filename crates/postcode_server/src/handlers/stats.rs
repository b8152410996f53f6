//! /stats, /counter and the API root

use super::prelude::*;
use crate::store::StoreMetadata;
use postcode_api::{API_NAME, API_VERSION, ENDPOINTS};

fn endpoints() -> Vec<String> {
    ENDPOINTS.iter().map(|e| e.to_string()).collect()
}

/// Reports the static metadata. A failure to read the store metadata is logged and
/// leaves the visitor count and last update empty.
#[instrument]
pub async fn stats(State(state): State<PostcodeState>) -> Json<res::Stats> {
    let store = state.store.clone();
    let metadata = match tokio::task::spawn_blocking(move || store.metadata()).await {
        Ok(Ok(metadata)) => metadata,
        Ok(Err(err)) => {
            tracing::warn!("Failed to read store metadata: {err:?}");
            StoreMetadata::default()
        }
        Err(err) => {
            tracing::warn!("Failed to read store metadata: {err}");
            StoreMetadata::default()
        }
    };

    Json(res::Stats {
        name: API_NAME.to_string(),
        version: API_VERSION.to_string(),
        runtime: state.runtime_name.clone(),
        visitor_count: metadata.visitor_count,
        last_updated: metadata.last_updated,
        endpoints: endpoints(),
    })
}

#[instrument]
pub async fn counter(State(state): State<PostcodeState>) -> ApiResult<Json<res::Counter>> {
    let store = state.store.clone();
    let count = tokio::task::spawn_blocking(move || store.increment_visitor_count()).await??;
    Ok(Json(res::Counter { count }))
}

#[instrument]
pub async fn info() -> Json<res::ApiInfo> {
    Json(res::ApiInfo {
        name: API_NAME.to_string(),
        version: API_VERSION.to_string(),
        endpoints: endpoints(),
    })
}
