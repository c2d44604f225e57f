//! API Handlers
//!
//! HTTP request handlers for each cache admin endpoint.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::cache::{CacheConfig, CacheEngine, EntryInfo};
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, EvictRequest, EvictResponse, GetResponse, HealthResponse, InvalidateRequest,
    MessageResponse, RemovedResponse, SetRequest, SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The engine handle is itself cheap to clone and internally synchronized.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache of JSON values
    pub cache: CacheEngine<Value>,
}

impl AppState {
    /// Creates a new AppState around an existing engine.
    pub fn new(cache: CacheEngine<Value>) -> Self {
        Self { cache }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Result<Self> {
        Self::with_cache_config(config.cache_config())
    }

    pub fn with_cache_config(config: CacheConfig) -> Result<Self> {
        CacheEngine::new(config).map(Self::new)
    }
}

/// Handler for PUT /entries
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    let (key, value, options) = req.into_parts();
    state.cache.set(key.clone(), value, options).await?;

    Ok(Json(SetResponse::new(key)))
}

/// Handler for GET /entries/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state.cache.get(&key).await;
    match value {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /entries/:key/info
///
/// Reports age, remaining TTL and staleness without counting a hit or miss.
pub async fn info_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryInfo>> {
    state
        .cache
        .entry_info(&key)
        .await
        .map(Json)
        .ok_or(CacheError::NotFound(key))
}

/// Handler for DELETE /entries/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let deleted = state.cache.delete(&key).await;
    Json(DeleteResponse::new(key, deleted))
}

/// Handler for DELETE /tags/:tag
pub async fn clear_tag_handler(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Json<RemovedResponse> {
    let removed = state.cache.clear_by_tag(&tag).await;
    Json(RemovedResponse::new(removed))
}

/// Handler for POST /invalidate
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<RemovedResponse>> {
    let pattern = req.to_pattern()?;
    let removed = state.cache.invalidate(pattern).await;
    Ok(Json(RemovedResponse::new(removed)))
}

/// Handler for POST /evict
///
/// The body is optional; without a strategy the configured one is used.
pub async fn evict_handler(
    State(state): State<AppState>,
    body: Option<Json<EvictRequest>>,
) -> Json<EvictResponse> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let strategy = match req.strategy {
        Some(strategy) => strategy,
        None => state.cache.config().await.eviction_strategy,
    };

    let evicted = state.cache.evict(strategy).await;
    let stats = state.cache.stats().await;

    Json(EvictResponse {
        evicted,
        stats: stats.into(),
    })
}

/// Handler for POST /cleanup
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.cache.cleanup().await;
    Json(RemovedResponse::new(removed))
}

/// Handler for POST /clear
///
/// Session teardown: drops every entry and resets statistics.
pub async fn clear_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.cache.clear().await;
    info!("Cache cleared via admin API");
    Json(MessageResponse::new("Cache cleared"))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
