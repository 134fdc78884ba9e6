//! Signal cache inspection endpoints.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::services::signals::CacheStats;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: usize,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/clear", post(clear))
}

async fn stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.signal_store.cache_stats())
}

async fn clear(State(state): State<AppState>) -> Json<ClearResponse> {
    Json(ClearResponse {
        cleared: state.signal_store.clear_cache(),
    })
}
