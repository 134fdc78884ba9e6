pub mod cache;
pub mod health;
pub mod signals;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/signals", signals::router())
        .nest("/cache", cache::router())
}
