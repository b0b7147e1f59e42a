//! Route modules and the assembled API router.

use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod videos;

/// Builds the full route tree: `/health` plus the video API under
/// `/api/v1/videos`. Middleware layers are added by the caller.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/videos", videos::router())
}
