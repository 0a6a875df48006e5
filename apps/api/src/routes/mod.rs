pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::metadata::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_image_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/generate-seo",
            post(handlers::handle_generate_seo).fallback(handlers::handle_method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
