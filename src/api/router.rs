//! Router setup and configuration

use std::sync::Arc;

use axum::{routing::get, routing::post, Router};

use crate::api::handlers;
use crate::api::state::AppState;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/append", post(handlers::append_entry))
        .route("/entries", get(handlers::list_entries))
        .route("/entries/:id", get(handlers::get_entry))
        .route("/health", get(handlers::health_check))
        .with_state(state)
}
