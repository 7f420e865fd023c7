//! API routes module

pub mod pages;
pub mod sessions;

use std::sync::Arc;

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<AppState>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Session log routes
        .nest("/sessions", sessions::router())
}
