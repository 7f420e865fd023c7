//! Router for the sessions API

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    response::Json,
    routing::get,
};
use axum_extra::extract::Query;
use serde_json::Value;

use super::public;
use crate::api::state::AppState;
use crate::transcript::session_view;

type SharedState = Arc<AppState>;

/// List session summaries, newest first
async fn list_sessions(
    State(state): State<SharedState>,
    Query(params): Query<public::SessionsQuery>,
) -> Result<Json<Vec<public::SessionSummary>>, crate::api::public::ApiError> {
    let date = public::parse_date_filter(params.date.as_deref())?;
    let search = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());

    let sessions = state
        .store
        .list_sessions(date)
        .await?
        .into_iter()
        .filter(|s| search.is_none_or(|term| s.matches(term)))
        .collect();

    Ok(Json(sessions))
}

/// The session log exactly as it was written
async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, crate::api::public::ApiError> {
    let payload = state.store.load_session(&id).await?;
    Ok(Json(payload))
}

/// The turn-by-turn view of a session
async fn get_session_entries(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<public::ViewModelEntry>>, crate::api::public::ApiError> {
    let payload = state.store.load_session(&id).await?;
    let entries = session_view(payload)?;
    tracing::debug!("Built {} entries for session {}", entries.len(), id);
    Ok(Json(entries))
}

/// Create the sessions router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list_sessions))
        .route("/{id}", get(get_session))
        .route("/{id}/entries", get(get_session_entries))
}
