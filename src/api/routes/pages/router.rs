//! Router for the HTML pages

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::Query;
use chrono::Local;
use http::StatusCode;
use serde::Deserialize;

use crate::api::public::ApiError;
use crate::api::routes::sessions::public::{SessionsQuery, parse_date_filter};
use crate::api::state::AppState;
use crate::transcript::session_view;

type SharedState = Arc<AppState>;

#[derive(Deserialize)]
struct ViewerQuery {
    // 0-based, defaults to the latest entry
    entry: Option<usize>,
}

/// Session list, today's sessions unless another date is picked
async fn index(
    State(state): State<SharedState>,
    Query(params): Query<SessionsQuery>,
) -> Result<Html<String>, ApiError> {
    let date = match params.date.as_deref() {
        None => Some(Local::now().date_naive()),
        date => parse_date_filter(date)?,
    };
    let sessions = state.store.list_sessions(date).await?;
    let html = state
        .views
        .session_list(&sessions, date, params.q.as_deref())?;
    Ok(Html(html))
}

fn error_page(state: &AppState, status: StatusCode, message: &str) -> Result<Response, ApiError> {
    let html = state.views.error(message)?;
    Ok((status, Html(html)).into_response())
}

/// Entry viewer for one session
async fn view_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(params): Query<ViewerQuery>,
) -> Result<Response, ApiError> {
    let payload = match state.store.load_session(&id).await {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Error loading session {}: {}", id, e);
            let status = ApiError::from(e).status();
            return error_page(&state, status, "Failed to load session data.");
        }
    };

    let entries = match session_view(payload) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Session {}: {}", id, e);
            return error_page(&state, StatusCode::UNPROCESSABLE_ENTITY, "Invalid session format.");
        }
    };

    let html = state.views.session(&id, &entries, params.entry)?;
    Ok(Html(html).into_response())
}

/// Create the pages router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(index))
        .route("/sessions/{id}", get(view_session))
}
