//! Public API types

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

use crate::store::StoreError;
use crate::transcript::SessionError;

/// Problems with the request itself rather than the data behind it.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid date {0}, expected YYYY-MM-DD")]
    InvalidDate(String),
}

// Errors

pub struct ApiError(anyhow::Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<StoreError>() {
            return match err {
                StoreError::InvalidSessionId(_) => StatusCode::BAD_REQUEST,
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::Io(_) | StoreError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }
        if self.0.downcast_ref::<SessionError>().is_some() {
            return StatusCode::UNPROCESSABLE_ENTITY;
        }
        if self.0.downcast_ref::<RequestError>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self.0);
            (status, format!("Something went wrong: {}", self.0)).into_response()
        } else {
            tracing::warn!("{}", self.0);
            (status, self.0.to_string()).into_response()
        }
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Re-export public types from each route

pub mod sessions {
    pub use crate::api::routes::sessions::public::*;
}
