use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use resource_query::{CursorError, UnknownKind};
use serde::Serialize;
use thiserror::Error;

const GENERIC_SERVER_ERROR: &str = "Server error";

/// Failures of a resource page request
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error(transparent)]
    UnknownKind(#[from] UnknownKind),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidCursor(#[from] CursorError),

    #[error("{}", upstream_message(.0))]
    Upstream(anyhow::Error),
}

impl ResourceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ResourceError::UnknownKind(_)
            | ResourceError::InvalidBody(_)
            | ResourceError::InvalidCursor(_) => StatusCode::BAD_REQUEST,
            ResourceError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Adapter errors carrying a cursor failure are the caller's fault.
impl From<anyhow::Error> for ResourceError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<CursorError>() {
            Ok(cursor) => ResourceError::InvalidCursor(cursor),
            Err(err) => ResourceError::Upstream(err),
        }
    }
}

fn upstream_message(err: &anyhow::Error) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        GENERIC_SERVER_ERROR.to_string()
    } else {
        message
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ResourceError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
