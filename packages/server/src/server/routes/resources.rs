//! Resource archive endpoint.
//!
//! POST /api/resources/:kind
//!
//! Body is a JSON `ResourceQuery` (`first`, `after`, `filters`); the response
//! is the `PageResult` of the requested archive, or `{ "error": ... }` with a
//! 400 (bad kind, body or cursor) or 500 (content source failure).

use axum::{
    body::Bytes,
    extract::{Extension, Path},
    Json,
};

use crate::domains::resources::{list_resources, ResourceError, ResourcePage};
use crate::server::app::AxumAppState;

pub async fn resources_handler(
    Extension(state): Extension<AxumAppState>,
    Path(kind): Path<String>,
    body: Bytes,
) -> Result<Json<ResourcePage>, ResourceError> {
    match list_resources(&kind, &body, &state.deps).await {
        Ok(page) => Ok(Json(page)),
        Err(err @ ResourceError::Upstream(_)) => {
            tracing::error!(kind = %kind, error = %err, "Resource source failed");
            Err(err)
        }
        Err(err) => {
            tracing::debug!(kind = %kind, error = %err, "Rejected resource request");
            Err(err)
        }
    }
}
