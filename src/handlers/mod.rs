pub mod health;
pub mod shipments;

use axum::{
    extract::OriginalUri,
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::error::TrackingError;

/// Success envelope shared by every JSON endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self { success: true, data })
    }
}

pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<TrackingError>() {
            Some(TrackingError::InsufficientData { .. }) | Some(TrackingError::OutOfRange(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Some(TrackingError::NotFound(_)) | Some(TrackingError::CheckpointNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            Some(TrackingError::Validation(_)) => StatusCode::BAD_REQUEST,
            Some(TrackingError::Conflict(_)) => StatusCode::CONFLICT,
            Some(TrackingError::Forbidden(_)) => StatusCode::FORBIDDEN,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self.0, "request rejected");
        }

        (
            status,
            Json(json!({
                "success": false,
                "error": self.0.to_string()
            })),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// `/shipments/...` is kept as an alias of `/api/shipments/...`.
pub async fn redirect_to_api(uri: Uri) -> Redirect {
    let target = uri.path_and_query().map_or(uri.path(), |pq| pq.as_str());
    Redirect::temporary(&format!("/api{}", target))
}

pub async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": format!("Can't find {} on this server!", uri.path())
        })),
    )
}
