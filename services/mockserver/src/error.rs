//! HTTP mapping for grid errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use grid_common::GridError;

/// A `GridError` rendered as a JSON error response.
#[derive(Debug)]
pub struct ApiError(pub GridError);

impl From<GridError> for ApiError {
    fn from(err: GridError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self.0, code = self.0.code(), "Request failed");
        }
        let body = json!({
            "error": self.0.to_string(),
            "code": self.0.code(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_segment_maps_to_bad_request() {
        let err = ApiError(GridError::InvalidSegment {
            segment: "a.b".to_string(),
            message: "bad".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_write_failure_maps_to_server_error() {
        let err = ApiError(GridError::SnapshotWrite {
            path: "x.json".into(),
            message: "disk full".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
