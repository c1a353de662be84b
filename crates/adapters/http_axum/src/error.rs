//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use autolights_domain::error::AutolightsError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`AutolightsError`] to an HTTP response with appropriate status code.
pub struct ApiError(AutolightsError);

impl<E: Into<AutolightsError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AutolightsError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AutolightsError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            AutolightsError::Host(err) => {
                tracing::error!(error = %err, "host error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
