use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::{completion::UpstreamError, normalizer::NormalizationError};

/// Message returned to callers for faults whose detail must not leak
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Diagnostic text for a 500 response, attached as a response extension.
///
/// The body itself only ever says [`INTERNAL_ERROR_MESSAGE`]; the
/// `error_detail` middleware decides whether this detail is exposed.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::Upstream(err) => {
                let status = match &err {
                    UpstreamError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                    UpstreamError::Unavailable(_) => StatusCode::BAD_GATEWAY,
                };
                (status, json!({ "error": err.to_string() }))
            }
            AppError::Normalization(err) => (
                StatusCode::BAD_GATEWAY,
                json!({
                    "error": "Invalid AI response",
                    "kind": err.kind,
                    "detail": err.detail,
                    "raw_output": err.raw_output,
                }),
            ),
            AppError::Database(_) | AppError::Internal(_) => {
                let detail = self.to_string();
                tracing::error!(error = %detail, "Request failed with internal error");

                let mut response = (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
                )
                    .into_response();
                response.extensions_mut().insert(InternalErrorDetail(detail));
                return response;
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::normalizer::NormalizationErrorKind;

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                AppError::Upstream(UpstreamError::Timeout),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                AppError::Upstream(UpstreamError::Unavailable("down".into())),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_normalization_error_maps_to_bad_gateway() {
        let error = AppError::Normalization(NormalizationError {
            kind: NormalizationErrorKind::ParseError,
            detail: "EOF while parsing".into(),
            raw_output: "[{".into(),
        });
        assert_eq!(error.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_internal_error_carries_detail_extension() {
        let response = AppError::Internal("pool exhausted".into()).into_response();
        let detail = response.extensions().get::<InternalErrorDetail>().unwrap();
        assert!(detail.0.contains("pool exhausted"));
    }

    #[test]
    fn test_client_errors_have_no_detail_extension() {
        let response = AppError::Forbidden("nope".into()).into_response();
        assert!(response.extensions().get::<InternalErrorDetail>().is_none());
    }
}
