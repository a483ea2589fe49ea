use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::matching::MatchError;
use crate::parsing::ParseError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every response body has the shape `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Multipart(#[from] MultipartError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Parse(ParseError::UnsupportedFileType) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::Parse(ParseError::NoText) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Parse(ParseError::Unexpected(msg)) => {
                tracing::error!("Resume parsing failed: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Match(e) => {
                tracing::error!("Resume matching failed: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Multipart(e) => e.status(),
        };

        let message = match &self {
            AppError::Multipart(e) => e.body_text(),
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let (status, body) = render(AppError::Validation("No file uploaded".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "No file uploaded" }));
    }

    #[tokio::test]
    async fn test_parse_errors_map_to_distinct_statuses() {
        let (status, body) = render(ParseError::UnsupportedFileType.into()).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"], "Unsupported file type");

        let (status, body) = render(ParseError::NoText.into()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Could not extract text from file");

        let (status, body) = render(ParseError::Unexpected("decoder exploded".into()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "decoder exploded");
    }

    #[tokio::test]
    async fn test_match_error_is_internal() {
        let (status, body) = render(MatchError::Unexpected("non-finite score".into()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "non-finite score");
    }
}
