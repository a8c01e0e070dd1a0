//! Error handling for the HTTP layer
//!
//! Maps task errors to HTTP status codes and JSON error bodies.

use axum::{
    extract::rejection::{BytesRejection, JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use taskboard_core::TaskError;
use thiserror::Error;

/// Request-scoped API errors
///
/// Every variant maps to exactly one status code; the body is always
/// `{"detail": "<message>"}`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Maps to: `404 Not Found`
    #[error("{0}")]
    NotFound(String),

    /// Malformed body, blank title or bad path parameter
    ///
    /// Maps to: `422 Unprocessable Entity`
    #[error("{0}")]
    Validation(String),

    /// Storage failure; details are logged, never returned
    ///
    /// Maps to: `500 Internal Server Error`
    #[error("Storage error: {0}")]
    Storage(String),

    /// Request body over [`MAX_BODY_BYTES`](crate::request_logger::MAX_BODY_BYTES)
    ///
    /// Maps to: `413 Payload Too Large`
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Store not reachable
    ///
    /// Maps to: `503 Service Unavailable`
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Maps to: `500 Internal Server Error`
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to clients
    pub fn detail(&self) -> String {
        match self {
            ApiError::NotFound(_) => "Task not found".to_string(),
            ApiError::Validation(msg) => msg.clone(),
            ApiError::PayloadTooLarge(_) => "Request body too large".to_string(),
            ApiError::Storage(_) | ApiError::Internal(_) => "Internal server error".to_string(),
            ApiError::Unavailable(_) => "Service unavailable".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::Storage(msg) | ApiError::Internal(msg) | ApiError::Unavailable(msg) => {
                tracing::error!(status = status.as_u16(), error = %msg, "Request failed");
            }
            ApiError::NotFound(msg) | ApiError::Validation(msg) | ApiError::PayloadTooLarge(msg) => {
                tracing::debug!(status = status.as_u16(), error = %msg, "Request rejected");
            }
        }

        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

/// Convert from TaskError to ApiError
impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound(msg) => ApiError::NotFound(msg),
            TaskError::Validation(msg) => ApiError::Validation(msg),
            TaskError::Database(msg) => ApiError::Storage(msg),
            TaskError::Configuration(msg) => ApiError::Internal(format!("Configuration error: {msg}")),
            TaskError::Startup(msg) => ApiError::Unavailable(msg),
        }
    }
}

/// Any unreadable JSON body is a validation failure, except an oversized one
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::Validation(rejection.body_text())
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::Validation(rejection.body_text())
        }
    }
}

/// A path segment that is not a task ID is a validation failure
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NotFound("1".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Storage("conn failed".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Unavailable("down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::PayloadTooLarge("3145728 bytes".into()).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_from_task_error() {
        assert_eq!(
            ApiError::from(TaskError::not_found_id(7)),
            ApiError::NotFound("Task with ID 7 not found".to_string())
        );
        assert_eq!(
            ApiError::from(TaskError::empty_field("title")),
            ApiError::Validation("Field 'title' cannot be empty".to_string())
        );
        assert!(matches!(
            ApiError::from(TaskError::Database("x".into())),
            ApiError::Storage(_)
        ));
        assert!(matches!(
            ApiError::from(TaskError::Startup("x".into())),
            ApiError::Unavailable(_)
        ));
        assert!(matches!(
            ApiError::from(TaskError::Configuration("x".into())),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_task_status_codes_agree_with_http_mapping() {
        let errors = [
            TaskError::NotFound("x".into()),
            TaskError::Validation("x".into()),
            TaskError::Database("x".into()),
            TaskError::Configuration("x".into()),
            TaskError::Startup("x".into()),
        ];
        for err in errors {
            let expected = err.status_code();
            assert_eq!(ApiError::from(err).status_code().as_u16(), expected);
        }
    }

    #[tokio::test]
    async fn test_storage_error_body_hides_details() {
        let response =
            ApiError::Storage("password authentication failed for user".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "detail": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_payload_too_large_body() {
        let response = ApiError::PayloadTooLarge("length limit exceeded".into()).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "detail": "Request body too large" }));
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = ApiError::NotFound("Task with ID 9 not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "detail": "Task not found" }));
    }
}
