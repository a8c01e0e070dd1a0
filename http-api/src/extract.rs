//! Extractors whose rejections are reported as [`ApiError`]s.

use crate::error::ApiError;
use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts},
    Json,
};
use serde::de::DeserializeOwned;
use taskboard_core::TaskError;

/// JSON request body
///
/// A body sent without a `Content-Type` header is still parsed as JSON. A
/// non-JSON content type, unparsable JSON or a body of the wrong shape
/// becomes a 422.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if req.headers().contains_key(header::CONTENT_TYPE) {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            return Ok(Self(value));
        }

        let bytes = Bytes::from_request(req, state).await?;
        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| ApiError::Validation(format!("Failed to parse the request body as JSON: {e}")))
    }
}

/// Task ID taken from the `{id}` path segment
///
/// Integers that cannot name a stored task (outside the `i32` range) are
/// reported as not found; anything that is not an integer is a 422.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for TaskId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        parse_task_id(&raw).map(Self)
    }
}

fn parse_task_id(raw: &str) -> Result<i32, ApiError> {
    if let Ok(id) = raw.parse::<i32>() {
        return Ok(id);
    }

    let digits = raw.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TaskError::NotFound(format!("Task with ID {raw} not found")).into());
    }

    Err(ApiError::Validation(format!(
        "Invalid task ID '{raw}': expected an integer"
    )))
}
