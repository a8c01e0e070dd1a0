//! Structured request logging middleware
//!
//! Emits one `tracing` event per request with method, path, status and
//! latency. Bodies of write requests are summarised with long values
//! truncated.

use crate::error::ApiError;
use axum::{
    body::Body,
    extract::Request,
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde_json::Value;
use std::time::Instant;

/// Largest request body read into memory; matches axum's default body limit
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Maximum length for parameter values before truncation
const MAX_PARAM_LENGTH: usize = 30;

/// Truncation suffix for long parameters
const TRUNCATION_SUFFIX: &str = "...";

/// Request logging middleware
pub async fn request_logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let (response, params_summary) = if method == Method::POST || method == Method::PUT {
        match summarise_body(request).await {
            Ok((request, summary)) => (next.run(request).await, summary),
            Err(rejection) => (rejection.into_response(), "body_too_large".to_string()),
        }
    } else {
        (next.run(request).await, String::new())
    };

    let status = response.status().as_u16();
    let latency_ms = start_time.elapsed().as_millis() as u64;

    if status >= 500 {
        tracing::warn!(%method, %path, status, latency_ms, params = %params_summary, "Request completed");
    } else {
        tracing::info!(%method, %path, status, latency_ms, params = %params_summary, "Request completed");
    }

    response
}

/// Buffer the body, summarise it, and hand back an equivalent request
///
/// Reads at most [`MAX_BODY_BYTES`]; a larger body is rejected with 413
/// without being passed on.
async fn summarise_body(request: Request<Body>) -> Result<(Request<Body>, String), ApiError> {
    let (parts, body) = request.into_parts();
    match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => {
            let bytes = collected.to_bytes();
            let summary = match serde_json::from_slice::<Value>(&bytes) {
                Ok(json) => format_params_summary(&json),
                Err(_) => "invalid_json".to_string(),
            };
            Ok((Request::from_parts(parts, Body::from(bytes)), summary))
        }
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(ApiError::PayloadTooLarge(
            format!("Request body exceeds {MAX_BODY_BYTES} bytes"),
        )),
        Err(_) => Ok((
            Request::from_parts(parts, Body::empty()),
            "unreadable_body".to_string(),
        )),
    }
}

/// Format parameters into a summary string with truncation
fn format_params_summary(params: &Value) -> String {
    match params {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", key, format_parameter_value(value)))
            .collect::<Vec<_>>()
            .join(", "),
        _ => format_parameter_value(params),
    }
}

/// Format a single parameter value with truncation
fn format_parameter_value(value: &Value) -> String {
    let value_str = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{...{} fields}}", obj.len()),
        Value::Null => "null".to_string(),
    };

    truncate_string(&value_str, MAX_PARAM_LENGTH)
}

/// Truncate string to max length (in characters) with suffix
fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let truncated_length = max_length.saturating_sub(TRUNCATION_SUFFIX.len());
        let head: String = input.chars().take(truncated_length).collect();
        format!("{head}{TRUNCATION_SUFFIX}")
    }
}
