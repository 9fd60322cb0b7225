//! Webhook endpoint handlers.
//!
//! Every POST, whatever its path, is treated as a webhook delivery:
//! 1. Read exactly `Content-Length` bytes of body
//! 2. Check the `X-Headwind-Signature` header if one was sent
//! 3. Print the payload report to the console
//! 4. Acknowledge with `{"status": "ok"}`
//!
//! Signature and payload problems only change what gets printed, never the response.

use std::sync::Arc;

use axum::{
    body::{self, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::report::{BodyView, WebhookReport};
use crate::web::signature::{check_signature, SIGNATURE_HEADER};
use crate::Config;

/// Acknowledgment body sent for every accepted delivery.
pub const ACK_BODY: &str = r#"{"status": "ok"}"#;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Request-level failures. These reject one request; the server keeps running.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("only POST is accepted, got {0}")]
    MethodNotAllowed(Method),

    #[error("Content-Length header is required")]
    MissingContentLength,

    #[error("invalid Content-Length header: {0}")]
    InvalidContentLength(String),

    #[error("failed to read request body: {0}")]
    UnreadableBody(String),
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            RequestError::MissingContentLength => StatusCode::LENGTH_REQUIRED,
            RequestError::InvalidContentLength(_) | RequestError::UnreadableBody(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

/// Error response body.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        warn!(error = %self, "webhook_request_rejected");
        (
            self.status_code(),
            Json(ErrorResponse {
                status: "error",
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Webhook Receiver
// =============================================================================

/// Webhook endpoint, mounted on every path.
pub async fn receive_webhook(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, RequestError> {
    if *request.method() != Method::POST {
        return Err(RequestError::MethodNotAllowed(request.method().clone()));
    }

    let content_length = content_length(request.headers())?;
    let signature = request
        .headers()
        .get(SIGNATURE_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
    let path = request.uri().path().to_string();

    let body: Bytes = body::to_bytes(request.into_body(), content_length)
        .await
        .map_err(|e| RequestError::UnreadableBody(e.to_string()))?;

    info!(
        path = %path,
        content_length = content_length,
        body_length = body.len(),
        has_signature = signature.is_some(),
        "webhook_received"
    );

    let signature = signature.map(|received| {
        let check = check_signature(state.config.secret(), &body, &received);
        (received, check)
    });

    let view = BodyView::from_bytes(&body);
    if !view.is_json() {
        info!(body_length = body.len(), "webhook_body_not_json");
    }

    if let Err(e) = WebhookReport::new(signature, view).print() {
        warn!(error = %e, "webhook_report_print_failed");
    }

    Ok(acknowledge())
}

/// The fixed acknowledgment response.
fn acknowledge() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        ACK_BODY,
    )
        .into_response()
}

/// Read the declared body length.
fn content_length(headers: &HeaderMap) -> Result<usize, RequestError> {
    let raw = headers
        .get(header::CONTENT_LENGTH)
        .ok_or(RequestError::MissingContentLength)?;

    raw.to_str()
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .ok_or_else(|| {
            RequestError::InvalidContentLength(String::from_utf8_lossy(raw.as_bytes()).into_owned())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_content_length_valid() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("42"));
        assert_eq!(content_length(&headers).unwrap(), 42);
    }

    #[test]
    fn test_content_length_missing() {
        let headers = HeaderMap::new();
        assert!(matches!(
            content_length(&headers),
            Err(RequestError::MissingContentLength)
        ));
    }

    #[test]
    fn test_content_length_invalid() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("abc"));
        match content_length(&headers) {
            Err(RequestError::InvalidContentLength(v)) => assert_eq!(v, "abc"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_request_error_status_codes() {
        assert_eq!(
            RequestError::MethodNotAllowed(Method::GET).status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            RequestError::MissingContentLength.status_code(),
            StatusCode::LENGTH_REQUIRED
        );
        assert_eq!(
            RequestError::InvalidContentLength("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
