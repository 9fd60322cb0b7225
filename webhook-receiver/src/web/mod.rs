//! Web server module for receiving webhook deliveries.
//!
//! The router sends every POST to the same handler regardless of path.
//! No access-log layer is installed; the handler prints its own report.

pub mod handlers;
pub mod signature;

use axum::{routing::get, Router};

pub use handlers::{
    health, receive_webhook, AppState, ErrorResponse, HealthResponse, RequestError, ACK_BODY,
};
pub use signature::{
    check_signature, expected_signature, is_signature_verification_enabled, SignatureCheck,
    SIGNATURE_HEADER,
};

/// Build the receiver router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health).post(receive_webhook))
        .fallback(receive_webhook)
        .with_state(state)
}
