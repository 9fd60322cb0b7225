//! Headwind webhook receiver - a local endpoint for inspecting notifications.
//!
//! Point a Headwind instance at this receiver to see exactly what it sends:
//! every POST is acknowledged with `{"status": "ok"}`, its
//! `X-Headwind-Signature` is checked against the shared secret, and the
//! payload is pretty-printed to the console.
//!
//! ## Request Flow
//!
//! ```text
//! POST → receive_webhook → check_signature → Payload / RawBody → WebhookReport → stdout
//! ```

pub mod config;
pub mod payload;
pub mod report;
pub mod server;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use payload::{Payload, PayloadError, RawBody, Summary};
pub use report::{BodyView, WebhookReport};
pub use server::{shutdown_signal, ReceiverServer};
pub use web::{expected_signature, AppState, SignatureCheck};
