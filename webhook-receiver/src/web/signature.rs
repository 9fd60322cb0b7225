//! Headwind webhook signature verification.
//!
//! Headwind signs the raw request body with HMAC-SHA256 and sends the result
//! in the `X-Headwind-Signature` header as `sha256=<lowercase hex digest>`.
//! Verification here is diagnostic only: the outcome is reported, never enforced.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{info, warn};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature (`X-Headwind-Signature`).
pub const SIGNATURE_HEADER: &str = "x-headwind-signature";

/// Prefix of every signature value.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Result of checking a received signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureCheck {
    /// Received value matched the expected signature.
    Verified,
    /// Received value differed; carries the signature we expected.
    Mismatch { expected: String },
    /// No secret configured, so nothing was computed.
    NotConfigured,
}

/// Compute the signature header value for `body` under `secret`.
///
/// HMAC accepts keys of any length, so this cannot fail.
pub fn expected_signature(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(body);

    format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()))
}

/// Check a received `X-Headwind-Signature` value against the body.
///
/// # Arguments
///
/// * `secret` - The shared secret, `None` when verification is disabled
/// * `body` - The raw request body bytes
/// * `received` - The header value as sent by the caller
pub fn check_signature(secret: Option<&str>, body: &[u8], received: &str) -> SignatureCheck {
    let secret = match secret {
        Some(s) if is_signature_verification_enabled(secret) => s,
        _ => {
            info!(signature = %received, "signature_present_verification_disabled");
            return SignatureCheck::NotConfigured;
        }
    };

    let expected = expected_signature(secret, body);

    if constant_time_compare(&expected, received) {
        info!("signature_verified");
        SignatureCheck::Verified
    } else {
        warn!(
            expected = %expected,
            received = %received,
            expected_length = expected.len(),
            actual_length = received.len(),
            "signature_mismatch"
        );
        SignatureCheck::Mismatch { expected }
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

/// Check if signature verification is enabled.
pub fn is_signature_verification_enabled(secret: Option<&str>) -> bool {
    secret.map(|k| !k.trim().is_empty()).unwrap_or(false)
}
