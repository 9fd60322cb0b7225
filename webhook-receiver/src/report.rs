//! Console report for a single received webhook.
//!
//! Each request produces one block of human-readable output, framed by
//! delimiter lines and stamped with the time it arrived.

use std::fmt;
use std::io::{self, Write};

use chrono::{DateTime, Local};

use crate::payload::{Payload, RawBody};
use crate::web::signature::SignatureCheck;

/// Width of the `=` delimiter lines.
const DELIMITER_WIDTH: usize = 80;

/// How the body was interpreted.
#[derive(Debug)]
pub enum BodyView {
    Json(Payload),
    Raw(String),
}

impl BodyView {
    /// Parse as JSON, falling back to the raw text.
    pub fn from_bytes(body: &[u8]) -> Self {
        match Payload::parse(body) {
            Ok(payload) => BodyView::Json(payload),
            Err(_) => BodyView::Raw(RawBody::describe(body)),
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, BodyView::Json(_))
    }
}

/// Everything printed for one request.
#[derive(Debug)]
pub struct WebhookReport {
    pub received_at: DateTime<Local>,
    /// Received header value and the result of checking it.
    pub signature: Option<(String, SignatureCheck)>,
    pub body: BodyView,
}

impl WebhookReport {
    pub fn new(signature: Option<(String, SignatureCheck)>, body: BodyView) -> Self {
        Self {
            received_at: Local::now(),
            signature,
            body,
        }
    }

    /// Write the report to stdout as a single block.
    pub fn print(&self) -> io::Result<()> {
        let rendered = self.to_string();
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", rendered)?;
        stdout.flush()
    }
}

impl fmt::Display for WebhookReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delimiter = "=".repeat(DELIMITER_WIDTH);

        writeln!(f)?;
        writeln!(f, "{}", delimiter)?;
        writeln!(
            f,
            "[{}] Received webhook notification",
            self.received_at.to_rfc3339()
        )?;
        writeln!(f, "{}", delimiter)?;

        if let Some((received, check)) = &self.signature {
            writeln!(f, "Signature: {}", received)?;
            match check {
                SignatureCheck::Verified => writeln!(f, "✓ Signature verified!")?,
                SignatureCheck::Mismatch { expected } => {
                    writeln!(f, "✗ Signature mismatch! Expected: {}", expected)?
                }
                SignatureCheck::NotConfigured => {
                    writeln!(f, "(verification disabled, no secret configured)")?
                }
            }
        }

        match &self.body {
            BodyView::Json(payload) => {
                writeln!(f, "\nPayload:")?;
                writeln!(f, "{}", payload.pretty())?;
                writeln!(f)?;
                write!(f, "{}", payload.summary())
            }
            BodyView::Raw(text) => {
                writeln!(f, "Body (not JSON):")?;
                write!(f, "{}", text)
            }
        }
    }
}
