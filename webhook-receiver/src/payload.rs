//! Loosely-typed view over Headwind notification payloads.
//!
//! The receiver never validates payloads against a schema. Fields are read
//! through optional accessors so a missing or oddly-typed field only shows
//! up as a placeholder in the summary.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Placeholder rendered for absent fields.
pub const ABSENT: &str = "<none>";

/// Errors produced while interpreting a request body.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// A parsed JSON payload.
#[derive(Debug, Clone)]
pub struct Payload {
    value: Value,
}

impl Payload {
    /// Parse a raw body as UTF-8 JSON text.
    pub fn parse(body: &[u8]) -> Result<Self, PayloadError> {
        let value = serde_json::from_slice(body)?;
        Ok(Self { value })
    }

    /// The full structure with 2-space indentation.
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.value).unwrap_or_else(|_| self.value.to_string())
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Top-level `event` field.
    pub fn event(&self) -> Option<&str> {
        self.value.get("event").and_then(Value::as_str)
    }

    /// Nested `deployment` object, if present and an object.
    fn deployment(&self) -> Option<&Value> {
        self.value.get("deployment").filter(|d| d.is_object())
    }

    fn deployment_field(&self, key: &str) -> Option<&str> {
        self.deployment()
            .and_then(|d| d.get(key))
            .and_then(Value::as_str)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.deployment_field("namespace")
    }

    pub fn name(&self) -> Option<&str> {
        self.deployment_field("name")
    }

    pub fn current_image(&self) -> Option<&str> {
        self.deployment_field("currentImage")
    }

    pub fn new_image(&self) -> Option<&str> {
        self.deployment_field("newImage")
    }

    /// Highlighted key fields.
    pub fn summary(&self) -> Summary<'_> {
        Summary { payload: self }
    }
}

/// The three highlight lines printed after the full payload.
pub struct Summary<'a> {
    payload: &'a Payload,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.payload;
        writeln!(f, "Event: {}", or_absent(p.event()))?;
        writeln!(
            f,
            "Deployment: {}/{}",
            or_absent(p.namespace()),
            or_absent(p.name())
        )?;
        write!(
            f,
            "Image: {} → {}",
            or_absent(p.current_image()),
            or_absent(p.new_image())
        )
    }
}

fn or_absent(field: Option<&str>) -> &str {
    field.unwrap_or(ABSENT)
}

/// Text rendering of a body that is not JSON.
pub struct RawBody;

impl RawBody {
    /// The body as UTF-8 text, or a marker if it cannot be decoded.
    pub fn describe(body: &[u8]) -> String {
        match std::str::from_utf8(body) {
            Ok(text) => text.to_string(),
            Err(_) => format!("<undecodable: {} bytes>", body.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{"event":"deploy","deployment":{"namespace":"prod","name":"api","currentImage":"v1","newImage":"v2"}}"#;

    #[test]
    fn test_parse_full_payload() {
        let payload = Payload::parse(FULL.as_bytes()).unwrap();

        assert_eq!(payload.event(), Some("deploy"));
        assert_eq!(payload.namespace(), Some("prod"));
        assert_eq!(payload.name(), Some("api"));
        assert_eq!(payload.current_image(), Some("v1"));
        assert_eq!(payload.new_image(), Some("v2"));
    }

    #[test]
    fn test_summary_full_payload() {
        let payload = Payload::parse(FULL.as_bytes()).unwrap();
        let summary = payload.summary().to_string();

        assert!(summary.contains("Event: deploy"));
        assert!(summary.contains("Deployment: prod/api"));
        assert!(summary.contains("Image: v1 → v2"));
    }

    #[test]
    fn test_summary_missing_deployment() {
        let payload = Payload::parse(br#"{"event":"approved"}"#).unwrap();
        let summary = payload.summary().to_string();

        assert_eq!(
            summary,
            "Event: approved\nDeployment: <none>/<none>\nImage: <none> → <none>"
        );
    }

    #[test]
    fn test_summary_non_object_payload() {
        let payload = Payload::parse(b"[1, 2, 3]").unwrap();
        assert_eq!(payload.event(), None);
        assert!(payload.summary().to_string().starts_with("Event: <none>"));
    }

    #[test]
    fn test_wrongly_typed_fields_are_absent() {
        let payload =
            Payload::parse(br#"{"event":42,"deployment":"prod/api"}"#).unwrap();
        assert_eq!(payload.event(), None);
        assert_eq!(payload.namespace(), None);
        assert_eq!(payload.new_image(), None);
    }

    #[test]
    fn test_pretty_is_indented_and_ordered() {
        let payload = Payload::parse(FULL.as_bytes()).unwrap();
        let pretty = payload.pretty();

        assert!(pretty.starts_with("{\n  \"event\": \"deploy\""));
        assert!(pretty.contains("\n    \"namespace\": \"prod\""));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = Payload::parse(b"hello world").unwrap_err();
        assert!(err.to_string().starts_with("body is not valid JSON"));
    }

    #[test]
    fn test_raw_body_describe() {
        assert_eq!(RawBody::describe(b"hello world"), "hello world");
        assert_eq!(
            RawBody::describe(&[0xff, 0xfe, 0x00]),
            "<undecodable: 3 bytes>"
        );
    }
}
