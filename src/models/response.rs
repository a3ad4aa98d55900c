//! Response data models.
//!
//! This module defines the settled response shape the validator and
//! extractor operate on: status code, parsed JSON body, and headers.

use serde_json::Value;
use std::collections::HashMap;

/// A settled HTTP response as seen by the validation pipeline.
///
/// The transport parses the wire body into a [`Value`]: JSON payloads are
/// parsed as-is, non-JSON text becomes a string value, and an empty body
/// becomes null. This keeps the validator's type-tag checks uniform.
#[derive(Debug, Clone)]
pub struct RouteResponse {
    /// HTTP status code (e.g., 200, 404, 500).
    pub status_code: u16,

    /// Parsed response body.
    pub body: Value,

    /// Response headers. Multi-valued headers are joined with `", "`.
    pub headers: HashMap<String, String>,
}

impl RouteResponse {
    /// Creates a response with the given status code, a null body, and no
    /// headers.
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            body: Value::Null,
            headers: HashMap::new(),
        }
    }

    /// Sets the response body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Adds a response header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Looks up a header value by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_defaults() {
        let response = RouteResponse::new(204);
        assert_eq!(response.status_code, 204);
        assert_eq!(response.body, Value::Null);
        assert!(response.headers.is_empty());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = RouteResponse::new(200)
            .with_header("Content-Type", "application/json; charset=utf-8");

        assert_eq!(
            response.header("content-type"),
            Some("application/json; charset=utf-8")
        );
        assert_eq!(
            response.header("CONTENT-TYPE"),
            Some("application/json; charset=utf-8")
        );
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn test_with_body() {
        let response = RouteResponse::new(200).with_body(json!({"id": 1}));
        assert_eq!(response.body["id"], 1);
    }
}
