//! Response validation.
//!
//! This module checks a settled response against a route's expectations,
//! in order: status code, body type tag, body property tags, then header
//! substrings. The first mismatch fails the step.

use crate::models::{Expectations, RouteResponse};
use crate::path;
use crate::runner::error::RunnerError;
use serde_json::Value;
use std::fmt;

/// Runtime type tag of a JSON value.
///
/// An explicit, enumerated classifier used for body-type and property
/// checks. Tags compare case-insensitively against expectation strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// JSON null
    Null,
    /// JSON true/false
    Boolean,
    /// JSON number (integer or float)
    Number,
    /// JSON string
    String,
    /// JSON array
    Array,
    /// JSON object
    Object,
}

impl ValueType {
    /// Classifies a JSON value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Boolean,
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
        }
    }

    /// Returns the lowercase tag name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Null => "null",
            ValueType::Boolean => "boolean",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Array => "array",
            ValueType::Object => "object",
        }
    }

    /// Compares the tag against an expected tag name, case-insensitively.
    pub fn matches(&self, expected: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(expected.trim())
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Expected property tag that matches every value.
const ANY_TYPE: &str = "any";

/// Validates a response against a route's expectations.
///
/// Checks run in order and the first failure is returned:
///
/// 1. Status code equality (the message carries expected and actual).
/// 2. Body type tag, when `body_type` is declared.
/// 3. Body property tags, when `properties` is declared and the body is a
///    JSON object. A missing path fails; the tag `any` accepts any value.
/// 4. Header substrings: each declared header must be present
///    (case-insensitive name) and its value must contain the expected
///    fragment.
pub fn validate_response(
    expect: &Expectations,
    response: &RouteResponse,
) -> Result<(), RunnerError> {
    if response.status_code != expect.status_code {
        return Err(RunnerError::step_with_status(
            format!(
                "Invalid response status code: should be {} but returned {}",
                expect.status_code, response.status_code
            ),
            response.status_code,
        ));
    }
    log::info!("    statusCode = {}", expect.status_code);

    if let Some(expected_type) = &expect.body_type {
        let actual = ValueType::of(&response.body);
        if !actual.matches(expected_type) {
            return Err(RunnerError::step(format!(
                "Invalid type for the response body: should be {} but detected as {}",
                expected_type.to_lowercase(),
                actual
            )));
        }
        log::info!("    bodyType = {}", actual);
    }

    if let Some(properties) = &expect.properties {
        if ValueType::of(&response.body) == ValueType::Object {
            for (key, expected_type) in properties {
                let value = match path::get(&response.body, key) {
                    Some(value) => value,
                    None => {
                        return Err(RunnerError::step(format!(
                            "Missing body response key {}",
                            key
                        )));
                    }
                };
                if expected_type.eq_ignore_ascii_case(ANY_TYPE) {
                    continue;
                }
                let actual = ValueType::of(value);
                if !actual.matches(expected_type) {
                    return Err(RunnerError::step(format!(
                        "Property {} should be {} but the returned property was {}",
                        key,
                        expected_type.to_lowercase(),
                        actual
                    )));
                }
                log::info!("        key {} = {}", key, actual);
            }
        }
    }

    if let Some(headers) = &expect.headers {
        for (name, fragment) in headers {
            let value = response.header(name).ok_or_else(|| {
                RunnerError::step(format!(
                    "Key {} is not present in the response headers",
                    name.to_lowercase()
                ))
            })?;
            if !value.contains(fragment) {
                return Err(RunnerError::step(format!(
                    "Invalid value for header {}: should contain {} but was {}",
                    name.to_lowercase(),
                    fragment,
                    value
                )));
            }
            log::info!("        header {} contains {}", name.to_lowercase(), fragment);
        }
    }

    Ok(())
}
