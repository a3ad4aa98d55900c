//! Route specification data models.
//!
//! This module defines the declarative shape of a single test step: the
//! request to issue, the expectations to check against the response, and
//! the variables to extract into the run context afterwards.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

/// A file attachment for multipart upload.
///
/// When present on a route, the request is sent as multipart form data
/// carrying the file's bytes alongside a `name` field with its base name.
#[derive(Debug, Clone, Deserialize)]
pub struct FileUpload {
    /// Path to the file on disk.
    pub path: PathBuf,

    /// Name of the multipart field carrying the file bytes.
    ///
    /// Defaults to `"file"` when not specified.
    #[serde(default)]
    pub form_name: Option<String>,
}

/// Expectations checked against a route's response.
///
/// All checks are optional except the status code, which defaults to 200.
/// Checks run in declaration order: status code, body type, body
/// properties, then headers; the first mismatch fails the step.
#[derive(Debug, Clone, Deserialize)]
pub struct Expectations {
    /// Expected HTTP status code. Defaults to 200.
    #[serde(default = "default_status_code", rename = "statusCode")]
    pub status_code: u16,

    /// Expected type tag of the response body (case-insensitive).
    ///
    /// One of: `null`, `boolean`, `number`, `string`, `array`, `object`.
    #[serde(default, rename = "bodyType")]
    pub body_type: Option<String>,

    /// Expected type tags for body properties, keyed by body path.
    ///
    /// Paths use dot/bracket notation (`user.id`, `items[0].name`). The
    /// special tag `any` accepts every value as long as the path exists.
    /// Only checked when the response body is a JSON object.
    #[serde(default)]
    pub properties: Option<IndexMap<String, String>>,

    /// Expected response header substrings, keyed by header name.
    ///
    /// Header names are compared case-insensitively and values are matched
    /// by substring containment, not equality, so `content-type:
    /// application/json` accepts `application/json; charset=utf-8`.
    #[serde(default)]
    pub headers: Option<IndexMap<String, String>>,
}

impl Default for Expectations {
    fn default() -> Self {
        Self {
            status_code: default_status_code(),
            body_type: None,
            properties: None,
            headers: None,
        }
    }
}

fn default_status_code() -> u16 {
    200
}

/// A variable extraction rule attached to a body path.
///
/// After a route's response passes validation, each declared body path is
/// resolved against the body and, when present, stored into the run
/// context for later routes to reference via `${name}` placeholders.
#[derive(Debug, Clone, Deserialize)]
pub struct VariableSpec {
    /// Context name to store the value under.
    ///
    /// Defaults to the body path itself when not specified.
    #[serde(default)]
    pub name: Option<String>,

    /// Whether to store the extracted value into the context.
    ///
    /// Defaults to true. A rule with `register: false` and a `value` acts
    /// as a pure assertion without touching the context.
    #[serde(default = "default_register")]
    pub register: bool,

    /// Whether a missing body path fails the step.
    ///
    /// Defaults to false: an absent path is silently skipped.
    #[serde(default)]
    pub required: bool,

    /// Expected literal value. When set, the extracted value must equal it
    /// exactly or the step fails.
    #[serde(default)]
    pub value: Option<Value>,
}

impl Default for VariableSpec {
    fn default() -> Self {
        Self {
            name: None,
            register: default_register(),
            required: false,
            value: None,
        }
    }
}

fn default_register() -> bool {
    true
}

/// One declarative HTTP test step.
///
/// Routes are constructed by the host as static configuration before the
/// run starts; the runner never mutates them. Template resolution produces
/// new strings and header maps rather than rewriting the spec in place.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteSpec {
    /// Step label used for logging and timing. Required and non-empty.
    pub title: String,

    /// HTTP method name. Defaults to GET; unknown names are rejected at
    /// runner construction.
    #[serde(default)]
    pub method: Option<String>,

    /// Optional model path segment inserted between the base path and the
    /// route URL (`{base}/{base_path}/{model}/{url}`).
    #[serde(default)]
    pub model: Option<String>,

    /// Route URL, appended after the base path (and model, if any).
    ///
    /// May contain `${name}` placeholders resolved from the run context.
    pub url: String,

    /// Request headers. String values may contain `${name}` placeholders;
    /// non-string values are passed through untouched.
    #[serde(default)]
    pub headers: Option<IndexMap<String, Value>>,

    /// Query-string parameters.
    #[serde(default)]
    pub qs: Option<IndexMap<String, Value>>,

    /// JSON request body.
    #[serde(default)]
    pub body: Option<Value>,

    /// Multipart form fields. Superseded by the staged upload form when
    /// `file` is also set.
    #[serde(default, rename = "formData")]
    pub form_data: Option<IndexMap<String, Value>>,

    /// Optional file attachment; triggers multipart upload mode.
    #[serde(default)]
    pub file: Option<FileUpload>,

    /// Response expectations. Absent means "status code 200" only.
    #[serde(default)]
    pub expect: Option<Expectations>,

    /// Variable extraction rules, keyed by body path. Rules run in
    /// declaration order after validation succeeds.
    #[serde(default)]
    pub variables: Option<IndexMap<String, VariableSpec>>,

    /// When true the step is bypassed entirely: no request is sent and the
    /// context is left unchanged.
    #[serde(default)]
    pub skip: bool,

    /// When true the resolved request and settled response are dumped at
    /// debug log level.
    #[serde(default)]
    pub debug: bool,
}

impl RouteSpec {
    /// Creates a minimal GET route with the given title and URL.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            method: None,
            model: None,
            url: url.into(),
            headers: None,
            qs: None,
            body: None,
            form_data: None,
            file: None,
            expect: None,
            variables: None,
            skip: false,
            debug: false,
        }
    }

    /// Sets the HTTP method name.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets the model path segment.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the JSON request body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the response expectations.
    pub fn with_expect(mut self, expect: Expectations) -> Self {
        self.expect = Some(expect);
        self
    }

    /// Sets the variable extraction rules.
    pub fn with_variables(mut self, variables: IndexMap<String, VariableSpec>) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Adds a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: Value) -> Self {
        self.headers
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value);
        self
    }

    /// Marks the step as skipped.
    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }
}
