//! Request descriptor data models.
//!
//! This module defines the fully-resolved request handed to the transport:
//! the HTTP method, final URL, headers, query parameters, JSON body, and
//! staged multipart form data.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// HTTP GET method - retrieve a resource
    GET,
    /// HTTP POST method - submit data to create a resource
    POST,
    /// HTTP PUT method - replace a resource
    PUT,
    /// HTTP DELETE method - remove a resource
    DELETE,
    /// HTTP PATCH method - partially modify a resource
    PATCH,
    /// HTTP OPTIONS method - describe communication options
    OPTIONS,
    /// HTTP HEAD method - retrieve headers only
    HEAD,
}

impl HttpMethod {
    /// Returns the string representation of the HTTP method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::HEAD => "HEAD",
        }
    }

    /// Parses a string into an HttpMethod, case-insensitively.
    ///
    /// # Returns
    ///
    /// `Some(HttpMethod)` if the string is a supported method, `None`
    /// otherwise.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(HttpMethod::GET),
            "POST" => Some(HttpMethod::POST),
            "PUT" => Some(HttpMethod::PUT),
            "DELETE" => Some(HttpMethod::DELETE),
            "PATCH" => Some(HttpMethod::PATCH),
            "OPTIONS" => Some(HttpMethod::OPTIONS),
            "HEAD" => Some(HttpMethod::HEAD),
            _ => None,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A staged file part inside a multipart form.
///
/// The file's bytes are read eagerly when the request is built, so no file
/// handle survives past the step that uses it.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Multipart field name carrying the file.
    pub field_name: String,

    /// File name sent in the part's content-disposition.
    pub file_name: String,

    /// MIME type derived from the file extension.
    pub content_type: String,

    /// The file's contents.
    pub bytes: Vec<u8>,
}

/// Multipart form data attached to a request.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    /// Plain text fields, in declaration order.
    pub fields: Vec<(String, String)>,

    /// Optional file part.
    pub file: Option<FilePart>,
}

impl MultipartForm {
    /// Checks whether the form carries neither fields nor a file.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.file.is_none()
    }
}

/// A fully-resolved HTTP request ready to hand to the transport.
///
/// All template placeholders have been substituted and the final URL has
/// been assembled from the base URL, base path, optional model segment,
/// and route URL.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: HttpMethod,

    /// Absolute target URL.
    pub url: String,

    /// Request headers. String values have been template-resolved;
    /// non-string values are rendered verbatim by the transport.
    pub headers: IndexMap<String, Value>,

    /// Query-string parameters.
    pub qs: Option<IndexMap<String, Value>>,

    /// JSON request body.
    pub body: Option<Value>,

    /// Staged multipart form data (file uploads and form fields).
    pub multipart: Option<MultipartForm>,
}

impl RequestDescriptor {
    /// Creates a bodiless descriptor with the given method and URL.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: IndexMap::new(),
            qs: None,
            body: None,
            multipart: None,
        }
    }

    /// Renders the descriptor as a JSON value for debug dumps.
    ///
    /// File bytes are summarized by length rather than inlined.
    pub fn describe(&self) -> Value {
        let multipart = self.multipart.as_ref().map(|form| {
            let fields: Value = form
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect::<serde_json::Map<String, Value>>()
                .into();
            let file = form.file.as_ref().map(|part| {
                json!({
                    "field_name": part.field_name,
                    "file_name": part.file_name,
                    "content_type": part.content_type,
                    "bytes": part.bytes.len(),
                })
            });
            json!({ "fields": fields, "file": file })
        });

        json!({
            "method": self.method.as_str(),
            "url": &self.url,
            "headers": &self.headers,
            "qs": &self.qs,
            "body": &self.body,
            "formData": multipart,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_as_str() {
        assert_eq!(HttpMethod::GET.as_str(), "GET");
        assert_eq!(HttpMethod::POST.as_str(), "POST");
        assert_eq!(HttpMethod::DELETE.as_str(), "DELETE");
    }

    #[test]
    fn test_http_method_parse() {
        assert_eq!(HttpMethod::parse("GET"), Some(HttpMethod::GET));
        assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::GET));
        assert_eq!(HttpMethod::parse("Patch"), Some(HttpMethod::PATCH));
        assert_eq!(HttpMethod::parse("FETCH"), None);
    }

    #[test]
    fn test_http_method_display() {
        assert_eq!(format!("{}", HttpMethod::PUT), "PUT");
    }

    #[test]
    fn test_multipart_form_is_empty() {
        assert!(MultipartForm::default().is_empty());

        let form = MultipartForm {
            fields: vec![("name".to_string(), "avatar.png".to_string())],
            file: None,
        };
        assert!(!form.is_empty());
    }

    #[test]
    fn test_describe_summarizes_file_bytes() {
        let mut descriptor =
            RequestDescriptor::new(HttpMethod::POST, "http://localhost/api/upload");
        descriptor.multipart = Some(MultipartForm {
            fields: vec![("name".to_string(), "avatar.png".to_string())],
            file: Some(FilePart {
                field_name: "file".to_string(),
                file_name: "avatar.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![0u8; 2048],
            }),
        });

        let dump = descriptor.describe();
        assert_eq!(dump["method"], "POST");
        assert_eq!(dump["formData"]["file"]["bytes"], 2048);
        assert_eq!(dump["formData"]["file"]["content_type"], "image/png");
    }
}
