//! HTTP transport.
//!
//! The sequencer treats the network as a black box behind the
//! [`Transport`] trait: a request descriptor goes in, a settled response
//! comes out. [`ReqwestTransport`] is the production implementation; tests
//! can inject a fake to exercise the engine without sockets.

use crate::models::{HttpMethod, RequestDescriptor, RouteResponse};
use crate::runner::error::RunnerError;
use crate::template::render_value;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Default per-request timeout for the reqwest transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends fully-resolved requests and settles their responses.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the settled response.
    ///
    /// Implementations must not reject on non-2xx status codes; status
    /// validation is the validator's job. Errors are reserved for
    /// network-level failures.
    async fn send(&self, request: &RequestDescriptor) -> Result<RouteResponse, RunnerError>;
}

/// Production transport backed by a shared reqwest client.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with the default 30 second timeout.
    pub fn new() -> Result<Self, RunnerError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a transport with a custom per-request timeout.
    ///
    /// The sequencer itself never cancels an in-flight request; this
    /// client-level timeout is the only guard against a stalled server.
    pub fn with_timeout(timeout: Duration) -> Result<Self, RunnerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RunnerError::transport(err.to_string(), None))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<RouteResponse, RunnerError> {
        let method = match request.method {
            HttpMethod::GET => reqwest::Method::GET,
            HttpMethod::POST => reqwest::Method::POST,
            HttpMethod::PUT => reqwest::Method::PUT,
            HttpMethod::DELETE => reqwest::Method::DELETE,
            HttpMethod::PATCH => reqwest::Method::PATCH,
            HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
            HttpMethod::HEAD => reqwest::Method::HEAD,
        };

        let mut builder = self.client.request(method, &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), render_value(value));
        }

        if let Some(qs) = &request.qs {
            let pairs: Vec<(String, String)> = qs
                .iter()
                .map(|(name, value)| (name.clone(), render_value(value)))
                .collect();
            builder = builder.query(&pairs);
        }

        if let Some(multipart) = &request.multipart {
            let mut form = reqwest::multipart::Form::new();
            for (name, value) in &multipart.fields {
                form = form.text(name.clone(), value.clone());
            }
            if let Some(part) = &multipart.file {
                let file_part = reqwest::multipart::Part::bytes(part.bytes.clone())
                    .file_name(part.file_name.clone())
                    .mime_str(&part.content_type)
                    .map_err(|err| RunnerError::transport(err.to_string(), None))?;
                form = form.part(part.field_name.clone(), file_part);
            }
            builder = builder.multipart(form);
        } else if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;

        let status_code = response.status().as_u16();

        let mut headers: HashMap<String, String> = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers
                    .entry(name.as_str().to_string())
                    .and_modify(|existing| {
                        existing.push_str(", ");
                        existing.push_str(value_str);
                    })
                    .or_insert_with(|| value_str.to_string());
            }
        }

        let bytes = response.bytes().await?;
        let body = parse_body(&bytes);

        Ok(RouteResponse {
            status_code,
            body,
            headers,
        })
    }
}

/// Settles a raw response body into a JSON value.
///
/// Empty bodies become null, valid JSON parses as-is, and anything else is
/// carried as a string value so type-tag checks stay meaningful.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(_) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
    }
}
