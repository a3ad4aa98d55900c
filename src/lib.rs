//! Declarative HTTP API test runner.
//!
//! Given an ordered list of route specifications, the runner issues HTTP
//! requests sequentially against a running server, validates each response
//! (status code, body shape, header values), and threads values extracted
//! from one response into later requests through a shared variable
//! context.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - **models**: Route specifications, request descriptors, responses
//! - **template**: `${variable}` substitution and the run context
//! - **path**: dot/bracket body-path resolution over JSON values
//! - **builder**: Request assembly (URL joining, multipart staging)
//! - **validator**: Status, body-type, property, and header checks
//! - **extractor**: Variable extraction into the run context
//! - **runner**: The sequential fail-fast execution engine
//! - **transport**: The HTTP seam (trait + reqwest implementation)
//! - **config**: Route-list loading from JSON documents
//!
//! # Example
//!
//! ```no_run
//! use route_tester::{ReqwestTransport, RouteSpec, TestRunner};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let routes = route_tester::config::routes_from_json(
//!     r#"[
//!         {
//!             "title": "login",
//!             "method": "POST",
//!             "url": "auth/login",
//!             "body": {"email": "user@example.com", "password": "secret"},
//!             "expect": {"bodyType": "object", "properties": {"token": "string"}},
//!             "variables": {"token": {"required": true}}
//!         },
//!         {
//!             "title": "profile",
//!             "url": "me",
//!             "headers": {"authorization": "Bearer ${token}"}
//!         }
//!     ]"#,
//! )?;
//!
//! let runner = TestRunner::new(routes, "http://localhost:3000", None)?;
//! let transport = ReqwestTransport::new()?;
//! let report = runner.run(&transport).await;
//!
//! std::process::exit(report.exit_code());
//! # }
//! ```
//!
//! The run halts at the first failing step; the report carries the failing
//! step's title and error. Skipped steps (`skip: true`) are never sent to
//! the transport and never touch the context.

pub mod builder;
pub mod config;
pub mod extractor;
pub mod models;
pub mod path;
pub mod runner;
pub mod template;
pub mod transport;
pub mod validator;

pub use models::{
    Expectations, FilePart, FileUpload, HttpMethod, MultipartForm, RequestDescriptor,
    RouteResponse, RouteSpec, VariableSpec,
};
pub use runner::{
    ConfigError, RunReport, RunnerError, StepOutcome, StepReport, TestRunner, DEFAULT_BASE_PATH,
};
pub use template::Context;
pub use transport::{ReqwestTransport, Transport};
pub use validator::ValueType;
