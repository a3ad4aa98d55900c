//! Core data models for route specifications, requests, and responses.

pub mod request;
pub mod response;
pub mod route;

pub use request::{FilePart, HttpMethod, MultipartForm, RequestDescriptor};
pub use response::RouteResponse;
pub use route::{Expectations, FileUpload, RouteSpec, VariableSpec};
