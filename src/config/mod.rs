//! Route-list loading.
//!
//! Routes are plain data, so a test plan can live in a JSON document: a
//! top-level array of route objects. This module deserializes such
//! documents into [`RouteSpec`] lists for [`TestRunner::new`].
//!
//! [`TestRunner::new`]: crate::runner::TestRunner::new

use crate::models::RouteSpec;
use crate::runner::error::ConfigError;
use std::path::Path;

/// Parses a route list from a JSON array document.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] when the document is not a JSON array of
/// route objects.
pub fn routes_from_json(json: &str) -> Result<Vec<RouteSpec>, ConfigError> {
    serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))
}

/// Reads and parses a route list from a JSON file.
pub fn routes_from_file(path: impl AsRef<Path>) -> Result<Vec<RouteSpec>, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|err| ConfigError::Read {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    routes_from_json(&contents)
}
