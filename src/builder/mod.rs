//! Request assembly.
//!
//! This module turns a route spec plus its template-resolved URL and
//! headers into the final [`RequestDescriptor`] handed to the transport:
//! it joins the base URL, base path, optional model segment, and route
//! URL, and stages multipart form data for file uploads.

use crate::models::{
    FilePart, HttpMethod, MultipartForm, RequestDescriptor, RouteSpec,
};
use crate::runner::error::RunnerError;
use crate::template::render_value;
use indexmap::IndexMap;
use serde_json::Value;
use std::path::Path;

/// Default multipart field name for uploaded file bytes.
pub const DEFAULT_FILE_FIELD: &str = "file";

/// Joins the final request URL.
///
/// Shape: `{base_url}/{base_path}[/{model}]/{url}`, with any trailing
/// slash stripped from the base URL first.
pub fn join_url(base_url: &str, base_path: &str, model: Option<&str>, url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    match model {
        Some(model) => format!("{}/{}/{}/{}", base, base_path, model, url),
        None => format!("{}/{}/{}", base, base_path, url),
    }
}

/// Builds the request descriptor for one step.
///
/// `resolved_url` and `resolved_headers` are the template-resolved
/// versions of the route's `url` and `headers`; the route itself is never
/// mutated. Body, query parameters, and form data pass through verbatim.
///
/// When the route carries a file attachment, the file is read eagerly and
/// staged as multipart form data: a `name` field holding the file's base
/// name plus a field named by `file.form_name` (default `"file"`)
/// carrying the bytes, the base name as filename, and a content type
/// guessed from the extension. An unreadable file fails the step with an
/// I/O error; because the bytes are read here, no file handle outlives
/// the build on any exit path.
pub async fn build_request(
    route: &RouteSpec,
    method: HttpMethod,
    resolved_url: &str,
    resolved_headers: Option<IndexMap<String, Value>>,
    base_url: &str,
    base_path: &str,
) -> Result<RequestDescriptor, RunnerError> {
    let url = join_url(base_url, base_path, route.model.as_deref(), resolved_url);

    let mut descriptor = RequestDescriptor::new(method, url);
    descriptor.headers = resolved_headers.unwrap_or_default();
    descriptor.qs = route.qs.clone();
    descriptor.body = route.body.clone();

    if let Some(file) = &route.file {
        descriptor.multipart = Some(stage_upload(file).await?);
    } else if let Some(form_data) = &route.form_data {
        let fields = form_data
            .iter()
            .map(|(name, value)| (name.clone(), render_value(value)))
            .collect();
        descriptor.multipart = Some(MultipartForm { fields, file: None });
    }

    Ok(descriptor)
}

/// Stages a file attachment as a multipart form.
async fn stage_upload(file: &crate::models::FileUpload) -> Result<MultipartForm, RunnerError> {
    let file_name = base_name(&file.path).ok_or_else(|| RunnerError::Io {
        path: file.path.clone(),
        message: "path has no file name".to_string(),
    })?;

    let bytes = tokio::fs::read(&file.path)
        .await
        .map_err(|err| RunnerError::Io {
            path: file.path.clone(),
            message: err.to_string(),
        })?;

    let content_type = mime_guess::from_path(&file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    let field_name = file
        .form_name
        .clone()
        .unwrap_or_else(|| DEFAULT_FILE_FIELD.to_string());

    Ok(MultipartForm {
        fields: vec![("name".to_string(), file_name.clone())],
        file: Some(FilePart {
            field_name,
            file_name,
            content_type,
            bytes,
        }),
    })
}

/// Returns the base name of a path as a UTF-8 string.
fn base_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}
