//! Template resolution for route URLs and header values.
//!
//! This module provides the run context (variables extracted from earlier
//! responses) and the substitution logic that replaces `${variable}`
//! placeholders with context values before a request is built.
//!
//! Substitution is total: it never fails. A placeholder whose identifier
//! is absent from the context resolves to the empty string, i.e. the
//! placeholder is removed from the output. This pass-through behavior is
//! intentional and logged at warn level so silent drops stay visible.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

/// Cached regex pattern for matching ${identifier} placeholders.
///
/// Identifiers are one or more of `[a-zA-Z0-9._-]`, which covers plain
/// names as well as body-path style names like `user.id`.
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([a-zA-Z0-9._-]+)\}").expect("Failed to compile placeholder regex")
});

/// Renders a JSON value for insertion into a template.
///
/// Strings render bare (no surrounding quotes); every other value renders
/// as its compact JSON text, so `5` becomes `"5"` and `true` becomes
/// `"true"`.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Run-scoped mapping from variable name to extracted value.
///
/// Created empty at run start, grown only by variable extraction between
/// steps, and never cleared. The sequencer is the sole writer, so no
/// locking is needed.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: HashMap<String, Value>,
}

impl Context {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under the given name, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Looks up a value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Checks whether a name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of stored variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Checks whether the context holds no variables.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Substitutes all `${variable}` placeholders in the input text.
///
/// Known identifiers are replaced with their rendered context value;
/// unknown identifiers resolve to nothing and the placeholder disappears
/// from the output. Text without placeholders is returned unchanged, so
/// resolution is idempotent on already-resolved strings.
///
/// # Examples
///
/// ```
/// use route_tester::template::{resolve_template, Context};
/// use serde_json::json;
///
/// let mut context = Context::new();
/// context.set("userId", json!(42));
///
/// assert_eq!(
///     resolve_template("users/${userId}/posts", &context),
///     "users/42/posts"
/// );
/// assert_eq!(resolve_template("users/${unknown}", &context), "users/");
/// ```
pub fn resolve_template(text: &str, context: &Context) -> String {
    // Fast path: no placeholder markers at all
    if !text.contains("${") {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut last_match_end = 0;

    for cap in PLACEHOLDER_REGEX.captures_iter(text) {
        let full_match = cap.get(0).expect("regex match has group 0");
        let name = cap.get(1).expect("regex match has group 1").as_str();

        result.push_str(&text[last_match_end..full_match.start()]);

        match context.get(name) {
            Some(value) => result.push_str(&render_value(value)),
            None => {
                log::warn!("placeholder ${{{}}} is not in the context, dropped", name);
            }
        }

        last_match_end = full_match.end();
    }

    result.push_str(&text[last_match_end..]);
    result
}

/// Resolves `${variable}` placeholders in every string-valued header.
///
/// Returns a new header map; the input is never mutated. Non-string values
/// are carried over untouched.
pub fn resolve_headers(
    headers: &IndexMap<String, Value>,
    context: &Context,
) -> IndexMap<String, Value> {
    headers
        .iter()
        .map(|(name, value)| {
            let resolved = match value {
                Value::String(s) => Value::String(resolve_template(s, context)),
                other => other.clone(),
            };
            (name.clone(), resolved)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_context() -> Context {
        let mut context = Context::new();
        context.set("token", json!("bearer-token-xyz"));
        context.set("userId", json!(42));
        context.set("active", json!(true));
        context.set("user.id", json!(7));
        context
    }

    #[test]
    fn test_simple_substitution() {
        let context = create_test_context();
        assert_eq!(
            resolve_template("users/${userId}", &context),
            "users/42"
        );
    }

    #[test]
    fn test_multiple_placeholders() {
        let context = create_test_context();
        assert_eq!(
            resolve_template("users/${userId}?token=${token}", &context),
            "users/42?token=bearer-token-xyz"
        );
    }

    #[test]
    fn test_string_values_render_without_quotes() {
        let context = create_test_context();
        assert_eq!(
            resolve_template("Bearer ${token}", &context),
            "Bearer bearer-token-xyz"
        );
    }

    #[test]
    fn test_non_string_values_render_as_json() {
        let context = create_test_context();
        assert_eq!(resolve_template("active=${active}", &context), "active=true");
    }

    #[test]
    fn test_body_path_style_identifier() {
        let context = create_test_context();
        assert_eq!(resolve_template("users/${user.id}", &context), "users/7");
    }

    #[test]
    fn test_unknown_placeholder_is_removed() {
        let context = create_test_context();
        assert_eq!(resolve_template("users/${missing}/x", &context), "users//x");
    }

    #[test]
    fn test_no_placeholders_is_identity() {
        let context = create_test_context();
        let text = "users/42/posts";
        assert_eq!(resolve_template(text, &context), text);
    }

    #[test]
    fn test_idempotent_on_resolved_text() {
        let context = create_test_context();
        let once = resolve_template("users/${userId}", &context);
        let twice = resolve_template(&once, &context);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_text() {
        let context = create_test_context();
        assert_eq!(resolve_template("", &context), "");
    }

    #[test]
    fn test_malformed_placeholder_left_alone() {
        let context = create_test_context();
        // No closing brace and disallowed characters never match
        assert_eq!(resolve_template("users/${userId", &context), "users/${userId");
        assert_eq!(
            resolve_template("users/${user id}", &context),
            "users/${user id}"
        );
    }

    #[test]
    fn test_resolve_headers_returns_new_map() {
        let context = create_test_context();
        let mut headers = IndexMap::new();
        headers.insert("authorization".to_string(), json!("Bearer ${token}"));
        headers.insert("x-retries".to_string(), json!(3));

        let resolved = resolve_headers(&headers, &context);

        assert_eq!(
            resolved.get("authorization"),
            Some(&json!("Bearer bearer-token-xyz"))
        );
        // Non-string values pass through untouched
        assert_eq!(resolved.get("x-retries"), Some(&json!(3)));
        // Input map is not mutated
        assert_eq!(headers.get("authorization"), Some(&json!("Bearer ${token}")));
    }

    #[test]
    fn test_context_set_get() {
        let mut context = Context::new();
        assert!(context.is_empty());

        context.set("name", json!("value"));
        assert_eq!(context.get("name"), Some(&json!("value")));
        assert!(context.contains("name"));
        assert_eq!(context.len(), 1);

        context.set("name", json!("updated"));
        assert_eq!(context.get("name"), Some(&json!("updated")));
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&json!("plain")), "plain");
        assert_eq!(render_value(&json!(5)), "5");
        assert_eq!(render_value(&json!(false)), "false");
        assert_eq!(render_value(&json!(null)), "null");
        assert_eq!(render_value(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
