//! Body-path resolution over JSON values.
//!
//! Body paths address nested fields in a response body using dot/bracket
//! notation: `user.id`, `items[0].name`, `data["total-count"]`. They are
//! used by property expectations and variable extraction rules.

use serde_json::Value;

/// One parsed path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Object key (also indexes arrays when it parses as a number).
    Key(String),
    /// Array index from bracket notation.
    Index(usize),
}

/// Parses a dot/bracket path into segments.
///
/// Returns `None` when the path is syntactically invalid (empty segments,
/// unterminated brackets, non-numeric unquoted bracket content).
fn parse_path(path: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut chars = path.chars().peekable();
    let mut current = String::new();
    let mut saw_segment = false;

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if current.is_empty() && !saw_segment {
                    return None;
                }
                if !current.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                    saw_segment = true;
                }
                // A dot must be followed by another segment
                if chars.peek().is_none() {
                    return None;
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                    saw_segment = true;
                }
                let mut inner = String::new();
                let mut closed = false;
                for inner_ch in chars.by_ref() {
                    if inner_ch == ']' {
                        closed = true;
                        break;
                    }
                    inner.push(inner_ch);
                }
                if !closed || inner.is_empty() {
                    return None;
                }
                // Quoted bracket content is an object key, bare content an index
                let quoted = (inner.starts_with('"') && inner.ends_with('"') && inner.len() >= 2)
                    || (inner.starts_with('\'') && inner.ends_with('\'') && inner.len() >= 2);
                if quoted {
                    segments.push(Segment::Key(inner[1..inner.len() - 1].to_string()));
                } else {
                    segments.push(Segment::Index(inner.parse().ok()?));
                }
                saw_segment = true;
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(Segment::Key(current));
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

/// Resolves a body path against a JSON value.
///
/// # Returns
///
/// `Some(&Value)` when every segment resolves, `None` when any segment is
/// missing or addresses a value of the wrong shape.
///
/// # Examples
///
/// ```
/// use route_tester::path::get;
/// use serde_json::json;
///
/// let body = json!({"user": {"id": 5}, "items": [{"name": "a"}]});
/// assert_eq!(get(&body, "user.id"), Some(&json!(5)));
/// assert_eq!(get(&body, "items[0].name"), Some(&json!("a")));
/// assert_eq!(get(&body, "user.email"), None);
/// ```
pub fn get<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = parse_path(path)?;
    let mut current = value;

    for segment in &segments {
        current = match segment {
            Segment::Key(key) => match current {
                Value::Object(map) => map.get(key)?,
                // Numeric keys reach into arrays too
                Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
                _ => return None,
            },
            Segment::Index(index) => match current {
                Value::Array(items) => items.get(*index)?,
                _ => return None,
            },
        };
    }

    Some(current)
}

/// Checks whether a body path resolves against a JSON value.
pub fn has(value: &Value, path: &str) -> bool {
    get(value, path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_body() -> Value {
        json!({
            "id": 5,
            "user": {
                "name": "John",
                "roles": ["admin", "editor"],
                "meta": {"created-at": "2020-01-01"}
            },
            "items": [
                {"sku": "a-1", "price": 9.5},
                {"sku": "b-2", "price": 12.0}
            ],
            "empty": null
        })
    }

    #[test]
    fn test_top_level_key() {
        let body = sample_body();
        assert_eq!(get(&body, "id"), Some(&json!(5)));
    }

    #[test]
    fn test_nested_dot_path() {
        let body = sample_body();
        assert_eq!(get(&body, "user.name"), Some(&json!("John")));
    }

    #[test]
    fn test_bracket_index() {
        let body = sample_body();
        assert_eq!(get(&body, "items[1].sku"), Some(&json!("b-2")));
        assert_eq!(get(&body, "user.roles[0]"), Some(&json!("admin")));
    }

    #[test]
    fn test_numeric_dot_segment_indexes_arrays() {
        let body = sample_body();
        assert_eq!(get(&body, "user.roles.1"), Some(&json!("editor")));
    }

    #[test]
    fn test_quoted_bracket_key() {
        let body = sample_body();
        assert_eq!(
            get(&body, r#"user.meta["created-at"]"#),
            Some(&json!("2020-01-01"))
        );
        assert_eq!(
            get(&body, "user.meta['created-at']"),
            Some(&json!("2020-01-01"))
        );
    }

    #[test]
    fn test_missing_path() {
        let body = sample_body();
        assert_eq!(get(&body, "user.email"), None);
        assert_eq!(get(&body, "items[9].sku"), None);
        assert_eq!(get(&body, "id.nested"), None);
    }

    #[test]
    fn test_null_value_is_present() {
        let body = sample_body();
        // A path resolving to null exists; it is not a missing path
        assert_eq!(get(&body, "empty"), Some(&json!(null)));
        assert!(has(&body, "empty"));
    }

    #[test]
    fn test_has() {
        let body = sample_body();
        assert!(has(&body, "user.roles[1]"));
        assert!(!has(&body, "user.roles[2]"));
    }

    #[test]
    fn test_invalid_paths() {
        let body = sample_body();
        assert_eq!(get(&body, ""), None);
        assert_eq!(get(&body, "user."), None);
        assert_eq!(get(&body, "items["), None);
        assert_eq!(get(&body, "items[]"), None);
        assert_eq!(get(&body, "items[x]"), None);
    }

    #[test]
    fn test_path_into_non_container() {
        let body = json!("just a string");
        assert_eq!(get(&body, "anything"), None);
    }
}
