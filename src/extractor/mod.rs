//! Variable extraction from response bodies.
//!
//! After a route's response passes validation, its declared variable rules
//! run in declaration order: each body path is resolved against the body
//! and, when present, stored into the run context for later steps to
//! reference through `${name}` placeholders.

use crate::models::VariableSpec;
use crate::path;
use crate::runner::error::RunnerError;
use crate::template::{render_value, Context};
use indexmap::IndexMap;
use serde_json::Value;

/// Applies a route's variable rules to a validated response body.
///
/// For each `(body_path, rule)` entry, in declaration order:
///
/// - When the path resolves: the value is registered into the context
///   under `rule.name` (or the path itself) unless `register` is false;
///   then, when `rule.value` is declared, the extracted value must equal
///   it exactly.
/// - When the path is absent: the step fails only if `rule.required` is
///   true; otherwise the rule is skipped with no context change.
///
/// The first failing rule aborts extraction.
pub fn extract_variables(
    variables: &IndexMap<String, VariableSpec>,
    body: &Value,
    context: &mut Context,
) -> Result<(), RunnerError> {
    for (body_path, rule) in variables {
        match path::get(body, body_path) {
            Some(value) => {
                if rule.register {
                    let name = rule.name.as_deref().unwrap_or(body_path);
                    log::info!(
                        "Assign new variable {} with value {} into the context",
                        name,
                        render_value(value)
                    );
                    context.set(name, value.clone());
                }
                if let Some(expected) = &rule.value {
                    if value != expected {
                        return Err(RunnerError::step(format!(
                            "Variable {} value should be {} but was detected as {}",
                            body_path,
                            render_value(expected),
                            render_value(value)
                        )));
                    }
                }
            }
            None => {
                if rule.required {
                    return Err(RunnerError::step(format!(
                        "Variable {} is missing from the response body, cannot be applied to the test context",
                        body_path
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules(entries: Vec<(&str, VariableSpec)>) -> IndexMap<String, VariableSpec> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_register_under_body_path_by_default() {
        let variables = rules(vec![("token", VariableSpec::default())]);
        let body = json!({"token": "abc-123"});
        let mut context = Context::new();

        extract_variables(&variables, &body, &mut context).unwrap();
        assert_eq!(context.get("token"), Some(&json!("abc-123")));
    }

    #[test]
    fn test_register_under_explicit_name() {
        let variables = rules(vec![(
            "user.id",
            VariableSpec {
                name: Some("userId".to_string()),
                ..VariableSpec::default()
            },
        )]);
        let body = json!({"user": {"id": 42}});
        let mut context = Context::new();

        extract_variables(&variables, &body, &mut context).unwrap();
        assert_eq!(context.get("userId"), Some(&json!(42)));
        assert!(!context.contains("user.id"));
    }

    #[test]
    fn test_register_false_leaves_context_unchanged() {
        let variables = rules(vec![(
            "token",
            VariableSpec {
                register: false,
                ..VariableSpec::default()
            },
        )]);
        let body = json!({"token": "abc"});
        let mut context = Context::new();

        extract_variables(&variables, &body, &mut context).unwrap();
        assert!(context.is_empty());
    }

    #[test]
    fn test_expected_value_match() {
        let variables = rules(vec![(
            "status",
            VariableSpec {
                value: Some(json!("active")),
                ..VariableSpec::default()
            },
        )]);
        let body = json!({"status": "active"});
        let mut context = Context::new();

        assert!(extract_variables(&variables, &body, &mut context).is_ok());
    }

    #[test]
    fn test_expected_value_mismatch() {
        let variables = rules(vec![(
            "status",
            VariableSpec {
                value: Some(json!("active")),
                ..VariableSpec::default()
            },
        )]);
        let body = json!({"status": "disabled"});
        let mut context = Context::new();

        let err = extract_variables(&variables, &body, &mut context).unwrap_err();
        let message = format!("{}", err);
        assert!(message.contains("active"));
        assert!(message.contains("disabled"));
    }

    #[test]
    fn test_value_mismatch_still_registers_first() {
        // Registration happens before the value assertion
        let variables = rules(vec![(
            "count",
            VariableSpec {
                value: Some(json!(1)),
                ..VariableSpec::default()
            },
        )]);
        let body = json!({"count": 2});
        let mut context = Context::new();

        assert!(extract_variables(&variables, &body, &mut context).is_err());
        assert_eq!(context.get("count"), Some(&json!(2)));
    }

    #[test]
    fn test_missing_required_path_fails() {
        let variables = rules(vec![(
            "token",
            VariableSpec {
                required: true,
                ..VariableSpec::default()
            },
        )]);
        let body = json!({"id": 1});
        let mut context = Context::new();

        let err = extract_variables(&variables, &body, &mut context).unwrap_err();
        assert!(format!("{}", err).contains("token"));
        assert!(context.is_empty());
    }

    #[test]
    fn test_missing_optional_path_is_skipped() {
        let variables = rules(vec![("token", VariableSpec::default())]);
        let body = json!({"id": 1});
        let mut context = Context::new();

        assert!(extract_variables(&variables, &body, &mut context).is_ok());
        assert!(context.is_empty());
    }

    #[test]
    fn test_rules_run_in_declaration_order() {
        let variables = rules(vec![
            ("first", VariableSpec::default()),
            (
                "second",
                VariableSpec {
                    required: true,
                    ..VariableSpec::default()
                },
            ),
        ]);
        let body = json!({"first": 1});
        let mut context = Context::new();

        // The first rule runs and registers before the second one fails
        assert!(extract_variables(&variables, &body, &mut context).is_err());
        assert_eq!(context.get("first"), Some(&json!(1)));
    }

    #[test]
    fn test_nested_and_indexed_paths() {
        let variables = rules(vec![
            ("data.items[0].id", VariableSpec::default()),
            (
                "data.owner.name",
                VariableSpec {
                    name: Some("owner".to_string()),
                    ..VariableSpec::default()
                },
            ),
        ]);
        let body = json!({"data": {"items": [{"id": 9}], "owner": {"name": "Ann"}}});
        let mut context = Context::new();

        extract_variables(&variables, &body, &mut context).unwrap();
        assert_eq!(context.get("data.items[0].id"), Some(&json!(9)));
        assert_eq!(context.get("owner"), Some(&json!("Ann")));
    }
}
