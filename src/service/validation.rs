//! Request validation from a rule table.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// One `@`, something non-blank on each side, no whitespace.
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("email pattern compiles"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Text,
    Integer,
    Email,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationRule {
    pub required: bool,
    pub format: Format,
    pub max_length: Option<usize>,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub field: &'static str,
    pub rule: ValidationRule,
}

/// Rules for the client-settable student fields, in reporting order.
pub const STUDENT_RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        rule: ValidationRule {
            required: true,
            format: Format::Text,
            max_length: Some(100),
            minimum: None,
            maximum: None,
        },
    },
    FieldRule {
        field: "email",
        rule: ValidationRule {
            required: true,
            format: Format::Email,
            max_length: Some(255),
            minimum: None,
            maximum: None,
        },
    },
    FieldRule {
        field: "age",
        rule: ValidationRule {
            required: true,
            format: Format::Integer,
            max_length: None,
            minimum: Some(18),
            maximum: Some(100),
        },
    },
];

/// Check `body` against `rules` and return every violation message.
pub fn validate(body: &Map<String, Value>, rules: &[FieldRule]) -> Vec<String> {
    let mut violations = Vec::new();
    for FieldRule { field, rule } in rules {
        validate_field(field, body.get(*field), rule, &mut violations);
    }
    violations
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn validate_field(field: &str, v: Option<&Value>, rule: &ValidationRule, out: &mut Vec<String>) {
    let v = match v {
        Some(v) if !is_blank(v) => v,
        _ => {
            if rule.required {
                out.push(format!("{} is required", field));
            }
            return;
        }
    };

    match rule.format {
        Format::Integer => {
            let Some(n) = v.as_i64() else {
                out.push(format!("{} must be an integer", field));
                return;
            };
            match (rule.minimum, rule.maximum) {
                (Some(min), Some(max)) if n < min || n > max => {
                    out.push(format!("{} must be between {} and {}", field, min, max));
                }
                (Some(min), None) if n < min => {
                    out.push(format!("{} must be at least {}", field, min));
                }
                (None, Some(max)) if n > max => {
                    out.push(format!("{} must be at most {}", field, max));
                }
                _ => {}
            }
        }
        Format::Text | Format::Email => {
            let Some(s) = v.as_str() else {
                out.push(format!("{} must be a string", field));
                return;
            };
            if rule.format == Format::Email && !EMAIL.is_match(s) {
                out.push(format!("{} must be a valid email address", field));
            }
            if let Some(max) = rule.max_length {
                if s.chars().count() > max {
                    out.push(format!("{} must be at most {} characters", field, max));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(body: Value) -> Vec<String> {
        let map = body.as_object().cloned().unwrap_or_default();
        validate(&map, STUDENT_RULES)
    }

    #[test]
    fn valid_payload_passes() {
        assert!(check(json!({ "name": "Ada", "email": "ada@example.com", "age": 18 })).is_empty());
        assert!(check(json!({ "name": "Ada", "email": "ada@example.com", "age": 100 })).is_empty());
    }

    #[test]
    fn empty_body_reports_every_required_field() {
        assert_eq!(
            check(json!({})),
            vec!["name is required", "email is required", "age is required"]
        );
    }

    #[test]
    fn whitespace_name_counts_as_missing() {
        assert_eq!(
            check(json!({ "name": "  ", "email": "a@b", "age": 30 })),
            vec!["name is required"]
        );
    }

    #[test]
    fn age_bounds_are_inclusive() {
        assert_eq!(
            check(json!({ "name": "A", "email": "a@b", "age": 17 })),
            vec!["age must be between 18 and 100"]
        );
        assert_eq!(
            check(json!({ "name": "A", "email": "a@b", "age": 101 })),
            vec!["age must be between 18 and 100"]
        );
    }

    #[test]
    fn wrong_types_are_reported_not_coerced() {
        assert_eq!(
            check(json!({ "name": 5, "email": "a@b", "age": "30" })),
            vec!["name must be a string", "age must be an integer"]
        );
        assert_eq!(
            check(json!({ "name": "A", "email": "a@b", "age": 30.5 })),
            vec!["age must be an integer"]
        );
    }

    #[test]
    fn email_syntax() {
        for bad in ["plain", "@x.io", "a@", "a@@b", "a b@c.d", "a@b@c"] {
            assert_eq!(
                check(json!({ "name": "A", "email": bad, "age": 30 })),
                vec!["email must be a valid email address"],
                "{bad}"
            );
        }
        assert!(check(json!({ "name": "A", "email": "first.last+tag@sub.example.org", "age": 30 })).is_empty());
    }

    #[test]
    fn lengths_count_characters() {
        let name = "é".repeat(100);
        assert!(check(json!({ "name": name, "email": "a@b", "age": 30 })).is_empty());
        let long = "n".repeat(101);
        assert_eq!(
            check(json!({ "name": long, "email": "a@b", "age": 30 })),
            vec!["name must be at most 100 characters"]
        );
        let email = format!("{}@x.io", "e".repeat(251));
        assert_eq!(
            check(json!({ "name": "A", "email": email, "age": 30 })),
            vec!["email must be at most 255 characters"]
        );
    }

    #[test]
    fn server_owned_fields_are_not_rules() {
        assert!(check(json!({
            "name": "A", "email": "a@b", "age": 30,
            "id": "x", "enrollmentCode": 7, "enrollmentDate": false
        }))
        .is_empty());
    }
}
