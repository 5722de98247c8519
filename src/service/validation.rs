//! Request validation from per-field rules.

use crate::error::AppError;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::OnceLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldFormat {
    Email,
}

/// One required text field of a request body.
#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub max_length: Option<usize>,
    pub format: Option<FieldFormat>,
}

impl FieldRule {
    pub const fn text(name: &'static str) -> Self {
        FieldRule {
            name,
            max_length: None,
            format: None,
        }
    }

    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub const fn format(mut self, format: FieldFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// A request body with a fixed required-field shape.
pub trait Payload: DeserializeOwned + Send {
    const RULES: &'static [FieldRule];

    /// Canonical form stored by the backends (trimmed, lower-cased e-mail, ...).
    fn normalize(self) -> Self {
        self
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate body against rules. All fields are required, must be strings and non-blank.
    pub fn validate(body: &Map<String, Value>, rules: &[FieldRule]) -> Result<(), AppError> {
        for rule in rules {
            let s = match body.get(rule.name) {
                None | Some(Value::Null) => {
                    return Err(AppError::Validation(format!("{} is required", rule.name)));
                }
                Some(Value::String(s)) => s.trim(),
                Some(_) => {
                    return Err(AppError::Validation(format!("{} must be a string", rule.name)));
                }
            };
            if s.is_empty() {
                return Err(AppError::Validation(format!("{} is required", rule.name)));
            }
            // E-mails are checked in the form they are stored in.
            let normalized;
            let s = match rule.format {
                Some(FieldFormat::Email) => {
                    normalized = normalize_email(s);
                    normalized.as_str()
                }
                None => s,
            };
            if let Some(max) = rule.max_length {
                if s.chars().count() > max {
                    return Err(AppError::Validation(format!(
                        "{} must be at most {} characters",
                        rule.name, max
                    )));
                }
            }
            if let Some(format) = rule.format {
                validate_format(rule.name, s, format)?;
            }
        }
        Ok(())
    }

    /// Validate a raw JSON body and decode it into its payload type.
    pub fn parse<T: Payload>(body: Value) -> Result<T, AppError> {
        let map = match body {
            Value::Object(m) => m,
            _ => return Err(AppError::Validation("body must be a JSON object".into())),
        };
        Self::validate(&map, T::RULES)?;
        let payload: T = serde_json::from_value(Value::Object(map))
            .map_err(|e| AppError::Validation(format!("invalid body: {}", e)))?;
        Ok(payload.normalize())
    }
}

/// Trimmed and lower-cased; lower-casing may lengthen some non-ASCII addresses.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"))
}

fn validate_format(col: &str, s: &str, format: FieldFormat) -> Result<(), AppError> {
    match format {
        FieldFormat::Email => {
            if !email_re().is_match(s) {
                return Err(AppError::Validation(format!("{} must be a valid email", col)));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewBlogSubscriber, NewContact};
    use serde_json::json;

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(m) => m,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_complete_contact() {
        let c: NewContact = RequestValidator::parse(json!({
            "name": "  Ada ",
            "email": "Ada@Example.com",
            "subject": "Hi",
            "message": "Hello there"
        }))
        .unwrap();
        assert_eq!(c.name, "Ada");
        assert_eq!(c.email, "ada@example.com");
    }

    #[test]
    fn missing_field_is_named() {
        let err = RequestValidator::parse::<NewContact>(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "message": "Hello"
        }))
        .unwrap_err();
        assert_eq!(message(err), "subject is required");
    }

    #[test]
    fn blank_field_counts_as_missing() {
        let err = RequestValidator::parse::<NewBlogSubscriber>(json!({ "email": "   " })).unwrap_err();
        assert_eq!(message(err), "email is required");
    }

    #[test]
    fn rejects_non_string() {
        let err = RequestValidator::parse::<NewBlogSubscriber>(json!({ "email": 42 })).unwrap_err();
        assert_eq!(message(err), "email must be a string");
    }

    #[test]
    fn rejects_bad_email() {
        let err = RequestValidator::parse::<NewBlogSubscriber>(json!({ "email": "not-an-email" })).unwrap_err();
        assert_eq!(message(err), "email must be a valid email");
    }

    #[test]
    fn rejects_overlong_name() {
        let err = RequestValidator::parse::<NewContact>(json!({
            "name": "x".repeat(101),
            "email": "a@b.io",
            "subject": "s",
            "message": "m"
        }))
        .unwrap_err();
        assert_eq!(message(err), "name must be at most 100 characters");
    }

    #[test]
    fn email_length_is_checked_after_lowercasing() {
        // U+0130 lower-cases to two chars, so 255 chars become 498.
        let email = format!("{}@example.com", "\u{130}".repeat(243));
        assert_eq!(email.chars().count(), 255);
        let err = RequestValidator::parse::<NewBlogSubscriber>(json!({ "email": email })).unwrap_err();
        assert_eq!(message(err), "email must be at most 255 characters");
    }

    #[test]
    fn rejects_non_object_body() {
        let err = RequestValidator::parse::<NewBlogSubscriber>(json!(["a@b.io"])).unwrap_err();
        assert_eq!(message(err), "body must be a JSON object");
    }
}
