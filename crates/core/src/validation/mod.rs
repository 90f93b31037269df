//! Schema validation.
//!
//! A [`Schema`] is a `Deserialize + validator::Validate` input type. Field-level
//! constraints come from the `validator` derive; cross-field rules are added in
//! [`Schema::refine`], which always runs after the field checks. Failures are
//! collected as [`Violations`] (code + parameters keyed by field path) and only
//! rendered to text at the end, with an explicit [`Locale`].
//!
//! Expected bad input never panics: it yields [`CoreError::Validation`].

pub mod agenda;
pub mod directory;
pub mod event;
pub mod messages;
pub mod rules;

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

pub use messages::Locale;

/// Field path → human-readable message, ready for UI binding.
pub type FieldErrors = BTreeMap<String, String>;

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub code: String,
    pub params: BTreeMap<String, Value>,
}

/// Failed constraints keyed by field path (`title`, `occurrences[2].end_at_utc`).
#[derive(Debug, Default)]
pub struct Violations {
    entries: BTreeMap<String, Vec<Violation>>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation without parameters.
    pub fn add(&mut self, field: impl Into<String>, code: &str) {
        self.add_with(field, code, []);
    }

    /// Record a violation with message parameters (`min`, `max`, ...).
    pub fn add_with<const N: usize>(
        &mut self,
        field: impl Into<String>,
        code: &str,
        params: [(&str, Value); N],
    ) {
        let violation = Violation {
            code: code.to_string(),
            params: params
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        };
        self.entries.entry(field.into()).or_default().push(violation);
    }

    /// Import the field errors produced by a `validator` derive.
    pub fn extend_from_validator(&mut self, errors: &ValidationErrors) {
        for (field, field_errors) in errors.field_errors() {
            let field: &str = &field;
            for error in field_errors.iter() {
                let params = error
                    .params
                    .iter()
                    .filter_map(|(name, value)| {
                        let name: &str = name;
                        (name != "value").then(|| (name.to_string(), value.clone()))
                    })
                    .collect();
                self.entries
                    .entry(field.to_string())
                    .or_default()
                    .push(Violation {
                        code: error.code.to_string(),
                        params,
                    });
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any violation was recorded for `field`.
    pub fn has(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    /// Codes recorded for `field`, in the order they were added.
    pub fn codes(&self, field: &str) -> Vec<&str> {
        self.entries
            .get(field)
            .map(|list| list.iter().map(|v| v.code.as_str()).collect())
            .unwrap_or_default()
    }

    /// Render the first violation of every field in `locale`.
    pub fn render(&self, locale: Locale) -> FieldErrors {
        self.entries
            .iter()
            .filter_map(|(field, list)| {
                list.first()
                    .map(|violation| (field.clone(), messages::render(locale, violation)))
            })
            .collect()
    }
}

/// An input type that can be validated and turned into a typed value.
pub trait Schema: DeserializeOwned + Validate {
    /// The typed, defaulted value produced on success.
    type Output;

    /// Fields that always hold a value once stored. A patch may change them
    /// but an explicit `null` is rejected instead of falling back to the
    /// default.
    const NOT_NULL: &'static [&'static str] = &[];

    /// Cross-field rules, evaluated after the field-level checks.
    fn refine(&self, violations: &mut Violations);

    /// Convert a value that passed [`check`] into its typed form.
    fn into_output(self) -> Self::Output;
}

/// Run field-level checks, then cross-field rules.
pub fn check<S: Schema>(input: &S) -> Violations {
    let mut violations = Violations::new();
    if let Err(errors) = input.validate() {
        violations.extend_from_validator(&errors);
    }
    input.refine(&mut violations);
    violations
}

/// Reject explicit `null` in `patch` for every [`Schema::NOT_NULL`] field.
pub fn check_patch_nulls<S: Schema>(patch: &Value) -> Violations {
    let mut violations = Violations::new();
    for field in S::NOT_NULL {
        if patch.get(field).is_some_and(Value::is_null) {
            violations.add(*field, "required");
        }
    }
    violations
}

/// Deserialize, validate and convert a JSON document.
pub fn validate_value<S: Schema>(value: Value, locale: Locale) -> Result<S::Output, CoreError> {
    let input: S = serde_json::from_value(value).map_err(|err| {
        CoreError::field("body", messages::invalid_body(locale, &err.to_string()))
    })?;

    let violations = check(&input);
    if violations.is_empty() {
        Ok(input.into_output())
    } else {
        Err(CoreError::Validation(violations.render(locale)))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn first_violation_per_field_wins() {
        let mut violations = Violations::new();
        violations.add("title", "required");
        violations.add("title", "required_for_publish");
        let rendered = violations.render(Locale::PtBr);
        assert_eq!(rendered["title"], "Campo obrigatório");
    }

    #[test]
    fn params_are_interpolated() {
        let mut violations = Violations::new();
        violations.add_with("tags", "max_items", [("max", json!(20))]);
        assert_eq!(violations.render(Locale::PtBr)["tags"], "Máximo de 20 itens");
        assert_eq!(violations.render(Locale::En)["tags"], "At most 20 items");
    }

    #[test]
    fn null_is_rejected_for_not_null_fields() {
        let patch = json!({ "status": null, "subtitle": null, "priority": 10 });
        let violations = check_patch_nulls::<agenda::AgendaItemInput>(&patch);
        assert_eq!(violations.codes("status"), vec!["required"]);
        assert!(!violations.has("subtitle"));
        assert!(!violations.has("priority"));
    }

    #[test]
    fn malformed_body_is_reported_not_panicked() {
        let result = validate_value::<agenda::AgendaItemInput>(json!({ "title": 42 }), Locale::En);
        match result {
            Err(CoreError::Validation(fields)) => assert!(fields.contains_key("body")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
