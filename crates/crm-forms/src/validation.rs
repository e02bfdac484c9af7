//! Field validators and the per-field validation algorithm.

use std::sync::LazyLock;

use regex::Regex;

use crate::rules::{FieldRules, Rule};
use crate::schema::FieldKey;
use crate::value::{is_missing, FieldValue, Values};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Trait for custom field validators.
///
/// A validator sees the candidate value and every current value of the
/// form, so it can compare fields. It only runs after the built-in
/// rules of the field have passed, and never on an empty value.
pub trait Validator<K = String>: Send + Sync {
    /// Validates a value and returns an error message if invalid.
    fn validate(&self, value: Option<&FieldValue>, values: &Values<K>) -> Result<(), String>;
}

impl<K, F> Validator<K> for F
where
    F: Fn(Option<&FieldValue>, &Values<K>) -> Result<(), String> + Send + Sync,
{
    fn validate(&self, value: Option<&FieldValue>, values: &Values<K>) -> Result<(), String> {
        self(value, values)
    }
}

/// Validates a value against the rules of one field.
///
/// Checks run in a fixed order and stop at the first failure: required,
/// then (if the value is empty and not required) nothing else, then
/// length, range, pattern, and finally custom validators.
pub fn validate_field<K: FieldKey>(
    name: &K,
    value: Option<&FieldValue>,
    rules: &FieldRules<K>,
    values: &Values<K>,
) -> Option<String> {
    let empty = is_missing(value);
    for rule in rules.iter() {
        if empty && !matches!(rule, Rule::Required { .. }) {
            return None;
        }
        if let Err(message) = rule.check(name, value, values) {
            return Some(message);
        }
    }
    None
}

/// Validator for email addresses.
#[derive(Debug, Clone)]
pub struct EmailValidator {
    message: String,
}

impl EmailValidator {
    /// Creates a new EmailValidator with default message.
    pub fn new() -> Self {
        Self {
            message: "Enter a valid email address.".to_string(),
        }
    }

    /// Creates a new EmailValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for EmailValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: FieldKey> Validator<K> for EmailValidator {
    fn validate(&self, value: Option<&FieldValue>, _values: &Values<K>) -> Result<(), String> {
        if value
            .and_then(FieldValue::as_str)
            .is_some_and(|s| EMAIL_REGEX.is_match(s))
        {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }
}

/// Validator for URL values.
#[derive(Debug, Clone)]
pub struct UrlValidator {
    message: String,
}

impl UrlValidator {
    /// Creates a new UrlValidator with default message.
    pub fn new() -> Self {
        Self {
            message: "Enter a valid URL.".to_string(),
        }
    }

    /// Creates a new UrlValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: FieldKey> Validator<K> for UrlValidator {
    fn validate(&self, value: Option<&FieldValue>, _values: &Values<K>) -> Result<(), String> {
        match value.and_then(FieldValue::as_str) {
            Some(s) if s.starts_with("http://") || s.starts_with("https://") => Ok(()),
            _ => Err(self.message.clone()),
        }
    }
}

/// Validator restricting text to a fixed set of choices.
#[derive(Debug, Clone)]
pub struct ChoiceValidator {
    choices: Vec<String>,
    message: String,
}

impl ChoiceValidator {
    /// Creates a new ChoiceValidator.
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let choices: Vec<String> = choices.into_iter().map(Into::into).collect();
        let message = format!("Select one of: {}.", choices.join(", "));
        Self { choices, message }
    }

    /// Overrides the error message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl<K: FieldKey> Validator<K> for ChoiceValidator {
    fn validate(&self, value: Option<&FieldValue>, _values: &Values<K>) -> Result<(), String> {
        match value.and_then(FieldValue::as_str) {
            Some(s) if self.choices.iter().any(|c| c == s) => Ok(()),
            _ => Err(self.message.clone()),
        }
    }
}

/// Validator requiring a date not earlier than another field's date.
///
/// Passes when either date is missing or unreadable; the other field's
/// own rules report that case.
#[derive(Debug, Clone)]
pub struct NotBeforeField<K> {
    other: K,
    message: String,
}

impl<K: FieldKey> NotBeforeField<K> {
    /// Creates a new NotBeforeField comparing against `other`.
    pub fn new(other: impl Into<K>, message: impl Into<String>) -> Self {
        Self {
            other: other.into(),
            message: message.into(),
        }
    }
}

impl<K: FieldKey + Send + Sync> Validator<K> for NotBeforeField<K> {
    fn validate(&self, value: Option<&FieldValue>, values: &Values<K>) -> Result<(), String> {
        let this = value.and_then(FieldValue::as_date);
        let other = values.get(&self.other).and_then(FieldValue::as_date);
        match (this, other) {
            (Some(this), Some(other)) if this < other => Err(self.message.clone()),
            _ => Ok(()),
        }
    }
}
