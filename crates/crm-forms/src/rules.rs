//! Validation rules attached to fields.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use regex::Regex;

use crate::error::{FormError, Result};
use crate::schema::FieldKey;
use crate::validation::Validator;
use crate::value::{FieldValue, Values};

/// A single constraint on a field.
///
/// Rules of a field are always evaluated in variant order, whatever
/// order they were declared in.
#[derive(Clone)]
pub enum Rule<K = String> {
    /// The field must have a non-empty value.
    Required {
        /// Message replacing `"<name> is required"`.
        message: Option<String>,
    },
    /// Character count bounds, applied to text values.
    Length {
        /// Minimum number of characters.
        min: Option<usize>,
        /// Maximum number of characters.
        max: Option<usize>,
        /// Message replacing the templated one.
        message: Option<String>,
    },
    /// Numeric bounds, applied to numeric values.
    Range {
        /// Smallest accepted value.
        min: Option<f64>,
        /// Largest accepted value.
        max: Option<f64>,
        /// Message replacing the templated one.
        message: Option<String>,
    },
    /// Regular expression the text must match.
    Pattern {
        /// Compiled expression.
        regex: Regex,
        /// Message replacing `"<name> has an invalid format"`.
        message: Option<String>,
    },
    /// Caller-supplied check, run last.
    Custom(Arc<dyn Validator<K>>),
}

impl<K: FieldKey> Rule<K> {
    const fn precedence(&self) -> u8 {
        match self {
            Self::Required { .. } => 0,
            Self::Length { .. } => 1,
            Self::Range { .. } => 2,
            Self::Pattern { .. } => 3,
            Self::Custom(_) => 4,
        }
    }

    /// Checks a value against this rule.
    ///
    /// Length and pattern only look at text, range only at numbers;
    /// other value kinds pass those rules.
    pub fn check(
        &self,
        name: &K,
        value: Option<&FieldValue>,
        values: &Values<K>,
    ) -> std::result::Result<(), String> {
        match self {
            Self::Required { message } => {
                if crate::value::is_missing(value) {
                    return Err(message
                        .clone()
                        .unwrap_or_else(|| format!("{name} is required")));
                }
            }
            Self::Length { min, max, message } => {
                if let Some(FieldValue::Text(text)) = value {
                    let count = text.chars().count();
                    if let Some(min) = *min {
                        if count < min {
                            return Err(message.clone().unwrap_or_else(|| {
                                format!("{name} must be at least {min} characters")
                            }));
                        }
                    }
                    if let Some(max) = *max {
                        if count > max {
                            return Err(message.clone().unwrap_or_else(|| {
                                format!("{name} must be at most {max} characters")
                            }));
                        }
                    }
                }
            }
            Self::Range { min, max, message } => {
                if let Some(FieldValue::Number(n)) = value {
                    if let Some(min) = *min {
                        if *n < min {
                            return Err(message
                                .clone()
                                .unwrap_or_else(|| format!("{name} must be at least {min}")));
                        }
                    }
                    if let Some(max) = *max {
                        if *n > max {
                            return Err(message
                                .clone()
                                .unwrap_or_else(|| format!("{name} must be at most {max}")));
                        }
                    }
                }
            }
            Self::Pattern { regex, message } => {
                if let Some(FieldValue::Text(text)) = value {
                    if !regex.is_match(text) {
                        return Err(message
                            .clone()
                            .unwrap_or_else(|| format!("{name} has an invalid format")));
                    }
                }
            }
            Self::Custom(validator) => return validator.validate(value, values),
        }
        Ok(())
    }
}

impl<K> fmt::Display for Rule<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn bounds<T: fmt::Display>(min: Option<&T>, max: Option<&T>) -> String {
            match (min, max) {
                (Some(min), Some(max)) => format!("{min}..={max}"),
                (Some(min), None) => format!(">= {min}"),
                (None, Some(max)) => format!("<= {max}"),
                (None, None) => "any".to_string(),
            }
        }

        match self {
            Self::Required { .. } => f.write_str("required"),
            Self::Length { min, max, .. } => {
                write!(f, "length {}", bounds(min.as_ref(), max.as_ref()))
            }
            Self::Range { min, max, .. } => {
                write!(f, "range {}", bounds(min.as_ref(), max.as_ref()))
            }
            Self::Pattern { regex, .. } => write!(f, "pattern {}", regex.as_str()),
            Self::Custom(_) => f.write_str("custom"),
        }
    }
}

impl<K> fmt::Debug for Rule<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { message } => f
                .debug_struct("Required")
                .field("message", message)
                .finish(),
            Self::Length { min, max, message } => f
                .debug_struct("Length")
                .field("min", min)
                .field("max", max)
                .field("message", message)
                .finish(),
            Self::Range { min, max, message } => f
                .debug_struct("Range")
                .field("min", min)
                .field("max", max)
                .field("message", message)
                .finish(),
            Self::Pattern { regex, message } => f
                .debug_struct("Pattern")
                .field("regex", &regex.as_str())
                .field("message", message)
                .finish(),
            Self::Custom(_) => f.debug_tuple("Custom").finish_non_exhaustive(),
        }
    }
}

/// The rules declared for one field.
///
/// Built with chained calls; constraints of the same kind merge into
/// one rule.
///
/// ```rust
/// use crm_forms::FieldRules;
///
/// let rules: FieldRules = FieldRules::new()
///     .required()
///     .min_length(3)
///     .max_length(255);
/// assert_eq!(rules.iter().count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct FieldRules<K = String> {
    rules: Vec<Rule<K>>,
}

impl<K> Default for FieldRules<K> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<K: FieldKey> FieldRules<K> {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the field required.
    #[must_use]
    pub fn required(self) -> Self {
        self.with_required(None)
    }

    /// Makes the field required with a custom message.
    #[must_use]
    pub fn required_with(self, message: impl Into<String>) -> Self {
        self.with_required(Some(message.into()))
    }

    /// Sets the minimum number of characters.
    #[must_use]
    pub fn min_length(self, min: usize) -> Self {
        self.with_length(|lo, _, _| *lo = Some(min))
    }

    /// Sets the maximum number of characters.
    #[must_use]
    pub fn max_length(self, max: usize) -> Self {
        self.with_length(|_, hi, _| *hi = Some(max))
    }

    /// Overrides the message of the length rule.
    #[must_use]
    pub fn length_message(self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.with_length(|_, _, m| *m = Some(message))
    }

    /// Sets the smallest accepted number.
    #[must_use]
    pub fn min(self, min: f64) -> Self {
        self.with_range(|lo, _, _| *lo = Some(min))
    }

    /// Sets the largest accepted number.
    #[must_use]
    pub fn max(self, max: f64) -> Self {
        self.with_range(|_, hi, _| *hi = Some(max))
    }

    /// Overrides the message of the range rule.
    #[must_use]
    pub fn range_message(self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.with_range(|_, _, m| *m = Some(message))
    }

    /// Requires text to match a regular expression.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidPattern`] if the expression does not
    /// compile.
    pub fn pattern(self, pattern: &str) -> Result<Self> {
        self.with_pattern(pattern, None)
    }

    /// Requires text to match a regular expression, with a custom message.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidPattern`] if the expression does not
    /// compile.
    pub fn pattern_with(self, pattern: &str, message: impl Into<String>) -> Result<Self> {
        self.with_pattern(pattern, Some(message.into()))
    }

    /// Adds a custom validator.
    #[must_use]
    pub fn validate(mut self, validator: impl Validator<K> + 'static) -> Self {
        self.insert(Rule::Custom(Arc::new(validator)));
        self
    }

    /// Adds a custom validator from a closure.
    #[must_use]
    pub fn validate_fn<F>(self, f: F) -> Self
    where
        F: Fn(Option<&FieldValue>, &Values<K>) -> std::result::Result<(), String>
            + Send
            + Sync
            + 'static,
    {
        self.validate(f)
    }

    /// Returns whether the field is required.
    pub fn is_required(&self) -> bool {
        self.rules
            .iter()
            .any(|r| matches!(r, Rule::Required { .. }))
    }

    /// Iterates over the rules in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule<K>> {
        self.rules.iter()
    }

    fn insert(&mut self, rule: Rule<K>) {
        self.rules.push(rule);
        self.rules.sort_by_key(Rule::precedence);
    }

    fn position(&self, precedence: u8) -> Option<usize> {
        self.rules.iter().position(|r| r.precedence() == precedence)
    }

    fn with_required(mut self, message: Option<String>) -> Self {
        match self.position(0) {
            Some(i) => self.rules[i] = Rule::Required { message },
            None => self.insert(Rule::Required { message }),
        }
        self
    }

    fn with_length(
        mut self,
        f: impl FnOnce(&mut Option<usize>, &mut Option<usize>, &mut Option<String>),
    ) -> Self {
        match self.position(1) {
            Some(i) => {
                if let Rule::Length { min, max, message } = &mut self.rules[i] {
                    f(min, max, message);
                }
            }
            None => {
                let (mut min, mut max, mut message) = (None, None, None);
                f(&mut min, &mut max, &mut message);
                self.insert(Rule::Length { min, max, message });
            }
        }
        self
    }

    fn with_range(
        mut self,
        f: impl FnOnce(&mut Option<f64>, &mut Option<f64>, &mut Option<String>),
    ) -> Self {
        match self.position(2) {
            Some(i) => {
                if let Rule::Range { min, max, message } = &mut self.rules[i] {
                    f(min, max, message);
                }
            }
            None => {
                let (mut min, mut max, mut message) = (None, None, None);
                f(&mut min, &mut max, &mut message);
                self.insert(Rule::Range { min, max, message });
            }
        }
        self
    }

    fn with_pattern(mut self, pattern: &str, message: Option<String>) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| FormError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let rule = Rule::Pattern { regex, message };
        match self.position(3) {
            Some(i) => self.rules[i] = rule,
            None => self.insert(rule),
        }
        Ok(self)
    }
}

/// Rules for every validated field of a form.
///
/// Fields without an entry are never validated.
#[derive(Debug, Clone)]
pub struct ValidationRules<K = String> {
    fields: HashMap<K, FieldRules<K>>,
}

impl<K> Default for ValidationRules<K> {
    fn default() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }
}

impl<K: FieldKey> ValidationRules<K> {
    /// Creates an empty rule map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the rules of a field, replacing earlier ones.
    #[must_use]
    pub fn field(mut self, name: impl Into<K>, rules: FieldRules<K>) -> Self {
        self.fields.insert(name.into(), rules);
        self
    }

    /// Returns the rules of a field.
    pub fn get<Q>(&self, name: &Q) -> Option<&FieldRules<K>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.fields.get(name)
    }

    /// Returns whether a field has rules.
    pub fn contains<Q>(&self, name: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.fields.contains_key(name)
    }

    /// Iterates over the ruled field names.
    pub fn field_names(&self) -> impl Iterator<Item = &K> {
        self.fields.keys()
    }

    /// Iterates over `(name, rules)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &FieldRules<K>)> {
        self.fields.iter()
    }

    /// Returns the number of ruled fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether no field has rules.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(rules: &FieldRules) -> Vec<String> {
        rules.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_rules_sorted_by_precedence() {
        let rules: FieldRules = FieldRules::new()
            .validate_fn(|_, _| Ok(()))
            .max(10.0)
            .pattern(r"^\d+$")
            .unwrap()
            .max_length(4)
            .required();

        assert_eq!(
            kinds(&rules),
            vec!["required", "length <= 4", "range <= 10", r"pattern ^\d+$", "custom"]
        );
    }

    #[test]
    fn test_same_kind_merges() {
        let rules: FieldRules = FieldRules::new()
            .min_length(3)
            .max_length(255)
            .min(0.0)
            .max(9.0)
            .required()
            .required_with("Please enter a name");

        assert_eq!(kinds(&rules), vec!["required", "length 3..=255", "range 0..=9"]);
        assert!(rules.is_required());
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = FieldRules::<String>::new().pattern("([a-z").unwrap_err();
        assert!(matches!(err, FormError::InvalidPattern { pattern, .. } if pattern == "([a-z"));
    }

    #[test]
    fn test_check_ignores_other_value_kinds() {
        let values: Values = Values::new();
        let name = "code".to_string();
        let length = Rule::Length {
            min: Some(3),
            max: None,
            message: None,
        };
        let range = Rule::Range {
            min: Some(0.0),
            max: None,
            message: None,
        };

        assert!(length.check(&name, Some(&FieldValue::from(1)), &values).is_ok());
        assert!(range.check(&name, Some(&FieldValue::from("-5")), &values).is_ok());
        assert_eq!(
            length.check(&name, Some(&FieldValue::from("ab")), &values),
            Err("code must be at least 3 characters".to_string())
        );
    }

    #[test]
    fn test_length_counts_characters() {
        let values: Values = Values::new();
        let rule = Rule::Length {
            min: None,
            max: Some(4),
            message: None,
        };
        let name = "city".to_string();
        assert!(rule.check(&name, Some(&FieldValue::from("مكة")), &values).is_ok());
    }

    #[test]
    fn test_pattern_default_and_custom_messages() {
        let values: Values = Values::new();
        let name = "passport_no".to_string();
        let plain: FieldRules = FieldRules::new().pattern(r"^[A-Z]\d{7}$").unwrap();
        let custom: FieldRules = FieldRules::new()
            .pattern_with(r"^[A-Z]\d{7}$", "Enter a valid passport number.")
            .unwrap();
        let value = FieldValue::from("12345");

        let first_error = |rules: &FieldRules| {
            rules
                .iter()
                .find_map(|rule| rule.check(&name, Some(&value), &values).err())
        };
        assert_eq!(
            first_error(&plain).as_deref(),
            Some("passport_no has an invalid format")
        );
        assert_eq!(
            first_error(&custom).as_deref(),
            Some("Enter a valid passport number.")
        );
        assert!(plain
            .iter()
            .all(|rule| rule.check(&name, Some(&FieldValue::from("K1234567")), &values).is_ok()));
    }

    #[test]
    fn test_length_message_applies_to_both_bounds() {
        let values: Values = Values::new();
        let name = "notes".to_string();
        let rules: FieldRules = FieldRules::new()
            .min_length(2)
            .max_length(5)
            .length_message("Notes must be 2 to 5 characters");
        let rule = rules.iter().next().unwrap();

        for text in ["a", "abcdef"] {
            assert_eq!(
                rule.check(&name, Some(&FieldValue::from(text)), &values),
                Err("Notes must be 2 to 5 characters".to_string())
            );
        }
        assert!(rule.check(&name, Some(&FieldValue::from("abc")), &values).is_ok());
    }

    #[test]
    fn test_validation_rules_lookup() {
        let rules: ValidationRules = ValidationRules::new()
            .field("email", FieldRules::new().required())
            .field("notes", FieldRules::new().max_length(2000));

        assert!(rules.contains("email"));
        assert!(!rules.contains("phone"));
        assert_eq!(rules.len(), 2);
        assert!(rules.get("email").is_some_and(FieldRules::is_required));
        assert!(rules.get("notes").is_some_and(|r| !r.is_required()));
    }
}
