//! Form state: values, errors and touched fields of one form instance.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{FieldErrors, NON_FIELD_ERRORS};
use crate::rules::ValidationRules;
use crate::schema::FieldKey;
use crate::validation::validate_field;
use crate::value::{FieldValue, Values};

/// How [`FormState::is_valid`] is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidityMode {
    /// Valid when the error map is empty.
    ///
    /// A pristine form reports valid even if required fields are blank,
    /// because nothing has been validated yet.
    #[default]
    Snapshot,
    /// Valid when every ruled field passes against the current values.
    Strict,
}

/// Options for a form state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormOptions {
    /// How validity is computed.
    #[serde(default)]
    pub validity: ValidityMode,
}

impl FormOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the validity mode.
    #[must_use]
    pub const fn validity(mut self, validity: ValidityMode) -> Self {
        self.validity = validity;
        self
    }

    /// Shorthand for [`ValidityMode::Strict`].
    #[must_use]
    pub const fn strict(self) -> Self {
        self.validity(ValidityMode::Strict)
    }
}

/// Point-in-time view of a form, for re-rendering.
#[derive(Debug, Clone, Serialize)]
pub struct FormSnapshot<K = String> {
    /// Current values.
    pub values: Values<K>,
    /// Current errors.
    pub errors: FieldErrors<K>,
    /// Fields the user has interacted with.
    pub touched: HashSet<K>,
    /// Validity at the time of the snapshot.
    pub is_valid: bool,
}

/// State container for one form.
///
/// Every operation runs to completion synchronously. Values are merged
/// into one map, so several edits applied back to back never lose each
/// other.
///
/// ```rust
/// use crm_forms::{FieldRules, FormState, ValidationRules, Values};
///
/// let rules: ValidationRules = ValidationRules::new()
///     .field("package_name", FieldRules::new().required().min_length(3));
/// let mut form = FormState::new(Values::new(), rules);
///
/// form.set_field_value("package_name", "ab");
/// form.mark_touched("package_name");
/// assert_eq!(
///     form.error("package_name"),
///     Some("package_name must be at least 3 characters"),
/// );
///
/// form.set_field_value("package_name", "Gold Hajj");
/// assert!(form.validate_form());
/// ```
#[derive(Debug, Clone)]
pub struct FormState<K = String> {
    initial: Values<K>,
    values: Values<K>,
    errors: FieldErrors<K>,
    touched: HashSet<K>,
    rules: ValidationRules<K>,
    options: FormOptions,
}

impl<K: FieldKey> FormState<K> {
    /// Creates a form from its initial values and rules.
    pub fn new(initial: Values<K>, rules: ValidationRules<K>) -> Self {
        Self {
            values: initial.clone(),
            initial,
            errors: FieldErrors::new(),
            touched: HashSet::new(),
            rules,
            options: FormOptions::default(),
        }
    }

    /// Sets the options.
    #[must_use]
    pub fn with_options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets a field value after user input.
    ///
    /// The field becomes touched and its error is cleared without
    /// re-validating; it comes back on the next blur or full validation.
    pub fn set_field_value(&mut self, name: impl Into<K>, value: impl Into<FieldValue>) {
        let name = name.into();
        trace!(field = %name, "field value set");
        self.errors.remove(&name);
        self.values.set(name.clone(), value);
        self.touched.insert(name);
    }

    /// Merges values without touching errors or touched fields.
    ///
    /// Used for programmatic updates such as loading a stored record.
    pub fn set_values(&mut self, values: Values<K>) {
        trace!(count = values.len(), "values merged");
        self.values.merge(values);
    }

    /// Marks a field touched and validates it if it has rules.
    pub fn mark_touched(&mut self, name: impl Into<K>) {
        let name = name.into();
        if let Some(rules) = self.rules.get(&name) {
            match validate_field(&name, self.values.get(&name), rules, &self.values) {
                Some(message) => self.errors.insert(name.clone(), message),
                None => {
                    self.errors.remove(&name);
                }
            }
        }
        self.touched.insert(name);
    }

    /// Validates a candidate value for a field against the current values.
    ///
    /// Fields without rules are always valid. Does not change the state.
    pub fn validate_field(&self, name: &K, value: Option<&FieldValue>) -> Option<String> {
        self.rules
            .get(name)
            .and_then(|rules| validate_field(name, value, rules, &self.values))
    }

    /// Validates every ruled field and replaces the error map.
    ///
    /// Every ruled field becomes touched. Returns whether no field failed.
    pub fn validate_form(&mut self) -> bool {
        let errors: FieldErrors<K> = self
            .rules
            .iter()
            .filter_map(|(name, rules)| {
                validate_field(name, self.values.get(name), rules, &self.values)
                    .map(|message| (name.clone(), message))
            })
            .collect();

        self.touched.extend(self.rules.field_names().cloned());
        self.errors = errors;
        debug!(
            fields = self.rules.len(),
            invalid = self.errors.len(),
            "form validated"
        );
        self.errors.is_empty()
    }

    /// Restores the initial values and clears errors and touched fields.
    pub fn reset_form(&mut self) {
        self.reset_form_with(self.initial.clone());
    }

    /// Replaces the values and clears errors and touched fields.
    ///
    /// The initial values used by [`reset_form`](Self::reset_form) are
    /// left unchanged.
    pub fn reset_form_with(&mut self, values: Values<K>) {
        debug!(count = values.len(), "form reset");
        self.values = values;
        self.errors.clear();
        self.touched.clear();
    }

    /// Returns the current values.
    pub const fn values(&self) -> &Values<K> {
        &self.values
    }

    /// Returns the value of a field.
    pub fn value<Q>(&self, name: &Q) -> Option<&FieldValue>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.values.get(name)
    }

    /// Returns the initial values.
    pub const fn initial_values(&self) -> &Values<K> {
        &self.initial
    }

    /// Returns the current errors.
    pub const fn errors(&self) -> &FieldErrors<K> {
        &self.errors
    }

    /// Returns the error of a field.
    pub fn error<Q>(&self, name: &Q) -> Option<&str>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.errors.get(name)
    }

    /// Returns the error of a field only once the field is touched.
    pub fn visible_error<Q>(&self, name: &Q) -> Option<&str>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.touched.contains(name) {
            self.errors.get(name)
        } else {
            None
        }
    }

    /// Returns the touched fields.
    pub const fn touched(&self) -> &HashSet<K> {
        &self.touched
    }

    /// Returns whether a field is touched.
    pub fn is_touched<Q>(&self, name: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.touched.contains(name)
    }

    /// Returns the rules.
    pub const fn rules(&self) -> &ValidationRules<K> {
        &self.rules
    }

    /// Returns the options.
    pub const fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Returns whether the form is valid, per the configured mode.
    pub fn is_valid(&self) -> bool {
        match self.options.validity {
            ValidityMode::Snapshot => self.errors.is_empty(),
            ValidityMode::Strict => self.rules.iter().all(|(name, rules)| {
                validate_field(name, self.values.get(name), rules, &self.values).is_none()
            }),
        }
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> FormSnapshot<K> {
        FormSnapshot {
            values: self.values.clone(),
            errors: self.errors.clone(),
            touched: self.touched.clone(),
            is_valid: self.is_valid(),
        }
    }
}

impl<K: FieldKey + FromStr> FormState<K> {
    /// Shows errors reported by the server for a rejected submission.
    ///
    /// Messages for fields of this form replace the current ones and
    /// mark those fields touched, so they display like client errors.
    /// Messages under `__all__` or under names the form does not know
    /// are returned for display outside any field.
    pub fn apply_server_errors(&mut self, errors: FieldErrors<String>) -> FieldErrors<String> {
        let mut unplaced = FieldErrors::new();
        for (name, message) in errors {
            match name.parse::<K>() {
                Ok(field) if name != NON_FIELD_ERRORS => {
                    self.errors.insert(field.clone(), message);
                    self.touched.insert(field);
                }
                _ => unplaced.insert(name, message),
            }
        }
        debug!(
            invalid = self.errors.len(),
            unplaced = unplaced.len(),
            "server errors applied"
        );
        unplaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::FieldRules;

    fn form() -> FormState {
        let rules = ValidationRules::new()
            .field("package_name", FieldRules::new().required().min_length(3))
            .field("total_cost", FieldRules::new().required().min(0.0));
        FormState::new(Values::new().with("package_name", "Gold"), rules)
    }

    #[test]
    fn test_set_field_value_touches_and_clears_error() {
        let mut form = form();
        assert!(!form.validate_form());
        assert!(form.error("total_cost").is_some());

        form.set_field_value("total_cost", -5);
        assert_eq!(form.error("total_cost"), None);
        assert!(form.is_touched("total_cost"));

        form.mark_touched("total_cost");
        assert_eq!(form.error("total_cost"), Some("total_cost must be at least 0"));
    }

    #[test]
    fn test_set_values_leaves_errors_and_touched() {
        let mut form = form();
        form.mark_touched("total_cost");
        form.set_values(Values::new().with("total_cost", 10).with("notes", "x"));

        assert_eq!(form.error("total_cost"), Some("total_cost is required"));
        assert_eq!(form.touched().len(), 1);
        assert_eq!(form.value("notes"), Some(&FieldValue::from("x")));
        assert_eq!(form.value("package_name"), Some(&FieldValue::from("Gold")));
    }

    #[test]
    fn test_mark_touched_without_rules() {
        let mut form = form();
        form.mark_touched("notes");
        assert!(form.is_touched("notes"));
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_visible_error_requires_touch() {
        let mut form = form();
        form.reset_form_with(Values::new());
        form.mark_touched("package_name");
        assert_eq!(form.visible_error("package_name"), Some("package_name is required"));
        assert_eq!(form.visible_error("total_cost"), None);
    }

    #[test]
    fn test_snapshot_mode_pristine_form_is_valid() {
        let form = form();
        assert!(form.is_valid());
        assert!(form.snapshot().is_valid);
    }

    #[test]
    fn test_strict_mode_checks_every_ruled_field() {
        let mut form = form().with_options(FormOptions::new().strict());
        assert!(!form.is_valid());
        assert!(form.errors().is_empty());

        form.set_values(Values::new().with("total_cost", 0));
        assert!(form.is_valid());
    }

    #[test]
    fn test_reset_keeps_original_initial_values() {
        let mut form = form();
        form.reset_form_with(Values::new().with("package_name", "Silver"));
        form.reset_form();
        assert_eq!(form.values(), form.initial_values());
        assert_eq!(form.value("package_name"), Some(&FieldValue::from("Gold")));
    }

    #[test]
    fn test_apply_server_errors() {
        let mut form = form();
        let mut server: FieldErrors = FieldErrors::new();
        server.insert("package_name", "The package name has already been taken.");
        server.insert(NON_FIELD_ERRORS, "The given data was invalid.");

        let unplaced = form.apply_server_errors(server);

        assert_eq!(
            form.visible_error("package_name"),
            Some("The package name has already been taken.")
        );
        assert!(!form.is_valid());
        assert_eq!(unplaced.len(), 1);
        assert_eq!(unplaced.get(NON_FIELD_ERRORS), Some("The given data was invalid."));
        assert!(!form.is_touched(NON_FIELD_ERRORS));
    }
}
