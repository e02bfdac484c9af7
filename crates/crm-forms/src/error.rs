//! Error types for forms.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;
use thiserror::Error;

use crate::schema::FieldKey;

/// Key under which errors not tied to a single field are reported.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Form-specific errors.
///
/// Ordinary validation failures are not errors of this kind while a
/// form is being edited; they only show up in [`FieldErrors`].
#[derive(Debug, Error)]
pub enum FormError {
    /// A pattern rule does not compile.
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// The offending expression.
        pattern: String,
        /// Why it failed to compile.
        #[source]
        source: regex::Error,
    },

    /// Validation failed at submission time.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors<String>),

    /// The session has no tenant.
    #[error("no tenant in the current session")]
    MissingTenant,

    /// The session has no user.
    #[error("no user in the current session")]
    MissingUser,

    /// A field name is not part of the form.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A form name is not known.
    #[error("unknown form: {0}")]
    UnknownForm(String),

    /// Values could not be read.
    #[error("invalid values: {0}")]
    InvalidValues(String),

    /// The server answered with something that is not an error map.
    #[error("invalid server response: {0}")]
    InvalidServerResponse(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors by field, one message per field.
///
/// A field missing from the map is either valid or not yet validated.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct FieldErrors<K = String> {
    errors: HashMap<K, String>,
}

impl<K> Default for FieldErrors<K> {
    fn default() -> Self {
        Self {
            errors: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> PartialEq for FieldErrors<K> {
    fn eq(&self, other: &Self) -> bool {
        self.errors == other.errors
    }
}

impl<K: Eq + Hash> Eq for FieldErrors<K> {}

impl<K: FieldKey> FieldErrors<K> {
    /// Creates an empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the error for a field, replacing any previous one.
    pub fn insert(&mut self, field: impl Into<K>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    /// Removes the error for a field.
    pub fn remove<Q>(&mut self, field: &Q) -> Option<String>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.errors.remove(field)
    }

    /// Returns the error for a field.
    pub fn get<Q>(&self, field: &Q) -> Option<&str>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.errors.get(field).map(String::as_str)
    }

    /// Returns whether a field has an error.
    pub fn contains<Q>(&self, field: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.errors.contains_key(field)
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Removes every error.
    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Iterates over `(field, message)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &str)> {
        self.errors.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Returns the errors sorted by field name.
    pub fn sorted(&self) -> Vec<(String, &str)> {
        let mut all: Vec<_> = self
            .errors
            .iter()
            .map(|(k, v)| (k.to_string(), v.as_str()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Converts typed keys into their field names.
    #[must_use]
    pub fn into_named(self) -> FieldErrors<String> {
        self.errors
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}

impl<K: FieldKey> FromIterator<(K, String)> for FieldErrors<K> {
    fn from_iter<I: IntoIterator<Item = (K, String)>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl<K> IntoIterator for FieldErrors<K> {
    type Item = (K, String);
    type IntoIter = std::collections::hash_map::IntoIter<K, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<K: FieldKey> std::fmt::Display for FieldErrors<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (field, message) in self.sorted() {
            writeln!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
