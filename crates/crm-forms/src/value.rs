//! Field values held by a form.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;

use chrono::NaiveDate;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::schema::FieldKey;

/// Date format used for text-encoded dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Keys of an object that describes a file.
const FILE_KEYS: [&str; 3] = ["file_name", "content_type", "size"];

/// Reference to a file chosen by the user.
///
/// Only the metadata is tracked; the bytes stay with the host. Both
/// metadata keys are always serialized so that a file read back from
/// JSON is still recognised as one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileRef {
    /// Original file name.
    pub file_name: String,
    /// MIME type, if the host knows it.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Size in bytes, if the host knows it.
    #[serde(default)]
    pub size: Option<u64>,
}

impl FileRef {
    /// Creates a file reference with just a name.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            size: None,
        }
    }

    /// Sets the content type.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the size in bytes.
    #[must_use]
    pub const fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Reads a file reference from a decoded JSON object.
    ///
    /// The object must hold `file_name` and at least one of
    /// `content_type` or `size`, and nothing else. Any other object is
    /// ordinary nested data.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from_object(entries: &BTreeMap<String, FieldValue>) -> Option<Self> {
        if entries.len() < 2 || entries.keys().any(|k| !FILE_KEYS.contains(&k.as_str())) {
            return None;
        }
        let file_name = entries.get("file_name")?.as_str()?.to_string();
        let content_type = match entries.get("content_type") {
            None | Some(FieldValue::Null) => None,
            Some(FieldValue::Text(text)) => Some(text.clone()),
            Some(_) => return None,
        };
        let size = match entries.get("size") {
            None | Some(FieldValue::Null) => None,
            Some(FieldValue::Number(n)) if *n >= 0.0 => Some(*n as u64),
            Some(_) => return None,
        };
        Some(Self {
            file_name,
            content_type,
            size,
        })
    }
}

/// A single field value.
///
/// Decoding from JSON maps `null`, booleans, numbers, strings, arrays
/// and objects onto the matching variant. An object is a
/// [`FileRef`] only when it has exactly the shape of one. Dates arrive
/// as text and are read with [`FieldValue::as_date`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicit null.
    Null,
    /// Boolean (checkboxes, switches).
    Bool(bool),
    /// Numeric input.
    Number(f64),
    /// Text input, selects, dates typed as text.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Uploaded file reference.
    File(FileRef),
    /// Multi-select or repeated input.
    List(Vec<FieldValue>),
    /// Nested group of values.
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Returns whether this value counts as "no input".
    ///
    /// Only `Null` and the empty string are empty. Whitespace, `0`,
    /// `false` and empty lists are all values.
    #[must_use]
    pub fn is_empty_input(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns the text, if this is a text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number, if this is a numeric value.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the date, parsing ISO `YYYY-MM-DD` text when needed.
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            Self::Text(s) => NaiveDate::parse_from_str(s, DATE_FORMAT).ok(),
            _ => None,
        }
    }

    /// Returns the items, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the file reference, if this is a file.
    #[must_use]
    pub const fn as_file(&self) -> Option<&FileRef> {
        match self {
            Self::File(f) => Some(f),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FieldValueVisitor)
    }
}

struct FieldValueVisitor;

impl<'de> Visitor<'de> for FieldValueVisitor {
    type Value = FieldValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a form field value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<FieldValue, E> {
        Ok(FieldValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<FieldValue, E> {
        Ok(FieldValue::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<FieldValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        FieldValue::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<FieldValue, E> {
        Ok(FieldValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<FieldValue, E> {
        Ok(FieldValue::from(v))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<FieldValue, E> {
        Ok(FieldValue::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<FieldValue, E> {
        Ok(FieldValue::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<FieldValue, E> {
        Ok(FieldValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<FieldValue, E> {
        Ok(FieldValue::Text(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<FieldValue, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(FieldValue::List(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<FieldValue, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = map.next_entry::<String, FieldValue>()? {
            entries.insert(key, value);
        }
        Ok(FileRef::from_object(&entries).map_or(FieldValue::Object(entries), FieldValue::File))
    }
}

/// Returns whether an optional value is missing or empty.
pub(crate) fn is_missing(value: Option<&FieldValue>) -> bool {
    value.is_none_or(FieldValue::is_empty_input)
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for FieldValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<FileRef> for FieldValue {
    fn from(value: FileRef) -> Self {
        Self::File(value)
    }
}

impl From<Vec<Self>> for FieldValue {
    fn from(value: Vec<Self>) -> Self {
        Self::List(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Mapping from field name to value.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Values<K = String> {
    values: HashMap<K, FieldValue>,
}

impl<K> Default for Values<K> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> PartialEq for Values<K> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<K: FieldKey> Values<K> {
    /// Creates an empty value map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set a value.
    #[must_use]
    pub fn with(mut self, name: impl Into<K>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a value, replacing any previous one.
    pub fn set(&mut self, name: impl Into<K>, value: impl Into<FieldValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns the value of a field.
    pub fn get<Q>(&self, name: &Q) -> Option<&FieldValue>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.values.get(name)
    }

    /// Removes a field and returns its value.
    pub fn remove<Q>(&mut self, name: &Q) -> Option<FieldValue>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.values.remove(name)
    }

    /// Returns whether a field has a value.
    pub fn contains<Q>(&self, name: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.values.contains_key(name)
    }

    /// Merges another value map into this one.
    ///
    /// Entries from `other` win. Fields not present in `other` are kept.
    pub fn merge(&mut self, other: Self) {
        self.values.extend(other.values);
    }

    /// Returns the number of fields with a value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether no field has a value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &FieldValue)> {
        self.values.iter()
    }

    /// Iterates over field names in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &K> {
        self.values.keys()
    }
}

impl<K: FieldKey> FromIterator<(K, FieldValue)> for Values<K> {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<K> IntoIterator for Values<K> {
    type Item = (K, FieldValue);
    type IntoIter = std::collections::hash_map::IntoIter<K, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
