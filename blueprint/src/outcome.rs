//! Results of running a blueprint.
//!
//! Per-field messages are kept in schema order. In array mode the details are
//! a list aligned with the input: it is empty when every element is clean,
//! and otherwise holds one entry per element (empty for clean elements).

use serde::Serialize;
use serde::ser::SerializeMap;
use serde_json::Value;

/// Ordered mapping from schema key to a per-field entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> FieldMap<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts or replaces the entry for `key`.
    pub fn insert(&mut self, key: impl Into<String>, entry: T) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = entry,
            None => self.entries.push((key, entry)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<T> Default for FieldMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize> Serialize for FieldMap<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

/// Field errors of one object: key → message.
pub type FieldErrors = FieldMap<String>;

/// Per-field details in object or array shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Details<T> {
    Object(FieldMap<T>),
    Array(Vec<FieldMap<T>>),
}

impl<T> Details<T> {
    /// Array-mode details from per-element maps, collapsed to an empty list
    /// when no element has an entry.
    pub(crate) fn from_elements(elements: Vec<FieldMap<T>>) -> Self {
        if elements.iter().all(FieldMap::is_empty) {
            return Self::Array(Vec::new());
        }
        Self::Array(elements)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Object(fields) => fields.is_empty(),
            Self::Array(elements) => elements.iter().all(FieldMap::is_empty),
        }
    }

    /// Total number of field entries across all elements.
    pub fn error_count(&self) -> usize {
        match self {
            Self::Object(fields) => fields.len(),
            Self::Array(elements) => elements.iter().map(FieldMap::len).sum(),
        }
    }

    /// Flattened entries with their key path: `key` in object mode,
    /// `index.key` in array mode.
    pub fn entries(&self) -> Vec<(String, &T)> {
        match self {
            Self::Object(fields) => fields.iter().map(|(k, v)| (k.to_string(), v)).collect(),
            Self::Array(elements) => elements
                .iter()
                .enumerate()
                .flat_map(|(index, fields)| {
                    fields.iter().map(move |(k, v)| (format!("{index}.{k}"), v))
                })
                .collect(),
        }
    }

    pub fn as_object(&self) -> Option<&FieldMap<T>> {
        match self {
            Self::Object(fields) => Some(fields),
            Self::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldMap<T>]> {
        match self {
            Self::Object(_) => None,
            Self::Array(elements) => Some(elements),
        }
    }
}

/// Parse-failure messages of a normalize/serialize run.
pub type ErrorDetails = Details<String>;

/// Validation messages of a validate run: key → messages.
pub type ValidationDetails = Details<Vec<String>>;

/// Output of [`Blueprint::normalize`](crate::Blueprint::normalize) and
/// [`Blueprint::serialize`](crate::Blueprint::serialize).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub has_error: bool,
    pub errors: ErrorDetails,
    /// Normalized object, or array of objects in input order.
    pub value: Value,
}

/// Output of [`Blueprint::validate`](crate::Blueprint::validate).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: ValidationDetails,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn errors(pairs: &[(&str, &str)]) -> FieldErrors {
        let mut fields = FieldErrors::new();
        for (key, message) in pairs {
            fields.insert(*key, message.to_string());
        }
        fields
    }

    #[test]
    fn test_field_map_keeps_insertion_order_and_replaces() {
        let mut fields = errors(&[("b", "1"), ("a", "2")]);
        fields.insert("b", "3".to_string());
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(fields.get("b").map(String::as_str), Some("3"));
        assert_eq!(
            serde_json::to_value(&fields).unwrap(),
            json!({ "b": "3", "a": "2" })
        );
    }

    #[test]
    fn test_array_details_collapse_when_clean() {
        let details = ErrorDetails::from_elements(vec![FieldErrors::new(), FieldErrors::new()]);
        assert_eq!(details, ErrorDetails::Array(Vec::new()));
        assert!(details.is_empty());
    }

    #[test]
    fn test_array_details_stay_aligned() {
        let details = ErrorDetails::from_elements(vec![FieldErrors::new(), errors(&[("v", "bad")])]);
        let elements = details.as_array().unwrap();
        assert_eq!(elements.len(), 2);
        assert!(elements[0].is_empty());
        assert_eq!(details.error_count(), 1);
        assert_eq!(details.entries(), vec![("1.v".to_string(), &"bad".to_string())]);
    }
}
