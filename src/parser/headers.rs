//! Insertion-ordered header map.

use indexmap::IndexMap;

/// HTTP header fields in the order they were first inserted.
///
/// Names keep the case they were received or set with. Inserting an existing
/// name replaces its value in place, so the last write wins without moving the
/// field. Values are stored trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    fields: IndexMap<String, String>,
}

impl HeaderMap {
    /// Create an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a header, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl AsRef<str>) -> Option<String> {
        self.fields
            .insert(name.into(), value.as_ref().trim().to_string())
    }

    /// Get a header value by its exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Get a header value by name, ignoring ASCII case.
    ///
    /// An exact match is preferred; otherwise the first field whose name
    /// matches case-insensitively is returned.
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.get(name).or_else(|| {
            self.fields
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        })
    }

    /// Check if a header exists, ignoring ASCII case.
    pub fn contains(&self, name: &str) -> bool {
        self.get_ignore_case(name).is_some()
    }

    /// Remove every field matching `name` case-insensitively, preserving the
    /// order of the rest. Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.fields.len();
        self.fields.retain(|k, _| !k.eq_ignore_ascii_case(name));
        self.fields.len() != before
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: AsRef<str>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HeaderMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}
