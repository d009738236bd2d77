//! Source-to-target column correspondences.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mapping from reference column name to target column name.
///
/// Each source column appears at most once; inserting an existing source
/// replaces its target and keeps its position. Several sources may share a
/// target. Iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    entries: IndexMap<String, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the target for `source`. Returns the previous target.
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) -> Option<String> {
        self.entries.insert(source.into(), target.into())
    }

    /// Remove `source`, preserving the order of the remaining entries.
    pub fn remove(&mut self, source: &str) -> Option<String> {
        self.entries.shift_remove(source)
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(|s| s.as_str())
    }

    pub fn contains(&self, source: &str) -> bool {
        self.entries.contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Source column names in insertion order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    /// `(source, target)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, t)| (s.as_str(), t.as_str()))
    }
}

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for ColumnMapping {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut mapping = ColumnMapping::new();
        for (source, target) in iter {
            mapping.insert(source, target);
        }
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reinsert_overwrites_in_place() {
        let mut m: ColumnMapping = [("a", "x"), ("b", "y")].into_iter().collect();
        let prev = m.insert("a", "z");

        assert_eq!(prev.as_deref(), Some("x"));
        assert_eq!(m.len(), 2);
        assert_eq!(m.iter().collect::<Vec<_>>(), vec![("a", "z"), ("b", "y")]);
    }

    #[test]
    fn test_targets_may_repeat() {
        let m: ColumnMapping = [("First", "Name"), ("Given", "Name")].into_iter().collect();
        assert_eq!(m.get("First"), Some("Name"));
        assert_eq!(m.get("Given"), Some("Name"));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut m: ColumnMapping = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(m.remove("b").as_deref(), Some("2"));
        assert_eq!(m.remove("missing"), None);
        assert_eq!(m.sources().collect::<Vec<_>>(), vec!["a", "c"]);
    }
}
