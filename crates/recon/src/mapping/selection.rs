//! Ordered selection of columns that participate in row matching.

use serde::{Deserialize, Serialize};

use super::column_map::ColumnMapping;

/// Ordered list of source column names used to build composite keys.
///
/// The order defines the field order of every key, so it must be the same
/// when the reference index is built and when target rows probe it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchingColumnSet {
    columns: Vec<String>,
}

impl MatchingColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `column` unless it is already selected. Returns whether it was added.
    pub fn push(&mut self, column: impl Into<String>) -> bool {
        let column = column.into();
        if self.contains(&column) {
            return false;
        }
        self.columns.push(column);
        true
    }

    /// Remove `column`. Returns whether it was selected.
    pub fn remove(&mut self, column: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|c| c != column);
        self.columns.len() != before
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Drop every column without a mapping entry and return the dropped names.
    pub fn retain_mapped(&mut self, mapping: &ColumnMapping) -> Vec<String> {
        let (kept, dropped): (Vec<_>, Vec<_>) = std::mem::take(&mut self.columns)
            .into_iter()
            .partition(|c| mapping.contains(c));
        self.columns = kept;
        dropped
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.as_str())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.columns
    }
}

impl<S: Into<String>> FromIterator<S> for MatchingColumnSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = MatchingColumnSet::new();
        for column in iter {
            set.push(column);
        }
        set
    }
}
