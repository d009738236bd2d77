//! Editable mapping state: the correspondence table and the matching selection.

use tracing::debug;

use super::column_map::ColumnMapping;
use super::selection::MatchingColumnSet;
use crate::error::{ReconError, Result, Side};
use crate::similarity::HeaderSimilarityMapper;

/// Holds the column mapping and the ordered matching selection, validated
/// against the header lists of the two datasets.
///
/// Mapping edits never touch the selection. Callers that remove a mapping
/// used by the selection call [`MappingStore::prune_selection`] afterwards.
#[derive(Debug, Clone, Default)]
pub struct MappingStore {
    reference_headers: Vec<String>,
    target_headers: Vec<String>,
    mapping: ColumnMapping,
    selection: MatchingColumnSet,
}

impl MappingStore {
    /// Create an empty store for the given header lists.
    pub fn new(reference_headers: Vec<String>, target_headers: Vec<String>) -> Self {
        Self {
            reference_headers,
            target_headers,
            mapping: ColumnMapping::new(),
            selection: MatchingColumnSet::new(),
        }
    }

    pub fn reference_headers(&self) -> &[String] {
        &self.reference_headers
    }

    pub fn target_headers(&self) -> &[String] {
        &self.target_headers
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn selection(&self) -> &MatchingColumnSet {
        &self.selection
    }

    /// Replace the mapping with a fresh proposal and select every mapped column.
    ///
    /// Manual edits and the previous selection are discarded.
    pub fn auto_map(&mut self, mapper: &HeaderSimilarityMapper) {
        self.mapping = mapper.propose(&self.reference_headers, &self.target_headers);
        self.selection = self.mapping.sources().collect();
        debug!(mapped = self.mapping.len(), "mapping store re-derived");
    }

    /// Map `source` to `target`, replacing any existing target for `source`.
    pub fn add_or_replace(&mut self, source: &str, target: &str) -> Result<()> {
        self.check_reference(source)?;
        self.check_target(target)?;
        self.mapping.insert(source, target);
        Ok(())
    }

    /// Change the target of `source`. Same as [`MappingStore::add_or_replace`].
    pub fn edit_target(&mut self, source: &str, new_target: &str) -> Result<()> {
        self.add_or_replace(source, new_target)
    }

    /// Remove the mapping for `source`. No-op if absent. Returns the old target.
    pub fn remove(&mut self, source: &str) -> Option<String> {
        self.mapping.remove(source)
    }

    /// Append a mapped source column to the matching selection.
    pub fn select(&mut self, source: &str) -> Result<()> {
        if !self.mapping.contains(source) {
            return Err(ReconError::invalid(source, Side::Reference));
        }
        self.selection.push(source);
        Ok(())
    }

    /// Remove a column from the matching selection. No-op if absent.
    pub fn deselect(&mut self, source: &str) -> bool {
        self.selection.remove(source)
    }

    /// Replace the selection with an explicit ordered list.
    ///
    /// Every column must be mapped and appear once; on error the current
    /// selection is unchanged.
    pub fn set_selection<S: AsRef<str>>(&mut self, columns: &[S]) -> Result<()> {
        let mut selection = MatchingColumnSet::new();
        for column in columns {
            let column = column.as_ref();
            if !self.mapping.contains(column) || !selection.push(column) {
                return Err(ReconError::invalid(column, Side::Reference));
            }
        }
        self.selection = selection;
        Ok(())
    }

    /// Drop selected columns that no longer have a mapping; returns them.
    pub fn prune_selection(&mut self) -> Vec<String> {
        self.selection.retain_mapped(&self.mapping)
    }

    fn check_reference(&self, column: &str) -> Result<()> {
        if self.reference_headers.iter().any(|h| h == column) {
            Ok(())
        } else {
            Err(ReconError::invalid(column, Side::Reference))
        }
    }

    fn check_target(&self, column: &str) -> Result<()> {
        if self.target_headers.iter().any(|h| h == column) {
            Ok(())
        } else {
            Err(ReconError::invalid(column, Side::Target))
        }
    }
}
