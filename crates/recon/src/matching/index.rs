//! Reference-side set of composite keys.

use std::collections::HashSet;

use tracing::info;

use super::key::{CompositeKey, resolve_positions};
use crate::error::{Result, Side};
use crate::input::Dataset;
use crate::mapping::{ColumnMapping, MatchingColumnSet};

/// Set of composite keys drawn from the reference dataset.
#[derive(Debug, Clone, Default)]
pub struct MatchIndex {
    keys: HashSet<CompositeKey>,
    rows_scanned: usize,
}

impl MatchIndex {
    /// The matching predicate.
    pub fn contains(&self, key: &CompositeKey) -> bool {
        self.keys.contains(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of reference rows the index was built from.
    pub fn rows_scanned(&self) -> usize {
        self.rows_scanned
    }
}

/// Builds a [`MatchIndex`] in a single pass over the reference dataset.
pub struct MatchIndexBuilder;

impl MatchIndexBuilder {
    /// Index every reference row by its selected columns.
    ///
    /// Fails with `EmptySelection` before reading any row when nothing is
    /// selected, and with `MissingColumn` when a selected column cannot be
    /// resolved against the reference headers.
    pub fn build(
        reference: &Dataset,
        mapping: &ColumnMapping,
        selection: &MatchingColumnSet,
    ) -> Result<MatchIndex> {
        let positions = resolve_positions(reference, mapping, selection, Side::Reference)?;

        let keys: HashSet<CompositeKey> = reference
            .rows()
            .iter()
            .map(|row| CompositeKey::from_row(row, &positions))
            .collect();

        info!(
            rows = reference.row_count(),
            distinct_keys = keys.len(),
            key_columns = selection.len(),
            "built match index"
        );

        Ok(MatchIndex {
            keys,
            rows_scanned: reference.row_count(),
        })
    }
}
