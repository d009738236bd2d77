//! Composite keys built from selected row values.

use std::fmt;

use crate::error::{ReconError, Result, Side};
use crate::input::Dataset;
use crate::mapping::{ColumnMapping, MatchingColumnSet};

/// Ordered tuple of whitespace-trimmed values, one per selected column.
///
/// Equality is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey(Vec<String>);

impl CompositeKey {
    /// Build a key from already-extracted values, trimming each.
    pub fn new<S: AsRef<str>>(values: &[S]) -> Self {
        Self(values.iter().map(|v| v.as_ref().trim().to_string()).collect())
    }

    /// Build a key from `row` using pre-resolved column positions.
    pub(crate) fn from_row(row: &[String], positions: &[usize]) -> Self {
        Self(
            positions
                .iter()
                .map(|&p| row.get(p).map(|v| v.trim()).unwrap_or("").to_string())
                .collect(),
        )
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// Column positions in `dataset` for each selected column, in selection order.
///
/// On the reference side the selected names are looked up directly; on the
/// target side each is first translated through `mapping`.
pub(crate) fn resolve_positions(
    dataset: &Dataset,
    mapping: &ColumnMapping,
    selection: &MatchingColumnSet,
    side: Side,
) -> Result<Vec<usize>> {
    if selection.is_empty() {
        return Err(ReconError::EmptySelection);
    }

    selection
        .iter()
        .map(|source| {
            let target = mapping
                .get(source)
                .ok_or_else(|| ReconError::missing(source, Side::Reference))?;
            let column = match side {
                Side::Reference => source,
                Side::Target => target,
            };
            dataset
                .column_index(column)
                .ok_or_else(|| ReconError::missing(column, side))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_but_keeps_case() {
        assert_eq!(CompositeKey::new(&[" Doe ", "x"]), CompositeKey::new(&["Doe", "x"]));
        assert_ne!(CompositeKey::new(&["doe"]), CompositeKey::new(&["Doe"]));
    }

    #[test]
    fn test_field_order_matters() {
        assert_ne!(CompositeKey::new(&["a", "b"]), CompositeKey::new(&["b", "a"]));
    }

    #[test]
    fn test_resolve_positions_per_side() {
        let reference = Dataset::from_rows(&["Email", "Last"], &[]);
        let target = Dataset::from_rows(&["Surname", "Mail"], &[]);
        let mapping: ColumnMapping = [("Email", "Mail"), ("Last", "Surname")].into_iter().collect();
        let selection: MatchingColumnSet = ["Last", "Email"].into_iter().collect();

        assert_eq!(
            resolve_positions(&reference, &mapping, &selection, Side::Reference).unwrap(),
            vec![1, 0]
        );
        assert_eq!(
            resolve_positions(&target, &mapping, &selection, Side::Target).unwrap(),
            vec![0, 1]
        );
    }

    #[test]
    fn test_dangling_selection_is_missing_column() {
        let reference = Dataset::from_rows(&["Email"], &[]);
        let mapping = ColumnMapping::new();
        let selection: MatchingColumnSet = ["Email"].into_iter().collect();

        let err = resolve_positions(&reference, &mapping, &selection, Side::Reference).unwrap_err();
        assert!(matches!(err, ReconError::MissingColumn { ref column, .. } if column == "Email"));
    }
}
