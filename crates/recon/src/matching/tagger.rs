//! Target-side row scan that annotates each row with its match status.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::index::MatchIndex;
use super::key::{CompositeKey, resolve_positions};
use crate::error::{ReconError, Result, Side};
use crate::input::Dataset;
use crate::mapping::{ColumnMapping, MatchingColumnSet};
use crate::reconcile::CancelToken;

/// Default name of the appended status column.
pub const DEFAULT_STATUS_COLUMN: &str = "Matched Status Column";

/// Per-row outcome written to the status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Matched,
    Unmatched,
}

impl MatchStatus {
    /// The literal written to the output file.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Matched => "YES",
            MatchStatus::Unmatched => "NO",
        }
    }
}

/// Row-scan progress reported to observers after each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
}

/// Counts from a completed scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagStats {
    pub rows: usize,
    pub matches: usize,
}

/// Output of a completed scan.
#[derive(Debug, Clone)]
pub struct TaggedDataset {
    pub dataset: Dataset,
    pub stats: TagStats,
}

/// Probes target rows against a [`MatchIndex`] and writes YES/NO per row.
#[derive(Debug, Clone)]
pub struct RowTagger {
    status_column: String,
    progress_interval: usize,
}

impl Default for RowTagger {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_COLUMN)
    }
}

impl RowTagger {
    pub fn new(status_column: impl Into<String>) -> Self {
        Self {
            status_column: status_column.into(),
            progress_interval: 1000,
        }
    }

    /// How often (in rows) progress is logged. Observers still see every row.
    pub fn with_progress_interval(mut self, rows: usize) -> Self {
        self.progress_interval = rows.max(1);
        self
    }

    pub fn status_column(&self) -> &str {
        &self.status_column
    }

    /// Tag every target row, in order.
    ///
    /// The returned dataset is a copy of `target` whose status column holds
    /// `YES` or `NO`. If `target` already has a column with the status name,
    /// that column is overwritten in place. Nothing is produced if the scan
    /// fails or is cancelled.
    pub fn tag(
        &self,
        target: &Dataset,
        mapping: &ColumnMapping,
        selection: &MatchingColumnSet,
        index: &MatchIndex,
        mut observer: impl FnMut(Progress),
        cancel: &CancelToken,
    ) -> Result<TaggedDataset> {
        let positions = resolve_positions(target, mapping, selection, Side::Target)?;
        let total = target.row_count();

        let mut statuses = Vec::with_capacity(total);
        let mut matches = 0;

        for (idx, row) in target.rows().iter().enumerate() {
            if cancel.is_cancelled() {
                debug!(processed = idx, total, "row scan cancelled");
                return Err(ReconError::Cancelled);
            }

            let key = CompositeKey::from_row(row, &positions);
            let status = if index.contains(&key) {
                matches += 1;
                MatchStatus::Matched
            } else {
                MatchStatus::Unmatched
            };
            statuses.push(status.as_str().to_string());

            let processed = idx + 1;
            observer(Progress { processed, total });
            if processed % self.progress_interval == 0 {
                debug!(processed, total, matches, "tagging rows");
            }
        }

        let dataset = target.with_column(&self.status_column, statuses);
        Ok(TaggedDataset {
            dataset,
            stats: TagStats {
                rows: total,
                matches,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::MatchIndexBuilder;

    fn setup() -> (Dataset, Dataset, ColumnMapping, MatchingColumnSet) {
        let reference = Dataset::from_rows(
            &["Username", "First", "Last"],
            &[&["a@x.com", "A", "X"], &["b@x.com", "B", "Y"]],
        );
        let target = Dataset::from_rows(
            &["Username", "First", "Last"],
            &[&["a@x.com", "A", "X"], &["c@x.com", "C", "Z"]],
        );
        let mapping: ColumnMapping = [
            ("Username", "Username"),
            ("First", "First"),
            ("Last", "Last"),
        ]
        .into_iter()
        .collect();
        let selection: MatchingColumnSet = ["Username", "First", "Last"].into_iter().collect();
        (reference, target, mapping, selection)
    }

    fn run(
        reference: &Dataset,
        target: &Dataset,
        mapping: &ColumnMapping,
        selection: &MatchingColumnSet,
        tagger: &RowTagger,
    ) -> Result<TaggedDataset> {
        let index = MatchIndexBuilder::build(reference, mapping, selection)?;
        tagger.tag(target, mapping, selection, &index, |_| {}, &CancelToken::new())
    }

    #[test]
    fn test_basic_tagging() {
        let (reference, target, mapping, selection) = setup();
        let out = run(&reference, &target, &mapping, &selection, &RowTagger::new("Status")).unwrap();

        assert_eq!(out.dataset.headers(), &["Username", "First", "Last", "Status"]);
        assert_eq!(out.dataset.value(0, "Status"), Some("YES"));
        assert_eq!(out.dataset.value(1, "Status"), Some("NO"));
        assert_eq!(out.stats, TagStats { rows: 2, matches: 1 });
    }

    #[test]
    fn test_status_column_collision_overwrites() {
        let (reference, target, mapping, selection) = setup();
        let tagger = RowTagger::new("Last");
        let index = MatchIndexBuilder::build(&reference, &mapping, &selection).unwrap();

        let out = tagger
            .tag(&target, &mapping, &selection, &index, |_| {}, &CancelToken::new())
            .unwrap();

        assert_eq!(out.dataset.column_count(), target.column_count());
        assert_eq!(out.dataset.value(0, "Last"), Some("YES"));
    }

    #[test]
    fn test_missing_target_column() {
        let (reference, _, mapping, selection) = setup();
        let target = Dataset::from_rows(&["Username", "First"], &[&["a@x.com", "A"]]);
        let index = MatchIndexBuilder::build(&reference, &mapping, &selection).unwrap();

        let err = RowTagger::default()
            .tag(&target, &mapping, &selection, &index, |_| {}, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ReconError::MissingColumn { ref column, side: Side::Target } if column == "Last"
        ));
    }

    #[test]
    fn test_observer_sees_every_row() {
        let (reference, target, mapping, selection) = setup();
        let index = MatchIndexBuilder::build(&reference, &mapping, &selection).unwrap();
        let mut seen = Vec::new();

        RowTagger::default()
            .tag(
                &target,
                &mapping,
                &selection,
                &index,
                |p| seen.push(p.processed),
                &CancelToken::new(),
            )
            .unwrap();

        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn test_cancelled_scan_produces_nothing() {
        let (reference, target, mapping, selection) = setup();
        let index = MatchIndexBuilder::build(&reference, &mapping, &selection).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = RowTagger::default()
            .tag(&target, &mapping, &selection, &index, |_| {}, &cancel)
            .unwrap_err();
        assert!(matches!(err, ReconError::Cancelled));
    }

    #[test]
    fn test_unselected_mapped_columns_are_inert() {
        let (reference, mut target, mapping, _) = setup();
        // Row 0 differs from the reference only in "Last".
        target = target.with_column("Last", vec!["Q".into(), "Z".into()]);
        let selection: MatchingColumnSet = ["Username", "First"].into_iter().collect();

        let out = run(&reference, &target, &mapping, &selection, &RowTagger::default()).unwrap();
        assert_eq!(out.dataset.value(0, DEFAULT_STATUS_COLUMN), Some("YES"));
    }
}
