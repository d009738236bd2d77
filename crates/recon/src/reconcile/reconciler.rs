//! Run execution: index build plus row scan, in the foreground or on a
//! background thread.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use super::config::ReconcileConfig;
use super::guard::{CancelToken, RunGuard};
use super::session::Stage;
use crate::error::{ReconError, Result};
use crate::input::{Dataset, output_path_for, write_csv};
use crate::mapping::{ColumnMapping, MatchingColumnSet};
use crate::matching::{MatchIndexBuilder, Progress, RowTagger};

/// Snapshot of everything a run reads.
///
/// Runs work on their own copy of the mapping and selection, so edits made
/// while a run is in flight do not affect it.
#[derive(Debug, Clone)]
pub struct RunInputs {
    pub reference: Arc<Dataset>,
    pub target: Arc<Dataset>,
    pub mapping: ColumnMapping,
    pub selection: MatchingColumnSet,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Rows in the reference dataset.
    pub reference_rows: usize,
    /// Rows in the target dataset (and in the output).
    pub target_rows: usize,
    /// Distinct composite keys in the reference index.
    pub distinct_keys: usize,
    /// Target rows tagged YES.
    pub matches: usize,
    /// Name of the status column.
    pub status_column: String,
    /// Selected source columns, in key order.
    pub key_columns: Vec<String>,
    /// Last pipeline stage reached.
    pub stage: Stage,
}

/// Tagged dataset plus its summary.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub dataset: Dataset,
    pub summary: RunSummary,
}

impl RunResult {
    /// Write the tagged dataset next to `target_file` using the timestamped
    /// naming convention. Returns the written path.
    pub fn write_beside(&self, target_file: &Path) -> Result<PathBuf> {
        let path = output_path_for(target_file, Local::now());
        self.write_to(&path)?;
        Ok(path)
    }

    /// Write the tagged dataset to an explicit path.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        write_csv(&self.dataset, path)?;
        info!(path = %path.display(), rows = self.dataset.row_count(), "wrote output");
        Ok(())
    }
}

/// Executes reconciliation runs, at most one at a time.
pub struct Reconciler {
    config: ReconcileConfig,
    running: Arc<AtomicBool>,
}

impl Reconciler {
    /// Create a new reconciler with default configuration.
    pub fn new() -> Self {
        Self::with_config(ReconcileConfig::default())
    }

    pub fn with_config(config: ReconcileConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Whether a run currently holds the slot.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run on the calling thread.
    ///
    /// Fails with `RunInProgress` if another run (foreground or background)
    /// has not finished.
    pub fn run(
        &self,
        inputs: &RunInputs,
        observer: impl FnMut(Progress),
        cancel: &CancelToken,
    ) -> Result<RunResult> {
        let _guard = RunGuard::acquire(&self.running)?;
        execute(&self.config, inputs, observer, cancel)
    }

    /// Run on a background thread.
    ///
    /// The run slot is claimed before this returns, so a second `spawn` or
    /// `run` fails with `RunInProgress` until the handle's run has finished.
    pub fn spawn(
        &self,
        inputs: RunInputs,
        observer: impl FnMut(Progress) + Send + 'static,
        cancel: CancelToken,
    ) -> Result<RunHandle> {
        let guard = RunGuard::acquire(&self.running)?;
        let config = self.config.clone();
        let token = cancel.clone();

        let handle = thread::spawn(move || {
            let _guard = guard;
            execute(&config, &inputs, observer, &token)
        });

        Ok(RunHandle { handle, cancel })
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a background run.
pub struct RunHandle {
    handle: JoinHandle<Result<RunResult>>,
    cancel: CancelToken,
}

impl RunHandle {
    /// Ask the run to stop at the next row boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the run to complete.
    pub fn join(self) -> Result<RunResult> {
        match self.handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

fn execute(
    config: &ReconcileConfig,
    inputs: &RunInputs,
    observer: impl FnMut(Progress),
    cancel: &CancelToken,
) -> Result<RunResult> {
    let span = info_span!(
        "reconcile",
        reference_rows = inputs.reference.row_count(),
        target_rows = inputs.target.row_count(),
        key_columns = inputs.selection.len()
    );
    let _enter = span.enter();

    if inputs.selection.is_empty() {
        return Err(ReconError::EmptySelection);
    }

    let index = MatchIndexBuilder::build(&inputs.reference, &inputs.mapping, &inputs.selection)?;

    let tagger = RowTagger::new(config.status_column.clone())
        .with_progress_interval(config.progress_interval);
    let tagged = tagger.tag(
        &inputs.target,
        &inputs.mapping,
        &inputs.selection,
        &index,
        observer,
        cancel,
    )?;

    info!(
        rows = tagged.stats.rows,
        matches = tagged.stats.matches,
        "tagging complete"
    );

    let summary = RunSummary {
        reference_rows: index.rows_scanned(),
        target_rows: tagged.stats.rows,
        distinct_keys: index.len(),
        matches: tagged.stats.matches,
        status_column: config.status_column.clone(),
        key_columns: inputs.selection.as_slice().to_vec(),
        stage: Stage::Tagged,
    };

    Ok(RunResult {
        dataset: tagged.dataset,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    fn inputs(rows: usize) -> RunInputs {
        let values: Vec<Vec<String>> = (0..rows).map(|i| vec![format!("id{i}")]).collect();
        let reference = Dataset::new(vec!["id".to_string()], values.clone());
        let target = Dataset::new(vec!["id".to_string()], values);
        RunInputs {
            reference: Arc::new(reference),
            target: Arc::new(target),
            mapping: [("id", "id")].into_iter().collect(),
            selection: ["id"].into_iter().collect(),
        }
    }

    #[test]
    fn test_run_summary() {
        let result = Reconciler::new()
            .run(&inputs(3), |_| {}, &CancelToken::new())
            .unwrap();

        assert_eq!(result.summary.matches, 3);
        assert_eq!(result.summary.distinct_keys, 3);
        assert_eq!(result.summary.stage, Stage::Tagged);
        assert_eq!(result.summary.key_columns, vec!["id"]);
    }

    #[test]
    fn test_empty_selection_rejected_before_work() {
        let mut inputs = inputs(1);
        inputs.selection = MatchingColumnSet::new();
        let err = Reconciler::new()
            .run(&inputs, |_| {}, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, ReconError::EmptySelection));
    }

    #[test]
    fn test_only_one_run_at_a_time() {
        let reconciler = Reconciler::new();
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        // The observer parks the background run on its first row.
        let handle = reconciler
            .spawn(
                inputs(2),
                move |p| {
                    if p.processed == 1 {
                        started_tx.send(()).unwrap();
                        release_rx.recv().unwrap();
                    }
                },
                CancelToken::new(),
            )
            .unwrap();

        started_rx.recv().unwrap();
        assert!(reconciler.is_running());
        let err = reconciler
            .run(&inputs(1), |_| {}, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, ReconError::RunInProgress));

        release_tx.send(()).unwrap();
        handle.join().unwrap();

        assert!(!reconciler.is_running());
        assert!(reconciler.run(&inputs(1), |_| {}, &CancelToken::new()).is_ok());
    }

    #[test]
    fn test_cancel_background_run() {
        let reconciler = Reconciler::new();
        let cancel = CancelToken::new();
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let handle = reconciler
            .spawn(
                inputs(5),
                move |p| {
                    if p.processed == 1 {
                        started_tx.send(()).unwrap();
                        release_rx.recv().unwrap();
                    }
                },
                cancel.clone(),
            )
            .unwrap();

        started_rx.recv().unwrap();
        handle.cancel();
        release_tx.send(()).unwrap();

        assert!(matches!(handle.join(), Err(ReconError::Cancelled)));
        assert!(!reconciler.is_running());
    }
}
