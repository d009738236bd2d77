//! Session state: loaded datasets, the mapping store, and the pipeline stage.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::config::ReconcileConfig;
use super::guard::CancelToken;
use super::reconciler::{Reconciler, RunHandle, RunInputs, RunResult};
use crate::error::{ReconError, Result};
use crate::input::{Dataset, Parser, SourceMetadata};
use crate::mapping::{ColumnMapping, MappingStore, MatchingColumnSet};
use crate::matching::Progress;
use crate::similarity::{HeaderSimilarityMapper, MappingSuggestion};

/// Pipeline stage, in order. Reloading a dataset returns the session to the
/// mapping stages with a freshly derived mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Unloaded,
    HeadersLoaded,
    Mapped,
    MatchColumnsSelected,
    IndexBuilt,
    Tagged,
}

#[derive(Debug, Clone)]
struct Loaded {
    dataset: Arc<Dataset>,
    source: Option<SourceMetadata>,
}

/// Owns the reference and target datasets and the editable mapping between
/// them, and starts reconciliation runs.
pub struct Session {
    parser: Parser,
    mapper: HeaderSimilarityMapper,
    reconciler: Reconciler,
    reference: Option<Loaded>,
    target: Option<Loaded>,
    store: MappingStore,
}

impl Session {
    /// Create a new session with default configuration.
    pub fn new() -> Self {
        Self::with_config(ReconcileConfig::default())
    }

    pub fn with_config(config: ReconcileConfig) -> Self {
        Self {
            parser: Parser::with_config(config.parser.clone()),
            mapper: HeaderSimilarityMapper::with_config(config.mapper.clone()),
            reconciler: Reconciler::with_config(config),
            reference: None,
            target: None,
            store: MappingStore::default(),
        }
    }

    pub fn config(&self) -> &ReconcileConfig {
        self.reconciler.config()
    }

    /// Load the reference file. On failure the previous reference is kept.
    pub fn load_reference(&mut self, path: impl AsRef<Path>) -> Result<SourceMetadata> {
        let (dataset, source) = self.parser.parse_file(path)?;
        info!(file = %source.file, rows = source.row_count, "loaded reference");
        self.reference = Some(Loaded {
            dataset: Arc::new(dataset),
            source: Some(source.clone()),
        });
        self.rebuild_store();
        Ok(source)
    }

    /// Load the target file. On failure the previous target is kept.
    pub fn load_target(&mut self, path: impl AsRef<Path>) -> Result<SourceMetadata> {
        let (dataset, source) = self.parser.parse_file(path)?;
        info!(file = %source.file, rows = source.row_count, "loaded target");
        self.target = Some(Loaded {
            dataset: Arc::new(dataset),
            source: Some(source.clone()),
        });
        self.rebuild_store();
        Ok(source)
    }

    /// Use an in-memory dataset as the reference.
    pub fn set_reference(&mut self, dataset: Dataset) {
        self.reference = Some(Loaded {
            dataset: Arc::new(dataset),
            source: None,
        });
        self.rebuild_store();
    }

    /// Use an in-memory dataset as the target.
    pub fn set_target(&mut self, dataset: Dataset) {
        self.target = Some(Loaded {
            dataset: Arc::new(dataset),
            source: None,
        });
        self.rebuild_store();
    }

    pub fn reference(&self) -> Option<&Dataset> {
        self.reference.as_ref().map(|l| l.dataset.as_ref())
    }

    pub fn target(&self) -> Option<&Dataset> {
        self.target.as_ref().map(|l| l.dataset.as_ref())
    }

    pub fn reference_source(&self) -> Option<&SourceMetadata> {
        self.reference.as_ref().and_then(|l| l.source.as_ref())
    }

    pub fn target_source(&self) -> Option<&SourceMetadata> {
        self.target.as_ref().and_then(|l| l.source.as_ref())
    }

    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    pub fn mapping(&self) -> &ColumnMapping {
        self.store.mapping()
    }

    pub fn selection(&self) -> &MatchingColumnSet {
        self.store.selection()
    }

    /// Scored suggestions for the current header lists.
    pub fn suggestions(&self) -> Vec<MappingSuggestion> {
        self.mapper
            .suggest(self.store.reference_headers(), self.store.target_headers())
    }

    /// Current pipeline stage.
    pub fn stage(&self) -> Stage {
        if self.reference.is_none() || self.target.is_none() {
            Stage::Unloaded
        } else if self.store.mapping().is_empty() {
            Stage::HeadersLoaded
        } else if self.store.selection().is_empty() {
            Stage::Mapped
        } else {
            Stage::MatchColumnsSelected
        }
    }

    /// Re-derive the mapping from the headers, discarding manual edits.
    pub fn remap(&mut self) -> Result<()> {
        self.require_loaded()?;
        self.store.auto_map(&self.mapper);
        Ok(())
    }

    pub fn add_mapping(&mut self, source: &str, target: &str) -> Result<()> {
        self.require_loaded()?;
        self.store.add_or_replace(source, target)
    }

    pub fn edit_mapping(&mut self, source: &str, new_target: &str) -> Result<()> {
        self.require_loaded()?;
        self.store.edit_target(source, new_target)
    }

    /// Remove a mapping and de-select the column if it was selected.
    pub fn remove_mapping(&mut self, source: &str) -> Option<String> {
        let removed = self.store.remove(source);
        for column in self.store.prune_selection() {
            warn!(column = %column, "mapping removed; column dropped from matching selection");
        }
        removed
    }

    pub fn select(&mut self, source: &str) -> Result<()> {
        self.store.select(source)
    }

    pub fn deselect(&mut self, source: &str) -> bool {
        self.store.deselect(source)
    }

    pub fn set_selection<S: AsRef<str>>(&mut self, columns: &[S]) -> Result<()> {
        self.store.set_selection(columns)
    }

    /// Snapshot the current state for a run.
    pub fn inputs(&self) -> Result<RunInputs> {
        let (reference, target) = match (&self.reference, &self.target) {
            (Some(r), Some(t)) => (Arc::clone(&r.dataset), Arc::clone(&t.dataset)),
            _ => return Err(ReconError::NotReady(self.stage())),
        };
        if self.store.selection().is_empty() {
            return Err(ReconError::EmptySelection);
        }
        Ok(RunInputs {
            reference,
            target,
            mapping: self.store.mapping().clone(),
            selection: self.store.selection().clone(),
        })
    }

    /// Run on the calling thread.
    pub fn run(&self, observer: impl FnMut(Progress), cancel: &CancelToken) -> Result<RunResult> {
        let inputs = self.inputs()?;
        self.reconciler.run(&inputs, observer, cancel)
    }

    /// Run on a background thread. Session edits made while it runs do not
    /// affect it.
    pub fn spawn(
        &self,
        observer: impl FnMut(Progress) + Send + 'static,
        cancel: CancelToken,
    ) -> Result<RunHandle> {
        let inputs = self.inputs()?;
        self.reconciler.spawn(inputs, observer, cancel)
    }

    /// Whether a run started from this session is still in flight.
    pub fn is_running(&self) -> bool {
        self.reconciler.is_running()
    }

    /// Write a run's output next to the target file. Returns the written path.
    pub fn write_output(&self, result: &RunResult) -> Result<PathBuf> {
        let target_path = self
            .target_source()
            .map(|s| s.path.clone())
            .ok_or_else(|| ReconError::Io {
                path: PathBuf::from("<memory>"),
                source: io::Error::new(io::ErrorKind::NotFound, "target dataset has no file path"),
            })?;
        result.write_beside(&target_path)
    }

    fn require_loaded(&self) -> Result<()> {
        if self.reference.is_some() && self.target.is_some() {
            Ok(())
        } else {
            Err(ReconError::NotReady(self.stage()))
        }
    }

    fn rebuild_store(&mut self) {
        self.store = match (&self.reference, &self.target) {
            (Some(r), Some(t)) => {
                let mut store = MappingStore::new(
                    r.dataset.headers().to_vec(),
                    t.dataset.headers().to_vec(),
                );
                store.auto_map(&self.mapper);
                store
            }
            _ => MappingStore::default(),
        };
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> Session {
        let mut session = Session::new();
        session.set_reference(Dataset::from_rows(
            &["Username", "First Name", "Last Name", "Role"],
            &[&["a@x.com", "A", "X", "Dev"]],
        ));
        session.set_target(Dataset::from_rows(
            &["username", "First Name", "Last Name", "Project"],
            &[&["a@x.com", "A", "X", "P1"], &["c@x.com", "C", "Z", "P2"]],
        ));
        session
    }

    #[test]
    fn test_stage_progression() {
        let mut session = Session::new();
        assert_eq!(session.stage(), Stage::Unloaded);

        session.set_reference(Dataset::from_rows(&["a"], &[]));
        assert_eq!(session.stage(), Stage::Unloaded);

        session.set_target(Dataset::from_rows(&["zzz"], &[]));
        assert_eq!(session.stage(), Stage::HeadersLoaded);

        session.add_mapping("a", "zzz").unwrap();
        assert_eq!(session.stage(), Stage::Mapped);

        session.select("a").unwrap();
        assert_eq!(session.stage(), Stage::MatchColumnsSelected);
    }

    #[test]
    fn test_loading_both_auto_maps_and_selects() {
        let session = loaded();
        assert_eq!(session.mapping().len(), 3);
        assert_eq!(session.mapping().get("Username"), Some("username"));
        assert_eq!(
            session.selection().as_slice(),
            &["Username", "First Name", "Last Name"]
        );
    }

    #[test]
    fn test_remove_mapping_deselects() {
        let mut session = loaded();
        session.remove_mapping("Last Name");

        assert!(!session.selection().contains("Last Name"));
        let result = session.run(|_| {}, &CancelToken::new()).unwrap();
        assert_eq!(result.summary.key_columns, vec!["Username", "First Name"]);
    }

    #[test]
    fn test_run_requires_selection() {
        let mut session = loaded();
        session.set_selection::<&str>(&[]).unwrap();
        assert!(matches!(
            session.run(|_| {}, &CancelToken::new()),
            Err(ReconError::EmptySelection)
        ));
    }

    #[test]
    fn test_edits_require_both_datasets() {
        let mut session = Session::new();
        assert!(matches!(
            session.add_mapping("a", "b"),
            Err(ReconError::NotReady(Stage::Unloaded))
        ));
    }

    #[test]
    fn test_reload_resets_manual_edits() {
        let mut session = loaded();
        session.edit_mapping("Role", "Project").unwrap();
        assert_eq!(session.mapping().get("Role"), Some("Project"));

        session.set_target(Dataset::from_rows(&["username", "Project"], &[]));
        assert_eq!(session.mapping().get("Role"), None);
        assert_eq!(session.selection().as_slice(), &["Username"]);
    }

    #[test]
    fn test_spawned_run_ignores_later_edits() {
        let mut session = loaded();
        let handle = session.spawn(|_| {}, CancelToken::new()).unwrap();
        session.remove_mapping("Username");

        let result = handle.join().unwrap();
        assert_eq!(result.summary.key_columns.len(), 3);
        assert_eq!(result.dataset.value(0, "Matched Status Column"), Some("YES"));
        assert_eq!(result.dataset.value(1, "Matched Status Column"), Some("NO"));
    }
}
