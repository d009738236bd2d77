//! Recon: reconcile two tabular datasets by mapped composite keys.
//!
//! A *reference* dataset is treated as ground truth. Each row of a *target*
//! dataset is tagged `YES` or `NO` depending on whether a row with the same
//! key exists in the reference. Keys are built from an ordered selection of
//! columns, mapped between the two header sets; the mapping is suggested from
//! header-name similarity and can then be edited.
//!
//! # Pipeline
//!
//! - [`HeaderSimilarityMapper`] proposes a [`ColumnMapping`]
//! - [`MappingStore`] holds the editable mapping and [`MatchingColumnSet`]
//! - [`MatchIndexBuilder`] builds a [`MatchIndex`] from the reference
//! - [`RowTagger`] probes it with each target row
//!
//! [`Session`] wires these together and runs them through a [`Reconciler`].
//!
//! # Example
//!
//! ```no_run
//! use recon::{CancelToken, Session};
//!
//! let mut session = Session::new();
//! session.load_reference("employees.csv").unwrap();
//! session.load_target("badge_export.csv").unwrap();
//!
//! let result = session.run(|_| {}, &CancelToken::new()).unwrap();
//! let path = session.write_output(&result).unwrap();
//!
//! println!("{} of {} rows matched", result.summary.matches, result.summary.target_rows);
//! println!("Output: {}", path.display());
//! ```

pub mod error;
pub mod input;
pub mod mapping;
pub mod matching;
pub mod reconcile;
pub mod similarity;

pub use error::{ReconError, Result, Side};
pub use input::{Dataset, Parser, ParserConfig, SourceMetadata};
pub use mapping::{ColumnMapping, MappingStore, MatchingColumnSet};
pub use matching::{
    CompositeKey, MatchIndex, MatchIndexBuilder, MatchStatus, Progress, RowTagger, TagStats,
};
pub use reconcile::{
    CancelToken, ReconcileConfig, Reconciler, RunHandle, RunInputs, RunResult, RunSummary,
    Session, Stage,
};
pub use similarity::{HeaderSimilarityMapper, MapperConfig, MappingSuggestion};
