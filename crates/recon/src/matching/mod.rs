//! Composite-key indexing of the reference dataset and tagging of target rows.

mod index;
mod key;
mod tagger;

pub use index::{MatchIndex, MatchIndexBuilder};
pub use key::CompositeKey;
pub use tagger::{DEFAULT_STATUS_COLUMN, MatchStatus, Progress, RowTagger, TagStats, TaggedDataset};
