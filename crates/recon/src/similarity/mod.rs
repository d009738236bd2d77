//! Header-name similarity scoring and automatic column mapping.

mod mapper;
mod ratio;

pub use mapper::{HeaderSimilarityMapper, MapperConfig, MappingSuggestion};
pub use ratio::{MatchBlock, SequenceMatcher, ratio};
