//! Column mapping, matching selection, and the store that edits both.

mod column_map;
mod selection;
mod store;

pub use column_map::ColumnMapping;
pub use selection::MatchingColumnSet;
pub use store::MappingStore;
