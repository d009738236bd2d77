//! Configuration for reconciliation sessions.

use crate::input::ParserConfig;
use crate::matching::DEFAULT_STATUS_COLUMN;
use crate::similarity::MapperConfig;

/// Configuration for a [`Session`](super::Session) or [`Reconciler`](super::Reconciler).
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Parser configuration used for both files.
    pub parser: ParserConfig,
    /// Header mapper configuration.
    pub mapper: MapperConfig,
    /// Name of the YES/NO column written to the output.
    pub status_column: String,
    /// Rows between progress log lines.
    pub progress_interval: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            mapper: MapperConfig::default(),
            status_column: DEFAULT_STATUS_COLUMN.to_string(),
            progress_interval: 1000,
        }
    }
}

impl ReconcileConfig {
    pub fn with_status_column(mut self, name: impl Into<String>) -> Self {
        self.status_column = name.into();
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.mapper.threshold = threshold;
        self
    }

    pub fn with_delimiter(mut self, delimiter: Option<u8>) -> Self {
        self.parser.delimiter = delimiter;
        self
    }
}
