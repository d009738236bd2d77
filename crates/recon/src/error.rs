//! Error types for the recon library.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reconcile::Stage;

/// Which of the two datasets an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The ground-truth dataset.
    Reference,
    /// The dataset being annotated.
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Reference => write!(f, "reference"),
            Side::Target => write!(f, "target"),
        }
    }
}

/// Main error type for recon operations.
#[derive(Debug, Error)]
pub enum ReconError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File could not be interpreted as tabular data.
    #[error("Failed to load '{path}': {message}")]
    Load { path: PathBuf, message: String },

    /// A mapping or selection names a column that is not a header of its dataset.
    #[error("Invalid column '{column}': not a {side} header")]
    InvalidColumn { column: String, side: Side },

    /// A column referenced by the mapping is no longer present at run time.
    #[error("Missing column '{column}' in {side} dataset")]
    MissingColumn { column: String, side: Side },

    /// Processing was requested with no matching columns selected.
    #[error("No matching columns selected")]
    EmptySelection,

    /// Another run is already in flight.
    #[error("A reconciliation run is already in progress")]
    RunInProgress,

    /// The run was cancelled before the row scan completed.
    #[error("Run cancelled")]
    Cancelled,

    /// The session has not reached the stage required for the operation.
    #[error("Session not ready: currently {0:?}")]
    NotReady(Stage),
}

impl ReconError {
    /// True for failures that happen while loading a dataset.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            ReconError::Io { .. } | ReconError::Csv(_) | ReconError::Load { .. }
        )
    }

    pub(crate) fn invalid(column: impl Into<String>, side: Side) -> Self {
        ReconError::InvalidColumn {
            column: column.into(),
            side,
        }
    }

    pub(crate) fn missing(column: impl Into<String>, side: Side) -> Self {
        ReconError::MissingColumn {
            column: column.into(),
            side,
        }
    }
}

/// Result type alias for recon operations.
pub type Result<T> = std::result::Result<T, ReconError>;
