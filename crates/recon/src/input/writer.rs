//! Writing tagged datasets back to CSV.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::source::Dataset;
use crate::error::{ReconError, Result};

/// Infix between the target file's stem and the timestamp in output names.
pub const OUTPUT_INFIX: &str = "_with_matched_status_";

/// Build the conventional output path for a tagged copy of `target`.
///
/// `data/users.csv` at 2024-03-05 14:07:09 becomes
/// `data/users_with_matched_status_20240305_140709.csv`.
pub fn output_path_for(target: &Path, at: DateTime<Local>) -> PathBuf {
    let stem = target.file_stem().unwrap_or_default().to_string_lossy();
    let name = format!(
        "{}{}{}.csv",
        stem,
        OUTPUT_INFIX,
        at.format("%Y%m%d_%H%M%S")
    );
    target.with_file_name(name)
}

/// Write a dataset as comma-separated values with a header row.
pub fn write_csv(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| ReconError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    let file = File::create(path).map_err(|e| ReconError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    writer.write_record(dataset.headers())?;
    for row in dataset.rows() {
        writer.write_record(row)?;
    }

    let mut inner = writer.into_inner().map_err(|e| ReconError::Io {
        path: path.to_path_buf(),
        source: e.into_error(),
    })?;
    inner.flush().map_err(|e| ReconError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
