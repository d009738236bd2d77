//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use recon::matching::DEFAULT_STATUS_COLUMN;

/// Recon: tag rows of one CSV by whether they appear in another
#[derive(Parser)]
#[command(name = "recon")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the column mapping that would be derived for two files
    Suggest {
        /// Reference (ground truth) CSV file
        #[arg(value_name = "REFERENCE")]
        reference: PathBuf,

        /// Target CSV file to be tagged
        #[arg(value_name = "TARGET")]
        target: PathBuf,

        /// Minimum header similarity (exclusive) for a fuzzy match
        #[arg(long, default_value = "0.6")]
        threshold: f64,

        /// Field delimiter (",", ";", "|", "tab", or "auto")
        #[arg(short, long, default_value = ",")]
        delimiter: DelimiterChoice,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Tag every target row YES/NO by whether its key exists in the reference
    Match {
        /// Reference (ground truth) CSV file
        #[arg(value_name = "REFERENCE")]
        reference: PathBuf,

        /// Target CSV file to be tagged
        #[arg(value_name = "TARGET")]
        target: PathBuf,

        /// Add or replace a mapping, as REFERENCE_COLUMN=TARGET_COLUMN (repeatable)
        #[arg(short, long = "map", value_name = "SRC=TGT")]
        map: Vec<MappingArg>,

        /// Remove the derived mapping for a reference column (repeatable)
        #[arg(long, value_name = "SRC")]
        unmap: Vec<String>,

        /// Reference columns to match on, in key order (default: all mapped)
        #[arg(short, long = "key", value_name = "SRC")]
        key: Vec<String>,

        /// Name of the YES/NO column added to the output
        #[arg(short, long, default_value = DEFAULT_STATUS_COLUMN)]
        status_column: String,

        /// Output path (default: <target>_with_matched_status_<timestamp>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum header similarity (exclusive) for a fuzzy match
        #[arg(long, default_value = "0.6")]
        threshold: f64,

        /// Field delimiter (",", ";", "|", "tab", or "auto")
        #[arg(short, long, default_value = ",")]
        delimiter: DelimiterChoice,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the headers of a CSV file
    Headers {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Field delimiter (",", ";", "|", "tab", or "auto")
        #[arg(short, long, default_value = ",")]
        delimiter: DelimiterChoice,
    },
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum LogFormatArg {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// A `SRC=TGT` mapping override.
#[derive(Clone, Debug)]
pub struct MappingArg {
    pub source: String,
    pub target: String,
}

impl std::str::FromStr for MappingArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((source, target)) if !source.is_empty() && !target.is_empty() => Ok(MappingArg {
                source: source.to_string(),
                target: target.to_string(),
            }),
            _ => Err(format!(
                "Invalid mapping '{}'. Use REFERENCE_COLUMN=TARGET_COLUMN.",
                s
            )),
        }
    }
}

/// Field delimiter choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DelimiterChoice {
    /// Detect from the first lines of the file
    Auto,
    #[default]
    Comma,
    Semicolon,
    Pipe,
    Tab,
}

impl DelimiterChoice {
    /// The byte handed to the parser, or `None` to auto-detect.
    pub fn as_byte(&self) -> Option<u8> {
        match self {
            DelimiterChoice::Auto => None,
            DelimiterChoice::Comma => Some(b','),
            DelimiterChoice::Semicolon => Some(b';'),
            DelimiterChoice::Pipe => Some(b'|'),
            DelimiterChoice::Tab => Some(b'\t'),
        }
    }
}

impl std::str::FromStr for DelimiterChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" | "detect" => Ok(DelimiterChoice::Auto),
            "," | "comma" => Ok(DelimiterChoice::Comma),
            ";" | "semicolon" => Ok(DelimiterChoice::Semicolon),
            "|" | "pipe" => Ok(DelimiterChoice::Pipe),
            "\t" | "\\t" | "tab" => Ok(DelimiterChoice::Tab),
            _ => Err(format!(
                "Unknown delimiter: {}. Use ',', ';', '|', 'tab', or 'auto'.",
                s
            )),
        }
    }
}

impl std::fmt::Display for DelimiterChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DelimiterChoice::Auto => write!(f, "auto"),
            DelimiterChoice::Comma => write!(f, ","),
            DelimiterChoice::Semicolon => write!(f, ";"),
            DelimiterChoice::Pipe => write!(f, "|"),
            DelimiterChoice::Tab => write!(f, "tab"),
        }
    }
}
