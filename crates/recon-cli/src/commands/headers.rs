//! Headers command - list the columns of a file.

use std::path::PathBuf;

use colored::Colorize;
use recon::{Parser, ParserConfig};

use crate::cli::DelimiterChoice;

pub fn run(file: PathBuf, delimiter: DelimiterChoice) -> Result<(), Box<dyn std::error::Error>> {
    let parser = Parser::with_config(ParserConfig {
        delimiter: delimiter.as_byte(),
        ..Default::default()
    });
    let (dataset, source) = parser.parse_file(&file)?;

    println!(
        "{} {} ({} rows, {})",
        "Headers of".cyan().bold(),
        source.file.white(),
        source.row_count,
        source.format
    );
    for (i, header) in dataset.headers().iter().enumerate() {
        println!("  {:>3}  {}", i + 1, header);
    }

    Ok(())
}
