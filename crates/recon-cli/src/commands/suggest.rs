//! Suggest command - show the derived header mapping for two files.

use std::path::PathBuf;

use colored::Colorize;
use recon::{ReconcileConfig, Session};

use crate::cli::DelimiterChoice;

pub fn run(
    reference: PathBuf,
    target: PathBuf,
    threshold: f64,
    delimiter: DelimiterChoice,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ReconcileConfig::default()
        .with_threshold(threshold)
        .with_delimiter(delimiter.as_byte());
    let mut session = Session::with_config(config);
    session.load_reference(&reference)?;
    session.load_target(&target)?;

    let suggestions = session.suggestions();
    let unmapped_reference: Vec<&str> = session
        .store()
        .reference_headers()
        .iter()
        .filter(|h| !session.mapping().contains(h))
        .map(|h| h.as_str())
        .collect();
    let unmapped_target: Vec<&str> = session
        .store()
        .target_headers()
        .iter()
        .filter(|h| !session.mapping().iter().any(|(_, t)| t == h.as_str()))
        .map(|h| h.as_str())
        .collect();

    if json_output {
        let out = serde_json::json!({
            "reference": reference,
            "target": target,
            "threshold": threshold,
            "mappings": suggestions,
            "unmapped_reference": unmapped_reference,
            "unmapped_target": unmapped_target,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{} {} {} {}",
        "Mapping".cyan().bold(),
        reference.display().to_string().white(),
        "->".dimmed(),
        target.display().to_string().white()
    );
    println!();

    if suggestions.is_empty() {
        println!(
            "{}",
            format!("No header scored above {:.2}.", threshold).yellow()
        );
    }

    for s in &suggestions {
        let score = if s.exact {
            "exact".green().to_string()
        } else {
            format!("{:.3}", s.score).yellow().to_string()
        };
        println!("  {:24} {} {:24} {}", s.source, "->".dimmed(), s.target, score);
    }

    if !unmapped_reference.is_empty() {
        println!();
        println!("{}", "Unmapped reference columns:".dimmed());
        for h in &unmapped_reference {
            println!("  {}", h);
        }
    }
    if !unmapped_target.is_empty() {
        println!();
        println!("{}", "Unmapped target columns:".dimmed());
        for h in &unmapped_target {
            println!("  {}", h);
        }
    }

    Ok(())
}
