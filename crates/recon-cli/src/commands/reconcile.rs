//! Match command - tag every target row by whether its key is in the reference.

use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use colored::Colorize;
use recon::{CancelToken, Progress, ReconcileConfig, Session};
use tracing::warn;

use crate::cli::{DelimiterChoice, MappingArg};

/// Rows between progress redraws on an interactive terminal.
const PROGRESS_EVERY: usize = 1000;

/// Options for the match command.
pub struct MatchArgs {
    pub reference: PathBuf,
    pub target: PathBuf,
    pub map: Vec<MappingArg>,
    pub unmap: Vec<String>,
    pub key: Vec<String>,
    pub status_column: String,
    pub output: Option<PathBuf>,
    pub threshold: f64,
    pub delimiter: DelimiterChoice,
    pub json: bool,
}

pub fn run(args: MatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = ReconcileConfig::default()
        .with_threshold(args.threshold)
        .with_status_column(args.status_column.clone())
        .with_delimiter(args.delimiter.as_byte());
    let mut session = Session::with_config(config);

    session.load_reference(&args.reference)?;
    session.load_target(&args.target)?;
    apply_overrides(&mut session, &args.map, &args.unmap, &args.key)?;

    if !args.json {
        print_plan(&session);
    }

    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    ctrlc::set_handler(move || on_interrupt.cancel())?;

    let total = session.target().map(|t| t.row_count()).unwrap_or(0);
    let show_progress = !args.json && std::io::stderr().is_terminal();
    let handle = session.spawn(
        move |p: Progress| {
            if show_progress && (p.processed % PROGRESS_EVERY == 0 || p.processed == total) {
                eprint!("\r  {} / {} rows", p.processed, total);
                let _ = std::io::stderr().flush();
            }
        },
        cancel,
    )?;
    let result = handle.join();
    if show_progress && total > 0 {
        eprintln!();
    }
    let result = result?;

    let written = match &args.output {
        Some(path) => {
            result.write_to(path)?;
            path.clone()
        }
        None => session.write_output(&result)?,
    };

    if args.json {
        let out = serde_json::json!({
            "output": written,
            "summary": result.summary,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let summary = &result.summary;
    println!();
    println!(
        "{} {} of {} target rows found in the reference ({} distinct keys)",
        "Matched".green().bold(),
        summary.matches.to_string().white().bold(),
        summary.target_rows,
        summary.distinct_keys
    );
    println!(
        "{} {}",
        "Wrote".cyan().bold(),
        written.display().to_string().white()
    );

    Ok(())
}

/// Apply `--unmap`, then `--map`, then `--key` to the derived mapping.
///
/// Columns added with `--map` join the selection, as derived mappings do.
/// An explicit `--key` list replaces the selection outright.
pub fn apply_overrides(
    session: &mut Session,
    map: &[MappingArg],
    unmap: &[String],
    key: &[String],
) -> recon::Result<()> {
    for source in unmap {
        if session.remove_mapping(source).is_none() {
            warn!(column = %source, "--unmap: column has no mapping");
        }
    }

    for m in map {
        session.add_mapping(&m.source, &m.target)?;
        session.select(&m.source)?;
    }

    if !key.is_empty() {
        session.set_selection(key)?;
    }

    Ok(())
}

fn print_plan(session: &Session) {
    println!("{}", "Column mapping:".cyan().bold());
    for (source, target) in session.mapping().iter() {
        let marker = if session.selection().contains(source) {
            "key".green()
        } else {
            "-".dimmed()
        };
        println!("  {:24} {} {:24} {}", source, "->".dimmed(), target, marker);
    }
    if session.mapping().is_empty() {
        println!("  {}", "(none)".yellow());
    }
    println!(
        "{} {}",
        "Matching on:".cyan().bold(),
        session.selection().as_slice().join(", ")
    );
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use recon::{ReconError, Side};
    use tempfile::NamedTempFile;

    use super::*;

    fn file(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    fn session() -> (Session, NamedTempFile, NamedTempFile) {
        let reference = file("Email,First Name,Role\na@x.com,Ann,Dev\n");
        let target = file("E-mail,First Name,Manager\na@x.com,Ann,Bob\n");
        let mut session = Session::new();
        session.load_reference(reference.path()).unwrap();
        session.load_target(target.path()).unwrap();
        (session, reference, target)
    }

    fn mapping(s: &str) -> MappingArg {
        s.parse().unwrap()
    }

    #[test]
    fn test_overrides_unmap_then_map() {
        let (mut session, _r, _t) = session();
        assert_eq!(session.mapping().get("Email"), Some("E-mail"));

        apply_overrides(
            &mut session,
            &[mapping("Role=Manager")],
            &["Email".to_string()],
            &[],
        )
        .unwrap();

        assert!(!session.mapping().contains("Email"));
        assert_eq!(session.mapping().get("Role"), Some("Manager"));
        assert_eq!(session.selection().as_slice(), &["First Name", "Role"]);
    }

    #[test]
    fn test_key_replaces_selection() {
        let (mut session, _r, _t) = session();
        apply_overrides(&mut session, &[], &[], &["First Name".to_string()]).unwrap();
        assert_eq!(session.selection().as_slice(), &["First Name"]);
    }

    #[test]
    fn test_unknown_target_column_rejected() {
        let (mut session, _r, _t) = session();
        let err = apply_overrides(&mut session, &[mapping("Role=Boss")], &[], &[]).unwrap_err();
        assert!(matches!(err, ReconError::InvalidColumn { side: Side::Target, .. }));
    }
}
