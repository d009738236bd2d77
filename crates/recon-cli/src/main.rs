//! Recon CLI - tag rows of one CSV file by their presence in another.

mod cli;
mod commands;
mod logging;

use std::io::IsTerminal;

use clap::Parser;
use cli::{Cli, Commands};
use commands::reconcile::MatchArgs;
use logging::{LogConfig, init_logging};
use recon::ReconError;

fn main() {
    let cli = Cli::parse();

    init_logging(
        &LogConfig::from_verbosity(cli.verbose)
            .with_format(cli.log_format.into())
            .with_ansi(std::io::stderr().is_terminal()),
    );

    let result = match cli.command {
        Commands::Suggest {
            reference,
            target,
            threshold,
            delimiter,
            json,
        } => commands::suggest::run(reference, target, threshold, delimiter, json),

        Commands::Match {
            reference,
            target,
            map,
            unmap,
            key,
            status_column,
            output,
            threshold,
            delimiter,
            json,
        } => commands::reconcile::run(MatchArgs {
            reference,
            target,
            map,
            unmap,
            key,
            status_column,
            output,
            threshold,
            delimiter,
            json,
        }),

        Commands::Headers { file, delimiter } => commands::headers::run(file, delimiter),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let cancelled = matches!(e.downcast_ref::<ReconError>(), Some(ReconError::Cancelled));
        std::process::exit(if cancelled { 130 } else { 1 });
    }
}
