//! Stagehand CLI - stage archives into working directories and pack them
//! back up.

mod cli;
mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match run(&cli, &*formatter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(operation_name(&cli.command), &err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &cli::Cli, formatter: &dyn output::OutputFormatter) -> Result<()> {
    match &cli.command {
        cli::Commands::Extract(args) => commands::extract::execute(args, formatter),
        cli::Commands::Build(args) => commands::build::execute(args, formatter),
        cli::Commands::ListFiles(args) => commands::list_files::execute(args, formatter),
        cli::Commands::Inspect(args) => commands::inspect::execute(args, formatter),
        cli::Commands::Clean(args) => commands::clean::execute(args, formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}

const fn operation_name(command: &cli::Commands) -> &'static str {
    match command {
        cli::Commands::Extract(_) => "extract",
        cli::Commands::Build(_) => "build",
        cli::Commands::ListFiles(_) => "list-files",
        cli::Commands::Inspect(_) => "inspect",
        cli::Commands::Clean(_) => "clean",
        cli::Commands::Completion(_) => "completion",
    }
}

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` overrides the
/// level picked from the flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
