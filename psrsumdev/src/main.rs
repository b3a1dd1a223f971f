use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use psrsum_core::error::{Result, SumError};
use psrsum_core::{Config, RunSummary, collect_candidates, report, scan};

/// Summarize a directory of pulsar data files into a README.
///
/// Walks the search directory, reads the headers of every PSRFITS
/// (.fits, .sf, .rf) and filterbank (.fil) file found, and writes a text
/// summary of the distinct telescopes, observers, projects, sources,
/// modes and center frequencies.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to search [default: current working directory]
    #[arg(short = 'd', long = "directory")]
    directory: Option<PathBuf>,

    /// Name of the output file [default: README.txt]
    #[arg(short = 'n', long = "name")]
    name: Option<String>,

    /// Location of the output file [default: current working directory]
    #[arg(short = 'l', long = "location")]
    location: Option<PathBuf>,

    /// Owner of the directory [default: Unknown]
    #[arg(short = 'o', long = "owner")]
    owner: Option<String>,

    /// Person generating the README [default: current user]
    #[arg(short = 'g', long = "generator")]
    generator: Option<String>,

    /// Verbose output; must be exactly true or false
    #[arg(
        short = 'v',
        long = "verbose",
        value_name = "BOOL",
        action = clap::ArgAction::Set,
        default_value_t = false
    )]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match run(cli) {
        Ok(_) => ExitCode::SUCCESS,
        // Declined large-scan confirmation: quiet abort, nothing written.
        Err(SumError::Declined) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<PathBuf> {
    let config = Config::resolve(
        cli.directory,
        cli.name,
        cli.location,
        cli.owner,
        cli.generator,
        cli.verbose,
    )?;
    config.validate()?;

    let started = report::timestamp_now()?;
    let candidates = collect_candidates(&config.data_dir)?;

    let mut summary = RunSummary::default();
    scan(&candidates, &mut summary, confirm_large_scan)?;
    let finished = report::timestamp_now()?;

    report::write_report(&config, &summary, &started, &finished)
}

/// Interactive guard before reading an unexpectedly large candidate set.
/// Only the single character "Y" proceeds.
fn confirm_large_scan(n: usize) -> bool {
    print!("There are {n} files to read. Are you sure you want to proceed? [Y/N] ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    line.trim_end_matches(['\r', '\n']) == "Y"
}
