//! Lab transfer command-line tool.
//!
//! Usage:
//!   labtransfer check dump.zip --collect-all
//!   labtransfer normalize dump.json dump.zip
//!   labtransfer --config labtransfer.toml stats dump.json

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use labtransfer_cli::{check, normalize, stats, CliConfig};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "labtransfer")]
#[command(about = "Check, normalize and inspect lab transfer documents")]
struct Args {
    /// TOML file with [import] and [export] tables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dry-run import into an empty store
    Check {
        /// Document (.json) or container (.zip)
        input: PathBuf,

        /// Keep going after a failed record and list every failure
        #[arg(long)]
        collect_all: bool,
    },
    /// Import a document, then export it again
    Normalize {
        input: PathBuf,

        /// Written as a document or a container depending on its extension
        output: PathBuf,

        #[arg(long)]
        collect_all: bool,
    },
    /// Count the elements of each section without importing
    Stats { input: PathBuf },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = CliConfig::load(args.config.as_deref())?;
    debug!("Configuration: {:?}", config);

    match args.command {
        Command::Check { input, collect_all } => {
            let report = check(&config, &input, collect_all)?;
            println!("{}: {}", input.display(), report.stats);
            for failure in &report.failures {
                println!("\n{failure}");
            }
            if !report.is_clean() {
                bail!("{} records could not be imported", report.failures.len());
            }
        }
        Command::Normalize {
            input,
            output,
            collect_all,
        } => {
            let outcome = normalize(&config, &input, &output, collect_all)?;
            for failure in &outcome.report.failures {
                println!("\n{failure}");
            }
            if outcome.written {
                println!("{} -> {}: {}", input.display(), output.display(), outcome.report.stats);
            } else {
                println!("{}: nothing to write", input.display());
            }
        }
        Command::Stats { input } => {
            for (kind, count) in stats(&input)? {
                println!("{:<28} {}", kind.section(), count);
            }
        }
    }
    Ok(())
}
