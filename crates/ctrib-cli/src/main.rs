//! # ctrib CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros; verbosity maps `-v` counts onto a tracing
//! `EnvFilter`.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ctrib_cli::classify::{run_classify, ClassifyArgs};
use ctrib_cli::ingest::{run_ingest, IngestArgs};
use ctrib_cli::verify::{run_verify, VerifyArgs};

/// ctrib — NCM/Anexo tax-classification toolchain.
///
/// Loads government classification payloads (classTrib rules, annex/NCM
/// tables) into an immutable snapshot and resolves product codes against
/// it.
#[derive(Parser, Debug)]
#[command(name = "ctrib", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load payloads, build a snapshot, and report what was kept/skipped.
    Ingest(IngestArgs),

    /// Resolve a product code against a loaded snapshot.
    Classify(ClassifyArgs),

    /// Check rule/annex consistency and print diagnostic counts.
    Verify(VerifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Ingest(args) => run_ingest(&args),
        Commands::Classify(args) => run_classify(&args),
        Commands::Verify(args) => run_verify(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
