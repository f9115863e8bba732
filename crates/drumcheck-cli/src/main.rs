//! Drumcheck CLI - measure drum hits and compare a render against a recording.

mod commands;
mod report;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "drumcheck")]
#[command(author, version, about = "Drum sample envelope and transient comparison", long_about = None)]
struct Cli {
    /// Log more to stderr (-v info, -vv debug); overrides RUST_LOG
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure a single recording
    Analyze(commands::analyze::AnalyzeArgs),

    /// Compare a candidate against a reference recording
    Compare(commands::compare::CompareArgs),

    /// Show WAV file information
    Info(commands::info::InfoArgs),

    /// Print or save the effective analysis profile
    Profile(commands::profile::ProfileArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Compare(args) => commands::compare::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Profile(args) => commands::profile::run(args),
    }
}

/// Logs go to stderr so report text and JSON on stdout stay clean.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
