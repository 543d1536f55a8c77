mod cli;
mod commands;

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{Cli, Commands};
use commands::{legend, merge, summarize};

/// Log to stderr; RUST_LOG overrides the level picked by -v.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn run() -> Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Merge(args) => merge::run(&cli, args),
        Commands::Legend(args) => legend::run(&cli, args),
        Commands::Summarize(args) => summarize::run(&cli, args),
    }
}

fn main() -> Result<()> { run() }
