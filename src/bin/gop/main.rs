//! gop CLI - project-local dependency vendoring for Go

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("gop=debug")
    } else {
        EnvFilter::new("gop=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::Init(args) => commands::init::execute(args),
        Commands::Ensure(args) => commands::ensure::execute(args),
        Commands::Imports(args) => commands::imports::execute(args, cli.verbose),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
