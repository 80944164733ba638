//! cafpack CLI - Build configuration and packaging for CAF

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cafpack::util::diagnostic::{emit, Diagnostic, RecipeError};
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        match e.downcast_ref::<RecipeError>() {
            Some(err) => emit(&Diagnostic::from(err), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("cafpack=debug")
    } else {
        EnvFilter::new("cafpack=info")
    };

    // stdout is reserved for command output (`--json`)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Configure(args) => commands::configure::execute(args),
        Commands::Build(args) => commands::build::execute(args),
        Commands::Package(args) => commands::package::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Matrix(args) => commands::matrix::execute(args),
        Commands::Toolchain(args) => commands::toolchain::execute(args),
    }
}
