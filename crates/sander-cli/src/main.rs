#![cfg_attr(not(feature = "native"), allow(dead_code))]

mod cli;
mod commands;
mod config;
mod error;
mod logging;
#[cfg(test)]
mod testing;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("sander CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let command_result = dispatch(cli.command);

    match &command_result {
        Ok(_) => {
            info!("✅ Command completed successfully.");
        }
        Err(e) => {
            error!("❌ Command failed: {}", e);
        }
    }

    command_result
}

#[cfg(feature = "native")]
fn dispatch(command: Commands) -> Result<()> {
    use sander::engine::session::Sander;

    let mut sander = Sander::native()?;
    match command {
        Commands::Energy(args) => {
            info!("Dispatching to 'energy' command.");
            commands::energy::run(args, &mut sander)
        }
        Commands::Options(args) => {
            info!("Dispatching to 'options' command.");
            commands::options::run(args, &sander)
        }
    }
}

#[cfg(not(feature = "native"))]
fn dispatch(command: Commands) -> Result<()> {
    let name = match command {
        Commands::Energy(_) => "energy",
        Commands::Options(_) => "options",
    };
    Err(error::CliError::Config(format!(
        "'{}' needs the native sander engine, but this binary was built without it. \
         Rebuild with `--features native` and make libsander available to the linker.",
        name
    )))
}
