use crate::config::Preset;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "sander CLI - single-point MM and QM/MM energies and forces from the sander engine.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate energies and forces for one conformation.
    Energy(EnergyArgs),
    /// Print the engine's option presets as TOML.
    Options(OptionsArgs),
}

/// Arguments for the `energy` subcommand.
#[derive(Args, Debug)]
pub struct EnergyArgs {
    /// Path to the calculation configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Override the topology file from the config file.
    #[arg(short = 'p', long, value_name = "PATH")]
    pub topology: Option<PathBuf>,

    /// Read coordinates from a comma-separated table of numbers,
    /// overriding the config file.
    #[arg(short = 'x', long, value_name = "PATH")]
    pub coordinates_file: Option<PathBuf>,

    /// Write the forces (kcal/mol/A, one atom per row) to this CSV file.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub forces_output: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S mm.cut=12.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `options` subcommand.
#[derive(Args, Debug)]
pub struct OptionsArgs {
    /// Which MM preset to print.
    #[arg(long, value_enum, default_value_t = Preset::Gas)]
    pub preset: Preset,

    /// GB model for the gas-phase preset (1, 2, 5, 7 or 8; 0 for vacuum).
    #[arg(long, default_value_t = 0, value_name = "INT")]
    pub igb: i32,

    /// Also print the QM/MM option preset.
    #[arg(long)]
    pub qm: bool,
}
