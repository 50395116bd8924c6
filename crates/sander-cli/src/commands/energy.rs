use crate::cli::EnergyArgs;
use crate::config::PartialCalculationConfig;
use crate::error::Result;
use crate::utils::parser;
use crate::utils::progress::CliProgressHandler;
use anyhow::Context;
use sander::engine::backend::Backend;
use sander::engine::progress::ProgressReporter;
use sander::engine::session::Sander;
use sander::workflows::single_point::{self, SinglePoint};
use std::fmt::{self, Write};
use tracing::info;

pub fn run<B: Backend>(args: EnergyArgs, sander: &mut Sander<B>) -> Result<()> {
    let partial_config = PartialCalculationConfig::from_file(&args.config)?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args, sander)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting single-point evaluation...");
    let result = single_point::run(sander, config, &reporter)?;
    info!("Evaluation finished for {} atom(s).", result.natom);

    let mut report = String::new();
    format_report(&mut report, &result).context("Failed to format the energy report")?;
    print!("{}", report);

    if let Some(path) = &args.forces_output {
        info!("Writing forces to {:?}", path);
        parser::write_forces(path, &result.forces)
            .with_context(|| format!("Failed to write forces to '{}'", path.display()))?;
        println!("✓ Forces written to: {}", path.display());
    }
    Ok(())
}

/// Non-zero energy terms (kcal/mol), always including the total.
fn format_report(out: &mut impl Write, result: &SinglePoint) -> fmt::Result {
    writeln!(out, "Atoms: {}", result.natom)?;
    writeln!(out, "Energy terms (kcal/mol):")?;
    for (name, value) in result.energy.active_terms() {
        writeln!(out, "  {:<12}{:>18.6}", name, value)?;
    }
    writeln!(out, "RMS force: {:.6} kcal/mol/A", result.rms_force())
}
