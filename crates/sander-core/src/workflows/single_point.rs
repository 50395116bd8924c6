use crate::core::energy::EnergyTerms;
use crate::engine::backend::Backend;
use crate::engine::config::SinglePointConfig;
use crate::engine::error::SanderError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::session::Sander;
use nalgebra::Vector3;
use tracing::{info, instrument};

/// Energies and forces of one conformation.
#[derive(Debug, Clone, PartialEq)]
pub struct SinglePoint {
    pub natom: usize,
    pub energy: EnergyTerms,
    /// Flat `natom * 3` forces in kcal/mol/A.
    pub forces: Vec<f64>,
}

impl SinglePoint {
    pub fn forces_as_vectors(&self) -> Vec<Vector3<f64>> {
        self.forces
            .chunks_exact(3)
            .map(|f| Vector3::new(f[0], f[1], f[2]))
            .collect()
    }

    /// Root-mean-square of the per-atom force magnitudes.
    pub fn rms_force(&self) -> f64 {
        if self.natom == 0 {
            return 0.0;
        }
        let sum_sq: f64 = self.forces.iter().map(|f| f * f).sum();
        (sum_sq / self.natom as f64).sqrt()
    }
}

#[instrument(skip_all, name = "single_point_workflow")]
pub fn run<B: Backend>(
    sander: &mut Sander<B>,
    config: SinglePointConfig,
    reporter: &ProgressReporter,
) -> Result<SinglePoint, SanderError> {
    reporter.report(Progress::PhaseStart { name: "Setup" });
    let mut session = sander.scoped(
        config.topology,
        config.coordinates,
        config.cell,
        &config.mm_options,
        config.qm_options.as_ref(),
    )?;
    let natom = session.natom()?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Evaluation" });
    let (energy, forces) = session.energy_forces()?;
    reporter.report(Progress::Message(format!(
        "Total energy: {:.4} kcal/mol",
        energy.tot
    )));
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Cleanup" });
    session.close()?;
    reporter.report(Progress::PhaseFinish);

    info!(natom, total = energy.tot, "Single-point evaluation complete.");
    Ok(SinglePoint {
        natom,
        energy,
        forces,
    })
}
