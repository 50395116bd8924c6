use super::error::NativeError;
use crate::core::cell::UnitCell;
use crate::core::energy::EnergyTerms;
use crate::core::options::{InputOptions, QmInputOptions};
use std::path::Path;

/// The engine entry points the facade drives.
///
/// An implementation owns the engine's process-wide calculation state, so at most one
/// session is active per backend. Arguments arrive already normalized: the topology is
/// a file path, coordinates are a flat `natom * 3` buffer and the box has exactly six
/// values.
pub trait Backend {
    /// Sets up a calculation.
    ///
    /// `qm` is `Some` exactly when the caller supplied QM/MM options.
    fn setup(
        &mut self,
        prmtop: &Path,
        coordinates: &[f64],
        cell: &UnitCell,
        mm: &InputOptions,
        qm: Option<&QmInputOptions>,
    ) -> Result<(), NativeError>;

    /// Tears down the active calculation.
    fn cleanup(&mut self) -> Result<(), NativeError>;

    fn is_setup(&self) -> bool;

    /// Number of atoms in the active calculation.
    fn natom(&self) -> Result<usize, NativeError>;

    /// Energies and the flat `natom * 3` forces of the current conformation.
    fn energy_forces(&mut self) -> Result<(EnergyTerms, Vec<f64>), NativeError>;

    fn set_positions(&mut self, positions: &[f64]) -> Result<(), NativeError>;

    fn get_positions(&self) -> Result<Vec<f64>, NativeError>;

    fn set_box(&mut self, cell: &UnitCell) -> Result<(), NativeError>;

    /// Options tuned for gas-phase or implicit-solvent runs with the given GB model.
    fn gas_input(&self, igb: i32) -> InputOptions;

    /// Options with the engine's PME defaults.
    fn pme_input(&self) -> InputOptions;

    /// Populated QM/MM options.
    fn qm_input(&self) -> QmInputOptions;
}
