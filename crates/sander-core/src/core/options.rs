//! Option structs passed through to the engine.
//!
//! The facade never interprets these beyond [`InputOptions::qmmm_requested`]. Populated
//! presets come from the engine itself (see `Backend::gas_input`, `Backend::pme_input`
//! and `Backend::qm_input`); the `Default` impls are all-zero records.

use serde::{Deserialize, Serialize};

/// Maximum number of atoms in any of the QM atom lists.
pub const MAX_QUANTUM_ATOMS: usize = 10_000;
/// Capacity of the QM, core, buffer and center mask strings, including the terminator.
pub const MASK_CAPACITY: usize = 8192;
/// Capacity of the DFTB third-order parameter file name, including the terminator.
pub const DFTB_3RD_ORDER_CAPACITY: usize = 256;
/// Capacity of the QM theory name, including the terminator.
pub const QM_THEORY_CAPACITY: usize = 12;

/// Molecular mechanics options for a calculation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputOptions {
    /// GB model to use.
    pub igb: i32,
    /// Whether to use ALPB.
    pub alpb: i32,
    /// Whether to add a SASA term to GB.
    pub gbsa: i32,
    /// Use the 12-6-4 potential.
    pub lj1264: i32,
    /// Use Poisson-Boltzmann.
    pub ipb: i32,
    /// PB nonpolar solvation model.
    pub inp: i32,
    /// Long-range dispersion correction.
    pub vdwmeth: i32,
    /// Periodic boundary conditions.
    pub ntb: i32,
    /// Whether to use QM/MM.
    pub ifqnt: i32,

    /// External dielectric constant for GB.
    pub extdiel: f64,
    /// Internal dielectric constant for GB.
    pub intdiel: f64,
    /// Effective Born radii cutoff.
    pub rgbmax: f64,
    /// GB salt concentration (M).
    pub saltcon: f64,
    /// Nonbonded cutoff.
    pub cut: f64,
    /// Dielectric constant.
    pub dielc: f64,
}

impl InputOptions {
    /// True when these options ask for a QM/MM calculation, which requires
    /// [`QmInputOptions`] at setup.
    pub fn qmmm_requested(&self) -> bool {
        self.ifqnt != 0
    }
}

/// QM/MM options, required exactly when [`InputOptions::ifqnt`] is set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct QmInputOptions {
    /// Atom numbers of the QM region (at most [`MAX_QUANTUM_ATOMS`]).
    pub iqmatoms: Vec<i32>,
    pub qmgb: i32,
    pub lnk_atomic_no: i32,
    pub ndiis_matrices: i32,
    pub ndiis_attempts: i32,
    pub lnk_method: i32,
    pub qmcharge: i32,
    pub corecharge: i32,
    pub buffercharge: i32,
    pub spin: i32,
    pub qmqmdx: i32,
    pub verbosity: i32,
    pub printcharges: i32,
    pub printdipole: i32,
    pub print_eigenvalues: i32,
    pub peptide_corr: i32,
    pub itrmax: i32,
    pub printbondorders: i32,
    pub qmshake: i32,
    pub qmmmrij_incore: i32,
    pub qmqm_erep_incore: i32,
    pub pseudo_diag: i32,
    pub qm_ewald: i32,
    pub qm_pme: i32,
    pub kmaxqx: i32,
    pub kmaxqy: i32,
    pub kmaxqz: i32,
    pub ksqmaxq: i32,
    /// Ewald coefficient for QM/MM Ewald.
    pub kappa: f64,
    pub qmmm_int: i32,
    pub adjust_q: i32,
    pub diag_routine: i32,
    pub density_predict: i32,
    pub fock_predict: i32,
    pub vsolv: i32,
    pub dftb_maxiter: i32,
    pub dftb_disper: i32,
    pub dftb_chg: i32,
    pub abfqmmm: i32,
    pub hot_spot: i32,
    pub qmmm_switch: i32,
    /// Core region atom numbers for adaptive buffered QM/MM.
    pub core_iqmatoms: Vec<i32>,
    /// Buffer region atom numbers for adaptive buffered QM/MM.
    pub buffer_iqmatoms: Vec<i32>,

    pub qmcut: f64,
    pub lnk_dis: f64,
    pub scfconv: f64,
    pub errconv: f64,
    pub dftb_telec: f64,
    pub dftb_telec_step: f64,
    pub fockp_d1: f64,
    pub fockp_d2: f64,
    pub fockp_d3: f64,
    pub fockp_d4: f64,
    pub damp: f64,
    pub vshift: f64,
    pub pseudo_diag_criteria: f64,
    pub min_heavy_mass: f64,
    pub r_switch_hi: f64,
    pub r_switch_lo: f64,

    /// Amber mask selecting the QM region.
    pub qmmask: String,
    pub coremask: String,
    pub buffermask: String,
    pub centermask: String,
    /// DFTB third-order parameter file.
    pub dftb_3rd_order: String,
    /// Semiempirical or DFTB Hamiltonian name, e.g. `PM3` or `DFTB`.
    pub qm_theory: String,
}
