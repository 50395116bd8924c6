//! Raw declarations for the `libsander` C API.
//!
//! Layouts mirror `sander.h`. They must be kept in sync with the library that is linked;
//! nothing here is checked at build time.

use crate::core::energy::EnergyTerms;
use crate::core::options::{
    DFTB_3RD_ORDER_CAPACITY, MASK_CAPACITY, MAX_QUANTUM_ATOMS, QM_THEORY_CAPACITY,
};
use std::os::raw::{c_char, c_double, c_int};

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SanderInput {
    pub igb: c_int,
    pub alpb: c_int,
    pub gbsa: c_int,
    pub lj1264: c_int,
    pub ipb: c_int,
    pub inp: c_int,
    pub vdwmeth: c_int,
    pub ntb: c_int,
    pub ifqnt: c_int,
    pub extdiel: c_double,
    pub intdiel: c_double,
    pub rgbmax: c_double,
    pub saltcon: c_double,
    pub cut: c_double,
    pub dielc: c_double,
}

#[repr(C)]
#[derive(Clone)]
pub struct QmmmInputOptions {
    pub iqmatoms: [c_int; MAX_QUANTUM_ATOMS],
    pub qmgb: c_int,
    pub lnk_atomic_no: c_int,
    pub ndiis_matrices: c_int,
    pub ndiis_attempts: c_int,
    pub lnk_method: c_int,
    pub qmcharge: c_int,
    pub corecharge: c_int,
    pub buffercharge: c_int,
    pub spin: c_int,
    pub qmqmdx: c_int,
    pub verbosity: c_int,
    pub printcharges: c_int,
    pub printdipole: c_int,
    pub print_eigenvalues: c_int,
    pub peptide_corr: c_int,
    pub itrmax: c_int,
    pub printbondorders: c_int,
    pub qmshake: c_int,
    pub qmmmrij_incore: c_int,
    pub qmqm_erep_incore: c_int,
    pub pseudo_diag: c_int,
    pub qm_ewald: c_int,
    pub qm_pme: c_int,
    pub kmaxqx: c_int,
    pub kmaxqy: c_int,
    pub kmaxqz: c_int,
    pub ksqmaxq: c_int,
    pub kappa: c_double,
    pub qmmm_int: c_int,
    pub adjust_q: c_int,
    pub diag_routine: c_int,
    pub density_predict: c_int,
    pub fock_predict: c_int,
    pub vsolv: c_int,
    pub dftb_maxiter: c_int,
    pub dftb_disper: c_int,
    pub dftb_chg: c_int,
    pub abfqmmm: c_int,
    pub hot_spot: c_int,
    pub qmmm_switch: c_int,
    pub core_iqmatoms: [c_int; MAX_QUANTUM_ATOMS],
    pub buffer_iqmatoms: [c_int; MAX_QUANTUM_ATOMS],
    pub qmcut: c_double,
    pub lnk_dis: c_double,
    pub scfconv: c_double,
    pub errconv: c_double,
    pub dftb_telec: c_double,
    pub dftb_telec_step: c_double,
    pub fockp_d1: c_double,
    pub fockp_d2: c_double,
    pub fockp_d3: c_double,
    pub fockp_d4: c_double,
    pub damp: c_double,
    pub vshift: c_double,
    pub pseudo_diag_criteria: c_double,
    pub min_heavy_mass: c_double,
    pub r_switch_hi: c_double,
    pub r_switch_lo: c_double,
    pub qmmask: [c_char; MASK_CAPACITY],
    pub coremask: [c_char; MASK_CAPACITY],
    pub buffermask: [c_char; MASK_CAPACITY],
    pub centermask: [c_char; MASK_CAPACITY],
    pub dftb_3rd_order: [c_char; DFTB_3RD_ORDER_CAPACITY],
    pub qm_theory: [c_char; QM_THEORY_CAPACITY],
}

impl QmmmInputOptions {
    /// An all-zero record, heap allocated.
    pub fn zeroed() -> Box<Self> {
        Box::new(Self {
            iqmatoms: [0; MAX_QUANTUM_ATOMS],
            qmgb: 0,
            lnk_atomic_no: 0,
            ndiis_matrices: 0,
            ndiis_attempts: 0,
            lnk_method: 0,
            qmcharge: 0,
            corecharge: 0,
            buffercharge: 0,
            spin: 0,
            qmqmdx: 0,
            verbosity: 0,
            printcharges: 0,
            printdipole: 0,
            print_eigenvalues: 0,
            peptide_corr: 0,
            itrmax: 0,
            printbondorders: 0,
            qmshake: 0,
            qmmmrij_incore: 0,
            qmqm_erep_incore: 0,
            pseudo_diag: 0,
            qm_ewald: 0,
            qm_pme: 0,
            kmaxqx: 0,
            kmaxqy: 0,
            kmaxqz: 0,
            ksqmaxq: 0,
            kappa: 0.0,
            qmmm_int: 0,
            adjust_q: 0,
            diag_routine: 0,
            density_predict: 0,
            fock_predict: 0,
            vsolv: 0,
            dftb_maxiter: 0,
            dftb_disper: 0,
            dftb_chg: 0,
            abfqmmm: 0,
            hot_spot: 0,
            qmmm_switch: 0,
            core_iqmatoms: [0; MAX_QUANTUM_ATOMS],
            buffer_iqmatoms: [0; MAX_QUANTUM_ATOMS],
            qmcut: 0.0,
            lnk_dis: 0.0,
            scfconv: 0.0,
            errconv: 0.0,
            dftb_telec: 0.0,
            dftb_telec_step: 0.0,
            fockp_d1: 0.0,
            fockp_d2: 0.0,
            fockp_d3: 0.0,
            fockp_d4: 0.0,
            damp: 0.0,
            vshift: 0.0,
            pseudo_diag_criteria: 0.0,
            min_heavy_mass: 0.0,
            r_switch_hi: 0.0,
            r_switch_lo: 0.0,
            qmmask: [0; MASK_CAPACITY],
            coremask: [0; MASK_CAPACITY],
            buffermask: [0; MASK_CAPACITY],
            centermask: [0; MASK_CAPACITY],
            dftb_3rd_order: [0; DFTB_3RD_ORDER_CAPACITY],
            qm_theory: [0; QM_THEORY_CAPACITY],
        })
    }
}

/// `pot_ene` is laid out exactly like [`EnergyTerms`].
pub type PotEne = EnergyTerms;

#[link(name = "sander")]
unsafe extern "C" {
    /// Returns zero on success.
    pub fn sander_setup(
        prmtop: *const c_char,
        coordinates: *const c_double,
        box_: *const c_double,
        input: *mut SanderInput,
        qm_input: *mut QmmmInputOptions,
    ) -> c_int;

    pub fn sander_cleanup();

    pub fn sander_natom() -> c_int;

    /// `forces` must hold `natom * 3` values.
    pub fn energy_forces(energy: *mut PotEne, forces: *mut c_double);

    /// `positions` must hold `natom * 3` values.
    pub fn set_positions(positions: *const c_double);

    /// `positions` must hold `natom * 3` values.
    pub fn get_positions(positions: *mut c_double);

    pub fn set_box(
        a: c_double,
        b: c_double,
        c: c_double,
        alpha: c_double,
        beta: c_double,
        gamma: c_double,
    );

    pub fn gas_sander_input(input: *mut SanderInput, igb: *const c_int);

    pub fn pme_sander_input(input: *mut SanderInput);

    pub fn qm_sander_input(qm_input: *mut QmmmInputOptions);
}
