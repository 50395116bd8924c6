//! # Native Module
//!
//! The [`Backend`] implementation over the linked `libsander`.
//!
//! The engine keeps one calculation in process-global state, so the handle to it is a
//! process-wide singleton: [`NativeBackend::acquire`] succeeds once until the returned
//! handle is dropped. Dropping the handle also tears down any calculation left active.
//!
//! Linking is left to the build environment (for example
//! `RUSTFLAGS="-L $AMBERHOME/lib"`).

pub mod ffi;

use crate::core::cell::UnitCell;
use crate::core::energy::EnergyTerms;
use crate::core::options::{
    DFTB_3RD_ORDER_CAPACITY, InputOptions, MASK_CAPACITY, MAX_QUANTUM_ATOMS, QM_THEORY_CAPACITY,
    QmInputOptions,
};
use crate::engine::backend::Backend;
use crate::engine::error::{NativeError, SanderError};
use crate::engine::session::Sander;
use ffi::{QmmmInputOptions, SanderInput};
use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

static HANDLE_CLAIMED: AtomicBool = AtomicBool::new(false);

/// The process-wide handle to the native engine.
#[derive(Debug)]
pub struct NativeBackend {
    active: bool,
}

impl NativeBackend {
    /// Claims the engine for this process.
    ///
    /// # Errors
    ///
    /// Returns [`NativeError::HandleInUse`] while another handle is alive.
    pub fn acquire() -> Result<Self, NativeError> {
        HANDLE_CLAIMED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| NativeError::HandleInUse)?;
        debug!("Acquired the native sander handle.");
        Ok(Self { active: false })
    }

    fn require_active(&self) -> Result<(), NativeError> {
        if self.active {
            Ok(())
        } else {
            Err(NativeError::NotSetUp)
        }
    }

    fn active_natom(&self) -> Result<usize, NativeError> {
        self.require_active()?;
        // SAFETY: a calculation is active.
        let natom = unsafe { ffi::sander_natom() };
        usize::try_from(natom)
            .map_err(|_| NativeError::InvalidInput(format!("engine reported {natom} atoms")))
    }
}

impl Drop for NativeBackend {
    fn drop(&mut self) {
        if self.active {
            warn!("Native handle dropped with an active calculation; cleaning up.");
            // SAFETY: a calculation is active and no other handle exists.
            unsafe { ffi::sander_cleanup() };
            self.active = false;
        }
        HANDLE_CLAIMED.store(false, Ordering::Release);
    }
}

impl Sander<NativeBackend> {
    /// A facade over the process-wide native engine.
    pub fn native() -> Result<Self, SanderError> {
        Ok(Sander::new(NativeBackend::acquire()?))
    }
}

impl Backend for NativeBackend {
    fn setup(
        &mut self,
        prmtop: &Path,
        coordinates: &[f64],
        cell: &UnitCell,
        mm: &InputOptions,
        qm: Option<&QmInputOptions>,
    ) -> Result<(), NativeError> {
        if self.active {
            return Err(NativeError::AlreadySetUp);
        }
        let prmtop = path_to_cstring(prmtop)?;
        let mut input = SanderInput::from(mm);
        let mut qm_input = match qm {
            Some(options) => to_native_qm(options)?,
            None => QmmmInputOptions::zeroed(),
        };
        let cell = cell.as_array();

        // SAFETY: every pointer refers to a live, correctly laid out buffer for the
        // duration of the call. The engine reads `natom * 3` coordinates, where `natom`
        // comes from the topology.
        let status = unsafe {
            ffi::sander_setup(
                prmtop.as_ptr(),
                coordinates.as_ptr(),
                cell.as_ptr(),
                &mut input,
                &mut *qm_input,
            )
        };
        if status != 0 {
            return Err(NativeError::SetupFailed { code: status });
        }
        self.active = true;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<(), NativeError> {
        self.require_active()?;
        // SAFETY: a calculation is active.
        unsafe { ffi::sander_cleanup() };
        self.active = false;
        Ok(())
    }

    fn is_setup(&self) -> bool {
        self.active
    }

    fn natom(&self) -> Result<usize, NativeError> {
        self.active_natom()
    }

    fn energy_forces(&mut self) -> Result<(EnergyTerms, Vec<f64>), NativeError> {
        let natom = self.active_natom()?;
        let mut energy = EnergyTerms::default();
        let mut forces = vec![0.0; natom * 3];
        // SAFETY: `forces` holds `natom * 3` values and `EnergyTerms` matches `pot_ene`.
        unsafe { ffi::energy_forces(&mut energy, forces.as_mut_ptr()) };
        Ok((energy, forces))
    }

    fn set_positions(&mut self, positions: &[f64]) -> Result<(), NativeError> {
        let natom = self.active_natom()?;
        if positions.len() != natom * 3 {
            return Err(NativeError::InvalidInput(format!(
                "expected {} position values for {natom} atoms, found {}",
                natom * 3,
                positions.len()
            )));
        }
        // SAFETY: length checked above.
        unsafe { ffi::set_positions(positions.as_ptr()) };
        Ok(())
    }

    fn get_positions(&self) -> Result<Vec<f64>, NativeError> {
        let natom = self.active_natom()?;
        let mut positions = vec![0.0; natom * 3];
        // SAFETY: `positions` holds `natom * 3` values.
        unsafe { ffi::get_positions(positions.as_mut_ptr()) };
        Ok(positions)
    }

    fn set_box(&mut self, cell: &UnitCell) -> Result<(), NativeError> {
        self.require_active()?;
        // SAFETY: a calculation is active; arguments are passed by value.
        unsafe { ffi::set_box(cell.a, cell.b, cell.c, cell.alpha, cell.beta, cell.gamma) };
        Ok(())
    }

    fn gas_input(&self, igb: i32) -> InputOptions {
        let mut input = SanderInput::default();
        let igb: c_int = igb;
        // SAFETY: both pointers refer to live locals.
        unsafe { ffi::gas_sander_input(&mut input, &igb) };
        InputOptions::from(&input)
    }

    fn pme_input(&self) -> InputOptions {
        let mut input = SanderInput::default();
        // SAFETY: `input` is a live local.
        unsafe { ffi::pme_sander_input(&mut input) };
        InputOptions::from(&input)
    }

    fn qm_input(&self) -> QmInputOptions {
        let mut qm_input = QmmmInputOptions::zeroed();
        // SAFETY: `qm_input` is a live, correctly sized allocation.
        unsafe { ffi::qm_sander_input(&mut *qm_input) };
        from_native_qm(&qm_input)
    }
}

impl From<&InputOptions> for SanderInput {
    fn from(o: &InputOptions) -> Self {
        Self {
            igb: o.igb,
            alpb: o.alpb,
            gbsa: o.gbsa,
            lj1264: o.lj1264,
            ipb: o.ipb,
            inp: o.inp,
            vdwmeth: o.vdwmeth,
            ntb: o.ntb,
            ifqnt: o.ifqnt,
            extdiel: o.extdiel,
            intdiel: o.intdiel,
            rgbmax: o.rgbmax,
            saltcon: o.saltcon,
            cut: o.cut,
            dielc: o.dielc,
        }
    }
}

impl From<&SanderInput> for InputOptions {
    fn from(i: &SanderInput) -> Self {
        Self {
            igb: i.igb,
            alpb: i.alpb,
            gbsa: i.gbsa,
            lj1264: i.lj1264,
            ipb: i.ipb,
            inp: i.inp,
            vdwmeth: i.vdwmeth,
            ntb: i.ntb,
            ifqnt: i.ifqnt,
            extdiel: i.extdiel,
            intdiel: i.intdiel,
            rgbmax: i.rgbmax,
            saltcon: i.saltcon,
            cut: i.cut,
            dielc: i.dielc,
        }
    }
}

fn path_to_cstring(path: &Path) -> Result<CString, NativeError> {
    let text = path.to_str().ok_or_else(|| {
        NativeError::InvalidInput(format!("topology path {path:?} is not valid UTF-8"))
    })?;
    CString::new(text).map_err(|_| {
        NativeError::InvalidInput(format!("topology path {path:?} contains a NUL byte"))
    })
}

fn copy_atoms(
    name: &str,
    atoms: &[i32],
    dest: &mut [c_int; MAX_QUANTUM_ATOMS],
) -> Result<(), NativeError> {
    if atoms.len() > MAX_QUANTUM_ATOMS {
        return Err(NativeError::InvalidInput(format!(
            "{name} lists {} atoms; at most {MAX_QUANTUM_ATOMS} are supported",
            atoms.len()
        )));
    }
    dest[..atoms.len()].copy_from_slice(atoms);
    Ok(())
}

/// Copies `value` into a NUL-terminated fixed buffer.
fn copy_str<const N: usize>(
    name: &str,
    value: &str,
    dest: &mut [c_char; N],
) -> Result<(), NativeError> {
    let bytes = value.as_bytes();
    if bytes.contains(&0) {
        return Err(NativeError::InvalidInput(format!(
            "{name} contains a NUL byte"
        )));
    }
    if bytes.len() >= N {
        return Err(NativeError::InvalidInput(format!(
            "{name} is {} bytes long; at most {} are supported",
            bytes.len(),
            N - 1
        )));
    }
    for (d, &b) in dest.iter_mut().zip(bytes) {
        *d = b as c_char;
    }
    Ok(())
}

fn atoms_from(src: &[c_int]) -> Vec<i32> {
    src.iter().copied().take_while(|&a| a != 0).collect()
}

fn str_from(src: &[c_char]) -> String {
    let bytes: Vec<u8> = src
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).trim_end().to_string()
}

fn to_native_qm(o: &QmInputOptions) -> Result<Box<QmmmInputOptions>, NativeError> {
    let mut q = QmmmInputOptions::zeroed();
    copy_atoms("iqmatoms", &o.iqmatoms, &mut q.iqmatoms)?;
    copy_atoms("core_iqmatoms", &o.core_iqmatoms, &mut q.core_iqmatoms)?;
    copy_atoms("buffer_iqmatoms", &o.buffer_iqmatoms, &mut q.buffer_iqmatoms)?;
    copy_str::<MASK_CAPACITY>("qmmask", &o.qmmask, &mut q.qmmask)?;
    copy_str::<MASK_CAPACITY>("coremask", &o.coremask, &mut q.coremask)?;
    copy_str::<MASK_CAPACITY>("buffermask", &o.buffermask, &mut q.buffermask)?;
    copy_str::<MASK_CAPACITY>("centermask", &o.centermask, &mut q.centermask)?;
    copy_str::<DFTB_3RD_ORDER_CAPACITY>("dftb_3rd_order", &o.dftb_3rd_order, &mut q.dftb_3rd_order)?;
    copy_str::<QM_THEORY_CAPACITY>("qm_theory", &o.qm_theory, &mut q.qm_theory)?;

    q.qmgb = o.qmgb;
    q.lnk_atomic_no = o.lnk_atomic_no;
    q.ndiis_matrices = o.ndiis_matrices;
    q.ndiis_attempts = o.ndiis_attempts;
    q.lnk_method = o.lnk_method;
    q.qmcharge = o.qmcharge;
    q.corecharge = o.corecharge;
    q.buffercharge = o.buffercharge;
    q.spin = o.spin;
    q.qmqmdx = o.qmqmdx;
    q.verbosity = o.verbosity;
    q.printcharges = o.printcharges;
    q.printdipole = o.printdipole;
    q.print_eigenvalues = o.print_eigenvalues;
    q.peptide_corr = o.peptide_corr;
    q.itrmax = o.itrmax;
    q.printbondorders = o.printbondorders;
    q.qmshake = o.qmshake;
    q.qmmmrij_incore = o.qmmmrij_incore;
    q.qmqm_erep_incore = o.qmqm_erep_incore;
    q.pseudo_diag = o.pseudo_diag;
    q.qm_ewald = o.qm_ewald;
    q.qm_pme = o.qm_pme;
    q.kmaxqx = o.kmaxqx;
    q.kmaxqy = o.kmaxqy;
    q.kmaxqz = o.kmaxqz;
    q.ksqmaxq = o.ksqmaxq;
    q.kappa = o.kappa;
    q.qmmm_int = o.qmmm_int;
    q.adjust_q = o.adjust_q;
    q.diag_routine = o.diag_routine;
    q.density_predict = o.density_predict;
    q.fock_predict = o.fock_predict;
    q.vsolv = o.vsolv;
    q.dftb_maxiter = o.dftb_maxiter;
    q.dftb_disper = o.dftb_disper;
    q.dftb_chg = o.dftb_chg;
    q.abfqmmm = o.abfqmmm;
    q.hot_spot = o.hot_spot;
    q.qmmm_switch = o.qmmm_switch;

    q.qmcut = o.qmcut;
    q.lnk_dis = o.lnk_dis;
    q.scfconv = o.scfconv;
    q.errconv = o.errconv;
    q.dftb_telec = o.dftb_telec;
    q.dftb_telec_step = o.dftb_telec_step;
    q.fockp_d1 = o.fockp_d1;
    q.fockp_d2 = o.fockp_d2;
    q.fockp_d3 = o.fockp_d3;
    q.fockp_d4 = o.fockp_d4;
    q.damp = o.damp;
    q.vshift = o.vshift;
    q.pseudo_diag_criteria = o.pseudo_diag_criteria;
    q.min_heavy_mass = o.min_heavy_mass;
    q.r_switch_hi = o.r_switch_hi;
    q.r_switch_lo = o.r_switch_lo;
    Ok(q)
}

fn from_native_qm(q: &QmmmInputOptions) -> QmInputOptions {
    QmInputOptions {
        iqmatoms: atoms_from(&q.iqmatoms),
        qmgb: q.qmgb,
        lnk_atomic_no: q.lnk_atomic_no,
        ndiis_matrices: q.ndiis_matrices,
        ndiis_attempts: q.ndiis_attempts,
        lnk_method: q.lnk_method,
        qmcharge: q.qmcharge,
        corecharge: q.corecharge,
        buffercharge: q.buffercharge,
        spin: q.spin,
        qmqmdx: q.qmqmdx,
        verbosity: q.verbosity,
        printcharges: q.printcharges,
        printdipole: q.printdipole,
        print_eigenvalues: q.print_eigenvalues,
        peptide_corr: q.peptide_corr,
        itrmax: q.itrmax,
        printbondorders: q.printbondorders,
        qmshake: q.qmshake,
        qmmmrij_incore: q.qmmmrij_incore,
        qmqm_erep_incore: q.qmqm_erep_incore,
        pseudo_diag: q.pseudo_diag,
        qm_ewald: q.qm_ewald,
        qm_pme: q.qm_pme,
        kmaxqx: q.kmaxqx,
        kmaxqy: q.kmaxqy,
        kmaxqz: q.kmaxqz,
        ksqmaxq: q.ksqmaxq,
        kappa: q.kappa,
        qmmm_int: q.qmmm_int,
        adjust_q: q.adjust_q,
        diag_routine: q.diag_routine,
        density_predict: q.density_predict,
        fock_predict: q.fock_predict,
        vsolv: q.vsolv,
        dftb_maxiter: q.dftb_maxiter,
        dftb_disper: q.dftb_disper,
        dftb_chg: q.dftb_chg,
        abfqmmm: q.abfqmmm,
        hot_spot: q.hot_spot,
        qmmm_switch: q.qmmm_switch,
        core_iqmatoms: atoms_from(&q.core_iqmatoms),
        buffer_iqmatoms: atoms_from(&q.buffer_iqmatoms),
        qmcut: q.qmcut,
        lnk_dis: q.lnk_dis,
        scfconv: q.scfconv,
        errconv: q.errconv,
        dftb_telec: q.dftb_telec,
        dftb_telec_step: q.dftb_telec_step,
        fockp_d1: q.fockp_d1,
        fockp_d2: q.fockp_d2,
        fockp_d3: q.fockp_d3,
        fockp_d4: q.fockp_d4,
        damp: q.damp,
        vshift: q.vshift,
        pseudo_diag_criteria: q.pseudo_diag_criteria,
        min_heavy_mass: q.min_heavy_mass,
        r_switch_hi: q.r_switch_hi,
        r_switch_lo: q.r_switch_lo,
        qmmask: str_from(&q.qmmask),
        coremask: str_from(&q.coremask),
        buffermask: str_from(&q.buffermask),
        centermask: str_from(&q.centermask),
        dftb_3rd_order: str_from(&q.dftb_3rd_order),
        qm_theory: str_from(&q.qm_theory),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn handle_can_be_claimed_once_at_a_time() {
        let first = NativeBackend::acquire().unwrap();
        assert_eq!(
            NativeBackend::acquire().unwrap_err(),
            NativeError::HandleInUse
        );
        assert!(!first.is_setup());
        drop(first);

        let again = NativeBackend::acquire().unwrap();
        drop(again);
    }

    #[test]
    #[serial]
    fn inactive_handle_reports_not_set_up() {
        let mut backend = NativeBackend::acquire().unwrap();
        assert_eq!(backend.cleanup(), Err(NativeError::NotSetUp));
        assert_eq!(backend.natom(), Err(NativeError::NotSetUp));
        assert_eq!(backend.set_positions(&[0.0; 3]), Err(NativeError::NotSetUp));
    }

    #[test]
    fn mm_options_convert_field_by_field() {
        let options = InputOptions {
            igb: 8,
            ntb: 0,
            saltcon: 0.1,
            cut: 999.0,
            ..Default::default()
        };
        assert_eq!(InputOptions::from(&SanderInput::from(&options)), options);
    }

    #[test]
    fn qm_options_survive_the_fixed_size_layout() {
        let options = QmInputOptions {
            iqmatoms: vec![1, 2, 3],
            qmmask: ":1-2".to_string(),
            qm_theory: "DFTB".to_string(),
            qmcharge: -1,
            kappa: 0.3,
            scfconv: 1e-8,
            ..Default::default()
        };
        let native = to_native_qm(&options).unwrap();
        assert_eq!(&native.iqmatoms[..4], &[1, 2, 3, 0]);
        assert_eq!(native.qm_theory[4], 0);
        assert_eq!(from_native_qm(&native), options);
    }

    #[test]
    fn over_long_qm_theory_is_invalid_input() {
        let options = QmInputOptions {
            qm_theory: "X".repeat(QM_THEORY_CAPACITY),
            ..Default::default()
        };
        assert!(matches!(
            to_native_qm(&options),
            Err(NativeError::InvalidInput(msg)) if msg.contains("qm_theory")
        ));
    }

    #[test]
    fn too_many_qm_atoms_is_invalid_input() {
        let options = QmInputOptions {
            iqmatoms: vec![1; MAX_QUANTUM_ATOMS + 1],
            ..Default::default()
        };
        assert!(matches!(
            to_native_qm(&options),
            Err(NativeError::InvalidInput(_))
        ));
    }

    #[test]
    fn topology_path_with_nul_is_rejected() {
        assert!(matches!(
            path_to_cstring(Path::new("bad\0path")),
            Err(NativeError::InvalidInput(_))
        ));
    }
}
