use serde::{Deserialize, Serialize};

/// Energy decomposition of the current conformation, in kcal/mol.
///
/// The field order matches the engine's `pot_ene` record so that the struct can be
/// filled in place across the FFI boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EnergyTerms {
    /// Total potential energy.
    pub tot: f64,
    /// van der Waals energy (excluding 1-4).
    pub vdw: f64,
    /// Electrostatic energy (excluding 1-4).
    pub elec: f64,
    /// Generalized Born polar solvation energy.
    pub gb: f64,
    pub bond: f64,
    pub angle: f64,
    /// Dihedral energy (including impropers).
    pub dihedral: f64,
    /// 1-4 van der Waals energy.
    pub vdw_14: f64,
    /// 1-4 electrostatic energy.
    pub elec_14: f64,
    /// Restraint energy.
    pub constraint: f64,
    /// Polarization energy (polarizable force fields).
    pub polar: f64,
    /// Hydrogen bond (10-12 potential) energy.
    pub hbond: f64,
    /// Nonpolar solvation energy for implicit solvent.
    pub surf: f64,
    /// QM energy.
    pub scf: f64,
    /// Dispersion nonpolar solvation energy from PB.
    pub disp: f64,
    /// dV/dlambda from thermodynamic integration.
    pub dvdl: f64,
    /// Urey-Bradley energy (CHARMM force fields only).
    pub angle_ub: f64,
    /// Improper torsion energy (CHARMM force fields only).
    pub imp: f64,
    /// Coupled torsion correction map energy (CHARMM force fields only).
    pub cmap: f64,
    /// Energy map restraint energy.
    pub emap: f64,
    /// Locally enhanced sampling energy.
    pub les: f64,
    /// NOE restraint energy.
    pub noe: f64,
    /// PB polar solvation energy.
    pub pb: f64,
    /// 3D-RISM solvation energy.
    pub rism: f64,
    /// Charge transfer energy.
    pub ct: f64,
    /// Accelerated MD boost energy.
    pub amd_boost: f64,
}

impl EnergyTerms {
    /// All terms as `(name, value)` pairs, in engine order.
    pub fn terms(&self) -> [(&'static str, f64); 26] {
        [
            ("tot", self.tot),
            ("vdw", self.vdw),
            ("elec", self.elec),
            ("gb", self.gb),
            ("bond", self.bond),
            ("angle", self.angle),
            ("dihedral", self.dihedral),
            ("vdw_14", self.vdw_14),
            ("elec_14", self.elec_14),
            ("constraint", self.constraint),
            ("polar", self.polar),
            ("hbond", self.hbond),
            ("surf", self.surf),
            ("scf", self.scf),
            ("disp", self.disp),
            ("dvdl", self.dvdl),
            ("angle_ub", self.angle_ub),
            ("imp", self.imp),
            ("cmap", self.cmap),
            ("emap", self.emap),
            ("les", self.les),
            ("noe", self.noe),
            ("pb", self.pb),
            ("rism", self.rism),
            ("ct", self.ct),
            ("amd_boost", self.amd_boost),
        ]
    }

    /// Terms that contribute to this conformation. The total is always included.
    pub fn active_terms(&self) -> impl Iterator<Item = (&'static str, f64)> {
        self.terms()
            .into_iter()
            .filter(|&(name, value)| name == "tot" || value != 0.0)
    }
}
