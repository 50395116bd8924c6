use serde::{Deserialize, Serialize};

/// Number of values describing a periodic box: three lengths and three angles.
pub const BOX_LEN: usize = 6;

/// The periodic unit cell handed to the engine.
///
/// Lengths are in Angstroms and angles in degrees. An all-zero cell means the system
/// is not periodic.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitCell {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl UnitCell {
    pub fn new(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        }
    }

    /// The all-zero cell used when no box is supplied.
    pub fn aperiodic() -> Self {
        Self::default()
    }

    /// A rectangular cell with right angles.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Self {
        Self::new(a, b, c, 90.0, 90.0, 90.0)
    }

    pub fn is_periodic(&self) -> bool {
        self.as_array().iter().any(|&v| v != 0.0)
    }

    pub fn as_array(&self) -> [f64; BOX_LEN] {
        [self.a, self.b, self.c, self.alpha, self.beta, self.gamma]
    }
}

impl From<[f64; BOX_LEN]> for UnitCell {
    fn from(v: [f64; BOX_LEN]) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4], v[5])
    }
}

impl From<UnitCell> for [f64; BOX_LEN] {
    fn from(cell: UnitCell) -> Self {
        cell.as_array()
    }
}
