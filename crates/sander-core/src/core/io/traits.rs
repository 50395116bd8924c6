use crate::core::cell::UnitCell;
use std::io;
use std::path::Path;

/// An in-memory topology that can serialize itself to an Amber topology file.
///
/// The facade writes such topologies to a temporary `.parm7` file right before the
/// engine is set up, because the engine only accepts topology file paths.
pub trait TopologyWriter {
    /// Writes the topology to `path` in a format the engine can read.
    ///
    /// # Arguments
    ///
    /// * `path` - The destination file. It already exists and is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying write fails.
    fn write_parm(&self, path: &Path) -> io::Result<()>;
}

/// Coordinates and an optional periodic box read from a restart file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Restart {
    /// Flat `natom * 3` coordinates in Angstroms.
    pub coordinates: Vec<f64>,
    /// Box lengths and angles, present only for periodic restarts.
    pub cell: Option<[f64; 6]>,
}

impl Restart {
    pub fn has_box(&self) -> bool {
        self.cell.is_some()
    }

    pub fn unit_cell(&self) -> Option<UnitCell> {
        self.cell.map(UnitCell::from)
    }
}

/// Reads restart (inpcrd/rst7) files on behalf of the facade.
pub trait RestartParser {
    /// Parses the restart file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is malformed.
    fn read_restart(&self, path: &Path) -> io::Result<Restart>;
}

impl<F> RestartParser for F
where
    F: Fn(&Path) -> io::Result<Restart>,
{
    fn read_restart(&self, path: &Path) -> io::Result<Restart> {
        self(path)
    }
}
