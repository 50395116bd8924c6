use super::backend::Backend;
use super::error::SanderError;
use super::normalize::{self, CoordinateSource, ResolvedTopology};
use crate::core::args::Arg;
use crate::core::cell::UnitCell;
use crate::core::energy::EnergyTerms;
use crate::core::io::traits::{Restart, RestartParser};
use crate::core::options::{InputOptions, QmInputOptions};
use std::ops::{Deref, DerefMut};
use std::path::Path;
use tracing::{debug, info, warn};

/// The session facade over one engine [`Backend`].
///
/// `Sander` owns the backend handle, so the engine's "at most one active calculation"
/// rule becomes a property of this object: every mutating operation takes `&mut self`,
/// and a [`Session`] guard borrows the facade exclusively for its whole scope.
///
/// Every argument is validated before the engine is touched. Engine failures are
/// returned unchanged as [`SanderError::Native`].
pub struct Sander<B: Backend> {
    backend: B,
    restart_parser: Option<Box<dyn RestartParser>>,
}

struct PreparedSetup {
    topology: ResolvedTopology,
    coordinates: Vec<f64>,
    cell: UnitCell,
}

impl<B: Backend> Sander<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            restart_parser: None,
        }
    }

    /// Registers the parser used when coordinates are given as a restart file path.
    pub fn with_restart_parser(mut self, parser: impl RestartParser + 'static) -> Self {
        self.restart_parser = Some(Box::new(parser));
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Sets up a calculation.
    ///
    /// # Arguments
    ///
    /// * `topology` - A topology file path, or an in-memory topology that is written to a
    ///   temporary `.parm7` file for the duration of the call.
    /// * `coordinates` - Flat `natom * 3` values, `(x, y, z)` triples, an array, or a
    ///   restart file path (requires a registered [`RestartParser`]).
    /// * `cell` - Three box lengths and three angles, or nothing for an aperiodic system.
    ///   When coordinates come from a restart file, an absent or empty box is taken
    ///   from the restart.
    /// * `mm_options` - MM options, passed through unchanged.
    /// * `qm_options` - QM/MM options; required when `mm_options.ifqnt` is set.
    ///
    /// # Errors
    ///
    /// * [`SanderError::InvalidArgument`] if the box does not have six numerical elements
    ///   or coordinates are not numeric.
    /// * [`SanderError::WrongType`] if the topology is neither a path nor a topology
    ///   object, or coordinates are neither a path nor a numeric sequence.
    /// * [`SanderError::MissingArgument`] if QM/MM is requested without `qm_options`.
    /// * [`SanderError::Native`] for any engine failure, including a second setup.
    pub fn setup(
        &mut self,
        topology: impl Into<Arg>,
        coordinates: impl Into<Arg>,
        cell: impl Into<Arg>,
        mm_options: &InputOptions,
        qm_options: Option<&QmInputOptions>,
    ) -> Result<(), SanderError> {
        let prepared = self.prepare(
            topology.into(),
            coordinates.into(),
            cell.into(),
            mm_options,
            qm_options,
        )?;

        debug!(
            prmtop = %prepared.topology.path().display(),
            natom = prepared.coordinates.len() / 3,
            periodic = prepared.cell.is_periodic(),
            qmmm = qm_options.is_some(),
            "Dispatching setup to the engine."
        );
        self.backend.setup(
            prepared.topology.path(),
            &prepared.coordinates,
            &prepared.cell,
            mm_options,
            qm_options,
        )?;
        info!("sander calculation set up.");
        Ok(())
    }

    fn prepare(
        &self,
        topology: Arg,
        coordinates: Arg,
        cell: Arg,
        mm_options: &InputOptions,
        qm_options: Option<&QmInputOptions>,
    ) -> Result<PreparedSetup, SanderError> {
        let (coordinates, cell) = match normalize::classify_coordinates(coordinates)? {
            CoordinateSource::Values(values) => (values, normalize::normalize_box(cell)?),
            CoordinateSource::Restart(path) => {
                let restart = self.read_restart(&path)?;
                let cell = if normalize::is_absent_box(&cell) {
                    restart.unit_cell().unwrap_or_else(UnitCell::aperiodic)
                } else {
                    normalize::normalize_box(cell)?
                };
                (restart.coordinates, cell)
            }
        };

        if mm_options.qmmm_requested() && qm_options.is_none() {
            return Err(SanderError::MissingArgument(
                "qm_options must be provided if QM/MM is requested",
            ));
        }

        let topology = normalize::resolve_topology(topology)?;
        Ok(PreparedSetup {
            topology,
            coordinates,
            cell,
        })
    }

    fn read_restart(&self, path: &Path) -> Result<Restart, SanderError> {
        let parser = self
            .restart_parser
            .as_ref()
            .ok_or_else(|| SanderError::NoRestartParser {
                path: path.to_path_buf(),
            })?;
        debug!(path = %path.display(), "Reading coordinates from restart file.");
        parser
            .read_restart(path)
            .map_err(|source| SanderError::Restart {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Tears down the active calculation.
    pub fn cleanup(&mut self) -> Result<(), SanderError> {
        self.backend.cleanup()?;
        info!("sander calculation cleaned up.");
        Ok(())
    }

    /// Sets up a calculation and returns a guard that cleans it up on scope exit.
    ///
    /// Takes the same arguments as [`Sander::setup`]. The guard dereferences to the
    /// facade. When it is dropped (normal exit, early return or panic) it calls
    /// [`Sander::cleanup`], but only if a calculation is still active, so cleaning up
    /// inside the scope is allowed.
    pub fn scoped(
        &mut self,
        topology: impl Into<Arg>,
        coordinates: impl Into<Arg>,
        cell: impl Into<Arg>,
        mm_options: &InputOptions,
        qm_options: Option<&QmInputOptions>,
    ) -> Result<Session<'_, B>, SanderError> {
        self.setup(topology, coordinates, cell, mm_options, qm_options)?;
        Ok(Session { sander: self })
    }

    /// Runs `body` inside a scoped calculation and returns its result unchanged.
    pub fn with_session<R, E, F>(
        &mut self,
        topology: impl Into<Arg>,
        coordinates: impl Into<Arg>,
        cell: impl Into<Arg>,
        mm_options: &InputOptions,
        qm_options: Option<&QmInputOptions>,
        body: F,
    ) -> Result<R, E>
    where
        F: FnOnce(&mut Sander<B>) -> Result<R, E>,
        E: From<SanderError>,
    {
        let mut session = self.scoped(topology, coordinates, cell, mm_options, qm_options)?;
        body(&mut session)
    }

    pub fn is_setup(&self) -> bool {
        self.backend.is_setup()
    }

    pub fn natom(&self) -> Result<usize, SanderError> {
        Ok(self.backend.natom()?)
    }

    /// Energies and flat `natom * 3` forces (kcal/mol/A) of the current conformation.
    pub fn energy_forces(&mut self) -> Result<(EnergyTerms, Vec<f64>), SanderError> {
        Ok(self.backend.energy_forces()?)
    }

    /// Replaces the particle positions.
    ///
    /// Accepts flat `natom * 3` values, `(natom, 3)` triples or an array. The length is
    /// not checked against the active calculation; the engine reports mismatches.
    pub fn set_positions(&mut self, positions: impl Into<Arg>) -> Result<(), SanderError> {
        let positions = normalize::flatten_numbers(positions.into(), "positions")?;
        self.backend.set_positions(&positions)?;
        Ok(())
    }

    pub fn get_positions(&self) -> Result<Vec<f64>, SanderError> {
        Ok(self.backend.get_positions()?)
    }

    /// Replaces the unit cell of the active calculation.
    pub fn set_box(&mut self, cell: impl Into<UnitCell>) -> Result<(), SanderError> {
        self.backend.set_box(&cell.into())?;
        Ok(())
    }

    pub fn gas_input(&self, igb: i32) -> InputOptions {
        self.backend.gas_input(igb)
    }

    pub fn pme_input(&self) -> InputOptions {
        self.backend.pme_input()
    }

    pub fn qm_input(&self) -> QmInputOptions {
        self.backend.qm_input()
    }
}

/// A scoped calculation; see [`Sander::scoped`].
pub struct Session<'a, B: Backend> {
    sander: &'a mut Sander<B>,
}

impl<B: Backend> Session<'_, B> {
    /// Ends the scope now and reports a cleanup failure instead of logging it.
    pub fn close(mut self) -> Result<(), SanderError> {
        self.release()
    }

    fn release(&mut self) -> Result<(), SanderError> {
        if self.sander.is_setup() {
            self.sander.cleanup()
        } else {
            Ok(())
        }
    }
}

impl<B: Backend> Deref for Session<'_, B> {
    type Target = Sander<B>;

    fn deref(&self) -> &Self::Target {
        self.sander
    }
}

impl<B: Backend> DerefMut for Session<'_, B> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.sander
    }
}

impl<B: Backend> Drop for Session<'_, B> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to clean up sander calculation at scope exit: {}", e);
        }
    }
}
