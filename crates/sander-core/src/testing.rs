use crate::core::cell::UnitCell;
use crate::core::energy::EnergyTerms;
use crate::core::io::traits::TopologyWriter;
use crate::core::options::{InputOptions, QmInputOptions};
use crate::engine::backend::Backend;
use crate::engine::error::NativeError;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Setup {
        prmtop: PathBuf,
        /// Contents of the topology file at the time of the call.
        prmtop_contents: Option<String>,
        coordinates: Vec<f64>,
        cell: UnitCell,
        mm: InputOptions,
        with_qm: bool,
    },
    Cleanup,
    EnergyForces,
    SetPositions(Vec<f64>),
    SetBox(UnitCell),
}

/// Backend double that records every engine call and mimics the engine's
/// single-session rules.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub calls: Vec<Call>,
    pub active: bool,
    pub positions: Vec<f64>,
    pub fail_setup_with: Option<NativeError>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_setup(error: NativeError) -> Self {
        Self {
            fail_setup_with: Some(error),
            ..Self::default()
        }
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn cleanups(&self) -> usize {
        self.count(|c| matches!(c, Call::Cleanup))
    }

    pub fn setups(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Setup { .. }))
            .collect()
    }

    fn require_active(&self) -> Result<(), NativeError> {
        if self.active {
            Ok(())
        } else {
            Err(NativeError::NotSetUp)
        }
    }
}

impl Backend for RecordingBackend {
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
        self.calls.push(Call::Setup {
            prmtop: prmtop.to_path_buf(),
            prmtop_contents: std::fs::read_to_string(prmtop).ok(),
            coordinates: coordinates.to_vec(),
            cell: *cell,
            mm: mm.clone(),
            with_qm: qm.is_some(),
        });
        if let Some(err) = self.fail_setup_with.clone() {
            return Err(err);
        }
        self.positions = coordinates.to_vec();
        self.active = true;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<(), NativeError> {
        self.require_active()?;
        self.calls.push(Call::Cleanup);
        self.active = false;
        Ok(())
    }

    fn is_setup(&self) -> bool {
        self.active
    }

    fn natom(&self) -> Result<usize, NativeError> {
        self.require_active()?;
        Ok(self.positions.len() / 3)
    }

    fn energy_forces(&mut self) -> Result<(EnergyTerms, Vec<f64>), NativeError> {
        self.require_active()?;
        self.calls.push(Call::EnergyForces);
        let energy = EnergyTerms {
            tot: -1.5 * (self.positions.len() / 3) as f64,
            bond: 0.5,
            ..Default::default()
        };
        let forces = self.positions.iter().map(|x| -x).collect();
        Ok((energy, forces))
    }

    fn set_positions(&mut self, positions: &[f64]) -> Result<(), NativeError> {
        self.require_active()?;
        self.calls.push(Call::SetPositions(positions.to_vec()));
        self.positions = positions.to_vec();
        Ok(())
    }

    fn get_positions(&self) -> Result<Vec<f64>, NativeError> {
        self.require_active()?;
        Ok(self.positions.clone())
    }

    fn set_box(&mut self, cell: &UnitCell) -> Result<(), NativeError> {
        self.require_active()?;
        self.calls.push(Call::SetBox(*cell));
        Ok(())
    }

    fn gas_input(&self, igb: i32) -> InputOptions {
        InputOptions {
            igb,
            extdiel: 78.5,
            intdiel: 1.0,
            rgbmax: 25.0,
            cut: 999.0,
            dielc: 1.0,
            ..Default::default()
        }
    }

    fn pme_input(&self) -> InputOptions {
        InputOptions {
            ntb: 1,
            cut: 8.0,
            dielc: 1.0,
            ..Default::default()
        }
    }

    fn qm_input(&self) -> QmInputOptions {
        QmInputOptions {
            qm_theory: "PM3".to_string(),
            scfconv: 1.0e-8,
            itrmax: 1000,
            ..Default::default()
        }
    }
}

/// Topology object that writes a fixed string.
pub(crate) struct InMemoryParm {
    text: String,
}

impl InMemoryParm {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl TopologyWriter for InMemoryParm {
    fn write_parm(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, &self.text)
    }
}
