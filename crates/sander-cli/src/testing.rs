use sander::core::cell::UnitCell;
use sander::core::energy::EnergyTerms;
use sander::core::options::{InputOptions, QmInputOptions};
use sander::engine::backend::Backend;
use sander::engine::error::NativeError;
use std::path::{Path, PathBuf};

/// In-process stand-in for the engine with fixed presets and a trivial energy model.
#[derive(Debug, Default)]
pub struct FakeEngine {
    pub active: bool,
    pub positions: Vec<f64>,
    pub last_prmtop: Option<PathBuf>,
    pub cleanups: usize,
}

impl FakeEngine {
    fn require_active(&self) -> Result<(), NativeError> {
        if self.active {
            Ok(())
        } else {
            Err(NativeError::NotSetUp)
        }
    }
}

impl Backend for FakeEngine {
    fn setup(
        &mut self,
        prmtop: &Path,
        coordinates: &[f64],
        _cell: &UnitCell,
        _mm: &InputOptions,
        _qm: Option<&QmInputOptions>,
    ) -> Result<(), NativeError> {
        if self.active {
            return Err(NativeError::AlreadySetUp);
        }
        self.last_prmtop = Some(prmtop.to_path_buf());
        self.positions = coordinates.to_vec();
        self.active = true;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<(), NativeError> {
        self.require_active()?;
        self.active = false;
        self.cleanups += 1;
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
        let natom = self.natom()?;
        let energy = EnergyTerms {
            tot: -2.0 * natom as f64,
            vdw: -1.0,
            elec: -1.0 * natom as f64 + 1.0,
            ..Default::default()
        };
        Ok((energy, self.positions.iter().map(|x| 2.0 * x).collect()))
    }

    fn set_positions(&mut self, positions: &[f64]) -> Result<(), NativeError> {
        self.require_active()?;
        self.positions = positions.to_vec();
        Ok(())
    }

    fn get_positions(&self) -> Result<Vec<f64>, NativeError> {
        self.require_active()?;
        Ok(self.positions.clone())
    }

    fn set_box(&mut self, _cell: &UnitCell) -> Result<(), NativeError> {
        self.require_active()
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
