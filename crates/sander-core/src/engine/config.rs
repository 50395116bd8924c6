use crate::core::args::Arg;
use crate::core::options::{InputOptions, QmInputOptions};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Everything a single-point evaluation hands to [`Sander::setup`](crate::engine::session::Sander::setup).
#[derive(Debug)]
pub struct SinglePointConfig {
    pub topology: Arg,
    pub coordinates: Arg,
    pub cell: Arg,
    pub mm_options: InputOptions,
    pub qm_options: Option<QmInputOptions>,
}

#[derive(Default)]
pub struct SinglePointConfigBuilder {
    topology: Option<Arg>,
    coordinates: Option<Arg>,
    cell: Option<Arg>,
    mm_options: Option<InputOptions>,
    qm_options: Option<QmInputOptions>,
}

impl SinglePointConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topology(mut self, topology: impl Into<Arg>) -> Self {
        self.topology = Some(topology.into());
        self
    }
    pub fn coordinates(mut self, coordinates: impl Into<Arg>) -> Self {
        self.coordinates = Some(coordinates.into());
        self
    }
    pub fn cell(mut self, cell: impl Into<Arg>) -> Self {
        self.cell = Some(cell.into());
        self
    }
    pub fn mm_options(mut self, options: InputOptions) -> Self {
        self.mm_options = Some(options);
        self
    }
    pub fn qm_options(mut self, options: QmInputOptions) -> Self {
        self.qm_options = Some(options);
        self
    }

    /// The box and QM options are optional; an absent box means no periodicity.
    pub fn build(self) -> Result<SinglePointConfig, ConfigError> {
        Ok(SinglePointConfig {
            topology: self
                .topology
                .filter(|t| !t.is_none())
                .ok_or(ConfigError::MissingParameter("topology"))?,
            coordinates: self
                .coordinates
                .filter(|c| !c.is_none())
                .ok_or(ConfigError::MissingParameter("coordinates"))?,
            cell: self.cell.unwrap_or_default(),
            mm_options: self
                .mm_options
                .ok_or(ConfigError::MissingParameter("mm_options"))?,
            qm_options: self.qm_options,
        })
    }
}
