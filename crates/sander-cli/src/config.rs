use crate::cli::EnergyArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use sander::core::args::Arg;
use sander::engine::backend::Backend;
use sander::engine::config::{SinglePointConfig, SinglePointConfigBuilder};
use sander::engine::session::Sander;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The engine preset an `[mm]` section starts from.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Gas phase or implicit solvent, no periodicity.
    #[default]
    Gas,
    /// Particle-mesh Ewald with the engine's defaults.
    Pme,
}

#[derive(Deserialize, Debug, Default)]
struct PartialMmConfig {
    preset: Option<Preset>,
    /// Option fields that override the preset; validated when merged.
    #[serde(flatten)]
    overrides: toml::Table,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialCalculationConfig {
    topology: Option<PathBuf>,
    coordinates: Option<Arg>,
    coordinates_file: Option<PathBuf>,
    #[serde(rename = "box")]
    cell: Option<Arg>,
    mm: Option<PartialMmConfig>,
    qm: Option<toml::Table>,
}

impl PartialCalculationConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli<B: Backend>(
        mut self,
        args: &EnergyArgs,
        sander: &Sander<B>,
    ) -> Result<SinglePointConfig> {
        self.apply_set_values(&args.set_values)?;

        let topology = args.topology.clone().or(self.topology).ok_or_else(|| {
            CliError::Config(
                "A topology is required either in the config file (`topology`) or via --topology."
                    .to_string(),
            )
        })?;

        let coordinates = match (args.coordinates_file.clone(), self.coordinates_file, self.coordinates) {
            (Some(path), _, _) | (None, Some(path), None) => Self::load_coordinates(path)?,
            (None, None, Some(inline)) => inline,
            (None, Some(_), Some(_)) => {
                return Err(CliError::Config(
                    "`coordinates` and `coordinates-file` cannot both be set.".to_string(),
                ));
            }
            (None, None, None) => {
                return Err(CliError::Config(
                    "Coordinates are required: set `coordinates` or `coordinates-file`, or pass --coordinates-file."
                        .to_string(),
                ));
            }
        };

        let mm_config = self.mm.take().unwrap_or_default();
        let base = match mm_config.preset.unwrap_or_default() {
            Preset::Gas => sander.gas_input(Self::preset_igb(&mm_config.overrides)?),
            Preset::Pme => sander.pme_input(),
        };
        let mm_options = overlay(base, mm_config.overrides, "mm")?;

        let mut builder = SinglePointConfigBuilder::new()
            .topology(topology)
            .coordinates(coordinates)
            .cell(self.cell)
            .mm_options(mm_options);
        if let Some(qm) = self.qm {
            builder = builder.qm_options(overlay(sander.qm_input(), qm, "qm")?);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn load_coordinates(path: PathBuf) -> Result<Arg> {
        debug!("Reading coordinates from {:?}", path);
        let values = parser::read_float_table(&path).map_err(|e| CliError::FileParsing {
            path,
            source: e.into(),
        })?;
        Ok(Arg::from(values))
    }

    /// The GB model the gas preset is generated for.
    fn preset_igb(overrides: &toml::Table) -> Result<i32> {
        match overrides.get("igb") {
            None => Ok(0),
            Some(value) => value
                .as_integer()
                .and_then(|igb| i32::try_from(igb).ok())
                .ok_or_else(|| CliError::Config(format!("Invalid integer value for mm.igb: {}", value))),
        }
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;

            match key.split_once('.') {
                None if key == "topology" => self.topology = Some(PathBuf::from(value_str)),
                None if key == "coordinates-file" => {
                    self.coordinates_file = Some(PathBuf::from(value_str));
                }
                Some(("mm", "preset")) => {
                    let preset = <Preset as clap::ValueEnum>::from_str(value_str, true).map_err(|_| {
                        CliError::Config(format!("Unknown preset for mm.preset: {}", value_str))
                    })?;
                    self.mm.get_or_insert_with(Default::default).preset = Some(preset);
                }
                Some(("mm", field)) if !field.is_empty() => {
                    self.mm
                        .get_or_insert_with(Default::default)
                        .overrides
                        .insert(field.to_string(), parse_value(value_str));
                }
                Some(("qm", field)) if !field.is_empty() => {
                    self.qm
                        .get_or_insert_with(Default::default)
                        .insert(field.to_string(), parse_value(value_str));
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Parses a `--set` value as a TOML value, falling back to a plain string.
fn parse_value(value_str: &str) -> toml::Value {
    toml::from_str::<toml::Table>(&format!("value = {}", value_str))
        .ok()
        .and_then(|mut table| table.remove("value"))
        .unwrap_or_else(|| toml::Value::String(value_str.to_string()))
}

/// Applies `overrides` on top of `base`, rejecting unknown or mistyped fields.
fn overlay<T: Serialize + DeserializeOwned>(
    base: T,
    overrides: toml::Table,
    section: &str,
) -> Result<T> {
    let mut value = toml::Value::try_from(base)?;
    if let toml::Value::Table(table) = &mut value {
        for (key, override_value) in overrides {
            table.insert(key, override_value);
        }
    }
    value
        .try_into::<T>()
        .map_err(|e| CliError::Config(format!("Invalid `[{}]` options: {}", section, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::testing::FakeEngine;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn write_config_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn energy_args(extra: &[&str]) -> EnergyArgs {
        let mut args = vec!["sander", "energy", "-c", "calc.toml"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Energy(energy_args) => energy_args,
            _ => panic!("Expected 'energy' subcommand"),
        }
    }

    fn merge(content: &str, extra: &[&str]) -> Result<SinglePointConfig> {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(&dir, "calc.toml", content);
        let sander = Sander::new(FakeEngine::default());
        PartialCalculationConfig::from_file(&path)?.merge_with_cli(&energy_args(extra), &sander)
    }

    #[test]
    fn gas_preset_is_generated_for_the_requested_gb_model() {
        let config = merge(
            r#"
            topology = "system.parm7"
            coordinates = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0]

            [mm]
            igb = 5
            cut = 20
            "#,
            &[],
        )
        .unwrap();

        assert!(matches!(config.topology, Arg::Path(ref p) if p == Path::new("system.parm7")));
        assert_eq!(config.mm_options.igb, 5);
        assert_eq!(config.mm_options.extdiel, 78.5);
        assert_eq!(config.mm_options.cut, 20.0);
        assert!(config.cell.is_none());
        assert!(config.qm_options.is_none());
    }

    #[test]
    fn pme_preset_and_box_are_read() {
        let config = merge(
            r#"
            topology = "system.parm7"
            coordinates = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]
            box = [30.0, 30.0, 30.0, 90.0, 90.0, 90.0]

            [mm]
            preset = "pme"
            "#,
            &[],
        )
        .unwrap();

        assert_eq!(config.mm_options.ntb, 1);
        assert_eq!(config.mm_options.cut, 8.0);
        assert!(matches!(config.cell, Arg::List(ref items) if items.len() == 6));
    }

    #[test]
    fn cli_arguments_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let coords = write_config_file(&dir, "coords.csv", "1.0,2.0,3.0\n4.0,5.0,6.0\n");
        let config = merge(
            r#"
            topology = "from-file.parm7"
            coordinates = [0.0, 0.0, 0.0]
            "#,
            &[
                "--topology",
                "override.parm7",
                "--coordinates-file",
                coords.to_str().unwrap(),
            ],
        )
        .unwrap();

        assert!(matches!(config.topology, Arg::Path(ref p) if p == Path::new("override.parm7")));
        match config.coordinates {
            Arg::List(items) => assert_eq!(items.len(), 6),
            other => panic!("unexpected coordinates: {:?}", other),
        }
    }

    #[test]
    fn set_values_override_file_and_preset() {
        let config = merge(
            r#"
            topology = "system.parm7"
            coordinates = [0.0, 0.0, 0.0]

            [mm]
            cut = 10.0
            "#,
            &["-S", "mm.preset=pme", "-S", "mm.cut=12.5", "-S", "qm.qmmask=:1"],
        )
        .unwrap();

        assert_eq!(config.mm_options.ntb, 1);
        assert_eq!(config.mm_options.cut, 12.5);
        let qm = config.qm_options.unwrap();
        assert_eq!(qm.qmmask, ":1");
        assert_eq!(qm.qm_theory, "PM3");
    }

    #[test]
    fn qm_section_overlays_the_engine_preset() {
        let config = merge(
            r#"
            topology = "system.parm7"
            coordinates = [0.0, 0.0, 0.0]

            [mm]
            ifqnt = 1

            [qm]
            qmmask = ":1-2"
            qmcharge = -1
            "#,
            &[],
        )
        .unwrap();

        assert_eq!(config.mm_options.ifqnt, 1);
        let qm = config.qm_options.unwrap();
        assert_eq!(qm.qmcharge, -1);
        assert_eq!(qm.qm_theory, "PM3");
        assert_eq!(qm.itrmax, 1000);
    }

    #[test]
    fn unknown_option_names_are_config_errors() {
        let result = merge(
            r#"
            topology = "system.parm7"
            coordinates = [0.0, 0.0, 0.0]

            [mm]
            cutoff = 10.0
            "#,
            &[],
        );
        assert!(matches!(result, Err(CliError::Config(ref msg)) if msg.contains("[mm]")));
    }

    #[test]
    fn missing_topology_returns_error() {
        let result = merge("coordinates = [0.0, 0.0, 0.0]", &[]);
        assert!(matches!(result, Err(CliError::Config(ref msg)) if msg.contains("topology")));
    }

    #[test]
    fn inline_and_file_coordinates_are_exclusive() {
        let result = merge(
            r#"
            topology = "system.parm7"
            coordinates = [0.0, 0.0, 0.0]
            coordinates-file = "coords.csv"
            "#,
            &[],
        );
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn malformed_set_value_is_rejected() {
        let result = merge(
            "topology = \"system.parm7\"\ncoordinates = [0.0, 0.0, 0.0]",
            &["-S", "mm.cut"],
        );
        assert!(matches!(result, Err(CliError::Config(ref msg)) if msg.contains("KEY=VALUE")));

        let result = merge(
            "topology = \"system.parm7\"\ncoordinates = [0.0, 0.0, 0.0]",
            &["-S", "solver.kind=fast"],
        );
        assert!(matches!(result, Err(CliError::Config(ref msg)) if msg.contains("solver.kind")));
    }

    #[test]
    fn unknown_top_level_keys_fail_to_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(&dir, "calc.toml", "topolgy = \"x\"");
        assert!(matches!(
            PartialCalculationConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn set_values_parse_as_toml_or_fall_back_to_strings() {
        assert_eq!(parse_value("12"), toml::Value::Integer(12));
        assert_eq!(parse_value("1.5"), toml::Value::Float(1.5));
        assert_eq!(parse_value("[1, 2]").as_array().map(Vec::len), Some(2));
        assert_eq!(parse_value(":1-2@CA"), toml::Value::String(":1-2@CA".to_string()));
    }
}
