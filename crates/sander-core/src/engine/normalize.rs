//! Resolution of [`Arg`] values into the argument shapes the engine accepts.

use super::error::SanderError;
use crate::core::args::Arg;
use crate::core::cell::{BOX_LEN, UnitCell};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

pub(crate) enum CoordinateSource {
    Values(Vec<f64>),
    Restart(PathBuf),
}

/// A topology path that stays valid until the value is dropped.
pub(crate) enum ResolvedTopology {
    File(PathBuf),
    Temporary(NamedTempFile),
}

impl ResolvedTopology {
    pub(crate) fn path(&self) -> &Path {
        match self {
            ResolvedTopology::File(path) => path,
            ResolvedTopology::Temporary(file) => file.path(),
        }
    }
}

/// Strings and paths name a restart file; anything else must flatten to numbers.
pub(crate) fn classify_coordinates(arg: Arg) -> Result<CoordinateSource, SanderError> {
    if let Some(path) = arg.as_path() {
        return Ok(CoordinateSource::Restart(path.to_path_buf()));
    }
    flatten_numbers(arg, "coordinates").map(CoordinateSource::Values)
}

/// Flattens a flat list, a list of `(x, y, z)` triples, or an array into `f64`s.
pub(crate) fn flatten_numbers(arg: Arg, argument: &'static str) -> Result<Vec<f64>, SanderError> {
    let items = match arg {
        Arg::Array(array) => return Ok(array.to_flat_vec()),
        Arg::List(items) => items,
        other => {
            return Err(SanderError::WrongType {
                argument,
                expected: "a sequence of numbers",
                found: other.kind(),
            });
        }
    };

    let mut values = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match item {
            Arg::Number(v) => values.push(v),
            Arg::List(row) => {
                if row.len() != 3 {
                    return Err(SanderError::InvalidArgument(format!(
                        "{argument}[{i}] has {} elements; expected shape (natom, 3) or (natom * 3,)",
                        row.len()
                    )));
                }
                for value in row {
                    match value {
                        Arg::Number(v) => values.push(v),
                        other => {
                            return Err(SanderError::InvalidArgument(format!(
                                "{argument}[{i}] contains {} instead of a number",
                                other.kind()
                            )));
                        }
                    }
                }
            }
            other => {
                return Err(SanderError::InvalidArgument(format!(
                    "{argument}[{i}] is {} instead of a number",
                    other.kind()
                )));
            }
        }
    }
    Ok(values)
}

/// `None` and empty sequences both mean "no box".
pub(crate) fn is_absent_box(arg: &Arg) -> bool {
    match arg {
        Arg::None => true,
        Arg::List(items) => items.is_empty(),
        Arg::Array(array) => array.to_flat_vec().is_empty(),
        _ => false,
    }
}

/// Defaults an absent box, coerces every element to `f64`, then checks the length.
pub(crate) fn normalize_box(arg: Arg) -> Result<UnitCell, SanderError> {
    if is_absent_box(&arg) {
        return Ok(UnitCell::aperiodic());
    }

    let values: Vec<f64> = match arg {
        Arg::List(items) => items
            .into_iter()
            .map(coerce_box_element)
            .collect::<Result<_, _>>()?,
        Arg::Array(array) => array.to_flat_vec(),
        other => {
            return Err(SanderError::InvalidArgument(format!(
                "box must be a sequence with {BOX_LEN} numerical elements, not {}",
                other.kind()
            )));
        }
    };

    let values: [f64; BOX_LEN] = values.try_into().map_err(|v: Vec<f64>| {
        SanderError::InvalidArgument(format!(
            "box must have {BOX_LEN} elements, found {}",
            v.len()
        ))
    })?;
    Ok(UnitCell::from(values))
}

fn coerce_box_element(arg: Arg) -> Result<f64, SanderError> {
    match arg {
        Arg::Number(v) => Ok(v),
        Arg::Text(s) => s.trim().parse().map_err(|_| {
            SanderError::InvalidArgument(format!("box element '{s}' is not a number"))
        }),
        other => Err(SanderError::InvalidArgument(format!(
            "box elements must be numbers, found {}",
            other.kind()
        ))),
    }
}

/// Paths pass through; in-memory topologies are written to a temporary `.parm7` file.
pub(crate) fn resolve_topology(arg: Arg) -> Result<ResolvedTopology, SanderError> {
    if let Some(path) = arg.as_path() {
        return Ok(ResolvedTopology::File(path.to_path_buf()));
    }
    match arg {
        Arg::Topology(topology) => {
            let file = tempfile::Builder::new()
                .prefix("sander-")
                .suffix(".parm7")
                .tempfile()
                .map_err(SanderError::TemporaryFile)?;
            debug!(path = ?file.path(), "Writing in-memory topology to a temporary file.");
            topology
                .write_parm(file.path())
                .map_err(|source| SanderError::TopologyWrite {
                    path: file.path().to_path_buf(),
                    source,
                })?;
            Ok(ResolvedTopology::Temporary(file))
        }
        other => Err(SanderError::WrongType {
            argument: "topology",
            expected: "a file path or a topology object",
            found: other.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryParm;
    use nalgebra::{DVector, Vector3};

    #[test]
    fn numeric_box_is_identity() {
        let cell = normalize_box(Arg::from([40.0, 41.0, 42.0, 90.0, 109.47, 90.0])).unwrap();
        assert_eq!(cell.as_array(), [40.0, 41.0, 42.0, 90.0, 109.47, 90.0]);
    }

    #[test]
    fn absent_and_empty_boxes_become_zeros() {
        assert_eq!(normalize_box(Arg::None).unwrap().as_array(), [0.0; 6]);
        assert_eq!(normalize_box(Arg::List(vec![])).unwrap().as_array(), [0.0; 6]);
        let empty: Vec<f64> = Vec::new();
        assert_eq!(
            normalize_box(Arg::array(DVector::from_vec(empty))).unwrap(),
            UnitCell::aperiodic()
        );
    }

    #[test]
    fn box_with_wrong_length_is_invalid() {
        for len in [1usize, 3, 5, 7, 12] {
            let result = normalize_box(Arg::from(vec![10.0; len]));
            assert!(
                matches!(result, Err(SanderError::InvalidArgument(ref msg)) if msg.contains("6 elements")),
                "length {len} should be rejected"
            );
        }
    }

    #[test]
    fn numeric_strings_in_box_are_coerced() {
        let cell = normalize_box(Arg::List(vec![
            "30".into(),
            " 31.5 ".into(),
            32.0.into(),
            "90".into(),
            90.0.into(),
            90.0.into(),
        ]))
        .unwrap();
        assert_eq!(cell.as_array(), [30.0, 31.5, 32.0, 90.0, 90.0, 90.0]);
    }

    #[test]
    fn non_numeric_box_elements_are_invalid() {
        let mut items: Vec<Arg> = (0..5).map(|_| Arg::Number(1.0)).collect();
        items.push("ninety".into());
        assert!(matches!(
            normalize_box(Arg::List(items)),
            Err(SanderError::InvalidArgument(_))
        ));

        let nested = Arg::List(vec![Arg::from(vec![1.0, 2.0])]);
        assert!(matches!(
            normalize_box(nested),
            Err(SanderError::InvalidArgument(_))
        ));
    }

    #[test]
    fn scalar_box_is_invalid() {
        assert!(matches!(
            normalize_box(Arg::Number(30.0)),
            Err(SanderError::InvalidArgument(_))
        ));
    }

    #[test]
    fn triples_and_arrays_flatten_like_flat_lists() {
        let expected = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let flat = flatten_numbers(Arg::from(expected.clone()), "positions").unwrap();
        let triples = flatten_numbers(
            Arg::from(vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]),
            "positions",
        )
        .unwrap();
        let array = flatten_numbers(
            Arg::from(vec![Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 5.0, 6.0)]),
            "positions",
        )
        .unwrap();
        assert_eq!(flat, expected);
        assert_eq!(triples, expected);
        assert_eq!(array, expected);
    }

    #[test]
    fn ragged_rows_are_invalid() {
        let ragged = Arg::List(vec![Arg::from(vec![1.0, 2.0, 3.0]), Arg::from(vec![4.0, 5.0])]);
        let err = flatten_numbers(ragged, "positions").unwrap_err();
        assert!(matches!(err, SanderError::InvalidArgument(ref msg) if msg.contains("positions[1]")));
    }

    #[test]
    fn scalar_positions_are_a_type_error() {
        let err = flatten_numbers(Arg::Number(1.0), "positions").unwrap_err();
        assert!(matches!(
            err,
            SanderError::WrongType {
                argument: "positions",
                ..
            }
        ));
    }

    #[test]
    fn strings_as_coordinates_name_a_restart_file() {
        match classify_coordinates(Arg::from("md.rst7")).unwrap() {
            CoordinateSource::Restart(path) => assert_eq!(path, PathBuf::from("md.rst7")),
            CoordinateSource::Values(_) => panic!("expected a restart path"),
        }
    }

    #[test]
    fn topology_paths_pass_through() {
        let resolved = resolve_topology(Arg::from("prmtop")).unwrap();
        assert_eq!(resolved.path(), Path::new("prmtop"));
    }

    #[test]
    fn in_memory_topology_is_written_and_removed_on_drop() {
        let resolved = resolve_topology(Arg::topology(InMemoryParm::new("%VERSION test"))).unwrap();
        let path = resolved.path().to_path_buf();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("parm7"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "%VERSION test");
        drop(resolved);
        assert!(!path.exists());
    }

    #[test]
    fn other_topology_types_are_type_errors() {
        let err = resolve_topology(Arg::Number(3.0)).err().unwrap();
        assert!(matches!(
            err,
            SanderError::WrongType {
                argument: "topology",
                found: "a number",
                ..
            }
        ));
    }
}
