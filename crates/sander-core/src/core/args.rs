//! Loosely-typed caller input, resolved once at the facade boundary.
//!
//! Callers hand the facade topologies, coordinates, boxes and positions in whatever shape
//! is convenient: a path string, a plain list of numbers, a list of `(x, y, z)` triples,
//! an `nalgebra` vector or matrix, or an in-memory topology. [`Arg`] names each of those
//! shapes explicitly so that the facade can decide, in one place, whether an input is
//! acceptable for the slot it was passed in.

use crate::core::cell::UnitCell;
use crate::core::io::traits::TopologyWriter;
use nalgebra::{DMatrix, DVector, Point3, Vector3};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// A numeric container that can be flattened into a plain sequence of `f64`.
///
/// Matrices are flattened row by row, so an `(natom, 3)` coordinate matrix becomes
/// `[x0, y0, z0, x1, y1, z1, ...]`.
pub trait ArrayLike {
    fn to_flat_vec(&self) -> Vec<f64>;
}

impl ArrayLike for DVector<f64> {
    fn to_flat_vec(&self) -> Vec<f64> {
        self.iter().copied().collect()
    }
}

impl ArrayLike for DMatrix<f64> {
    fn to_flat_vec(&self) -> Vec<f64> {
        self.row_iter()
            .flat_map(|row| row.iter().copied().collect::<Vec<_>>())
            .collect()
    }
}

impl ArrayLike for Vec<Point3<f64>> {
    fn to_flat_vec(&self) -> Vec<f64> {
        self.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }
}

impl ArrayLike for Vec<Vector3<f64>> {
    fn to_flat_vec(&self) -> Vec<f64> {
        self.iter().flat_map(|v| [v.x, v.y, v.z]).collect()
    }
}

/// One caller-supplied argument.
#[derive(Default)]
pub enum Arg {
    /// No value was supplied.
    #[default]
    None,
    /// A string; a file path wherever a path is accepted.
    Text(String),
    /// A filesystem path.
    Path(PathBuf),
    Number(f64),
    /// A plain sequence, possibly nested (e.g. a list of `(x, y, z)` triples).
    List(Vec<Arg>),
    /// A numeric container exposing [`ArrayLike::to_flat_vec`].
    Array(Box<dyn ArrayLike>),
    /// An in-memory topology exposing [`TopologyWriter::write_parm`].
    Topology(Box<dyn TopologyWriter>),
}

impl Arg {
    pub fn array(array: impl ArrayLike + 'static) -> Self {
        Arg::Array(Box::new(array))
    }

    pub fn topology(topology: impl TopologyWriter + 'static) -> Self {
        Arg::Topology(Box::new(topology))
    }

    /// A short human-readable name of the variant, used in type errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Arg::None => "nothing",
            Arg::Text(_) => "a string",
            Arg::Path(_) => "a path",
            Arg::Number(_) => "a number",
            Arg::List(_) => "a list",
            Arg::Array(_) => "an array",
            Arg::Topology(_) => "a topology object",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Arg::None)
    }

    /// Returns the path this argument names, if it is a string or a path.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Arg::Text(s) => Some(Path::new(s)),
            Arg::Path(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::None => write!(f, "None"),
            Arg::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Arg::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Arg::Number(v) => f.debug_tuple("Number").field(v).finish(),
            Arg::List(items) => f.debug_tuple("List").field(items).finish(),
            Arg::Array(a) => write!(f, "Array(len={})", a.to_flat_vec().len()),
            Arg::Topology(_) => write!(f, "Topology(..)"),
        }
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Text(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Text(s)
    }
}

impl From<&Path> for Arg {
    fn from(p: &Path) -> Self {
        Arg::Path(p.to_path_buf())
    }
}

impl From<PathBuf> for Arg {
    fn from(p: PathBuf) -> Self {
        Arg::Path(p)
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Number(v)
    }
}

impl From<Vec<f64>> for Arg {
    fn from(values: Vec<f64>) -> Self {
        Arg::List(values.into_iter().map(Arg::Number).collect())
    }
}

impl From<&[f64]> for Arg {
    fn from(values: &[f64]) -> Self {
        Arg::List(values.iter().copied().map(Arg::Number).collect())
    }
}

impl<const N: usize> From<[f64; N]> for Arg {
    fn from(values: [f64; N]) -> Self {
        Arg::List(values.into_iter().map(Arg::Number).collect())
    }
}

impl From<Vec<[f64; 3]>> for Arg {
    fn from(triples: Vec<[f64; 3]>) -> Self {
        Arg::List(triples.into_iter().map(Arg::from).collect())
    }
}

impl From<Vec<Arg>> for Arg {
    fn from(items: Vec<Arg>) -> Self {
        Arg::List(items)
    }
}

impl From<DVector<f64>> for Arg {
    fn from(v: DVector<f64>) -> Self {
        Arg::array(v)
    }
}

impl From<DMatrix<f64>> for Arg {
    fn from(m: DMatrix<f64>) -> Self {
        Arg::array(m)
    }
}

impl From<Vec<Point3<f64>>> for Arg {
    fn from(points: Vec<Point3<f64>>) -> Self {
        Arg::array(points)
    }
}

impl From<Vec<Vector3<f64>>> for Arg {
    fn from(vectors: Vec<Vector3<f64>>) -> Self {
        Arg::array(vectors)
    }
}

impl From<UnitCell> for Arg {
    fn from(cell: UnitCell) -> Self {
        Arg::from(cell.as_array())
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Arg::None, Into::into)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PlainArg {
    Number(f64),
    Text(String),
    List(Vec<PlainArg>),
}

impl From<PlainArg> for Arg {
    fn from(p: PlainArg) -> Self {
        match p {
            PlainArg::Number(v) => Arg::Number(v),
            PlainArg::Text(s) => Arg::Text(s),
            PlainArg::List(items) => Arg::List(items.into_iter().map(Into::into).collect()),
        }
    }
}

impl<'de> Deserialize<'de> for Arg {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        PlainArg::deserialize(deserializer).map(Into::into)
    }
}
