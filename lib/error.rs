//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use thiserror::Error;
use crate::shape::Shape;

/// Returned when an operation requiring equal-shape fields encounters fields
/// with different extents.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("encountered fields with incompatible extents; got {0:?} and {1:?}")]
pub struct ShapeMismatch(pub Vec<usize>, pub Vec<usize>);

impl ShapeMismatch {
    pub(crate) fn check(a: &Shape, b: &Shape) -> Result<(), Self> {
        (a == b).then_some(())
            .ok_or_else(|| Self(a.extents().to_vec(), b.extents().to_vec()))
    }
}

/// Returned when a coordinate or flat index lies outside a lattice.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RangeError {
    /// Flat index past the total site count.
    #[error("flat index {index} out of range for {len} sites")]
    Flat { index: usize, len: usize },

    /// Coordinate outside the per-axis extents (or with the wrong number of
    /// axes).
    #[error("coordinate {coord:?} out of range for extents {extents:?}")]
    Coord { coord: Vec<usize>, extents: Vec<usize> },

    /// Axis number past the lattice dimensionality.
    #[error("axis {axis} out of range for a {ndim}-dimensional lattice")]
    Axis { axis: usize, ndim: usize },
}

/// Returned from all field, Hamiltonian, and integrator operations.
#[derive(Debug, Error)]
pub enum LatticeError {
    /// [`ShapeMismatch`]
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(#[from] ShapeMismatch),

    /// [`RangeError`]
    #[error("out of range: {0}")]
    OutOfRange(#[from] RangeError),

    /// Returned when normalizing a field whose norm is zero or not finite.
    #[error("cannot normalize a field with norm {0}")]
    DegenerateField(f64),

    /// Returned when a potential region is inverted or exceeds the lattice.
    ///
    /// `extent` is `None` when the region is rejected on its own, before it
    /// meets a lattice.
    #[error("invalid region on axis {axis}: [{start}, {end}) for extent {extent:?}")]
    InvalidRegion {
        axis: usize,
        start: usize,
        end: usize,
        extent: Option<usize>,
    },

    /// Returned when reading a field from delimited text fails.
    #[error("malformed input on line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// Returned when a lattice has no axes or a zero-length axis.
    #[error("lattice extents must be non-empty and non-zero; got {0:?}")]
    InvalidShape(Vec<usize>),

    /// Returned when a non-finite time step is encountered.
    #[error("time step must be finite; got {0}")]
    BadTimestep(f64),

    /// Returned when an integration scheme or output format cannot handle a
    /// lattice or term.
    #[error("{what} is not supported here: {reason}")]
    Unsupported { what: &'static str, reason: String },

    /// [`std::io::Error`]
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// [`ndarray::ShapeError`]
    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl LatticeError {
    pub(crate) fn check_dt(dt: f64) -> Result<(), Self> {
        dt.is_finite().then_some(()).ok_or(Self::BadTimestep(dt))
    }

    pub(crate) fn malformed<S>(line: usize, reason: S) -> Self
    where S: Into<String>
    {
        Self::MalformedInput { line, reason: reason.into() }
    }
}

/// Returned when loading engine configuration or building a worker pool.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("unable to load toml: {path}")]
    TomlRead { path: String },

    /// The configuration text could not be parsed.
    #[error("unable to parse toml: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Returned when a zero thread or chunk count is requested.
    #[error("{what} must be greater than 0")]
    Zero { what: &'static str },

    /// [`rayon::ThreadPoolBuildError`]
    #[error("thread pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// [`LatticeError`], e.g. a bad time step.
    #[error("lattice error: {0}")]
    Lattice(#[from] LatticeError),
}
