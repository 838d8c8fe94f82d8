//! Provides a parallelized field algebra and time-evolution engine for
//! discretized wavefunctions on one-, two-, or three-dimensional lattices.
//!
//! A [`LatticeField`] holds one complex amplitude per lattice site together
//! with immutable metadata ([`WfInfo`]). Fields are combined with the
//! copy-on-operate routines in [`algebra`], acted on by Hamiltonian
//! [`Term`]s, and advanced in time by an [`Integrator`]:
//! - Hamiltonian terms:
//!     - Nearest-neighbor tight-binding hopping ([`TightBinding`])
//!     - Real and imaginary (absorbing) potentials over box regions
//!       ([`Potential`])
//! - Time evolution:
//!     - Forward Euler (default)
//!     - Fourth-order Runge-Kutta
//!     - Split-step operator with exact k-space hopping
//!
//! Initial states and plain-text I/O are in [`packets`]; engine settings can be
//! loaded from TOML with [`config`].
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod shape;
pub mod parallel;
pub mod field;
pub mod algebra;
pub mod potential;
pub mod hamiltonian;
pub mod timedep;
pub mod packets;
pub mod config;
pub mod utils;

pub mod docs;

pub use error::{ ConfigError, LatticeError };
pub use shape::{ Boundary, Shape };
pub use parallel::{ Partition, Workers };
pub use field::{ LatticeField, WaveType, WfInfo };
pub use algebra::Shift;
pub use potential::{ Potential, PotentialKind, Region };
pub use hamiltonian::{ Hamiltonian, Term, TightBinding };
pub use timedep::{ Integrator, Scheme };
pub use config::EngineConfig;

pub type LResult<T> = Result<T, LatticeError>;
