//! Time evolution of a lattice field under `∂ψ/∂t = -iHψ`.
//!
//! Every scheme is a pure function from `(ψ, terms)` to the next field: the
//! input is never mutated and no norm is enforced unless requested with
//! [`Integrator::renormalizing`]. None of the schemes check for stability.
//!
//! - [`Scheme::Euler`]: `ψ' = ψ - i dt Hψ`. First order; the norm grows by
//!   `dt² |Hψ|²` every step.
//! - [`Scheme::RungeKutta4`]: classical fourth-order Runge-Kutta on `-iHψ`.
//! - [`Scheme::SplitStep`]: Strang splitting of the on-site and hopping parts.
//!   The on-site part is applied as a phase over half a step on either side of
//!   the hopping part, which is applied exactly in k-space. Only periodic
//!   lattices and terms that implement [`Term::split`] are supported.

use ndarray as nd;
use num_complex::Complex64 as C64;
use serde::{ Deserialize, Serialize };
use crate::{
    LResult,
    algebra,
    error::LatticeError,
    field::LatticeField,
    hamiltonian::{ Splitting, Term, apply_terms, split_terms },
    shape::Boundary,
    utils::{ fft_inplace, ifft_inplace, lattice_momenta },
};

/// Integration scheme.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    #[default]
    Euler,
    RungeKutta4,
    SplitStep,
}

impl Scheme {
    fn name(self) -> &'static str {
        match self {
            Self::Euler => "euler",
            Self::RungeKutta4 => "runge_kutta4",
            Self::SplitStep => "split_step",
        }
    }
}

// evaluate the right-hand side `-i H q`
fn rhs<T>(terms: &[T], q: &LatticeField) -> LResult<LatticeField>
where T: Term
{
    Ok(apply_terms(terms, q)?.scale(-C64::i()))
}

fn euler_step<T>(terms: &[T], q: &LatticeField, dt: f64)
    -> LResult<LatticeField>
where T: Term
{
    algebra::axpy(q, dt, &rhs(terms, q)?)
}

fn rk4_step<T>(terms: &[T], q: &LatticeField, dt: f64)
    -> LResult<LatticeField>
where T: Term
{
    let dth = dt / 2.0;
    let k1 = rhs(terms, q)?;
    let k2 = rhs(terms, &algebra::axpy(q, dth, &k1)?)?;
    let k3 = rhs(terms, &algebra::axpy(q, dth, &k2)?)?;
    let k4 = rhs(terms, &algebra::axpy(q, dt, &k3)?)?;
    let mut acc = algebra::axpy(q, dt / 6.0, &k1)?;
    acc = algebra::axpy(&acc, dt / 3.0, &k2)?;
    acc = algebra::axpy(&acc, dt / 3.0, &k3)?;
    algebra::axpy(&acc, dt / 6.0, &k4)
}

// multiply by `exp(-i V dt)` site by site
fn apply_split_potential(q: &mut LatticeField, phase: &[C64]) {
    let part = q.partition;
    part.for_each_mut(&mut q.data, |i, qi| { *qi *= phase[i]; });
}

// multiply by `exp(-i ε(k) dt)` in k-space, with the tight-binding dispersion
// `ε(k) = -2 Σ_a J_a cos k_a`
fn apply_split_kinetic(q: &mut LatticeField, hopping: &[f64], dt: f64)
    -> LResult<()>
{
    let cosines: Vec<nd::Array1<f64>>
        = q.extents().iter()
        .map(|&n| lattice_momenta(n).mapv(f64::cos))
        .collect();
    let shape = q.shape().clone();
    let part = q.partition;
    let dims = nd::IxDyn(shape.extents());
    {
        let mut view = nd::ArrayViewMutD::from_shape(dims.clone(), &mut q.data)?;
        fft_inplace(&mut view);
    }
    part.for_each_mut(&mut q.data, |i, qk| {
        let eps: f64
            = hopping.iter().zip(&cosines).enumerate()
            .map(|(ax, (j, cos))| -2.0 * j * cos[shape.coord_along(i, ax)])
            .sum();
        *qk *= C64::cis(-eps * dt);
    });
    let mut view = nd::ArrayViewMutD::from_shape(dims, &mut q.data)?;
    ifft_inplace(&mut view);
    Ok(())
}

fn split_step<T>(terms: &[T], q: &LatticeField, dt: f64)
    -> LResult<LatticeField>
where T: Term
{
    if q.boundary() != Boundary::Periodic {
        return Err(LatticeError::Unsupported {
            what: Scheme::SplitStep.name(),
            reason: format!("{:?} boundary; only periodic lattices", q.boundary()),
        });
    }
    let Splitting { hopping, diagonal } = split_terms(terms, q)?
        .ok_or_else(|| {
            let labels: Vec<&str>
                = terms.iter().map(|t| t.label()).collect();
            LatticeError::Unsupported {
                what: Scheme::SplitStep.name(),
                reason: format!(
                    "not every term in {labels:?} splits into hopping and \
                    on-site parts"
                ),
            }
        })?;
    let half: Vec<C64>
        = diagonal.iter()
        .map(|v| (-C64::i() * v * (dt / 2.0)).exp())
        .collect();
    let mut psi = q.clone();
    apply_split_potential(&mut psi, &half);
    apply_split_kinetic(&mut psi, &hopping, dt)?;
    apply_split_potential(&mut psi, &half);
    Ok(psi)
}

/// Take a single first-order (Euler) step `ψ - i dt Hψ` under the sum of
/// `terms`.
///
/// This is the same as [`Integrator::step`] with the default scheme.
pub fn step<T>(psi: &LatticeField, terms: &[T], dt: f64)
    -> LResult<LatticeField>
where T: Term
{
    LatticeError::check_dt(dt)?;
    euler_step(terms, psi, dt)
}

/// Advances a field by a fixed time step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Integrator {
    dt: f64,
    scheme: Scheme,
    renormalize: bool,
}

impl Integrator {
    /// Create a new Euler integrator.
    ///
    /// Fails if `dt` is not finite. Negative time steps are allowed and evolve
    /// backward.
    pub fn new(dt: f64) -> LResult<Self> {
        LatticeError::check_dt(dt)?;
        Ok(Self { dt, scheme: Scheme::default(), renormalize: false })
    }

    /// Use a different integration scheme.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Renormalize the field to unit norm after every step.
    pub fn renormalizing(mut self, renormalize: bool) -> Self {
        self.renormalize = renormalize;
        self
    }

    pub fn dt(&self) -> f64 { self.dt }

    pub fn scheme(&self) -> Scheme { self.scheme }

    pub fn is_renormalizing(&self) -> bool { self.renormalize }

    /// Advance `psi` by one time step under the sum of `terms`, returning the
    /// new field.
    pub fn step<T>(&self, psi: &LatticeField, terms: &[T])
        -> LResult<LatticeField>
    where T: Term
    {
        let mut next
            = match self.scheme {
                Scheme::Euler => euler_step(terms, psi, self.dt)?,
                Scheme::RungeKutta4 => rk4_step(terms, psi, self.dt)?,
                Scheme::SplitStep => split_step(terms, psi, self.dt)?,
            };
        if self.renormalize { next.renormalize()?; }
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{} step: norm = {:.15e}", self.scheme.name(), next.norm());
        }
        Ok(next)
    }

    /// Take `steps` steps from `psi`, returning every field along the way.
    ///
    /// The first element is a copy of `psi`, so the result holds `steps + 1`
    /// fields.
    pub fn evolve<T>(&self, psi: &LatticeField, terms: &[T], steps: usize)
        -> LResult<Vec<LatticeField>>
    where T: Term
    {
        log::debug!(
            "evolving {} steps of dt = {} with {} over {} terms",
            steps, self.dt, self.scheme.name(), terms.len(),
        );
        let mut snapshots: Vec<LatticeField> = Vec::with_capacity(steps + 1);
        snapshots.push(psi.clone());
        for _ in 0..steps {
            let next = self.step(snapshots.last().unwrap_or(psi), terms)?;
            snapshots.push(next);
        }
        Ok(snapshots)
    }

    /// Take `steps` steps from `psi`, returning only the final field.
    pub fn evolve_final<T>(&self, psi: &LatticeField, terms: &[T], steps: usize)
        -> LResult<LatticeField>
    where T: Term
    {
        log::debug!(
            "evolving {} steps of dt = {} with {} over {} terms",
            steps, self.dt, self.scheme.name(), terms.len(),
        );
        let mut q = psi.clone();
        for _ in 0..steps {
            q = self.step(&q, terms)?;
        }
        Ok(q)
    }
}
