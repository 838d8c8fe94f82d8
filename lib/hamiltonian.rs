//! Hamiltonian terms and their composition.
//!
//! A Hamiltonian is a sum of [`Term`]s, each of which maps a field to its
//! contribution `H_k ψ`. Applying a list of terms sums the individual
//! contributions, so the order of terms only affects floating-point summation
//! order.
//!
//! The kinetic part is a tight-binding (nearest-neighbor hopping) operator:
//! ```text
//! (H_T ψ)[x] = -Σ_a J_a (ψ[x + e_a] + ψ[x - e_a])
//! ```
//! where the neighbor values come from [`shift`][crate::algebra::shift], so
//! they wrap on periodic lattices and vanish past the edges of open ones.

use num_complex::Complex64 as C64;
use num_traits::Zero;
use crate::{
    LResult,
    algebra::{ self, Shift },
    error::ShapeMismatch,
    field::LatticeField,
    potential::Potential,
};

/// Decomposition of a term into a hopping part and a diagonal (on-site) part,
/// as used by split-step integration.
#[derive(Clone, Debug, PartialEq)]
pub struct Splitting {
    /// Hopping amplitude per axis.
    pub hopping: Vec<f64>,
    /// On-site energy per flat index.
    pub diagonal: Vec<C64>,
}

impl Splitting {
    /// A splitting with no hopping and zero on-site energy.
    pub fn zero(psi: &LatticeField) -> Self {
        Self {
            hopping: vec![0.0; psi.ndim()],
            diagonal: vec![C64::zero(); psi.len()],
        }
    }

    /// Add another splitting of the same lattice to this one.
    pub fn accumulate(&mut self, other: &Self) {
        self.hopping.iter_mut().zip(&other.hopping)
            .for_each(|(a, b)| { *a += b; });
        self.diagonal.iter_mut().zip(&other.diagonal)
            .for_each(|(a, b)| { *a += b; });
    }
}

/// A single Hamiltonian term.
pub trait Term: Send + Sync {
    /// Compute this term's contribution `H_k ψ` as a new field of the same
    /// shape as `psi`.
    fn apply(&self, psi: &LatticeField) -> LResult<LatticeField>;

    /// Short human-readable name, used in log messages.
    fn label(&self) -> &str { "term" }

    /// Express this term as hopping plus on-site energy, if possible.
    ///
    /// Terms that return `None` cannot be used with split-step integration.
    fn split(&self, _psi: &LatticeField) -> LResult<Option<Splitting>> {
        Ok(None)
    }
}

impl<T> Term for Box<T>
where T: Term + ?Sized
{
    fn apply(&self, psi: &LatticeField) -> LResult<LatticeField> {
        (**self).apply(psi)
    }

    fn label(&self) -> &str { (**self).label() }

    fn split(&self, psi: &LatticeField) -> LResult<Option<Splitting>> {
        (**self).split(psi)
    }
}

impl<T> Term for &T
where T: Term + ?Sized
{
    fn apply(&self, psi: &LatticeField) -> LResult<LatticeField> {
        (**self).apply(psi)
    }

    fn label(&self) -> &str { (**self).label() }

    fn split(&self, psi: &LatticeField) -> LResult<Option<Splitting>> {
        (**self).split(psi)
    }
}

/// Sum the contributions of all `terms`.
///
/// An empty list gives the zero field.
pub fn apply_terms<T>(terms: &[T], psi: &LatticeField) -> LResult<LatticeField>
where T: Term
{
    let mut acc = psi.zeros_like();
    for term in terms.iter() {
        let h = term.apply(psi)?;
        acc = algebra::add(&acc, &h)?;
    }
    Ok(acc)
}

/// Combine the splittings of all `terms`, or return `None` if any term cannot
/// be split.
pub fn split_terms<T>(terms: &[T], psi: &LatticeField)
    -> LResult<Option<Splitting>>
where T: Term
{
    let mut acc = Splitting::zero(psi);
    for term in terms.iter() {
        match term.split(psi)? {
            Some(s) => acc.accumulate(&s),
            None => { return Ok(None); }
        }
    }
    Ok(Some(acc))
}

/// Energy expectation value `⟨ψ|H|ψ⟩ / ⟨ψ|ψ⟩`.
///
/// Fails with [`DegenerateField`][crate::LatticeError::DegenerateField] for a
/// zero field.
pub fn energy<T>(terms: &[T], psi: &LatticeField) -> LResult<C64>
where T: Term
{
    let n = psi.norm();
    if !(n > 0.0 && n.is_finite()) {
        return Err(crate::LatticeError::DegenerateField(n));
    }
    Ok(psi.dot(&apply_terms(terms, psi)?)? / n)
}

#[derive(Clone, Debug, PartialEq)]
enum Hopping {
    Uniform(f64),
    PerAxis(Vec<f64>),
}

/// Nearest-neighbor tight-binding hopping.
#[derive(Clone, Debug, PartialEq)]
pub struct TightBinding {
    hopping: Hopping,
}

impl TightBinding {
    /// Equal hopping amplitude `j` along every axis.
    pub fn new(j: f64) -> Self { Self { hopping: Hopping::Uniform(j) } }

    /// One hopping amplitude per axis; the field must have exactly as many
    /// axes.
    pub fn per_axis<J>(j: J) -> Self
    where J: Into<Vec<f64>>
    {
        Self { hopping: Hopping::PerAxis(j.into()) }
    }

    /// Per-axis amplitudes for a field.
    pub fn amplitudes(&self, psi: &LatticeField) -> LResult<Vec<f64>> {
        match &self.hopping {
            Hopping::Uniform(j) => Ok(vec![*j; psi.ndim()]),
            Hopping::PerAxis(js) if js.len() == psi.ndim() => Ok(js.clone()),
            Hopping::PerAxis(js) => {
                Err(ShapeMismatch(
                    vec![1; js.len()], psi.extents().to_vec()).into())
            },
        }
    }
}

impl Term for TightBinding {
    fn apply(&self, psi: &LatticeField) -> LResult<LatticeField> {
        let js = self.amplitudes(psi)?;
        let mut acc = psi.zeros_like();
        for (axis, &j) in js.iter().enumerate() {
            if j == 0.0 { continue; }
            let fwd = algebra::shift(psi, Shift::forward(axis))?;
            let bwd = algebra::shift(psi, Shift::backward(axis))?;
            acc = algebra::axpy(&acc, -j, &fwd)?;
            acc = algebra::axpy(&acc, -j, &bwd)?;
        }
        Ok(acc)
    }

    fn label(&self) -> &str { "tight-binding" }

    fn split(&self, psi: &LatticeField) -> LResult<Option<Splitting>> {
        Ok(Some(Splitting {
            hopping: self.amplitudes(psi)?,
            diagonal: vec![C64::zero(); psi.len()],
        }))
    }
}

/// A hopping term together with any number of potentials.
#[derive(Clone, Debug)]
pub struct Hamiltonian {
    hopping: TightBinding,
    potentials: Vec<Potential>,
}

impl Hamiltonian {
    pub fn new(hopping: TightBinding) -> Self {
        Self { hopping, potentials: Vec::new() }
    }

    /// Add a potential.
    pub fn with_potential(mut self, potential: Potential) -> Self {
        self.potentials.push(potential);
        self
    }

    pub fn hopping(&self) -> &TightBinding { &self.hopping }

    pub fn potentials(&self) -> &[Potential] { &self.potentials }
}

impl Term for Hamiltonian {
    fn apply(&self, psi: &LatticeField) -> LResult<LatticeField> {
        let mut acc = self.hopping.apply(psi)?;
        for v in self.potentials.iter() {
            acc = algebra::add(&acc, &v.apply(psi)?)?;
        }
        Ok(acc)
    }

    fn label(&self) -> &str { "hamiltonian" }

    fn split(&self, psi: &LatticeField) -> LResult<Option<Splitting>> {
        let mut acc = Splitting::zero(psi);
        if let Some(s) = self.hopping.split(psi)? { acc.accumulate(&s); }
        for v in self.potentials.iter() {
            if let Some(s) = v.split(psi)? { acc.accumulate(&s); }
        }
        Ok(Some(acc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ Boundary, LatticeError, Region, WaveType };

    fn delta(n: usize, x0: usize, boundary: Boundary) -> LatticeField {
        let mut f = LatticeField::zeros([n], boundary, WaveType::Delta)
            .unwrap();
        f.set(&[x0], C64::new(1.0, 0.0)).unwrap();
        f
    }

    #[test]
    fn hopping_on_delta() {
        let psi = delta(10, 4, Boundary::Open);
        let h = TightBinding::new(1.5).apply(&psi).unwrap();
        assert_eq!(h.get(&[3]).unwrap(), C64::new(-1.5, 0.0));
        assert_eq!(h.get(&[5]).unwrap(), C64::new(-1.5, 0.0));
        assert_eq!(h.get(&[4]).unwrap(), C64::zero());
        assert!((h.norm() - 2.0 * 1.5 * 1.5).abs() < 1e-12);
    }

    #[test]
    fn hopping_wraps_on_periodic() {
        let psi = delta(6, 0, Boundary::Periodic);
        let h = TightBinding::new(1.0).apply(&psi).unwrap();
        assert_eq!(h.get(&[5]).unwrap(), C64::new(-1.0, 0.0));
        let psi = delta(6, 0, Boundary::Open);
        let h = TightBinding::new(1.0).apply(&psi).unwrap();
        assert_eq!(h.get(&[5]).unwrap(), C64::zero());
    }

    #[test]
    fn per_axis_hopping() {
        let mut psi
            = LatticeField::zeros([5, 5], Boundary::Open, WaveType::Delta)
            .unwrap();
        psi.set(&[2, 2], C64::new(1.0, 0.0)).unwrap();
        let h = TightBinding::per_axis([1.0, 0.0]).apply(&psi).unwrap();
        assert_eq!(h.get(&[1, 2]).unwrap(), C64::new(-1.0, 0.0));
        assert_eq!(h.get(&[2, 1]).unwrap(), C64::zero());
        assert!(matches!(
            TightBinding::per_axis([1.0]).apply(&psi),
            Err(LatticeError::DimensionMismatch(_)),
        ));
    }

    #[test]
    fn uniform_plane_wave_energy() {
        // a constant state on a periodic ring is an eigenstate with E = -2J
        let mut psi
            = LatticeField::zeros([16], Boundary::Periodic, WaveType::FreeWave)
            .unwrap();
        for i in 0..16 { psi.set_flat(i, C64::new(0.25, 0.0)).unwrap(); }
        let e = energy(&[TightBinding::new(0.7)], &psi).unwrap();
        assert!((e.re + 1.4).abs() < 1e-12);
        assert!(e.im.abs() < 1e-12);
    }

    #[test]
    fn composite_equals_term_list() {
        let psi = delta(12, 3, Boundary::Open);
        let v = Potential::real("step", Region::x(0, 6), 0.5);
        let w = Potential::absorbing("edge", Region::x(9, 12), 2.0);
        let ham
            = Hamiltonian::new(TightBinding::new(1.0))
            .with_potential(v.clone())
            .with_potential(w.clone());
        let terms: Vec<Box<dyn Term>>
            = vec![Box::new(w), Box::new(TightBinding::new(1.0)), Box::new(v)];
        let a = ham.apply(&psi).unwrap();
        let b = apply_terms(&terms, &psi).unwrap();
        assert!(a.max_abs_diff(&b).unwrap() < 1e-14);

        let sa = ham.split(&psi).unwrap().unwrap();
        let sb = split_terms(&terms, &psi).unwrap().unwrap();
        assert_eq!(sa, sb);
        assert_eq!(sa.hopping, vec![1.0]);
        assert_eq!(sa.diagonal[0], C64::new(0.5, 0.0));
        assert_eq!(sa.diagonal[10], C64::new(0.0, -2.0));
    }

    #[test]
    fn empty_term_list_is_zero() {
        let psi = delta(5, 2, Boundary::Open);
        let terms: Vec<Box<dyn Term>> = Vec::new();
        let h = apply_terms(&terms, &psi).unwrap();
        assert_eq!(h.norm(), 0.0);
    }
}
