//! Elementwise arithmetic on [`LatticeField`]s.
//!
//! Three operand shapes are supported: (real scalar, field), (complex scalar,
//! field), and (field, field). Scalar operands are anything that converts into
//! a [`C64`], so `f64` works as well. Field-field operations require identical
//! extents and fail with [`LatticeError::DimensionMismatch`] before any work is
//! done.
//!
//! Every function here returns a newly allocated field and leaves its
//! arguments untouched; [`renormalize`] is the single in-place exception and is
//! named accordingly. All work is split over the field's
//! [`Partition`][crate::parallel::Partition].
//!
//! ```
//! use num_complex::Complex64 as C64;
//! use latspace::{ algebra, Boundary, LatticeField, WaveType };
//!
//! let mut a = LatticeField::zeros([4], Boundary::Periodic, WaveType::Custom)
//!     .unwrap();
//! a.set(&[1], C64::new(3.0, 4.0)).unwrap();
//! let b = algebra::scale(&a, 2.0);
//! let c = algebra::sub(&b, &a).unwrap();
//! assert_eq!(c.get(&[1]).unwrap(), C64::new(3.0, 4.0));
//! assert_eq!(c.norm(), 25.0);
//! ```

use num_complex::Complex64 as C64;
use num_traits::Zero;
use crate::{
    LResult,
    error::LatticeError,
    field::LatticeField,
};

/// Direction of a neighbor shift.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Shift {
    /// Lattice axis.
    pub axis: usize,
    /// Signed number of sites.
    pub step: isize,
}

impl Shift {
    /// Take values from the `+1` neighbor along `axis`.
    pub fn forward(axis: usize) -> Self { Self { axis, step: 1 } }

    /// Take values from the `-1` neighbor along `axis`.
    pub fn backward(axis: usize) -> Self { Self { axis, step: -1 } }

    /// The shift in the opposite direction.
    pub fn reversed(self) -> Self { Self { axis: self.axis, step: -self.step } }
}

fn zip_with<F>(a: &LatticeField, b: &LatticeField, f: F) -> LResult<LatticeField>
where F: Fn(C64, C64) -> C64 + Sync
{
    a.check_shape(b)?;
    Ok(a.derive(a.partition.zip_map(&a.data, &b.data, f)))
}

fn map_with<F>(a: &LatticeField, f: F) -> LatticeField
where F: Fn(C64) -> C64 + Sync
{
    a.derive(a.partition.map(&a.data, |_, z| f(z)))
}

/// Elementwise `a + b`.
pub fn add(a: &LatticeField, b: &LatticeField) -> LResult<LatticeField> {
    zip_with(a, b, |ak, bk| ak + bk)
}

/// Elementwise `a - b`.
pub fn sub(a: &LatticeField, b: &LatticeField) -> LResult<LatticeField> {
    zip_with(a, b, |ak, bk| ak - bk)
}

/// Elementwise (Hadamard) product `a * b`.
pub fn mul(a: &LatticeField, b: &LatticeField) -> LResult<LatticeField> {
    zip_with(a, b, |ak, bk| ak * bk)
}

/// Elementwise `a + s * b`.
pub fn axpy<S>(a: &LatticeField, s: S, b: &LatticeField)
    -> LResult<LatticeField>
where S: Into<C64>
{
    let s: C64 = s.into();
    zip_with(a, b, move |ak, bk| ak + s * bk)
}

/// Add `s` to every amplitude.
pub fn add_scalar<S>(a: &LatticeField, s: S) -> LatticeField
where S: Into<C64>
{
    let s: C64 = s.into();
    map_with(a, move |z| z + s)
}

/// Subtract `s` from every amplitude.
pub fn sub_scalar<S>(a: &LatticeField, s: S) -> LatticeField
where S: Into<C64>
{
    let s: C64 = s.into();
    map_with(a, move |z| z - s)
}

/// Multiply every amplitude by `s`.
pub fn scale<S>(a: &LatticeField, s: S) -> LatticeField
where S: Into<C64>
{
    let s: C64 = s.into();
    map_with(a, move |z| z * s)
}

/// Divide every amplitude by `s`.
///
/// Division by zero follows IEEE semantics and produces non-finite amplitudes.
pub fn div_scalar<S>(a: &LatticeField, s: S) -> LatticeField
where S: Into<C64>
{
    let s: C64 = s.into();
    map_with(a, move |z| z / s)
}

/// Complex conjugate of every amplitude.
pub fn conjugate(a: &LatticeField) -> LatticeField {
    map_with(a, |z| z.conj())
}

/// Total probability `Σ |ψ|²`.
pub fn norm(a: &LatticeField) -> f64 {
    a.partition.sum(&a.data, |z| z.norm_sqr())
}

/// Inner product `Σ conj(a) b`.
pub fn dot(a: &LatticeField, b: &LatticeField) -> LResult<C64> {
    a.check_shape(b)?;
    let re = a.partition.zip_sum(&a.data, &b.data, |ak, bk| (ak.conj() * bk).re);
    let im = a.partition.zip_sum(&a.data, &b.data, |ak, bk| (ak.conj() * bk).im);
    Ok(C64::new(re, im))
}

fn check_norm(n: f64) -> LResult<f64> {
    (n > 0.0 && n.is_finite()).then_some(n)
        .ok_or(LatticeError::DegenerateField(n))
}

/// Return a copy of `a` scaled to unit norm.
pub fn normalized(a: &LatticeField) -> LResult<LatticeField> {
    let n = check_norm(norm(a))?;
    Ok(scale(a, n.sqrt().recip()))
}

/// Scale `a` to unit norm *in place*.
///
/// On failure `a` is left untouched.
pub fn renormalize(a: &mut LatticeField) -> LResult<()> {
    let n = check_norm(norm(a))?;
    let r = n.sqrt().recip();
    let part = a.partition;
    part.for_each_mut(&mut a.data, |_, z| { *z *= r; });
    Ok(())
}

/// Replace every amplitude with that of its neighbor `shift.step` sites away
/// along `shift.axis`.
///
/// Periodic lattices wrap around their edges; open and absorbing lattices
/// substitute zero past an edge.
pub fn shift(a: &LatticeField, shift: Shift) -> LResult<LatticeField> {
    a.check_axis(shift.axis)?;
    let shape = a.shape();
    let boundary = a.boundary();
    let src = &a.data;
    let data
        = a.partition.map(src, |i, _| {
            shape.neighbor(i, shift.axis, shift.step, boundary)
                .map(|j| src[j])
                .unwrap_or_else(C64::zero)
        });
    Ok(a.derive(data))
}

impl LatticeField {
    /// See [`add`].
    pub fn add_field(&self, other: &Self) -> LResult<Self> { add(self, other) }

    /// See [`sub`].
    pub fn sub_field(&self, other: &Self) -> LResult<Self> { sub(self, other) }

    /// See [`mul`].
    pub fn mul_field(&self, other: &Self) -> LResult<Self> { mul(self, other) }

    /// See [`add_scalar`].
    pub fn add_scalar<S>(&self, s: S) -> Self
    where S: Into<C64>
    {
        add_scalar(self, s)
    }

    /// See [`sub_scalar`].
    pub fn sub_scalar<S>(&self, s: S) -> Self
    where S: Into<C64>
    {
        sub_scalar(self, s)
    }

    /// See [`scale`].
    pub fn scale<S>(&self, s: S) -> Self
    where S: Into<C64>
    {
        scale(self, s)
    }

    /// See [`div_scalar`].
    pub fn div_scalar<S>(&self, s: S) -> Self
    where S: Into<C64>
    {
        div_scalar(self, s)
    }

    /// See [`conjugate`].
    pub fn conjugate(&self) -> Self { conjugate(self) }

    /// See [`norm`].
    pub fn norm(&self) -> f64 { norm(self) }

    /// See [`dot`].
    pub fn dot(&self, other: &Self) -> LResult<C64> { dot(self, other) }

    /// See [`normalized`].
    pub fn normalized(&self) -> LResult<Self> { normalized(self) }

    /// See [`renormalize`].
    pub fn renormalize(&mut self) -> LResult<()> { renormalize(self) }

    /// See [`shift`][fn@shift].
    pub fn shift(&self, s: Shift) -> LResult<Self> { shift(self, s) }
}
