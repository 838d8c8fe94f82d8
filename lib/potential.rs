//! Spatially bounded potentials.
//!
//! A [`Potential`] acts on the sites of a box-shaped [`Region`] and is zero
//! elsewhere. Real potentials carry an on-site energy `V`; imaginary ones carry
//! `iV`. Absorbing potentials are imaginary potentials with `V = -γ` for a
//! damping coefficient `γ > 0`, so that under `∂ψ/∂t = -iHψ` the amplitude in
//! the region decays as `exp(-γt)` instead of reflecting off the lattice edge.

use std::ops::Range;
use num_complex::Complex64 as C64;
use num_traits::Zero;
use crate::{
    LResult,
    error::{ LatticeError, ShapeMismatch },
    field::LatticeField,
    hamiltonian::{ Splitting, Term },
    shape::Shape,
};

/// A half-open box `[start, end)` along every axis of a lattice.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    ranges: Vec<Range<usize>>,
}

impl Region {
    /// Create a region from per-axis `(start, end)` pairs.
    ///
    /// Fails if any `start > end`.
    pub fn new<R>(ranges: R) -> LResult<Self>
    where R: IntoIterator<Item = (usize, usize)>
    {
        let ranges: Vec<Range<usize>>
            = ranges.into_iter()
            .map(|(a, b)| a..b)
            .collect();
        if let Some((axis, r))
            = ranges.iter().enumerate().find(|(_, r)| r.start > r.end)
        {
            return Err(LatticeError::InvalidRegion {
                axis, start: r.start, end: r.end, extent: None });
        }
        Ok(Self { ranges })
    }

    /// One-dimensional region `[x0, x1)`.
    ///
    /// *Panics if `x0 > x1`*; use [`Self::new`] for a checked constructor.
    pub fn x(x0: usize, x1: usize) -> Self {
        assert!(x0 <= x1, "Region::x: start {x0} > end {x1}");
        Self { ranges: vec![x0..x1] }
    }

    /// Two-dimensional block `[x0, x1) × [y0, y1)`.
    ///
    /// *Panics if either start exceeds its end*; use [`Self::new`] for a
    /// checked constructor.
    pub fn xy(x0: usize, x1: usize, y0: usize, y1: usize) -> Self {
        assert!(x0 <= x1 && y0 <= y1, "Region::xy: inverted range");
        Self { ranges: vec![x0..x1, y0..y1] }
    }

    pub fn ranges(&self) -> &[Range<usize>] { &self.ranges }

    pub fn ndim(&self) -> usize { self.ranges.len() }

    /// Fail if this region has the wrong number of axes for `shape` or extends
    /// past its edges.
    pub fn check(&self, shape: &Shape) -> LResult<()> {
        if self.ndim() != shape.ndim() {
            let ends: Vec<usize> = self.ranges.iter().map(|r| r.end).collect();
            return Err(ShapeMismatch(ends, shape.extents().to_vec()).into());
        }
        let bad
            = self.ranges.iter().zip(shape.extents()).enumerate()
            .find(|(_, (r, &n))| r.end > n);
        if let Some((axis, (r, &n))) = bad {
            return Err(LatticeError::InvalidRegion {
                axis, start: r.start, end: r.end, extent: Some(n) });
        }
        Ok(())
    }

    /// Return `true` if flat `index` of `shape` lies inside this region.
    ///
    /// Assumes [`Self::check`] has passed.
    pub fn contains_flat(&self, shape: &Shape, index: usize) -> bool {
        self.ranges.iter().enumerate()
            .all(|(ax, r)| r.contains(&shape.coord_along(index, ax)))
    }

    /// Number of sites inside the region.
    pub fn len(&self) -> usize {
        self.ranges.iter().map(|r| r.len()).product()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Whether a potential contributes a real or imaginary on-site energy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PotentialKind {
    Real,
    Imaginary,
}

/// A constant potential over a [`Region`].
#[derive(Clone, Debug, PartialEq)]
pub struct Potential {
    name: String,
    region: Region,
    kind: PotentialKind,
    magnitude: f64,
}

impl Potential {
    /// Real potential `V = value` over `region`.
    pub fn real<S>(name: S, region: Region, value: f64) -> Self
    where S: Into<String>
    {
        Self {
            name: name.into(),
            region,
            kind: PotentialKind::Real,
            magnitude: value,
        }
    }

    /// Imaginary potential `V = i value` over `region`.
    pub fn imaginary<S>(name: S, region: Region, value: f64) -> Self
    where S: Into<String>
    {
        Self {
            name: name.into(),
            region,
            kind: PotentialKind::Imaginary,
            magnitude: value,
        }
    }

    /// Absorbing potential `V = -i damping` over `region`.
    ///
    /// `damping` is given as a positive coefficient and stored negated.
    pub fn absorbing<S>(name: S, region: Region, damping: f64) -> Self
    where S: Into<String>
    {
        if damping < 0.0 {
            log::warn!(
                "absorbing potential with negative damping {damping} will \
                amplify instead of absorb"
            );
        }
        Self::imaginary(name, region, -damping)
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn region(&self) -> &Region { &self.region }

    pub fn kind(&self) -> PotentialKind { self.kind }

    /// Stored magnitude (already negated for absorbing potentials).
    pub fn magnitude(&self) -> f64 { self.magnitude }

    /// On-site energy inside the region.
    pub fn value(&self) -> C64 {
        match self.kind {
            PotentialKind::Real => C64::new(self.magnitude, 0.0),
            PotentialKind::Imaginary => C64::new(0.0, self.magnitude),
        }
    }

    /// Return `V ψ` inside the region and zero elsewhere.
    ///
    /// This is the potential's contribution to `Hψ`.
    pub fn apply(&self, psi: &LatticeField) -> LResult<LatticeField> {
        self.region.check(psi.shape())?;
        let v = self.value();
        let shape = psi.shape();
        let data
            = psi.partition.map(&psi.data, |i, z| {
                if self.region.contains_flat(shape, i) { v * z } else { C64::zero() }
            });
        Ok(psi.derive(data))
    }

    /// Return `ψ + V` inside the region and `ψ` elsewhere.
    pub fn offset(&self, psi: &LatticeField) -> LResult<LatticeField> {
        self.region.check(psi.shape())?;
        let v = self.value();
        let shape = psi.shape();
        let data
            = psi.partition.map(&psi.data, |i, z| {
                if self.region.contains_flat(shape, i) { z + v } else { z }
            });
        Ok(psi.derive(data))
    }

    /// On-site energy at every flat index of `psi`'s lattice.
    pub fn diagonal(&self, psi: &LatticeField) -> LResult<Vec<C64>> {
        self.region.check(psi.shape())?;
        let v = self.value();
        let shape = psi.shape();
        let diag
            = (0..psi.len())
            .map(|i| {
                if self.region.contains_flat(shape, i) { v } else { C64::zero() }
            })
            .collect();
        Ok(diag)
    }
}

impl Term for Potential {
    fn apply(&self, psi: &LatticeField) -> LResult<LatticeField> {
        Potential::apply(self, psi)
    }

    fn label(&self) -> &str { &self.name }

    fn split(&self, psi: &LatticeField) -> LResult<Option<Splitting>> {
        Ok(Some(Splitting {
            hopping: vec![0.0; psi.ndim()],
            diagonal: self.diagonal(psi)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ Boundary, WaveType };

    fn ones(extents: &[usize]) -> LatticeField {
        let mut f
            = LatticeField::zeros(extents, Boundary::Open, WaveType::Custom)
            .unwrap();
        for i in 0..f.len() { f.set_flat(i, C64::new(1.0, 1.0)).unwrap(); }
        f
    }

    #[test]
    fn real_potential_contribution() {
        let psi = ones(&[8]);
        let v = Potential::real("bar", Region::x(2, 5), 3.0);
        let h = v.apply(&psi).unwrap();
        assert_eq!(h.get(&[1]).unwrap(), C64::zero());
        assert_eq!(h.get(&[2]).unwrap(), C64::new(3.0, 3.0));
        assert_eq!(h.get(&[4]).unwrap(), C64::new(3.0, 3.0));
        assert_eq!(h.get(&[5]).unwrap(), C64::zero());
    }

    #[test]
    fn absorbing_stores_negative() {
        let v = Potential::absorbing("edge", Region::x(0, 2), 0.5);
        assert_eq!(v.kind(), PotentialKind::Imaginary);
        assert_eq!(v.magnitude(), -0.5);
        assert_eq!(v.value(), C64::new(0.0, -0.5));
        let psi = ones(&[4]);
        let h = v.apply(&psi).unwrap();
        // -0.5i * (1 + i)
        assert_eq!(h.get(&[0]).unwrap(), C64::new(0.5, -0.5));
        assert_eq!(h.get(&[3]).unwrap(), C64::zero());
    }

    #[test]
    fn offset_adds_inside_only() {
        let psi = ones(&[3, 3]);
        let v = Potential::imaginary("blk", Region::xy(1, 3, 0, 1), 2.0);
        let o = v.offset(&psi).unwrap();
        assert_eq!(o.get(&[1, 0]).unwrap(), C64::new(1.0, 3.0));
        assert_eq!(o.get(&[2, 0]).unwrap(), C64::new(1.0, 3.0));
        assert_eq!(o.get(&[1, 1]).unwrap(), C64::new(1.0, 1.0));
        assert_eq!(o.get(&[0, 0]).unwrap(), C64::new(1.0, 1.0));
        assert_eq!(psi.get(&[1, 0]).unwrap(), C64::new(1.0, 1.0));
    }

    #[test]
    fn invalid_regions() {
        assert!(matches!(
            Region::new([(3, 1)]),
            Err(LatticeError::InvalidRegion { axis: 0, extent: None, .. }),
        ));
        let psi = ones(&[4]);
        let v = Potential::real("wide", Region::x(2, 5), 1.0);
        assert!(matches!(
            v.apply(&psi),
            Err(LatticeError::InvalidRegion { extent: Some(4), .. }),
        ));
        let w = Potential::real("flat", Region::xy(0, 1, 0, 1), 1.0);
        assert!(matches!(
            w.apply(&psi),
            Err(LatticeError::DimensionMismatch(_)),
        ));
    }

    #[test]
    fn region_len() {
        let r = Region::new([(1, 3), (0, 4), (2, 2)]).unwrap();
        assert_eq!(r.len(), 0);
        assert!(r.is_empty());
        assert_eq!(Region::xy(0, 2, 1, 4).len(), 6);
    }
}
