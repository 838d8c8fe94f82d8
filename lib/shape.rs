//! Lattice extents and conversion between flat storage indices and lattice
//! coordinates.
//!
//! Storage is row-major over axes in declared order, i.e. the last axis varies
//! fastest:
//! ```text
//! index = ((x₀ n₁ + x₁) n₂ + x₂) ...
//! ```

use serde::{ Deserialize, Serialize };
use crate::error::{ LatticeError, RangeError };

/// Behavior of a lattice at its edges.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    /// Edges wrap around to the opposite side.
    Periodic,
    /// Sites past an edge carry zero amplitude.
    Open,
    /// Like [`Self::Open`], but marks a lattice whose edges are meant to be
    /// covered by absorbing potentials.
    Absorbing,
}

impl Boundary {
    pub fn wraps(self) -> bool { matches!(self, Self::Periodic) }
}

/// Per-axis extents of a lattice.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    extents: Vec<usize>,
    strides: Vec<usize>,
    len: usize,
}

impl Shape {
    /// Create a new shape.
    ///
    /// Fails if `extents` is empty or contains a zero.
    pub fn new<E>(extents: E) -> Result<Self, LatticeError>
    where E: Into<Vec<usize>>
    {
        let extents: Vec<usize> = extents.into();
        if extents.is_empty() || extents.contains(&0) {
            return Err(LatticeError::InvalidShape(extents));
        }
        let mut strides = vec![1; extents.len()];
        for ax in (0..extents.len() - 1).rev() {
            strides[ax] = strides[ax + 1] * extents[ax + 1];
        }
        let len = extents.iter().product();
        Ok(Self { extents, strides, len })
    }

    /// Per-axis extents.
    pub fn extents(&self) -> &[usize] { &self.extents }

    /// Number of axes.
    pub fn ndim(&self) -> usize { self.extents.len() }

    /// Total number of sites.
    pub fn len(&self) -> usize { self.len }

    /// Always `false`; zero-size lattices cannot be constructed.
    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Distance in flat storage between neighbors along `axis`.
    ///
    /// *Panics if `axis` is out of range*.
    pub fn stride(&self, axis: usize) -> usize { self.strides[axis] }

    /// Convert a coordinate to a flat index.
    pub fn flatten(&self, coord: &[usize]) -> Result<usize, RangeError> {
        let in_range
            = coord.len() == self.ndim()
            && coord.iter().zip(&self.extents).all(|(x, n)| x < n);
        if !in_range {
            return Err(RangeError::Coord {
                coord: coord.to_vec(),
                extents: self.extents.clone(),
            });
        }
        Ok(coord.iter().zip(&self.strides).map(|(x, s)| x * s).sum())
    }

    /// Convert a flat index to a coordinate.
    pub fn unflatten(&self, index: usize) -> Result<Vec<usize>, RangeError> {
        self.check_flat(index)?;
        let coord
            = self.strides.iter().zip(&self.extents)
            .map(|(s, n)| (index / s) % n)
            .collect();
        Ok(coord)
    }

    pub(crate) fn check_flat(&self, index: usize) -> Result<(), RangeError> {
        (index < self.len).then_some(())
            .ok_or(RangeError::Flat { index, len: self.len })
    }

    /// Coordinate of flat `index` along a single axis.
    ///
    /// *Panics if `axis` is out of range*.
    pub fn coord_along(&self, index: usize, axis: usize) -> usize {
        (index / self.strides[axis]) % self.extents[axis]
    }

    /// Flat index of the site `step` sites away from `index` along `axis`.
    ///
    /// Returns `None` when the neighbor falls off a non-periodic edge.
    ///
    /// *Panics if `axis` is out of range*.
    pub fn neighbor(
        &self,
        index: usize,
        axis: usize,
        step: isize,
        boundary: Boundary,
    ) -> Option<usize>
    {
        let n = self.extents[axis] as isize;
        let x = self.coord_along(index, axis) as isize;
        let target = x + step;
        let target
            = if (0..n).contains(&target) {
                target
            } else if boundary.wraps() {
                target.rem_euclid(n)
            } else {
                return None;
            };
        let s = self.strides[axis] as isize;
        Some((index as isize + (target - x) * s) as usize)
    }
}
