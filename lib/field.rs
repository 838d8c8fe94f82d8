//! Complex-valued wavefunction fields over a lattice.

use std::{ collections::BTreeMap, sync::Arc };
use ndarray as nd;
use num_complex::Complex64 as C64;
use num_traits::Zero;
use serde::{ Deserialize, Serialize };
use crate::{
    LResult,
    error::{ RangeError, ShapeMismatch },
    parallel::Partition,
    shape::{ Boundary, Shape },
};

/// Describes how a field was produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveType {
    FreeWave,
    Gauss,
    Delta,
    Custom,
}

/// Immutable lattice metadata attached to a field.
///
/// Named parameters (wavenumbers, packet widths, start offsets, ...) are kept
/// for provenance only and never enter a computation.
#[derive(Clone, Debug, PartialEq)]
pub struct WfInfo {
    shape: Shape,
    boundary: Boundary,
    wave_type: WaveType,
    params: BTreeMap<String, f64>,
}

impl WfInfo {
    /// Create a new metadata block with no named parameters.
    pub fn new<E>(extents: E, boundary: Boundary, wave_type: WaveType)
        -> LResult<Self>
    where E: Into<Vec<usize>>
    {
        let shape = Shape::new(extents)?;
        Ok(Self { shape, boundary, wave_type, params: BTreeMap::new() })
    }

    /// Attach a named parameter.
    pub fn with_param<S>(mut self, name: S, value: f64) -> Self
    where S: Into<String>
    {
        self.params.insert(name.into(), value);
        self
    }

    pub fn shape(&self) -> &Shape { &self.shape }

    pub fn extents(&self) -> &[usize] { self.shape.extents() }

    pub fn ndim(&self) -> usize { self.shape.ndim() }

    pub fn boundary(&self) -> Boundary { self.boundary }

    pub fn wave_type(&self) -> WaveType { self.wave_type }

    pub fn params(&self) -> &BTreeMap<String, f64> { &self.params }

    pub fn param(&self, name: &str) -> Option<f64> {
        self.params.get(name).copied()
    }
}

/// A complex amplitude for every site of a lattice.
///
/// Amplitudes are stored flat in row-major order (see [`Shape`]). The metadata
/// is shared read-only between a field and every field derived from it;
/// cloning a field copies its amplitudes.
///
/// All arithmetic (see [`algebra`][crate::algebra]) returns a new field. The
/// only operations that modify a field in place are [`Self::set`],
/// [`Self::set_flat`], and [`Self::renormalize`].
#[derive(Clone, Debug)]
pub struct LatticeField {
    pub(crate) info: Arc<WfInfo>,
    pub(crate) partition: Partition,
    pub(crate) data: Vec<C64>,
}

impl LatticeField {
    /// Create an all-zero field from a metadata block.
    pub fn from_info(info: WfInfo) -> Self {
        let n = info.shape.len();
        Self {
            partition: Partition::for_current_pool(n),
            info: Arc::new(info),
            data: vec![C64::zero(); n],
        }
    }

    /// Create an all-zero field.
    pub fn zeros<E>(extents: E, boundary: Boundary, wave_type: WaveType)
        -> LResult<Self>
    where E: Into<Vec<usize>>
    {
        Ok(Self::from_info(WfInfo::new(extents, boundary, wave_type)?))
    }

    /// Create a field from flat, row-major amplitudes.
    ///
    /// Fails if the number of amplitudes does not match the site count.
    pub fn from_vec(info: WfInfo, data: Vec<C64>) -> LResult<Self> {
        let n = info.shape.len();
        if data.len() != n {
            return Err(ShapeMismatch(
                info.extents().to_vec(), vec![data.len()]).into());
        }
        Ok(Self {
            partition: Partition::for_current_pool(n),
            info: Arc::new(info),
            data,
        })
    }

    /// Create a new all-zero field with the same shape and metadata as `self`.
    pub fn zeros_like(&self) -> Self {
        self.derive(vec![C64::zero(); self.data.len()])
    }

    // wrap new amplitudes with the metadata and partition of `self`
    pub(crate) fn derive(&self, data: Vec<C64>) -> Self {
        Self { info: Arc::clone(&self.info), partition: self.partition, data }
    }

    /// Return `self` re-partitioned into `chunks` chunks for parallel
    /// operations.
    ///
    /// Fields created inside a [`Workers`][crate::parallel::Workers] pool are
    /// partitioned per thread of that pool; fix the chunk count explicitly to
    /// reproduce reductions bit for bit across machines.
    pub fn with_partition(mut self, chunks: usize) -> Self {
        self.partition = Partition::new(self.data.len(), chunks);
        self
    }

    pub fn info(&self) -> &WfInfo { &self.info }

    pub fn shape(&self) -> &Shape { &self.info.shape }

    pub fn extents(&self) -> &[usize] { self.info.extents() }

    pub fn ndim(&self) -> usize { self.info.ndim() }

    pub fn boundary(&self) -> Boundary { self.info.boundary }

    pub fn partition(&self) -> Partition { self.partition }

    /// Total number of sites.
    pub fn len(&self) -> usize { self.data.len() }

    /// Always `false`; zero-size lattices cannot be constructed.
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// Fail if `other` has different extents.
    pub fn check_shape(&self, other: &Self) -> Result<(), ShapeMismatch> {
        ShapeMismatch::check(self.shape(), other.shape())
    }

    /// Get the amplitude at a coordinate.
    pub fn get(&self, coord: &[usize]) -> LResult<C64> {
        let k = self.shape().flatten(coord)?;
        Ok(self.data[k])
    }

    /// Set the amplitude at a coordinate.
    pub fn set(&mut self, coord: &[usize], value: C64) -> LResult<()> {
        let k = self.shape().flatten(coord)?;
        self.data[k] = value;
        Ok(())
    }

    /// Get the amplitude at a flat index.
    pub fn get_flat(&self, index: usize) -> LResult<C64> {
        self.shape().check_flat(index)?;
        Ok(self.data[index])
    }

    /// Set the amplitude at a flat index.
    pub fn set_flat(&mut self, index: usize, value: C64) -> LResult<()> {
        self.shape().check_flat(index)?;
        self.data[index] = value;
        Ok(())
    }

    /// Flat, row-major amplitudes.
    pub fn as_slice(&self) -> &[C64] { &self.data }

    /// Flat amplitudes as a one-dimensional array view.
    pub fn array(&self) -> nd::ArrayView1<'_, C64> {
        nd::ArrayView1::from(self.data.as_slice())
    }

    /// Amplitudes as a view shaped like the lattice.
    pub fn view(&self) -> LResult<nd::ArrayViewD<'_, C64>> {
        let dim = nd::IxDyn(self.extents());
        Ok(nd::ArrayViewD::from_shape(dim, self.data.as_slice())?)
    }

    /// Copy the amplitudes into an owned array shaped like the lattice.
    pub fn to_array(&self) -> LResult<nd::ArrayD<C64>> {
        Ok(self.view()?.to_owned())
    }

    /// Probability density `|ψ|²` at every site, shaped like the lattice.
    pub fn density(&self) -> LResult<nd::ArrayD<f64>> {
        Ok(self.view()?.mapv(|z| z.norm_sqr()))
    }

    /// Largest elementwise distance `|a - b|` between two fields.
    pub fn max_abs_diff(&self, other: &Self) -> LResult<f64> {
        self.check_shape(other)?;
        let d
            = self.data.iter().zip(&other.data)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max);
        Ok(d)
    }

    pub(crate) fn check_axis(&self, axis: usize) -> Result<(), RangeError> {
        let ndim = self.ndim();
        (axis < ndim).then_some(()).ok_or(RangeError::Axis { axis, ndim })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LatticeError;

    fn field_2d() -> LatticeField {
        LatticeField::zeros([3, 4], Boundary::Periodic, WaveType::Custom)
            .unwrap()
    }

    #[test]
    fn zeros_has_declared_len() {
        let f = field_2d();
        assert_eq!(f.len(), 12);
        assert_eq!(f.extents(), &[3, 4]);
        assert!(f.as_slice().iter().all(|z| z.is_zero()));
    }

    #[test]
    fn get_set_coord_and_flat() {
        let mut f = field_2d();
        f.set(&[1, 2], C64::new(1.0, -2.0)).unwrap();
        assert_eq!(f.get(&[1, 2]).unwrap(), C64::new(1.0, -2.0));
        assert_eq!(f.get_flat(6).unwrap(), C64::new(1.0, -2.0));
        f.set_flat(11, C64::i()).unwrap();
        assert_eq!(f.get(&[2, 3]).unwrap(), C64::i());
    }

    #[test]
    fn set_out_of_range_fails() {
        let mut f = field_2d();
        assert!(matches!(
            f.set(&[3, 0], C64::i()),
            Err(LatticeError::OutOfRange(_)),
        ));
        assert!(matches!(
            f.set_flat(12, C64::i()),
            Err(LatticeError::OutOfRange(_)),
        ));
        assert!(f.as_slice().iter().all(|z| z.is_zero()));
    }

    #[test]
    fn params_are_kept() {
        let info
            = WfInfo::new([8], Boundary::Open, WaveType::Gauss).unwrap()
            .with_param("k", 0.25)
            .with_param("sigma", 2.0);
        let f = LatticeField::from_info(info);
        assert_eq!(f.info().param("k"), Some(0.25));
        assert_eq!(f.info().param("sigma"), Some(2.0));
        assert_eq!(f.info().param("x0"), None);
        assert_eq!(f.zeros_like().info().param("k"), Some(0.25));
    }

    #[test]
    fn clone_is_independent() {
        let mut a = field_2d();
        a.set(&[0, 0], C64::new(3.0, 0.0)).unwrap();
        let mut b = a.clone();
        b.set(&[0, 0], C64::new(5.0, 0.0)).unwrap();
        assert_eq!(a.get(&[0, 0]).unwrap(), C64::new(3.0, 0.0));
        assert_eq!(b.get(&[0, 0]).unwrap(), C64::new(5.0, 0.0));
    }

    #[test]
    fn from_vec_checks_len() {
        let info = WfInfo::new([2, 2], Boundary::Open, WaveType::Custom)
            .unwrap();
        assert!(matches!(
            LatticeField::from_vec(info, vec![C64::zero(); 3]),
            Err(LatticeError::DimensionMismatch(_)),
        ));
    }

    #[test]
    fn view_is_lattice_shaped() {
        let mut f = field_2d();
        f.set(&[2, 1], C64::new(2.0, 0.0)).unwrap();
        let v = f.view().unwrap();
        assert_eq!(v.shape(), &[3, 4]);
        assert_eq!(v[[2, 1]], C64::new(2.0, 0.0));
        assert_eq!(f.density().unwrap()[[2, 1]], 4.0);
    }
}
