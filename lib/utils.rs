//! Miscellaneous tools.

use ndarray::{ self as nd, concatenate };
use num_complex::Complex64 as C64;
use rustfft as fft;

/// Generate an array of frequency-space coordinates to accompany a FFT of `n`
/// points for sampling interval `dt`.
pub fn fft_freq(n: usize, dt: f64) -> nd::Array1<f64> {
    if n % 2 == 0 {
        let fp: nd::Array1<f64>
            = (0..n / 2)
            .map(|k| k as f64 / (n as f64 * dt))
            .collect();
        let fm: nd::Array1<f64>
            = (1..n / 2 + 1).rev()
            .map(|k| -(k as f64) / (n as f64 * dt))
            .collect();
        concatenate!(nd::Axis(0), fp, fm)
    } else {
        let fp: nd::Array1<f64>
            = (0..(n + 1) / 2)
            .map(|k| k as f64 / (n as f64 * dt))
            .collect();
        let fm: nd::Array1<f64>
            = (1..(n + 1) / 2).rev()
            .map(|k| -(k as f64) / (n as f64 * dt))
            .collect();
        concatenate!(nd::Axis(0), fp, fm)
    }
}

/// Lattice momenta `k ∊ (-π, π]` accompanying a FFT over `n` sites with unit
/// spacing, in FFT output order.
pub fn lattice_momenta(n: usize) -> nd::Array1<f64> {
    fft_freq(n, 1.0) * std::f64::consts::TAU
}

// process every lane along every axis with one FFT plan per axis
//
// lanes along all but the last axis are strided, so each is copied through a
// contiguous scratch buffer
fn fft_lanes<D>(x: &mut nd::ArrayViewMut<'_, C64, D>, inverse: bool)
where D: nd::Dimension
{
    let mut planner = fft::FftPlanner::new();
    for ax in 0..x.ndim() {
        let n = x.len_of(nd::Axis(ax));
        let plan
            = if inverse {
                planner.plan_fft_inverse(n)
            } else {
                planner.plan_fft_forward(n)
            };
        let mut buf: Vec<C64> = vec![C64::new(0.0, 0.0); n];
        for mut lane in x.lanes_mut(nd::Axis(ax)) {
            buf.iter_mut().zip(lane.iter()).for_each(|(b, l)| { *b = *l; });
            plan.process(&mut buf);
            lane.iter_mut().zip(&buf).for_each(|(l, b)| { *l = *b; });
        }
    }
}

/// Perform the multi-dimensional, complex-valued FFT over all axes in place.
pub fn fft_inplace<D>(x: &mut nd::ArrayViewMut<'_, C64, D>)
where D: nd::Dimension
{
    fft_lanes(x, false);
}

/// Perform the multi-dimensional, complex-valued inverse FFT over all axes in
/// place, including the `1/N` normalization.
pub fn ifft_inplace<D>(x: &mut nd::ArrayViewMut<'_, C64, D>)
where D: nd::Dimension
{
    fft_lanes(x, true);
    let n = x.len() as f64;
    x.map_inplace(|xk| { *xk /= n; });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freq_order() {
        let f = fft_freq(4, 1.0);
        assert_eq!(f.to_vec(), vec![0.0, 0.25, -0.5, -0.25]);
        let f = fft_freq(5, 0.5);
        assert_eq!(f.to_vec(), vec![0.0, 0.4, 0.8, -0.8, -0.4]);
    }

    #[test]
    fn fft_roundtrip_2d() {
        let mut a: nd::Array2<C64>
            = nd::Array2::from_shape_fn((4, 6), |(i, j)| {
                C64::new(i as f64 - j as f64, (i * j) as f64 * 0.1)
            });
        let orig = a.clone();
        let mut v = a.view_mut();
        fft_inplace(&mut v);
        ifft_inplace(&mut v);
        let err: f64 = (&a - &orig).iter().map(|z| z.norm()).sum();
        assert!(err < 1e-10);
    }

    #[test]
    fn fft_of_constant_is_delta() {
        let mut a: nd::Array2<C64> = nd::Array2::from_elem((3, 4), C64::new(1.0, 0.0));
        fft_inplace(&mut a.view_mut());
        assert!((a[[0, 0]] - C64::new(12.0, 0.0)).norm() < 1e-12);
        let rest: f64
            = a.iter().skip(1).map(|z| z.norm()).sum();
        assert!(rest < 1e-12);
    }
}
