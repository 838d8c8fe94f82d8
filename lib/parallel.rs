//! Partitioned parallel execution over the flat index range of a field.
//!
//! Every elementwise operation splits `[0, len)` into contiguous, disjoint
//! chunks of equal length (the last may be shorter) and hands each chunk to a
//! worker. Each output element is written by exactly one chunk, so results do
//! not depend on scheduling. Reductions are summed sequentially within a chunk
//! and the per-chunk partial sums are then combined in chunk order, which makes
//! them bitwise reproducible for a fixed chunk count.
//!
//! Work runs on whichever `rayon` pool is current: the global pool by default,
//! or a fixed-size [`Workers`] pool inside [`Workers::install`].

use std::{ ops::Range, sync::Arc };
use num_complex::Complex64 as C64;
use num_traits::Zero;
use rayon::prelude::*;
use crate::error::ConfigError;

/// A fixed split of `[0, len)` into contiguous chunks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Partition {
    len: usize,
    chunk_len: usize,
}

impl Partition {
    /// Split `len` sites into (at most) `chunks` chunks.
    ///
    /// A chunk count of zero is treated as one.
    pub fn new(len: usize, chunks: usize) -> Self {
        let chunks = chunks.max(1);
        let chunk_len = len.div_ceil(chunks).max(1);
        Self { len, chunk_len }
    }

    /// Split `len` sites into one chunk per thread of the current pool.
    pub fn for_current_pool(len: usize) -> Self {
        Self::new(len, rayon::current_num_threads())
    }

    pub fn len(&self) -> usize { self.len }

    pub fn is_empty(&self) -> bool { self.len == 0 }

    pub fn chunk_len(&self) -> usize { self.chunk_len }

    /// Actual number of chunks.
    pub fn num_chunks(&self) -> usize { self.len.div_ceil(self.chunk_len) }

    /// Iterate over the flat index range of each chunk, in order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.len).step_by(self.chunk_len)
            .map(|a| a..(a + self.chunk_len).min(self.len))
    }

    // compute `out[i] = f(i, src[i])` chunk-wise
    pub(crate) fn map<F>(&self, src: &[C64], f: F) -> Vec<C64>
    where F: Fn(usize, C64) -> C64 + Sync
    {
        let n = self.chunk_len;
        let mut out: Vec<C64> = vec![C64::zero(); src.len()];
        out.par_chunks_mut(n).zip(src.par_chunks(n)).enumerate()
            .for_each(|(c, (outc, srcc))| {
                let base = c * n;
                outc.iter_mut().zip(srcc).enumerate()
                    .for_each(|(k, (o, s))| { *o = f(base + k, *s); });
            });
        out
    }

    // compute `out[i] = f(a[i], b[i])` chunk-wise; `a` and `b` must have equal
    // length
    pub(crate) fn zip_map<F>(&self, a: &[C64], b: &[C64], f: F) -> Vec<C64>
    where F: Fn(C64, C64) -> C64 + Sync
    {
        let n = self.chunk_len;
        let mut out: Vec<C64> = vec![C64::zero(); a.len()];
        out.par_chunks_mut(n).zip(a.par_chunks(n)).zip(b.par_chunks(n))
            .for_each(|((outc, ac), bc)| {
                outc.iter_mut().zip(ac).zip(bc)
                    .for_each(|((o, ak), bk)| { *o = f(*ak, *bk); });
            });
        out
    }

    // apply `f(i, &mut x[i])` chunk-wise in place
    pub(crate) fn for_each_mut<F>(&self, x: &mut [C64], f: F)
    where F: Fn(usize, &mut C64) + Sync
    {
        let n = self.chunk_len;
        x.par_chunks_mut(n).enumerate()
            .for_each(|(c, xc)| {
                let base = c * n;
                xc.iter_mut().enumerate().for_each(|(k, xk)| f(base + k, xk));
            });
    }

    // sum `f(src[i])` with a fixed summation order
    pub(crate) fn sum<F>(&self, src: &[C64], f: F) -> f64
    where F: Fn(C64) -> f64 + Sync
    {
        let partials: Vec<f64>
            = src.par_chunks(self.chunk_len)
            .map(|c| c.iter().map(|z| f(*z)).fold(0.0, |acc, x| acc + x))
            .collect();
        partials.into_iter().fold(0.0, |acc, x| acc + x)
    }

    // sum `f(a[i], b[i])` with a fixed summation order
    pub(crate) fn zip_sum<F>(&self, a: &[C64], b: &[C64], f: F) -> f64
    where F: Fn(C64, C64) -> f64 + Sync
    {
        let n = self.chunk_len;
        let partials: Vec<f64>
            = a.par_chunks(n).zip(b.par_chunks(n))
            .map(|(ac, bc)| {
                ac.iter().zip(bc)
                    .map(|(ak, bk)| f(*ak, *bk))
                    .fold(0.0, |acc, x| acc + x)
            })
            .collect();
        partials.into_iter().fold(0.0, |acc, x| acc + x)
    }
}

/// A fixed-size pool of worker threads.
///
/// Cloning is cheap; clones share the same pool.
#[derive(Clone, Debug)]
pub struct Workers {
    pool: Arc<rayon::ThreadPool>,
}

impl Workers {
    /// Build a pool with `threads` workers.
    pub fn new(threads: usize) -> Result<Self, ConfigError> {
        if threads == 0 {
            return Err(ConfigError::Zero { what: "thread count" });
        }
        let pool
            = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|k| format!("latspace-{k}"))
            .build()?;
        log::info!("started worker pool with {threads} threads");
        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn num_threads(&self) -> usize { self.pool.current_num_threads() }

    /// Run `op` with this pool as the current pool, so that all field
    /// operations inside it execute on these workers.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_cover_exactly() {
        let p = Partition::new(10, 3);
        let r: Vec<Range<usize>> = p.ranges().collect();
        assert_eq!(r, vec![0..4, 4..8, 8..10]);
        assert_eq!(p.num_chunks(), 3);

        let p = Partition::new(2, 8);
        assert_eq!(p.chunk_len(), 1);
        assert_eq!(p.num_chunks(), 2);

        let p = Partition::new(7, 0);
        assert_eq!(p.ranges().collect::<Vec<_>>(), vec![0..7]);
    }

    #[test]
    fn map_sees_flat_indices() {
        let src: Vec<C64> = (0..11).map(|k| C64::new(k as f64, 0.0)).collect();
        let p = Partition::new(src.len(), 4);
        let out = p.map(&src, |i, z| z - C64::new(i as f64, 0.0));
        assert!(out.iter().all(|z| *z == C64::zero()));
    }

    #[test]
    fn sum_is_reproducible() {
        let src: Vec<C64>
            = (0..1000)
            .map(|k| C64::new((k as f64).sin(), (k as f64 * 0.3).cos()))
            .collect();
        let p = Partition::new(src.len(), 7);
        let first = p.sum(&src, |z| z.norm_sqr());
        let workers = Workers::new(3).unwrap();
        for _ in 0..10 {
            let again = workers.install(|| p.sum(&src, |z| z.norm_sqr()));
            assert_eq!(first.to_bits(), again.to_bits());
        }
    }

    #[test]
    fn zero_threads_rejected() {
        assert!(matches!(Workers::new(0), Err(ConfigError::Zero { .. })));
    }
}
