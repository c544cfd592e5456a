//! # Simulation RNG
//!
//! One explicit, seedable random source per simulation instead of a global
//! engine. Parallel jobs get their own stream via [`SimRng::fork`], drawn
//! on the main thread before dispatch, so a seeded run with a fixed worker
//! count replays exactly.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic random source (ChaCha8).
#[derive(Clone, Debug)]
pub struct SimRng {
    inner: ChaCha8Rng,
}

impl SimRng {
    /// Creates a stream from a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a stream seeded from the wall clock.
    #[must_use]
    pub fn from_clock() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        Self::seeded(nanos as u64)
    }

    /// Splits off an independent stream for a worker job.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        Self::seeded(self.inner.next_u64())
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// Uniform draw in `[-1, 1]`.
    #[inline]
    pub fn signed_unit(&mut self) -> f32 {
        self.inner.gen_range(-1.0..=1.0)
    }

    /// Uniform percentage roll in `[0, 100)`.
    #[inline]
    pub fn percent(&mut self) -> f32 {
        self.unit() * 100.0
    }

    /// Uniform draw in `[min, max]`. Returns `min` for an empty range.
    #[inline]
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.inner.gen_range(min..=max)
        } else {
            min
        }
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    #[inline]
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_streams_replay() {
        let mut a = SimRng::seeded(42);
        let mut b = SimRng::seeded(42);
        for _ in 0..100 {
            assert_eq!(a.unit().to_bits(), b.unit().to_bits());
        }
    }

    #[test]
    fn test_forks_are_deterministic_and_distinct() {
        let mut a = SimRng::seeded(1);
        let mut b = SimRng::seeded(1);
        let mut fa = a.fork();
        let mut fb = b.fork();
        assert_eq!(fa.unit().to_bits(), fb.unit().to_bits());

        let mut parent = SimRng::seeded(1);
        let mut first = parent.fork();
        let mut second = parent.fork();
        assert_ne!(first.unit().to_bits(), second.unit().to_bits());
    }

    #[test]
    fn test_draw_ranges() {
        let mut rng = SimRng::seeded(9);
        for _ in 0..1000 {
            let u = rng.unit();
            assert!((0.0..1.0).contains(&u));
            let s = rng.signed_unit();
            assert!((-1.0..=1.0).contains(&s));
            let p = rng.percent();
            assert!((0.0..100.0).contains(&p));
            let r = rng.range(0.5, 2.5);
            assert!((0.5..=2.5).contains(&r));
            assert!(rng.index(3) < 3);
        }
        assert_eq!(rng.range(1.0, 1.0), 1.0);
    }
}
