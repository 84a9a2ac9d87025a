// src/rng.rs
//! Random Number Generation for Monte Carlo Simulations
//!
//! # Design
//!
//! Every simulation receives an explicit [`RandomSource`]. There is no
//! process-wide generator and nothing here mutates global state.
//!
//! A source resolves to a single base seed. Path `i` of a simulation then owns
//! its own `StdRng` seeded from a splitmix64 mix of `(base_seed, i)`, so:
//! 1. **Reproducibility**: the same seed reproduces the entire draw sequence
//! 2. **Parallel safety**: paths never share a stream, whatever the thread count
//! 3. **Common random numbers**: two scenarios built from the same seed see
//!    identical normal draws on every path and every step
//! 4. **Independent seeds**: adjacent base seeds do not share shifted streams

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

/// Where a simulation gets its randomness from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RandomSource {
    /// Deterministic: the same seed reproduces the same paths bit for bit.
    Seeded(u64),
    /// A fresh base seed is drawn from the thread-local entropy source per call.
    Entropy,
}

impl RandomSource {
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => RandomSource::Seeded(s),
            None => RandomSource::Entropy,
        }
    }

    /// Resolve to a concrete base seed.
    pub fn base_seed(self) -> u64 {
        match self {
            RandomSource::Seeded(seed) => seed,
            RandomSource::Entropy => rand::thread_rng().gen(),
        }
    }

    pub fn factory(self) -> RngFactory {
        RngFactory::new(self.base_seed())
    }
}

/// RNG factory for reproducible parallel simulations
#[derive(Debug, Clone, Copy)]
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Create the stream owned by a single path
    pub fn create_std_rng(&self, path_id: u64) -> StdRng {
        StdRng::seed_from_u64(path_seed(self.base_seed, path_id))
    }

    /// One stream per path, in path order
    pub fn path_streams(&self, paths: usize) -> Vec<StdRng> {
        (0..paths as u64).map(|i| self.create_std_rng(i)).collect()
    }
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Seed of path `path_id`; the base is mixed before the path index is folded in.
#[inline]
fn path_seed(base_seed: u64, path_id: u64) -> u64 {
    splitmix64(splitmix64(base_seed) ^ path_id)
}

pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_streams_reproducible() {
        let factory = RandomSource::Seeded(42).factory();

        let mut rng1 = factory.create_std_rng(0);
        let mut rng2 = RandomSource::Seeded(42).factory().create_std_rng(0);

        for _ in 0..100 {
            assert_eq!(get_normal_draw(&mut rng1), get_normal_draw(&mut rng2));
        }
    }

    #[test]
    fn test_streams_differ_between_paths() {
        let factory = RngFactory::new(42);

        let mut rng1 = factory.create_std_rng(0);
        let mut rng2 = factory.create_std_rng(1);

        let vals1: Vec<u64> = (0..10).map(|_| rng1.gen()).collect();
        let vals2: Vec<u64> = (0..10).map(|_| rng2.gen()).collect();

        assert_ne!(vals1, vals2);
    }

    #[test]
    fn test_adjacent_seeds_do_not_shift_streams() {
        let a = RngFactory::new(42);
        let b = RngFactory::new(43);

        for i in 0..100 {
            assert_ne!(path_seed(42, i + 1), path_seed(43, i));
            let x: u64 = a.create_std_rng(i + 1).gen();
            let y: u64 = b.create_std_rng(i).gen();
            assert_ne!(x, y);
        }
    }

    #[test]
    fn test_from_seed() {
        assert_eq!(RandomSource::from_seed(Some(7)), RandomSource::Seeded(7));
        assert_eq!(RandomSource::from_seed(None), RandomSource::Entropy);
        assert_eq!(RandomSource::Seeded(7).base_seed(), 7);
    }

    #[test]
    fn test_normal_distribution() {
        let mut rng = RngFactory::new(42).create_std_rng(0);

        let samples: Vec<f64> = (0..10000).map(|_| get_normal_draw(&mut rng)).collect();

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let variance =
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;

        assert!(mean.abs() < 0.05, "Mean should be close to 0, got {}", mean);
        assert!(
            (variance - 1.0).abs() < 0.05,
            "Variance should be close to 1, got {}",
            variance
        );
    }
}
