//! Randomness used by the composer and the option shuffler.
//!
//! Both take a `RandomSource` explicitly, so production code can draw from
//! entropy while tests use a fixed seed or a scripted sequence.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub trait RandomSource {
    /// A uniformly random permutation of `0..len`.
    fn permutation(&mut self, len: usize) -> Vec<usize>;
}

/// `StdRng`-backed source, seeded from entropy or from a fixed seed.
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandom {
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..len).collect();
        indices.shuffle(&mut self.rng);
        indices
    }
}

/// Checks that `indices` holds every value of `0..len` exactly once.
pub(crate) fn is_permutation(indices: &[usize], len: usize) -> bool {
    if indices.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &i in indices {
        match seen.get_mut(i) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}
