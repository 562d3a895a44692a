//! Seeded sampling streams.
//!
//! Independent draws (for example TRUE and FALSE trajectories of one request)
//! use separate substreams. A substream seed is SipHash-1-3 with zero keys over
//! `(seed, substream)`, which is stable across platforms.

use std::hash::Hasher;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use siphasher::sip::SipHasher13;

/// Derives the seed of a numbered substream.
pub fn derive_substream_seed(seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(seed);
    hasher.write_u64(substream);
    hasher.finish()
}

/// Reproducible sampler over slices.
#[derive(Debug, Clone)]
pub struct SampleStream {
    rng: StdRng,
}

impl SampleStream {
    /// Stream seeded directly.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Stream for one substream of `seed`.
    pub fn for_substream(seed: u64, substream: u64) -> Self {
        Self::from_seed(derive_substream_seed(seed, substream))
    }

    /// Picks up to `count` distinct items, preserving their original order.
    pub fn sample<T: Clone>(&mut self, items: &[T], count: usize) -> Vec<T> {
        let count = count.min(items.len());
        let indices: Vec<usize> = (0..items.len()).collect();
        let mut picked: Vec<usize> = indices
            .choose_multiple(&mut self.rng, count)
            .copied()
            .collect();
        picked.sort_unstable();
        picked.into_iter().map(|idx| items[idx].clone()).collect()
    }
}
