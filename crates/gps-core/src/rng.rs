//! Explicit, injectable random source.
//!
//! # Determinism strategy
//!
//! Only [`SeededRng::from_entropy`] touches the thread RNG, once, to pick a
//! seed.  Every curve draw and every offline-duration draw goes through a
//! `SeededRng` owned by the device or navigator that needs it.  Streams are derived from a run seed by:
//!
//!   seed = global_seed XOR (stream * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive stream numbers uniformly across the seed space.
//!
//! # Serialization
//!
//! The whole stream position is one `u64`.  Every draw seeds a `SmallRng`
//! from the current position, takes its value(s), and moves the position to
//! the next word that generator would have produced.  Serializing the seed
//! and the position therefore restores the stream exactly: a restored device
//! draws the same curves and offline durations as the one it was taken from.

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// A deterministic random stream that remembers the seed it was built from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRng {
    seed:     u64,
    position: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self { seed, position: seed }
    }

    /// Seed from operating-system entropy; for callers that did not pick a seed.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed deterministically from a run seed and a stream number.
    pub fn for_stream(global_seed: u64, stream: u64) -> Self {
        Self::new(global_seed ^ stream.wrapping_mul(MIXING_CONSTANT))
    }

    /// Derive a child RNG with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SeededRng {
        let child_seed: u64 = self.random::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SeededRng::new(child_seed)
    }

    /// The seed this stream started from.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current stream position; equal positions draw equal values.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    fn draw<T>(&mut self, f: impl FnOnce(&mut SmallRng) -> T) -> T {
        let mut rng = SmallRng::seed_from_u64(self.position);
        let value = f(&mut rng);
        self.position = rng.next_u64();
        value
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.draw(|rng| rng.r#gen())
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.draw(|rng| rng.gen_range(range))
    }
}
