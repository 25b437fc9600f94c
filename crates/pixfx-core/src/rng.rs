//! Seeded deterministic pseudo-random numbers.
//!
//! Every effect that looks "random" (slice shift, mosaic shift, Voronoi seed
//! placement, random block pixelation, glitch blocks, grain) draws from an
//! explicit [`Rng`] built from a seed stored in its settings. The same seed
//! always reproduces the same pattern; re-rolling means storing a new seed.
//!
//! The generator is a 32-bit xorshift:
//!
//! ```text
//! s ^= s << 13
//! s ^= s >> 17   (logical shift)
//! s ^= s << 5
//! ```
//!
//! normalized to `[0, 1)` by dividing by `2^32`.

use std::time::{SystemTime, UNIX_EPOCH};

/// Replacement for the all-zero state, which xorshift never leaves.
const ZERO_SEED_REPLACEMENT: u32 = 0x9E37_79B9;

/// Xorshift32 generator.
///
/// # Example
///
/// ```rust
/// use pixfx_core::Rng;
///
/// let mut a = Rng::new(42);
/// let mut b = Rng::new(42);
/// assert_eq!(a.next_u32(), b.next_u32());
/// let v = a.next_f32();
/// assert!((0.0..1.0).contains(&v));
/// ```
#[derive(Debug, Clone)]
pub struct Rng {
    state: u32,
}

impl Rng {
    /// Creates a generator from `seed`. A zero seed is remapped to a fixed
    /// non-zero constant.
    #[inline]
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { ZERO_SEED_REPLACEMENT } else { seed };
        Self { state }
    }

    /// Advances the state and returns it.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.state = s;
        s
    }

    /// Uniform float in `[0, 1)`.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        unit_f32(self.next_u32())
    }

    /// Uniform float in `[min, max)`.
    #[inline]
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Uniform float in `[-magnitude, magnitude)`.
    #[inline]
    pub fn signed(&mut self, magnitude: f32) -> f32 {
        (self.next_f32() * 2.0 - 1.0) * magnitude
    }

    /// Uniform integer in `[0, bound)`. Returns 0 when `bound` is 0.
    #[inline]
    pub fn below(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        ((self.next_f32() as f64 * bound as f64) as usize).min(bound - 1)
    }

    /// Uniform integer in `[min, max]` (inclusive).
    #[inline]
    pub fn range_inclusive(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        min + self.below(max - min + 1)
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}

/// Top 24 bits as a float in `[0, 1)`; every value is exact in `f32`.
#[inline]
fn unit_f32(bits: u32) -> f32 {
    (bits >> 8) as f32 / 16_777_216.0
}

/// Derives a seed from the wall clock.
///
/// Only the outermost boundary (CLI, session re-roll) should call this;
/// effects themselves always take explicit seeds.
pub fn time_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let folded = (nanos as u64) ^ ((nanos >> 64) as u64);
    let seed = (folded as u32) ^ ((folded >> 32) as u32);
    if seed == 0 { ZERO_SEED_REPLACEMENT } else { seed }
}
