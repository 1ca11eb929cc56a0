//! Generator capability threaded through the creature pipeline
//!
//! Every stage that needs randomness takes `&mut dyn ArtRng`. The trait is
//! implemented for:
//! - [`CreatureRng`], the seeded generator owned by one render call
//! - any `rand::Rng` (handy for ad-hoc tests with a raw xoshiro)
//! - [`ScriptedRng`] / [`CountingRng`], used to pin down draw-order contracts

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use sha2::{Digest, Sha256};

/// Source of uniform floats in `[0.0, 1.0)`; every call advances the state.
pub trait ArtRng {
    /// Draw the next float in `[0.0, 1.0)`
    fn next_f64(&mut self) -> f64;

    /// One draw, true when it lands below `probability`
    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// One draw, true when it lands above one half
    fn coin(&mut self) -> bool {
        self.next_f64() > 0.5
    }

    /// One draw mapped onto `0..len`. Returns 0 for an empty range.
    fn pick_index(&mut self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64).floor() as usize;
        idx.min(len.saturating_sub(1))
    }
}

impl<T: ?Sized + rand::Rng> ArtRng for T {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Seeded generator for one creature identity
///
/// The seed string is hashed with SHA-256 and the digest becomes the
/// xoshiro256** state, so any string (hex hash or not) is a valid seed.
#[derive(Debug, Clone)]
pub struct CreatureRng {
    inner: Xoshiro256StarStar,
}

impl CreatureRng {
    pub fn from_seed(seed: &str) -> Self {
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&Sha256::digest(seed.as_bytes()));
        Self {
            inner: Xoshiro256StarStar::from_seed(digest),
        }
    }
}

impl ArtRng for CreatureRng {
    fn next_f64(&mut self) -> f64 {
        rand::Rng::gen::<f64>(&mut self.inner)
    }
}

/// Replays a fixed list of values, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let mut values = values.into();
        if values.is_empty() {
            values.push(0.0);
        }
        Self { values, cursor: 0 }
    }

    /// Generator that returns `value` forever
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl ArtRng for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Wraps another generator and counts how many draws went through it
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    inner: R,
    draws: usize,
}

impl<R: ArtRng> CountingRng<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, draws: 0 }
    }

    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: ArtRng> ArtRng for CountingRng<R> {
    fn next_f64(&mut self) -> f64 {
        self.draws += 1;
        self.inner.next_f64()
    }
}
