//! Deterministic simulation RNG.
//!
//! A 32-bit linear congruential generator
//! (`state = state * 1664525 + 1013904223 mod 2^32`). Every stochastic
//! decision in the housing engine draws from one `SimRng`, so a fixed seed
//! replays the exact same market history. The generator is owned by
//! [`HousingMarket`](crate::engine::HousingMarket) and is never shared.

use bitcode::{Decode, Encode};
use rand::{RngCore, SeedableRng};

use crate::config::CANONICAL_SEED;

const MULTIPLIER: u32 = 1_664_525;
const INCREMENT: u32 = 1_013_904_223;
/// 2^32, the modulus of the recurrence.
const MODULUS: f64 = 4_294_967_296.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct SimRng {
    state: u32,
}

impl Default for SimRng {
    fn default() -> Self {
        Self::new(CANONICAL_SEED)
    }
}

impl SimRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current internal state (the last value produced, or the seed).
    pub fn state(&self) -> u32 {
        self.state
    }

    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.state
    }

    /// Next uniform value in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        f64::from(self.step()) / MODULUS
    }

    /// `floor(next_unit() * len)`: one draw, uniform over `0..len`.
    ///
    /// `len` must be non-zero.
    pub fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "pick_index on an empty range");
        let idx = (self.next_unit() * len as f64).floor() as usize;
        idx.min(len.saturating_sub(1))
    }

    /// One draw compared against `probability`.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_unit() < probability
    }
}

impl RngCore for SimRng {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.step());
        let lo = u64::from(self.step());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SimRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }

    /// Keeps the low 32 bits, which is what the recurrence would reduce the
    /// seed to after its first step anyway.
    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as u32)
    }
}
