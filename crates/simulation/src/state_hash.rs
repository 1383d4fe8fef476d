//! Fingerprint of the market, used to check that two runs stayed in lockstep.
//!
//! Recomputed in `PostSim` every tick. Fields are fed in this order:
//!
//! 1. Year
//! 2. Demand factor (f64 → bits)
//! 3. Random stream state
//! 4. Cumulative results
//! 5. Every unit in id order (id, owner, usage, price bits, rent bits)
//!
//! Floats are hashed by bit pattern.

use std::hash::{Hash, Hasher};

use bevy::prelude::*;

use crate::engine::HousingMarket;
use crate::SimulationSet;

/// Latest market fingerprint.
#[derive(Resource, Default, Clone, Debug)]
pub struct StateHash {
    /// The market year at which this hash was computed.
    pub year: u32,
    /// FNV-1a over the fields listed in the module docs.
    pub hash: u64,
}

// ---------------------------------------------------------------------------
// FNV-1a hasher (deterministic, no random seed)
// ---------------------------------------------------------------------------

/// FNV-1a. `DefaultHasher` is randomly keyed per process, so it cannot be
/// compared across runs.
struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x00000100000001B3;

    fn new() -> Self {
        Self {
            state: Self::FNV_OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= byte as u64;
            self.state = self.state.wrapping_mul(Self::FNV_PRIME);
        }
    }
}

/// Compute a deterministic hash of the market.
///
/// Callable from tests or replay checks without the ECS system having run.
pub fn compute_state_hash(market: &HousingMarket) -> u64 {
    let mut hasher = Fnv1aHasher::new();

    market.year().hash(&mut hasher);
    market.demand_factor().to_bits().hash(&mut hasher);
    market.rng_state().hash(&mut hasher);

    let results = market.results();
    results.purchases_by_homeowner.hash(&mut hasher);
    results.purchases_by_corporate.hash(&mut hasher);
    results.purchases_by_individual.hash(&mut hasher);
    results.converted_to_short_term.hash(&mut hasher);

    for unit in market.stock().iter() {
        unit.id.hash(&mut hasher);
        (unit.owner as u8).hash(&mut hasher);
        (unit.usage as u8).hash(&mut hasher);
        unit.price.to_bits().hash(&mut hasher);
        unit.rent.to_bits().hash(&mut hasher);
    }

    hasher.finish()
}

// ---------------------------------------------------------------------------
// ECS system
// ---------------------------------------------------------------------------

fn update_state_hash(market: Res<HousingMarket>, mut state_hash: ResMut<StateHash>) {
    if !market.is_changed() {
        return;
    }
    state_hash.year = market.year();
    state_hash.hash = compute_state_hash(&market);
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct StateHashPlugin;

impl Plugin for StateHashPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StateHash>().add_systems(
            FixedUpdate,
            update_state_hash.in_set(SimulationSet::PostSim),
        );
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_config::PolicyConfig;

    #[test]
    fn test_fnv1a_deterministic() {
        let mut h1 = Fnv1aHasher::new();
        let mut h2 = Fnv1aHasher::new();
        42u64.hash(&mut h1);
        42u64.hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn test_fnv1a_different_inputs_differ() {
        let mut h1 = Fnv1aHasher::new();
        let mut h2 = Fnv1aHasher::new();
        1u64.hash(&mut h1);
        2u64.hash(&mut h2);
        assert_ne!(h1.finish(), h2.finish());
    }

    #[test]
    fn test_compute_state_hash_deterministic() {
        let a = HousingMarket::initialize(12345);
        let b = HousingMarket::initialize(12345);
        assert_eq!(compute_state_hash(&a), compute_state_hash(&b));
    }

    #[test]
    fn test_compute_state_hash_differs_on_seed() {
        let a = HousingMarket::initialize(12345);
        let b = HousingMarket::initialize(12346);
        assert_ne!(compute_state_hash(&a), compute_state_hash(&b));
    }

    #[test]
    fn test_compute_state_hash_differs_after_year() {
        let mut market = HousingMarket::initialize(12345);
        let before = compute_state_hash(&market);
        market.advance_year(&PolicyConfig::default()).unwrap();
        assert_ne!(before, compute_state_hash(&market));
    }
}
