//! Housing market policy simulation.
//!
//! A stock of housing units changes hands year by year under corporate
//! ownership and short-term rental policies. [`engine::HousingMarket`] holds
//! the deterministic state machine; [`SimulationPlugin`] runs it inside a
//! Bevy `FixedUpdate` schedule behind a command queue and a paced year runner.

use bevy::prelude::*;
use std::collections::BTreeMap;

pub mod agent_protocol;
pub mod config;
pub mod engine;
pub mod housing;
pub mod market_config;
pub mod policies;
pub mod runner;
pub mod sim_rng;
pub mod simulation_sets;
pub mod state_hash;
pub mod stats;

#[cfg(test)]
mod integration_tests;
#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use simulation_sets::SimulationSet;

// ---------------------------------------------------------------------------
// Saveable trait + registry for the extension map save pattern
// ---------------------------------------------------------------------------

/// Trait for resources that can be saved/loaded via the extension map.
///
/// The save crate only sees keys and byte blobs. A resource becomes part of the
/// save file once it is registered with `app.register_saveable::<T>()`.
pub trait Saveable: Resource + Default + Send + Sync + 'static {
    /// Unique key for this resource in the save file's extension map.
    /// Must be stable across versions (used for deserialization lookup).
    const SAVE_KEY: &'static str;

    /// Serialize this resource to bytes.
    /// Return `None` to skip saving (e.g. when the resource is at its default state).
    fn save_to_bytes(&self) -> Option<Vec<u8>>;

    /// Deserialize from bytes, returning the restored resource.
    fn load_from_bytes(bytes: &[u8]) -> Self;
}

/// Decode bytes via `bitcode::decode`, logging a warning and returning `Default` on failure.
/// Use this in `Saveable::load_from_bytes` implementations to surface decode errors.
pub fn decode_or_warn<T: bitcode::DecodeOwned + Default>(key: &str, bytes: &[u8]) -> T {
    match bitcode::decode(bytes) {
        Ok(v) => v,
        Err(e) => {
            warn!(
                "Saveable {}: failed to decode {} bytes, falling back to default: {}",
                key,
                bytes.len(),
                e
            );
            T::default()
        }
    }
}

/// Type alias for the save function stored in a `SaveableEntry`.
pub type SaveFn = Box<dyn Fn(&World) -> Option<Vec<u8>> + Send + Sync>;
/// Type alias for the load function stored in a `SaveableEntry`.
pub type LoadFn = Box<dyn Fn(&mut World, &[u8]) + Send + Sync>;
/// Type alias for the reset function stored in a `SaveableEntry`.
pub type ResetFn = Box<dyn Fn(&mut World) + Send + Sync>;

/// Type-erased save/load/reset operations for a single registered resource.
pub struct SaveableEntry {
    pub key: String,
    pub save_fn: SaveFn,
    pub load_fn: LoadFn,
    pub reset_fn: ResetFn,
}

/// Saveable resources by key, filled in while plugins build.
#[derive(Resource, Default)]
pub struct SaveableRegistry {
    pub entries: Vec<SaveableEntry>,
}

impl SaveableRegistry {
    /// Adds `T` under its `SAVE_KEY`. A second registration of the same key is
    /// ignored in release builds and panics in debug builds.
    pub fn register<T: Saveable>(&mut self) {
        let key = T::SAVE_KEY.to_string();
        if self.entries.iter().any(|e| e.key == key) {
            warn!(
                "SaveableRegistry: duplicate key '{}' - ignoring second registration",
                key
            );
            debug_assert!(false, "SaveableRegistry: duplicate key '{}'", key);
            return;
        }
        self.entries.push(SaveableEntry {
            key,
            save_fn: Box::new(|world: &World| {
                world.get_resource::<T>().and_then(|r| r.save_to_bytes())
            }),
            load_fn: Box::new(|world: &mut World, bytes: &[u8]| {
                let value = T::load_from_bytes(bytes);
                world.insert_resource(value);
            }),
            reset_fn: Box::new(|world: &mut World| {
                world.insert_resource(T::default());
            }),
        });
    }

    /// Encodes every registered resource that has something to save.
    pub fn save_all(&self, world: &World) -> BTreeMap<String, Vec<u8>> {
        let mut extensions = BTreeMap::new();
        for entry in &self.entries {
            if let Some(bytes) = (entry.save_fn)(world) {
                extensions.insert(entry.key.clone(), bytes);
            }
        }
        extensions
    }

    /// Restores every registered resource present in `extensions`. Absent keys
    /// leave the resource as it is.
    pub fn load_all(&self, world: &mut World, extensions: &BTreeMap<String, Vec<u8>>) {
        for entry in &self.entries {
            if let Some(bytes) = extensions.get(&entry.key) {
                (entry.load_fn)(world, bytes);
            }
        }
    }

    /// Puts every registered resource back to its `Default`.
    pub fn reset_all(&self, world: &mut World) {
        for entry in &self.entries {
            (entry.reset_fn)(world);
        }
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::PreSim,
                SimulationSet::Simulation,
                SimulationSet::PostSim,
            )
                .chain(),
        )
        .insert_resource(Time::<Fixed>::from_duration(config::FIXED_TIMESTEP))
        .init_resource::<SaveableRegistry>();

        app.add_plugins((
            runner::HousingMarketPlugin,
            state_hash::StateHashPlugin,
        ));
    }
}

#[cfg(test)]
mod saveable_tests {
    use super::*;
    use crate::engine::HousingMarket;
    use crate::market_config::MarketConfig;
    use crate::policies::StrPolicy;

    fn registry() -> SaveableRegistry {
        let mut registry = SaveableRegistry::default();
        registry.register::<HousingMarket>();
        registry.register::<MarketConfig>();
        registry
    }

    fn banned_config() -> MarketConfig {
        MarketConfig {
            str_policy: StrPolicy::Ban,
            ..MarketConfig::default()
        }
    }

    #[test]
    fn test_defaults_are_not_written() {
        let mut world = World::new();
        world.init_resource::<HousingMarket>();
        world.init_resource::<MarketConfig>();

        assert!(registry().save_all(&world).is_empty());
    }

    #[test]
    fn test_changed_resources_are_written_by_key() {
        let mut world = World::new();
        world.insert_resource(HousingMarket::initialize(42));
        world.insert_resource(banned_config());

        let extensions = registry().save_all(&world);
        let keys: Vec<&str> = extensions.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["housing_market", "market_config"]);
    }

    #[test]
    fn test_load_restores_and_reset_clears() {
        let registry = registry();
        let mut source = World::new();
        source.insert_resource(HousingMarket::initialize(42));
        source.insert_resource(banned_config());
        let extensions = registry.save_all(&source);

        let mut world = World::new();
        world.init_resource::<HousingMarket>();
        world.init_resource::<MarketConfig>();
        registry.load_all(&mut world, &extensions);
        assert_eq!(*world.resource::<MarketConfig>(), banned_config());
        assert_eq!(
            *world.resource::<HousingMarket>(),
            HousingMarket::initialize(42)
        );

        registry.reset_all(&mut world);
        assert_eq!(*world.resource::<MarketConfig>(), MarketConfig::default());
        assert_eq!(*world.resource::<HousingMarket>(), HousingMarket::default());
    }

    #[test]
    fn test_unknown_and_corrupt_entries() {
        let mut world = World::new();
        world.insert_resource(banned_config());

        let mut extensions = BTreeMap::new();
        extensions.insert("rent_control".to_string(), vec![0xFF, 0xFF]);
        registry().load_all(&mut world, &extensions);
        assert_eq!(*world.resource::<MarketConfig>(), banned_config());

        extensions.insert("market_config".to_string(), vec![0xFF]);
        registry().load_all(&mut world, &extensions);
        assert_eq!(*world.resource::<MarketConfig>(), MarketConfig::default());
    }

    #[test]
    #[should_panic(expected = "duplicate key")]
    fn test_duplicate_registration_panics_in_debug() {
        let mut registry = registry();
        registry.register::<MarketConfig>();
    }
}
