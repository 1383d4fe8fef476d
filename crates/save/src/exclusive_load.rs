use std::path::Path;

use bevy::prelude::*;
use simulation::engine::HousingMarket;
use simulation::runner::{LastYearReport, MarketCommands, YearRunner};
use simulation::state_hash::{compute_state_hash, StateHash};
use simulation::stats::MarketStats;
use simulation::SaveableRegistry;

use crate::file_header::unwrap_header;
use crate::save_codec::decompress_payload;
use crate::save_error::SaveError;
use crate::save_plugin::{LoadGameEvent, SaveOutcome};
use crate::save_types::SaveData;

/// Validate and decode save-file bytes, then replace every registered
/// resource. Resources absent from the file come back at their defaults.
///
/// Nothing in the world is touched unless the whole file decodes.
pub fn load_world_from_bytes(world: &mut World, bytes: &[u8]) -> Result<(), SaveError> {
    // -- Stage 0: Validate header, decompress, decode --
    let (header, stored) = unwrap_header(bytes)?;
    debug!(
        "Save header: format v{}, flags {:#X}, data size {}, checksum {:#010X}",
        header.format_version, header.flags, header.uncompressed_size, header.checksum,
    );
    let encoded = decompress_payload(&header, stored)?;
    let save = SaveData::decode(&encoded)?;

    // -- Stage 1: Restore resources via SaveableRegistry --
    let registry = world
        .remove_resource::<SaveableRegistry>()
        .ok_or_else(|| SaveError::MissingResource("SaveableRegistry".to_string()))?;
    registry.reset_all(world);
    registry.load_all(world, &save.extensions);
    world.insert_resource(registry);

    // -- Stage 2: Drop in-flight work and refresh derived state --
    if let Some(mut runner) = world.get_resource_mut::<YearRunner>() {
        runner.stop();
    }
    if let Some(mut queue) = world.get_resource_mut::<MarketCommands>() {
        queue.drain();
    }
    world.insert_resource(LastYearReport::default());

    let derived = world.get_resource::<HousingMarket>().map(|market| {
        let hash = StateHash {
            year: market.year(),
            hash: compute_state_hash(market),
        };
        (MarketStats::from_market(market), hash)
    });
    if let Some((stats, hash)) = derived {
        world.insert_resource(stats);
        world.insert_resource(hash);
    }

    Ok(())
}

/// Read `path` and load it into the world.
pub fn load_world_from_path(world: &mut World, path: &Path) -> Result<(), SaveError> {
    let bytes = std::fs::read(path)?;
    load_world_from_bytes(world, &bytes)
}

/// Exclusive system that handles queued `LoadGameEvent`s. Only the most
/// recent request is honored.
pub(crate) fn exclusive_load(world: &mut World) {
    let request = world
        .resource_mut::<Events<LoadGameEvent>>()
        .drain()
        .last();
    let Some(request) = request else {
        return;
    };

    let outcome = match load_world_from_path(world, &request.path) {
        Ok(()) => {
            let year = world.get_resource::<HousingMarket>().map_or(0, |m| m.year());
            info!("Loaded market at year {} from {}", year, request.path.display());
            Ok(request.path)
        }
        Err(e) => {
            error!("Load from {} failed: {e}", request.path.display());
            Err(e.to_string())
        }
    };
    if let Some(mut last) = world.get_resource_mut::<SaveOutcome>() {
        last.last = Some(outcome);
    }
}
