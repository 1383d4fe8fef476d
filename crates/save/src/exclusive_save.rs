use std::path::Path;

use bevy::prelude::*;
use simulation::SaveableRegistry;

use crate::atomic_write::atomic_write;
use crate::save_codec::compress_and_wrap;
use crate::save_error::SaveError;
use crate::save_plugin::{SaveGameEvent, SaveOutcome};
use crate::save_types::SaveData;

/// Serialize every registered resource into save-file bytes
/// (header + lz4 payload).
pub fn save_world_to_bytes(world: &World) -> Result<Vec<u8>, SaveError> {
    let registry = world
        .get_resource::<SaveableRegistry>()
        .ok_or_else(|| SaveError::MissingResource("SaveableRegistry".to_string()))?;
    let save = SaveData::new(registry.save_all(world));
    compress_and_wrap(&save.encode())
}

/// Serialize the world and write it atomically to `path`. Returns the number
/// of bytes written.
pub fn save_world_to_path(world: &World, path: &Path) -> Result<usize, SaveError> {
    let bytes = save_world_to_bytes(world)?;
    atomic_write(path, &bytes)?;
    Ok(bytes.len())
}

/// Exclusive system that handles queued `SaveGameEvent`s with full world
/// access. The last outcome is kept in `SaveOutcome`.
pub(crate) fn exclusive_save(world: &mut World) {
    let requests: Vec<SaveGameEvent> = world
        .resource_mut::<Events<SaveGameEvent>>()
        .drain()
        .collect();

    for request in requests {
        let result = save_world_to_path(world, &request.path);
        let outcome = match result {
            Ok(len) => {
                info!("Saved market to {} ({} bytes)", request.path.display(), len);
                Ok(request.path)
            }
            Err(e) => {
                error!("Save to {} failed: {e}", request.path.display());
                Err(e.to_string())
            }
        };
        if let Some(mut last) = world.get_resource_mut::<SaveOutcome>() {
            last.last = Some(outcome);
        }
    }
}
