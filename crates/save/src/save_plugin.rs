use std::path::PathBuf;

use bevy::prelude::*;
use simulation::engine::HousingMarket;
use simulation::market_config::MarketConfig;
use simulation::SaveableRegistry;

use crate::saveable_ext::SaveableAppExt;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Request a save of all registered resources to `path`.
#[derive(Event, Debug, Clone)]
pub struct SaveGameEvent {
    pub path: PathBuf,
}

/// Request a load from `path`, replacing all registered resources.
#[derive(Event, Debug, Clone)]
pub struct LoadGameEvent {
    pub path: PathBuf,
}

/// Result of the most recent event-driven save or load: the path on
/// success, the error message otherwise.
#[derive(Resource, Debug, Default)]
pub struct SaveOutcome {
    pub last: Option<Result<PathBuf, String>>,
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SaveGameEvent>()
            .add_event::<LoadGameEvent>()
            .init_resource::<SaveableRegistry>()
            .init_resource::<SaveOutcome>();

        app.register_saveable::<HousingMarket>()
            .register_saveable::<MarketConfig>();

        // Exclusive systems: each drains its events and does all work with
        // full world access. Saves run before loads within a frame.
        app.add_systems(
            Update,
            (
                crate::exclusive_save::exclusive_save,
                crate::exclusive_load::exclusive_load,
            )
                .chain(),
        );
    }
}
