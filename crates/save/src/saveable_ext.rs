// ---------------------------------------------------------------------------
// App extension for registering Saveable resources
// ---------------------------------------------------------------------------

use bevy::prelude::*;
use simulation::{Saveable, SaveableRegistry};

/// Extension trait on `App` for one-line saveable registration.
///
/// ```ignore
/// app.init_resource::<HousingMarket>()
///     .register_saveable::<HousingMarket>();
/// ```
pub trait SaveableAppExt {
    fn register_saveable<T: Saveable>(&mut self) -> &mut Self;
}

impl SaveableAppExt for App {
    fn register_saveable<T: Saveable>(&mut self) -> &mut Self {
        self.init_resource::<T>();
        self.init_resource::<SaveableRegistry>();
        self.world_mut()
            .resource_mut::<SaveableRegistry>()
            .register::<T>();
        debug!("Registered saveable '{}'", T::SAVE_KEY);
        self
    }
}
