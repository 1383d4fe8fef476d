//! # TestMarket: headless integration test harness for the housing market
//!
//! Provides a fluent builder that wraps `bevy::app::App` + `SimulationPlugin`
//! for driving the market through its command queue without a window.

mod assertions;
mod queries;
mod setup;

use bevy::app::App;
use bevy::prelude::*;

use crate::config::CANONICAL_SEED;
use crate::engine::HousingMarket;
use crate::SimulationPlugin;

/// A headless Bevy App wrapping `SimulationPlugin` for integration testing.
///
/// Use builder methods to configure the market, queue commands with `send()`,
/// then call `tick()` to advance fixed updates and query the resulting state.
pub struct TestMarket {
    app: App,
}

impl TestMarket {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a market on the canonical seed with the default configuration.
    pub fn new() -> Self {
        Self::with_seed(CANONICAL_SEED)
    }

    /// Create a market initialized from `seed`.
    pub fn with_seed(seed: u32) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SimulationPlugin);
        app.insert_resource(HousingMarket::initialize(seed));

        // Run one update so Startup systems execute. No fixed tick fires
        // because the first frame has no elapsed time.
        app.update();

        Self { app }
    }

    /// Direct access to the underlying app.
    pub fn app(&mut self) -> &mut App {
        &mut self.app
    }
}

impl Default for TestMarket {
    fn default() -> Self {
        Self::new()
    }
}
