//! Query and simulation-tick methods for `TestMarket`.

use bevy::prelude::*;

use crate::config::FIXED_TIMESTEP;
use crate::engine::HousingMarket;
use crate::market_config::MarketConfig;
use crate::runner::{CommandLog, LastYearReport, MarketCommand, MarketCommands, YearRunner};
use crate::state_hash::StateHash;
use crate::stats::MarketStats;

use super::TestMarket;

/// Upper bound on ticks spent waiting for a run to finish.
const MAX_RUN_TICKS: u32 = 100_000;

impl TestMarket {
    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Run N fixed-update ticks by directly executing the `FixedUpdate`
    /// schedule. The fixed clock is advanced by one timestep before each
    /// tick so systems reading `Res<Time>` see a 100 ms delta.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            let world = self.app.world_mut();
            world
                .resource_mut::<Time<Fixed>>()
                .advance_by(FIXED_TIMESTEP);
            let fixed = world.resource::<Time<Fixed>>().as_generic();
            *world.resource_mut::<Time>() = fixed;
            world.run_schedule(FixedUpdate);
        }
    }

    /// Queue a command for the next tick.
    pub fn send(&mut self, command: MarketCommand) -> &mut Self {
        self.app
            .world_mut()
            .resource_mut::<MarketCommands>()
            .push(command);
        self
    }

    /// Queue `NextYear` and run the tick that applies it.
    pub fn next_year(&mut self) {
        self.send(MarketCommand::NextYear);
        self.tick(1);
    }

    /// Advance `n` years one `NextYear` at a time.
    pub fn next_years(&mut self, n: u32) {
        for _ in 0..n {
            self.next_year();
        }
    }

    /// Start a run of `years` and tick until it finishes. Returns the number
    /// of ticks spent.
    pub fn run_years(&mut self, years: u32) -> u32 {
        self.send(MarketCommand::RunYears { years });
        self.tick_until_idle()
    }

    /// Tick until no run is in progress.
    pub fn tick_until_idle(&mut self) -> u32 {
        let mut ticks = 0;
        loop {
            self.tick(1);
            ticks += 1;
            if !self.runner().is_running() {
                return ticks;
            }
            assert!(ticks < MAX_RUN_TICKS, "run did not finish in {ticks} ticks");
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn market(&self) -> &HousingMarket {
        self.app.world().resource::<HousingMarket>()
    }

    pub fn config(&self) -> &MarketConfig {
        self.app.world().resource::<MarketConfig>()
    }

    /// Stats as of the last tick that changed the market.
    pub fn stats(&self) -> &MarketStats {
        self.app.world().resource::<MarketStats>()
    }

    pub fn runner(&self) -> &YearRunner {
        self.app.world().resource::<YearRunner>()
    }

    pub fn last_report(&self) -> &LastYearReport {
        self.app.world().resource::<LastYearReport>()
    }

    pub fn command_log(&self) -> &CommandLog {
        self.app.world().resource::<CommandLog>()
    }

    pub fn state_hash(&self) -> &StateHash {
        self.app.world().resource::<StateHash>()
    }

    pub fn year(&self) -> u32 {
        self.market().year()
    }
}
