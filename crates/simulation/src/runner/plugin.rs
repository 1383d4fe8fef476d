//! Plugin that wires up the market: state, configuration, command queue,
//! year runner and stats.

use bevy::prelude::*;

use super::commands::{CommandLog, MarketCommands};
use super::systems::{
    advance_market_year, apply_market_commands, drive_year_runner, LastYearReport,
};
use super::year_runner::YearRunner;
use crate::engine::HousingMarket;
use crate::market_config::MarketConfig;
use crate::stats::{update_market_stats, MarketStats};
use crate::SimulationSet;

pub struct HousingMarketPlugin;

impl Plugin for HousingMarketPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HousingMarket>()
            .init_resource::<MarketConfig>()
            .init_resource::<MarketStats>()
            .init_resource::<MarketCommands>()
            .init_resource::<CommandLog>()
            .init_resource::<YearRunner>()
            .init_resource::<LastYearReport>();

        app.add_systems(
            FixedUpdate,
            (apply_market_commands, drive_year_runner)
                .chain()
                .in_set(SimulationSet::PreSim),
        )
        .add_systems(
            FixedUpdate,
            advance_market_year.in_set(SimulationSet::Simulation),
        )
        .add_systems(
            FixedUpdate,
            update_market_stats.in_set(SimulationSet::PostSim),
        );
    }
}
