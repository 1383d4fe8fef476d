pub mod commands;
pub mod plugin;
pub mod systems;
pub mod year_runner;

pub use commands::{CommandLog, CommandOutcome, MarketCommand, MarketCommands};
pub use plugin::HousingMarketPlugin;
pub use systems::{advance_market_year, apply_market_commands, drive_year_runner, LastYearReport};
pub use year_runner::YearRunner;
