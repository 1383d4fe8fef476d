//! Systems that turn queued commands and elapsed time into year advances.

use bevy::prelude::*;

use crate::engine::{HousingMarket, SimulationError, YearReport};
use crate::market_config::{ConfigError, MarketConfig};

use super::commands::{CommandLog, CommandOutcome, MarketCommand, MarketCommands};
use super::year_runner::YearRunner;

/// The most recent year transition, or the error that rolled it back.
#[derive(Resource, Debug, Clone, Default)]
pub struct LastYearReport {
    pub report: Option<YearReport>,
    pub error: Option<SimulationError>,
}

// ---------------------------------------------------------------------------
// PreSim
// ---------------------------------------------------------------------------

/// Drains the command queue and applies every command in order.
pub fn apply_market_commands(
    mut queue: ResMut<MarketCommands>,
    mut log: ResMut<CommandLog>,
    mut config: ResMut<MarketConfig>,
    mut market: ResMut<HousingMarket>,
    mut runner: ResMut<YearRunner>,
    mut last: ResMut<LastYearReport>,
) {
    for command in queue.drain() {
        let result = apply_single(&command, &mut config, &mut market, &mut runner, &mut last);
        let outcome = match result {
            Ok(()) => CommandOutcome::Applied,
            Err(e) => {
                warn!("Rejected {:?}: {}", command, e);
                CommandOutcome::Rejected(e)
            }
        };
        log.push(command, outcome);
    }
}

fn apply_single(
    command: &MarketCommand,
    config: &mut MarketConfig,
    market: &mut HousingMarket,
    runner: &mut YearRunner,
    last: &mut LastYearReport,
) -> Result<(), ConfigError> {
    if command.is_config_change() && runner.is_running() {
        return Err(ConfigError::RunInProgress);
    }
    match command {
        MarketCommand::NextYear => runner.request_step(),
        MarketCommand::RunYears { years } => {
            runner.start_run(*years)?;
            info!("Running {} years from year {}", years, market.year());
            Ok(())
        }
        MarketCommand::Stop => {
            if runner.is_running() {
                info!(
                    "Run stopped at year {} after {} of {} years",
                    market.year(),
                    runner.completed(),
                    runner.completed() + runner.remaining()
                );
            }
            runner.stop();
            Ok(())
        }
        MarketCommand::Reset => {
            runner.stop();
            market.reset();
            *config = MarketConfig::default();
            *last = LastYearReport::default();
            info!("Market reset to seed {}", market.seed());
            Ok(())
        }
        MarketCommand::NewGame { seed } => {
            runner.stop();
            *market = HousingMarket::initialize(*seed);
            *last = LastYearReport::default();
            info!("New market on seed {}", seed);
            Ok(())
        }
        MarketCommand::SetCorporatePolicy { policy } => {
            config.corporate_policy = *policy;
            Ok(())
        }
        MarketCommand::SetStrPolicy { policy } => {
            config.str_policy = *policy;
            Ok(())
        }
        MarketCommand::SetTurnoverRate { pct } => config.set_turnover_rate_pct(*pct),
        MarketCommand::SetNewHomes { homes } => config.set_new_homes_per_year(*homes),
        MarketCommand::SetYearsToRun { years } => config.set_years_to_run(*years),
        MarketCommand::SetVacancyModel { model } => {
            config.vacancy_model = *model;
            Ok(())
        }
    }
}

/// Grants run years as the pace timer elapses.
pub fn drive_year_runner(time: Res<Time>, mut runner: ResMut<YearRunner>) {
    runner.tick(time.delta());
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Advances the market once per granted year and applies the engine's
/// suggested configuration change.
pub fn advance_market_year(
    mut runner: ResMut<YearRunner>,
    mut market: ResMut<HousingMarket>,
    mut config: ResMut<MarketConfig>,
    mut last: ResMut<LastYearReport>,
) {
    while runner.take_due() {
        let policy = match config.validate() {
            Ok(policy) => policy,
            Err(e) => {
                warn!("Year {} not advanced: {}", market.year(), e);
                runner.stop();
                return;
            }
        };

        match market.advance_year(&policy) {
            Ok(report) => {
                debug!(
                    "Year {}: {} resales, {} built, demand {:.2}",
                    report.year, report.resales, report.homes_built, report.demand_factor
                );
                if let Some(homes) = report.config_delta.new_homes_per_year {
                    info!(
                        "Corporate concentration slowed construction to {} homes/year",
                        homes
                    );
                }
                report.config_delta.apply(&mut config);
                last.report = Some(report);
                last.error = None;
            }
            Err(e) => {
                warn!("Year {} rolled back: {}", market.year(), e);
                last.error = Some(e);
                runner.stop();
                return;
            }
        }
    }

    if let Some(years) = runner.take_finished() {
        info!("Run of {} years finished at year {}", years, market.year());
    }
}
