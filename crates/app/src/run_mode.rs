//! Default mode: run the configured number of years at display pace,
//! printing one line per year, then the final summary and stock grid.

use std::path::PathBuf;
use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use simulation::engine::HousingMarket;
use simulation::housing::render_stock_grid;
use simulation::runner::{CommandLog, LastYearReport, MarketCommand, MarketCommands, YearRunner};
use simulation::stats::{format_price_k, MarketStats};

use crate::cli::CliOptions;

/// Glyphs per row of the printed stock grid.
const GRID_WIDTH: usize = 20;

/// Frame pacing of the outer loop; fixed ticks still run at 10 Hz.
const FRAME_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Resource)]
struct RunModeState {
    save_path: Option<PathBuf>,
    finished: bool,
}

pub fn run(options: CliOptions) -> AppExit {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(FRAME_INTERVAL)),
        LogPlugin::default(),
    ))
    .add_plugins((simulation::SimulationPlugin, save::SavePlugin));

    let years = options.config.years_to_run;
    app.insert_resource(HousingMarket::initialize(options.seed))
        .insert_resource(options.config)
        .insert_resource(YearRunner::with_pace(options.pace))
        .insert_resource(RunModeState {
            save_path: options.save,
            finished: false,
        });
    app.world_mut()
        .resource_mut::<MarketCommands>()
        .push(MarketCommand::RunYears { years });

    app.add_systems(Update, (print_year_progress, finish_run).chain());

    info!("Simulating {} years on seed {}", years, options.seed);
    app.run()
}

fn print_year_progress(stats: Res<MarketStats>) {
    if !stats.is_changed() || stats.total_units == 0 {
        return;
    }
    println!(
        "Year {:>3} | homeowner {:>3} | individual {:>3} | corporate {:>3} | short-term {:>3} | median {}",
        stats.year,
        stats.counts.homeowner,
        stats.counts.individual,
        stats.counts.corporate,
        stats.short_term_rentals,
        format_price_k(stats.median_price),
    );
}

/// Once the queued run has been applied and has stopped, print the final
/// state, write the optional save, and exit.
fn finish_run(world: &mut World) {
    let applied = world.resource::<CommandLog>().len() > 0;
    if !applied
        || world.resource::<YearRunner>().is_running()
        || world.resource::<RunModeState>().finished
    {
        return;
    }

    let market = world.resource::<HousingMarket>();
    let stats = MarketStats::from_market(market);
    println!();
    println!("{}", stats.summary());
    println!();
    println!("{}", render_stock_grid(market.stock(), GRID_WIDTH));

    let mut exit = AppExit::Success;
    if let Some(e) = &world.resource::<LastYearReport>().error {
        error!("Run ended early: {e}");
        exit = AppExit::error();
    }

    let save_path = {
        let mut state = world.resource_mut::<RunModeState>();
        state.finished = true;
        state.save_path.take()
    };
    if let Some(path) = save_path {
        match save::save_world_to_path(world, &path) {
            Ok(len) => info!("Saved market to {} ({} bytes)", path.display(), len),
            Err(e) => {
                error!("Save to {} failed: {e}", path.display());
                exit = AppExit::error();
            }
        }
    }

    world.send_event(exit);
}
