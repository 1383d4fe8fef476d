//! Headless `--agent` mode: a blocking synchronous loop that reads JSON
//! commands from stdin and writes JSON responses to stdout.
//!
//! ## Protocol
//!
//! Each line of stdin is a JSON object with a `"cmd"` discriminator.
//! Each line of stdout is a JSON response with `"protocol_version"` and
//! `"type"` fields. See [`simulation::agent_protocol`] for the full schema.
//!
//! Time is stepped manually: every `app.update()` is exactly one 100 ms fixed
//! tick, and runs advance one year per tick, so responses never wait on the
//! wall clock.

use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use simulation::agent_protocol::{
    error_response, make_response, AgentCommand, AgentResponse, MarketObservation,
    ResponsePayload, PROTOCOL_VERSION,
};
use simulation::config::FIXED_TIMESTEP;
use simulation::engine::HousingMarket;
use simulation::housing::render_stock_grid;
use simulation::market_config::MarketConfig;
use simulation::runner::{
    CommandLog, CommandOutcome, LastYearReport, MarketCommand, MarketCommands, YearRunner,
};

/// Upper bound on years a single `step` or `run` may request.
const MAX_YEARS_PER_COMMAND: u32 = 10_000;

/// Build the headless app the agent drives, starting from `config`.
pub fn build_agent_app(seed: u32, config: MarketConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(simulation::SimulationPlugin)
        .add_plugins(save::SavePlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FIXED_TIMESTEP))
        .insert_resource(HousingMarket::initialize(seed))
        .insert_resource(config)
        .insert_resource(YearRunner::with_pace(Duration::ZERO));

    // Initial update so Startup systems execute; no fixed tick fires on the
    // first frame.
    app.update();
    app
}

pub fn run_agent_mode(seed: u32, config: MarketConfig) -> AppExit {
    let mut app = build_agent_app(seed, config);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    if write_response(&mut stdout, &make_response(ResponsePayload::Ready)).is_err() {
        return AppExit::error();
    }
    // Log to stderr so it does not interfere with the JSON protocol on stdout.
    eprintln!(
        "housing market agent mode v{PROTOCOL_VERSION} ready, waiting for commands on stdin"
    );

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("stdin read error: {e}");
                return AppExit::error();
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<AgentCommand>(&line) {
            Ok(cmd) => process_command(cmd, &mut app),
            Err(e) => error_response(format!("Parse error: {e}")),
        };
        let is_goodbye = matches!(response.payload, ResponsePayload::Goodbye);

        if let Err(e) = write_response(&mut stdout, &response) {
            eprintln!("stdout write error: {e}");
            return AppExit::error();
        }
        if is_goodbye {
            break;
        }
    }

    eprintln!("housing market agent mode shutting down");
    AppExit::Success
}

fn write_response(out: &mut impl Write, response: &AgentResponse) -> std::io::Result<()> {
    let line = serde_json::to_string(response).map_err(std::io::Error::other)?;
    writeln!(out, "{line}")?;
    out.flush()
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

pub fn process_command(cmd: AgentCommand, app: &mut App) -> AgentResponse {
    match cmd {
        AgentCommand::Observe => make_response(ResponsePayload::Observation {
            observation: Box::new(MarketObservation::capture(app.world())),
        }),

        AgentCommand::Step { years } => step_years(app, years),

        AgentCommand::Run { years } => {
            let years = years.unwrap_or_else(|| {
                app.world()
                    .get_resource::<MarketConfig>()
                    .map_or(1, |c| c.years_to_run)
            });
            run_years(app, years)
        }

        AgentCommand::Stop => apply_commands(app, vec![MarketCommand::Stop]),

        AgentCommand::Configure(patch) => apply_commands(app, patch.into_commands()),

        AgentCommand::Reset => apply_commands(app, vec![MarketCommand::Reset]),

        AgentCommand::NewGame { seed } => {
            apply_commands(app, vec![MarketCommand::NewGame { seed }])
        }

        AgentCommand::Grid { width } => {
            if width == 0 {
                return error_response("grid width must be at least 1");
            }
            let grid = app
                .world()
                .get_resource::<HousingMarket>()
                .map(|m| render_stock_grid(m.stock(), width))
                .unwrap_or_default();
            make_response(ResponsePayload::Grid { width, grid })
        }

        AgentCommand::Save { path } => {
            match save::save_world_to_path(app.world(), Path::new(&path)) {
                Ok(_) => make_response(ResponsePayload::Ok),
                Err(e) => error_response(format!("Save failed: {e}")),
            }
        }

        AgentCommand::Load { path } => {
            match save::load_world_from_path(app.world_mut(), Path::new(&path)) {
                Ok(()) => make_response(ResponsePayload::Ok),
                Err(e) => error_response(format!("Load failed: {e}")),
            }
        }

        AgentCommand::Quit => make_response(ResponsePayload::Goodbye),
    }
}

fn market_year(app: &App) -> u32 {
    app.world()
        .get_resource::<HousingMarket>()
        .map_or(0, |m| m.year())
}

fn last_error(app: &App) -> Option<String> {
    app.world()
        .get_resource::<LastYearReport>()
        .and_then(|l| l.error.as_ref().map(|e| e.to_string()))
}

/// Queue commands, run one tick, and report the first rejection.
fn apply_commands(app: &mut App, commands: Vec<MarketCommand>) -> AgentResponse {
    if commands.is_empty() {
        return make_response(ResponsePayload::Ok);
    }
    let count = commands.len();
    {
        let mut queue = app.world_mut().resource_mut::<MarketCommands>();
        for command in commands {
            queue.push(command);
        }
    }
    app.update();

    let rejected: Vec<String> = app
        .world()
        .resource::<CommandLog>()
        .last_n(count)
        .iter()
        .filter_map(|(command, outcome)| match outcome {
            CommandOutcome::Rejected(e) => Some(format!("{command:?}: {e}")),
            CommandOutcome::Applied => None,
        })
        .collect();

    if rejected.is_empty() {
        make_response(ResponsePayload::Ok)
    } else {
        error_response(format!("Rejected: {}", rejected.join("; ")))
    }
}

fn step_years(app: &mut App, years: u32) -> AgentResponse {
    if years == 0 || years > MAX_YEARS_PER_COMMAND {
        return error_response(format!(
            "step years must be between 1 and {MAX_YEARS_PER_COMMAND}, got {years}"
        ));
    }

    let mut reports = Vec::with_capacity(years as usize);
    for _ in 0..years {
        let before = market_year(app);
        let response = apply_commands(app, vec![MarketCommand::NextYear]);
        if matches!(response.payload, ResponsePayload::Error { .. }) {
            return response;
        }
        if market_year(app) == before {
            let reason = last_error(app).unwrap_or_else(|| "year was not advanced".to_string());
            return error_response(format!("Year {before} rolled back: {reason}"));
        }
        if let Some(report) = app
            .world()
            .get_resource::<LastYearReport>()
            .and_then(|l| l.report.clone())
        {
            reports.push(report);
        }
    }

    make_response(ResponsePayload::StepComplete {
        year: market_year(app),
        reports,
    })
}

fn run_years(app: &mut App, years: u32) -> AgentResponse {
    if years == 0 || years > MAX_YEARS_PER_COMMAND {
        return error_response(format!(
            "run years must be between 1 and {MAX_YEARS_PER_COMMAND}, got {years}"
        ));
    }

    let start = market_year(app);
    let response = apply_commands(app, vec![MarketCommand::RunYears { years }]);
    if matches!(response.payload, ResponsePayload::Error { .. }) {
        return response;
    }
    // One year per tick at zero pace; the command tick already advanced one.
    let mut ticks = 1;
    while app.world().resource::<YearRunner>().is_running() && ticks <= years {
        app.update();
        ticks += 1;
    }

    let year = market_year(app);
    let years_advanced = year - start;
    if years_advanced < years {
        if let Some(reason) = last_error(app) {
            return error_response(format!(
                "Run stopped at year {year} after {years_advanced} of {years} years: {reason}"
            ));
        }
    }
    make_response(ResponsePayload::RunComplete {
        year,
        years_advanced,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
