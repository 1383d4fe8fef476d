//! JSON line protocol spoken by `housing-market --agent`.
//!
//! One `AgentCommand` per stdin line, one `AgentResponse` per stdout line.
//! The stdin/stdout loop is in the app crate; only the message shapes and the
//! observation snapshot live here.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::{HousingMarket, YearReport};
use crate::market_config::MarketConfig;
use crate::policies::{CorporatePolicy, StrPolicy, VacancyModel};
use crate::runner::{LastYearReport, MarketCommand, YearRunner};
use crate::state_hash::compute_state_hash;
use crate::stats::MarketStats;

// ---------------------------------------------------------------------------
// Commands (stdin → simulation)
// ---------------------------------------------------------------------------

/// One request line. Tagged by `cmd`.
#[derive(Debug, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Request the current market observation.
    Observe,

    /// Advance `years` years back to back (default 1).
    Step {
        #[serde(default = "one_year")]
        years: u32,
    },

    /// Run `years` years through the paced runner, or the configured
    /// `years_to_run` when omitted.
    Run { years: Option<u32> },

    /// Stop the active run.
    Stop,

    /// Change one or more settings.
    Configure(ConfigurePatch),

    /// Canonical market and default settings.
    Reset,

    /// Fresh market on the given seed.
    NewGame { seed: u32 },

    /// Text rendering of the stock, `width` glyphs per row.
    Grid {
        #[serde(default = "default_grid_width")]
        width: usize,
    },

    /// Write the market and its settings to a save file.
    Save { path: String },

    /// Restore the market and its settings from a save file.
    Load { path: String },

    /// Gracefully shut down the agent session.
    Quit,
}

fn one_year() -> u32 {
    1
}

fn default_grid_width() -> usize {
    20
}

/// Settings to change; absent fields are left alone.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct ConfigurePatch {
    pub corporate_policy: Option<CorporatePolicy>,
    pub str_policy: Option<StrPolicy>,
    pub turnover_rate_pct: Option<f64>,
    pub new_homes_per_year: Option<i64>,
    pub years_to_run: Option<i64>,
    pub vacancy_model: Option<VacancyModel>,
}

impl ConfigurePatch {
    /// One `MarketCommand` per field present, in declaration order.
    pub fn into_commands(self) -> Vec<MarketCommand> {
        let mut commands = Vec::new();
        if let Some(policy) = self.corporate_policy {
            commands.push(MarketCommand::SetCorporatePolicy { policy });
        }
        if let Some(policy) = self.str_policy {
            commands.push(MarketCommand::SetStrPolicy { policy });
        }
        if let Some(pct) = self.turnover_rate_pct {
            commands.push(MarketCommand::SetTurnoverRate { pct });
        }
        if let Some(homes) = self.new_homes_per_year {
            commands.push(MarketCommand::SetNewHomes { homes });
        }
        if let Some(years) = self.years_to_run {
            commands.push(MarketCommand::SetYearsToRun { years });
        }
        if let Some(model) = self.vacancy_model {
            commands.push(MarketCommand::SetVacancyModel { model });
        }
        commands
    }
}

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// Everything an agent needs to decide its next command.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MarketObservation {
    pub seed: u32,
    pub stats: MarketStats,
    pub config: MarketConfig,
    pub running: bool,
    pub state_hash: u64,
    pub last_report: Option<YearReport>,
    pub last_error: Option<String>,
}

impl MarketObservation {
    /// Read the observation straight from the world, independent of whether
    /// the PostSim systems have run since the last change.
    pub fn capture(world: &World) -> Self {
        let Some(market) = world.get_resource::<HousingMarket>() else {
            return Self::default();
        };
        let last = world.get_resource::<LastYearReport>();
        Self {
            seed: market.seed(),
            stats: MarketStats::from_market(market),
            config: world
                .get_resource::<MarketConfig>()
                .cloned()
                .unwrap_or_default(),
            running: world
                .get_resource::<YearRunner>()
                .is_some_and(|r| r.is_running()),
            state_hash: compute_state_hash(market),
            last_report: last.and_then(|l| l.report.clone()),
            last_error: last.and_then(|l| l.error.as_ref().map(|e| e.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Responses (simulation → stdout)
// ---------------------------------------------------------------------------

/// Response line: `protocol_version` plus the payload fields.
#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub protocol_version: u32,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

/// Response body, tagged by `type`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsePayload {
    /// Sent once at startup.
    Ready,

    /// A market observation snapshot.
    Observation { observation: Box<MarketObservation> },

    /// Years were advanced; `year` is the market's current year.
    StepComplete {
        year: u32,
        reports: Vec<YearReport>,
    },

    /// A paced run finished or was cut short by an error.
    RunComplete { year: u32, years_advanced: u32 },

    /// Text rendering of the stock.
    Grid { width: usize, grid: String },

    /// Generic success acknowledgement.
    Ok,

    /// The command was malformed or refused.
    Error { message: String },

    /// Answer to `quit`; nothing follows.
    Goodbye,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bumped whenever a command or response shape changes.
pub const PROTOCOL_VERSION: u32 = 1;

/// Wraps `payload` with [`PROTOCOL_VERSION`].
pub fn make_response(payload: ResponsePayload) -> AgentResponse {
    AgentResponse {
        protocol_version: PROTOCOL_VERSION,
        payload,
    }
}

/// Shorthand for an error response.
pub fn error_response(message: impl Into<String>) -> AgentResponse {
    make_response(ResponsePayload::Error {
        message: message.into(),
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_observe_command() {
        let json = r#"{"cmd":"observe"}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, AgentCommand::Observe));
    }

    #[test]
    fn deserialize_step_command() {
        let json = r#"{"cmd":"step","years":10}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        if let AgentCommand::Step { years } = cmd {
            assert_eq!(years, 10);
        } else {
            panic!("expected Step");
        }
    }

    #[test]
    fn deserialize_step_defaults_to_one_year() {
        let cmd: AgentCommand = serde_json::from_str(r#"{"cmd":"step"}"#).unwrap();
        assert!(matches!(cmd, AgentCommand::Step { years: 1 }));
    }

    #[test]
    fn deserialize_run_with_and_without_years() {
        let cmd: AgentCommand = serde_json::from_str(r#"{"cmd":"run","years":5}"#).unwrap();
        assert!(matches!(cmd, AgentCommand::Run { years: Some(5) }));
        let cmd: AgentCommand = serde_json::from_str(r#"{"cmd":"run"}"#).unwrap();
        assert!(matches!(cmd, AgentCommand::Run { years: None }));
    }

    #[test]
    fn deserialize_configure_command() {
        let json = r#"{"cmd":"configure","corporate_policy":"restrict","str_policy":"ban","new_homes_per_year":5}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        let AgentCommand::Configure(patch) = cmd else {
            panic!("expected Configure");
        };
        assert_eq!(patch.corporate_policy, Some(CorporatePolicy::Restrict));
        assert_eq!(patch.str_policy, Some(StrPolicy::Ban));
        assert_eq!(patch.new_homes_per_year, Some(5));
        assert_eq!(patch.turnover_rate_pct, None);
    }

    #[test]
    fn deserialize_configure_rejects_unknown_policy() {
        let json = r#"{"cmd":"configure","corporate_policy":"nationalize"}"#;
        assert!(serde_json::from_str::<AgentCommand>(json).is_err());
    }

    #[test]
    fn configure_patch_expands_in_order() {
        let patch = ConfigurePatch {
            turnover_rate_pct: Some(6.0),
            vacancy_model: Some(VacancyModel::SampledVacancies),
            corporate_policy: Some(CorporatePolicy::Divest),
            ..Default::default()
        };
        assert_eq!(
            patch.into_commands(),
            vec![
                MarketCommand::SetCorporatePolicy {
                    policy: CorporatePolicy::Divest
                },
                MarketCommand::SetTurnoverRate { pct: 6.0 },
                MarketCommand::SetVacancyModel {
                    model: VacancyModel::SampledVacancies
                },
            ]
        );
        assert!(ConfigurePatch::default().into_commands().is_empty());
    }

    #[test]
    fn deserialize_new_game_command() {
        let json = r#"{"cmd":"new_game","seed":42}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        if let AgentCommand::NewGame { seed } = cmd {
            assert_eq!(seed, 42);
        } else {
            panic!("expected NewGame");
        }
    }

    #[test]
    fn deserialize_grid_command_default_width() {
        let cmd: AgentCommand = serde_json::from_str(r#"{"cmd":"grid"}"#).unwrap();
        assert!(matches!(cmd, AgentCommand::Grid { width: 20 }));
    }

    #[test]
    fn deserialize_save_and_load_commands() {
        let cmd: AgentCommand =
            serde_json::from_str(r#"{"cmd":"save","path":"/tmp/market.hsim"}"#).unwrap();
        assert!(matches!(cmd, AgentCommand::Save { .. }));
        let cmd: AgentCommand =
            serde_json::from_str(r#"{"cmd":"load","path":"/tmp/market.hsim"}"#).unwrap();
        assert!(matches!(cmd, AgentCommand::Load { .. }));
    }

    #[test]
    fn deserialize_quit_command() {
        let json = r#"{"cmd":"quit"}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, AgentCommand::Quit));
    }

    #[test]
    fn serialize_ready_response() {
        let resp = make_response(ResponsePayload::Ready);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"protocol_version\":1"));
        assert!(json.contains("\"type\":\"ready\""));
    }

    #[test]
    fn serialize_observation_of_fresh_market() {
        let mut world = World::new();
        world.insert_resource(HousingMarket::initialize(12345));
        let observation = MarketObservation::capture(&world);
        assert_eq!(observation.seed, 12345);
        assert_eq!(observation.stats.total_units, 300);
        assert!(!observation.running);

        let resp = make_response(ResponsePayload::Observation {
            observation: Box::new(observation),
        });
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"type\":\"observation\""));
        assert!(json.contains("\"total_units\":300"));
        assert!(json.contains("\"corporate_policy\":\"free\""));
    }

    #[test]
    fn capture_without_market_is_default() {
        let world = World::new();
        let observation = MarketObservation::capture(&world);
        assert_eq!(observation.stats.total_units, 0);
        assert_eq!(observation.state_hash, 0);
    }

    #[test]
    fn serialize_step_complete_response() {
        let resp = make_response(ResponsePayload::StepComplete {
            year: 4,
            reports: Vec::new(),
        });
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"type\":\"step_complete\""));
        assert!(json.contains("\"year\":4"));
    }

    #[test]
    fn serialize_grid_response() {
        let resp = make_response(ResponsePayload::Grid {
            width: 2,
            grid: "SC\nIH".to_string(),
        });
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"type\":\"grid\""));
        assert!(json.contains("SC\\nIH"));
    }

    #[test]
    fn serialize_error_response() {
        let json = serde_json::to_string(&error_response("something went wrong")).unwrap();
        assert!(json.contains("\"type\":\"error\""));
        assert!(json.contains("something went wrong"));
    }

    #[test]
    fn serialize_goodbye_response() {
        let resp = make_response(ResponsePayload::Goodbye);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"type\":\"goodbye\""));
    }

    #[test]
    fn invalid_command_returns_parse_error() {
        let json = r#"{"cmd":"nonexistent"}"#;
        let result = serde_json::from_str::<AgentCommand>(json);
        assert!(result.is_err());
    }

    #[test]
    fn malformed_json_returns_parse_error() {
        let json = r#"{not valid json"#;
        let result = serde_json::from_str::<AgentCommand>(json);
        assert!(result.is_err());
    }
}
