use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::market_config::ConfigError;
use crate::policies::{CorporatePolicy, StrPolicy, VacancyModel};

/// A request from a front end. Applied in order at the start of the next tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketCommand {
    /// Advance a single year. Ignored while a run is active.
    NextYear,
    /// Start a paced run of `years` years.
    RunYears { years: u32 },
    /// Drop the remaining years of the active run.
    Stop,
    /// Cancel any run, restore the canonical market and default settings.
    Reset,
    /// Cancel any run and start a fresh market on `seed`. Settings are kept.
    NewGame { seed: u32 },
    SetCorporatePolicy { policy: CorporatePolicy },
    SetStrPolicy { policy: StrPolicy },
    SetTurnoverRate { pct: f64 },
    SetNewHomes { homes: i64 },
    SetYearsToRun { years: i64 },
    SetVacancyModel { model: VacancyModel },
}

impl MarketCommand {
    /// Whether this command edits `MarketConfig` (locked during a run).
    pub fn is_config_change(&self) -> bool {
        matches!(
            self,
            Self::SetCorporatePolicy { .. }
                | Self::SetStrPolicy { .. }
                | Self::SetTurnoverRate { .. }
                | Self::SetNewHomes { .. }
                | Self::SetYearsToRun { .. }
                | Self::SetVacancyModel { .. }
        )
    }
}

/// FIFO of pending commands.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct MarketCommands {
    pending: Vec<MarketCommand>,
}

impl MarketCommands {
    pub fn push(&mut self, command: MarketCommand) {
        self.pending.push(command);
    }

    pub fn drain(&mut self) -> Vec<MarketCommand> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

// ---------------------------------------------------------------------------
// Outcome log
// ---------------------------------------------------------------------------

/// Maximum number of entries retained in the log.
const MAX_ENTRIES: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Applied,
    Rejected(ConfigError),
}

/// Ring buffer of the last [`MAX_ENTRIES`] commands and how they were handled.
#[derive(Resource, Debug, Clone, Default)]
pub struct CommandLog {
    entries: Vec<(MarketCommand, CommandOutcome)>,
}

impl CommandLog {
    pub fn push(&mut self, command: MarketCommand, outcome: CommandOutcome) {
        if self.entries.len() >= MAX_ENTRIES {
            self.entries.remove(0);
        }
        self.entries.push((command, outcome));
    }

    /// Return the last `n` entries (or fewer if the log is shorter).
    pub fn last_n(&self, n: usize) -> &[(MarketCommand, CommandOutcome)] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn last_outcome(&self) -> Option<&CommandOutcome> {
        self.entries.last().map(|(_, outcome)| outcome)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
