//! Caller-owned market configuration and its validation boundary.
//!
//! [`MarketConfig`] is what a front end edits (policy buttons, number
//! inputs). Before every year it is validated into an immutable
//! [`PolicyConfig`], which is all the engine ever sees. The engine answers
//! with an optional [`ConfigDelta`] that the owner of the `MarketConfig`
//! applies.

use std::fmt;

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_NEW_HOMES_PER_YEAR, DEFAULT_TURNOVER_RATE_PCT, DEFAULT_YEARS_TO_RUN,
    MAX_TURNOVER_RATE_PCT,
};
use crate::policies::{CorporatePolicy, StrPolicy, VacancyModel};

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Rejected configuration input.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Turnover must be a finite percentage greater than zero.
    InvalidTurnoverRate(f64),
    /// New homes per year cannot be negative.
    NegativeNewHomes(i64),
    /// Value does not fit the supported range.
    NewHomesOutOfRange(i64),
    /// A run needs at least one year.
    InvalidYearsToRun(i64),
    /// Unrecognized policy name for the given lever.
    UnknownPolicy { kind: &'static str, value: String },
    /// The setting cannot change while a multi-year run is in progress.
    RunInProgress,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTurnoverRate(v) => {
                write!(
                    f,
                    "turnover rate must be above 0 and at most {MAX_TURNOVER_RATE_PCT} percent, got {v}"
                )
            }
            ConfigError::NegativeNewHomes(v) => {
                write!(f, "new homes per year cannot be negative, got {v}")
            }
            ConfigError::NewHomesOutOfRange(v) => {
                write!(f, "new homes per year is out of range: {v}")
            }
            ConfigError::InvalidYearsToRun(v) => {
                write!(f, "years to run must be at least 1, got {v}")
            }
            ConfigError::UnknownPolicy { kind, value } => {
                write!(f, "unknown {kind} policy '{value}'")
            }
            ConfigError::RunInProgress => {
                write!(f, "configuration is locked while a run is in progress")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// PolicyConfig
// ---------------------------------------------------------------------------

/// Validated, immutable input to a single `advance_year` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub corporate_policy: CorporatePolicy,
    pub str_policy: StrPolicy,
    pub turnover_rate_pct: f64,
    pub new_homes_per_year: u32,
    pub vacancy_model: VacancyModel,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            corporate_policy: CorporatePolicy::default(),
            str_policy: StrPolicy::default(),
            turnover_rate_pct: DEFAULT_TURNOVER_RATE_PCT,
            new_homes_per_year: DEFAULT_NEW_HOMES_PER_YEAR,
            vacancy_model: VacancyModel::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigDelta
// ---------------------------------------------------------------------------

/// Configuration change suggested by the engine after a year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDelta {
    /// Replacement value for `new_homes_per_year`.
    pub new_homes_per_year: Option<u32>,
}

impl ConfigDelta {
    pub fn is_empty(&self) -> bool {
        self.new_homes_per_year.is_none()
    }

    pub fn apply(&self, config: &mut MarketConfig) {
        if let Some(n) = self.new_homes_per_year {
            config.new_homes_per_year = n;
        }
    }
}

// ---------------------------------------------------------------------------
// MarketConfig resource
// ---------------------------------------------------------------------------

/// The knobs a front end exposes. Defaults match a fresh reset.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct MarketConfig {
    pub corporate_policy: CorporatePolicy,
    pub str_policy: StrPolicy,
    pub turnover_rate_pct: f64,
    pub new_homes_per_year: u32,
    pub years_to_run: u32,
    pub vacancy_model: VacancyModel,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            corporate_policy: CorporatePolicy::default(),
            str_policy: StrPolicy::default(),
            turnover_rate_pct: DEFAULT_TURNOVER_RATE_PCT,
            new_homes_per_year: DEFAULT_NEW_HOMES_PER_YEAR,
            years_to_run: DEFAULT_YEARS_TO_RUN,
            vacancy_model: VacancyModel::default(),
        }
    }
}

fn check_turnover(pct: f64) -> Result<f64, ConfigError> {
    if pct.is_finite() && pct > 0.0 && pct <= MAX_TURNOVER_RATE_PCT {
        Ok(pct)
    } else {
        Err(ConfigError::InvalidTurnoverRate(pct))
    }
}

impl MarketConfig {
    /// Validate into the per-step record the engine consumes.
    pub fn validate(&self) -> Result<PolicyConfig, ConfigError> {
        Ok(PolicyConfig {
            corporate_policy: self.corporate_policy,
            str_policy: self.str_policy,
            turnover_rate_pct: check_turnover(self.turnover_rate_pct)?,
            new_homes_per_year: self.new_homes_per_year,
            vacancy_model: self.vacancy_model,
        })
    }

    pub fn set_turnover_rate_pct(&mut self, pct: f64) -> Result<(), ConfigError> {
        self.turnover_rate_pct = check_turnover(pct)?;
        Ok(())
    }

    /// Accepts signed input so front ends can pass raw field values.
    pub fn set_new_homes_per_year(&mut self, value: i64) -> Result<(), ConfigError> {
        if value < 0 {
            return Err(ConfigError::NegativeNewHomes(value));
        }
        self.new_homes_per_year =
            u32::try_from(value).map_err(|_| ConfigError::NewHomesOutOfRange(value))?;
        Ok(())
    }

    pub fn set_years_to_run(&mut self, value: i64) -> Result<(), ConfigError> {
        self.years_to_run = match u32::try_from(value) {
            Ok(years) if years > 0 => years,
            _ => return Err(ConfigError::InvalidYearsToRun(value)),
        };
        Ok(())
    }

}

impl crate::Saveable for MarketConfig {
    const SAVE_KEY: &'static str = "market_config";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        if *self == Self::default() {
            return None;
        }
        Some(bitcode::encode(self))
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        crate::decode_or_warn(Self::SAVE_KEY, bytes)
    }
}
