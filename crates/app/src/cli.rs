//! Command-line flags for the `housing-market` binary.
//!
//! Numeric values are checked by the same `MarketConfig` setters the command
//! queue uses.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use simulation::config::{CANONICAL_SEED, DEFAULT_YEAR_PACE};
use simulation::market_config::{ConfigError, MarketConfig};
use simulation::policies::{CorporatePolicy, StrPolicy, VacancyModel};

/// Housing market policy simulator
///
/// Runs the market for a number of years at display pace and prints the
/// final statistics, or serves the JSON agent protocol on stdin/stdout.
#[derive(clap::Parser, Clone, Debug)]
#[clap(name = "housing-market")]
#[clap(version)]
pub struct CliArgs {
    /// Read JSON commands on stdin and answer on stdout.
    #[arg(long)]
    pub agent: bool,
    /// Years to run.
    #[arg(long, allow_negative_numbers = true)]
    pub years: Option<i64>,
    /// Random seed.
    #[arg(long, default_value_t = CANONICAL_SEED)]
    pub seed: u32,
    /// Yearly turnover rate in percent.
    #[arg(long, allow_negative_numbers = true)]
    pub turnover: Option<f64>,
    /// Homes built per year.
    #[arg(long, allow_negative_numbers = true)]
    pub new_homes: Option<i64>,
    /// Corporate ownership policy: free, restrict or divest.
    #[arg(long)]
    pub corporate: Option<CorporatePolicy>,
    /// Short-term rental policy: free, restrict or ban.
    #[arg(long = "str")]
    pub str_policy: Option<StrPolicy>,
    /// Which rentals may convert to short-term: all or sampled.
    #[arg(long)]
    pub vacancy: Option<VacancyModel>,
    /// Delay between years of the run, in milliseconds. Run mode only.
    #[arg(long)]
    pub pace_ms: Option<u64>,
    /// Write a save file when the run finishes. Run mode only.
    #[arg(long)]
    pub save: Option<PathBuf>,
}

/// Validated options the run and agent modes start from.
#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub agent: bool,
    pub seed: u32,
    pub config: MarketConfig,
    pub pace: Duration,
    pub save: Option<PathBuf>,
}

#[derive(Debug, PartialEq)]
pub enum CliError {
    Config(ConfigError),
    /// A run-mode flag was given together with `--agent`.
    NotInAgentMode(&'static str),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "invalid option: {e}"),
            CliError::NotInAgentMode(flag) => {
                write!(f, "{flag} has no effect with --agent")
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::NotInAgentMode(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl CliArgs {
    pub fn into_options(self) -> Result<CliOptions, CliError> {
        if self.agent {
            if self.pace_ms.is_some() {
                return Err(CliError::NotInAgentMode("--pace-ms"));
            }
            if self.save.is_some() {
                return Err(CliError::NotInAgentMode("--save"));
            }
        }

        let mut config = MarketConfig::default();
        if let Some(years) = self.years {
            config.set_years_to_run(years)?;
        }
        if let Some(pct) = self.turnover {
            config.set_turnover_rate_pct(pct)?;
        }
        if let Some(homes) = self.new_homes {
            config.set_new_homes_per_year(homes)?;
        }
        if let Some(policy) = self.corporate {
            config.corporate_policy = policy;
        }
        if let Some(policy) = self.str_policy {
            config.str_policy = policy;
        }
        if let Some(model) = self.vacancy {
            config.vacancy_model = model;
        }

        Ok(CliOptions {
            agent: self.agent,
            seed: self.seed,
            config,
            pace: self
                .pace_ms
                .map_or(DEFAULT_YEAR_PACE, Duration::from_millis),
            save: self.save,
        })
    }
}
