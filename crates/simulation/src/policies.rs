use std::fmt;
use std::str::FromStr;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::{
    CORPORATE_CAP_RATIO, FEEDBACK_CORPORATE_RATIO, STR_CAP_RATIO,
};
use crate::market_config::ConfigError;

/// Rules for corporate landlords buying into the market.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum CorporatePolicy {
    /// Corporations may buy any unit that comes up for sale.
    #[default]
    Free,
    /// Corporations may buy only while their share is below the cap.
    Restrict,
    /// Corporations may not buy, and must sell one unit a year while above the cap.
    Divest,
}

/// Rules for short-term (vacation) rentals.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum StrPolicy {
    #[default]
    Free,
    /// Conversions allowed only while short-term rentals are below the cap.
    Restrict,
    /// No conversions; existing short-term rentals gradually revert.
    Ban,
}

impl CorporatePolicy {
    pub const ALL: &'static [CorporatePolicy] = &[Self::Free, Self::Restrict, Self::Divest];

    pub fn name(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Restrict => "restrict",
            Self::Divest => "divest",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Free => "Corporations compete for every sale",
            Self::Restrict => "Corporate purchases blocked at 10% ownership",
            Self::Divest => "No corporate purchases; forced sales above 10% ownership",
        }
    }

    /// Whether a corporation may win a sale given the corporate share.
    pub fn corporations_can_buy(self, corporate_ratio: f64) -> bool {
        match self {
            Self::Free => true,
            Self::Restrict => corporate_ratio < CORPORATE_CAP_RATIO,
            Self::Divest => false,
        }
    }

    pub fn forces_divestment(self, corporate_ratio: f64) -> bool {
        self == Self::Divest && corporate_ratio > CORPORATE_CAP_RATIO
    }

    /// A free market dominated by corporations discourages new construction.
    pub fn slows_construction(self, corporate_ratio: f64) -> bool {
        self == Self::Free && corporate_ratio > FEEDBACK_CORPORATE_RATIO
    }
}

impl StrPolicy {
    pub const ALL: &'static [StrPolicy] = &[Self::Free, Self::Restrict, Self::Ban];

    pub fn name(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Restrict => "restrict",
            Self::Ban => "ban",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Free => "Landlords may convert vacant units to short-term rentals",
            Self::Restrict => "Conversions allowed while short-term rentals are under 10%",
            Self::Ban => "No conversions; existing short-term rentals revert over time",
        }
    }

    pub fn allows_conversion(self, short_term_ratio: f64) -> bool {
        match self {
            Self::Free => true,
            Self::Restrict => short_term_ratio < STR_CAP_RATIO,
            Self::Ban => false,
        }
    }

    pub fn reverts_short_term(self) -> bool {
        self == Self::Ban
    }
}

/// Which long-term rentals are considered for short-term conversion each year.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum VacancyModel {
    /// Every landlord-held long-term rental gets a conversion roll.
    #[default]
    AllLongTermRentals,
    /// A shuffled 10% sample of them is treated as vacant and rolled.
    SampledVacancies,
}

impl VacancyModel {
    pub fn name(self) -> &'static str {
        match self {
            Self::AllLongTermRentals => "all",
            Self::SampledVacancies => "sampled",
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn parse_named<T: Copy>(
    kind: &'static str,
    value: &str,
    all: &[T],
    name: impl Fn(T) -> &'static str,
) -> Result<T, ConfigError> {
    let wanted = value.trim();
    all.iter()
        .copied()
        .find(|&p| name(p).eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ConfigError::UnknownPolicy {
            kind,
            value: value.to_string(),
        })
}

impl FromStr for CorporatePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("corporate", s, Self::ALL, Self::name)
    }
}

impl FromStr for StrPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named("short-term rental", s, Self::ALL, Self::name)
    }
}

impl FromStr for VacancyModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(
            "vacancy model",
            s,
            &[Self::AllLongTermRentals, Self::SampledVacancies],
            Self::name,
        )
    }
}

impl fmt::Display for CorporatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for StrPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
