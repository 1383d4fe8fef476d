use std::time::Duration;

/// Seed used by `Reset` and by a fresh app start.
pub const CANONICAL_SEED: u32 = 12345;

pub const HOMES_TOTAL: usize = 300;
/// Initial ownership is assigned by position: `[0, 25)` corporate,
/// `[25, 105)` individual landlords, the rest owner-occupied.
pub const INITIAL_CORPORATE_END: usize = 25;
pub const INITIAL_INDIVIDUAL_END: usize = 105;
/// The first few initial units start as short-term rentals.
pub const INITIAL_SHORT_TERM_END: usize = 3;

pub const INITIAL_PRICE_BASE: f64 = 300_000.0;
pub const INITIAL_PRICE_SPREAD: f64 = 200_000.0;
pub const NEW_BUILD_PRICE_BASE: f64 = 400_000.0;
pub const NEW_BUILD_PRICE_SPREAD: f64 = 250_000.0;
/// Monthly rent as a fraction of price at creation.
pub const RENT_TO_PRICE: f64 = 0.005;

pub const DEMAND_FACTOR_START: f64 = 1.0;
pub const DEMAND_DRIFT_CHANCE: f64 = 0.20;
pub const DEMAND_DRIFT_STEP: f64 = 0.05;

/// `rate = DEMAND_APPRECIATION * demand + (SUPPLY_PIVOT - new_homes) * SUPPLY_APPRECIATION`
pub const DEMAND_APPRECIATION: f64 = 0.03;
pub const SUPPLY_PIVOT: f64 = 3.0;
pub const SUPPLY_APPRECIATION: f64 = 0.02;

/// Corporate share above which `Divest` forces a sale and `Restrict` blocks
/// corporate purchases (at or above).
pub const CORPORATE_CAP_RATIO: f64 = 0.10;
pub const DIVEST_TO_INDIVIDUAL_CHANCE: f64 = 0.70;

/// Buyer partition: corporate share of the draw when corporations may buy,
/// then the individual share of what remains.
pub const CORPORATE_BUYER_SHARE: f64 = 0.60;
pub const INDIVIDUAL_BUYER_SHARE: f64 = 0.625;

pub const STR_BAN_REVERT_CHANCE: f64 = 0.20;
pub const STR_CAP_RATIO: f64 = 0.10;
pub const STR_CONVERSION_CHANCE: f64 = 0.05;
/// Fraction of long-term rentals treated as vacant by the sampled vacancy model.
pub const VACANCY_SAMPLE_RATE: f64 = 0.10;

/// Under a free corporate market, a corporate share above this slows construction.
pub const FEEDBACK_CORPORATE_RATIO: f64 = 0.30;
pub const FEEDBACK_CHANCE: f64 = 0.25;

pub const DEFAULT_TURNOVER_RATE_PCT: f64 = 4.0;
/// At most every unit changes hands in a year.
pub const MAX_TURNOVER_RATE_PCT: f64 = 100.0;
pub const DEFAULT_NEW_HOMES_PER_YEAR: u32 = 3;
pub const DEFAULT_YEARS_TO_RUN: u32 = 1;

/// Fixed simulation tick (10 Hz).
pub const FIXED_TIMESTEP: Duration = Duration::from_millis(100);
/// Display pacing between years of a multi-year run.
pub const DEFAULT_YEAR_PACE: Duration = Duration::from_millis(500);
