use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::{
    CANONICAL_SEED, DEMAND_FACTOR_START, HOMES_TOTAL, INITIAL_CORPORATE_END,
    INITIAL_INDIVIDUAL_END, INITIAL_PRICE_BASE, INITIAL_PRICE_SPREAD, INITIAL_SHORT_TERM_END,
};
use crate::housing::{HousingStock, OwnerType, Usage};
use crate::market_config::{ConfigDelta, PolicyConfig};
use crate::sim_rng::SimRng;

use super::error::SimulationError;
use super::results::{Baseline, MarketResults};

// =============================================================================
// YearReport
// =============================================================================

/// A corporate unit sold off under the divest policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divestment {
    pub unit_id: u32,
    pub new_owner: OwnerType,
}

/// What happened during one `advance_year`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearReport {
    /// The year the market is now in.
    pub year: u32,
    pub demand_raised: bool,
    pub demand_factor: f64,
    pub appreciation_rate: f64,
    pub divestment: Option<Divestment>,
    /// Corporate share used to gate purchases this year.
    pub corporate_ratio: f64,
    pub corporations_could_buy: bool,
    pub resales: u32,
    pub homes_built: u32,
    pub reverted_to_long_term: u32,
    /// This year's increase of each cumulative counter.
    pub activity: MarketResults,
    /// Change the caller should apply to its configuration.
    pub config_delta: ConfigDelta,
}

// =============================================================================
// HousingMarket
// =============================================================================

/// The whole simulation state: stock, counters, demand and the random stream.
///
/// Created by [`HousingMarket::initialize`] and mutated only through
/// [`HousingMarket::advance_year`], which is all-or-nothing.
#[derive(Resource, Debug, Clone, PartialEq, Encode, Decode)]
pub struct HousingMarket {
    pub(super) seed: u32,
    pub(super) year: u32,
    pub(super) demand_factor: f64,
    pub(super) stock: HousingStock,
    pub(super) results: MarketResults,
    pub(super) baseline: Baseline,
    pub(super) rng: SimRng,
}

impl Default for HousingMarket {
    fn default() -> Self {
        Self::initialize(CANONICAL_SEED)
    }
}

impl HousingMarket {
    /// Build the starting stock of 300 units.
    ///
    /// Ownership and usage are fixed by position; only prices are drawn, one
    /// per unit in id order.
    pub fn initialize(seed: u32) -> Self {
        let mut rng = SimRng::new(seed);
        let mut stock = HousingStock::with_capacity(HOMES_TOTAL);
        for i in 0..HOMES_TOTAL {
            let owner = if i < INITIAL_CORPORATE_END {
                OwnerType::Corporate
            } else if i < INITIAL_INDIVIDUAL_END {
                OwnerType::Individual
            } else {
                OwnerType::Homeowner
            };
            let price = INITIAL_PRICE_BASE + rng.next_unit() * INITIAL_PRICE_SPREAD;
            let usage = if i < INITIAL_SHORT_TERM_END {
                Usage::ShortTermRental
            } else {
                Usage::LongTermRental
            };
            stock.push(owner, usage, price);
        }
        let baseline = Baseline::capture(&stock);
        Self {
            seed,
            year: 1,
            demand_factor: DEMAND_FACTOR_START,
            stock,
            results: MarketResults::default(),
            baseline,
            rng,
        }
    }

    /// Return to a fresh market on the canonical seed.
    pub fn reset(&mut self) {
        *self = Self::initialize(CANONICAL_SEED);
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn demand_factor(&self) -> f64 {
        self.demand_factor
    }

    pub fn stock(&self) -> &HousingStock {
        &self.stock
    }

    pub fn results(&self) -> &MarketResults {
        &self.results
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Position of the random stream, for hashing and replay checks.
    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    /// Advance the market by one year.
    ///
    /// The year is computed on a copy and committed only if the result passes
    /// [`check_invariants`](Self::check_invariants); on error `self` is left
    /// exactly as it was.
    pub fn advance_year(&mut self, config: &PolicyConfig) -> Result<YearReport, SimulationError> {
        let mut next = self.clone();
        let report = next.run_year(config);
        next.check_invariants()?;
        *self = next;
        Ok(report)
    }

    /// Every unit owned, ids in sequence, prices positive, rents non-negative.
    pub fn check_invariants(&self) -> Result<(), SimulationError> {
        for (index, unit) in self.stock.iter().enumerate() {
            if unit.id as usize != index {
                return Err(SimulationError::IdOutOfSequence { index, id: unit.id });
            }
            if unit.owner == OwnerType::Unowned {
                return Err(SimulationError::UnresolvedOwner { unit_id: unit.id });
            }
            if !unit.price.is_finite() || unit.price <= 0.0 {
                return Err(SimulationError::InvalidPrice {
                    unit_id: unit.id,
                    price: unit.price,
                });
            }
            if !unit.rent.is_finite() || unit.rent < 0.0 {
                return Err(SimulationError::InvalidRent {
                    unit_id: unit.id,
                    rent: unit.rent,
                });
            }
        }
        Ok(())
    }

    fn run_year(&mut self, config: &PolicyConfig) -> YearReport {
        let before = self.results;

        let demand_raised = self.drift_demand();
        let appreciation_rate = self.appreciate(config.new_homes_per_year);
        let divestment = self.divest(config.corporate_policy);

        // Fixed for resales, construction and the feedback check.
        let corporate_ratio = self.stock.corporate_ratio();
        let corporations_could_buy = config
            .corporate_policy
            .corporations_can_buy(corporate_ratio);

        let resales = self.resell(config.turnover_rate_pct, corporations_could_buy);
        let homes_built = self.construct(config.new_homes_per_year, corporations_could_buy);
        let reverted_to_long_term = self.enforce_short_term_ban(config.str_policy);
        self.convert_vacancies(config.str_policy, config.vacancy_model);
        let config_delta = self.construction_feedback(config, corporate_ratio);

        self.year += 1;

        YearReport {
            year: self.year,
            demand_raised,
            demand_factor: self.demand_factor,
            appreciation_rate,
            divestment,
            corporate_ratio,
            corporations_could_buy,
            resales,
            homes_built,
            reverted_to_long_term,
            activity: self.results.since(&before),
            config_delta,
        }
    }
}

impl crate::Saveable for HousingMarket {
    const SAVE_KEY: &'static str = "housing_market";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        // A fresh canonical market is what `Default` rebuilds on load.
        if *self == Self::default() {
            return None;
        }
        Some(bitcode::encode(self))
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        crate::decode_or_warn(Self::SAVE_KEY, bytes)
    }
}
