//! The individual phases of a simulated year, in the order `run_year`
//! calls them. Each phase consumes draws from the market's single random
//! stream, so reordering phases or draws changes every later outcome.

use bevy::log::debug;

use crate::config::{
    DEMAND_APPRECIATION, DEMAND_DRIFT_CHANCE, DEMAND_DRIFT_STEP, DIVEST_TO_INDIVIDUAL_CHANCE,
    FEEDBACK_CHANCE, NEW_BUILD_PRICE_BASE, NEW_BUILD_PRICE_SPREAD, STR_BAN_REVERT_CHANCE,
    STR_CONVERSION_CHANCE, SUPPLY_APPRECIATION, SUPPLY_PIVOT, VACANCY_SAMPLE_RATE,
};
use crate::housing::{OwnerType, Usage};
use crate::market_config::{ConfigDelta, PolicyConfig};
use crate::policies::{CorporatePolicy, StrPolicy, VacancyModel};

use super::buyer::resolve_buyer;
use super::state::{Divestment, HousingMarket};

impl HousingMarket {
    /// Demand ratchets up; it never comes back down until a reset.
    pub(super) fn drift_demand(&mut self) -> bool {
        let raised = self.rng.chance(DEMAND_DRIFT_CHANCE);
        if raised {
            self.demand_factor += DEMAND_DRIFT_STEP;
        }
        raised
    }

    /// Building fewer than three homes a year pushes prices up faster;
    /// building more slows them.
    pub(super) fn appreciate(&mut self, new_homes_per_year: u32) -> f64 {
        let rate = DEMAND_APPRECIATION * self.demand_factor
            + (SUPPLY_PIVOT - f64::from(new_homes_per_year)) * SUPPLY_APPRECIATION;
        let factor = 1.0 + rate;
        for unit in self.stock.iter_mut() {
            unit.appreciate(factor);
        }
        rate
    }

    pub(super) fn divest(&mut self, policy: CorporatePolicy) -> Option<Divestment> {
        if !policy.forces_divestment(self.stock.corporate_ratio()) {
            return None;
        }
        let corporate = self.stock.indices_owned_by(OwnerType::Corporate);
        let index = corporate[self.rng.pick_index(corporate.len())];
        let new_owner = if self.rng.chance(DIVEST_TO_INDIVIDUAL_CHANCE) {
            OwnerType::Individual
        } else {
            OwnerType::Homeowner
        };
        let unit = self.stock.get_mut(index)?;
        unit.owner = new_owner;
        debug!("Divested unit {} to {}", unit.id, new_owner.name());
        Some(Divestment {
            unit_id: unit.id,
            new_owner,
        })
    }

    /// Resell `floor(total * turnover%)` units, picked with replacement.
    pub(super) fn resell(&mut self, turnover_rate_pct: f64, corporations_can_buy: bool) -> u32 {
        let total = self.stock.len();
        if total == 0 {
            return 0;
        }
        let sales = (total as f64 * (turnover_rate_pct / 100.0)).floor() as u32;
        for _ in 0..sales {
            let index = self.rng.pick_index(total);
            let roll = self.rng.next_unit();
            let buyer = resolve_buyer(roll, corporations_can_buy);
            if let Some(unit) = self.stock.get_mut(index) {
                unit.owner = buyer;
            }
            self.results.record_purchase(buyer);
        }
        sales
    }

    /// Build new units and sell each one immediately.
    pub(super) fn construct(&mut self, count: u32, corporations_can_buy: bool) -> u32 {
        for _ in 0..count {
            let price = NEW_BUILD_PRICE_BASE + self.rng.next_unit() * NEW_BUILD_PRICE_SPREAD;
            let index = self
                .stock
                .push(OwnerType::Unowned, Usage::LongTermRental, price);
            let buyer = resolve_buyer(self.rng.next_unit(), corporations_can_buy);
            if let Some(unit) = self.stock.get_mut(index) {
                unit.owner = buyer;
            }
            self.results.record_purchase(buyer);
        }
        count
    }

    /// Under a ban, each short-term rental independently reverts with 20% odds.
    pub(super) fn enforce_short_term_ban(&mut self, policy: StrPolicy) -> u32 {
        if !policy.reverts_short_term() {
            return 0;
        }
        let mut reverted = 0;
        for unit in self.stock.iter_mut() {
            if unit.is_short_term() && self.rng.chance(STR_BAN_REVERT_CHANCE) {
                unit.usage = Usage::LongTermRental;
                reverted += 1;
            }
        }
        reverted
    }

    /// Landlords convert vacant long-term rentals to short-term rentals
    /// where policy allows.
    pub(super) fn convert_vacancies(&mut self, policy: StrPolicy, model: VacancyModel) -> u32 {
        let short_term_ratio = self.stock.short_term_ratio();
        let mut candidates = self.stock.available_rental_indices();

        if model == VacancyModel::SampledVacancies {
            let vacant = (candidates.len() as f64 * VACANCY_SAMPLE_RATE).floor() as usize;
            // Backward Fisher-Yates over the whole pool, then keep the head.
            for i in (1..candidates.len()).rev() {
                let j = self.rng.pick_index(i + 1);
                candidates.swap(i, j);
            }
            candidates.truncate(vacant);
        }

        if !policy.allows_conversion(short_term_ratio) {
            return 0;
        }

        let mut converted = 0;
        for index in candidates {
            if !self.rng.chance(STR_CONVERSION_CHANCE) {
                continue;
            }
            if let Some(unit) = self.stock.get_mut(index) {
                unit.usage = Usage::ShortTermRental;
                converted += 1;
            }
        }
        self.results.converted_to_short_term += converted;
        converted
    }

    /// A corporate-dominated free market sometimes discourages a builder.
    ///
    /// The roll is taken whenever the condition holds, even if construction
    /// is already at zero.
    pub(super) fn construction_feedback(
        &mut self,
        config: &PolicyConfig,
        corporate_ratio: f64,
    ) -> ConfigDelta {
        if !config.corporate_policy.slows_construction(corporate_ratio) {
            return ConfigDelta::default();
        }
        if self.rng.chance(FEEDBACK_CHANCE) && config.new_homes_per_year > 0 {
            let reduced = config.new_homes_per_year - 1;
            debug!(
                "Corporate share {:.2} discouraged construction: {} -> {} homes/year",
                corporate_ratio, config.new_homes_per_year, reduced
            );
            return ConfigDelta {
                new_homes_per_year: Some(reduced),
            };
        }
        ConfigDelta::default()
    }
}
