use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::housing::{HousingStock, OwnerType};

/// Cumulative market activity since the last initialize.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode,
)]
pub struct MarketResults {
    pub purchases_by_homeowner: u32,
    pub purchases_by_corporate: u32,
    pub purchases_by_individual: u32,
    pub converted_to_short_term: u32,
}

impl MarketResults {
    pub(crate) fn record_purchase(&mut self, buyer: OwnerType) {
        match buyer {
            OwnerType::Homeowner => self.purchases_by_homeowner += 1,
            OwnerType::Corporate => self.purchases_by_corporate += 1,
            OwnerType::Individual => self.purchases_by_individual += 1,
            // Not a buyer; resolve_buyer never yields it.
            OwnerType::Unowned => {}
        }
    }

    pub fn total_purchases(&self) -> u32 {
        self.purchases_by_homeowner + self.purchases_by_corporate + self.purchases_by_individual
    }

    /// Activity between `earlier` and `self`.
    pub fn since(&self, earlier: &MarketResults) -> MarketResults {
        MarketResults {
            purchases_by_homeowner: self.purchases_by_homeowner - earlier.purchases_by_homeowner,
            purchases_by_corporate: self.purchases_by_corporate - earlier.purchases_by_corporate,
            purchases_by_individual: self.purchases_by_individual
                - earlier.purchases_by_individual,
            converted_to_short_term: self.converted_to_short_term
                - earlier.converted_to_short_term,
        }
    }

    /// True when no counter is lower than in `earlier`.
    pub fn dominates(&self, earlier: &MarketResults) -> bool {
        self.purchases_by_homeowner >= earlier.purchases_by_homeowner
            && self.purchases_by_corporate >= earlier.purchases_by_corporate
            && self.purchases_by_individual >= earlier.purchases_by_individual
            && self.converted_to_short_term >= earlier.converted_to_short_term
    }
}

/// Counts captured at initialize, used for percent-change reporting.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode,
)]
pub struct Baseline {
    pub owner_occupied: u32,
    pub individual_landlords: u32,
    pub corporate_landlords: u32,
    pub available_rentals: u32,
}

impl Baseline {
    pub fn capture(stock: &HousingStock) -> Self {
        let counts = stock.owner_counts();
        Self {
            owner_occupied: counts.homeowner,
            individual_landlords: counts.individual,
            corporate_landlords: counts.corporate,
            available_rentals: stock.count_available_rentals() as u32,
        }
    }
}
