use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::RENT_TO_PRICE;

// =============================================================================
// Owner / usage
// =============================================================================

/// Who holds a housing unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum OwnerType {
    Corporate,
    Individual,
    Homeowner,
    /// Only held between construction and first sale inside a single year.
    Unowned,
}

impl OwnerType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Corporate => "Corporate",
            Self::Individual => "Individual",
            Self::Homeowner => "Homeowner",
            Self::Unowned => "Unowned",
        }
    }

    /// Landlords rent the unit out; homeowners live in it.
    pub fn is_landlord(self) -> bool {
        matches!(self, Self::Corporate | Self::Individual)
    }

    pub fn is_owner_occupied(self) -> bool {
        self == Self::Homeowner
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum Usage {
    LongTermRental,
    ShortTermRental,
}

impl Usage {
    pub fn name(self) -> &'static str {
        match self {
            Self::LongTermRental => "Long-Term Rental",
            Self::ShortTermRental => "Short-Term Rental",
        }
    }
}

// =============================================================================
// HousingUnit
// =============================================================================

/// A single dwelling in the stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct HousingUnit {
    /// Sequential, construction order.
    pub id: u32,
    pub owner: OwnerType,
    pub usage: Usage,
    pub price: f64,
    /// Monthly rent. Follows price while the unit is rented out, frozen while
    /// it is owner-occupied.
    pub rent: f64,
}

impl HousingUnit {
    pub fn new(id: u32, owner: OwnerType, usage: Usage, price: f64) -> Self {
        Self {
            id,
            owner,
            usage,
            price,
            rent: price * RENT_TO_PRICE,
        }
    }

    /// Rented out long-term, i.e. counted as an available apartment.
    pub fn is_available_rental(&self) -> bool {
        self.owner != OwnerType::Homeowner && self.usage == Usage::LongTermRental
    }

    pub fn is_short_term(&self) -> bool {
        self.usage == Usage::ShortTermRental
    }

    /// Scale price, and rent unless owner-occupied, by `factor`.
    pub fn appreciate(&mut self, factor: f64) {
        self.price *= factor;
        if self.owner != OwnerType::Homeowner {
            self.rent *= factor;
        }
    }
}
