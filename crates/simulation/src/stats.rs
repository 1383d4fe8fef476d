use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::{HousingMarket, MarketResults};
use crate::housing::{HousingStock, OwnerCounts, OwnerType};

/// Read-only snapshot of the market, refreshed after every tick.
#[derive(Resource, Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStats {
    pub year: u32,
    pub counts: OwnerCounts,
    pub median_price: f64,
    /// `None` when every unit is owner-occupied.
    pub median_rent: Option<f64>,
    pub available_rentals: u32,
    pub total_units: u32,
    pub short_term_rentals: u32,
    pub results: MarketResults,
    pub owner_occupied_change_pct: f64,
    pub individual_landlords_change_pct: f64,
    pub corporate_landlords_change_pct: f64,
    pub available_rentals_change_pct: f64,
    pub demand_factor: f64,
}

impl MarketStats {
    /// Derive the snapshot from the current market state.
    pub fn from_market(market: &HousingMarket) -> Self {
        let stock = market.stock();
        let counts = stock.owner_counts();
        let baseline = market.baseline();
        let available_rentals = stock.count_available_rentals() as u32;

        Self {
            year: market.year(),
            counts,
            median_price: median_price(stock),
            median_rent: median_rent(stock),
            available_rentals,
            total_units: stock.len() as u32,
            short_term_rentals: stock.count_short_term() as u32,
            results: *market.results(),
            owner_occupied_change_pct: percent_change(counts.homeowner, baseline.owner_occupied),
            individual_landlords_change_pct: percent_change(
                counts.individual,
                baseline.individual_landlords,
            ),
            corporate_landlords_change_pct: percent_change(
                counts.corporate,
                baseline.corporate_landlords,
            ),
            available_rentals_change_pct: percent_change(
                available_rentals,
                baseline.available_rentals,
            ),
            demand_factor: market.demand_factor(),
        }
    }

    /// Multi-line summary in the same shape as the dashboard panels.
    pub fn summary(&self) -> String {
        let rent = self
            .median_rent
            .map(format_rent)
            .unwrap_or_else(|| "N/A".to_string());
        format!(
            "Year {}\n\
             Owner-occupied:        {:>4} ({})\n\
             Individual landlords:  {:>4} ({})\n\
             Corporate landlords:   {:>4} ({})\n\
             Available rentals:     {:>4} ({})\n\
             Short-term rentals:    {:>4}\n\
             Total units:           {:>4}\n\
             Median price:          {}\n\
             Median rent:           {}\n\
             Purchases: homeowners {}, individuals {}, corporations {}\n\
             Converted to short-term: {}",
            self.year,
            self.counts.homeowner,
            format_percent_change(self.owner_occupied_change_pct),
            self.counts.individual,
            format_percent_change(self.individual_landlords_change_pct),
            self.counts.corporate,
            format_percent_change(self.corporate_landlords_change_pct),
            self.available_rentals,
            format_percent_change(self.available_rentals_change_pct),
            self.short_term_rentals,
            self.total_units,
            format_price_k(self.median_price),
            rent,
            self.results.purchases_by_homeowner,
            self.results.purchases_by_individual,
            self.results.purchases_by_corporate,
            self.results.converted_to_short_term,
        )
    }
}

// ---------------------------------------------------------------------------
// Derivations
// ---------------------------------------------------------------------------

/// Middle value after sorting; the mean of the two middle values for an even
/// count. Returns 0.0 for an empty slice.
pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

pub fn median_price(stock: &HousingStock) -> f64 {
    let mut prices: Vec<f64> = stock.iter().map(|u| u.price).collect();
    median(&mut prices)
}

/// Median rent over landlord-held units.
pub fn median_rent(stock: &HousingStock) -> Option<f64> {
    let mut rents: Vec<f64> = stock
        .iter()
        .filter(|u| u.owner != OwnerType::Homeowner)
        .map(|u| u.rent)
        .collect();
    if rents.is_empty() {
        return None;
    }
    Some(median(&mut rents))
}

/// Change from `baseline` in percent; 0 when the baseline is zero.
pub fn percent_change(current: u32, baseline: u32) -> f64 {
    if baseline == 0 {
        return 0.0;
    }
    (f64::from(current) - f64::from(baseline)) / f64::from(baseline) * 100.0
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// `+1.2%` / `-3.4%`, explicit sign for non-negative values. Exact halves
/// round away from zero.
pub fn format_percent_change(pct: f64) -> String {
    let sign = if pct >= 0.0 { "+" } else { "-" };
    format!("{sign}{}%", one_decimal(pct.abs()))
}

/// One decimal place, ties rounded up. `{:.1}` alone rounds ties to even.
fn one_decimal(value: f64) -> String {
    // The only binary floats sitting exactly halfway between two tenths are
    // odd multiples of 0.25.
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        let tenths = (value * 10.0).ceil() as u64;
        return format!("{}.{}", tenths / 10, tenths % 10);
    }
    format!("{value:.1}")
}

/// Rounded to thousands: `$412k`.
pub fn format_price_k(price: f64) -> String {
    format!("${}k", (price / 1000.0).round() as i64)
}

/// Whole dollars with thousands separators: `$1,234`.
pub fn format_rent(rent: f64) -> String {
    let whole = rent.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

pub fn update_market_stats(market: Res<HousingMarket>, mut stats: ResMut<MarketStats>) {
    if market.is_changed() {
        *stats = MarketStats::from_market(&market);
    }
}
