//! Text rendering of the housing stock.
//!
//! One glyph per unit in id order, wrapped into rows. Built on demand from
//! `&HousingStock`; nothing runs per tick.

use super::stock::HousingStock;
use super::types::{HousingUnit, OwnerType};

/// Glyph for a single unit.
///
/// Short-term rentals take priority over ownership, so a corporate Airbnb
/// shows as `S`.
pub fn unit_glyph(unit: &HousingUnit) -> char {
    if unit.is_short_term() {
        return 'S';
    }
    match unit.owner {
        OwnerType::Corporate => 'C',
        OwnerType::Individual => 'I',
        OwnerType::Homeowner => 'H',
        OwnerType::Unowned => '?',
    }
}

/// Render the stock as rows of `width` glyphs separated by newlines.
///
/// A `width` of zero is treated as one glyph per row.
pub fn render_stock_grid(stock: &HousingStock, width: usize) -> String {
    let width = width.max(1);
    let rows = stock.len().div_ceil(width);
    let mut out = String::with_capacity(stock.len() + rows);
    for (i, unit) in stock.iter().enumerate() {
        if i > 0 && i % width == 0 {
            out.push('\n');
        }
        out.push(unit_glyph(unit));
    }
    out
}
