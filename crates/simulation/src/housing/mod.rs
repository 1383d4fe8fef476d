mod grid_view;
mod stock;
mod tests;
mod types;

pub use grid_view::{render_stock_grid, unit_glyph};
pub use stock::{HousingStock, OwnerCounts};
pub use types::{HousingUnit, OwnerType, Usage};
