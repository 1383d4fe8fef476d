//! Year-advance housing market engine.
//!
//! [`HousingMarket`] owns the stock, the cumulative counters and the single
//! random stream. Each [`HousingMarket::advance_year`] call runs, in order:
//!
//! ```text
//! demand drift → appreciation → divestment → resales → construction
//!   → short-term ban → vacancy conversion → construction feedback → year + 1
//! ```

mod buyer;
mod error;
mod phases;
mod results;
mod state;

pub use buyer::resolve_buyer;
pub use error::SimulationError;
pub use results::{Baseline, MarketResults};
pub use state::{Divestment, HousingMarket, YearReport};
