//! Builder methods for configuring the market before a test runs.

use std::time::Duration;

use crate::market_config::MarketConfig;
use crate::policies::{CorporatePolicy, StrPolicy, VacancyModel};
use crate::runner::YearRunner;

use super::TestMarket;

impl TestMarket {
    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: MarketConfig) -> Self {
        self.app.world_mut().insert_resource(config);
        self
    }

    /// Set both policy levers.
    pub fn with_policies(mut self, corporate: CorporatePolicy, str_policy: StrPolicy) -> Self {
        {
            let mut config = self.app.world_mut().resource_mut::<MarketConfig>();
            config.corporate_policy = corporate;
            config.str_policy = str_policy;
        }
        self
    }

    pub fn with_turnover_rate(mut self, pct: f64) -> Self {
        self.app.world_mut().resource_mut::<MarketConfig>().turnover_rate_pct = pct;
        self
    }

    pub fn with_new_homes(mut self, homes: u32) -> Self {
        self.app.world_mut().resource_mut::<MarketConfig>().new_homes_per_year = homes;
        self
    }

    pub fn with_vacancy_model(mut self, model: VacancyModel) -> Self {
        self.app.world_mut().resource_mut::<MarketConfig>().vacancy_model = model;
        self
    }

    /// Set the delay between years of a multi-year run. `Duration::ZERO`
    /// advances one year per fixed tick.
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.app.world_mut().resource_mut::<YearRunner>().set_pace(pace);
        self
    }
}
