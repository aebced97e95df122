use crate::month::Month;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ForecastEntry: one future month across three scenarios
// ---------------------------------------------------------------------------

/// Server forecast for one month. Expected to satisfy
/// `best_case <= cost <= worst_case`; not checked client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub month: Month,
    pub cost: f64,
    pub best_case: f64,
    pub worst_case: f64,
}

// ---------------------------------------------------------------------------
// ForecastSums / GrowthRates: server-derived summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSums {
    pub total_best_case: f64,
    pub total_forecast: f64,
    pub total_worst_case: f64,
}

/// Month-over-month growth percentages per scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthRates {
    pub best_case: f64,
    pub trend_based: f64,
    pub worst_case: f64,
}

// ---------------------------------------------------------------------------
// ForecastData: GET /v1/vendors-forecast/{vendor}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastData {
    #[serde(default)]
    pub forecast: Vec<ForecastEntry>,
    #[serde(default)]
    pub sums: ForecastSums,
    #[serde(default)]
    pub growth_rates: GrowthRates,
}

impl ForecastData {
    /// Trend cost of the final forecast month, if any.
    pub fn last_cost(&self) -> Option<f64> {
        self.forecast.last().map(|f| f.cost)
    }

    pub fn months(&self) -> impl Iterator<Item = Month> + '_ {
        self.forecast.iter().map(|f| f.month)
    }
}
