use crate::month::Month;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MonthlyMetric: one month of historical actual cost
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMetric {
    pub month: Month,
    pub cost: f64,
}

// ---------------------------------------------------------------------------
// MetricsResponse: GET /v1/vendors-metrics/{vendor}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsResponse {
    #[serde(default)]
    pub data: Vec<MonthlyMetric>,
}

/// The most recent historical cost, the base of every simulation.
pub fn latest_cost(metrics: &[MonthlyMetric]) -> Option<f64> {
    metrics.iter().max_by_key(|m| m.month).map(|m| m.cost)
}
