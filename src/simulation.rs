//! Month-over-month growth simulation over a server forecast.
//!
//! Given the most recent actual cost `C0` and a growth rate `g` (percent),
//! the simulated cost of forecast month `i` is
//!
//! ```text
//! simulated(0) = C0 * (1 + g/100)
//! simulated(i) = simulated(i - 1) * (1 + g/100)
//! ```
//!
//! When `g` is exactly the server's trend-based rate, the server's own
//! `cost` is used instead of re-deriving it.

use crate::config;
use crate::error::{CostPlanError, Result};
use crate::models::{BudgetEntry, ForecastData, MonthlyMetric};
use crate::month::Month;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GrowthRate
// ---------------------------------------------------------------------------

/// A month-over-month growth percentage clamped into `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrowthRate(f64);

impl GrowthRate {
    /// Clamp `percent` into range. NaN becomes 0.
    pub fn new(percent: f64) -> Self {
        if percent.is_nan() {
            return GrowthRate(config::MIN_GROWTH_RATE);
        }
        GrowthRate(percent.clamp(config::MIN_GROWTH_RATE, config::MAX_GROWTH_RATE))
    }

    /// The server's trend rate as sent, without clamping.
    ///
    /// A shrinking vendor has a negative trend; clamping it would make the
    /// trend shortcut in [`project`] unreachable. NaN falls back to the default.
    pub fn trend(percent: f64) -> Self {
        if percent.is_finite() {
            GrowthRate(percent)
        } else {
            GrowthRate::default()
        }
    }

    pub fn percent(&self) -> f64 {
        self.0
    }

    /// Per-month multiplier, `1 + g/100`.
    pub fn factor(&self) -> f64 {
        1.0 + (self.0 / 100.0)
    }

    /// True if this rate is exactly the server trend rate.
    pub fn is_trend(&self, trend_based: f64) -> bool {
        self.0 == trend_based
    }
}

impl Default for GrowthRate {
    fn default() -> Self {
        GrowthRate(config::DEFAULT_GROWTH_RATE)
    }
}

impl From<f64> for GrowthRate {
    fn from(percent: f64) -> Self {
        GrowthRate::new(percent)
    }
}

// ---------------------------------------------------------------------------
// Recurrence
// ---------------------------------------------------------------------------

/// Simulated cost of forecast month `index`, evaluated by direct recursion.
///
/// Re-derives the whole chain on every call; use [`trajectory`] for a
/// whole forecast.
pub fn simulated_cost(base: f64, rate: GrowthRate, index: usize) -> f64 {
    if index == 0 {
        return base * rate.factor();
    }
    simulated_cost(base, rate, index - 1) * rate.factor()
}

/// Simulated costs for `months` forecast months.
///
/// Same multiplication order as [`simulated_cost`], so results are
/// bit-identical to the recursive form.
pub fn trajectory(base: f64, rate: GrowthRate, months: usize) -> Vec<f64> {
    let factor = rate.factor();
    let mut out = Vec::with_capacity(months);
    let mut cost = base;
    for _ in 0..months {
        cost *= factor;
        out.push(cost);
    }
    out
}

/// Closed form `base * (1 + g/100)^(index + 1)`.
pub fn closed_form(base: f64, rate: GrowthRate, index: usize) -> f64 {
    let exp = i32::try_from(index).unwrap_or(i32::MAX).saturating_add(1);
    base * rate.factor().powi(exp)
}

fn require_base(base: Option<f64>) -> Result<f64> {
    match base {
        Some(cost) if cost.is_finite() => Ok(cost),
        Some(cost) => Err(CostPlanError::SimulationUnavailable(format!(
            "base cost {} is not a finite number",
            cost
        ))),
        None => Err(CostPlanError::SimulationUnavailable(
            "no historical cost to simulate from".to_string(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// One forecast month alongside the user's simulated cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub month: Month,
    pub best_case: f64,
    pub forecast: f64,
    pub worst_case: f64,
    pub simulated: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub growth_rate: GrowthRate,
    /// True when the server trend values were used verbatim.
    pub uses_trend: bool,
    pub rows: Vec<ProjectionRow>,
    pub total_simulated: f64,
}

impl Projection {
    /// The simulated trajectory as budget entries, one per forecast month.
    pub fn to_budgets(&self) -> Vec<BudgetEntry> {
        self.rows
            .iter()
            .map(|r| BudgetEntry::new(r.month, r.simulated))
            .collect()
    }
}

/// Project `rate` over the forecast months in `data`.
///
/// `base` is the most recent actual cost. It is only needed when `rate`
/// differs from the trend rate; if it is then missing, the simulation is
/// reported as unavailable rather than producing NaN.
pub fn project(data: &ForecastData, base: Option<f64>, rate: GrowthRate) -> Result<Projection> {
    let uses_trend = rate.is_trend(data.growth_rates.trend_based);

    let simulated: Vec<f64> = if uses_trend {
        data.forecast.iter().map(|f| f.cost).collect()
    } else if data.forecast.is_empty() {
        Vec::new()
    } else {
        trajectory(require_base(base)?, rate, data.forecast.len())
    };

    let rows: Vec<ProjectionRow> = data
        .forecast
        .iter()
        .zip(simulated)
        .map(|(f, simulated)| ProjectionRow {
            month: f.month,
            best_case: f.best_case,
            forecast: f.cost,
            worst_case: f.worst_case,
            simulated,
        })
        .collect();

    let total_simulated = rows.iter().map(|r| r.simulated).sum();

    Ok(Projection {
        growth_rate: rate,
        uses_trend,
        rows,
        total_simulated,
    })
}

// ---------------------------------------------------------------------------
// Historical growth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalGrowth {
    pub month: Month,
    pub cost: f64,
    /// Percent change from the previous month. `Some(0.0)` for the first
    /// month, `None` when the previous month cost nothing.
    pub growth: Option<f64>,
}

/// Month-over-month growth of each historical month relative to the one before.
pub fn historical_growth(metrics: &[MonthlyMetric]) -> Vec<HistoricalGrowth> {
    metrics
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let growth = match i.checked_sub(1).map(|p| &metrics[p]) {
                None => Some(0.0),
                Some(prev) if prev.cost == 0.0 => None,
                Some(prev) => Some((m.cost - prev.cost) / prev.cost * 100.0),
            };
            HistoricalGrowth {
                month: m.month,
                cost: m.cost,
                growth,
            }
        })
        .collect()
}
