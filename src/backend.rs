//! The seam between the budget planner and whatever serves vendor data.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{BudgetEntry, BudgetPlan, ForecastData, MonthlyMetric, Vendor};

/// Operations the planner needs from the cost backend.
///
/// [`CostPlanSdk`](crate::CostPlanSdk) implements this over HTTP.
pub trait CostBackend {
    fn fetch_metrics(&self, vendor: Vendor) -> Result<Vec<MonthlyMetric>>;

    fn fetch_forecast(&self, vendor: Vendor) -> Result<ForecastData>;

    fn fetch_budget_plans(&self, vendor: Vendor) -> Result<Vec<BudgetPlan>>;

    /// Create or replace the vendor's plan with `budgets`.
    fn save_budget_plan(&self, vendor: Vendor, budgets: &[BudgetEntry]) -> Result<BudgetPlan>;
}

impl<T: CostBackend + ?Sized> CostBackend for &T {
    fn fetch_metrics(&self, vendor: Vendor) -> Result<Vec<MonthlyMetric>> {
        (**self).fetch_metrics(vendor)
    }

    fn fetch_forecast(&self, vendor: Vendor) -> Result<ForecastData> {
        (**self).fetch_forecast(vendor)
    }

    fn fetch_budget_plans(&self, vendor: Vendor) -> Result<Vec<BudgetPlan>> {
        (**self).fetch_budget_plans(vendor)
    }

    fn save_budget_plan(&self, vendor: Vendor, budgets: &[BudgetEntry]) -> Result<BudgetPlan> {
        (**self).save_budget_plan(vendor, budgets)
    }
}

impl<T: CostBackend + ?Sized> CostBackend for Arc<T> {
    fn fetch_metrics(&self, vendor: Vendor) -> Result<Vec<MonthlyMetric>> {
        (**self).fetch_metrics(vendor)
    }

    fn fetch_forecast(&self, vendor: Vendor) -> Result<ForecastData> {
        (**self).fetch_forecast(vendor)
    }

    fn fetch_budget_plans(&self, vendor: Vendor) -> Result<Vec<BudgetPlan>> {
        (**self).fetch_budget_plans(vendor)
    }

    fn save_budget_plan(&self, vendor: Vendor, budgets: &[BudgetEntry]) -> Result<BudgetPlan> {
        (**self).save_budget_plan(vendor, budgets)
    }
}

// ---------------------------------------------------------------------------
// VendorSnapshot
// ---------------------------------------------------------------------------

/// Everything the planner loads for one vendor.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorSnapshot {
    pub vendor: Vendor,
    pub metrics: Vec<MonthlyMetric>,
    pub forecast: ForecastData,
    pub plans: Vec<BudgetPlan>,
}

impl VendorSnapshot {
    /// Fetch metrics, forecast and plans. Fails on the first error.
    pub fn fetch<B: CostBackend + ?Sized>(backend: &B, vendor: Vendor) -> Result<Self> {
        let metrics = backend.fetch_metrics(vendor)?;
        let forecast = backend.fetch_forecast(vendor)?;
        let plans = backend.fetch_budget_plans(vendor)?;
        Ok(Self {
            vendor,
            metrics,
            forecast,
            plans,
        })
    }
}
