//! Budget plan persistence via `/v1/budget-plans`.
//!
//! Plans are replaced wholesale: there is no per-entry update. `save`
//! upserts, leaving the insert-vs-update decision to the backend.

use crate::config;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{BudgetEntry, BudgetPlan, BudgetPlanCreate, Envelope, Vendor};

// ---------------------------------------------------------------------------
// BudgetPlanQuery
// ---------------------------------------------------------------------------

/// Query interface for stored budget plans.
pub struct BudgetPlanQuery<'a> {
    conn: &'a Connection,
}

impl<'a> BudgetPlanQuery<'a> {
    /// Create a new `BudgetPlanQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// All plans the current user has for `vendor`.
    pub fn list(&self, vendor: Vendor) -> Result<Vec<BudgetPlan>> {
        let resp: Envelope<Vec<BudgetPlan>> = self
            .conn
            .get_json(config::BUDGET_PLANS_PATH, &[("vendor", vendor.as_str())])?;
        Ok(resp.into_inner())
    }

    /// The first plan returned for `vendor`, if any.
    ///
    /// Additional plans are ignored; callers that care can use [`list`](Self::list).
    pub fn first(&self, vendor: Vendor) -> Result<Option<BudgetPlan>> {
        let mut plans = self.list(vendor)?;
        if plans.len() > 1 {
            tracing::warn!(
                vendor = %vendor,
                count = plans.len(),
                "multiple budget plans returned; using the first"
            );
        }
        Ok(if plans.is_empty() {
            None
        } else {
            Some(plans.swap_remove(0))
        })
    }

    /// Create or replace the plan for `vendor` with `budgets`.
    pub fn save(&self, vendor: Vendor, budgets: &[BudgetEntry]) -> Result<BudgetPlan> {
        let body = BudgetPlanCreate {
            vendor,
            budgets: budgets.to_vec(),
        };
        let resp: Envelope<BudgetPlan> = self.conn.post_json(config::BUDGET_PLANS_PATH, &body)?;
        Ok(resp.into_inner())
    }

    /// Replace the budgets of an existing plan by id. The vendor must match.
    pub fn update(&self, id: i64, vendor: Vendor, budgets: &[BudgetEntry]) -> Result<BudgetPlan> {
        let body = BudgetPlanCreate {
            vendor,
            budgets: budgets.to_vec(),
        };
        let resp: Envelope<BudgetPlan> = self.conn.put_json(&config::budget_plan_path(id), &body)?;
        Ok(resp.into_inner())
    }

    /// Delete a plan by id.
    pub fn delete(&self, id: i64) -> Result<()> {
        self.conn.delete(&config::budget_plan_path(id))?;
        Ok(())
    }
}
