//! Editable, ordered collection of monthly budget entries.
//!
//! Entries are keyed by [`Month`] and kept in insertion order, which is the
//! display order. After manual edits that order need not be chronological;
//! use [`BudgetEditor::chronological`] when it matters.

use crate::error::{CostPlanError, Result};
use crate::models::{BudgetEntry, ForecastData};
use crate::month::Month;
use crate::simulation::{self, GrowthRate};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Round to 2 decimal places, halves away from zero.
pub fn round_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() {
        return Err(CostPlanError::InvalidArgument(format!(
            "budget amount must be a finite number, got {}",
            amount
        )));
    }
    let rounded = Decimal::from_f64(amount)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .ok_or_else(|| {
            CostPlanError::InvalidArgument(format!("budget amount {} is out of range", amount))
        })?;
    Ok(rounded)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetEditor {
    entries: Vec<BudgetEntry>,
}

impl BudgetEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap entries as they came from a stored plan, keeping their order.
    pub fn from_entries(entries: Vec<BudgetEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[BudgetEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<BudgetEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, month: Month) -> Option<&BudgetEntry> {
        self.entries.iter().find(|e| e.month == month)
    }

    pub fn contains(&self, month: Month) -> bool {
        self.get(month).is_some()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// Entries sorted by calendar month.
    pub fn chronological(&self) -> Vec<&BudgetEntry> {
        let mut sorted: Vec<&BudgetEntry> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.month);
        sorted
    }

    /// Replace the amount for `month`, rounded to cents.
    ///
    /// Returns `Ok(false)` and leaves the collection untouched if `month`
    /// is not budgeted, whatever `amount` is.
    pub fn set_amount(&mut self, month: Month, amount: f64) -> Result<bool> {
        let Some(entry) = self.entries.iter_mut().find(|e| e.month == month) else {
            return Ok(false);
        };
        entry.amount = round_amount(amount)?;
        Ok(true)
    }

    /// Append the month after the last entry (or after `today` when empty).
    ///
    /// The new entry defaults to `default_amount`, normally the last
    /// forecast cost, or 0 when there is none. Fails with
    /// [`CostPlanError::DuplicateMonth`] if that month is already present.
    pub fn add_next_month(&mut self, today: Month, default_amount: Option<f64>) -> Result<Month> {
        let from = self.entries.last().map_or(today, |last| last.month);
        let next = from
            .succ_opt()
            .ok_or_else(|| CostPlanError::InvalidMonth(format!("no month after {}", from)))?;
        if self.contains(next) {
            return Err(CostPlanError::DuplicateMonth(next.to_string()));
        }
        let amount = default_amount.filter(|a| a.is_finite()).unwrap_or(0.0);
        self.entries.push(BudgetEntry::new(next, amount));
        Ok(next)
    }

    /// Remove `month`. Returns whether anything was removed.
    pub fn remove_month(&mut self, month: Month) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.month != month);
        self.entries.len() != before
    }

    /// Overwrite every entry with the simulated trajectory for `rate`.
    ///
    /// Manually added or removed months are discarded. On error the
    /// collection is left unchanged.
    pub fn apply_forecast(
        &mut self,
        data: &ForecastData,
        rate: GrowthRate,
        base: Option<f64>,
    ) -> Result<()> {
        let projection = simulation::project(data, base, rate)?;
        self.entries = projection.to_budgets();
        Ok(())
    }
}
