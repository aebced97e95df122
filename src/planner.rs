//! Budget planning session for one vendor.
//!
//! [`BudgetPlanner`] owns all mutable planning state: the loaded metrics and
//! forecast, the chosen growth rate, and the pending budget edits. It moves
//! through [`PlanStatus`]:
//!
//! ```text
//! Unloaded -> Loading -> Loaded | Error
//! Loaded   -> Saving  -> Loaded | Error
//! ```
//!
//! Failures never roll back in-memory edits, so a failed save can be retried
//! as-is.

use std::sync::Arc;

use crate::backend::{CostBackend, VendorSnapshot};
use crate::editor::BudgetEditor;
use crate::error::{ApiErrorInfo, CostPlanError, Result};
use crate::events::{EventSink, NoopSink, TrackingEvent};
use crate::feed::{FeedUpdate, Subscription, VendorFeed};
use crate::models::{latest_cost, BudgetEntry, BudgetPlan, ForecastData, MonthlyMetric, Vendor};
use crate::month::Month;
use crate::simulation::{self, GrowthRate, HistoricalGrowth, Projection};

pub const SAVED_MESSAGE: &str = "Budget plan saved successfully";

const EVENT_CATEGORY: &str = "budget_plan";

#[derive(Debug, Clone, PartialEq)]
pub enum PlanStatus {
    Unloaded,
    Loading,
    Loaded,
    Saving,
    Error(ApiErrorInfo),
}

pub struct BudgetPlanner {
    vendor: Vendor,
    status: PlanStatus,
    metrics: Vec<MonthlyMetric>,
    forecast: Option<ForecastData>,
    plan: Option<BudgetPlan>,
    growth: GrowthRate,
    editor: BudgetEditor,
    notice: Option<String>,
    applied_generation: Option<u64>,
    subscription: Option<Subscription<FeedUpdate>>,
    sink: Arc<dyn EventSink>,
}

impl BudgetPlanner {
    pub fn new(vendor: Vendor) -> Self {
        Self::with_sink(vendor, Arc::new(NoopSink))
    }

    pub fn with_sink(vendor: Vendor, sink: Arc<dyn EventSink>) -> Self {
        Self {
            vendor,
            status: PlanStatus::Unloaded,
            metrics: Vec::new(),
            forecast: None,
            plan: None,
            growth: GrowthRate::default(),
            editor: BudgetEditor::new(),
            notice: None,
            applied_generation: None,
            subscription: None,
            sink,
        }
    }

    // -- Accessors ----------------------------------------------------------

    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    pub fn status(&self) -> &PlanStatus {
        &self.status
    }

    pub fn error(&self) -> Option<&ApiErrorInfo> {
        match &self.status {
            PlanStatus::Error(info) => Some(info),
            _ => None,
        }
    }

    /// Message from the last successful save, cleared by the next failure.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn metrics(&self) -> &[MonthlyMetric] {
        &self.metrics
    }

    pub fn forecast(&self) -> Option<&ForecastData> {
        self.forecast.as_ref()
    }

    /// The plan this session was loaded from or last saved as.
    pub fn plan(&self) -> Option<&BudgetPlan> {
        self.plan.as_ref()
    }

    pub fn growth_rate(&self) -> GrowthRate {
        self.growth
    }

    pub fn budgets(&self) -> &[BudgetEntry] {
        self.editor.entries()
    }

    pub fn editor(&self) -> &BudgetEditor {
        &self.editor
    }

    pub fn historical_growth(&self) -> Vec<HistoricalGrowth> {
        simulation::historical_growth(&self.metrics)
    }

    // -- Loading ------------------------------------------------------------

    /// Fetch metrics, forecast and the stored plan from `backend`.
    pub fn load<B: CostBackend + ?Sized>(&mut self, backend: &B) -> Result<()> {
        self.begin_loading();
        match VendorSnapshot::fetch(backend, self.vendor) {
            Ok(snapshot) => {
                self.apply_snapshot(snapshot);
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    fn begin_loading(&mut self) {
        self.status = PlanStatus::Loading;
        self.sink.emit(TrackingEvent::page_view(
            format!("/admin/vendors/{}", self.vendor),
            format!("{} Details", self.vendor.display_name()),
        ));
    }

    fn apply_snapshot(&mut self, snapshot: VendorSnapshot) {
        let VendorSnapshot {
            metrics,
            forecast,
            plans,
            ..
        } = snapshot;

        self.metrics = metrics;
        self.growth = GrowthRate::trend(forecast.growth_rates.trend_based);
        self.forecast = Some(forecast);

        if plans.len() > 1 {
            tracing::warn!(
                vendor = %self.vendor,
                count = plans.len(),
                "multiple budget plans for vendor; only the first is used"
            );
        }
        if let Some(plan) = plans.into_iter().next() {
            self.editor = BudgetEditor::from_entries(plan.budgets.clone());
            self.plan = Some(plan);
        }

        self.status = PlanStatus::Loaded;
        tracing::info!(
            vendor = %self.vendor,
            months = self.editor.len(),
            "budget plan loaded"
        );
    }

    fn fail(&mut self, e: &CostPlanError) {
        let info = e.info();
        tracing::warn!(vendor = %self.vendor, error = %info, "budget plan operation failed");
        self.notice = None;
        self.status = PlanStatus::Error(info);
    }

    // -- Feed subscription --------------------------------------------------

    /// Subscribe to `feed`. Replaces any previous subscription; detach from
    /// the old feed first to release it there.
    ///
    /// Generations are per feed, so the stale-update watermark starts over.
    pub fn attach<B: CostBackend>(&mut self, feed: &mut VendorFeed<B>) {
        self.subscription = Some(feed.subscribe());
        self.applied_generation = None;
    }

    /// Unsubscribe from `feed`. Returns whether a subscription was released.
    pub fn detach<B: CostBackend>(&mut self, feed: &mut VendorFeed<B>) -> bool {
        match self.subscription.take() {
            Some(sub) => feed.unsubscribe(sub),
            None => false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Ask `feed` for this vendor's data and apply whatever has arrived.
    pub fn request<B: CostBackend>(&mut self, feed: &mut VendorFeed<B>) -> u64 {
        self.begin_loading();
        let generation = feed.request(self.vendor);
        self.poll();
        generation
    }

    /// Apply all pending feed updates. Returns how many were applied.
    pub fn poll(&mut self) -> usize {
        let updates = match &self.subscription {
            Some(sub) => sub.drain(),
            None => return 0,
        };
        let mut applied = 0;
        for update in updates {
            if self.receive(update) {
                applied += 1;
            }
        }
        applied
    }

    /// Apply one feed update unless it is stale.
    ///
    /// Updates for another vendor, or older than the newest update already
    /// applied, are dropped. The newest request wins regardless of the order
    /// responses arrive in.
    pub fn receive(&mut self, update: FeedUpdate) -> bool {
        if update.vendor != self.vendor {
            tracing::debug!(
                expected = %self.vendor,
                got = %update.vendor,
                generation = update.generation,
                "dropping feed update for another vendor"
            );
            return false;
        }
        if let Some(applied) = self.applied_generation {
            if update.generation <= applied {
                tracing::warn!(
                    vendor = %self.vendor,
                    generation = update.generation,
                    applied,
                    "dropping stale feed update"
                );
                return false;
            }
        }
        self.applied_generation = Some(update.generation);

        match update.snapshot {
            Ok(snapshot) => self.apply_snapshot(snapshot),
            Err(info) => {
                tracing::warn!(vendor = %self.vendor, error = %info, "feed request failed");
                self.notice = None;
                self.status = PlanStatus::Error(info);
            }
        }
        true
    }

    /// Point the session at another vendor, discarding all vendor-scoped state.
    ///
    /// The feed subscription and event sink are kept.
    pub fn switch_vendor(&mut self, vendor: Vendor) {
        if vendor == self.vendor {
            return;
        }
        tracing::info!(from = %self.vendor, to = %vendor, "switching vendor");
        self.vendor = vendor;
        self.status = PlanStatus::Unloaded;
        self.metrics.clear();
        self.forecast = None;
        self.plan = None;
        self.growth = GrowthRate::default();
        self.editor = BudgetEditor::new();
        self.notice = None;
    }

    // -- Simulation ---------------------------------------------------------

    /// Choose the simulated growth rate (clamped to 0-100 percent).
    pub fn set_growth_rate(&mut self, percent: f64) -> GrowthRate {
        self.growth = GrowthRate::new(percent);
        self.growth
    }

    /// Forecast rows with the simulated cost for the current growth rate.
    pub fn projection(&self) -> Result<Projection> {
        let forecast = self.loaded_forecast()?;
        simulation::project(forecast, latest_cost(&self.metrics), self.growth)
    }

    /// Replace all budgets with the simulated trajectory.
    pub fn apply_forecast(&mut self) -> Result<()> {
        let base = latest_cost(&self.metrics);
        let forecast = self
            .forecast
            .as_ref()
            .ok_or_else(|| CostPlanError::SimulationUnavailable("forecast not loaded".into()))?;
        self.editor.apply_forecast(forecast, self.growth, base)?;
        self.sink.emit(TrackingEvent::custom(
            EVENT_CATEGORY,
            "apply_forecast",
            Some(self.vendor.to_string()),
            Some(self.growth.percent()),
        ));
        Ok(())
    }

    fn loaded_forecast(&self) -> Result<&ForecastData> {
        self.forecast
            .as_ref()
            .ok_or_else(|| CostPlanError::SimulationUnavailable("forecast not loaded".into()))
    }

    // -- Budget edits -------------------------------------------------------

    pub fn set_amount(&mut self, month: Month, amount: f64) -> Result<bool> {
        self.editor.set_amount(month, amount)
    }

    /// Append the month after the last budget, relative to today's month when empty.
    pub fn add_next_month(&mut self) -> Result<Month> {
        self.add_next_month_from(Month::current())
    }

    /// Like [`add_next_month`](Self::add_next_month) with an explicit current month.
    pub fn add_next_month_from(&mut self, today: Month) -> Result<Month> {
        let default_amount = self.forecast.as_ref().and_then(ForecastData::last_cost);
        let month = self.editor.add_next_month(today, default_amount)?;
        self.sink.emit(TrackingEvent::custom(
            EVENT_CATEGORY,
            "add_month",
            Some(month.to_string()),
            None,
        ));
        Ok(month)
    }

    pub fn remove_month(&mut self, month: Month) -> bool {
        let removed = self.editor.remove_month(month);
        if removed {
            self.sink.emit(TrackingEvent::custom(
                EVENT_CATEGORY,
                "remove_month",
                Some(month.to_string()),
                None,
            ));
        }
        removed
    }

    // -- Saving -------------------------------------------------------------

    /// Persist the full budget list through `backend`.
    ///
    /// Allowed once data has loaded, and again after any failure. On success
    /// the server's copy becomes the working set.
    pub fn save<B: CostBackend + ?Sized>(&mut self, backend: &B) -> Result<()> {
        match self.status {
            PlanStatus::Loaded | PlanStatus::Error(_) => {}
            PlanStatus::Unloaded | PlanStatus::Loading | PlanStatus::Saving => {
                return Err(CostPlanError::InvalidState(format!(
                    "cannot save while {:?}",
                    self.status
                )));
            }
        }

        self.status = PlanStatus::Saving;
        match backend.save_budget_plan(self.vendor, self.editor.entries()) {
            Ok(plan) => {
                self.editor = BudgetEditor::from_entries(plan.budgets.clone());
                self.plan = Some(plan);
                self.status = PlanStatus::Loaded;
                self.notice = Some(SAVED_MESSAGE.to_string());
                self.sink.emit(TrackingEvent::custom(
                    EVENT_CATEGORY,
                    "save",
                    Some(self.vendor.to_string()),
                    Some(self.editor.total()),
                ));
                tracing::info!(
                    vendor = %self.vendor,
                    months = self.editor.len(),
                    "budget plan saved"
                );
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }
}
