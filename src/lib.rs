//! Cost planning SDK for Rust.
//!
//! Provides a typed client for a vendor cost backend (historical monthly
//! costs, three-scenario forecasts, stored budget plans and vendor
//! credentials) together with the client-side planning engine: a
//! month-over-month growth simulation over the forecast and an editable
//! list of monthly budgets that is saved back as a plan.
//!
//! # Quick start
//!
//! ```no_run
//! use costplan_sdk::{CostPlanSdk, Vendor};
//!
//! let sdk = CostPlanSdk::builder()
//!     .base_url("http://localhost:8000")
//!     .token("my-access-token")
//!     .build()
//!     .unwrap();
//!
//! // Historical costs
//! let metrics = sdk.metrics().get(Vendor::Aws).unwrap();
//!
//! // Plan a budget at 20% month-over-month growth and save it
//! let mut planner = sdk.planner(Vendor::Aws);
//! planner.load(&sdk).unwrap();
//! planner.set_growth_rate(20.0);
//! planner.apply_forecast().unwrap();
//! planner.save(&sdk).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod backend;
pub mod config;
pub mod connection;
pub mod editor;
pub mod error;
pub mod events;
pub mod feed;
pub mod models;
pub mod month;
pub mod planner;
pub mod queries;
pub mod simulation;

#[cfg(feature = "async")]
pub use async_client::AsyncCostPlanSdk;
pub use backend::{CostBackend, VendorSnapshot};
pub use connection::{Connection, StaticToken, TokenProvider};
pub use editor::BudgetEditor;
pub use error::{ApiErrorInfo, CostPlanError, Result};
pub use events::{EventSink, MemorySink, NoopSink, TracingSink, TrackingEvent};
pub use feed::{FeedUpdate, Subject, Subscription, VendorFeed};
pub use models::{
    BudgetEntry, BudgetPlan, ForecastData, ForecastEntry, MonthlyMetric, Vendor,
    VendorCredentials,
};
pub use month::Month;
pub use planner::{BudgetPlanner, PlanStatus};
pub use simulation::{GrowthRate, Projection};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// CostPlanSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CostPlanSdk`] instance.
///
/// Use [`CostPlanSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CostPlanSdkBuilder::build) to create the SDK.
pub struct CostPlanSdkBuilder {
    base_url: String,
    identifier: String,
    timeout: Duration,
    tokens: Option<Arc<dyn TokenProvider>>,
    sink: Arc<dyn EventSink>,
}

impl Default for CostPlanSdkBuilder {
    fn default() -> Self {
        Self {
            base_url: config::DEFAULT_BASE_URL.to_string(),
            identifier: config::DEFAULT_IDENTIFIER.to_string(),
            timeout: config::DEFAULT_TIMEOUT,
            tokens: None,
            sink: Arc::new(NoopSink),
        }
    }
}

impl CostPlanSdkBuilder {
    /// Start from the environment: `BACKEND_URL` for the base URL and
    /// `BACKEND_TOKEN` for a static bearer token, when set.
    pub fn from_env() -> Self {
        let mut builder = Self::default();
        if let Ok(url) = std::env::var(config::ENV_BASE_URL) {
            if !url.trim().is_empty() {
                builder = builder.base_url(url.trim());
            }
        }
        if let Ok(token) = std::env::var(config::ENV_TOKEN) {
            if !token.trim().is_empty() {
                builder = builder.token(token.trim());
            }
        }
        builder
    }

    /// Set the backend base URL. Defaults to `http://localhost:8000`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Use a fixed bearer token for every request.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.tokens = Some(Arc::new(StaticToken::new(token)));
        self
    }

    /// Obtain bearer tokens from `provider` before each request.
    pub fn token_provider<P: TokenProvider + 'static>(mut self, provider: P) -> Self {
        self.tokens = Some(Arc::new(provider));
        self
    }

    /// Credential configuration used for metrics and forecasts.
    ///
    /// Defaults to `"Default Configuration"`.
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sink that planners created by this SDK emit tracking events into.
    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Build the SDK. Fails if no token source was configured or the base
    /// URL is not an http(s) URL.
    pub fn build(self) -> Result<CostPlanSdk> {
        let tokens = self.tokens.ok_or_else(|| {
            CostPlanError::InvalidArgument(
                "no access token configured; call token() or token_provider()".into(),
            )
        })?;
        let conn = Connection::new(&self.base_url, &self.identifier, self.timeout, tokens)?;
        Ok(CostPlanSdk {
            conn,
            sink: self.sink,
        })
    }
}

// ---------------------------------------------------------------------------
// CostPlanSdk
// ---------------------------------------------------------------------------

/// The main entry point for the cost planning SDK.
///
/// Wraps a [`Connection`] and exposes endpoint-specific query interfaces as
/// lightweight borrowing wrappers.
///
/// Created via [`CostPlanSdk::builder()`].
pub struct CostPlanSdk {
    conn: Connection,
    sink: Arc<dyn EventSink>,
}

impl CostPlanSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> CostPlanSdkBuilder {
        CostPlanSdkBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access historical monthly costs.
    pub fn metrics(&self) -> queries::MetricsQuery<'_> {
        queries::MetricsQuery::new(&self.conn)
    }

    /// Access three-scenario forecasts, including CSV export.
    pub fn forecast(&self) -> queries::ForecastQuery<'_> {
        queries::ForecastQuery::new(&self.conn)
    }

    /// Access stored budget plans.
    pub fn budget_plans(&self) -> queries::BudgetPlanQuery<'_> {
        queries::BudgetPlanQuery::new(&self.conn)
    }

    /// Access vendor credential configurations.
    pub fn configurations(&self) -> queries::ConfigurationQuery<'_> {
        queries::ConfigurationQuery::new(&self.conn)
    }

    // -- Planning ----------------------------------------------------------

    /// Start an unloaded planning session for `vendor`.
    ///
    /// Call [`BudgetPlanner::load`] with this SDK to fetch its data.
    pub fn planner(&self, vendor: Vendor) -> BudgetPlanner {
        BudgetPlanner::with_sink(vendor, self.sink.clone())
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl CostBackend for CostPlanSdk {
    fn fetch_metrics(&self, vendor: Vendor) -> Result<Vec<MonthlyMetric>> {
        self.metrics().get(vendor)
    }

    fn fetch_forecast(&self, vendor: Vendor) -> Result<ForecastData> {
        self.forecast().get(vendor)
    }

    fn fetch_budget_plans(&self, vendor: Vendor) -> Result<Vec<BudgetPlan>> {
        self.budget_plans().list(vendor)
    }

    fn save_budget_plan(&self, vendor: Vendor, budgets: &[BudgetEntry]) -> Result<BudgetPlan> {
        self.budget_plans().save(vendor, budgets)
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for CostPlanSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CostPlanSdk(base_url={}, identifier={})",
            self.conn.base_url(),
            self.conn.identifier()
        )
    }
}
