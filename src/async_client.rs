//! Async wrapper around [`CostPlanSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use costplan_sdk::{AsyncCostPlanSdk, Vendor};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sdk = AsyncCostPlanSdk::builder()
//!         .token("my-access-token")
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     // Run any sync SDK method via closure
//!     let forecast = sdk.run(|s| s.forecast().get(Vendor::Datadog)).await.unwrap();
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::error::{CostPlanError, Result};
use crate::models::{BudgetEntry, BudgetPlan, ForecastData, MonthlyMetric, Vendor};
use crate::{CostPlanSdk, TokenProvider};

// ---------------------------------------------------------------------------
// AsyncCostPlanSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncCostPlanSdk`] instance.
pub struct AsyncCostPlanSdkBuilder {
    inner: crate::CostPlanSdkBuilder,
}

impl Default for AsyncCostPlanSdkBuilder {
    fn default() -> Self {
        Self {
            inner: CostPlanSdk::builder(),
        }
    }
}

impl AsyncCostPlanSdkBuilder {
    /// Set the backend base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.inner = self.inner.base_url(url);
        self
    }

    /// Use a fixed bearer token for every request.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.token(token);
        self
    }

    /// Obtain bearer tokens from `provider` before each request.
    pub fn token_provider<P: TokenProvider + 'static>(mut self, provider: P) -> Self {
        self.inner = self.inner.token_provider(provider);
        self
    }

    /// Credential configuration used for metrics and forecasts.
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.inner = self.inner.identifier(identifier);
        self
    }

    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    /// Build the async SDK.
    ///
    /// The blocking HTTP client is constructed on the blocking thread pool
    /// so it won't block the async event loop.
    pub async fn build(self) -> Result<AsyncCostPlanSdk> {
        let inner = self.inner;
        tokio::task::spawn_blocking(move || {
            let sdk = inner.build()?;
            Ok(AsyncCostPlanSdk {
                inner: Arc::new(sdk),
            })
        })
        .await
        .map_err(|e| CostPlanError::InvalidState(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncCostPlanSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`CostPlanSdk`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The SDK holds no interior mutability,
/// so it is shared behind an [`Arc`] without locking.
#[derive(Clone)]
pub struct AsyncCostPlanSdk {
    inner: Arc<CostPlanSdk>,
}

impl AsyncCostPlanSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncCostPlanSdkBuilder {
        AsyncCostPlanSdkBuilder::default()
    }

    /// Run a sync SDK operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&CostPlanSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&sdk))
            .await
            .map_err(|e| CostPlanError::InvalidState(format!("Task join error: {e}")))?
    }

    pub async fn metrics(&self, vendor: Vendor) -> Result<Vec<MonthlyMetric>> {
        self.run(move |s| s.metrics().get(vendor)).await
    }

    pub async fn forecast(&self, vendor: Vendor) -> Result<ForecastData> {
        self.run(move |s| s.forecast().get(vendor)).await
    }

    pub async fn budget_plans(&self, vendor: Vendor) -> Result<Vec<BudgetPlan>> {
        self.run(move |s| s.budget_plans().list(vendor)).await
    }

    pub async fn save_budget_plan(
        &self,
        vendor: Vendor,
        budgets: Vec<BudgetEntry>,
    ) -> Result<BudgetPlan> {
        self.run(move |s| s.budget_plans().save(vendor, &budgets)).await
    }

    /// Shared handle to the blocking SDK, e.g. to build a
    /// [`VendorFeed`](crate::VendorFeed) over it.
    pub fn blocking(&self) -> Arc<CostPlanSdk> {
        self.inner.clone()
    }
}
