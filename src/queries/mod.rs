//! Endpoint families of the cost backend.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection) and exposes methods
//! returning typed `Result<T>` payloads.

pub mod budget_plans;
pub mod configurations;
pub mod forecast;
pub mod metrics;

pub use budget_plans::BudgetPlanQuery;
pub use configurations::ConfigurationQuery;
pub use forecast::ForecastQuery;
pub use metrics::MetricsQuery;
