use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_IDENTIFIER: &str = "Default Configuration";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the backend base URL.
pub const ENV_BASE_URL: &str = "BACKEND_URL";
/// Environment variable holding a pre-issued bearer token.
pub const ENV_TOKEN: &str = "BACKEND_TOKEN";

pub const METRICS_PATH: &str = "/v1/vendors-metrics";
pub const FORECAST_PATH: &str = "/v1/vendors-forecast";
pub const BUDGET_PLANS_PATH: &str = "/v1/budget-plans";
pub const CONFIGURATION_PATH: &str = "/v1/configuration";

/// Growth rate shown before the server trend rate is known.
pub const DEFAULT_GROWTH_RATE: f64 = 15.0;
pub const MIN_GROWTH_RATE: f64 = 0.0;
pub const MAX_GROWTH_RATE: f64 = 100.0;

pub fn metrics_path(vendor: &str) -> String {
    format!("{}/{}", METRICS_PATH, vendor)
}

pub fn forecast_path(vendor: &str) -> String {
    format!("{}/{}", FORECAST_PATH, vendor)
}

pub fn budget_plan_path(id: i64) -> String {
    format!("{}/{}", BUDGET_PLANS_PATH, id)
}

pub fn configuration_path(vendor: &str) -> String {
    format!("{}/{}", CONFIGURATION_PATH, vendor)
}

pub fn configuration_list_path() -> String {
    format!("{}/list", CONFIGURATION_PATH)
}

/// Where forecast CSV exports land when the caller gives no directory.
pub fn default_export_dir() -> PathBuf {
    if let Some(dir) = dirs::download_dir() {
        dir
    } else if let Some(home) = dirs::home_dir() {
        home
    } else {
        PathBuf::from(".")
    }
}
