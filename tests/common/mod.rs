//! Shared test fixtures for the cost planning SDK integration tests.
//!
//! Provides sample metrics and forecast data, an in-memory `FakeBackend`
//! implementing `CostBackend`, and `spawn_mock_server()` which serves the
//! backend's REST endpoints from an in-process axum server.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post, put};
use axum::Router;
use serde_json::{json, Value};

use costplan_sdk::{
    BudgetEntry, BudgetPlan, CostBackend, CostPlanError, CostPlanSdk, ForecastData, Month,
    MonthlyMetric, Result, Vendor,
};

pub const TOKEN: &str = "test-token";

// ---------------------------------------------------------------------------
// Sample data
// ---------------------------------------------------------------------------

pub fn month(key: &str) -> Month {
    Month::parse(key).unwrap()
}

/// Three months of history: 1000, 1100, 1200.
pub fn sample_metrics_json() -> Value {
    json!([
        {"month": "07-2024", "cost": 1000.0},
        {"month": "08-2024", "cost": 1100.0},
        {"month": "09-2024", "cost": 1200.0}
    ])
}

/// Three forecast months at a 10% trend rate.
pub fn sample_forecast_json() -> Value {
    json!({
        "forecast": [
            {"month": "10-2024", "cost": 1320.0, "best_case": 1260.0, "worst_case": 1380.0},
            {"month": "11-2024", "cost": 1452.0, "best_case": 1323.0, "worst_case": 1587.0},
            {"month": "12-2024", "cost": 1597.2, "best_case": 1389.15, "worst_case": 1825.05}
        ],
        "sums": {
            "total_best_case": 3972.15,
            "total_forecast": 4369.2,
            "total_worst_case": 4792.05
        },
        "growth_rates": {
            "best_case": 5.0,
            "trend_based": 10.0,
            "worst_case": 15.0
        }
    })
}

pub fn sample_metrics() -> Vec<MonthlyMetric> {
    serde_json::from_value(sample_metrics_json()).unwrap()
}

pub fn sample_forecast() -> ForecastData {
    serde_json::from_value(sample_forecast_json()).unwrap()
}

pub fn sample_plan(vendor: Vendor, budgets: Vec<BudgetEntry>) -> BudgetPlan {
    BudgetPlan {
        id: 1,
        vendor,
        user_id: 7,
        budgets,
        created_at: Some("2024-10-01T00:00:00".to_string()),
        updated_at: None,
        type_field: "default".to_string(),
    }
}

/// Relative comparison for simulated costs.
pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

// ---------------------------------------------------------------------------
// FakeBackend
// ---------------------------------------------------------------------------

/// In-memory `CostBackend` with switchable failures.
pub struct FakeBackend {
    pub metrics: RefCell<Vec<MonthlyMetric>>,
    pub forecast: RefCell<ForecastData>,
    pub plans: RefCell<Vec<BudgetPlan>>,
    pub saves: RefCell<Vec<Vec<BudgetEntry>>>,
    /// HTTP status every fetch fails with, when set.
    pub fetch_failure: Cell<Option<u16>>,
    /// HTTP status every save fails with, when set.
    pub save_failure: Cell<Option<u16>>,
    pub offline: Cell<bool>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            metrics: RefCell::new(sample_metrics()),
            forecast: RefCell::new(sample_forecast()),
            plans: RefCell::new(Vec::new()),
            saves: RefCell::new(Vec::new()),
            fetch_failure: Cell::new(None),
            save_failure: Cell::new(None),
            offline: Cell::new(false),
        }
    }

    pub fn with_plans(plans: Vec<BudgetPlan>) -> Self {
        let backend = Self::new();
        *backend.plans.borrow_mut() = plans;
        backend
    }

    fn check(&self, failure: Option<u16>) -> Result<()> {
        if self.offline.get() {
            return Err(CostPlanError::Connection {
                message: costplan_sdk::error::CONNECTION_ERROR_MESSAGE.to_string(),
                source: None,
            });
        }
        match failure {
            Some(status) => Err(CostPlanError::from_status(status, Some("boom".to_string()))),
            None => Ok(()),
        }
    }
}

impl CostBackend for FakeBackend {
    fn fetch_metrics(&self, _vendor: Vendor) -> Result<Vec<MonthlyMetric>> {
        self.check(self.fetch_failure.get())?;
        Ok(self.metrics.borrow().clone())
    }

    fn fetch_forecast(&self, _vendor: Vendor) -> Result<ForecastData> {
        self.check(self.fetch_failure.get())?;
        Ok(self.forecast.borrow().clone())
    }

    fn fetch_budget_plans(&self, vendor: Vendor) -> Result<Vec<BudgetPlan>> {
        self.check(self.fetch_failure.get())?;
        Ok(self
            .plans
            .borrow()
            .iter()
            .filter(|p| p.vendor == vendor)
            .cloned()
            .collect())
    }

    fn save_budget_plan(&self, vendor: Vendor, budgets: &[BudgetEntry]) -> Result<BudgetPlan> {
        self.check(self.save_failure.get())?;
        self.saves.borrow_mut().push(budgets.to_vec());

        let mut plans = self.plans.borrow_mut();
        if let Some(existing) = plans.iter_mut().find(|p| p.vendor == vendor) {
            existing.budgets = budgets.to_vec();
            existing.updated_at = Some("2024-10-02T00:00:00".to_string());
            return Ok(existing.clone());
        }
        let mut plan = sample_plan(vendor, budgets.to_vec());
        plan.id = plans.len() as i64 + 1;
        plans.push(plan.clone());
        Ok(plan)
    }
}

// ---------------------------------------------------------------------------
// Mock HTTP server
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockState {
    pub plans: Mutex<Vec<Value>>,
    pub identifiers: Mutex<Vec<String>>,
    pub configured: Mutex<Vec<Value>>,
}

pub struct MockServer {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockServer {
    pub fn sdk(&self) -> CostPlanSdk {
        CostPlanSdk::builder()
            .base_url(&self.base_url)
            .token(TOKEN)
            .build()
            .unwrap()
    }

    /// Preload a stored plan in the backend's nested `{ "budgets": [...] }` form.
    pub fn seed_plan(&self, id: i64, vendor: &str, budgets: Value) {
        self.state.plans.lock().unwrap().push(json!({
            "id": id,
            "vendor": vendor,
            "user_id": 7,
            "budgets": {"budgets": budgets},
            "created_at": "2024-10-01T00:00:00",
            "updated_at": "2024-10-01T00:00:00",
            "type": "default"
        }));
    }
}

/// Start the mock backend on an ephemeral port in a background thread.
pub fn spawn_mock_server() -> MockServer {
    let state = Arc::new(MockState::default());
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state.clone());

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    MockServer {
        base_url: format!("http://{}", addr),
        state,
    }
}

/// A base URL nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/v1/vendors-metrics/{vendor}", get(metrics))
        .route("/v1/vendors-forecast/{vendor}", get(forecast))
        .route("/v1/budget-plans", get(list_plans).post(create_plan))
        .route("/v1/budget-plans/{id}", put(update_plan).delete(delete_plan))
        .route("/v1/configuration/list", get(list_configurations))
        .route("/v1/configuration/{vendor}", post(configure))
        .with_state(state)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Not authenticated"})),
    )
        .into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(&format!("Bearer {}", TOKEN)[..])
}

fn known_vendor(vendor: &str) -> bool {
    matches!(vendor, "datadog" | "aws")
}

async fn metrics(
    State(state): State<Arc<MockState>>,
    Path(vendor): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if let Some(identifier) = query.get("identifier") {
        state.identifiers.lock().unwrap().push(identifier.clone());
    }
    if !known_vendor(&vendor) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": format!("Unsupported vendor: {}", vendor)})),
        )
            .into_response();
    }
    // Deliberately out of order.
    Json(json!({
        "data": [
            {"month": "09-2024", "cost": 1200.0},
            {"month": "07-2024", "cost": 1000.0},
            {"month": "08-2024", "cost": 1100.0}
        ]
    }))
    .into_response()
}

async fn forecast(
    Path(vendor): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if !known_vendor(&vendor) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "forecast failed"})),
        )
            .into_response();
    }
    if query.get("format").map(String::as_str) == Some("csv") {
        let csv = "month,cost,best_case,worst_case\n\
                   10-2024,1320.0,1260.0,1380.0\n\
                   11-2024,1452.0,1323.0,1587.0\n";
        return ([(header::CONTENT_TYPE, "text/csv")], csv).into_response();
    }
    Json(sample_forecast_json()).into_response()
}

async fn list_plans(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let vendor = query.get("vendor").cloned().unwrap_or_default();
    if !known_vendor(&vendor) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": format!("Invalid vendor: {}", vendor)})),
        )
            .into_response();
    }
    let plans: Vec<Value> = state
        .plans
        .lock()
        .unwrap()
        .iter()
        .filter(|p| p["vendor"] == vendor.as_str())
        .cloned()
        .collect();
    Json(json!({"data": plans, "status": "success"})).into_response()
}

async fn create_plan(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let vendor = body["vendor"].as_str().unwrap_or_default().to_lowercase();
    if !known_vendor(&vendor) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": format!("Invalid vendor: {}", vendor)})),
        )
            .into_response();
    }
    let mut plans = state.plans.lock().unwrap();
    let budgets = json!({"budgets": body["budgets"].clone()});
    if let Some(existing) = plans.iter_mut().find(|p| p["vendor"] == vendor.as_str()) {
        existing["budgets"] = budgets;
        existing["updated_at"] = json!("2024-10-02T00:00:00");
        return Json(json!({"data": existing.clone(), "status": "success"})).into_response();
    }
    let plan = json!({
        "id": plans.len() as i64 + 1,
        "vendor": vendor,
        "user_id": 7,
        "budgets": budgets,
        "created_at": "2024-10-02T00:00:00",
        "updated_at": null,
        "type": "default"
    });
    plans.push(plan.clone());
    Json(json!({"data": plan, "status": "success"})).into_response()
}

async fn update_plan(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut plans = state.plans.lock().unwrap();
    match plans.iter_mut().find(|p| p["id"] == id) {
        Some(plan) => {
            if plan["vendor"] != body["vendor"] {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"detail": "Cannot change vendor for existing budget plan"})),
                )
                    .into_response();
            }
            plan["budgets"] = json!({"budgets": body["budgets"].clone()});
            Json(json!({"data": plan.clone(), "status": "success"})).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Budget plan not found"})),
        )
            .into_response(),
    }
}

async fn delete_plan(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut plans = state.plans.lock().unwrap();
    let before = plans.len();
    plans.retain(|p| p["id"] != id);
    if plans.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Budget plan not found"})),
        )
            .into_response();
    }
    Json(json!({"message": "Budget plan deleted successfully"})).into_response()
}

async fn list_configurations(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "data": [
            {"id": 1, "type": "datadog", "identifier": "Default Configuration",
             "created_at": "2024-09-01T00:00:00", "updated_at": "2024-09-01T00:00:00"},
            {"id": 2, "type": "gcp", "identifier": "Legacy",
             "created_at": "2024-09-01T00:00:00", "updated_at": null}
        ]
    }))
    .into_response()
}

async fn configure(
    State(state): State<Arc<MockState>>,
    Path(vendor): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    state.configured.lock().unwrap().push(body);
    Json(json!({"id": 3, "type": vendor, "message": "Configuration saved"})).into_response()
}
