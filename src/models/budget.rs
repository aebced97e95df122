use crate::models::vendor::Vendor;
use crate::month::Month;
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// BudgetEntry: a single (month, amount) target
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEntry {
    pub month: Month,
    pub amount: f64,
}

impl BudgetEntry {
    pub fn new(month: Month, amount: f64) -> Self {
        Self { month, amount }
    }
}

// ---------------------------------------------------------------------------
// BudgetPlan: persisted plan for one (user, vendor) pair
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPlan {
    pub id: i64,
    pub vendor: Vendor,
    pub user_id: i64,
    #[serde(deserialize_with = "deserialize_budgets", default)]
    pub budgets: Vec<BudgetEntry>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(rename = "type", default = "default_plan_type")]
    pub type_field: String,
}

fn default_plan_type() -> String {
    "default".to_string()
}

/// The backend stores budgets as `{ "budgets": [...] }`; accept that and a flat list.
#[derive(Deserialize)]
#[serde(untagged)]
enum BudgetsField {
    Flat(Vec<BudgetEntry>),
    Nested { budgets: Vec<BudgetEntry> },
    Null(Option<()>),
}

fn deserialize_budgets<'de, D>(deserializer: D) -> Result<Vec<BudgetEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match BudgetsField::deserialize(deserializer)? {
        BudgetsField::Flat(entries) => entries,
        BudgetsField::Nested { budgets } => budgets,
        BudgetsField::Null(_) => Vec::new(),
    })
}

// ---------------------------------------------------------------------------
// BudgetPlanCreate: POST /v1/budget-plans body
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPlanCreate {
    pub vendor: Vendor,
    pub budgets: Vec<BudgetEntry>,
}
