use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A budget category: a named spending bucket with a monthly limit and a
/// materialized `spent` total. `spent` always equals the sum of the live
/// expense rows whose category string matches `name` for the same user;
/// it is only adjusted inside the same storage transaction as the
/// expense mutation.
#[derive(Serialize, Debug, Clone)]
pub struct Budget {
    pub id: Uuid,
    pub name: String,
    pub limit_amount: i64,
    pub spent: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    pub limit: i64,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    pub id: Uuid,
    pub name: String,
    pub limit: i64,
    pub spent: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&Budget> for BudgetResponse {
    fn from(budget: &Budget) -> Self {
        Self {
            id: budget.id,
            name: budget.name.clone(),
            limit: budget.limit_amount,
            spent: budget.spent,
            created_at: budget.created_at,
        }
    }
}
