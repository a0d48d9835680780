use chrono::{DateTime, NaiveDate, Utc};
use rocket::serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The user's current savings goal. At most one goal per user is
/// current; a reset starts a new period in place (`period_start`
/// moves to today) rather than creating history.
#[derive(Serialize, Debug, Clone)]
pub struct SavingsGoal {
    pub id: Uuid,
    pub goal_amount: i64,
    pub current_save: i64,
    pub period_start: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GoalRequest {
    pub goal_amount: i64,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GoalResponse {
    pub id: Uuid,
    pub goal_amount: i64,
    pub current_save: i64,
    pub period_start: NaiveDate,
}

impl From<&SavingsGoal> for GoalResponse {
    fn from(goal: &SavingsGoal) -> Self {
        Self {
            id: goal.id,
            goal_amount: goal.goal_amount,
            current_save: goal.current_save,
            period_start: goal.period_start,
        }
    }
}
