use crate::error::app_error::AppError;
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use rocket::serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A single dated transaction attributed to a budget category by name.
/// `category` is a free string, deliberately not a foreign key: an
/// expense may reference a deleted or never-created budget and is then
/// simply orphaned from limit tracking.
#[derive(Serialize, Debug, Clone)]
pub struct Expense {
    pub id: Uuid,
    pub category: String,
    pub amount: i64,
    pub occurred_on: NaiveDate,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    #[validate(length(min = 1, max = 256))]
    pub description: String,
    pub amount: i64,
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 64))]
    pub category: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub id: Uuid,
    pub category: String,
    pub amount: i64,
    pub date: NaiveDate,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Expense> for ExpenseResponse {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id,
            category: expense.category.clone(),
            amount: expense.amount,
            date: expense.occurred_on,
            description: expense.description.clone(),
            created_at: expense.created_at,
        }
    }
}

/// Query window tokens recognized by the expense list and the
/// time-series read. Windows are inclusive on both ends and evaluated
/// against the expense's calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Last7Days,
    Last30Days,
    /// The previous calendar month.
    LastMonth,
    Last6Months,
    LastYear,
    All,
}

impl TimeRange {
    pub fn parse(token: &str) -> Result<Self, AppError> {
        match token {
            "last-7-days" => Ok(TimeRange::Last7Days),
            "last-30-days" => Ok(TimeRange::Last30Days),
            "last-month" => Ok(TimeRange::LastMonth),
            "last-6-months" => Ok(TimeRange::Last6Months),
            "last-year" => Ok(TimeRange::LastYear),
            "none" => Ok(TimeRange::All),
            other => Err(AppError::BadRequest(format!("Unknown time range '{}'", other))),
        }
    }

    /// Inclusive `[start, end]` window relative to `today`, or `None`
    /// when the range does not restrict results.
    pub fn window(&self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            TimeRange::Last7Days => Some((today - Duration::days(7), today)),
            TimeRange::Last30Days => Some((today - Duration::days(30), today)),
            TimeRange::LastMonth => {
                // first_of_month is always a valid date for a valid `today`
                let first_of_month = today.with_day(1)?;
                let last_of_previous = first_of_month.pred_opt()?;
                let first_of_previous = last_of_previous.with_day(1)?;
                Some((first_of_previous, last_of_previous))
            }
            TimeRange::Last6Months => Some((today.checked_sub_months(Months::new(6))?, today)),
            TimeRange::LastYear => Some((today.checked_sub_months(Months::new(12))?, today)),
            TimeRange::All => None,
        }
    }
}

/// Filter configuration for the expense list: an optional time window
/// plus a case-insensitive substring match on the category name.
#[derive(Debug, Clone)]
pub struct ExpenseFilter {
    pub time_range: TimeRange,
    pub category_search: Option<String>,
}

impl ExpenseFilter {
    pub fn from_query(time: Option<&str>, search: Option<String>) -> Result<Self, AppError> {
        let time_range = TimeRange::parse(time.unwrap_or("none"))?;
        let category_search = search.filter(|s| !s.trim().is_empty());

        Ok(Self {
            time_range,
            category_search,
        })
    }
}

/// The inclusive `[start, end]` bounds of the current calendar month,
/// the default dashboard window.
pub fn current_month_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today.with_day(1).unwrap_or(today);
    (first, today)
}
