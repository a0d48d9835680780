use crate::error::app_error::AppError;
use rocket::serde::Serialize;

/// Calendar unit used to bucket the expense time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBucket {
    Day,
    Month,
}

impl TimeBucket {
    pub fn parse(token: &str) -> Result<Self, AppError> {
        match token {
            "day" => Ok(TimeBucket::Day),
            "month" => Ok(TimeBucket::Month),
            other => Err(AppError::BadRequest(format!("Unknown bucket '{}'", other))),
        }
    }

    /// Unit token passed to Postgres `date_trunc`.
    pub fn trunc_unit(&self) -> &'static str {
        match self {
            TimeBucket::Day => "day",
            TimeBucket::Month => "month",
        }
    }

    /// `to_char` pattern producing the bucket label.
    pub fn label_format(&self) -> &'static str {
        match self {
            TimeBucket::Day => "YYYY-MM-DD",
            TimeBucket::Month => "YYYY-MM",
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdownResponse {
    pub name: String,
    pub limit: i64,
    pub spent: i64,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummaryResponse {
    /// Sum of expense amounts in the current calendar month.
    pub total_expenses: i64,
    /// Count of expenses in the current calendar month.
    pub total_item_count: i64,
    /// Saved-so-far amount of the current goal, 0 when no goal exists.
    pub savings: i64,
    /// Target of the current goal, 0 when no goal exists.
    pub goal_amount: i64,
    pub categories: Vec<CategoryBreakdownResponse>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub bucket: String,
    pub total: i64,
}
