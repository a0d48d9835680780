use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::dashboard::{CategoryBreakdownResponse, DashboardSummaryResponse, TimeBucket, TimeSeriesPoint};
use crate::models::expense::{TimeRange, current_month_window};
use chrono::Utc;
use uuid::Uuid;

// Read-only aggregation over the raw ledger rows. Nothing here is
// cached; every call recomputes from the expense, budget and
// savings_goal tables as of the query moment.
impl PostgresRepository {
    pub async fn dashboard_summary(&self, user_id: &Uuid) -> Result<DashboardSummaryResponse, AppError> {
        let (month_start, month_end) = current_month_window(Utc::now().date_naive());

        #[derive(sqlx::FromRow)]
        struct SummaryRow {
            total_expenses: i64,
            total_item_count: i64,
            savings: i64,
            goal_amount: i64,
        }

        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            WITH month_expenses AS (
                SELECT amount
                FROM expense
                WHERE user_id = $1
                  AND occurred_on BETWEEN $2 AND $3
            )
            SELECT
                COALESCE((SELECT SUM(amount) FROM month_expenses), 0)::bigint AS total_expenses,
                (SELECT COUNT(*) FROM month_expenses)                         AS total_item_count,
                COALESCE((SELECT current_save FROM savings_goal WHERE user_id = $1), 0)::bigint AS savings,
                COALESCE((SELECT goal_amount  FROM savings_goal WHERE user_id = $1), 0)::bigint AS goal_amount
            "#,
        )
        .bind(user_id)
        .bind(month_start)
        .bind(month_end)
        .fetch_one(&self.pool)
        .await?;

        let categories = self.category_breakdown(user_id).await?;

        Ok(DashboardSummaryResponse {
            total_expenses: row.total_expenses,
            total_item_count: row.total_item_count,
            savings: row.savings,
            goal_amount: row.goal_amount,
            categories,
        })
    }

    pub async fn category_breakdown(&self, user_id: &Uuid) -> Result<Vec<CategoryBreakdownResponse>, AppError> {
        #[derive(sqlx::FromRow)]
        struct BreakdownRow {
            name: String,
            limit_amount: i64,
            spent: i64,
        }

        let rows = sqlx::query_as::<_, BreakdownRow>(
            r#"
            SELECT name, limit_amount, spent
            FROM budget
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CategoryBreakdownResponse {
                name: row.name,
                limit: row.limit_amount,
                spent: row.spent,
            })
            .collect())
    }

    pub async fn time_series(&self, time_range: TimeRange, bucket: TimeBucket, user_id: &Uuid) -> Result<Vec<TimeSeriesPoint>, AppError> {
        let window = time_range.window(Utc::now().date_naive());

        #[derive(sqlx::FromRow)]
        struct BucketRow {
            bucket: String,
            total: i64,
        }

        // trunc_unit is one of two fixed tokens, never user input
        let query = format!(
            r#"
            SELECT to_char(date_trunc('{unit}', occurred_on::timestamp), $2) AS bucket,
                   COALESCE(SUM(amount), 0)::bigint                          AS total
            FROM expense
            WHERE user_id = $1{window_clause}
            GROUP BY date_trunc('{unit}', occurred_on::timestamp)
            ORDER BY date_trunc('{unit}', occurred_on::timestamp)
            "#,
            unit = bucket.trunc_unit(),
            window_clause = if window.is_some() { " AND occurred_on BETWEEN $3 AND $4" } else { "" },
        );

        let mut db_query = sqlx::query_as::<_, BucketRow>(&query).bind(user_id).bind(bucket.label_format());

        if let Some((start, end)) = window {
            db_query = db_query.bind(start).bind(end);
        }

        let rows = db_query.fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|row| TimeSeriesPoint {
                bucket: row.bucket,
                total: row.total,
            })
            .collect())
    }
}
