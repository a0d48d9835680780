use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::savings::SavingsGoal;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct SavingsGoalRow {
    id: Uuid,
    goal_amount: i64,
    current_save: i64,
    period_start: NaiveDate,
    created_at: DateTime<Utc>,
}

impl From<SavingsGoalRow> for SavingsGoal {
    fn from(row: SavingsGoalRow) -> Self {
        SavingsGoal {
            id: row.id,
            goal_amount: row.goal_amount,
            current_save: row.current_save,
            period_start: row.period_start,
            created_at: row.created_at,
        }
    }
}

const GOAL_RETURNING_FIELDS: &str = "id, goal_amount, current_save, period_start, created_at";

#[async_trait::async_trait]
pub trait SavingsRepository {
    async fn get_goal(&self, user_id: &Uuid) -> Result<Option<SavingsGoal>, AppError>;
    /// First call creates the goal with `current_save = 0` and
    /// `period_start = today`; later calls update the target in place,
    /// leaving saved amount and period untouched. The flag reports
    /// whether this call created the goal.
    async fn create_or_update_goal(&self, goal_amount: i64, user_id: &Uuid) -> Result<(SavingsGoal, bool), AppError>;
    /// Starts a new period: `period_start = today`, new target, and the
    /// saved amount either zeroed or carried per `carry_save`.
    async fn reset_goal(&self, goal_amount: i64, carry_save: bool, user_id: &Uuid) -> Result<SavingsGoal, AppError>;
}

#[async_trait::async_trait]
impl SavingsRepository for PostgresRepository {
    async fn get_goal(&self, user_id: &Uuid) -> Result<Option<SavingsGoal>, AppError> {
        let query = format!("SELECT {} FROM savings_goal WHERE user_id = $1", GOAL_RETURNING_FIELDS);
        let row = sqlx::query_as::<_, SavingsGoalRow>(&query).bind(user_id).fetch_optional(&self.pool).await?;

        Ok(row.map(SavingsGoal::from))
    }

    async fn create_or_update_goal(&self, goal_amount: i64, user_id: &Uuid) -> Result<(SavingsGoal, bool), AppError> {
        // Existence check and upsert in one transaction so the created
        // flag cannot race a concurrent first-time create.
        let mut tx = self.pool.begin().await?;

        #[derive(sqlx::FromRow)]
        struct ExistingRow {
            id: Uuid,
        }

        let existing = sqlx::query_as::<_, ExistingRow>("SELECT id FROM savings_goal WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let query = format!(
            r#"
            INSERT INTO savings_goal (user_id, goal_amount)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET goal_amount = EXCLUDED.goal_amount
            RETURNING {}
            "#,
            GOAL_RETURNING_FIELDS
        );

        let row = sqlx::query_as::<_, SavingsGoalRow>(&query)
            .bind(user_id)
            .bind(goal_amount)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok((SavingsGoal::from(row), existing.is_none()))
    }

    async fn reset_goal(&self, goal_amount: i64, carry_save: bool, user_id: &Uuid) -> Result<SavingsGoal, AppError> {
        let query = format!(
            r#"
            UPDATE savings_goal
            SET goal_amount = $2,
                period_start = CURRENT_DATE,
                current_save = CASE WHEN $3 THEN current_save ELSE 0 END
            WHERE user_id = $1
            RETURNING {}
            "#,
            GOAL_RETURNING_FIELDS
        );

        let row = sqlx::query_as::<_, SavingsGoalRow>(&query)
            .bind(user_id)
            .bind(goal_amount)
            .bind(carry_save)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(SavingsGoal::from(row)),
            None => Err(AppError::NotFound("No savings goal to reset".to_string())),
        }
    }
}
