use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::budget::{Budget, BudgetRequest};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct BudgetRow {
    id: Uuid,
    name: String,
    limit_amount: i64,
    spent: i64,
    created_at: DateTime<Utc>,
}

impl From<BudgetRow> for Budget {
    fn from(row: BudgetRow) -> Self {
        Budget {
            id: row.id,
            name: row.name,
            limit_amount: row.limit_amount,
            spent: row.spent,
            created_at: row.created_at,
        }
    }
}

#[async_trait::async_trait]
pub trait BudgetRepository {
    /// Creates a budget with `spent = 0`. The `(user_id, name)` unique
    /// constraint rejects duplicate names per user.
    async fn create_budget(&self, request: &BudgetRequest, user_id: &Uuid) -> Result<Budget, AppError>;
    async fn list_budgets(&self, user_id: &Uuid) -> Result<Vec<Budget>, AppError>;
    /// Removes the budget row only. Expense rows referencing its name are
    /// left untouched and become orphaned from limit tracking.
    async fn delete_budget(&self, id: &Uuid, user_id: &Uuid) -> Result<(), AppError>;
}

#[async_trait::async_trait]
impl BudgetRepository for PostgresRepository {
    async fn create_budget(&self, request: &BudgetRequest, user_id: &Uuid) -> Result<Budget, AppError> {
        let row = sqlx::query_as::<_, BudgetRow>(
            r#"
            INSERT INTO budget (user_id, name, limit_amount)
            VALUES ($1, $2, $3)
            RETURNING id, name, limit_amount, spent, created_at
            "#,
        )
        .bind(user_id)
        .bind(&request.name)
        .bind(request.limit)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::DuplicateName(request.name.clone()),
            _ => AppError::from(e),
        })?;

        Ok(Budget::from(row))
    }

    async fn list_budgets(&self, user_id: &Uuid) -> Result<Vec<Budget>, AppError> {
        let rows = sqlx::query_as::<_, BudgetRow>(
            r#"
            SELECT id, name, limit_amount, spent, created_at
            FROM budget
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Budget::from).collect())
    }

    async fn delete_budget(&self, id: &Uuid, user_id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM budget WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Budget not found".to_string()));
        }

        Ok(())
    }
}
