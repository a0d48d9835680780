use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::expense::{Expense, ExpenseFilter, ExpenseRequest};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct ExpenseRow {
    id: Uuid,
    category: String,
    amount: i64,
    occurred_on: NaiveDate,
    description: String,
    created_at: DateTime<Utc>,
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        Expense {
            id: row.id,
            category: row.category,
            amount: row.amount,
            occurred_on: row.occurred_on,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

const EXPENSE_SELECT_FIELDS: &str = "id, category, amount, occurred_on, description, created_at";

// ILIKE treats % and _ as wildcards; user input must not.
fn escape_like_pattern(input: &str) -> String {
    input.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[async_trait::async_trait]
pub trait ExpenseRepository {
    /// Inserts the expense and increments the matching budget's `spent`
    /// in one transaction. A missing budget makes the adjustment a no-op;
    /// the expense is still recorded.
    async fn record_expense(&self, request: &ExpenseRequest, user_id: &Uuid) -> Result<Expense, AppError>;
    /// Newest-created-first, restricted by the filter's time window
    /// (against the expense date) and category substring.
    async fn list_expenses(&self, filter: &ExpenseFilter, user_id: &Uuid) -> Result<Vec<Expense>, AppError>;
    /// Deletes the expense and decrements the matching budget's `spent`
    /// in one transaction. A second delete of the same id is `NotFound`.
    async fn delete_expense(&self, id: &Uuid, user_id: &Uuid) -> Result<(), AppError>;
}

#[async_trait::async_trait]
impl ExpenseRepository for PostgresRepository {
    async fn record_expense(&self, request: &ExpenseRequest, user_id: &Uuid) -> Result<Expense, AppError> {
        // The insert and the spent adjustment must commit or roll back
        // together; the UPDATE's row lock serializes concurrent
        // increments against the same budget.
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            INSERT INTO expense (user_id, category, amount, occurred_on, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            EXPENSE_SELECT_FIELDS
        );

        let row = sqlx::query_as::<_, ExpenseRow>(&query)
            .bind(user_id)
            .bind(&request.category)
            .bind(request.amount)
            .bind(request.date)
            .bind(&request.description)
            .fetch_one(&mut *tx)
            .await?;

        let adjusted = sqlx::query("UPDATE budget SET spent = spent + $1 WHERE user_id = $2 AND name = $3")
            .bind(request.amount)
            .bind(user_id)
            .bind(&request.category)
            .execute(&mut *tx)
            .await?;

        if adjusted.rows_affected() == 0 {
            tracing::debug!(
                user_id = %user_id,
                category = %request.category,
                "expense recorded against a category with no budget"
            );
        }

        tx.commit().await?;

        Ok(Expense::from(row))
    }

    async fn list_expenses(&self, filter: &ExpenseFilter, user_id: &Uuid) -> Result<Vec<Expense>, AppError> {
        let window = filter.time_range.window(Utc::now().date_naive());

        let mut query = format!("SELECT {} FROM expense WHERE user_id = $1", EXPENSE_SELECT_FIELDS);
        let mut bind_index = 1;

        if window.is_some() {
            query.push_str(&format!(" AND occurred_on BETWEEN ${} AND ${}", bind_index + 1, bind_index + 2));
            bind_index += 2;
        }

        if filter.category_search.is_some() {
            query.push_str(&format!(" AND category ILIKE ${}", bind_index + 1));
        }

        query.push_str(" ORDER BY created_at DESC");

        let mut db_query = sqlx::query_as::<_, ExpenseRow>(&query).bind(user_id);

        if let Some((start, end)) = window {
            db_query = db_query.bind(start).bind(end);
        }

        if let Some(search) = &filter.category_search {
            db_query = db_query.bind(format!("%{}%", escape_like_pattern(search)));
        }

        let rows = db_query.fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(Expense::from).collect())
    }

    async fn delete_expense(&self, id: &Uuid, user_id: &Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        #[derive(sqlx::FromRow)]
        struct DeletedRow {
            category: String,
            amount: i64,
        }

        let deleted = sqlx::query_as::<_, DeletedRow>(
            r#"
            DELETE FROM expense
            WHERE id = $1 AND user_id = $2
            RETURNING category, amount
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(deleted) = deleted else {
            // Covers double-deletes from racing clients: the second
            // attempt finds no row and never touches spent.
            return Err(AppError::NotFound("Expense not found".to_string()));
        };

        // GREATEST guards the spent >= 0 check when the budget was
        // created after some of its expenses already existed.
        sqlx::query("UPDATE budget SET spent = GREATEST(spent - $1, 0) WHERE user_id = $2 AND name = $3")
            .bind(deleted.amount)
            .bind(user_id)
            .bind(&deleted.category)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
