use crate::database::budget::BudgetRepository;
use crate::database::expense::ExpenseRepository;
use crate::database::savings::SavingsRepository;
use crate::error::app_error::AppError;
use crate::models::budget::{Budget, BudgetRequest};
use crate::models::expense::{Expense, ExpenseFilter, ExpenseRequest};
use crate::models::savings::SavingsGoal;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct MockState {
    budgets: Vec<(Uuid, Budget)>,
    // newest expense first, matching the created_at DESC ordering contract
    expenses: Vec<(Uuid, Expense)>,
    goals: HashMap<Uuid, SavingsGoal>,
}

/// In-memory repository implementing the same traits as
/// `PostgresRepository`, including the spent-adjustment rules, so the
/// ledger contract can be exercised without a database.
#[derive(Default)]
pub struct MockRepository {
    state: Mutex<MockState>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes a category's spent figure from the raw expense rows,
    /// the source of truth the materialized value must agree with.
    pub fn recomputed_spent(&self, user_id: &Uuid, category: &str) -> i64 {
        let state = self.state.lock().unwrap();
        state
            .expenses
            .iter()
            .filter(|(owner, e)| owner == user_id && e.category == category)
            .map(|(_, e)| e.amount)
            .sum()
    }
}

#[async_trait::async_trait]
impl BudgetRepository for MockRepository {
    async fn create_budget(&self, request: &BudgetRequest, user_id: &Uuid) -> Result<Budget, AppError> {
        if request.limit < 0 {
            return Err(AppError::InvalidLimit);
        }

        let mut state = self.state.lock().unwrap();

        if state.budgets.iter().any(|(owner, b)| owner == user_id && b.name == request.name) {
            return Err(AppError::DuplicateName(request.name.clone()));
        }

        let budget = Budget {
            id: Uuid::new_v4(),
            name: request.name.clone(),
            limit_amount: request.limit,
            spent: 0,
            created_at: Utc::now(),
        };
        state.budgets.push((*user_id, budget.clone()));
        Ok(budget)
    }

    async fn list_budgets(&self, user_id: &Uuid) -> Result<Vec<Budget>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.budgets.iter().filter(|(owner, _)| owner == user_id).map(|(_, b)| b.clone()).collect())
    }

    async fn delete_budget(&self, id: &Uuid, user_id: &Uuid) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        let before = state.budgets.len();
        state.budgets.retain(|(owner, b)| !(owner == user_id && b.id == *id));

        if state.budgets.len() == before {
            return Err(AppError::NotFound("Budget not found".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ExpenseRepository for MockRepository {
    async fn record_expense(&self, request: &ExpenseRequest, user_id: &Uuid) -> Result<Expense, AppError> {
        if request.amount <= 0 {
            return Err(AppError::InvalidAmount);
        }

        let mut state = self.state.lock().unwrap();

        let expense = Expense {
            id: Uuid::new_v4(),
            category: request.category.clone(),
            amount: request.amount,
            occurred_on: request.date,
            description: request.description.clone(),
            created_at: Utc::now(),
        };
        state.expenses.insert(0, (*user_id, expense.clone()));

        // spent adjustment is a no-op when no budget matches the name
        if let Some((_, budget)) = state.budgets.iter_mut().find(|(owner, b)| owner == user_id && b.name == request.category) {
            budget.spent += request.amount;
        }

        Ok(expense)
    }

    async fn list_expenses(&self, filter: &ExpenseFilter, user_id: &Uuid) -> Result<Vec<Expense>, AppError> {
        let window = filter.time_range.window(Utc::now().date_naive());
        let search = filter.category_search.as_ref().map(|s| s.to_lowercase());

        let state = self.state.lock().unwrap();
        Ok(state
            .expenses
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .filter(|(_, e)| window.is_none_or(|(start, end)| e.occurred_on >= start && e.occurred_on <= end))
            .filter(|(_, e)| search.as_ref().is_none_or(|s| e.category.to_lowercase().contains(s)))
            .map(|(_, e)| e.clone())
            .collect())
    }

    async fn delete_expense(&self, id: &Uuid, user_id: &Uuid) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();

        let position = state.expenses.iter().position(|(owner, e)| owner == user_id && e.id == *id);
        let Some(position) = position else {
            return Err(AppError::NotFound("Expense not found".to_string()));
        };

        let (_, expense) = state.expenses.remove(position);
        if let Some((_, budget)) = state.budgets.iter_mut().find(|(owner, b)| owner == user_id && b.name == expense.category) {
            budget.spent = (budget.spent - expense.amount).max(0);
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl SavingsRepository for MockRepository {
    async fn get_goal(&self, user_id: &Uuid) -> Result<Option<SavingsGoal>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.goals.get(user_id).cloned())
    }

    async fn create_or_update_goal(&self, goal_amount: i64, user_id: &Uuid) -> Result<(SavingsGoal, bool), AppError> {
        let mut state = self.state.lock().unwrap();

        let created = !state.goals.contains_key(user_id);
        let goal = state
            .goals
            .entry(*user_id)
            .and_modify(|g| g.goal_amount = goal_amount)
            .or_insert_with(|| SavingsGoal {
                id: Uuid::new_v4(),
                goal_amount,
                current_save: 0,
                period_start: Utc::now().date_naive(),
                created_at: Utc::now(),
            });

        Ok((goal.clone(), created))
    }

    async fn reset_goal(&self, goal_amount: i64, carry_save: bool, user_id: &Uuid) -> Result<SavingsGoal, AppError> {
        let mut state = self.state.lock().unwrap();

        let goal = state
            .goals
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound("No savings goal to reset".to_string()))?;

        goal.goal_amount = goal_amount;
        goal.period_start = Utc::now().date_naive();
        if !carry_save {
            goal.current_save = 0;
        }

        Ok(goal.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::expense::TimeRange;
    use chrono::{Duration, NaiveDate};

    fn budget_request(name: &str, limit: i64) -> BudgetRequest {
        BudgetRequest {
            name: name.to_string(),
            limit,
        }
    }

    fn expense_request(category: &str, amount: i64, date: NaiveDate) -> ExpenseRequest {
        ExpenseRequest {
            description: format!("{} purchase", category),
            amount,
            date,
            category: category.to_string(),
        }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    #[rocket::async_test]
    async fn spent_tracks_expense_lifecycle() {
        let repo = MockRepository::new();
        let owner = Uuid::new_v4();

        repo.create_budget(&budget_request("Food", 200), &owner).await.unwrap();

        let first = repo.record_expense(&expense_request("Food", 50, today()), &owner).await.unwrap();
        assert_eq!(repo.list_budgets(&owner).await.unwrap()[0].spent, 50);

        repo.record_expense(&expense_request("Food", 30, today()), &owner).await.unwrap();
        assert_eq!(repo.list_budgets(&owner).await.unwrap()[0].spent, 80);

        repo.delete_expense(&first.id, &owner).await.unwrap();
        let budget = &repo.list_budgets(&owner).await.unwrap()[0];
        assert_eq!(budget.spent, 30);
        assert_eq!(budget.spent, repo.recomputed_spent(&owner, "Food"));
    }

    #[rocket::async_test]
    async fn non_positive_expense_amounts_are_rejected_without_a_record() {
        let repo = MockRepository::new();
        let owner = Uuid::new_v4();

        repo.create_budget(&budget_request("Food", 200), &owner).await.unwrap();

        let zero = repo.record_expense(&expense_request("Food", 0, today()), &owner).await;
        assert!(matches!(zero, Err(AppError::InvalidAmount)));

        let negative = repo.record_expense(&expense_request("Food", -50, today()), &owner).await;
        assert!(matches!(negative, Err(AppError::InvalidAmount)));

        // No record was created and no spent was accumulated
        let filter = ExpenseFilter {
            time_range: TimeRange::All,
            category_search: None,
        };
        assert!(repo.list_expenses(&filter, &owner).await.unwrap().is_empty());
        assert_eq!(repo.list_budgets(&owner).await.unwrap()[0].spent, 0);
    }

    #[rocket::async_test]
    async fn negative_budget_limit_is_rejected_without_a_record() {
        let repo = MockRepository::new();
        let owner = Uuid::new_v4();

        let result = repo.create_budget(&budget_request("Food", -1), &owner).await;
        assert!(matches!(result, Err(AppError::InvalidLimit)));
        assert!(repo.list_budgets(&owner).await.unwrap().is_empty());

        // Zero is a valid limit; only negatives are rejected
        assert!(repo.create_budget(&budget_request("Food", 0), &owner).await.is_ok());
    }

    #[rocket::async_test]
    async fn duplicate_budget_name_is_rejected_per_owner() {
        let repo = MockRepository::new();
        let owner = Uuid::new_v4();
        let other_owner = Uuid::new_v4();

        repo.create_budget(&budget_request("Food", 200), &owner).await.unwrap();

        let duplicate = repo.create_budget(&budget_request("Food", 100), &owner).await;
        assert!(matches!(duplicate, Err(AppError::DuplicateName(name)) if name == "Food"));

        // A different owner may reuse the name freely
        assert!(repo.create_budget(&budget_request("Food", 100), &other_owner).await.is_ok());
    }

    #[rocket::async_test]
    async fn deleting_a_budget_orphans_its_expenses() {
        let repo = MockRepository::new();
        let owner = Uuid::new_v4();

        let budget = repo.create_budget(&budget_request("Food", 200), &owner).await.unwrap();
        repo.record_expense(&expense_request("Food", 50, today()), &owner).await.unwrap();

        repo.delete_budget(&budget.id, &owner).await.unwrap();

        // The expense record survives the budget deletion untouched
        let filter = ExpenseFilter {
            time_range: TimeRange::All,
            category_search: None,
        };
        let expenses = repo.list_expenses(&filter, &owner).await.unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, 50);

        // Recording against the deleted name still succeeds, with no
        // budget left to track it
        repo.record_expense(&expense_request("Food", 25, today()), &owner).await.unwrap();
        assert!(repo.list_budgets(&owner).await.unwrap().is_empty());
    }

    #[rocket::async_test]
    async fn double_delete_of_an_expense_is_not_found() {
        let repo = MockRepository::new();
        let owner = Uuid::new_v4();

        repo.create_budget(&budget_request("Food", 200), &owner).await.unwrap();
        let expense = repo.record_expense(&expense_request("Food", 50, today()), &owner).await.unwrap();

        repo.delete_expense(&expense.id, &owner).await.unwrap();
        let second = repo.delete_expense(&expense.id, &owner).await;
        assert!(matches!(second, Err(AppError::NotFound(_))));

        // The first delete already brought spent back to 0; the failed
        // second attempt must not double-decrement
        assert_eq!(repo.list_budgets(&owner).await.unwrap()[0].spent, 0);
    }

    #[rocket::async_test]
    async fn expenses_of_other_owners_are_invisible() {
        let repo = MockRepository::new();
        let owner = Uuid::new_v4();
        let other_owner = Uuid::new_v4();

        repo.record_expense(&expense_request("Food", 50, today()), &owner).await.unwrap();

        let filter = ExpenseFilter {
            time_range: TimeRange::All,
            category_search: None,
        };
        assert!(repo.list_expenses(&filter, &other_owner).await.unwrap().is_empty());

        let cross_delete = repo
            .delete_expense(&repo.list_expenses(&filter, &owner).await.unwrap()[0].id, &other_owner)
            .await;
        assert!(matches!(cross_delete, Err(AppError::NotFound(_))));
    }

    #[rocket::async_test]
    async fn time_window_filters_by_expense_date() {
        let repo = MockRepository::new();
        let owner = Uuid::new_v4();

        repo.record_expense(&expense_request("Food", 10, today()), &owner).await.unwrap();
        repo.record_expense(&expense_request("Food", 20, today() - Duration::days(3)), &owner).await.unwrap();
        repo.record_expense(&expense_request("Food", 30, today() - Duration::days(40)), &owner).await.unwrap();

        let filter = ExpenseFilter {
            time_range: TimeRange::Last7Days,
            category_search: None,
        };
        let recent = repo.list_expenses(&filter, &owner).await.unwrap();
        assert_eq!(recent.len(), 2);
        // newest-created-first ordering
        assert_eq!(recent[0].amount, 20);
        assert_eq!(recent[1].amount, 10);
    }

    #[rocket::async_test]
    async fn category_search_is_case_insensitive_substring() {
        let repo = MockRepository::new();
        let owner = Uuid::new_v4();

        repo.record_expense(&expense_request("Groceries", 10, today()), &owner).await.unwrap();
        repo.record_expense(&expense_request("Utilities", 20, today()), &owner).await.unwrap();

        let filter = ExpenseFilter {
            time_range: TimeRange::All,
            category_search: Some("groc".to_string()),
        };
        let matches = repo.list_expenses(&filter, &owner).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].category, "Groceries");
    }

    #[rocket::async_test]
    async fn goal_lifecycle_create_update_reset() {
        let repo = MockRepository::new();
        let owner = Uuid::new_v4();

        assert!(repo.get_goal(&owner).await.unwrap().is_none());

        let (created, was_created) = repo.create_or_update_goal(1000, &owner).await.unwrap();
        assert!(was_created);
        assert_eq!(created.goal_amount, 1000);
        assert_eq!(created.current_save, 0);

        // Updating the target leaves the saved amount and period alone,
        // and reports an update rather than a create
        let (updated, was_created) = repo.create_or_update_goal(1500, &owner).await.unwrap();
        assert!(!was_created);
        assert_eq!(updated.goal_amount, 1500);
        assert_eq!(updated.current_save, created.current_save);
        assert_eq!(updated.period_start, created.period_start);

        let reset = repo.reset_goal(2000, false, &owner).await.unwrap();
        assert_eq!(reset.goal_amount, 2000);
        assert_eq!(reset.current_save, 0);
        assert_eq!(reset.period_start, today());
    }

    #[rocket::async_test]
    async fn reset_without_goal_is_not_found() {
        let repo = MockRepository::new();
        let owner = Uuid::new_v4();

        let result = repo.reset_goal(2000, false, &owner).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[rocket::async_test]
    async fn reset_can_carry_the_saved_amount_forward() {
        let repo = MockRepository::new();
        let owner = Uuid::new_v4();

        repo.create_or_update_goal(1000, &owner).await.unwrap();
        {
            let mut state = repo.state.lock().unwrap();
            state.goals.get_mut(&owner).unwrap().current_save = 250;
        }

        let carried = repo.reset_goal(2000, true, &owner).await.unwrap();
        assert_eq!(carried.current_save, 250);

        let zeroed = repo.reset_goal(3000, false, &owner).await.unwrap();
        assert_eq!(zeroed.current_save, 0);
    }
}
