//! Budget service
//!
//! Budget CRUD and the per-month status the budget cards show. Spending is
//! always recomputed from the month's expense transactions; the stored
//! `spent` column is only refreshed on request.

use tracing::info;

use crate::calculations;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{
    Budget, BudgetId, BudgetPatch, BudgetPeriod, Category, CategoryId, CategoryType, Money,
    Transaction,
};
use crate::storage::Storage;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// A budget measured against one month of spending
#[derive(Debug, Clone)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub category: Option<Category>,
    pub spent: Money,
    /// Capped at 100
    pub progress: f64,
    pub remaining: Money,
    pub overspend: Money,
}

impl BudgetStatus {
    fn measure(
        budget: Budget,
        category: Option<Category>,
        transactions: &[Transaction],
        month: u32,
        year: i32,
    ) -> Self {
        let spent =
            calculations::category_spent_in_month(transactions, budget.category_id, month, year);
        Self {
            progress: calculations::budget_progress(spent, budget.amount),
            remaining: calculations::budget_remaining(budget.amount, spent),
            overspend: calculations::budget_overspend(budget.amount, spent),
            spent,
            category,
            budget,
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent > self.budget.amount
    }
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> FinanceResult<Vec<Budget>> {
        self.storage.budgets.get_all()
    }

    pub fn get(&self, id: BudgetId) -> FinanceResult<Budget> {
        self.storage.budgets.get_by_id(id)
    }

    /// Every budget measured against `month` of `year`
    pub fn status_for_month(&self, month: u32, year: i32) -> FinanceResult<Vec<BudgetStatus>> {
        let budgets = self.list()?;
        let transactions = self.storage.transactions.get_all()?;
        let categories = self.storage.categories.get_all()?;

        Ok(budgets
            .into_iter()
            .map(|budget| {
                let category = categories
                    .iter()
                    .find(|c| c.id == budget.category_id)
                    .cloned();
                BudgetStatus::measure(budget, category, &transactions, month, year)
            })
            .collect())
    }

    pub fn create(
        &self,
        name: &str,
        amount: Money,
        period: BudgetPeriod,
        category_id: CategoryId,
    ) -> FinanceResult<Budget> {
        let category = self.expense_category(category_id)?;
        let name = match name.trim() {
            "" => category.name.clone(),
            trimmed => trimmed.to_string(),
        };

        let patch = BudgetPatch::new(name, amount, period, category_id);
        let mut candidate = Budget::default();
        patch.apply_to(&mut candidate);
        candidate
            .validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        let budget = self.storage.budgets.create(patch)?;
        info!(id = %budget.id, amount = %budget.amount, "budget created");
        Ok(budget)
    }

    pub fn edit(&self, id: BudgetId, patch: BudgetPatch) -> FinanceResult<Budget> {
        let mut candidate = self.get(id)?;
        patch.apply_to(&mut candidate);
        candidate
            .validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;
        if let Some(category_id) = patch.category_id {
            self.expense_category(category_id)?;
        }

        self.storage.budgets.update(id, patch)
    }

    pub fn delete(&self, id: BudgetId) -> FinanceResult<bool> {
        let deleted = self.storage.budgets.delete(id)?;
        info!(%id, "budget deleted");
        Ok(deleted)
    }

    /// Write the recomputed spend for `month` back to every budget's stored
    /// `spent` in one batch. Returns the refreshed budgets.
    pub fn refresh_spent(&self, month: u32, year: i32) -> FinanceResult<Vec<Budget>> {
        let statuses = self.status_for_month(month, year)?;
        let changes: Vec<(BudgetId, BudgetPatch)> = statuses
            .iter()
            .filter(|s| s.budget.spent != s.spent)
            .map(|s| {
                (
                    s.budget.id,
                    BudgetPatch {
                        spent: Some(s.spent),
                        ..Default::default()
                    },
                )
            })
            .collect();

        if changes.is_empty() {
            return self.list();
        }
        info!(count = changes.len(), month, year, "refreshing cached budget spend");
        self.storage.budgets.update_many(changes)?;
        self.list()
    }

    fn expense_category(&self, id: CategoryId) -> FinanceResult<Category> {
        let category = self.storage.categories.get_by_id(id).map_err(|e| {
            if e.is_not_found() {
                FinanceError::Validation(format!("Category {} does not exist", id))
            } else {
                e
            }
        })?;
        if category.category_type != CategoryType::Expense {
            return Err(FinanceError::Validation(format!(
                "Budgets need an expense category; '{}' is an income category",
                category.name
            )));
        }
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_recomputes_spent() {
        let storage = Storage::in_memory().unwrap();
        let service = BudgetService::new(&storage);

        let statuses = service.status_for_month(1, 2024).unwrap();
        let food = statuses
            .iter()
            .find(|s| s.budget.category_id == CategoryId::new(3))
            .unwrap();
        assert_eq!(food.spent, Money::from_cents(8645 + 6820));
        assert_eq!(food.remaining, Money::from_units(500) - food.spent);
        assert!(!food.is_over_budget());

        let fun = statuses
            .iter()
            .find(|s| s.budget.category_id == CategoryId::new(6))
            .unwrap();
        assert!(fun.is_over_budget());
        assert_eq!(fun.progress, 100.0);
        assert_eq!(fun.remaining, Money::zero());
        assert_eq!(fun.overspend, Money::from_cents(750));
    }

    #[test]
    fn test_other_month_has_no_spend() {
        let storage = Storage::in_memory().unwrap();
        let service = BudgetService::new(&storage);
        let statuses = service.status_for_month(6, 2024).unwrap();
        assert!(statuses.iter().all(|s| s.spent.is_zero() && s.progress == 0.0));
    }

    #[test]
    fn test_create_validates_category() {
        let storage = Storage::in_memory().unwrap();
        let service = BudgetService::new(&storage);

        let budget = service
            .create("", Money::from_units(60), BudgetPeriod::Monthly, CategoryId::new(8))
            .unwrap();
        assert_eq!(budget.name, "Healthcare");
        assert_eq!(budget.spent, Money::zero());

        let err = service
            .create("Pay", Money::from_units(60), BudgetPeriod::Monthly, CategoryId::new(1))
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .create("Ghost", Money::from_units(60), BudgetPeriod::Monthly, CategoryId::new(99))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_refresh_spent_writes_cache() {
        let storage = Storage::in_memory().unwrap();
        let service = BudgetService::new(&storage);

        let refreshed = service.refresh_spent(2, 2024).unwrap();
        assert!(refreshed.iter().all(|b| b.spent.is_zero()));
    }

    #[test]
    fn test_edit_rejects_zero_amount() {
        let storage = Storage::in_memory().unwrap();
        let service = BudgetService::new(&storage);
        let err = service
            .edit(
                BudgetId::new(1),
                BudgetPatch {
                    amount: Some(Money::zero()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
    }
}
