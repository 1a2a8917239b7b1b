//! Category service
//!
//! Categories are read-only here: listing, lookup, and the per-category
//! totals the charts were drawn from.

use crate::calculations;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Category, CategoryId, CategoryType, Money};
use crate::storage::Storage;

/// Service for category lookups
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

/// A category with the total of every transaction filed under it
#[derive(Debug, Clone)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Money,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All categories, or only those of one type
    pub fn list(&self, kind: Option<CategoryType>) -> FinanceResult<Vec<Category>> {
        let categories = self.storage.categories.get_all()?;
        Ok(match kind {
            Some(kind) => categories
                .into_iter()
                .filter(|c| c.category_type == kind)
                .collect(),
            None => categories,
        })
    }

    pub fn get(&self, id: CategoryId) -> FinanceResult<Category> {
        self.storage.categories.get_by_id(id)
    }

    /// Find a category by id or by name, case-insensitive
    pub fn find(&self, identifier: &str) -> FinanceResult<Category> {
        if let Ok(id) = identifier.parse::<CategoryId>() {
            return self.get(id);
        }

        let wanted = identifier.trim().to_lowercase();
        self.list(None)?
            .into_iter()
            .find(|c| c.name.to_lowercase() == wanted)
            .ok_or_else(|| FinanceError::category_not_found(identifier))
    }

    /// Categories with their all-time transaction totals
    pub fn list_with_totals(&self, kind: Option<CategoryType>) -> FinanceResult<Vec<CategoryTotal>> {
        let categories = self.list(kind)?;
        let transactions = self.storage.transactions.get_all()?;
        Ok(categories
            .into_iter()
            .map(|category| CategoryTotal {
                total: calculations::category_total(&transactions, category.id),
                category,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_by_type() {
        let storage = Storage::in_memory().unwrap();
        let service = CategoryService::new(&storage);

        let all = service.list(None).unwrap();
        let income = service.list(Some(CategoryType::Income)).unwrap();
        let expense = service.list(Some(CategoryType::Expense)).unwrap();
        assert_eq!(all.len(), income.len() + expense.len());
        assert!(income.iter().all(Category::is_income));
    }

    #[test]
    fn test_find_by_name() {
        let storage = Storage::in_memory().unwrap();
        let service = CategoryService::new(&storage);
        assert_eq!(service.find("food & dining").unwrap().id, CategoryId::new(3));
        assert!(service.find("Pets").unwrap_err().is_not_found());
    }

    #[test]
    fn test_totals() {
        let storage = Storage::in_memory().unwrap();
        let service = CategoryService::new(&storage);
        let totals = service.list_with_totals(Some(CategoryType::Expense)).unwrap();
        let food = totals.iter().find(|t| t.category.id == CategoryId::new(3)).unwrap();
        assert_eq!(food.total, Money::from_cents(8645 + 6820));
    }
}
