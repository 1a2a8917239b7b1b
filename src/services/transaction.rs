//! Transaction service
//!
//! Filtered listing, and add/edit/delete with the checks the entry forms
//! apply before anything reaches storage.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{
    Account, AccountId, Category, CategoryId, CategoryType, Money, Transaction, TransactionId,
    TransactionPatch, TransactionType,
};
use crate::storage::Storage;

/// Filter options for listing transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Case-insensitive match on the description, or a substring of the amount
    pub search: Option<String>,
    /// Inclusive
    pub start_date: Option<NaiveDate>,
    /// Inclusive
    pub end_date: Option<NaiveDate>,
    pub account_id: Option<AccountId>,
    pub category_id: Option<CategoryId>,
    pub transaction_type: Option<TransactionType>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(term) = self.search.as_deref().filter(|t| !t.is_empty()) {
            let in_description = txn
                .description
                .to_lowercase()
                .contains(&term.to_lowercase());
            if !in_description && !amount_text(txn.amount).contains(term) {
                return false;
            }
        }
        if self.start_date.is_some_and(|start| txn.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| txn.date > end) {
            return false;
        }
        if self.account_id.is_some_and(|id| txn.account_id != id) {
            return false;
        }
        if self.category_id.is_some_and(|id| txn.category_id != id) {
            return false;
        }
        if self
            .transaction_type
            .is_some_and(|kind| txn.transaction_type != kind)
        {
            return false;
        }
        true
    }
}

/// Plain decimal text of an amount as the search box sees it: `4200`, `86.45`,
/// `112.3`
fn amount_text(amount: Money) -> String {
    if amount.cents_part() == 0 {
        return amount.units().to_string();
    }
    let text = format!("{}.{:02}", amount.units(), amount.cents_part());
    text.trim_end_matches('0').to_string()
}

/// A transaction with the names of what it references
#[derive(Debug, Clone)]
pub struct TransactionDetail {
    pub transaction: Transaction,
    pub category: Option<Category>,
    pub account: Option<Account>,
}

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Matching transactions, newest first
    pub fn list(&self, filter: &TransactionFilter) -> FinanceResult<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();

        // Some remote tables ignore orderBy
        transactions.sort_by(|a, b| b.date.cmp(&a.date));

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }
        Ok(transactions)
    }

    /// Matching transactions joined with their category and account
    pub fn list_detailed(&self, filter: &TransactionFilter) -> FinanceResult<Vec<TransactionDetail>> {
        let transactions = self.list(filter)?;
        let categories = self.storage.categories.get_all()?;
        let accounts = self.storage.accounts.get_all()?;

        Ok(transactions
            .into_iter()
            .map(|transaction| TransactionDetail {
                category: categories
                    .iter()
                    .find(|c| c.id == transaction.category_id)
                    .cloned(),
                account: accounts
                    .iter()
                    .find(|a| a.id == transaction.account_id)
                    .cloned(),
                transaction,
            })
            .collect())
    }

    pub fn get(&self, id: TransactionId) -> FinanceResult<Transaction> {
        self.storage.transactions.get_by_id(id)
    }

    /// One transaction joined with its category and account
    pub fn get_detailed(&self, id: TransactionId) -> FinanceResult<TransactionDetail> {
        let transaction = self.get(id)?;
        let category = self
            .storage
            .categories
            .get_by_id(transaction.category_id)
            .map(Some)
            .or_else(|e| if e.is_not_found() { Ok(None) } else { Err(e) })?;
        let account = self
            .storage
            .accounts
            .get_by_id(transaction.account_id)
            .map(Some)
            .or_else(|e| if e.is_not_found() { Ok(None) } else { Err(e) })?;
        Ok(TransactionDetail {
            transaction,
            category,
            account,
        })
    }

    /// Record a new transaction
    pub fn add(&self, patch: TransactionPatch) -> FinanceResult<Transaction> {
        let mut candidate = Transaction::default();
        patch.apply_to(&mut candidate);
        if patch.date.is_none() {
            return Err(FinanceError::Validation("Date is required".into()));
        }
        self.check(&candidate)?;

        let txn = self.storage.transactions.create(patch)?;
        info!(id = %txn.id, amount = %txn.amount, kind = %txn.transaction_type, "transaction added");
        Ok(txn)
    }

    /// Change some fields of an existing transaction
    pub fn edit(&self, id: TransactionId, patch: TransactionPatch) -> FinanceResult<Transaction> {
        let mut candidate = self.get(id)?;
        patch.apply_to(&mut candidate);
        self.check(&candidate)?;

        self.storage.transactions.update(id, patch)
    }

    /// Re-create transactions read from an export under fresh ids. All of
    /// them are checked before any is written.
    pub fn import(&self, transactions: &[Transaction]) -> FinanceResult<Vec<Transaction>> {
        let patches = transactions
            .iter()
            .map(|txn| {
                self.check(txn)?;
                let mut patch = TransactionPatch::new(
                    txn.transaction_type,
                    txn.amount,
                    txn.description.clone(),
                    txn.date,
                    txn.category_id,
                    txn.account_id,
                );
                patch.tags = Some(txn.tags.clone());
                Ok(patch)
            })
            .collect::<FinanceResult<Vec<_>>>()?;
        if patches.is_empty() {
            return Ok(Vec::new());
        }

        let created = self.storage.transactions.create_many(patches)?;
        info!(count = created.len(), "transactions imported");
        Ok(created)
    }

    pub fn delete(&self, id: TransactionId) -> FinanceResult<bool> {
        let deleted = self.storage.transactions.delete(id)?;
        info!(%id, "transaction deleted");
        Ok(deleted)
    }

    /// Field checks, then the referenced category and account must exist and
    /// the category must match the transaction's direction
    fn check(&self, txn: &Transaction) -> FinanceResult<()> {
        txn.validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        let category = self
            .storage
            .categories
            .get_by_id(txn.category_id)
            .map_err(|e| missing_reference(e, "Category", txn.category_id.get()))?;
        self.storage
            .accounts
            .get_by_id(txn.account_id)
            .map_err(|e| missing_reference(e, "Account", txn.account_id.get()))?;

        let expected = match txn.transaction_type {
            TransactionType::Income => CategoryType::Income,
            TransactionType::Expense => CategoryType::Expense,
        };
        if category.category_type != expected {
            return Err(FinanceError::Validation(format!(
                "Category '{}' is for {} transactions, not {}",
                category.name,
                category.category_type.to_string().to_lowercase(),
                txn.transaction_type
            )));
        }
        Ok(())
    }
}

fn missing_reference(err: FinanceError, entity: &str, id: i64) -> FinanceError {
    if err.is_not_found() {
        FinanceError::Validation(format!("{} {} does not exist", entity, id))
    } else {
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn coffee() -> TransactionPatch {
        TransactionPatch::new(
            TransactionType::Expense,
            Money::from_cents(475),
            "Coffee beans",
            date(2024, 1, 20),
            CategoryId::new(3),
            AccountId::new(1),
        )
    }

    #[test]
    fn test_amount_text() {
        assert_eq!(amount_text(Money::from_cents(420000)), "4200");
        assert_eq!(amount_text(Money::from_cents(8645)), "86.45");
        assert_eq!(amount_text(Money::from_cents(11230)), "112.3");
        assert_eq!(amount_text(Money::zero()), "0");
    }

    #[test]
    fn test_add_and_list_newest_first() {
        let storage = Storage::in_memory().unwrap();
        let service = TransactionService::new(&storage);

        let added = service.add(coffee()).unwrap();
        assert_eq!(added.name, "Coffee beans");

        let all = service.list(&TransactionFilter::new()).unwrap();
        assert_eq!(all[0].id, added.id);
        assert!(all.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn test_search_matches_description_or_amount() {
        let storage = Storage::in_memory().unwrap();
        let service = TransactionService::new(&storage);

        let by_text = service
            .list(&TransactionFilter::new().search("GROCERY"))
            .unwrap();
        assert_eq!(by_text.len(), 1);
        assert_eq!(by_text[0].description, "Grocery run");

        let by_amount = service.list(&TransactionFilter::new().search("86.4")).unwrap();
        assert_eq!(by_amount.len(), 1);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let storage = Storage::in_memory().unwrap();
        let service = TransactionService::new(&storage);

        let filter =
            TransactionFilter::new().date_range(Some(date(2024, 1, 3)), Some(date(2024, 1, 5)));
        let hits = service.list(&filter).unwrap();
        let dates: Vec<NaiveDate> = hits.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 5), date(2024, 1, 3)]);
    }

    #[test]
    fn test_limit() {
        let storage = Storage::in_memory().unwrap();
        let service = TransactionService::new(&storage);
        assert_eq!(service.list(&TransactionFilter::new().limit(3)).unwrap().len(), 3);
    }

    #[test]
    fn test_add_requires_fields() {
        let storage = Storage::in_memory().unwrap();
        let service = TransactionService::new(&storage);

        let mut patch = coffee();
        patch.amount = Some(Money::zero());
        assert!(service.add(patch).unwrap_err().is_validation());

        let mut patch = coffee();
        patch.description = Some(String::new());
        assert!(service.add(patch).unwrap_err().is_validation());

        let mut patch = coffee();
        patch.account_id = Some(AccountId::new(999));
        let err = service.add(patch).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Validation error: Account 999 does not exist");
    }

    #[test]
    fn test_add_rejects_mismatched_category() {
        let storage = Storage::in_memory().unwrap();
        let service = TransactionService::new(&storage);

        let mut patch = coffee();
        patch.category_id = Some(CategoryId::new(1));
        assert!(service.add(patch).unwrap_err().is_validation());
    }

    #[test]
    fn test_import_assigns_fresh_ids() {
        let storage = Storage::in_memory().unwrap();
        let service = TransactionService::new(&storage);
        let existing = service.list(&TransactionFilter::new()).unwrap();

        let imported = service.import(&existing[..3]).unwrap();
        assert_eq!(imported.len(), 3);
        for (copy, original) in imported.iter().zip(&existing[..3]) {
            assert_ne!(copy.id, original.id);
            assert_eq!(copy.description, original.description);
            assert_eq!(copy.amount, original.amount);
            assert_eq!(copy.date, original.date);
        }
        assert_eq!(
            service.list(&TransactionFilter::new()).unwrap().len(),
            existing.len() + 3
        );
    }

    #[test]
    fn test_import_writes_nothing_when_one_is_invalid() {
        let storage = Storage::in_memory().unwrap();
        let service = TransactionService::new(&storage);
        let mut batch = service.list(&TransactionFilter::new().limit(2)).unwrap();
        let before = service.list(&TransactionFilter::new()).unwrap().len();

        batch[1].account_id = AccountId::new(999);
        assert!(service.import(&batch).unwrap_err().is_validation());
        assert_eq!(service.list(&TransactionFilter::new()).unwrap().len(), before);
    }

    #[test]
    fn test_edit_merges_and_delete() {
        let storage = Storage::in_memory().unwrap();
        let service = TransactionService::new(&storage);

        let edited = service
            .edit(
                TransactionId::new(2),
                TransactionPatch {
                    amount: Some(Money::from_cents(9000)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(edited.description, "Grocery run");
        assert_eq!(edited.amount, Money::from_cents(9000));

        assert!(service.delete(TransactionId::new(2)).unwrap());
        assert!(service.get(TransactionId::new(2)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_detailed_joins_names() {
        let storage = Storage::in_memory().unwrap();
        let service = TransactionService::new(&storage);
        let details = service
            .list_detailed(&TransactionFilter::new().search("Electric"))
            .unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].category.as_ref().unwrap().name, "Bills & Utilities");
        assert_eq!(details[0].account.as_ref().unwrap().name, "Main Checking");
    }

    #[test]
    fn test_get_detailed_tolerates_dangling_reference() {
        let storage = Storage::in_memory().unwrap();
        let service = TransactionService::new(&storage);
        storage.accounts.delete(AccountId::new(4)).unwrap();

        let detail = service.get_detailed(TransactionId::new(5)).unwrap();
        assert_eq!(detail.category.unwrap().name, "Entertainment");
        assert!(detail.account.is_none());
    }
}
