//! Account service
//!
//! Account CRUD with validation, and the running balances the account cards
//! show.

use tracing::info;

use crate::calculations;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Account, AccountId, AccountPatch, AccountType, Money, Transaction};
use crate::storage::Storage;

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

/// An account with its derived figures
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub account: Account,
    /// Starting balance plus net transaction delta
    pub balance: Money,
    pub transaction_count: usize,
}

impl AccountSummary {
    fn build(account: Account, transactions: &[Transaction]) -> Self {
        let balance = calculations::running_balance(&account, transactions);
        let transaction_count = transactions
            .iter()
            .filter(|t| t.account_id == account.id)
            .count();
        Self {
            account,
            balance,
            transaction_count,
        }
    }
}

impl<'a> AccountService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> FinanceResult<Vec<Account>> {
        self.storage.accounts.get_all()
    }

    pub fn get(&self, id: AccountId) -> FinanceResult<Account> {
        self.storage.accounts.get_by_id(id)
    }

    /// Find an account by id (`7` or `#7`) or by name, case-insensitive
    pub fn find(&self, identifier: &str) -> FinanceResult<Account> {
        if let Ok(id) = identifier.parse::<AccountId>() {
            return self.get(id);
        }

        let wanted = identifier.trim().to_lowercase();
        self.list()?
            .into_iter()
            .find(|a| a.name.to_lowercase() == wanted)
            .ok_or_else(|| FinanceError::account_not_found(identifier))
    }

    /// Every account with its running balance
    pub fn list_with_balances(&self) -> FinanceResult<Vec<AccountSummary>> {
        let accounts = self.list()?;
        let transactions = self.storage.transactions.get_all()?;
        Ok(accounts
            .into_iter()
            .map(|account| AccountSummary::build(account, &transactions))
            .collect())
    }

    pub fn get_summary(&self, id: AccountId) -> FinanceResult<AccountSummary> {
        let account = self.get(id)?;
        let transactions = self.storage.transactions.get_all()?;
        Ok(AccountSummary::build(account, &transactions))
    }

    /// Sum of running balances over every account
    pub fn total_balance(&self) -> FinanceResult<Money> {
        Ok(self
            .list_with_balances()?
            .iter()
            .map(|s| s.balance)
            .sum())
    }

    pub fn create(
        &self,
        name: &str,
        account_type: AccountType,
        starting_balance: Money,
        color: Option<String>,
    ) -> FinanceResult<Account> {
        let mut patch = AccountPatch::new(name.trim(), account_type, starting_balance);
        if let Some(color) = color {
            patch = patch.with_color(color);
        }

        let mut candidate = Account::default();
        patch.apply_to(&mut candidate);
        candidate
            .validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        let account = self.storage.accounts.create(patch)?;
        info!(id = %account.id, name = %account.name, "account created");
        Ok(account)
    }

    /// Apply a partial update after validating the merged result
    pub fn update(&self, id: AccountId, patch: AccountPatch) -> FinanceResult<Account> {
        let mut candidate = self.get(id)?;
        patch.apply_to(&mut candidate);
        candidate
            .validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        self.storage.accounts.update(id, patch)
    }

    pub fn delete(&self, id: AccountId) -> FinanceResult<bool> {
        let deleted = self.storage.accounts.delete(id)?;
        info!(%id, "account deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_find() {
        let storage = Storage::in_memory().unwrap();
        let service = AccountService::new(&storage);

        let account = service
            .create("  Brokerage Cash ", AccountType::Cash, Money::from_units(50), None)
            .unwrap();
        assert_eq!(account.name, "Brokerage Cash");
        assert_eq!(account.color, "#F59E0B");

        assert_eq!(service.find("brokerage cash").unwrap().id, account.id);
        assert_eq!(service.find(&format!("#{}", account.id)).unwrap().id, account.id);
        assert!(service.find("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let storage = Storage::in_memory().unwrap();
        let service = AccountService::new(&storage);
        let err = service
            .create("   ", AccountType::Checking, Money::zero(), None)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_running_balance_uses_starting_balance() {
        let storage = Storage::in_memory().unwrap();
        let service = AccountService::new(&storage);
        let account = service
            .create("Fresh", AccountType::Checking, Money::from_units(100), None)
            .unwrap();

        let summary = service.get_summary(account.id).unwrap();
        assert_eq!(summary.balance, Money::from_units(100));
        assert_eq!(summary.transaction_count, 0);
    }

    #[test]
    fn test_update_validates_merged_account() {
        let storage = Storage::in_memory().unwrap();
        let service = AccountService::new(&storage);

        let err = service
            .update(
                AccountId::new(1),
                AccountPatch {
                    name: Some(String::new()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());

        let updated = service
            .update(
                AccountId::new(1),
                AccountPatch {
                    account_type: Some(AccountType::Savings),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Main Checking");
        assert_eq!(updated.account_type, AccountType::Savings);
    }
}
