//! Derived figures over already-fetched entities
//!
//! Everything here is a pure function of its arguments. Months are 1-based
//! (1 = January).

use crate::models::{Account, AccountId, Category, CategoryId, Money, Transaction, TransactionType};

/// Number of categories [`top_categories`] returns unless told otherwise
pub const DEFAULT_TOP_CATEGORIES: usize = 5;

/// Net transaction delta for one account: income minus expenses. The
/// account's starting balance is not included.
pub fn account_balance(transactions: &[Transaction], account_id: AccountId) -> Money {
    transactions
        .iter()
        .filter(|t| t.account_id == account_id)
        .map(Transaction::signed_amount)
        .sum()
}

/// Starting balance plus net transaction delta. Every balance shown to the
/// user goes through here.
pub fn running_balance(account: &Account, transactions: &[Transaction]) -> Money {
    account.balance + account_balance(transactions, account.id)
}

/// Share of the allocation spent, capped at 100. A zero allocation is 0%.
pub fn budget_progress(spent: Money, allocated: Money) -> f64 {
    if allocated.is_zero() {
        return 0.0;
    }
    spent.percent_of(allocated).min(100.0)
}

/// Allocation left, never negative
pub fn budget_remaining(allocated: Money, spent: Money) -> Money {
    allocated.saturating_remaining(spent)
}

/// Amount spent past the allocation, never negative
pub fn budget_overspend(allocated: Money, spent: Money) -> Money {
    spent.saturating_remaining(allocated)
}

/// Sum of amounts in one category, whatever the transaction type
pub fn category_total(transactions: &[Transaction], category_id: CategoryId) -> Money {
    transactions
        .iter()
        .filter(|t| t.category_id == category_id)
        .map(|t| t.amount)
        .sum()
}

/// Sum of amounts dated in the given month, whatever the transaction type
pub fn monthly_spending(transactions: &[Transaction], month: u32, year: i32) -> Money {
    transactions
        .iter()
        .filter(|t| t.in_month(month, year))
        .map(|t| t.amount)
        .sum()
}

/// Sum of amounts of one type dated in the given month
pub fn monthly_total(
    transactions: &[Transaction],
    kind: TransactionType,
    month: u32,
    year: i32,
) -> Money {
    transactions
        .iter()
        .filter(|t| t.transaction_type == kind && t.in_month(month, year))
        .map(|t| t.amount)
        .sum()
}

/// Expenses in one category for the given month; the authoritative budget
/// "spent" figure
pub fn category_spent_in_month(
    transactions: &[Transaction],
    category_id: CategoryId,
    month: u32,
    year: i32,
) -> Money {
    transactions
        .iter()
        .filter(|t| t.is_expense() && t.category_id == category_id && t.in_month(month, year))
        .map(|t| t.amount)
        .sum()
}

/// A category's share of expenses
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryAmount {
    pub category_id: CategoryId,
    /// `None` when the id matches no known category
    pub category: Option<Category>,
    pub amount: Money,
}

/// Expense totals per category, largest first, at most `limit` entries.
/// Ties keep the order in which categories were first encountered.
pub fn top_categories(
    transactions: &[Transaction],
    categories: &[Category],
    limit: usize,
) -> Vec<CategoryAmount> {
    let mut totals: Vec<(CategoryId, Money)> = Vec::new();
    for txn in transactions.iter().filter(|t| t.is_expense()) {
        match totals.iter_mut().find(|(id, _)| *id == txn.category_id) {
            Some((_, total)) => *total += txn.amount,
            None => totals.push((txn.category_id, txn.amount)),
        }
    }

    // stable
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.truncate(limit);

    totals
        .into_iter()
        .map(|(category_id, amount)| CategoryAmount {
            category_id,
            category: categories.iter().find(|c| c.id == category_id).cloned(),
            amount,
        })
        .collect()
}

/// Percentage change from `previous` to `current`; 0 when `previous` is 0
pub fn trend(current: Money, previous: Money) -> f64 {
    if previous.is_zero() {
        return 0.0;
    }
    (current - previous).percent_of(previous)
}

/// Share of a goal reached, clamped to 0..=100. A non-positive target is 0%.
pub fn goal_progress(current: Money, target: Money) -> f64 {
    if !target.is_positive() {
        return 0.0;
    }
    current.percent_of(target).clamp(0.0, 100.0)
}

/// The month before `(month, year)`; January wraps to December
pub fn previous_month(month: u32, year: i32) -> (u32, i32) {
    if month <= 1 {
        (12, year - 1)
    } else {
        (month - 1, year)
    }
}
