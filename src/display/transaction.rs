//! Transaction display formatting
//!
//! Register rows and detail views for transactions joined with their
//! category and account names.

use crate::models::TransactionType;
use crate::services::transaction::TransactionDetail;

/// Format a single transaction as a register row
pub fn format_transaction_row(detail: &TransactionDetail, symbol: &str, date_format: &str) -> String {
    let txn = &detail.transaction;
    let marker = match txn.transaction_type {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };
    let category = detail
        .category
        .as_ref()
        .map(|c| c.name.as_str())
        .unwrap_or("(unknown)");
    let account = detail
        .account
        .as_ref()
        .map(|a| a.name.as_str())
        .unwrap_or("(unknown)");

    format!(
        "{:>4} {} {:<14} {:<24} {:<18} {:<16} {:>13}",
        txn.id,
        marker,
        txn.date.format(date_format),
        truncate(&txn.description, 24),
        truncate(category, 18),
        truncate(account, 16),
        txn.signed_amount().format_with_symbol(symbol)
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(
    details: &[TransactionDetail],
    symbol: &str,
    date_format: &str,
) -> String {
    if details.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>4}   {:<14} {:<24} {:<18} {:<16} {:>13}\n",
        "ID", "Date", "Description", "Category", "Account", "Amount"
    ));
    output.push_str(&"-".repeat(96));
    output.push('\n');

    for detail in details {
        output.push_str(&format_transaction_row(detail, symbol, date_format));
        output.push('\n');
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(detail: &TransactionDetail, symbol: &str) -> String {
    let txn = &detail.transaction;
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Type:        {}\n", txn.transaction_type));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!("Description: {}\n", txn.description));
    match &detail.category {
        Some(category) => output.push_str(&format!("Category:    {}\n", category.name)),
        None => output.push_str(&format!("Category:    #{} (missing)\n", txn.category_id)),
    }
    match &detail.account {
        Some(account) => output.push_str(&format!("Account:     {}\n", account.name)),
        None => output.push_str(&format!("Account:     #{} (missing)\n", txn.account_id)),
    }
    if !txn.tags.is_empty() {
        output.push_str(&format!("Tags:        {}\n", txn.tags));
    }

    output
}

/// Truncate a string to at most `max_len` characters, marking the cut
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Money, Transaction, TransactionId};
    use chrono::NaiveDate;

    fn detail() -> TransactionDetail {
        TransactionDetail {
            transaction: Transaction {
                id: TransactionId::new(7),
                transaction_type: TransactionType::Expense,
                amount: Money::from_cents(4250),
                description: "Weekly groceries".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                ..Default::default()
            },
            category: Some(Category {
                name: "Food & Dining".into(),
                ..Default::default()
            }),
            account: None,
        }
    }

    #[test]
    fn test_format_transaction_row() {
        let row = format_transaction_row(&detail(), "$", "%b %d, %Y");
        assert!(row.contains("Jan 15, 2024"));
        assert!(row.contains("Weekly groceries"));
        assert!(row.contains("-$42.50"));
        assert!(row.contains("(unknown)"));
    }

    #[test]
    fn test_format_empty_register() {
        assert!(format_transaction_register(&[], "$", "%Y-%m-%d").contains("No transactions"));
    }

    #[test]
    fn test_format_transaction_details() {
        let output = format_transaction_details(&detail(), "$");
        assert!(output.contains("Transaction: 7"));
        assert!(output.contains("Category:    Food & Dining"));
        assert!(output.contains("(missing)"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
    }
}
