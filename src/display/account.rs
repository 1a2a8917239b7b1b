//! Account display formatting
//!
//! Formats accounts for terminal output in table and detail views.

use crate::models::Money;
use crate::services::account::AccountSummary;

/// Format a list of accounts with running balances as a table
pub fn format_account_list(summaries: &[AccountSummary], symbol: &str) -> String {
    if summaries.is_empty() {
        return "No accounts found.".to_string();
    }

    let name_width = summaries
        .iter()
        .map(|s| s.account.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let type_width = summaries
        .iter()
        .map(|s| s.account.account_type.to_string().len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>4}  {:<name_width$}  {:<type_width$}  {:>14}  {:>6}\n",
        "ID",
        "Name",
        "Type",
        "Balance",
        "Txns",
        name_width = name_width,
        type_width = type_width,
    ));
    let separator = format!(
        "{:->4}  {:-<name_width$}  {:-<type_width$}  {:->14}  {:->6}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        type_width = type_width,
    );
    output.push_str(&separator);

    for summary in summaries {
        output.push_str(&format!(
            "{:>4}  {:<name_width$}  {:<type_width$}  {:>14}  {:>6}\n",
            summary.account.id,
            summary.account.name,
            summary.account.account_type,
            summary.balance.format_with_symbol(symbol),
            summary.transaction_count,
            name_width = name_width,
            type_width = type_width,
        ));
    }

    let total: Money = summaries.iter().map(|s| s.balance).sum();
    output.push_str(&separator);
    output.push_str(&format!(
        "{:>4}  {:<name_width$}  {:<type_width$}  {:>14}\n",
        "",
        "TOTAL",
        "",
        total.format_with_symbol(symbol),
        name_width = name_width,
        type_width = type_width,
    ));

    output
}

/// Format a single account's details
pub fn format_account_details(summary: &AccountSummary, symbol: &str) -> String {
    let account = &summary.account;

    let mut output = String::new();
    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  Type:             {}\n", account.account_type));
    output.push_str(&format!("  ID:               {}\n", account.id));
    output.push_str(&format!("  Color:            {}\n", account.color));
    if !account.tags.is_empty() {
        output.push_str(&format!("  Tags:             {}\n", account.tags));
    }
    output.push('\n');
    output.push_str(&format!(
        "  Starting Balance: {}\n",
        account.balance.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Current Balance:  {}\n",
        summary.balance.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Transactions:     {}\n",
        summary.transaction_count
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountId, AccountType};

    fn summary(id: i64, name: &str, balance: i64) -> AccountSummary {
        AccountSummary {
            account: Account {
                id: AccountId::new(id),
                name: name.into(),
                account_type: AccountType::Checking,
                ..Default::default()
            },
            balance: Money::from_cents(balance),
            transaction_count: 2,
        }
    }

    #[test]
    fn test_format_account_list() {
        let output = format_account_list(
            &[summary(1, "Checking", 100000), summary(2, "Savings", 500000)],
            "$",
        );
        assert!(output.contains("Checking"));
        assert!(output.contains("Savings"));
        assert!(output.contains("TOTAL"));
        assert!(output.contains("$6,000.00"));
    }

    #[test]
    fn test_format_empty_list() {
        assert!(format_account_list(&[], "$").contains("No accounts found"));
    }

    #[test]
    fn test_format_account_details() {
        let output = format_account_details(&summary(3, "My Account", 12345), "€");
        assert!(output.contains("My Account"));
        assert!(output.contains("Current Balance:  €123.45"));
    }
}
