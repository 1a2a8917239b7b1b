//! Spending Report
//!
//! Expense breakdown by category for one month, the data behind the expense
//! chart.

use std::io::Write;

use crate::calculations;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{CategoryId, Money, TransactionType};
use crate::storage::Storage;

/// Spending in one category
#[derive(Debug, Clone)]
pub struct SpendingByCategory {
    pub category_id: CategoryId,
    pub category_name: String,
    pub total_spending: Money,
    pub transaction_count: usize,
    /// Share of the month's expenses
    pub percentage: f64,
}

/// Spending Report
#[derive(Debug, Clone)]
pub struct SpendingReport {
    pub month: u32,
    pub year: i32,
    /// Largest first
    pub categories: Vec<SpendingByCategory>,
    pub total_spending: Money,
    pub total_income: Money,
    /// Every transaction dated in the month, income included
    pub total_activity: Money,
    pub total_transactions: usize,
}

impl SpendingReport {
    /// Generate a spending report for `month` of `year`
    pub fn generate(storage: &Storage, month: u32, year: i32) -> FinanceResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(FinanceError::Validation(format!(
                "Month must be 1-12, got {}",
                month
            )));
        }

        let categories = storage.categories.get_all()?;
        let transactions: Vec<_> = storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|t| t.in_month(month, year))
            .collect();

        let total_spending =
            calculations::monthly_total(&transactions, TransactionType::Expense, month, year);
        let total_income =
            calculations::monthly_total(&transactions, TransactionType::Income, month, year);

        let breakdown = calculations::top_categories(&transactions, &categories, usize::MAX)
            .into_iter()
            .map(|entry| SpendingByCategory {
                transaction_count: transactions
                    .iter()
                    .filter(|t| t.is_expense() && t.category_id == entry.category_id)
                    .count(),
                category_name: entry
                    .category
                    .map(|c| c.name)
                    .unwrap_or_else(|| format!("Category #{}", entry.category_id)),
                percentage: entry.amount.percent_of(total_spending),
                total_spending: entry.amount,
                category_id: entry.category_id,
            })
            .collect();

        Ok(Self {
            month,
            year,
            categories: breakdown,
            total_spending,
            total_income,
            total_activity: calculations::monthly_spending(&transactions, month, year),
            total_transactions: transactions.len(),
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Spending Report: {}-{:02}\n", self.year, self.month));
        output.push_str(&"=".repeat(70));
        output.push('\n');
        output.push_str(&format!(
            "Total Spending: {}\n",
            self.total_spending.format_with_symbol(currency_symbol)
        ));
        output.push_str(&format!(
            "Total Income: {}\n",
            self.total_income.format_with_symbol(currency_symbol)
        ));
        output.push_str(&format!("Total Transactions: {}\n\n", self.total_transactions));

        output.push_str(&format!(
            "{:<35} {:>14} {:>8} {:>8}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(70));
        output.push('\n');

        for category in &self.categories {
            output.push_str(&format!(
                "{:<35} {:>14} {:>8} {:>7.1}%\n",
                category.category_name,
                category.total_spending.format_with_symbol(currency_symbol),
                category.transaction_count,
                category.percentage
            ));
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> FinanceResult<()> {
        let export_err = |e: std::io::Error| FinanceError::Export(e.to_string());

        writeln!(writer, "Month,Category,Amount,Transaction Count,Percentage").map_err(export_err)?;
        let month = format!("{}-{:02}", self.year, self.month);
        for category in &self.categories {
            writeln!(
                writer,
                "{},{},{:.2},{},{:.2}",
                month,
                category.category_name,
                category.total_spending.to_units_f64(),
                category.transaction_count,
                category.percentage
            )
            .map_err(export_err)?;
        }
        writeln!(
            writer,
            "{},TOTAL,{:.2},{},100.00",
            month,
            self.total_spending.to_units_f64(),
            self.total_transactions
        )
        .map_err(export_err)?;

        Ok(())
    }
}
