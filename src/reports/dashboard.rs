//! Dashboard Report
//!
//! The overview figures: balances, this month's income and expenses against
//! last month, budget and goal counts, and where the money went.

use std::io::Write;
use std::thread::{self, ScopedJoinHandle};

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::calculations::{self, CategoryAmount};
use crate::display::transaction::format_transaction_register;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{GoalStatus, Money, Transaction, TransactionType};
use crate::services::TransactionDetail;
use crate::storage::Storage;

/// Expense categories shown in the month breakdown
pub const DASHBOARD_TOP_CATEGORIES: usize = 6;

/// Transactions shown in the recent list
pub const DASHBOARD_RECENT_TRANSACTIONS: usize = 8;

/// Dashboard Report
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub month: u32,
    pub year: i32,
    /// Running balances summed over every account
    pub total_balance: Money,
    pub current_month_income: Money,
    pub current_month_expenses: Money,
    pub previous_month_expenses: Money,
    /// Percentage change in expenses from the previous month
    pub expense_trend: f64,
    /// Sum of every budget's allocation
    pub total_budget: Money,
    pub active_goals: usize,
    pub account_count: usize,
    /// This month's expenses by category, largest first
    pub top_categories: Vec<CategoryAmount>,
    /// Newest first, joined with their category and account
    pub recent_transactions: Vec<TransactionDetail>,
}

impl DashboardReport {
    /// Build the dashboard for the month containing `today`.
    ///
    /// The five collections are fetched concurrently and all of them must
    /// succeed; the first failure (in entity order) is returned.
    pub fn generate(storage: &Storage, today: NaiveDate) -> FinanceResult<Self> {
        let (accounts, transactions, categories, budgets, goals) = thread::scope(|s| {
            let accounts = s.spawn(|| storage.accounts.get_all());
            let transactions = s.spawn(|| storage.transactions.get_all());
            let categories = s.spawn(|| storage.categories.get_all());
            let budgets = s.spawn(|| storage.budgets.get_all());
            let goals = s.spawn(|| storage.goals.get_all());
            (
                joined(accounts, "accounts"),
                joined(transactions, "transactions"),
                joined(categories, "categories"),
                joined(budgets, "budgets"),
                joined(goals, "goals"),
            )
        });
        let accounts = accounts?;
        let mut transactions = transactions?;
        let categories = categories?;
        let budgets = budgets?;
        let goals = goals?;
        debug!(
            accounts = accounts.len(),
            transactions = transactions.len(),
            "dashboard data loaded"
        );

        let (month, year) = (today.month(), today.year());
        let (prev_month, prev_year) = calculations::previous_month(month, year);

        let current_month_income =
            calculations::monthly_total(&transactions, TransactionType::Income, month, year);
        let current_month_expenses =
            calculations::monthly_total(&transactions, TransactionType::Expense, month, year);
        let previous_month_expenses = calculations::monthly_total(
            &transactions,
            TransactionType::Expense,
            prev_month,
            prev_year,
        );

        let total_balance = accounts
            .iter()
            .map(|a| calculations::running_balance(a, &transactions))
            .sum();

        let this_month: Vec<Transaction> = transactions
            .iter()
            .filter(|t| t.in_month(month, year))
            .cloned()
            .collect();
        let top_categories =
            calculations::top_categories(&this_month, &categories, DASHBOARD_TOP_CATEGORIES);

        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        transactions.truncate(DASHBOARD_RECENT_TRANSACTIONS);
        let recent_transactions = transactions
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
            .collect();

        Ok(Self {
            month,
            year,
            total_balance,
            current_month_income,
            current_month_expenses,
            previous_month_expenses,
            expense_trend: calculations::trend(current_month_expenses, previous_month_expenses),
            total_budget: budgets.iter().map(|b| b.amount).sum(),
            active_goals: goals
                .iter()
                .filter(|g| g.status == GoalStatus::Active)
                .count(),
            account_count: accounts.len(),
            top_categories,
            recent_transactions,
        })
    }

    /// Income minus expenses for the current month
    pub fn net_this_month(&self) -> Money {
        self.current_month_income - self.current_month_expenses
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str, date_format: &str) -> String {
        let money = |m: Money| m.format_with_symbol(currency_symbol);
        let mut output = String::new();

        output.push_str(&format!("Dashboard - {}-{:02}\n", self.year, self.month));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        output.push_str(&format!(
            "{:<24} {:>20}  ({} accounts)\n",
            "Total Balance",
            money(self.total_balance),
            self.account_count
        ));
        output.push_str(&format!(
            "{:<24} {:>20}\n",
            "Monthly Income",
            money(self.current_month_income)
        ));
        output.push_str(&format!(
            "{:<24} {:>20}  ({:+.1}% vs last month)\n",
            "Monthly Expenses",
            money(self.current_month_expenses),
            self.expense_trend
        ));
        output.push_str(&format!("{:<24} {:>20}\n", "Net This Month", money(self.net_this_month())));
        output.push_str(&format!("{:<24} {:>20}\n", "Total Budgeted", money(self.total_budget)));
        output.push_str(&format!("{:<24} {:>20}\n", "Active Goals", self.active_goals));

        if !self.top_categories.is_empty() {
            output.push_str("\nTop expenses this month\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for entry in &self.top_categories {
                let name = entry
                    .category
                    .as_ref()
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| format!("Category #{}", entry.category_id));
                output.push_str(&format!("  {:<30} {:>20}\n", name, money(entry.amount)));
            }
        }

        output.push_str("\nRecent transactions\n");
        output.push_str(&format_transaction_register(
            &self.recent_transactions,
            currency_symbol,
            date_format,
        ));

        output
    }

    /// Export the headline figures as `metric,value` CSV rows
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> FinanceResult<()> {
        let rows = [
            ("total_balance", self.total_balance),
            ("current_month_income", self.current_month_income),
            ("current_month_expenses", self.current_month_expenses),
            ("net_this_month", self.net_this_month()),
            ("previous_month_expenses", self.previous_month_expenses),
            ("total_budget", self.total_budget),
        ];

        let export_err = |e: std::io::Error| FinanceError::Export(e.to_string());
        writeln!(writer, "Metric,Value").map_err(export_err)?;
        for (metric, value) in rows {
            writeln!(writer, "{},{:.2}", metric, value.to_units_f64()).map_err(export_err)?;
        }
        writeln!(writer, "expense_trend,{:.2}", self.expense_trend).map_err(export_err)?;
        writeln!(writer, "active_goals,{}", self.active_goals).map_err(export_err)?;
        writeln!(writer, "account_count,{}", self.account_count).map_err(export_err)?;
        Ok(())
    }
}

fn joined<T>(handle: ScopedJoinHandle<'_, FinanceResult<T>>, what: &str) -> FinanceResult<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(FinanceError::Storage(format!("loading {} panicked", what))))
}
