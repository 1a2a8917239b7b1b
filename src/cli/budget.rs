//! Budget CLI commands
//!
//! Budget status for a month, and budget management.

use clap::Subcommand;

use super::{parse_money, parse_month, today};
use crate::config::Settings;
use crate::display::budget::format_budget_table;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{BudgetId, BudgetPatch, BudgetPeriod};
use crate::services::{BudgetService, CategoryService};
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show every budget against a month's spending
    List {
        /// Month (e.g., "2024-01", "current", "last")
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Create a budget for an expense category
    Create {
        /// Category name or ID
        category: String,
        /// Amount allocated per period
        amount: String,
        /// Budget name; defaults to the category name
        #[arg(short, long)]
        name: Option<String>,
        /// weekly, monthly or yearly
        #[arg(short, long, default_value = "monthly")]
        period: String,
    },
    /// Edit a budget
    Edit {
        /// Budget ID
        id: BudgetId,
        #[arg(long)]
        amount: Option<String>,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        period: Option<String>,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete a budget
    Delete {
        /// Budget ID
        id: BudgetId,
    },
    /// Store each budget's spend for a month
    Refresh {
        #[arg(short, long)]
        month: Option<String>,
    },
}

fn parse_period(raw: &str) -> FinanceResult<BudgetPeriod> {
    BudgetPeriod::parse(raw).ok_or_else(|| {
        FinanceError::Validation(format!(
            "Invalid budget period: '{}'. Use weekly, monthly or yearly",
            raw
        ))
    })
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> FinanceResult<()> {
    let service = BudgetService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::List { month } => {
            let (month, year) = parse_month(month.as_deref(), today())?;
            let statuses = service.status_for_month(month, year)?;
            println!("Budgets for {}-{:02}", year, month);
            println!();
            print!("{}", format_budget_table(&statuses, symbol));
        }

        BudgetCommands::Create {
            category,
            amount,
            name,
            period,
        } => {
            let category = CategoryService::new(storage).find(&category)?;
            let budget = service.create(
                name.as_deref().unwrap_or(""),
                parse_money(&amount)?,
                parse_period(&period)?,
                category.id,
            )?;
            println!(
                "Created budget #{}: {} {} {} for {}",
                budget.id,
                budget.name,
                budget.amount.format_with_symbol(symbol),
                budget.period,
                category.name
            );
        }

        BudgetCommands::Edit {
            id,
            amount,
            name,
            period,
            category,
        } => {
            let patch = BudgetPatch {
                name,
                amount: amount.as_deref().map(parse_money).transpose()?,
                period: period.as_deref().map(parse_period).transpose()?,
                category_id: match category {
                    Some(c) => Some(CategoryService::new(storage).find(&c)?.id),
                    None => None,
                },
                ..Default::default()
            };
            if patch == BudgetPatch::default() {
                println!("No changes specified.");
                return Ok(());
            }

            let budget = service.edit(id, patch)?;
            println!("Updated budget #{}: {}", budget.id, budget);
        }

        BudgetCommands::Delete { id } => {
            service.delete(id)?;
            println!("Deleted budget #{}", id);
        }

        BudgetCommands::Refresh { month } => {
            let (month, year) = parse_month(month.as_deref(), today())?;
            let budgets = service.refresh_spent(month, year)?;
            println!(
                "Refreshed spend for {} budgets ({}-{:02})",
                budgets.len(),
                year,
                month
            );
        }
    }

    Ok(())
}
