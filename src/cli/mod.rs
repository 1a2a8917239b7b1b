//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod budget;
pub mod category;
pub mod goal;
pub mod report;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use report::{handle_dashboard_command, handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{Datelike, Local, NaiveDate};

use crate::calculations;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{date, Money};

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a money argument such as `12.50`, `$1,200` or `40`
pub fn parse_money(input: &str) -> FinanceResult<Money> {
    Money::parse(input).map_err(|e| {
        FinanceError::Validation(format!(
            "Invalid amount '{}': {}. Use a format like '12.50' or '40'",
            input, e
        ))
    })
}

/// Parse a date argument: `YYYY-MM-DD`, or `today`
pub fn parse_date(input: &str) -> FinanceResult<NaiveDate> {
    if input.trim().eq_ignore_ascii_case("today") {
        return Ok(today());
    }
    date::parse_date(input).ok_or_else(|| {
        FinanceError::Validation(format!("Invalid date '{}': use YYYY-MM-DD", input))
    })
}

/// Resolve a month argument to `(month, year)`.
///
/// Accepts `YYYY-MM`, `current`/`this`, and `last`/`previous`. No argument
/// means the month containing `today`.
pub fn parse_month(input: Option<&str>, today: NaiveDate) -> FinanceResult<(u32, i32)> {
    let current = (today.month(), today.year());
    let Some(raw) = input else {
        return Ok(current);
    };

    match raw.trim().to_lowercase().as_str() {
        "current" | "this" | "now" => return Ok(current),
        "last" | "previous" | "prev" => return Ok(calculations::previous_month(current.0, current.1)),
        _ => {}
    }

    let invalid = || FinanceError::Validation(format!("Invalid month '{}': use YYYY-MM", raw));
    let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((month, year))
}
