//! Report CLI commands
//!
//! The dashboard and the monthly spending report.

use clap::Subcommand;

use super::{parse_date, parse_month, today};
use crate::config::Settings;
use crate::error::FinanceResult;
use crate::reports::{DashboardReport, SpendingReport};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Expenses by category for a month
    Spending {
        /// Month (e.g., "2024-01", "current", "last")
        #[arg(short, long)]
        month: Option<String>,
        /// Print CSV instead of a table
        #[arg(long)]
        csv: bool,
    },
}

/// Handle `dashboard`. `date` picks the month shown; defaults to today.
pub fn handle_dashboard_command(
    storage: &Storage,
    settings: &Settings,
    date: Option<String>,
    csv: bool,
) -> FinanceResult<()> {
    let date = match date {
        Some(raw) => parse_date(&raw)?,
        None => today(),
    };
    let report = DashboardReport::generate(storage, date)?;

    if csv {
        report.export_csv(&mut std::io::stdout().lock())?;
    } else {
        print!(
            "{}",
            report.format_terminal(&settings.currency_symbol, &settings.date_format)
        );
    }
    Ok(())
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> FinanceResult<()> {
    match cmd {
        ReportCommands::Spending { month, csv } => {
            let (month, year) = parse_month(month.as_deref(), today())?;
            let report = SpendingReport::generate(storage, month, year)?;
            if csv {
                report.export_csv(&mut std::io::stdout().lock())?;
            } else {
                print!("{}", report.format_terminal(&settings.currency_symbol));
            }
        }
    }
    Ok(())
}
