//! Goal CLI commands

use clap::Subcommand;

use super::{parse_date, parse_money, today};
use crate::config::Settings;
use crate::display::goal::format_goal_table;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{GoalId, GoalPatch, GoalStatus};
use crate::services::GoalService;
use crate::storage::Storage;

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// List goals with progress
    List {
        /// Only goals in this status (active, paused, completed)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Create a savings goal
    Create {
        /// Goal name
        name: String,
        /// Target amount
        target: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        target_date: Option<String>,
        /// Free-text category such as "Travel"
        #[arg(short, long)]
        category: Option<String>,
        /// Amount already saved
        #[arg(long)]
        current: Option<String>,
    },
    /// Edit a goal
    Edit {
        /// Goal ID
        id: GoalId,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        target: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        target_date: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        current: Option<String>,
        /// active, paused or completed
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Add money to a goal
    Contribute {
        /// Goal ID
        id: GoalId,
        /// Amount to add
        amount: String,
    },
    /// Delete a goal
    Delete {
        /// Goal ID
        id: GoalId,
    },
}

fn parse_status(raw: &str) -> FinanceResult<GoalStatus> {
    GoalStatus::parse(raw).ok_or_else(|| {
        FinanceError::Validation(format!(
            "Invalid goal status: '{}'. Use active, paused or completed",
            raw
        ))
    })
}

/// Handle a goal command
pub fn handle_goal_command(
    storage: &Storage,
    settings: &Settings,
    cmd: GoalCommands,
) -> FinanceResult<()> {
    let service = GoalService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        GoalCommands::List { status } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let views = service.list_views(status, today())?;
            println!("{}", format_goal_table(&views, symbol, &settings.date_format));
        }

        GoalCommands::Create {
            name,
            target,
            description,
            target_date,
            category,
            current,
        } => {
            let mut patch = GoalPatch::new(name, parse_money(&target)?);
            if description.is_some() {
                patch.description = description;
            }
            patch.target_date = target_date.as_deref().map(parse_date).transpose()?;
            patch.category = category;
            if let Some(current) = current {
                patch.current_amount = Some(parse_money(&current)?);
            }

            let goal = service.create(patch)?;
            println!(
                "Created goal #{}: {} (target {})",
                goal.id,
                goal.name,
                goal.target_amount.format_with_symbol(symbol)
            );
        }

        GoalCommands::Edit {
            id,
            name,
            target,
            description,
            target_date,
            category,
            current,
            status,
        } => {
            let patch = GoalPatch {
                name,
                description,
                target_amount: target.as_deref().map(parse_money).transpose()?,
                current_amount: current.as_deref().map(parse_money).transpose()?,
                target_date: target_date.as_deref().map(parse_date).transpose()?,
                category,
                status: status.as_deref().map(parse_status).transpose()?,
                ..Default::default()
            };
            if patch == GoalPatch::default() {
                println!("No changes specified.");
                return Ok(());
            }

            let goal = service.edit(id, patch)?;
            println!("Updated goal #{}: {}", goal.id, goal);
        }

        GoalCommands::Contribute { id, amount } => {
            let goal = service.contribute(id, parse_money(&amount)?)?;
            println!(
                "{}: {} of {} ({:.0}%)",
                goal.name,
                goal.current_amount.format_with_symbol(symbol),
                goal.target_amount.format_with_symbol(symbol),
                goal.progress()
            );
            if goal.is_completed() {
                println!("Goal reached!");
            }
        }

        GoalCommands::Delete { id } => {
            service.delete(id)?;
            println!("Deleted goal #{}", id);
        }
    }

    Ok(())
}
