//! Category CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::category::format_category_list;
use crate::error::{FinanceError, FinanceResult};
use crate::models::CategoryType;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories with their transaction totals
    List {
        /// Only income or only expense categories
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CategoryCommands,
) -> FinanceResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List { kind } => {
            let kind = kind
                .as_deref()
                .map(|raw| {
                    CategoryType::parse(raw).ok_or_else(|| {
                        FinanceError::Validation(format!(
                            "Invalid category type: '{}'. Use income or expense",
                            raw
                        ))
                    })
                })
                .transpose()?;

            let totals = service.list_with_totals(kind)?;
            print!("{}", format_category_list(&totals, &settings.currency_symbol));
        }
    }

    Ok(())
}
