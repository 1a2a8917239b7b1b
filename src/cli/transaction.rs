//! Transaction CLI commands
//!
//! Listing, entry, editing, export and import of transactions.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, Subcommand};

use super::{parse_date, parse_money, today};
use crate::config::Settings;
use crate::display::transaction::{format_transaction_details, format_transaction_register};
use crate::error::{FinanceError, FinanceResult};
use crate::export::{export_transactions, import_transactions, ExportFormat};
use crate::models::{TransactionId, TransactionPatch, TransactionType};
use crate::services::{AccountService, CategoryService, TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Filters shared by `list` and `export`
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Match description text or amount
    #[arg(short, long)]
    pub search: Option<String>,
    /// Earliest date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Latest date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
    /// Only this account (name or ID)
    #[arg(short, long)]
    pub account: Option<String>,
    /// Only this category (name or ID)
    #[arg(short, long)]
    pub category: Option<String>,
    /// Only income or only expense
    #[arg(short = 't', long = "type")]
    pub kind: Option<String>,
}

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// List transactions, newest first
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show one transaction
    Show {
        /// Transaction ID
        id: TransactionId,
    },
    /// Add a new transaction
    Add {
        /// Amount, always positive (e.g., "42.50")
        amount: String,
        /// What it was for
        description: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// Account name or ID
        #[arg(short, long)]
        account: String,
        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: TransactionId,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Account name or ID
        #[arg(short, long)]
        account: Option<String>,
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(long)]
        tags: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: TransactionId,
    },
    /// Export transactions
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import a JSON or YAML export; transactions get new IDs
    Import {
        /// File written by `transaction export`
        file: PathBuf,
        /// Input format; defaults to the file extension
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,
    },
}

fn parse_kind(raw: &str) -> FinanceResult<TransactionType> {
    TransactionType::parse(raw).ok_or_else(|| {
        FinanceError::Validation(format!(
            "Invalid transaction type: '{}'. Use income or expense",
            raw
        ))
    })
}

fn build_filter(storage: &Storage, args: &FilterArgs) -> FinanceResult<TransactionFilter> {
    let mut filter = TransactionFilter::new().date_range(
        args.from.as_deref().map(parse_date).transpose()?,
        args.to.as_deref().map(parse_date).transpose()?,
    );
    filter.search = args.search.clone();
    if let Some(account) = &args.account {
        filter.account_id = Some(AccountService::new(storage).find(account)?.id);
    }
    if let Some(category) = &args.category {
        filter.category_id = Some(CategoryService::new(storage).find(category)?.id);
    }
    filter.transaction_type = args.kind.as_deref().map(parse_kind).transpose()?;
    Ok(filter)
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> FinanceResult<()> {
    let service = TransactionService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::List { filter, limit } => {
            let filter = build_filter(storage, &filter)?.limit(limit);
            let details = service.list_detailed(&filter)?;
            print!(
                "{}",
                format_transaction_register(&details, symbol, &settings.date_format)
            );
        }

        TransactionCommands::Show { id } => {
            let detail = service.get_detailed(id)?;
            print!("{}", format_transaction_details(&detail, symbol));
        }

        TransactionCommands::Add {
            amount,
            description,
            category,
            account,
            kind,
            date,
            tags,
        } => {
            let category = CategoryService::new(storage).find(&category)?;
            let account = AccountService::new(storage).find(&account)?;
            let date = match date {
                Some(raw) => parse_date(&raw)?,
                None => today(),
            };

            let mut patch = TransactionPatch::new(
                parse_kind(&kind)?,
                parse_money(&amount)?,
                description,
                date,
                category.id,
                account.id,
            );
            if tags.is_some() {
                patch.tags = tags;
            }

            let txn = service.add(patch)?;
            println!(
                "Added {} #{}: {} {} ({} / {})",
                txn.transaction_type,
                txn.id,
                txn.description,
                txn.amount.format_with_symbol(symbol),
                category.name,
                account.name
            );
        }

        TransactionCommands::Edit {
            id,
            amount,
            description,
            category,
            account,
            kind,
            date,
            tags,
        } => {
            let patch = TransactionPatch {
                amount: amount.as_deref().map(parse_money).transpose()?,
                description,
                category_id: match category {
                    Some(c) => Some(CategoryService::new(storage).find(&c)?.id),
                    None => None,
                },
                account_id: match account {
                    Some(a) => Some(AccountService::new(storage).find(&a)?.id),
                    None => None,
                },
                transaction_type: kind.as_deref().map(parse_kind).transpose()?,
                date: date.as_deref().map(parse_date).transpose()?,
                tags,
                name: None,
            };
            if patch == TransactionPatch::default() {
                println!("No changes specified.");
                return Ok(());
            }

            let txn = service.edit(id, patch)?;
            println!("Updated transaction #{}: {}", txn.id, txn);
        }

        TransactionCommands::Delete { id } => {
            service.delete(id)?;
            println!("Deleted transaction #{}", id);
        }

        TransactionCommands::Export {
            filter,
            format,
            output,
        } => {
            let filter = build_filter(storage, &filter)?;
            let details = service.list_detailed(&filter)?;

            match output {
                Some(path) => {
                    let file = File::create(&path).map_err(|e| {
                        FinanceError::Export(format!("Cannot create {}: {}", path.display(), e))
                    })?;
                    let mut writer = BufWriter::new(file);
                    export_transactions(&details, format, &mut writer)?;
                    writer
                        .flush()
                        .map_err(|e| FinanceError::Export(e.to_string()))?;
                    eprintln!(
                        "Exported {} transactions to {}",
                        details.len(),
                        path.display()
                    );
                }
                None => {
                    let stdout = io::stdout();
                    let mut handle = stdout.lock();
                    export_transactions(&details, format, &mut handle)?;
                }
            }
        }

        TransactionCommands::Import { file, format } => {
            let format = format
                .or_else(|| ExportFormat::from_path(&file))
                .ok_or_else(|| {
                    FinanceError::Validation(format!(
                        "Cannot tell the format of {}; pass --format",
                        file.display()
                    ))
                })?;
            let contents = std::fs::read_to_string(&file).map_err(|e| {
                FinanceError::Io(format!("Failed to read {}: {}", file.display(), e))
            })?;

            let export = import_transactions(&contents, format)?;
            let created = service.import(&export.transactions)?;
            println!(
                "Imported {} transactions from {}",
                created.len(),
                file.display()
            );
        }
    }

    Ok(())
}
