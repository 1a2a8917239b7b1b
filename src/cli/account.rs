//! Account CLI commands
//!
//! Implements CLI commands for account management.

use clap::Subcommand;

use super::parse_money;
use crate::config::Settings;
use crate::display::account::{format_account_details, format_account_list};
use crate::error::{FinanceError, FinanceResult};
use crate::models::{AccountPatch, AccountType, Money};
use crate::services::AccountService;
use crate::storage::Storage;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// Account type (checking, savings, credit, cash)
        #[arg(short = 't', long, default_value = "checking")]
        account_type: String,
        /// Starting balance (e.g., "1000.00" or "1000")
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
        /// Card color as a hex code; defaults by type
        #[arg(long)]
        color: Option<String>,
    },
    /// List all accounts with running balances
    List,
    /// Show account details
    Show {
        /// Account name or ID
        account: String,
    },
    /// Edit an account
    Edit {
        /// Account name or ID
        account: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New account type
        #[arg(short = 't', long)]
        account_type: Option<String>,
        /// New starting balance
        #[arg(short, long, allow_hyphen_values = true)]
        balance: Option<String>,
        /// New color
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete an account
    Delete {
        /// Account name or ID
        account: String,
    },
}

fn parse_account_type(raw: &str) -> FinanceResult<AccountType> {
    AccountType::parse(raw).ok_or_else(|| {
        FinanceError::Validation(format!(
            "Invalid account type: '{}'. Valid types: checking, savings, credit, cash",
            raw
        ))
    })
}

/// Credit balances are debt, stored negative; users type them positive
fn normalize_balance(account_type: AccountType, balance: Money) -> Money {
    if account_type == AccountType::Credit && balance.is_positive() {
        -balance
    } else {
        balance
    }
}

/// Handle an account command
pub fn handle_account_command(
    storage: &Storage,
    settings: &Settings,
    cmd: AccountCommands,
) -> FinanceResult<()> {
    let service = AccountService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        AccountCommands::Create {
            name,
            account_type,
            balance,
            color,
        } => {
            let account_type = parse_account_type(&account_type)?;
            let balance = normalize_balance(account_type, parse_money(&balance)?);

            let account = service.create(&name, account_type, balance, color)?;

            println!("Created account: {}", account.name);
            println!("  Type: {}", account.account_type);
            println!(
                "  Starting Balance: {}",
                account.balance.format_with_symbol(symbol)
            );
            println!("  ID: {}", account.id);
        }

        AccountCommands::List => {
            let summaries = service.list_with_balances()?;
            print!("{}", format_account_list(&summaries, symbol));
            println!();
        }

        AccountCommands::Show { account } => {
            let found = service.find(&account)?;
            let summary = service.get_summary(found.id)?;
            print!("{}", format_account_details(&summary, symbol));
        }

        AccountCommands::Edit {
            account,
            name,
            account_type,
            balance,
            color,
        } => {
            let found = service.find(&account)?;

            if name.is_none() && account_type.is_none() && balance.is_none() && color.is_none() {
                println!("No changes specified. Use --name, --type, --balance or --color.");
                return Ok(());
            }

            let account_type = account_type.as_deref().map(parse_account_type).transpose()?;
            let effective_type = account_type.unwrap_or(found.account_type);
            let balance = balance
                .as_deref()
                .map(parse_money)
                .transpose()?
                .map(|b| normalize_balance(effective_type, b));

            let patch = AccountPatch {
                name,
                account_type,
                balance,
                color,
                ..Default::default()
            };
            let updated = service.update(found.id, patch)?;
            println!("Updated account: {}", updated.name);
        }

        AccountCommands::Delete { account } => {
            let found = service.find(&account)?;
            service.delete(found.id)?;
            println!("Deleted account: {}", found.name);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_balance_is_negated() {
        assert_eq!(
            normalize_balance(AccountType::Credit, Money::from_units(50)),
            Money::from_units(-50)
        );
        assert_eq!(
            normalize_balance(AccountType::Savings, Money::from_units(50)),
            Money::from_units(50)
        );
    }

    #[test]
    fn test_parse_account_type() {
        assert_eq!(parse_account_type("Savings").unwrap(), AccountType::Savings);
        assert!(parse_account_type("brokerage").unwrap_err().is_validation());
    }
}
