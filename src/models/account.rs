//! Account model
//!
//! Represents financial accounts (checking, savings, credit cards, cash).
//! The stored balance is the *starting* balance; the running balance is
//! derived from transactions by [`crate::calculations::running_balance`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::money::Money;

/// Type of financial account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Checking,
    Savings,
    Credit,
    Cash,
}

impl AccountType {
    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "checking" => Some(Self::Checking),
            "savings" => Some(Self::Savings),
            "credit" | "credit_card" | "creditcard" => Some(Self::Credit),
            "cash" => Some(Self::Cash),
            _ => None,
        }
    }

    pub fn all() -> &'static [AccountType] {
        &[Self::Checking, Self::Savings, Self::Credit, Self::Cash]
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checking => write!(f, "Checking"),
            Self::Savings => write!(f, "Savings"),
            Self::Credit => write!(f, "Credit Card"),
            Self::Cash => write!(f, "Cash"),
        }
    }
}

/// A financial account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,

    /// Account name (e.g., "Main Checking")
    pub name: String,

    /// Free-form tags, comma separated
    pub tags: String,

    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Starting balance
    pub balance: Money,

    /// Display color (hex)
    pub color: String,
}

impl Account {
    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(AccountValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}

/// Partial account used for create and update; omitted fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl AccountPatch {
    /// A complete patch describing a new account
    pub fn new(name: impl Into<String>, account_type: AccountType, balance: Money) -> Self {
        Self {
            name: Some(name.into()),
            tags: Some(String::new()),
            account_type: Some(account_type),
            balance: Some(balance),
            color: Some(default_color(account_type).to_string()),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Overlay the supplied fields onto `account`
    pub fn apply_to(&self, account: &mut Account) {
        if let Some(name) = &self.name {
            account.name = name.clone();
        }
        if let Some(tags) = &self.tags {
            account.tags = tags.clone();
        }
        if let Some(account_type) = self.account_type {
            account.account_type = account_type;
        }
        if let Some(balance) = self.balance {
            account.balance = balance;
        }
        if let Some(color) = &self.color {
            account.color = color.clone();
        }
    }
}

fn default_color(account_type: AccountType) -> &'static str {
    match account_type {
        AccountType::Checking => "#3B82F6",
        AccountType::Savings => "#10B981",
        AccountType::Credit => "#EF4444",
        AccountType::Cash => "#F59E0B",
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max 100)", len)
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}
