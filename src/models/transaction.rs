//! Transaction model
//!
//! A transaction moves a non-negative amount into (income) or out of
//! (expense) an account, classified by a category. The sign lives in the
//! type, never in the amount.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::date;
use super::ids::{AccountId, CategoryId, TransactionId};
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Some(Self::Income),
            "expense" | "out" => Some(Self::Expense),
            _ => None,
        }
    }

    /// The signed effect of `amount` on an account balance
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,

    /// Mirrors the description
    pub name: String,

    pub tags: String,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Always non-negative
    pub amount: Money,

    pub description: String,

    #[serde(with = "date::flexible")]
    pub date: NaiveDate,

    pub category_id: CategoryId,

    pub account_id: AccountId,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// The amount with the sign implied by the type
    pub fn signed_amount(&self) -> Money {
        self.transaction_type.signed(self.amount)
    }

    /// Whether the transaction falls in the given 1-based month of `year`
    pub fn in_month(&self, month: u32, year: i32) -> bool {
        self.date.month() == month && self.date.year() == year
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        if self.description.trim().is_empty() {
            return Err(TransactionValidationError::MissingDescription);
        }

        if self.category_id.get() <= 0 {
            return Err(TransactionValidationError::MissingCategory);
        }

        if self.account_id.get() <= 0 {
            return Err(TransactionValidationError::MissingAccount);
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.signed_amount()
        )
    }
}

/// Partial transaction used for create and update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        with = "date::flexible_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
}

impl TransactionPatch {
    /// A complete patch describing a new transaction
    pub fn new(
        transaction_type: TransactionType,
        amount: Money,
        description: impl Into<String>,
        date: NaiveDate,
        category_id: CategoryId,
        account_id: AccountId,
    ) -> Self {
        Self {
            name: None,
            tags: Some(String::new()),
            transaction_type: Some(transaction_type),
            amount: Some(amount),
            description: Some(description.into()),
            date: Some(date),
            category_id: Some(category_id),
            account_id: Some(account_id),
        }
    }

    /// Keep the record name in step with the description
    pub fn mirror_name(&mut self) {
        if self.name.is_none() {
            self.name = self.description.clone();
        }
    }

    /// Overlay the supplied fields onto `txn`
    pub fn apply_to(&self, txn: &mut Transaction) {
        if let Some(name) = &self.name {
            txn.name = name.clone();
        }
        if let Some(tags) = &self.tags {
            txn.tags = tags.clone();
        }
        if let Some(kind) = self.transaction_type {
            txn.transaction_type = kind;
        }
        if let Some(amount) = self.amount {
            txn.amount = amount;
        }
        if let Some(description) = &self.description {
            txn.description = description.clone();
        }
        if let Some(date) = self.date {
            txn.date = date;
        }
        if let Some(category_id) = self.category_id {
            txn.category_id = category_id;
        }
        if let Some(account_id) = self.account_id {
            txn.account_id = account_id;
        }
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    MissingDescription,
    MissingCategory,
    MissingAccount,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero (got {})", amount)
            }
            Self::MissingDescription => write!(f, "Description is required"),
            Self::MissingCategory => write!(f, "Category is required"),
            Self::MissingAccount => write!(f, "Account is required"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction {
            id: TransactionId::new(1),
            name: "Groceries".into(),
            transaction_type: TransactionType::Expense,
            amount: Money::from_cents(5000),
            description: "Groceries".into(),
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            category_id: CategoryId::new(2),
            account_id: AccountId::new(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_signed_amount() {
        let mut txn = sample();
        assert_eq!(txn.signed_amount(), Money::from_cents(-5000));
        txn.transaction_type = TransactionType::Income;
        assert_eq!(txn.signed_amount(), Money::from_cents(5000));
    }

    #[test]
    fn test_in_month() {
        let txn = sample();
        assert!(txn.in_month(1, 2025));
        assert!(!txn.in_month(2, 2025));
        assert!(!txn.in_month(1, 2024));
    }

    #[test]
    fn test_validation() {
        let mut txn = sample();
        assert!(txn.validate().is_ok());

        txn.amount = Money::zero();
        assert!(matches!(
            txn.validate(),
            Err(TransactionValidationError::NonPositiveAmount(_))
        ));

        let mut txn = sample();
        txn.description = " ".into();
        assert_eq!(
            txn.validate(),
            Err(TransactionValidationError::MissingDescription)
        );

        let mut txn = sample();
        txn.category_id = CategoryId::default();
        assert_eq!(txn.validate(), Err(TransactionValidationError::MissingCategory));
    }

    #[test]
    fn test_patch_apply_and_mirror() {
        let mut patch = TransactionPatch {
            description: Some("Coffee".into()),
            amount: Some(Money::from_cents(450)),
            ..Default::default()
        };
        patch.mirror_name();
        assert_eq!(patch.name.as_deref(), Some("Coffee"));

        let mut txn = sample();
        patch.apply_to(&mut txn);
        assert_eq!(txn.description, "Coffee");
        assert_eq!(txn.amount, Money::from_cents(450));
        assert_eq!(txn.category_id, CategoryId::new(2));
    }

    #[test]
    fn test_date_accepts_timestamp() {
        let txn: Transaction = serde_json::from_value(serde_json::json!({
            "id": 9,
            "date": "2025-02-01T00:00:00Z",
            "amount": 100
        }))
        .unwrap();
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());

        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["date"], "2025-02-01");
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "2025-01-15 Groceries -$50.00");
    }
}
