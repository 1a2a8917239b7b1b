//! Budget model
//!
//! A spending limit for one category. The stored `spent` figure is only a
//! cache; views recompute it from the month's expense transactions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, CategoryId};
use super::money::Money;

/// How often a budget resets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Some(Self::Weekly),
            "monthly" | "month" => Some(Self::Monthly),
            "yearly" | "year" | "annual" => Some(Self::Yearly),
            _ => None,
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

/// A category spending limit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Budget {
    pub id: BudgetId,

    pub name: String,

    pub tags: String,

    /// Allocated amount per period
    pub amount: Money,

    pub period: BudgetPeriod,

    /// Cached spend as last written to storage
    pub spent: Money,

    pub category_id: CategoryId,
}

impl Budget {
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if !self.amount.is_positive() {
            return Err(BudgetValidationError::NonPositiveAmount(self.amount));
        }
        if self.category_id.get() <= 0 {
            return Err(BudgetValidationError::MissingCategory);
        }
        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.name, self.amount, self.period)
    }
}

/// Partial budget used for create and update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<BudgetPeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

impl BudgetPatch {
    pub fn new(
        name: impl Into<String>,
        amount: Money,
        period: BudgetPeriod,
        category_id: CategoryId,
    ) -> Self {
        Self {
            name: Some(name.into()),
            tags: Some(String::new()),
            amount: Some(amount),
            period: Some(period),
            spent: None,
            category_id: Some(category_id),
        }
    }

    pub fn apply_to(&self, budget: &mut Budget) {
        if let Some(name) = &self.name {
            budget.name = name.clone();
        }
        if let Some(tags) = &self.tags {
            budget.tags = tags.clone();
        }
        if let Some(amount) = self.amount {
            budget.amount = amount;
        }
        if let Some(period) = self.period {
            budget.period = period;
        }
        if let Some(spent) = self.spent {
            budget.spent = spent;
        }
        if let Some(category_id) = self.category_id {
            budget.category_id = category_id;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NonPositiveAmount(Money),
    MissingCategory,
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Budget amount must be greater than zero (got {})", amount)
            }
            Self::MissingCategory => write!(f, "Budget category is required"),
        }
    }
}

impl std::error::Error for BudgetValidationError {}
