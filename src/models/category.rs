//! Category model
//!
//! Categories classify transactions as income or expense and carry the
//! icon and color the front end shows next to them. They are read-only from
//! the application's point of view; the seed data or the remote table owns
//! them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// Whether a category collects income or expenses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    #[default]
    Expense,
}

impl CategoryType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" | "expenses" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// A transaction category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,

    pub name: String,

    pub tags: String,

    /// Icon name (e.g., "ShoppingCart")
    pub icon: String,

    /// Display color (hex)
    pub color: String,

    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

impl Category {
    pub fn is_income(&self) -> bool {
        self.category_type == CategoryType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.category_type == CategoryType::Expense
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Partial category; categories are only ever written by the seed loader
/// and tests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub category_type: Option<CategoryType>,
}

impl CategoryPatch {
    pub fn new(name: impl Into<String>, category_type: CategoryType) -> Self {
        Self {
            name: Some(name.into()),
            category_type: Some(category_type),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_parsing() {
        assert_eq!(CategoryType::parse("Income"), Some(CategoryType::Income));
        assert_eq!(CategoryType::parse("expense"), Some(CategoryType::Expense));
        assert_eq!(CategoryType::parse("transfer"), None);
    }

    #[test]
    fn test_deserialize_with_missing_fields() {
        let category: Category =
            serde_json::from_value(serde_json::json!({ "id": 4, "name": "Salary", "type": "income" }))
                .unwrap();
        assert_eq!(category.id, CategoryId::new(4));
        assert!(category.is_income());
        assert_eq!(category.icon, "");
    }
}
