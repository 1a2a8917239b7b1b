//! Category display formatting

use crate::models::CategoryType;
use crate::services::category::CategoryTotal;

/// Format categories grouped under Income and Expense headings
pub fn format_category_list(totals: &[CategoryTotal], symbol: &str) -> String {
    if totals.is_empty() {
        return "No categories found.".to_string();
    }

    let mut output = String::new();
    for kind in [CategoryType::Income, CategoryType::Expense] {
        let section: Vec<&CategoryTotal> = totals
            .iter()
            .filter(|t| t.category.category_type == kind)
            .collect();
        if section.is_empty() {
            continue;
        }

        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&format!("{}\n", kind));
        for (i, entry) in section.iter().enumerate() {
            let prefix = if i == section.len() - 1 { "└── " } else { "├── " };
            output.push_str(&format!(
                "  {}{:<4} {:<24} {:>14}\n",
                prefix,
                entry.category.id,
                entry.category.name,
                entry.total.format_with_symbol(symbol)
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryId, Money};

    fn total(id: i64, name: &str, kind: CategoryType, cents: i64) -> CategoryTotal {
        CategoryTotal {
            category: Category {
                id: CategoryId::new(id),
                name: name.into(),
                category_type: kind,
                ..Default::default()
            },
            total: Money::from_cents(cents),
        }
    }

    #[test]
    fn test_format_category_list() {
        let output = format_category_list(
            &[
                total(1, "Salary", CategoryType::Income, 420000),
                total(3, "Food & Dining", CategoryType::Expense, 15465),
                total(4, "Transportation", CategoryType::Expense, 0),
            ],
            "$",
        );
        assert!(output.starts_with("Income\n"));
        assert!(output.contains("└── 1    Salary"));
        assert!(output.contains("├── 3    Food & Dining"));
        assert!(output.contains("$4,200.00"));
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_category_list(&[], "$"), "No categories found.");
    }
}
