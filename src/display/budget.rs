//! Budget display formatting
//!
//! Budget status tables rendered with `tabled`.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Money;
use crate::services::budget::BudgetStatus;

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Budget")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Allocated")]
    allocated: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Left")]
    remaining: String,
    #[tabled(rename = "Progress")]
    progress: String,
}

impl BudgetRow {
    fn from_status(status: &BudgetStatus, symbol: &str) -> Self {
        let progress = if status.is_over_budget() {
            format!(
                "{:>5.1}% over by {}",
                status.progress,
                status.overspend.format_with_symbol(symbol)
            )
        } else {
            format!("{:>5.1}%", status.progress)
        };

        Self {
            id: status.budget.id.to_string(),
            name: status.budget.name.clone(),
            category: status
                .category
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("#{}", status.budget.category_id)),
            period: status.budget.period.to_string(),
            allocated: status.budget.amount.format_with_symbol(symbol),
            spent: status.spent.format_with_symbol(symbol),
            remaining: status.remaining.format_with_symbol(symbol),
            progress,
        }
    }
}

/// Format budget statuses for one month as a table with a totals line
pub fn format_budget_table(statuses: &[BudgetStatus], symbol: &str) -> String {
    if statuses.is_empty() {
        return "No budgets found.".to_string();
    }

    let rows: Vec<BudgetRow> = statuses
        .iter()
        .map(|s| BudgetRow::from_status(s, symbol))
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());

    let allocated: Money = statuses.iter().map(|s| s.budget.amount).sum();
    let spent: Money = statuses.iter().map(|s| s.spent).sum();
    let over = statuses.iter().filter(|s| s.is_over_budget()).count();

    let mut output = table.to_string();
    output.push_str(&format!(
        "\n\nTotal: {} spent of {} allocated",
        spent.format_with_symbol(symbol),
        allocated.format_with_symbol(symbol)
    ));
    if over > 0 {
        output.push_str(&format!(" ({} over budget)", over));
    }
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, BudgetId, CategoryId};

    fn status(spent: i64, amount: i64) -> BudgetStatus {
        let amount = Money::from_units(amount);
        let spent = Money::from_units(spent);
        BudgetStatus {
            budget: Budget {
                id: BudgetId::new(1),
                name: "Fun Money".into(),
                amount,
                category_id: CategoryId::new(6),
                ..Default::default()
            },
            category: None,
            spent,
            progress: crate::calculations::budget_progress(spent, amount),
            remaining: crate::calculations::budget_remaining(amount, spent),
            overspend: crate::calculations::budget_overspend(amount, spent),
        }
    }

    #[test]
    fn test_format_budget_table() {
        let output = format_budget_table(&[status(30, 25)], "$");
        assert!(output.contains("Fun Money"));
        assert!(output.contains("#6"));
        assert!(output.contains("over by $5.00"));
        assert!(output.contains("(1 over budget)"));
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_budget_table(&[], "$"), "No budgets found.");
    }
}
