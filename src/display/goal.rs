//! Goal display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::services::goal::GoalView;

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Goal")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Format goals as a table. Overdue goals are flagged in the status column.
pub fn format_goal_table(views: &[GoalView], symbol: &str, date_format: &str) -> String {
    if views.is_empty() {
        return "No goals found.".to_string();
    }

    let rows = views.iter().map(|view| {
        let goal = &view.goal;
        let status = if view.is_overdue {
            format!("{} (overdue)", goal.status)
        } else {
            goal.status.to_string()
        };
        GoalRow {
            id: goal.id.to_string(),
            name: goal.name.clone(),
            category: goal.category.clone(),
            saved: goal.current_amount.format_with_symbol(symbol),
            target: goal.target_amount.format_with_symbol(symbol),
            progress: format!("{:.0}%", view.progress),
            due: goal
                .target_date
                .map(|d| d.format(date_format).to_string())
                .unwrap_or_default(),
            status,
        }
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}
