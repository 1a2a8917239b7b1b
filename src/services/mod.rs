//! Service layer for fintrack
//!
//! Services sit on top of the storage repositories. They validate input
//! before it reaches storage and join entities with the figures derived in
//! [`crate::calculations`].

pub mod account;
pub mod budget;
pub mod category;
pub mod goal;
pub mod transaction;

pub use account::{AccountService, AccountSummary};
pub use budget::{BudgetService, BudgetStatus};
pub use category::{CategoryService, CategoryTotal};
pub use goal::{GoalService, GoalView};
pub use transaction::{TransactionDetail, TransactionFilter, TransactionService};
