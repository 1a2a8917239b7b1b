//! Core data models for fintrack
//!
//! Accounts, transactions, categories, budgets and savings goals, in the
//! domain shape the rest of the crate works with. Each entity has a matching
//! `*Patch` type with every field optional, used for create and update.

pub mod account;
pub mod budget;
pub mod category;
pub mod date;
pub mod goal;
pub mod ids;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountPatch, AccountType};
pub use budget::{Budget, BudgetPatch, BudgetPeriod};
pub use category::{Category, CategoryPatch, CategoryType};
pub use goal::{Goal, GoalPatch, GoalStatus};
pub use ids::{AccountId, BudgetId, CategoryId, GoalId, TransactionId};
pub use money::{Money, MoneyParseError};
pub use transaction::{Transaction, TransactionPatch, TransactionType};
