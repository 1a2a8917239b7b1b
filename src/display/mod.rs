//! Display formatting for terminal output
//!
//! Account, category and transaction views are laid out by hand; budget and
//! goal tables go through `tabled`.

pub mod account;
pub mod budget;
pub mod category;
pub mod goal;
pub mod transaction;

pub use account::{format_account_details, format_account_list};
pub use budget::format_budget_table;
pub use category::format_category_list;
pub use goal::format_goal_table;
pub use transaction::{format_transaction_details, format_transaction_register};
