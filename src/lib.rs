//! fintrack - personal finance tracking core
//!
//! Accounts, transactions, categories, budgets and savings goals kept in a
//! record store: either a hosted record API or an in-memory mock seeded from
//! fixtures.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Domain entities, their patches, and `Money`
//! - `storage`: Record stores, the schema mapping, and one repository per entity
//! - `calculations`: Pure aggregation functions (balances, budgets, trends)
//! - `services`: Validation and derived views on top of storage
//! - `reports`: Dashboard and spending reports
//! - `display`, `export`, `cli`: The command-line front end
//!
//! # Example
//!
//! ```rust
//! use fintrack::services::AccountService;
//! use fintrack::storage::Storage;
//!
//! let storage = Storage::in_memory()?;
//! let total = AccountService::new(&storage).total_balance()?;
//! assert!(total.is_positive());
//! # Ok::<(), fintrack::FinanceError>(())
//! ```

pub mod calculations;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{FinanceError, FinanceResult};
