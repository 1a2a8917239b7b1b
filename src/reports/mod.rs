//! Reports module for fintrack
//!
//! The dashboard overview and the monthly spending breakdown.

pub mod dashboard;
pub mod spending;

pub use dashboard::{DashboardReport, DASHBOARD_RECENT_TRANSACTIONS, DASHBOARD_TOP_CATEGORIES};
pub use spending::{SpendingByCategory, SpendingReport};
