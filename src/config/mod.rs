//! Configuration module for fintrack
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Backend selection and user preferences
//! - Environment overrides

pub mod paths;
pub mod settings;

pub use paths::FintrackPaths;
pub use settings::{Backend, MockSettings, RemoteSettings, Settings};
