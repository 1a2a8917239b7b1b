//! Export module for fintrack
//!
//! Writes a (filtered) transaction list in one of three formats:
//! - CSV: one row per transaction with category and account names
//! - JSON: the domain shape inside a versioned envelope
//! - YAML: the same envelope, human-readable
//!
//! JSON and YAML exports can be read back; CSV rows carry names, not ids.

pub mod csv;
pub mod json;
pub mod yaml;

use std::fmt;
use std::io::Write;
use std::path::Path;

use clap::ValueEnum;

use crate::error::{FinanceError, FinanceResult};
use crate::services::TransactionDetail;

pub use self::csv::export_transactions_csv;
pub use self::json::{
    export_transactions_json, import_from_json, TransactionExport, EXPORT_SCHEMA_VERSION,
};
pub use self::yaml::{export_transactions_yaml, import_from_yaml};

/// Output format for `transaction export`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Yaml,
}

impl ExportFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Format implied by a file's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Write `details` to `writer` in `format`
pub fn export_transactions<W: Write>(
    details: &[TransactionDetail],
    format: ExportFormat,
    writer: &mut W,
) -> FinanceResult<()> {
    match format {
        ExportFormat::Csv => export_transactions_csv(details, writer),
        ExportFormat::Json => export_transactions_json(details, writer),
        ExportFormat::Yaml => export_transactions_yaml(details, writer),
    }
}

/// Read an export written by [`export_transactions`]
pub fn import_transactions(contents: &str, format: ExportFormat) -> FinanceResult<TransactionExport> {
    match format {
        ExportFormat::Json => import_from_json(contents),
        ExportFormat::Yaml => import_from_yaml(contents),
        ExportFormat::Csv => Err(FinanceError::Validation(
            "CSV exports cannot be imported; use json or yaml".into(),
        )),
    }
}
