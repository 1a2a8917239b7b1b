//! JSON Export functionality
//!
//! Exports transactions in their domain shape inside a versioned envelope.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FinanceError, FinanceResult};
use crate::models::Transaction;
use crate::services::TransactionDetail;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Transaction export envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionExport {
    /// Schema version for compatibility checking
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    /// Application version that created the export
    pub app_version: String,
    pub transaction_count: usize,
    /// Earliest and latest transaction dates, when there are any
    pub earliest_transaction: Option<String>,
    pub latest_transaction: Option<String>,
    pub transactions: Vec<Transaction>,
}

impl TransactionExport {
    pub fn new(details: &[TransactionDetail]) -> Self {
        let transactions: Vec<Transaction> =
            details.iter().map(|d| d.transaction.clone()).collect();

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            transaction_count: transactions.len(),
            earliest_transaction: transactions.iter().map(|t| t.date).min().map(|d| d.to_string()),
            latest_transaction: transactions.iter().map(|t| t.date).max().map(|d| d.to_string()),
            transactions,
        }
    }

    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }
        if self.transaction_count != self.transactions.len() {
            return Err(format!(
                "Transaction count mismatch: header says {}, found {}",
                self.transaction_count,
                self.transactions.len()
            ));
        }
        Ok(())
    }
}

/// Export transactions to pretty-printed JSON
pub fn export_transactions_json<W: Write>(
    details: &[TransactionDetail],
    writer: &mut W,
) -> FinanceResult<()> {
    let export = TransactionExport::new(details);
    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| FinanceError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| FinanceError::Export(e.to_string()))?;
    Ok(())
}

/// Read a JSON export back, checking its envelope
pub fn import_from_json(json_str: &str) -> FinanceResult<TransactionExport> {
    let export: TransactionExport = serde_json::from_str(json_str)?;
    export.validate().map_err(FinanceError::Validation)?;
    Ok(export)
}
