//! CSV Export functionality
//!
//! One row per transaction, with the category and account resolved to names.

use std::io::Write;

use serde::Serialize;

use crate::error::{FinanceError, FinanceResult};
use crate::services::TransactionDetail;

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "ID")]
    id: i64,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Account")]
    account: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Tags")]
    tags: &'a str,
}

/// Export transactions to CSV. Amounts are unsigned; the Type column carries
/// the direction.
pub fn export_transactions_csv<W: Write>(
    details: &[TransactionDetail],
    writer: &mut W,
) -> FinanceResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    if details.is_empty() {
        // serialize() only writes headers alongside the first row
        csv_writer
            .write_record([
                "ID",
                "Date",
                "Type",
                "Description",
                "Category",
                "Account",
                "Amount",
                "Tags",
            ])
            .map_err(|e| FinanceError::Export(e.to_string()))?;
    }

    for detail in details {
        let txn = &detail.transaction;
        csv_writer
            .serialize(CsvRow {
                id: txn.id.get(),
                date: txn.date.format("%Y-%m-%d").to_string(),
                kind: txn.transaction_type.to_string(),
                description: &txn.description,
                category: detail
                    .category
                    .as_ref()
                    .map(|c| c.name.as_str())
                    .unwrap_or(""),
                account: detail
                    .account
                    .as_ref()
                    .map(|a| a.name.as_str())
                    .unwrap_or(""),
                amount: format!("{:.2}", txn.amount.to_units_f64()),
                tags: &txn.tags,
            })
            .map_err(|e| FinanceError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| FinanceError::Export(e.to_string()))?;
    Ok(())
}
