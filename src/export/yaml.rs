//! YAML Export functionality

use std::io::Write;

use crate::error::{FinanceError, FinanceResult};
use crate::export::json::TransactionExport;
use crate::services::TransactionDetail;

/// Export transactions to YAML, using the same envelope as the JSON export
pub fn export_transactions_yaml<W: Write>(
    details: &[TransactionDetail],
    writer: &mut W,
) -> FinanceResult<()> {
    let export = TransactionExport::new(details);
    let export_err = |e: std::io::Error| FinanceError::Export(e.to_string());

    writeln!(writer, "# fintrack transaction export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| FinanceError::Export(e.to_string()))?;
    Ok(())
}

/// Read a YAML export back, checking its envelope
pub fn import_from_yaml(yaml_str: &str) -> FinanceResult<TransactionExport> {
    let export: TransactionExport =
        serde_yaml::from_str(yaml_str).map_err(|e| FinanceError::Validation(e.to_string()))?;
    export.validate().map_err(FinanceError::Validation)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{TransactionFilter, TransactionService};
    use crate::storage::Storage;

    #[test]
    fn test_yaml_export() {
        let storage = Storage::in_memory().unwrap();
        let details = TransactionService::new(&storage)
            .list_detailed(&TransactionFilter::new().limit(3))
            .unwrap();

        let mut out = Vec::new();
        export_transactions_yaml(&details, &mut out).unwrap();
        let yaml = String::from_utf8(out).unwrap();

        assert!(yaml.starts_with("# fintrack transaction export"));
        assert!(yaml.contains("transactionCount: 3"));
        assert!(yaml.contains("description: Transfer to savings"));

        let imported = import_from_yaml(&yaml).unwrap();
        assert_eq!(imported.transactions.len(), 3);
        assert_eq!(imported.transactions[0].id, details[0].transaction.id);
    }
}
