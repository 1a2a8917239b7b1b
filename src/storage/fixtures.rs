//! Seed records for the mock store
//!
//! Built-in fixtures are compiled into the binary. A fixtures directory may
//! override any table with a `<table>.json` file holding an array of records.

use std::collections::HashMap;
use std::path::Path;

use super::entities::ALL_SCHEMAS;
use super::file_io::read_json;
use super::record::Record;
use crate::error::{FinanceError, FinanceResult};

const BUILTIN: [(&str, &str); 5] = [
    ("app_account_c", include_str!("fixtures/app_account_c.json")),
    ("transaction_c", include_str!("fixtures/transaction_c.json")),
    ("category_c", include_str!("fixtures/category_c.json")),
    ("budget_c", include_str!("fixtures/budget_c.json")),
    ("goal_c", include_str!("fixtures/goal_c.json")),
];

/// Seed tables keyed by table name
pub type Seed = HashMap<String, Vec<Record>>;

/// The built-in seed data
pub fn builtin() -> FinanceResult<Seed> {
    BUILTIN
        .iter()
        .map(|(table, raw)| {
            let rows: Vec<Record> = serde_json::from_str(raw).map_err(|e| {
                FinanceError::Storage(format!("Built-in fixture {} is invalid: {}", table, e))
            })?;
            Ok((table.to_string(), rows))
        })
        .collect()
}

/// Load `<table>.json` for every known table from `dir`. Tables without a
/// file are absent from the result.
pub fn load_dir(dir: &Path) -> FinanceResult<Seed> {
    let mut seed = Seed::new();
    for schema in ALL_SCHEMAS {
        let path = dir.join(format!("{}.json", schema.table));
        if let Some(rows) = read_json::<Vec<Record>, _>(&path)? {
            seed.insert(schema.table.to_string(), rows);
        }
    }
    Ok(seed)
}

/// Built-in seed data with any tables found in `dir` laid over it
pub fn load_with_overrides(dir: Option<&Path>) -> FinanceResult<Seed> {
    let mut seed = builtin()?;
    if let Some(dir) = dir {
        seed.extend(load_dir(dir)?);
    }
    Ok(seed)
}
