//! The record store contract
//!
//! Records are flat JSON objects keyed by storage field names (`Name`,
//! `amount_c`, ...). A [`RecordStore`] is whatever answers the five record
//! calls: the remote record API or the in-memory mock.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;

use crate::error::FinanceResult;

/// A single storage record
pub type Record = Map<String, Value>;

/// Storage field name of the identifier on every table
pub const ID_FIELD: &str = "Id";

/// Sort direction for fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "ASC")]
    Ascending,
    #[serde(rename = "DESC")]
    Descending,
}

/// One ordering clause of a fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field: String,
    #[serde(rename = "sorttype")]
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Compare two records under this clause. Missing values sort first
    /// ascending.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let ord = compare_values(a.get(&self.field), b.get(&self.field));
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// A requested field. Reference fields ask the store to expand the linked
/// record's `Name` alongside its `Id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelector {
    pub name: String,
    pub reference: bool,
}

/// Parameters of `fetch_records` and `get_record_by_id`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchParams {
    pub fields: Vec<FieldSelector>,
    pub order_by: Vec<OrderBy>,
}

/// Per-record result of a batch create, update or delete
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordOutcome {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<Record>,
}

impl RecordOutcome {
    pub fn ok(data: Option<Record>) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// The storage record API
pub trait RecordStore: Send + Sync {
    /// All records of `table`, ordered as `params.order_by` asks
    fn fetch_records(&self, table: &str, params: &FetchParams) -> FinanceResult<Vec<Record>>;

    /// A single record; fails with `NotFound` when absent
    fn get_record_by_id(&self, table: &str, id: i64, params: &FetchParams)
        -> FinanceResult<Record>;

    /// Insert records; each outcome carries the stored record with its new `Id`
    fn create_records(&self, table: &str, records: Vec<Record>)
        -> FinanceResult<Vec<RecordOutcome>>;

    /// Merge the supplied fields onto existing records matched by `Id`
    fn update_records(&self, table: &str, records: Vec<Record>)
        -> FinanceResult<Vec<RecordOutcome>>;

    /// Hard delete by id
    fn delete_records(&self, table: &str, ids: &[i64]) -> FinanceResult<Vec<RecordOutcome>>;
}

/// The `Id` of a record, if it has a numeric one
pub fn record_id(record: &Record) -> Option<i64> {
    record.get(ID_FIELD).and_then(Value::as_i64)
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_order_by_dates_descending() {
        let order = OrderBy::descending("date_c");
        let older = rec(json!({ "date_c": "2024-01-05" }));
        let newer = rec(json!({ "date_c": "2024-02-01" }));
        assert_eq!(order.compare(&newer, &older), Ordering::Less);
        assert_eq!(order.compare(&older, &newer), Ordering::Greater);
    }

    #[test]
    fn test_order_by_numbers() {
        let order = OrderBy::ascending("amount_c");
        let small = rec(json!({ "amount_c": 2 }));
        let large = rec(json!({ "amount_c": 10.5 }));
        assert_eq!(order.compare(&small, &large), Ordering::Less);
    }

    #[test]
    fn test_order_by_wire_shape() {
        let value = serde_json::to_value(OrderBy::descending("date_c")).unwrap();
        assert_eq!(value, json!({ "fieldName": "date_c", "sorttype": "DESC" }));
    }

    #[test]
    fn test_record_id() {
        assert_eq!(record_id(&rec(json!({ "Id": 4 }))), Some(4));
        assert_eq!(record_id(&rec(json!({ "Name": "x" }))), None);
    }
}
