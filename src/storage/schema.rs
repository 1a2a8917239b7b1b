//! Declarative mapping between domain objects and storage records
//!
//! Each entity type describes its table once: which domain field lands in
//! which storage column and how the value is converted on the way. The
//! generic repository does the rest.

use serde_json::{Map, Number, Value};

use super::record::{FetchParams, FieldSelector, OrderBy, Record, ID_FIELD};
use crate::error::{FinanceError, FinanceResult};

/// Domain name of the identifier on every entity
pub const ID_DOMAIN: &str = "id";

/// How a value is converted between domain and storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Copied as is
    Plain,
    /// Integer cents in the domain, decimal currency units in storage
    Money,
    /// Identifier of another record. Storage may return a lookup object
    /// `{ "Id": n, "Name": "..." }` instead of the bare id.
    Reference,
}

/// One mapped field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub domain: &'static str,
    pub record: &'static str,
    pub kind: FieldKind,
}

impl Field {
    pub const fn plain(domain: &'static str, record: &'static str) -> Self {
        Self {
            domain,
            record,
            kind: FieldKind::Plain,
        }
    }

    pub const fn money(domain: &'static str, record: &'static str) -> Self {
        Self {
            domain,
            record,
            kind: FieldKind::Money,
        }
    }

    pub const fn reference(domain: &'static str, record: &'static str) -> Self {
        Self {
            domain,
            record,
            kind: FieldKind::Reference,
        }
    }
}

/// Storage layout of one entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    /// Human-readable entity name used in errors and logs
    pub entity: &'static str,
    pub table: &'static str,
    pub fields: &'static [Field],
    /// Storage field to sort fetches by, newest first
    pub order_by_desc: Option<&'static str>,
}

impl EntitySchema {
    /// Storage field names requested on fetch
    pub fn record_fields(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.record).collect()
    }

    /// Parameters for `fetch_records` / `get_record_by_id`
    pub fn fetch_params(&self) -> FetchParams {
        FetchParams {
            fields: self
                .fields
                .iter()
                .map(|f| FieldSelector {
                    name: f.record.to_string(),
                    reference: f.kind == FieldKind::Reference,
                })
                .collect(),
            order_by: self
                .order_by_desc
                .map(|field| vec![OrderBy::descending(field)])
                .unwrap_or_default(),
        }
    }

    /// Map a domain object to a storage record. Keys the schema doesn't know
    /// are dropped; the identifier is never written.
    pub fn to_record(&self, domain: &Map<String, Value>) -> FinanceResult<Record> {
        let mut record = Record::new();
        for field in self.fields {
            let Some(value) = domain.get(field.domain) else {
                continue;
            };
            let converted = match field.kind {
                FieldKind::Money => cents_to_units(value).ok_or_else(|| {
                    self.shape_error(field.domain, "expected an amount in cents", value)
                })?,
                FieldKind::Plain | FieldKind::Reference => value.clone(),
            };
            record.insert(field.record.to_string(), converted);
        }
        Ok(record)
    }

    /// Map a storage record to a domain object. Keys the schema doesn't know
    /// are dropped; null values are left out so domain defaults apply.
    pub fn to_domain(&self, record: &Record) -> FinanceResult<Map<String, Value>> {
        let mut domain = Map::new();

        match record.get(ID_FIELD) {
            Some(Value::Number(id)) => {
                domain.insert(ID_DOMAIN.to_string(), Value::Number(id.clone()));
            }
            Some(other) => {
                return Err(self.shape_error(ID_DOMAIN, "expected a numeric Id", other));
            }
            None => {}
        }

        for field in self.fields {
            let value = match record.get(field.record) {
                None | Some(Value::Null) => continue,
                Some(value) => value,
            };
            let converted = match field.kind {
                FieldKind::Plain => value.clone(),
                FieldKind::Money => units_to_cents(value).ok_or_else(|| {
                    self.shape_error(field.record, "expected a decimal amount", value)
                })?,
                FieldKind::Reference => match unwrap_reference(value) {
                    Some(id) => id,
                    None => continue,
                },
            };
            domain.insert(field.domain.to_string(), converted);
        }
        Ok(domain)
    }

    fn shape_error(&self, field: &str, expected: &str, got: &Value) -> FinanceError {
        FinanceError::Storage(format!(
            "{} field '{}': {}, got {}",
            self.entity, field, expected, got
        ))
    }
}

fn cents_to_units(value: &Value) -> Option<Value> {
    let cents = value.as_i64()?;
    Number::from_f64(cents as f64 / 100.0).map(Value::Number)
}

fn units_to_cents(value: &Value) -> Option<Value> {
    let units = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Some(Value::from((units * 100.0).round() as i64))
}

/// `7` stays `7`; `{ "Id": 7, "Name": "Food" }` becomes `7`
fn unwrap_reference(value: &Value) -> Option<Value> {
    match value {
        Value::Object(lookup) => lookup.get(ID_FIELD).filter(|v| !v.is_null()).cloned(),
        Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
        other => Some(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCHEMA: EntitySchema = EntitySchema {
        entity: "Budget",
        table: "budget_c",
        fields: &[
            Field::plain("name", "Name"),
            Field::money("amount", "amount_c"),
            Field::reference("categoryId", "category_id_c"),
        ],
        order_by_desc: None,
    };

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_to_record_renames_and_converts() {
        let record = SCHEMA
            .to_record(&obj(json!({
                "id": 3,
                "name": "Food",
                "amount": 40050,
                "categoryId": 2,
                "colour": "red"
            })))
            .unwrap();

        assert_eq!(
            Value::Object(record),
            json!({ "Name": "Food", "amount_c": 400.5, "category_id_c": 2 })
        );
    }

    #[test]
    fn test_to_domain_unwraps_lookup_and_drops_unknown() {
        let domain = SCHEMA
            .to_domain(&obj(json!({
                "Id": 3,
                "Name": "Food",
                "amount_c": 400.5,
                "category_id_c": { "Id": 2, "Name": "Groceries" },
                "CreatedBy": "someone"
            })))
            .unwrap();

        assert_eq!(
            Value::Object(domain),
            json!({ "id": 3, "name": "Food", "amount": 40050, "categoryId": 2 })
        );
    }

    #[test]
    fn test_to_domain_skips_nulls() {
        let domain = SCHEMA
            .to_domain(&obj(json!({ "Id": 1, "amount_c": null, "category_id_c": null })))
            .unwrap();
        assert_eq!(Value::Object(domain), json!({ "id": 1 }));
    }

    #[test]
    fn test_money_rounds_to_nearest_cent() {
        let domain = SCHEMA
            .to_domain(&obj(json!({ "amount_c": 19.999 })))
            .unwrap();
        assert_eq!(domain["amount"], json!(2000));
    }

    #[test]
    fn test_bad_money_is_storage_error() {
        let err = SCHEMA
            .to_domain(&obj(json!({ "amount_c": "lots" })))
            .unwrap_err();
        assert!(matches!(err, FinanceError::Storage(_)));
    }

    #[test]
    fn test_fetch_params() {
        let params = SCHEMA.fetch_params();
        assert_eq!(SCHEMA.record_fields(), vec!["Name", "amount_c", "category_id_c"]);
        assert!(params.fields[2].reference);
        assert!(params.order_by.is_empty());
    }
}
