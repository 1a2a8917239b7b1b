//! Generic CRUD repository
//!
//! One implementation serves every entity type: the entity's schema maps
//! domain objects to records, and the record store does the rest. Batch
//! calls abort on the first failed record and return no partial results.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, error, info};

use super::entities::Entity;
use super::record::{FetchParams, Record, RecordOutcome, RecordStore, ID_FIELD};
use crate::error::{FinanceError, FinanceResult};

/// Repository for one entity type
pub struct Repository<E: Entity> {
    store: Arc<dyn RecordStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Every entity, in the table's natural order
    pub fn get_all(&self) -> FinanceResult<Vec<E>> {
        let schema = E::SCHEMA;
        debug!(entity = schema.entity, "fetching all");

        let records = self
            .store
            .fetch_records(schema.table, &schema.fetch_params())
            .map_err(|e| self.fail("fetch", e))?;

        records.iter().map(|r| self.decode(r)).collect()
    }

    /// One entity by id
    pub fn get_by_id(&self, id: E::Id) -> FinanceResult<E> {
        let schema = E::SCHEMA;
        debug!(entity = schema.entity, %id, "fetching by id");

        let record = self
            .store
            .get_record_by_id(schema.table, id.into(), &schema.fetch_params())
            .map_err(|e| self.not_found_or(e, id))
            .map_err(|e| self.fail("fetch", e))?;

        self.decode(&record)
    }

    /// Create one entity; the store assigns the id
    pub fn create(&self, patch: E::Patch) -> FinanceResult<E> {
        let mut created = self.create_many(vec![patch])?;
        created
            .pop()
            .ok_or_else(|| self.fail("create", self.no_result("create")))
    }

    /// Merge the supplied fields onto an existing entity
    pub fn update(&self, id: E::Id, patch: E::Patch) -> FinanceResult<E> {
        let mut updated = self
            .update_many(vec![(id, patch)])
            .map_err(|e| self.confirm_missing(e, id))?;
        updated
            .pop()
            .ok_or_else(|| self.fail("update", self.no_result("update")))
    }

    /// Hard delete. Returns true when the store confirmed the deletion.
    pub fn delete(&self, id: E::Id) -> FinanceResult<bool> {
        self.delete_many(&[id]).map_err(|e| self.confirm_missing(e, id))
    }

    pub fn create_many(&self, patches: Vec<E::Patch>) -> FinanceResult<Vec<E>> {
        let schema = E::SCHEMA;
        let records = patches
            .into_iter()
            .map(|mut patch| {
                E::prepare_create(&mut patch);
                self.encode(&patch)
            })
            .collect::<FinanceResult<Vec<Record>>>()?;

        let count = records.len();
        let outcomes = self
            .store
            .create_records(schema.table, records)
            .map_err(|e| self.fail("create", e))?;
        let created = self.settle("create", outcomes)?;

        info!(entity = schema.entity, count, "created");
        created.iter().map(|r| self.decode(r)).collect()
    }

    pub fn update_many(&self, changes: Vec<(E::Id, E::Patch)>) -> FinanceResult<Vec<E>> {
        let schema = E::SCHEMA;
        let records = changes
            .into_iter()
            .map(|(id, mut patch)| {
                E::prepare_update(&mut patch);
                let raw: i64 = id.into();
                let mut record = self.encode(&patch)?;
                record.insert(ID_FIELD.to_string(), Value::from(raw));
                Ok(record)
            })
            .collect::<FinanceResult<Vec<Record>>>()?;

        let count = records.len();
        let outcomes = self
            .store
            .update_records(schema.table, records)
            .map_err(|e| self.fail("update", e))?;
        let updated = self.settle("update", outcomes)?;

        info!(entity = schema.entity, count, "updated");
        updated.iter().map(|r| self.decode(r)).collect()
    }

    pub fn delete_many(&self, ids: &[E::Id]) -> FinanceResult<bool> {
        let schema = E::SCHEMA;
        let raw: Vec<i64> = ids.iter().map(|&id| id.into()).collect();

        let outcomes = self
            .store
            .delete_records(schema.table, &raw)
            .map_err(|e| self.fail("delete", e))?;
        if outcomes.is_empty() {
            return Err(self.fail("delete", self.no_result("delete")));
        }
        self.settle("delete", outcomes)?;

        info!(entity = schema.entity, count = raw.len(), "deleted");
        Ok(true)
    }

    /// Turn batch outcomes into records, or the first failure's message
    fn settle(&self, op: &str, outcomes: Vec<RecordOutcome>) -> FinanceResult<Vec<Record>> {
        let failed = outcomes.iter().filter(|o| !o.success).count();
        if let Some(first) = outcomes.iter().find(|o| !o.success) {
            let message = first
                .message
                .clone()
                .unwrap_or_else(|| format!("Failed to {} {}", op, E::SCHEMA.entity.to_lowercase()));
            error!(entity = E::SCHEMA.entity, op, failed, "{}", message);
            return Err(classify::<E>(message));
        }

        Ok(outcomes.into_iter().filter_map(|o| o.data).collect())
    }

    fn encode(&self, patch: &E::Patch) -> FinanceResult<Record> {
        match serde_json::to_value(patch)? {
            Value::Object(domain) => E::SCHEMA.to_record(&domain),
            other => Err(FinanceError::Storage(format!(
                "{} patch did not serialize to an object: {}",
                E::SCHEMA.entity,
                other
            ))),
        }
    }

    fn decode(&self, record: &Record) -> FinanceResult<E> {
        let domain: Map<String, Value> = E::SCHEMA.to_domain(record)?;
        serde_json::from_value(Value::Object(domain)).map_err(|e| {
            FinanceError::Storage(format!("Malformed {} record: {}", E::SCHEMA.entity, e))
        })
    }

    fn not_found_or(&self, err: FinanceError, id: E::Id) -> FinanceError {
        if err.is_not_found() {
            FinanceError::not_found(E::SCHEMA.entity, id.to_string())
        } else {
            err
        }
    }

    /// A single-record write failed with a message we don't recognise as
    /// "missing": ask the store whether the record exists before reporting
    fn confirm_missing(&self, err: FinanceError, id: E::Id) -> FinanceError {
        if err.is_not_found() {
            return FinanceError::not_found(E::SCHEMA.entity, id.to_string());
        }
        if !err.is_transport() {
            return err;
        }

        let raw: i64 = id.into();
        match self
            .store
            .get_record_by_id(E::SCHEMA.table, raw, &FetchParams::default())
        {
            Err(lookup) if lookup.is_not_found() => {
                FinanceError::not_found(E::SCHEMA.entity, id.to_string())
            }
            _ => err,
        }
    }

    fn no_result(&self, op: &str) -> FinanceError {
        FinanceError::Storage(format!(
            "Failed to {} {}: no result returned",
            op,
            E::SCHEMA.entity.to_lowercase()
        ))
    }

    /// Log and hand the error back unchanged
    fn fail(&self, op: &str, err: FinanceError) -> FinanceError {
        error!(entity = E::SCHEMA.entity, op, error = %err, "record store call failed");
        err
    }
}

/// Wordings the stores use for a per-record failure on a missing id
const MISSING_RECORD_MESSAGES: [&str; 3] = ["not found", "does not exist", "no record"];

/// Per-record failures about missing records are reported as not-found,
/// everything else carries the store's message as is
fn classify<E: Entity>(message: String) -> FinanceError {
    let lowered = message.to_lowercase();
    if MISSING_RECORD_MESSAGES.iter().any(|m| lowered.contains(m)) {
        FinanceError::not_found(E::SCHEMA.entity, message)
    } else {
        FinanceError::Transport(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Account, AccountId, AccountPatch, AccountType, Budget, BudgetPatch, BudgetPeriod,
        CategoryId, Goal, GoalPatch, Money, Transaction,
    };
    use crate::storage::fixtures;
    use crate::storage::memory::MemoryStore;
    use std::time::Duration;

    fn store() -> Arc<dyn RecordStore> {
        Arc::new(
            MemoryStore::new(fixtures::builtin().unwrap()).with_latency(Duration::ZERO),
        )
    }

    #[test]
    fn test_get_all_and_by_id() {
        let repo: Repository<Account> = Repository::new(store());
        let accounts = repo.get_all().unwrap();
        assert_eq!(accounts.len(), 4);

        let first = repo.get_by_id(AccountId::new(1)).unwrap();
        assert_eq!(first.name, "Main Checking");
        assert_eq!(first.balance, Money::from_cents(245075));
    }

    #[test]
    fn test_get_by_id_missing_names_entity() {
        let repo: Repository<Account> = Repository::new(store());
        let err = repo.get_by_id(AccountId::new(999)).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Account not found: 999");
    }

    #[test]
    fn test_transactions_come_back_newest_first() {
        let repo: Repository<Transaction> = Repository::new(store());
        let txns = repo.get_all().unwrap();
        assert!(txns.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn test_create_then_update_preserves_omitted_fields() {
        let repo: Repository<Account> = Repository::new(store());
        let created = repo
            .create(AccountPatch::new(
                "Travel Fund",
                AccountType::Savings,
                Money::from_units(300),
            ))
            .unwrap();
        assert_eq!(created.id, AccountId::new(5));
        assert_eq!(created.tags, "");

        let updated = repo
            .update(
                created.id,
                AccountPatch {
                    color: Some("#000000".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Travel Fund");
        assert_eq!(updated.balance, Money::from_units(300));
        assert_eq!(updated.color, "#000000");
        assert_eq!(repo.get_by_id(created.id).unwrap(), updated);
    }

    #[test]
    fn test_budget_create_stores_zero_spent() {
        let repo: Repository<Budget> = Repository::new(store());
        let budget = repo
            .create(BudgetPatch::new(
                "Health",
                Money::from_units(80),
                BudgetPeriod::Monthly,
                CategoryId::new(8),
            ))
            .unwrap();
        assert_eq!(budget.spent, Money::zero());
    }

    #[test]
    fn test_goal_update_restamps_updated_at() {
        let repo: Repository<Goal> = Repository::new(store());
        let goal = repo
            .create(GoalPatch::new("Bike", Money::from_units(900)))
            .unwrap();
        let created_at = goal.created_at;
        assert!(created_at.is_some());

        let updated = repo
            .update(
                goal.id,
                GoalPatch {
                    current_amount: Some(Money::from_units(100)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.created_at, created_at);
        assert!(updated.updated_at >= goal.updated_at);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let repo: Repository<Account> = Repository::new(store());
        let err = repo
            .update(AccountId::new(404), AccountPatch::default())
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Account not found: 404");
    }

    #[test]
    fn test_delete() {
        let repo: Repository<Account> = Repository::new(store());
        assert!(repo.delete(AccountId::new(4)).unwrap());
        assert!(repo.get_by_id(AccountId::new(4)).unwrap_err().is_not_found());
        assert!(repo.delete(AccountId::new(4)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_batch_update_first_failure_wins() {
        let repo: Repository<Account> = Repository::new(store());
        let rename = |name: &str| AccountPatch {
            name: Some(name.into()),
            ..Default::default()
        };
        let err = repo
            .update_many(vec![
                (AccountId::new(1), rename("A")),
                (AccountId::new(77), rename("B")),
                (AccountId::new(88), rename("C")),
            ])
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Record with Id 77 not found"));
    }

    #[test]
    fn test_create_many() {
        let repo: Repository<Budget> = Repository::new(store());
        let created = repo
            .create_many(vec![
                BudgetPatch::new("A", Money::from_units(1), BudgetPeriod::Weekly, CategoryId::new(3)),
                BudgetPatch::new("B", Money::from_units(2), BudgetPeriod::Yearly, CategoryId::new(4)),
            ])
            .unwrap();
        assert_eq!(created.len(), 2);
        assert_ne!(created[0].id, created[1].id);
    }

    /// Answers every update and delete with a per-record failure in its own
    /// wording; only id 1 exists
    struct TerseStore {
        message: &'static str,
    }

    impl RecordStore for TerseStore {
        fn fetch_records(&self, _table: &str, _params: &FetchParams) -> FinanceResult<Vec<Record>> {
            Ok(Vec::new())
        }

        fn get_record_by_id(
            &self,
            _table: &str,
            id: i64,
            _params: &FetchParams,
        ) -> FinanceResult<Record> {
            if id == 1 {
                let mut record = Record::new();
                record.insert(ID_FIELD.to_string(), Value::from(1));
                Ok(record)
            } else {
                Err(FinanceError::not_found("Record", id.to_string()))
            }
        }

        fn create_records(
            &self,
            _table: &str,
            _records: Vec<Record>,
        ) -> FinanceResult<Vec<RecordOutcome>> {
            Ok(Vec::new())
        }

        fn update_records(
            &self,
            _table: &str,
            records: Vec<Record>,
        ) -> FinanceResult<Vec<RecordOutcome>> {
            Ok(records
                .iter()
                .map(|_| RecordOutcome::failed(self.message))
                .collect())
        }

        fn delete_records(&self, _table: &str, ids: &[i64]) -> FinanceResult<Vec<RecordOutcome>> {
            Ok(ids.iter().map(|_| RecordOutcome::failed(self.message)).collect())
        }
    }

    #[test]
    fn test_missing_record_wordings_are_not_found() {
        for message in ["Not Found", "Record does not exist", "NO RECORD with that Id"] {
            let err = classify::<Account>(message.to_string());
            assert!(err.is_not_found(), "{}", message);
        }
        assert!(classify::<Account>("Name is required".into()).is_transport());
    }

    #[test]
    fn test_unrecognised_failure_on_missing_id_is_not_found() {
        let repo: Repository<Account> = Repository::new(Arc::new(TerseStore {
            message: "Rejected",
        }));

        let err = repo
            .update(AccountId::new(42), AccountPatch::default())
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Account not found: 42");
        assert!(repo.delete(AccountId::new(42)).unwrap_err().is_not_found());

        // the record exists, so the store's own message stands
        let err = repo
            .update(AccountId::new(1), AccountPatch::default())
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Rejected");
    }
}
