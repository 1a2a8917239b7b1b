//! In-memory record store
//!
//! Stands in for the remote record API during development and tests. Every
//! call waits a fixed artificial latency so callers see request/response
//! timing. When a snapshot directory is set, each mutated table is written
//! back as `<table>.json` so later processes pick the change up. Snapshots
//! are not safe for concurrent writers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::fixtures::{self, Seed};
use super::file_io::{read_json, write_json_atomic};
use super::record::{record_id, FetchParams, Record, RecordOutcome, RecordStore, ID_FIELD};
use crate::error::{FinanceError, FinanceResult};

/// Default artificial latency per call
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

/// Next id per table, kept next to the table snapshots so ids of deleted
/// records are never handed out again
pub const SEQUENCES_FILE: &str = "sequences.json";

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Record>,
    next_id: i64,
}

impl Table {
    fn new(rows: Vec<Record>) -> Self {
        let next_id = rows.iter().filter_map(record_id).max().unwrap_or(0) + 1;
        Self { rows, next_id }
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.rows.iter().position(|r| record_id(r) == Some(id))
    }
}

/// Record store held entirely in memory
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
    latency: Duration,
    snapshot_dir: Option<PathBuf>,
}

impl MemoryStore {
    /// A store over the given seed tables, with the default latency
    pub fn new(seed: Seed) -> Self {
        let tables = seed
            .into_iter()
            .map(|(name, rows)| (name, Table::new(rows)))
            .collect();
        Self {
            tables: RwLock::new(tables),
            latency: DEFAULT_LATENCY,
            snapshot_dir: None,
        }
    }

    /// A store seeded with the built-in fixtures
    pub fn with_fixtures() -> FinanceResult<Self> {
        Ok(Self::new(fixtures::builtin()?))
    }

    /// An empty store
    pub fn empty() -> Self {
        Self::new(Seed::new())
    }

    /// Open a persistent store: fixtures first, then any fixture overrides,
    /// then whatever an earlier run left in `snapshot_dir`
    pub fn open(fixtures_dir: Option<&Path>, snapshot_dir: &Path) -> FinanceResult<Self> {
        let mut seed = fixtures::load_with_overrides(fixtures_dir)?;
        seed.extend(fixtures::load_dir(snapshot_dir)?);
        let sequences: HashMap<String, i64> =
            read_json(snapshot_dir.join(SEQUENCES_FILE))?.unwrap_or_default();

        let store = Self::new(seed);
        {
            let mut tables = store.write()?;
            for (name, next_id) in sequences {
                let table = tables.entry(name).or_default();
                table.next_id = table.next_id.max(next_id);
            }
        }
        Ok(store.with_snapshot_dir(snapshot_dir))
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = Some(dir.into());
        self
    }

    /// Write every table to the snapshot directory
    pub fn save_all(&self) -> FinanceResult<()> {
        let tables = self.read()?;
        for name in tables.keys() {
            self.persist(&tables, name)?;
        }
        Ok(())
    }

    fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
    }

    fn read(&self) -> FinanceResult<RwLockReadGuard<'_, HashMap<String, Table>>> {
        self.tables
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> FinanceResult<RwLockWriteGuard<'_, HashMap<String, Table>>> {
        self.tables
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn persist(&self, tables: &HashMap<String, Table>, name: &str) -> FinanceResult<()> {
        let (Some(dir), Some(table)) = (&self.snapshot_dir, tables.get(name)) else {
            return Ok(());
        };
        write_json_atomic(dir.join(format!("{}.json", name)), &table.rows)?;

        let sequences: HashMap<&str, i64> = tables
            .iter()
            .map(|(name, table)| (name.as_str(), table.next_id))
            .collect();
        write_json_atomic(dir.join(SEQUENCES_FILE), &sequences)
    }
}

fn project(record: &Record, params: &FetchParams) -> Record {
    if params.fields.is_empty() {
        return record.clone();
    }
    let mut out = Record::new();
    if let Some(id) = record.get(ID_FIELD) {
        out.insert(ID_FIELD.to_string(), id.clone());
    }
    for field in &params.fields {
        if let Some(value) = record.get(&field.name) {
            out.insert(field.name.clone(), value.clone());
        }
    }
    out
}

impl RecordStore for MemoryStore {
    fn fetch_records(&self, table: &str, params: &FetchParams) -> FinanceResult<Vec<Record>> {
        self.simulate_latency();
        let tables = self.read()?;

        let mut rows: Vec<Record> = tables
            .get(table)
            .map(|t| t.rows.iter().map(|r| project(r, params)).collect())
            .unwrap_or_default();

        if !params.order_by.is_empty() {
            rows.sort_by(|a, b| {
                params
                    .order_by
                    .iter()
                    .map(|order| order.compare(a, b))
                    .find(|ord| ord.is_ne())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        debug!(table, count = rows.len(), "memory store fetch");
        Ok(rows)
    }

    fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        params: &FetchParams,
    ) -> FinanceResult<Record> {
        self.simulate_latency();
        let tables = self.read()?;

        tables
            .get(table)
            .and_then(|t| t.position(id).map(|pos| project(&t.rows[pos], params)))
            .ok_or_else(|| FinanceError::not_found("Record", id.to_string()))
    }

    fn create_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> FinanceResult<Vec<RecordOutcome>> {
        self.simulate_latency();
        let mut tables = self.write()?;
        let entry = tables.entry(table.to_string()).or_default();
        if entry.next_id < 1 {
            entry.next_id = 1;
        }

        let mut outcomes = Vec::with_capacity(records.len());
        for mut record in records {
            let id = entry.next_id;
            entry.next_id += 1;
            record.insert(ID_FIELD.to_string(), id.into());
            entry.rows.push(record.clone());
            outcomes.push(RecordOutcome::ok(Some(record)));
        }

        debug!(table, count = outcomes.len(), "memory store create");
        self.persist(&tables, table)?;
        Ok(outcomes)
    }

    fn update_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> FinanceResult<Vec<RecordOutcome>> {
        self.simulate_latency();
        let mut tables = self.write()?;
        let entry = tables.entry(table.to_string()).or_default();

        let mut outcomes = Vec::with_capacity(records.len());
        for record in records {
            let Some(id) = record_id(&record) else {
                outcomes.push(RecordOutcome::failed("Record is missing an Id"));
                continue;
            };
            match entry.position(id) {
                Some(pos) => {
                    let stored = &mut entry.rows[pos];
                    for (key, value) in record {
                        stored.insert(key, value);
                    }
                    outcomes.push(RecordOutcome::ok(Some(stored.clone())));
                }
                None => {
                    warn!(table, id, "update of missing record");
                    outcomes.push(RecordOutcome::failed(format!(
                        "Record with Id {} not found",
                        id
                    )));
                }
            }
        }

        self.persist(&tables, table)?;
        Ok(outcomes)
    }

    fn delete_records(&self, table: &str, ids: &[i64]) -> FinanceResult<Vec<RecordOutcome>> {
        self.simulate_latency();
        let mut tables = self.write()?;
        let entry = tables.entry(table.to_string()).or_default();

        let outcomes = ids
            .iter()
            .map(|&id| match entry.position(id) {
                Some(pos) => {
                    entry.rows.remove(pos);
                    RecordOutcome::ok(None)
                }
                None => RecordOutcome::failed(format!("Record with Id {} not found", id)),
            })
            .collect();

        self.persist(&tables, table)?;
        Ok(outcomes)
    }
}
