//! Storage layer for fintrack
//!
//! A generic repository per entity type on top of a pluggable record store:
//! the hosted record API, or an in-memory mock seeded from fixtures.

pub mod entities;
pub mod file_io;
pub mod fixtures;
pub mod init;
pub mod memory;
pub mod record;
pub mod remote;
pub mod repository;
pub mod schema;

pub use entities::Entity;
pub use memory::MemoryStore;
pub use record::{FetchParams, Record, RecordOutcome, RecordStore};
pub use remote::RemoteStore;
pub use repository::Repository;
pub use schema::{EntitySchema, Field, FieldKind};

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::{Backend, FintrackPaths, Settings};
use crate::error::FinanceResult;
use crate::models::{Account, Budget, Category, Goal, Transaction};

/// Main storage coordinator that provides access to all repositories
#[derive(Clone)]
pub struct Storage {
    pub accounts: Repository<Account>,
    pub transactions: Repository<Transaction>,
    pub categories: Repository<Category>,
    pub budgets: Repository<Budget>,
    pub goals: Repository<Goal>,
}

impl Storage {
    /// Build every repository over one shared record store
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            accounts: Repository::new(Arc::clone(&store)),
            transactions: Repository::new(Arc::clone(&store)),
            categories: Repository::new(Arc::clone(&store)),
            budgets: Repository::new(Arc::clone(&store)),
            goals: Repository::new(store),
        }
    }

    /// Open the backend the settings select
    pub fn from_settings(settings: &Settings, paths: &FintrackPaths) -> FinanceResult<Self> {
        let store: Arc<dyn RecordStore> = match settings.backend {
            Backend::Mock => {
                let latency = Duration::from_millis(settings.mock.latency_ms);
                let fixtures_dir = init::mock_fixtures_dir(settings, paths);

                let store = if settings.mock.persist {
                    MemoryStore::open(fixtures_dir.as_deref(), &paths.data_dir())?
                } else {
                    MemoryStore::new(fixtures::load_with_overrides(fixtures_dir.as_deref())?)
                };
                info!(latency_ms = settings.mock.latency_ms, persist = settings.mock.persist, "using mock store");
                Arc::new(store.with_latency(latency))
            }
            Backend::Remote => {
                let remote = &settings.remote;
                info!(base_url = %remote.base_url, project = %remote.project_id, "using remote store");
                Arc::new(RemoteStore::new(
                    &remote.base_url,
                    &remote.project_id,
                    &remote.public_key,
                    Duration::from_secs(remote.timeout_secs),
                )?)
            }
        };
        Ok(Self::new(store))
    }

    /// Isolated, zero-latency store seeded with the built-in fixtures
    pub fn in_memory() -> FinanceResult<Self> {
        let store = MemoryStore::with_fixtures()?.with_latency(Duration::ZERO);
        Ok(Self::new(Arc::new(store)))
    }

    /// Isolated, zero-latency store with no records at all
    pub fn empty() -> Self {
        Self::new(Arc::new(MemoryStore::empty().with_latency(Duration::ZERO)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalPatch, Money};
    use tempfile::TempDir;

    #[test]
    fn test_in_memory_is_seeded() {
        let storage = Storage::in_memory().unwrap();
        assert!(!storage.accounts.get_all().unwrap().is_empty());
        assert!(!storage.categories.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_in_memory_stores_are_isolated() {
        let a = Storage::in_memory().unwrap();
        let b = Storage::in_memory().unwrap();
        a.goals
            .create(GoalPatch::new("Only in a", Money::from_units(10)))
            .unwrap();
        assert_eq!(
            a.goals.get_all().unwrap().len(),
            b.goals.get_all().unwrap().len() + 1
        );
    }

    #[test]
    fn test_mock_backend_persists_between_opens() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut settings = Settings::default();
        settings.mock.latency_ms = 0;

        let first = Storage::from_settings(&settings, &paths).unwrap();
        let goal = first
            .goals
            .create(GoalPatch::new("Persisted", Money::from_units(10)))
            .unwrap();

        let second = Storage::from_settings(&settings, &paths).unwrap();
        assert_eq!(second.goals.get_by_id(goal.id).unwrap().name, "Persisted");
    }

    #[test]
    fn test_remote_backend_requires_project() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut settings = Settings::default();
        settings.backend = Backend::Remote;
        settings.remote.base_url = "https://records.example.com".into();

        assert!(Storage::from_settings(&settings, &paths).is_err());
    }
}
