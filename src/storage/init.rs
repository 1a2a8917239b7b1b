//! Storage initialization
//!
//! First-run setup: write the settings file and seed the mock store's
//! snapshot directory from the fixtures.

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use super::entities::ALL_SCHEMAS;
use super::fixtures;
use super::memory::MemoryStore;
use crate::config::{FintrackPaths, Settings};
use crate::error::FinanceResult;

/// Fixtures directory for the mock store: the configured one, else
/// `fixtures/` under the base directory when it exists
pub fn mock_fixtures_dir(settings: &Settings, paths: &FintrackPaths) -> Option<PathBuf> {
    settings
        .mock
        .fixtures_dir
        .clone()
        .or_else(|| Some(paths.fixtures_dir()).filter(|d| d.exists()))
}

/// Whether any table already has a snapshot in the data directory
pub fn has_snapshot(paths: &FintrackPaths) -> bool {
    let data_dir = paths.data_dir();
    ALL_SCHEMAS
        .iter()
        .any(|schema| data_dir.join(format!("{}.json", schema.table)).exists())
}

/// Initialize storage for a fresh installation.
///
/// Saves `settings`, then writes the fixture tables into the data directory
/// unless snapshots are already there. `reset` overwrites existing
/// snapshots. Returns whether the snapshots were (re)seeded.
pub fn initialize_storage(
    paths: &FintrackPaths,
    settings: &Settings,
    reset: bool,
) -> FinanceResult<bool> {
    paths.ensure_directories()?;
    settings.save(paths)?;

    if has_snapshot(paths) && !reset {
        return Ok(false);
    }

    let fixtures_dir = mock_fixtures_dir(settings, paths);
    let seed = fixtures::load_with_overrides(fixtures_dir.as_deref())?;
    MemoryStore::new(seed)
        .with_latency(Duration::ZERO)
        .with_snapshot_dir(paths.data_dir())
        .save_all()?;

    info!(data_dir = %paths.data_dir().display(), reset, "seeded mock snapshots");
    Ok(true)
}
