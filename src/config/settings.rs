//! User settings for fintrack
//!
//! Selects the storage backend and holds display preferences. Every field
//! has a default so partial or older config files keep loading.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::paths::FintrackPaths;
use crate::error::{FinanceError, FinanceResult};

/// Which record store backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-memory store seeded from fixtures
    #[default]
    Mock,
    /// Hosted record API
    Remote,
}

impl Backend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mock" | "memory" => Some(Self::Mock),
            "remote" | "api" => Some(Self::Remote),
            _ => None,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mock => write!(f, "mock"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// Mock store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockSettings {
    /// Artificial latency per call, in milliseconds
    pub latency_ms: u64,

    /// Write mutated tables to the data directory
    pub persist: bool,

    /// Directory of `<table>.json` fixture overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixtures_dir: Option<PathBuf>,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            latency_ms: 300,
            persist: true,
            fixtures_dir: None,
        }
    }
}

/// Remote record API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub base_url: String,
    pub project_id: String,
    pub public_key: String,
    pub timeout_secs: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            project_id: String::new(),
            public_key: String::new(),
            timeout_secs: 15,
        }
    }
}

/// User settings for fintrack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub backend: Backend,

    #[serde(default)]
    pub mock: MockSettings,

    #[serde(default)]
    pub remote: RemoteSettings,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Log filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%b %d, %Y".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backend: Backend::default(),
            mock: MockSettings::default(),
            remote: RemoteSettings::default(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &FintrackPaths) -> FinanceResult<Self> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| FinanceError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| FinanceError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Load settings and apply environment overrides
    pub fn load(paths: &FintrackPaths) -> FinanceResult<Self> {
        let mut settings = Self::load_or_create(paths)?;
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Apply `FINTRACK_*` overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> FinanceResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("FINTRACK_BACKEND") {
            self.backend = Backend::parse(&raw).ok_or_else(|| {
                FinanceError::Config(format!("Unknown backend '{}': expected mock or remote", raw))
            })?;
        }
        if let Some(raw) = lookup("FINTRACK_MOCK_LATENCY_MS") {
            self.mock.latency_ms = raw.trim().parse().map_err(|_| {
                FinanceError::Config(format!("FINTRACK_MOCK_LATENCY_MS is not a number: {}", raw))
            })?;
        }
        if let Some(url) = lookup("FINTRACK_API_URL") {
            self.remote.base_url = url;
        }
        if let Some(project) = lookup("FINTRACK_PROJECT_ID") {
            self.remote.project_id = project;
        }
        if let Some(key) = lookup("FINTRACK_PUBLIC_KEY") {
            self.remote.public_key = key;
        }
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FintrackPaths) -> FinanceResult<()> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FinanceError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FinanceError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
