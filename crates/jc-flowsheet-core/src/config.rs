//! Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::{MemoryStore, RecordStore, SqliteStore, StoreResult};

/// Crate version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Patient ID shown before the user enters one.
pub const DEFAULT_PATIENT_ID: &str = "Patient 001";

/// Registry identifier shown in the summary.
pub const DEFAULT_REGISTRY_ID: &str = "123445";

/// Planned number of infusions in a treatment course.
pub const DEFAULT_TOTAL_EXPECTED_INFUSIONS: u32 = 14;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Flowsheet configuration. Missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlowsheetConfig {
    /// SQLite database file; in-memory store when absent
    pub database_path: Option<PathBuf>,
    /// Patient selected at session start
    pub default_patient_id: String,
    /// Registry identifier for the summary view
    pub registry_id: String,
    /// Treatment course length
    pub total_expected_infusions: u32,
    /// Seed bootstrap records for the default patient on open
    pub seed_demo_data: bool,
}

impl Default for FlowsheetConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            default_patient_id: DEFAULT_PATIENT_ID.to_string(),
            registry_id: DEFAULT_REGISTRY_ID.to_string(),
            total_expected_infusions: DEFAULT_TOTAL_EXPECTED_INFUSIONS,
            seed_demo_data: true,
        }
    }
}

impl FlowsheetConfig {
    /// Parse configuration from JSON.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Open the record store this configuration describes.
    pub fn open_store(&self) -> StoreResult<Box<dyn RecordStore + Send + Sync>> {
        let store: Box<dyn RecordStore + Send + Sync> = match &self.database_path {
            Some(path) => Box::new(SqliteStore::open(path)?),
            None => Box::new(MemoryStore::new()),
        };
        store.initialize()?;

        if self.seed_demo_data {
            store.seed_if_empty(&self.default_patient_id)?;
        }

        Ok(store)
    }
}

/// Default `tracing` filter directive.
pub fn default_log_filter() -> &'static str {
    "jc_flowsheet_core=info"
}
