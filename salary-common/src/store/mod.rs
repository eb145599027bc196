//! Record persistence
//!
//! Two interchangeable backends behind [`RecordStore`]:
//! - [`CsvStore`]: append-only delimited file with a header row
//! - [`SqliteStore`]: single `salary_records` table
//!
//! Both hand every stored row to the normalizer on load, so callers see the
//! same canonical shape whichever backend is configured.

mod csv_store;
mod sqlite_store;

pub use csv_store::CsvStore;
pub use sqlite_store::SqliteStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::config::StorageConfig;
use crate::normalize::aliases::ALIAS_TABLE_VERSION;
use crate::record::SalaryRecord;
use crate::{Error, Result};

/// Which backend a store writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Csv,
    Sqlite,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Csv => "csv",
            StoreBackend::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(StoreBackend::Csv),
            "sqlite" => Ok(StoreBackend::Sqlite),
            other => Err(Error::Config(format!(
                "Unknown storage backend '{}' (expected 'csv' or 'sqlite')",
                other
            ))),
        }
    }
}

/// Persistent collection of salary records
///
/// Records are immutable once appended; there is no update or delete path.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every persisted record, normalized, in no guaranteed order
    ///
    /// Malformed rows never abort the load: unparseable fields come back as
    /// `None` and undecodable CSV lines are skipped.
    async fn load_all(&self) -> Result<Vec<SalaryRecord>>;

    /// Durably persist one record
    ///
    /// Holds the store's write lock for the whole mutation. Any I/O or
    /// constraint failure is returned as [`Error::Persistence`].
    async fn append(&self, record: &SalaryRecord) -> Result<()>;

    /// Backend identifier for health reporting
    fn backend(&self) -> StoreBackend;
}

/// Open the store selected by `config`
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn RecordStore>> {
    match config.backend {
        StoreBackend::Csv => {
            let mut store = CsvStore::open(&config.csv_file)?;
            if let Some(seed) = &config.seed_csv_file {
                store = store.with_seed(seed);
            }
            info!(
                "Using CSV store: {} (alias table v{})",
                config.csv_file.display(),
                ALIAS_TABLE_VERSION
            );
            Ok(Arc::new(store))
        }
        StoreBackend::Sqlite => {
            let store = SqliteStore::open(&config.database_file).await?;
            info!(
                "Using SQLite store: {} (alias table v{})",
                config.database_file.display(),
                ALIAS_TABLE_VERSION
            );
            Ok(Arc::new(store))
        }
    }
}
