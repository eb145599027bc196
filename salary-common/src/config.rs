//! Configuration loading and root folder resolution
//!
//! Bootstrap settings come from a small TOML file. Everything has a
//! built-in default, so a missing file is a warning, not a startup failure.
//!
//! Root folder priority:
//! 1. Command-line argument (highest priority)
//! 2. `SALARY_ROOT_FOLDER` environment variable
//! 3. TOML `root_folder`
//! 4. OS-dependent default (fallback)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::store::StoreBackend;
use crate::{Error, Result};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "SALARY_ROOT_FOLDER";

/// Directory name used under the platform config/data directories
pub const APP_DIR_NAME: &str = "salary-transparency";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Folder holding data files; relative storage paths are joined to it
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default)]
    pub storage: StorageSection,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub fx: FxConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            port: default_port(),
            bind_address: default_bind_address(),
            storage: StorageSection::default(),
            logging: LoggingConfig::default(),
            fx: FxConfig::default(),
        }
    }
}

/// `[storage]` table
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSection {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    /// Submissions file for the CSV backend
    #[serde(default = "default_csv_file")]
    pub csv_file: PathBuf,

    /// Read-only historical dataset loaded ahead of submissions (CSV backend)
    #[serde(default)]
    pub seed_csv_file: Option<PathBuf>,

    #[serde(default = "default_database_file")]
    pub database_file: PathBuf,

    /// Folder holding `Industries.csv`, `Nationalities.csv` and
    /// `worldcities.csv` (defaults to the root folder)
    #[serde(default)]
    pub reference_dir: Option<PathBuf>,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            csv_file: default_csv_file(),
            seed_csv_file: None,
            database_file: default_database_file(),
            reference_dir: None,
        }
    }
}

/// `[logging]` table
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// `[fx]` table: optional exchange-rate lookups
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FxConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_fx_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_base_currency")]
    pub base_currency: String,

    #[serde(default = "default_quote_currency")]
    pub quote_currency: String,

    #[serde(default = "default_fx_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_fx_endpoint(),
            base_currency: default_base_currency(),
            quote_currency: default_quote_currency(),
            timeout_ms: default_fx_timeout_ms(),
        }
    }
}

fn default_port() -> u16 {
    5780
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_backend() -> StoreBackend {
    StoreBackend::Csv
}

fn default_csv_file() -> PathBuf {
    PathBuf::from("new_salary.csv")
}

fn default_database_file() -> PathBuf {
    PathBuf::from("salary_data.db")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_fx_endpoint() -> String {
    "https://api.exchangerate.host/latest".to_string()
}

fn default_base_currency() -> String {
    "USD".to_string()
}

fn default_quote_currency() -> String {
    "ZMW".to_string()
}

fn default_fx_timeout_ms() -> u64 {
    5000
}

/// Storage settings with every path made absolute against the root folder
#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    pub backend: StoreBackend,
    pub csv_file: PathBuf,
    pub seed_csv_file: Option<PathBuf>,
    pub database_file: PathBuf,
    pub reference_dir: PathBuf,
}

impl StorageConfig {
    pub fn resolve(section: &StorageSection, root_folder: &Path) -> Self {
        let under_root = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root_folder.join(p)
            }
        };

        Self {
            backend: section.backend,
            csv_file: under_root(&section.csv_file),
            seed_csv_file: section.seed_csv_file.as_deref().map(&under_root),
            database_file: under_root(&section.database_file),
            reference_dir: section
                .reference_dir
                .as_deref()
                .map(&under_root)
                .unwrap_or_else(|| root_folder.to_path_buf()),
        }
    }
}

/// Parse TOML configuration text
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
}

/// Config file to read: `explicit` if given, else the platform location
pub fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(default_config_path)
}

/// Load the TOML configuration
///
/// Reads `path` (or the platform config file when `None`). A missing file
/// yields the built-in defaults; only an unreadable or malformed file is
/// an error.
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let path = match config_file_path(path) {
        Some(p) if p.exists() => p,
        other => {
            warn!(
                "No config file found{}; using built-in defaults",
                other
                    .map(|p| format!(" at {}", p.display()))
                    .unwrap_or_default()
            );
            return Ok(TomlConfig::default());
        }
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;
    let config = parse_toml_config(&content)?;
    info!("Loaded TOML configuration from {}", path.display());
    Ok(config)
}

/// Resolve the root folder from CLI, environment, TOML, then OS default
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent default
    default_root_folder()
}

/// Platform config file location (`<config_dir>/salary-transparency/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./salary_data"))
}
