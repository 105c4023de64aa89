//! Countersign configuration file handling
//!
//! Provides default configuration generation and loading. Configuration
//! files are TOML format and live in the platform data directory together
//! with the database, the wallet keyfile, and the session file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Countersign configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Wallet configuration
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

/// Wallet-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Path to the local signing keyfile (created on first connect)
    #[serde(default = "default_keyfile_path")]
    pub keyfile: PathBuf,

    /// Path to the persisted wallet session
    #[serde(default = "default_session_path")]
    pub session_file: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Platform data directory for countersign files.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("countersign")
}

/// Default config file location.
pub fn default_config_path() -> PathBuf {
    data_dir().join("config.toml")
}

fn default_database_path() -> PathBuf {
    data_dir().join("countersign.db")
}

fn default_keyfile_path() -> PathBuf {
    data_dir().join("wallet.key")
}

fn default_session_path() -> PathBuf {
    data_dir().join("session.json")
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            keyfile: default_keyfile_path(),
            session_file: default_session_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            wallet: WalletConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(path, contents)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        Ok(())
    }

    /// Load the config at `path` (or the default location), generating a
    /// default file on first run.
    pub fn load_or_create(path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_config_path);

        if path.exists() {
            Self::load(&path)
        } else {
            let config = AppConfig::default();
            config.save(&path)?;
            Ok(config)
        }
    }
}
