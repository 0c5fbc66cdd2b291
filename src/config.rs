use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".bookshelf";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "bookshelf.sqlite";
/// Overrides the data directory.
pub const DATA_DIR_ENV: &str = "BOOKSHELF_DATA_DIR";
/// Overrides the log level.
pub const LOG_LEVEL_ENV: &str = "BOOKSHELF_LOG";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Startup settings, resolved once in `main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Read overrides from the environment and fall back to `~/.bookshelf`.
    pub fn from_env() -> Result<Self> {
        let data_dir = match env::var_os(DATA_DIR_ENV).filter(|value| !value.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };
        let log_level = env::var(LOG_LEVEL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            data_dir,
            log_level,
        })
    }

    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
