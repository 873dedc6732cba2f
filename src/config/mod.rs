//! Configuration loading and management

mod io;
mod settings;

pub use settings::AppSettings;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration structure (`~/.quizquest/config.toml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the progress database. Defaults to the config directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Database file name inside the data directory
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// Log filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_database_file() -> String {
    "progress.db".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            database_file: default_database_file(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Full path of the progress database
    pub fn database_path(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(Self::global_config_dir)
            .join(&self.database_file)
    }
}
