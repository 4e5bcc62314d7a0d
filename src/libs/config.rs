//! Application configuration stored as `config.json`.
//!
//! The file is optional. A missing file yields the defaults, and every
//! section may be omitted:
//!
//! ```json
//! {
//!   "db_path": "/home/me/tracking/mytime.sqlite",
//!   "ui": { "refresh_interval": 10, "deselect_timeout": 2000 }
//! }
//! ```
//!
//! Redmine credentials are not kept here. They belong to the settings row
//! in the database, next to the work hours.

use super::data_storage::DataStorage;
use crate::db::db::DB_FILE_NAME;
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UiConfig {
    /// Seconds between background refreshes of the day view.
    #[serde(default = "UiConfig::default_refresh_interval")]
    pub refresh_interval: u64,

    /// Milliseconds of idle time before the selection is cleared.
    #[serde(default = "UiConfig::default_deselect_timeout")]
    pub deselect_timeout: u64,
}

impl UiConfig {
    fn default_refresh_interval() -> u64 {
        10
    }

    fn default_deselect_timeout() -> u64 {
        2000
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval.max(1))
    }

    pub fn deselect_timeout(&self) -> Duration {
        Duration::from_millis(self.deselect_timeout)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            refresh_interval: Self::default_refresh_interval(),
            deselect_timeout: Self::default_deselect_timeout(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiConfig>,
}

impl Config {
    pub fn read() -> Result<Config> {
        Self::read_from(&DataStorage::new())
    }

    pub fn read_from(storage: &DataStorage) -> Result<Config> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        serde_json::from_str(&config_str).map_err(|e| msg_error_anyhow!(Message::ConfigParseError(e.to_string())))
    }

    pub fn save_to(&self, storage: &DataStorage) -> Result<()> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    pub fn ui(&self) -> UiConfig {
        self.ui.clone().unwrap_or_default()
    }

    /// Database location, `db_path` when set, the data directory otherwise.
    pub fn db_path(&self, storage: &DataStorage) -> Result<PathBuf> {
        match &self.db_path {
            Some(path) => Ok(path.clone()),
            None => storage.get_path(DB_FILE_NAME),
        }
    }
}
