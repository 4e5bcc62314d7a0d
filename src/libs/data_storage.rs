//! Platform-specific location of the application data directory.
//!
//! | Platform | Base directory                         |
//! |----------|----------------------------------------|
//! | Windows  | `%LOCALAPPDATA%\mytime`                |
//! | macOS    | `~/Library/Application Support/mytime` |
//! | Other    | `~/.local/share/mytime`                |
//!
//! The database, `config.json` and `mytime.log` all live in this directory.

use anyhow::Result;
use std::env::consts::OS;
use std::env::var;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "mytime";

#[derive(Debug, Clone)]
pub struct DataStorage {
    base_path: PathBuf,
}

impl Default for DataStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStorage {
    pub fn new() -> Self {
        let base_path = match OS {
            "windows" => var("LOCALAPPDATA").unwrap_or_else(|_| ".".into()),
            "macos" => var("HOME").unwrap_or_else(|_| ".".into()) + "/Library/Application Support",
            _ => var("HOME").unwrap_or_else(|_| ".".into()) + "/.local/share",
        };

        Self::with_base(Path::new(&base_path).join(APP_NAME))
    }

    /// Uses `base_path` as the data directory as is.
    pub fn with_base(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into() }
    }

    /// Path of `file_name` in the data directory, creating the directory
    /// when it does not exist yet.
    pub fn get_path(&self, file_name: &str) -> Result<PathBuf> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path)?;
        }
        Ok(self.base_path.join(file_name))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
