//! File logging enabled by `--logs`.
//!
//! The interactive view owns the terminal, so events go to `mytime.log` in
//! the data directory instead. `RUST_LOG` overrides the default filter.

use crate::libs::data_storage::DataStorage;
use crate::libs::messages::macros::enable_debug_mode;
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "mytime.log";
const DEFAULT_FILTER: &str = "mytime=debug";

/// Installs the global subscriber writing to the log file and switches the
/// message macros to tracing output. Returns the log file path.
pub fn init_file_logging(storage: &DataStorage) -> Result<PathBuf> {
    let path = storage.get_path(LOG_FILE_NAME)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| msg_error_anyhow!(Message::LogFileOpenFailed(e.to_string())))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| msg_error_anyhow!(Message::LogFileOpenFailed(e.to_string())))?;

    enable_debug_mode();
    info!("{}", Message::LoggingStarted);

    Ok(path)
}
