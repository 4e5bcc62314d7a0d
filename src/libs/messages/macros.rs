//! Convenient macros for application messaging and logging.
//!
//! The macros route every message either to the tracing subscriber (debug
//! mode) or to plain console output. Debug mode is on when `MYTIME_DEBUG`
//! or `RUST_LOG` is set, or when the binary was started with `--logs`.
//!
//! While the interactive view owns the terminal, `--logs` is the only way
//! to see these messages, since they land in `mytime.log`.
//!
//! ## Usage Examples
//!
//! ```rust
//! use mytime::{msg_info, msg_success, msg_error};
//! use mytime::libs::messages::Message;
//!
//! msg_success!(Message::TaskCreated);
//! msg_info!(Message::SettingsSaved, true);
//! msg_error!(Message::DescriptionEmpty);
//! ```
//!
//! ```rust
//! use mytime::{msg_error_anyhow, msg_bail_anyhow};
//! use mytime::libs::messages::Message;
//!
//! fn check(ok: bool) -> anyhow::Result<()> {
//!     if !ok {
//!         msg_bail_anyhow!(Message::SettingsNotFound);
//!     }
//!     Ok(())
//! }
//! let _error = msg_error_anyhow!(Message::DataStoragePathError);
//! ```

use std::sync::OnceLock;

/// Cached debug mode flag, decided once per process.
static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Checks if debug mode is enabled.
///
/// The first call fixes the answer for the rest of the process, so
/// [`enable_debug_mode`] must run before any message is printed.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var("MYTIME_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok())
}

/// Forces debug mode on. Used by the file logger so messages reach the log
/// instead of the terminal the interactive view is drawing on.
///
/// Returns `false` when the mode had already been decided.
#[doc(hidden)]
pub fn enable_debug_mode() -> bool {
    DEBUG_MODE.set(true).is_ok()
}

/// Prints a general message with automatic debug mode routing.
#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("{}", $msg);
        } else {
            println!("{}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n{}\n", $msg);
        } else {
            println!("\n{}\n", $msg);
        }
    };
}

/// Prints a success message with ✅ prefix and automatic routing.
#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("✅ {}", $msg);
        } else {
            println!("✅ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n✅ {}\n", $msg);
        } else {
            println!("\n✅ {}\n", $msg);
        }
    };
}

/// Prints an error message with ❌ prefix and automatic routing.
#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("❌ {}", $msg);
        } else {
            eprintln!("❌ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("\n❌ {}\n", $msg);
        } else {
            eprintln!("\n❌ {}\n", $msg);
        }
    };
}

/// Prints an informational message with ℹ️ prefix and automatic routing.
#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("ℹ️ {}", $msg);
        } else {
            println!("ℹ️ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\nℹ️ {}\n", $msg);
        } else {
            println!("\nℹ️ {}\n", $msg);
        }
    };
}

/// Debug-only message display with 🔍 prefix.
#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::debug!("🔍 {}", $msg);
        }
    };
}

/// Creates an `anyhow::Error` from a message with ❌ prefix.
#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("❌ {}", $msg)
    };
}

/// Early return with an error created from a message.
#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("❌ {}", $msg)
    };
}
