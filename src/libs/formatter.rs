//! Time duration formatting utilities for user-friendly display.
//!
//! Durations travel through the application as signed seconds. This module
//! turns them into the compact strings shown in the task table, the header
//! section and the sync view.
//!
//! ## Format Specifications
//!
//! ### Humanized Duration
//! - Hours and minutes are extracted by truncating division
//! - A zero component is omitted, so `3600` is `"1h"` and `60` is `"1m"`
//! - Zero (and anything under a minute) is `"0m"`
//! - The sign is carried by the hour component only: `-3661` is `"-1h1m"`
//!
//! ### Decimal Hours
//! Time entries are submitted to Redmine as decimal hours with two
//! fractional digits, `5400` seconds being `"1.50"`.
//!
//! ## Examples
//!
//! ```rust
//! use mytime::libs::formatter::{humanize_duration, humanize_signed_duration, decimal_hours};
//!
//! assert_eq!(humanize_duration(3661), "1h1m");
//! assert_eq!(humanize_duration(-3661), "-1h1m");
//! assert_eq!(humanize_signed_duration(-1800), "-30m");
//! assert_eq!(decimal_hours(5400), "1.50");
//! ```

use chrono::NaiveDateTime;

/// Marker shown in the end column while a task is still running.
pub const RUNNING_MARKER: &str = "⏳";

/// Formats signed seconds as `"{h}h{m}m"`, dropping zero components.
///
/// Minutes are always positive; a negative value is only visible when the
/// hour component is non-zero.
///
/// # Examples
///
/// ```rust
/// use mytime::libs::formatter::humanize_duration;
///
/// assert_eq!(humanize_duration(0), "0m");
/// assert_eq!(humanize_duration(59), "0m");
/// assert_eq!(humanize_duration(3600), "1h");
/// assert_eq!(humanize_duration(7260), "2h1m");
/// ```
pub fn humanize_duration(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = ((seconds % 3600) / 60).abs();

    match (hours, minutes) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h{}m", h, m),
    }
}

/// Formats a value that may fall on either side of zero, such as overtime.
///
/// The sign is always explicit, so `-1800` reads `"-30m"` rather than losing
/// its sign in the minute component.
pub fn humanize_signed_duration(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "+" };
    format!("{}{}", sign, humanize_duration(seconds.saturating_abs()))
}

/// Converts seconds to decimal hours with two fractional digits.
pub fn decimal_hours(seconds: i64) -> String {
    format!("{:.2}", hours(seconds))
}

/// Seconds as fractional hours.
pub fn hours(seconds: i64) -> f64 {
    seconds as f64 / 3600.0
}

/// Formats a timestamp as a 24-hour `HH:MM` clock.
pub fn format_clock(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%H:%M").to_string()
}

/// `"{duration} ({decimal hours})"`, the form used by the summary modal.
pub fn duration_with_hours(seconds: i64) -> String {
    format!("{} ({})", humanize_duration(seconds), decimal_hours(seconds))
}
