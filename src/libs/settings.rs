//! Work-hours policy.
//!
//! The settings row stores daily goals as seven comma-separated hour values,
//! Monday first. A malformed value never fails a render: goals degrade to
//! zero and the parse is retried on the next call.

use crate::libs::error::ValidationError;
use chrono::{Datelike, NaiveDate};
use std::sync::OnceLock;
use tracing::warn;

pub const DEFAULT_WORK_HOURS: &str = "8,8,8,8,8,0,0";
pub const DEFAULT_INTEGRATION_CONFIG: &str = "{}";

#[derive(Debug, Clone)]
pub struct Settings {
    pub work_hours: String,
    pub integration_config: String,
    pub theme: String,
    pub view_type: String,
    pub dark_mode: bool,
    parsed: OnceLock<[f64; 7]>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::new(DEFAULT_WORK_HOURS, DEFAULT_INTEGRATION_CONFIG)
    }
}

impl Settings {
    pub fn new(work_hours: &str, integration_config: &str) -> Self {
        Settings {
            work_hours: work_hours.to_string(),
            integration_config: integration_config.to_string(),
            theme: "default".to_string(),
            view_type: "table".to_string(),
            dark_mode: false,
            parsed: OnceLock::new(),
        }
    }

    /// Goal for the weekday of `date`, in whole seconds.
    pub fn goal_day_in_seconds(&self, date: NaiveDate) -> i64 {
        let index = date.weekday().num_days_from_monday() as usize;
        self.hours().map(|hours| (hours[index] * 3600.0) as i64).unwrap_or(0)
    }

    /// Sum of all seven daily goals, in whole seconds.
    pub fn goal_week_in_seconds(&self) -> i64 {
        self.hours().map(|hours| (hours.iter().sum::<f64>() * 3600.0) as i64).unwrap_or(0)
    }

    /// Replaces the work hours, dropping the cached parse.
    pub fn set_work_hours(&mut self, work_hours: &str) {
        self.work_hours = work_hours.to_string();
        self.parsed = OnceLock::new();
    }

    fn hours(&self) -> Option<&[f64; 7]> {
        if let Some(hours) = self.parsed.get() {
            return Some(hours);
        }
        match parse_work_hours(&self.work_hours) {
            Ok(hours) => Some(self.parsed.get_or_init(|| hours)),
            Err(error) => {
                warn!("{}", error);
                None
            }
        }
    }
}

/// Parses exactly seven non-negative hour values.
pub fn parse_work_hours(value: &str) -> Result<[f64; 7], ValidationError> {
    let invalid = || ValidationError::InvalidWorkHours(value.to_string());

    let values = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|_| invalid())?;

    if values.iter().any(|hours| !hours.is_finite() || *hours < 0.0) {
        return Err(invalid());
    }

    values.try_into().map_err(|_| invalid())
}
