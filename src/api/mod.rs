//! External time tracker integration.
//!
//! The sync orchestrator only depends on [`Integration`]; [`redmine`] is the
//! implementation used by the binary.

use crate::libs::error::IntegrationError;
use chrono::NaiveDate;
use std::future::Future;

pub mod redmine;

pub use redmine::{Redmine, RedmineConfig};

/// Work category an external time entry is booked under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub id: i64,
    pub name: String,
}

/// Activities allowed for a ticket's project and the configured default
/// among them, if any matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityLookup {
    pub activities: Vec<Activity>,
    pub default: Option<Activity>,
}

/// One aggregated time entry ready for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeEntry {
    pub external_id: String,
    pub description: String,
    pub date: NaiveDate,
    /// Decimal hours, e.g. `"1.50"`.
    pub hours: String,
    pub activity_id: i64,
}

/// Futures must be `Send`, since every batch entry runs on its own worker.
pub trait Integration: Send + Sync + 'static {
    /// Looks up the ticket, its project's allowed activities and the
    /// configured default among them.
    fn resolve_activities(&self, external_id: &str) -> impl Future<Output = Result<ActivityLookup, IntegrationError>> + Send;

    fn submit_time_entry(&self, entry: &TimeEntry) -> impl Future<Output = Result<(), IntegrationError>> + Send;
}
