use crate::libs::formatter::{decimal_hours, format_clock, humanize_duration, RUNNING_MARKER};
use chrono::{NaiveDate, NaiveDateTime};

/// One tracked work interval.
///
/// `duration` is computed by storage at read time (`end - start`, or
/// `now - start` while the task is open) and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: i64,
    pub description: String,
    pub project: Option<String>,
    pub external_id: Option<String>,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub reported: bool,
    pub duration: i64,
}

impl Task {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    pub fn start_label(&self) -> String {
        format_clock(&self.start)
    }

    pub fn end_label(&self) -> String {
        match &self.end {
            Some(end) => format_clock(end),
            None => RUNNING_MARKER.to_string(),
        }
    }

    pub fn duration_label(&self) -> String {
        humanize_duration(self.duration)
    }

    pub fn reported_icon(&self) -> &'static str {
        if self.reported {
            "✅"
        } else {
            "❌"
        }
    }

    pub fn project_label(&self) -> &str {
        self.project.as_deref().unwrap_or("")
    }

    pub fn external_id_label(&self) -> &str {
        self.external_id.as_deref().unwrap_or("")
    }

    /// Date the task belongs to, which is the calendar day of its start.
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }
}

/// Fields for a task about to be opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub description: String,
    pub project: Option<String>,
    pub external_id: Option<String>,
}

impl NewTask {
    pub fn new(description: &str, project: Option<&str>, external_id: Option<&str>) -> Self {
        NewTask {
            description: description.to_string(),
            project: normalize(project),
            external_id: normalize(external_id),
        }
    }
}

impl From<&Task> for NewTask {
    fn from(task: &Task) -> Self {
        NewTask {
            description: task.description.clone(),
            project: task.project.clone(),
            external_id: task.external_id.clone(),
        }
    }
}

/// Editable fields in the form the modify dialog produces.
///
/// `start` and `end` are `HH:MM` clocks applied to the task's own date. An
/// empty `end` keeps the current end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub description: String,
    pub project: String,
    pub external_id: String,
    pub start: String,
    pub end: String,
}

impl From<&Task> for TaskUpdate {
    fn from(task: &Task) -> Self {
        TaskUpdate {
            description: task.description.clone(),
            project: task.project_label().to_string(),
            external_id: task.external_id_label().to_string(),
            start: task.start_label(),
            end: task.end.as_ref().map(format_clock).unwrap_or_default(),
        }
    }
}

/// Which tasks a worked-duration query counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFilter {
    All,
    Reported,
    NotReported,
}

/// Closed, unreported tasks sharing ticket, description, day and project,
/// submitted as one time entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncBatchEntry {
    pub ids: Vec<i64>,
    pub external_id: String,
    pub description: String,
    pub date: NaiveDate,
    pub project: Option<String>,
    pub duration: i64,
}

impl SyncBatchEntry {
    pub fn duration_label(&self) -> String {
        humanize_duration(self.duration)
    }

    pub fn hours(&self) -> String {
        decimal_hours(self.duration)
    }
}

/// Trims and drops empty optional text.
pub fn normalize(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}
