//! Task lifecycle and duration accounting.
//!
//! [`TaskService`] owns the business rules on top of a [`Repository`]:
//!
//! - At most one task is open at any time. Every operation that opens a task
//!   closes all open tasks first. The two writes are not wrapped in a
//!   transaction, so a crash in between leaves zero open tasks, never two.
//! - Empty project and external id values are stored as absent.
//! - Operations on a missing id fail with [`TaskError::NotFound`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mytime::db::{db::Db, repository::SqliteRepository};
//! use mytime::libs::service::TaskService;
//! use chrono::Local;
//!
//! let service = TaskService::new(SqliteRepository::new(Db::open("mytime.sqlite")?));
//! let id = service.create_task("Code review", Some("Core"), Some("4711"))?;
//! service.start_stop_task(id)?;
//!
//! let worked = service.worked_duration(Local::now().date_naive())?;
//! println!("{}", worked.format().daily.text);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::error::{TaskError, TaskResult, ValidationError};
use crate::libs::formatter::{duration_with_hours, format_clock, humanize_duration, humanize_signed_duration};
use crate::libs::messages::Message;
use crate::libs::repository::Repository;
use crate::libs::settings::Settings;
use crate::libs::task::{normalize, NewTask, ReportFilter, SyncBatchEntry, Task, TaskUpdate};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, info, warn};

const CLOCK_FORMAT: &str = "%H:%M";

/// Worked time against goals, all in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkedDuration {
    pub daily: i64,
    pub daily_goal: i64,
    pub daily_overtime: i64,
    pub weekly: i64,
    pub weekly_goal: i64,
    pub weekly_overtime: i64,
}

/// One labelled line of the header section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSection {
    pub text: String,
    /// Worked time is below the goal.
    pub behind: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedWorkedDuration {
    pub daily: HeaderSection,
    pub weekly: HeaderSection,
}

impl WorkedDuration {
    pub fn format(&self) -> FormattedWorkedDuration {
        FormattedWorkedDuration {
            daily: section("Today", self.daily, self.daily_goal, self.daily_overtime),
            weekly: section("Week", self.weekly, self.weekly_goal, self.weekly_overtime),
        }
    }
}

fn section(label: &str, worked: i64, goal: i64, overtime: i64) -> HeaderSection {
    HeaderSection {
        text: Message::HeaderSection {
            label: label.to_string(),
            worked: humanize_duration(worked),
            goal: humanize_duration(goal),
            overtime: humanize_signed_duration(overtime),
        }
        .to_string(),
        behind: overtime < 0,
    }
}

/// Worked time of a day split by the reported flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryDuration {
    pub reported: i64,
    pub not_reported: i64,
}

impl SummaryDuration {
    /// `"{duration} ({decimal hours})"`
    pub fn reported_label(&self) -> String {
        duration_with_hours(self.reported)
    }

    pub fn not_reported_label(&self) -> String {
        duration_with_hours(self.not_reported)
    }
}

/// Result of a start/stop toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartStop {
    Stopped(i64),
    /// A new task was opened with the fields of the closed one.
    Started(i64),
}

pub struct TaskService<R: Repository> {
    repository: R,
}

impl<R: Repository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        TaskService { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn settings(&self) -> TaskResult<Settings> {
        Ok(self.repository.settings()?)
    }

    pub fn tasks_by_date(&self, date: NaiveDate) -> TaskResult<Vec<Task>> {
        Ok(self.repository.tasks_by_date(date)?)
    }

    pub fn worked_duration(&self, date: NaiveDate) -> TaskResult<WorkedDuration> {
        let settings = self.repository.settings()?;
        let daily = self.repository.worked_duration_for_date(date, ReportFilter::All)?;
        let weekly = self.repository.weekly_worked_duration_for_date(date)?;
        let daily_goal = settings.goal_day_in_seconds(date);
        let weekly_goal = settings.goal_week_in_seconds();

        Ok(WorkedDuration {
            daily,
            daily_goal,
            daily_overtime: daily - daily_goal,
            weekly,
            weekly_goal,
            weekly_overtime: weekly - weekly_goal,
        })
    }

    pub fn summary_duration(&self, date: NaiveDate) -> TaskResult<SummaryDuration> {
        Ok(SummaryDuration {
            reported: self.repository.worked_duration_for_date(date, ReportFilter::Reported)?,
            not_reported: self.repository.worked_duration_for_date(date, ReportFilter::NotReported)?,
        })
    }

    /// Closes every open task, then opens a new one started now.
    pub fn create_task(&self, description: &str, project: Option<&str>, external_id: Option<&str>) -> TaskResult<i64> {
        let task = NewTask::new(description.trim(), project, external_id);
        self.open(&task)
    }

    /// Closes the task when it is open. A closed task is resumed by opening
    /// a new task with the same description, project and external id.
    pub fn start_stop_task(&self, id: i64) -> TaskResult<StartStop> {
        let task = self.get(id)?;

        if task.is_open() {
            self.stop_task(id)?;
            return Ok(StartStop::Stopped(id));
        }

        let id = self.open(&NewTask::from(&task))?;
        Ok(StartStop::Started(id))
    }

    /// Closes an open task. A closed task fails with
    /// [`TaskError::AlreadyClosed`].
    pub fn stop_task(&self, id: i64) -> TaskResult<()> {
        self.repository.close_task(id).map_err(task_error)?;
        info!(id, "task stopped");
        Ok(())
    }

    /// Opens a new task with the project and external id of `id`.
    pub fn duplicate_task_with_description(&self, id: i64, description: &str) -> TaskResult<i64> {
        let source = self.get(id)?;
        let task = NewTask {
            description: description.trim().to_string(),
            ..NewTask::from(&source)
        };
        self.open(&task)
    }

    /// Applies the edited fields. A clock equal to the stored one keeps the
    /// stored timestamp, so a task that ran past midnight stays editable.
    /// Changed clocks are combined with the task's own start date; an empty
    /// end keeps the current end.
    pub fn update_task(&self, id: i64, update: &TaskUpdate) -> TaskResult<Task> {
        let mut task = self.get(id)?;

        let description = update.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription.into());
        }

        let date = task.date();
        let start = apply_clock(task.start, date, &update.start)?;
        let end = match (update.end.trim(), task.end) {
            ("", current) => current,
            (value, Some(current)) => Some(apply_clock(current, date, value)?),
            (value, None) => Some(parse_clock(date, value)?),
        };

        if let Some(end) = end {
            if end < start {
                return Err(ValidationError::InvalidTime(update.end.clone()).into());
            }
        }

        task.description = description.to_string();
        task.project = normalize(Some(&update.project));
        task.external_id = normalize(Some(&update.external_id));
        task.start = start;
        task.end = end;

        if self.repository.update_task(&task)? == 0 {
            return Err(TaskError::NotFound(id));
        }
        debug!(id, "task updated");

        self.get(id)
    }

    pub fn delete_task(&self, id: i64) -> TaskResult<()> {
        if self.repository.delete_task(id)? == 0 {
            return Err(TaskError::NotFound(id));
        }
        info!(id, "task deleted");
        Ok(())
    }

    /// Idempotent: marking a reported task again succeeds.
    pub fn set_task_as_reported(&self, id: i64) -> TaskResult<()> {
        if self.repository.mark_reported(id)? == 0 {
            return Err(TaskError::NotFound(id));
        }
        debug!(id, "task marked as reported");
        Ok(())
    }

    /// Sync batch entries, newest day first. A failing query yields an empty
    /// batch instead of an error.
    pub fn tasks_to_sync(&self) -> Vec<SyncBatchEntry> {
        match self.repository.tasks_to_sync() {
            Ok(entries) => entries,
            Err(error) => {
                warn!(%error, "failed to load tasks to sync");
                Vec::new()
            }
        }
    }

    fn get(&self, id: i64) -> TaskResult<Task> {
        self.repository.task_by_id(id)?.ok_or(TaskError::NotFound(id))
    }

    fn open(&self, task: &NewTask) -> TaskResult<i64> {
        if task.description.is_empty() {
            return Err(ValidationError::EmptyDescription.into());
        }

        let closed = self.repository.close_open_tasks()?;
        let id = self.repository.create_task(task)?;
        info!(id, closed, "{}", Message::TaskCreated);

        Ok(id)
    }
}

/// Recovers the typed error a repository wrapped in `anyhow`.
fn task_error(error: anyhow::Error) -> TaskError {
    match error.downcast::<TaskError>() {
        Ok(error) => error,
        Err(error) => TaskError::Repository(error),
    }
}

fn apply_clock(current: NaiveDateTime, date: NaiveDate, value: &str) -> Result<NaiveDateTime, ValidationError> {
    if value.trim() == format_clock(&current) {
        return Ok(current);
    }
    parse_clock(date, value)
}

fn parse_clock(date: NaiveDate, value: &str) -> Result<NaiveDateTime, ValidationError> {
    NaiveTime::parse_from_str(value.trim(), CLOCK_FORMAT)
        .map(|time| date.and_time(time))
        .map_err(|_| ValidationError::InvalidTime(value.to_string()))
}
