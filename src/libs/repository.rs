//! Storage contract consumed by the task service.
//!
//! Implemented by [`crate::db::repository::SqliteRepository`]; tests may provide
//! their own. Durations returned here are always computed relative to the
//! current time for open tasks.

use crate::libs::settings::Settings;
use crate::libs::task::{NewTask, ReportFilter, SyncBatchEntry, Task};
use anyhow::Result;
use chrono::NaiveDate;

pub trait Repository: Send + Sync {
    /// Tasks started on `date`, newest start first, ties broken by id.
    fn tasks_by_date(&self, date: NaiveDate) -> Result<Vec<Task>>;

    /// Seconds worked on `date`.
    fn worked_duration_for_date(&self, date: NaiveDate, filter: ReportFilter) -> Result<i64>;

    /// Seconds worked in the Monday..Sunday week containing `date`.
    fn weekly_worked_duration_for_date(&self, date: NaiveDate) -> Result<i64>;

    fn settings(&self) -> Result<Settings>;

    fn save_settings(&self, settings: &Settings) -> Result<()>;

    /// Inserts an open task started now and returns its id.
    fn create_task(&self, task: &NewTask) -> Result<i64>;

    /// Closes every open task, returning how many were closed.
    fn close_open_tasks(&self) -> Result<usize>;

    /// Sets `end = now`. Fails with [`TaskError::AlreadyClosed`] or
    /// [`TaskError::NotFound`] wrapped in the error.
    ///
    /// [`TaskError::AlreadyClosed`]: crate::libs::error::TaskError::AlreadyClosed
    /// [`TaskError::NotFound`]: crate::libs::error::TaskError::NotFound
    fn close_task(&self, id: i64) -> Result<()>;

    fn task_by_id(&self, id: i64) -> Result<Option<Task>>;

    /// Writes every editable field of `task`, returning affected rows.
    fn update_task(&self, task: &Task) -> Result<usize>;

    /// Deletes the task, returning affected rows.
    fn delete_task(&self, id: i64) -> Result<usize>;

    /// Closed, unreported tasks with an external id, grouped per time entry.
    fn tasks_to_sync(&self) -> Result<Vec<SyncBatchEntry>>;

    /// Marks a task reported, returning affected rows.
    fn mark_reported(&self, id: i64) -> Result<usize>;
}
