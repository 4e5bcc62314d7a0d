use crate::db::db::Db;
use crate::db::settings::SettingsTable;
use crate::db::tasks::{week_bounds, Tasks};
use crate::libs::repository::Repository;
use crate::libs::settings::Settings;
use crate::libs::task::{NewTask, ReportFilter, SyncBatchEntry, Task};
use anyhow::Result;
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::sync::Arc;

/// [`Repository`] over a single shared SQLite connection.
pub struct SqliteRepository {
    tasks: Tasks,
    settings: SettingsTable,
}

impl SqliteRepository {
    pub fn new(db: Db) -> Self {
        let conn = Arc::new(Mutex::new(db.conn));

        SqliteRepository {
            tasks: Tasks::new(conn.clone()),
            settings: SettingsTable::new(conn),
        }
    }

    /// Opens the configured database file.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Db::new()?))
    }
}

impl Repository for SqliteRepository {
    fn tasks_by_date(&self, date: NaiveDate) -> Result<Vec<Task>> {
        self.tasks.by_date(date)
    }

    fn worked_duration_for_date(&self, date: NaiveDate, filter: ReportFilter) -> Result<i64> {
        self.tasks.worked_for_date(date, filter)
    }

    fn weekly_worked_duration_for_date(&self, date: NaiveDate) -> Result<i64> {
        let (monday, next_monday) = week_bounds(date);
        self.tasks.worked_between(monday, next_monday)
    }

    fn settings(&self) -> Result<Settings> {
        self.settings.get()
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.settings.save(settings)
    }

    fn create_task(&self, task: &NewTask) -> Result<i64> {
        self.tasks.insert(task)
    }

    fn close_open_tasks(&self) -> Result<usize> {
        self.tasks.close_open()
    }

    fn close_task(&self, id: i64) -> Result<()> {
        self.tasks.close(id)
    }

    fn task_by_id(&self, id: i64) -> Result<Option<Task>> {
        self.tasks.get_by_id(id)
    }

    fn update_task(&self, task: &Task) -> Result<usize> {
        self.tasks.update(task)
    }

    fn delete_task(&self, id: i64) -> Result<usize> {
        self.tasks.delete(id)
    }

    fn tasks_to_sync(&self) -> Result<Vec<SyncBatchEntry>> {
        self.tasks.to_sync()
    }

    fn mark_reported(&self, id: i64) -> Result<usize> {
        self.tasks.mark_reported(id)
    }
}
