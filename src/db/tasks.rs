use crate::libs::error::TaskError;
use crate::libs::task::{NewTask, ReportFilter, SyncBatchEntry, Task};
use anyhow::Result;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Timelike};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Arc;

/// Seconds between start and end, or between start and now for open tasks.
const DURATION: &str = "(COALESCE(STRFTIME('%s', end), STRFTIME('%s', DATETIME('now', 'localtime'))) - STRFTIME('%s', start))";

const TASK_COLUMNS: &str = "id, description, project, external_id, start, end, reported";

const ORDER_BY_START: &str = "ORDER BY start DESC, id";

const INSERT_TASK: &str = "INSERT INTO tasks (description, project, external_id, start) VALUES (?1, ?2, ?3, ?4)";

const CLOSE_OPEN_TASKS: &str = "UPDATE tasks SET end = ?1 WHERE end IS NULL";

const CLOSE_TASK: &str = "UPDATE tasks SET end = ?1 WHERE id = ?2 AND end IS NULL";

const UPDATE_TASK: &str = "UPDATE tasks SET description = ?1, project = ?2, external_id = ?3, start = ?4, end = ?5, reported = ?6 WHERE id = ?7";

const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";

const MARK_REPORTED: &str = "UPDATE tasks SET reported = TRUE WHERE id = ?1";

const SELECT_TASKS_TO_SYNC_TEMPLATE: &str = "SELECT GROUP_CONCAT(id), external_id, description, DATE(start) AS day, project, SUM({duration})
    FROM tasks
    WHERE end IS NOT NULL AND reported = FALSE AND external_id IS NOT NULL AND external_id != ''
    GROUP BY external_id, description, day, project
    ORDER BY day DESC, MIN(id)";

/// Storage format of every timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct Tasks {
    pub conn: Arc<Mutex<Connection>>,
}

impl Tasks {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Tasks { conn }
    }

    pub fn by_date(&self, date: NaiveDate) -> Result<Vec<Task>> {
        let sql = format!(
            "SELECT {}, {} FROM tasks WHERE DATE(start) = ?1 {}",
            TASK_COLUMNS, DURATION, ORDER_BY_START
        );
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(params![date_param(date)], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Task>> {
        let sql = format!("SELECT {}, {} FROM tasks WHERE id = ?1", TASK_COLUMNS, DURATION);
        let conn = self.conn.lock();
        let task = conn.query_row(&sql, params![id], row_to_task).optional()?;

        Ok(task)
    }

    pub fn worked_for_date(&self, date: NaiveDate, filter: ReportFilter) -> Result<i64> {
        let condition = match filter {
            ReportFilter::All => "",
            ReportFilter::Reported => " AND reported = TRUE",
            ReportFilter::NotReported => " AND reported = FALSE",
        };
        let sql = format!(
            "SELECT COALESCE(SUM({}), 0) FROM tasks WHERE DATE(start) = ?1{}",
            DURATION, condition
        );
        let conn = self.conn.lock();
        let seconds: i64 = conn.query_row(&sql, params![date_param(date)], |row| row.get(0))?;

        Ok(seconds)
    }

    /// Seconds worked from `from` (inclusive) to `to` (exclusive).
    pub fn worked_between(&self, from: NaiveDate, to: NaiveDate) -> Result<i64> {
        let sql = format!(
            "SELECT COALESCE(SUM({}), 0) FROM tasks WHERE DATE(start) >= ?1 AND DATE(start) < ?2",
            DURATION
        );
        let conn = self.conn.lock();
        let seconds: i64 = conn.query_row(&sql, params![date_param(from), date_param(to)], |row| row.get(0))?;

        Ok(seconds)
    }

    pub fn insert(&self, task: &NewTask) -> Result<i64> {
        let conn = self.conn.lock();
        conn.execute(
            INSERT_TASK,
            params![task.description, task.project, task.external_id, timestamp_param(&now())],
        )?;

        Ok(conn.last_insert_rowid())
    }

    pub fn close_open(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let closed = conn.execute(CLOSE_OPEN_TASKS, params![timestamp_param(&now())])?;

        Ok(closed)
    }

    pub fn close(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock();
        let closed = conn.execute(CLOSE_TASK, params![timestamp_param(&now()), id])?;

        if closed == 0 {
            let exists: bool = conn.query_row("SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1)", params![id], |row| row.get(0))?;
            return Err(if exists { TaskError::AlreadyClosed(id) } else { TaskError::NotFound(id) }.into());
        }

        Ok(())
    }

    pub fn update(&self, task: &Task) -> Result<usize> {
        let conn = self.conn.lock();
        let updated = conn.execute(
            UPDATE_TASK,
            params![
                task.description,
                task.project,
                task.external_id,
                timestamp_param(&task.start),
                task.end.as_ref().map(timestamp_param),
                task.reported,
                task.id
            ],
        )?;

        Ok(updated)
    }

    pub fn delete(&self, id: i64) -> Result<usize> {
        let conn = self.conn.lock();
        let deleted = conn.execute(DELETE_TASK, params![id])?;

        Ok(deleted)
    }

    pub fn mark_reported(&self, id: i64) -> Result<usize> {
        let conn = self.conn.lock();
        let updated = conn.execute(MARK_REPORTED, params![id])?;

        Ok(updated)
    }

    pub fn to_sync(&self) -> Result<Vec<SyncBatchEntry>> {
        let sql = SELECT_TASKS_TO_SYNC_TEMPLATE.replace("{duration}", DURATION);
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, NaiveDate>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, i64>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut entries = Vec::with_capacity(rows.len());
        for (ids, external_id, description, date, project, duration) in rows {
            let mut ids = ids
                .split(',')
                .map(|id| id.trim().parse::<i64>())
                .collect::<Result<Vec<_>, _>>()?;
            ids.sort_unstable();

            entries.push(SyncBatchEntry {
                ids,
                external_id,
                description,
                date,
                project,
                duration,
            });
        }

        Ok(entries)
    }
}

fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        description: row.get(1)?,
        project: row.get(2)?,
        external_id: row.get(3)?,
        start: row.get(4)?,
        end: row.get(5)?,
        reported: row.get(6)?,
        duration: row.get(7)?,
    })
}

/// Current local time at whole-second precision.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn timestamp_param(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

fn date_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Monday of the week containing `date`, and the Monday after it.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date.week(chrono::Weekday::Mon).first_day();
    (monday, monday + Duration::days(7))
}
