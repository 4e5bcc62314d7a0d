//! Database schema migration system.
//!
//! Migrations are registered in version order and recorded in a
//! `migrations` table. Every pending migration runs inside one transaction,
//! so a failure leaves the schema exactly as it was.
//!
//! ## Adding a Migration
//!
//! ```rust,ignore
//! self.add_migration(3, "add_task_notes", |tx| {
//!     tx.execute("ALTER TABLE tasks ADD COLUMN notes TEXT", [])?;
//!     Ok(())
//! });
//! ```

use crate::libs::messages::Message;
use crate::libs::settings::{DEFAULT_INTEGRATION_CONFIG, DEFAULT_WORK_HOURS};
use crate::{msg_debug, msg_error};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: tracked intervals
        self.add_migration(1, "create_tasks", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER NOT NULL PRIMARY KEY,
        description TEXT NOT NULL,
        start TIMESTAMP NOT NULL,
        end TIMESTAMP,
        reported BOOLEAN NOT NULL DEFAULT FALSE,
        external_id TEXT,
        project TEXT
    )",
                [],
            )?;

            // Day and week lookups filter on the start date
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_start ON tasks(start)", [])?;
            Ok(())
        });

        // Version 2: singleton settings row
        self.add_migration(2, "create_settings", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS settings (
        id INTEGER NOT NULL PRIMARY KEY CHECK (id = 1),
        work_hours TEXT NOT NULL,
        integration_config TEXT NOT NULL DEFAULT '{}',
        theme TEXT NOT NULL DEFAULT 'default',
        view_type TEXT NOT NULL DEFAULT 'table',
        dark_mode BOOLEAN NOT NULL DEFAULT FALSE
    )",
                [],
            )?;

            tx.execute(
                "INSERT OR IGNORE INTO settings (id, work_hours, integration_config) VALUES (1, ?1, ?2)",
                params![DEFAULT_WORK_HOURS, DEFAULT_INTEGRATION_CONFIG],
            )?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!("Database is up to date");
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                    msg_debug!(Message::MigrationCompleted(migration.version));
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }

        tx.commit()?;
        msg_debug!(Message::AllMigrationsCompleted);

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))?;

        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String)>> {
        let mut stmt = conn.prepare("SELECT version, name FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    let manager = MigrationManager::new();
    manager.run_migrations(conn)?;
    Ok(())
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    let manager = MigrationManager::new();
    manager.get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    let current = manager.get_current_version(conn)?;
    Ok(current < manager.latest_version())
}
