//! Database layer for the mytime application.
//!
//! A single SQLite file holds the `tasks` table and the singleton `settings`
//! row. [`repository::SqliteRepository`] implements the storage contract
//! the task service consumes.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mytime::db::{db::Db, repository::SqliteRepository};
//! use mytime::libs::repository::Repository;
//!
//! let repository = SqliteRepository::new(Db::open("mytime.sqlite")?);
//! let settings = repository.settings()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection opening and schema initialization.
pub mod db;

/// Versioned schema migrations.
pub mod migrations;

/// [`crate::libs::repository::Repository`] implementation.
pub mod repository;

/// Settings row access.
pub mod settings;

/// Task queries, including the duration and sync batch SQL.
pub mod tasks;
