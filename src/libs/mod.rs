//! Core library modules for mytime.
//!
//! ## Features
//!
//! - **Core Infrastructure**: Configuration, data storage, messaging, logging
//! - **Domain**: Tasks, settings, duration formatting, the task service
//! - **Sync**: Batch grouping and the concurrent Redmine orchestrator
//! - **User Interface**: Navigation, actions, timers, rendering, modals and
//!   the event loop driving them
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mytime::db::db::Db;
//! use mytime::db::repository::SqliteRepository;
//! use mytime::libs::service::TaskService;
//!
//! let service = TaskService::new(SqliteRepository::new(Db::new()?));
//! let id = service.create_task("Review pull request", None, Some("4211"))?;
//! service.start_stop_task(id)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod actions;
pub mod app;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod formatter;
pub mod logger;
pub mod messages;
pub mod modals;
pub mod navigation;
pub mod repository;
pub mod service;
pub mod settings;
pub mod sync;
pub mod task;
pub mod timers;
pub mod view;
