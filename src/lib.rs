//! # mytime - personal time tracking with Redmine reporting
//!
//! A terminal day view for logging work on tasks, comparing worked time
//! against weekly goals and reporting finished work to Redmine.
//!
//! ## Features
//!
//! - **Task Tracking**: Start, stop, duplicate and edit tasks with at most
//!   one task running at a time
//! - **Work Hours**: Daily and weekly goals with signed overtime
//! - **Redmine Sync**: Grouped time entries submitted concurrently, with
//!   per-row activity resolution and partial failure handling
//! - **Interactive View**: Keyboard driven day navigation
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mytime::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
