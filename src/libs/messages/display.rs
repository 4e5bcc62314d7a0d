//! Display implementation for mytime application messages.
//!
//! Every user-facing string lives here, so the interactive view, the
//! modals and the CLI wizard all share one wording.
//!
//! ## Usage Integration
//!
//! ```rust
//! use mytime::{msg_info, msg_error};
//! use mytime::libs::messages::Message;
//!
//! msg_info!(Message::SettingsSaved);
//! msg_error!(Message::DescriptionEmpty);
//! ```

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated => "Task created".to_string(),
            Message::TaskNotFoundWithId(id) => format!("Task with ID {} not found", id),
            Message::TaskAlreadyClosed(id) => format!("Task {} is already closed", id),
            Message::DescriptionEmpty => "Description cannot be empty".to_string(),
            Message::InvalidTimeOfDay(value) => format!("Invalid time '{}', expected HH:MM", value),
            Message::ConfirmDeleteTask(desc) => format!("Are you sure you want to delete the task?\n\n{}", desc),
            Message::ConfirmReportTask(desc) => format!("Mark the task as reported?\n\n{}", desc),
            Message::NoTasksForDate(date) => format!("No tasks for {}", date),

            // === SETTINGS MESSAGES ===
            Message::InvalidWorkHours(value) => format!("Work hours must be 7 comma-separated numbers (Monday first), got '{}'", value),
            Message::SettingsSaved => "Settings saved".to_string(),
            Message::SettingsNotFound => "Settings row not found in the database".to_string(),
            Message::WorkHoursHeader => "Work hours".to_string(),
            Message::RedmineHeader => "Redmine settings".to_string(),

            // === DURATION MESSAGES ===
            Message::HeaderSection {
                label,
                worked,
                goal,
                overtime,
            } => format!("{}: {} of {} ({})", label, worked, goal, overtime),
            Message::SummaryReported(value) => format!("Reported: {}", value),
            Message::SummaryNotReported(value) => format!("Not reported: {}", value),
            Message::SummaryTitle(date) => format!("Summary for {}", date),

            // === SYNC MESSAGES ===
            Message::SyncTitle => "Tasks Synchronization".to_string(),
            Message::SyncConfirm(count) => format!("Do you want to sync all {} entries?", count),
            Message::SyncActivityLoading => "Loading...".to_string(),
            Message::SyncActivityMissing => "Select activity!".to_string(),
            Message::SyncActivityConnectionError => "Connection Error!".to_string(),
            Message::SyncStatusPending => "pending".to_string(),
            Message::SyncStatusSyncing => "syncing".to_string(),
            Message::SyncStatusSynced => "synced".to_string(),
            Message::SyncStatusFailed => "error".to_string(),
            Message::SyncLocked => "An operation is still in progress".to_string(),
            Message::SyncActivitiesMissing => "Every entry needs an activity before syncing".to_string(),
            Message::SyncNoActivitiesLoaded(row) => format!("No activities loaded for row {}", row + 1),
            Message::SyncFinished { synced, failed } => format!("Sync finished: {} synced, {} failed", synced, failed),
            Message::SyncUnavailable(error) => format!("Failed to read integration settings: {}", error),
            Message::SelectActivityPrompt(desc) => format!("Activity for '{}'", desc),

            // === INTEGRATION MESSAGES ===
            Message::IntegrationNotConfigured => "Redmine is not configured, run `mytime --init`".to_string(),
            Message::IntegrationUnauthorized => "Unauthorized: check the Redmine token in your settings".to_string(),
            Message::IntegrationRejected(errors) => format!("Redmine rejected the entry: {}", errors),
            Message::IntegrationUnexpectedStatus(status) => format!("Unexpected response status {}", status),
            Message::IntegrationTransport(error) => format!("Connection error: {}", error),
            Message::IntegrationConfigParseError(error) => format!("Failed to parse integration settings: {}", error),

            // === DATABASE MESSAGES ===
            Message::DbOpenFailed(error) => format!("Failed to open the database: {}", error),
            Message::RenderFailed(error) => format!("Failed to load tasks: {}", error),
            Message::RetryOrQuit => "Retry?".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigParseError(error) => format!("Failed to parse configuration: {}", error),
            Message::DataStoragePathError => "Failed to resolve the data storage path".to_string(),
            Message::LoggingStarted => "===== Logging started =====".to_string(),
            Message::LogFileOpenFailed(error) => format!("Failed to open log file: {}", error),

            // === CLI MESSAGES ===
            Message::Usage => "Usage:\n  mytime --ui [--logs]\n  mytime --init".to_string(),
            Message::Bye => "Bye!".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("✓ Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("✗ Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),
        };

        write!(f, "{}", text)
    }
}
