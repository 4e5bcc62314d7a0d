#[derive(Debug, Clone)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated,
    TaskNotFoundWithId(i64),
    TaskAlreadyClosed(i64),
    DescriptionEmpty,
    InvalidTimeOfDay(String),
    ConfirmDeleteTask(String),
    ConfirmReportTask(String),
    NoTasksForDate(String),

    // === SETTINGS MESSAGES ===
    InvalidWorkHours(String),
    SettingsSaved,
    SettingsNotFound,
    WorkHoursHeader,
    RedmineHeader,

    // === DURATION MESSAGES ===
    HeaderSection {
        label: String,
        worked: String,
        goal: String,
        overtime: String,
    },
    SummaryReported(String),
    SummaryNotReported(String),
    SummaryTitle(String),

    // === SYNC MESSAGES ===
    SyncTitle,
    SyncConfirm(usize),
    SyncActivityLoading,
    SyncActivityMissing,
    SyncActivityConnectionError,
    SyncStatusPending,
    SyncStatusSyncing,
    SyncStatusSynced,
    SyncStatusFailed,
    SyncLocked,
    SyncActivitiesMissing,
    SyncNoActivitiesLoaded(usize),
    SyncFinished { synced: usize, failed: usize },
    SyncUnavailable(String),
    SelectActivityPrompt(String),

    // === INTEGRATION MESSAGES ===
    IntegrationNotConfigured,
    IntegrationUnauthorized,
    IntegrationRejected(String),
    IntegrationUnexpectedStatus(u16),
    IntegrationTransport(String),
    IntegrationConfigParseError(String),

    // === DATABASE MESSAGES ===
    DbOpenFailed(String),
    RenderFailed(String),
    RetryOrQuit,

    // === CONFIGURATION MESSAGES ===
    ConfigParseError(String),
    DataStoragePathError,
    LoggingStarted,
    LogFileOpenFailed(String),

    // === CLI MESSAGES ===
    Usage,
    Bye,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
}
