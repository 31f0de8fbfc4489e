#[derive(Debug, Clone)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated(i64, String), // id, title
    TaskUpdated(i64),
    TaskDeleted(i64),
    TaskNotFound(i64),
    TaskCompleted(i64),
    TaskReopened(i64),
    TaskMoved(i64, usize), // id, position
    TasksNotFound,
    TasksHeader(String),        // date range
    ConfirmDeleteTask(String),  // title
    ConfirmDeleteInstances(usize),
    NoChangesDetected,
    PromptTaskTitle,
    PromptTaskDate,
    PromptTaskPriority,
    PromptTaskCompleted,
    TaskDetailsHeader(i64),

    // === RECURRENCE MESSAGES ===
    TaskNotRecurring(i64),
    InstancesGenerated(usize, i64), // count, parent id
    InstancesRemoved(usize, i64),   // count, parent id
    NoInstancesInRange(i64),
    RecurrenceOptionsWithoutType,
    InvalidDateRange(String, String), // from, to

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigModuleAnalytics,
    ConfirmDeleteConfig,
    PromptSelectModules,
    PromptWindowDays,
    WindowDaysRange(u32),
    PromptWeekStart,
    PromptTopCategories,

    // === ANALYTICS MESSAGES ===
    StatsHeader(String, String, u32),   // start, end, days
    TrendsHeader(String, String, String), // period, start, end
    ProductivityScore(f64),
    StreakSummary(u32, u32, Option<String>), // current, longest, last completion
    AverageTasksPerDay(f64),
    NoCompletedTasks,

    // === EXPORT MESSAGES ===
    ExportCompleted(String), // path

    // === GENERIC MESSAGES ===
    OperationCancelled,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    DatabaseVersion(u32),
    DatabaseUpToDate,
    DatabaseNeedsUpdate,
    MigrationHistory,
}
