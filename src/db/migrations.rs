//! Versioned schema migrations.
//!
//! Every migration has a version, a name and an `up` function that runs
//! inside the transaction applying it. Applied versions are recorded in the
//! `migrations` table, and opening the database runs everything newer than the
//! highest recorded version, in order, in one transaction.
//!
//! ## Schema history
//!
//! | Version | Name                      | Change                                           |
//! |---------|---------------------------|--------------------------------------------------|
//! | 1       | `create_tasks`            | `tasks` table, date and creation indices         |
//! | 2       | `add_recurrence`          | `recurrence`, `parent_task_id`, `is_recurring`    |
//! | 3       | `add_completion_index`    | index backing completion trend queries           |
//! | 4       | `add_parent_reference`    | `parent_task_id` references `tasks(id)`, set null on delete |
//!
//! New migrations are appended to `register_migrations` with the next
//! version number. Released migrations are never edited.

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info, msg_success};
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
        // Version 1: tasks with manual per-day ordering
        self.add_migration(1, "create_tasks", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id INTEGER NOT NULL PRIMARY KEY,
                    title TEXT NOT NULL,
                    date TIMESTAMP NOT NULL,
                    sort_order INTEGER NOT NULL DEFAULT 0,
                    priority TEXT NOT NULL DEFAULT 'medium',
                    completed BOOLEAN NOT NULL DEFAULT FALSE,
                    created_at TIMESTAMP NOT NULL DEFAULT (datetime(CURRENT_TIMESTAMP, 'localtime')),
                    updated_at TIMESTAMP NOT NULL DEFAULT (datetime(CURRENT_TIMESTAMP, 'localtime'))
                )",
                [],
            )?;

            // Day listings and per-day ordering
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_date ON tasks(date, sort_order)", [])?;
            // Analytics windows select by creation time
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at)", [])?;
            Ok(())
        });

        // Version 2: recurring parents and their generated instances
        self.add_migration(2, "add_recurrence", |tx| {
            tx.execute("ALTER TABLE tasks ADD COLUMN recurrence TEXT", [])?;
            tx.execute("ALTER TABLE tasks ADD COLUMN parent_task_id INTEGER", [])?;
            tx.execute("ALTER TABLE tasks ADD COLUMN is_recurring BOOLEAN NOT NULL DEFAULT FALSE", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_parent ON tasks(parent_task_id, date)", [])?;
            Ok(())
        });

        // Version 3: completion trends select completed tasks by update time
        self.add_migration(3, "add_completion_index", |tx| {
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_completed ON tasks(completed, updated_at)", [])?;
            Ok(())
        });

        // Version 4: instances reference their parent; deleting the parent detaches them
        self.add_migration(4, "add_parent_reference", |tx| {
            tx.execute("ALTER TABLE tasks RENAME TO tasks_old", [])?;
            tx.execute(
                "CREATE TABLE tasks (
                    id INTEGER NOT NULL PRIMARY KEY,
                    title TEXT NOT NULL,
                    date TIMESTAMP NOT NULL,
                    sort_order INTEGER NOT NULL DEFAULT 0,
                    priority TEXT NOT NULL DEFAULT 'medium',
                    completed BOOLEAN NOT NULL DEFAULT FALSE,
                    created_at TIMESTAMP NOT NULL DEFAULT (datetime(CURRENT_TIMESTAMP, 'localtime')),
                    updated_at TIMESTAMP NOT NULL DEFAULT (datetime(CURRENT_TIMESTAMP, 'localtime')),
                    recurrence TEXT,
                    parent_task_id INTEGER REFERENCES tasks(id) ON DELETE SET NULL,
                    is_recurring BOOLEAN NOT NULL DEFAULT FALSE
                )",
                [],
            )?;
            // Instances whose parent is already gone lose the dangling reference
            tx.execute(
                "INSERT INTO tasks (id, title, date, sort_order, priority, completed, created_at, updated_at, recurrence, parent_task_id, is_recurring)
                SELECT id, title, date, sort_order, priority, completed, created_at, updated_at, recurrence,
                    CASE WHEN parent_task_id IN (SELECT id FROM tasks_old) THEN parent_task_id END,
                    is_recurring
                FROM tasks_old",
                [],
            )?;
            tx.execute("DROP TABLE tasks_old", [])?;

            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_date ON tasks(date, sort_order)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_parent ON tasks(parent_task_id, date)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_completed ON tasks(completed, updated_at)", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the recorded schema version.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }

        msg_info!(Message::MigrationsFound(pending.len()));

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
        msg_success!(Message::AllMigrationsCompleted);

        Ok(())
    }

    /// Highest applied version, 0 for a database without a migrations table.
    pub fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let has_table: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'migrations')",
            [],
            |row| row.get(0),
        )?;
        if !has_table {
            return Ok(0);
        }

        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))?;
        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    /// `(version, name, applied_at)` of every applied migration, oldest first.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
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
