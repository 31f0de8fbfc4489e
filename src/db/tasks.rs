//! Task storage.
//!
//! Besides plain CRUD this repository owns the two write paths that must not
//! race:
//!
//! - **Per-day ordering.** A new task goes to the end of its date's list. The
//!   position is computed by the `INSERT` statement itself
//!   (`COALESCE(MAX(sort_order), -1) + 1` over the same date), so two
//!   concurrent inserts can never read the same "next order".
//! - **Instance materialization.** All instances generated from a recurring
//!   task are written in one immediate transaction. Dates that already have
//!   an instance of the same parent are skipped, so generating the same range
//!   twice is harmless.

use super::db::Db;
use crate::libs::error::{RecurrenceError, TaskError};
use crate::libs::task::{NewTask, Priority, RecurrenceRule, Task, TaskFilter};
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, ToSql, TransactionBehavior};
use std::path::Path;
use tracing::debug;

const TASK_COLUMNS: &str = "id, title, date, sort_order, priority, completed, created_at, updated_at, recurrence, parent_task_id, is_recurring";
const INSERT_TASK: &str = "INSERT INTO tasks (title, date, sort_order, priority, completed, created_at, updated_at, recurrence, parent_task_id, is_recurring)
    SELECT ?1, ?2, COALESCE(MAX(sort_order), -1) + 1, ?3, ?4, ?5, ?5, ?6, ?7, ?8 FROM tasks WHERE DATE(date) = DATE(?2)";
const UPDATE_TASK: &str = "UPDATE tasks SET
    sort_order = CASE WHEN DATE(date) = DATE(?2) THEN sort_order
        ELSE (SELECT COALESCE(MAX(other.sort_order), -1) + 1 FROM tasks other WHERE DATE(other.date) = DATE(?2)) END,
    title = ?1, date = ?2, priority = ?3, completed = ?4, recurrence = ?5, is_recurring = ?6, updated_at = ?7
    WHERE id = ?8";
const SET_COMPLETED: &str = "UPDATE tasks SET completed = ?2, updated_at = ?3 WHERE id = ?1";
const TOGGLE_COMPLETED: &str = "UPDATE tasks SET completed = NOT completed, updated_at = ?2 WHERE id = ?1 RETURNING completed";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const DELETE_INSTANCES: &str = "DELETE FROM tasks WHERE parent_task_id = ?1";
const INSTANCE_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM tasks WHERE parent_task_id = ?1 AND date = ?2)";
const SELECT_DAY_IDS: &str = "SELECT id FROM tasks WHERE DATE(date) = DATE(?1) ORDER BY sort_order, id";
const SET_ORDER: &str = "UPDATE tasks SET sort_order = ?1 WHERE id = ?2";

pub struct Tasks {
    pub conn: Connection,
}

impl Tasks {
    /// Opens the task store in the application database.
    pub fn new() -> Result<Tasks> {
        let db = Db::new()?;
        Ok(Tasks { conn: db.conn })
    }

    /// Opens the task store in the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Tasks> {
        let db = Db::open(path)?;
        Ok(Tasks { conn: db.conn })
    }

    /// Inserts a task at the end of its date's list and returns the stored record.
    pub fn insert(&mut self, task: &NewTask) -> Result<Task> {
        task.validate()?;

        let recurrence = recurrence_json(task.recurrence.as_ref())?;
        insert_row(
            &self.conn,
            &RowValues {
                title: &task.title,
                date: task.date,
                priority: task.priority,
                completed: task.completed,
                recurrence,
                parent_task_id: None,
                is_recurring: task.is_recurring(),
            },
            now(),
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(task_id = id, date = %task.date, "inserted task");
        self.get_by_id(id)?.ok_or_else(|| TaskError::NotFound(id).into())
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Task>> {
        let sql = format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS);
        let task = self.conn.query_row(&sql, params![id], task_from_row).optional()?;
        Ok(task)
    }

    pub fn fetch(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        let (condition, params): (&str, Vec<Box<dyn ToSql>>) = match filter {
            TaskFilter::All => ("ORDER BY DATE(date), sort_order, id", vec![]),
            TaskFilter::DateRange(from, to) => (
                "WHERE date BETWEEN ?1 AND ?2 ORDER BY DATE(date), sort_order, id",
                vec![Box::new(from) as Box<dyn ToSql>, Box::new(to) as Box<dyn ToSql>],
            ),
            TaskFilter::CreatedBetween(from, to) => (
                "WHERE created_at BETWEEN ?1 AND ?2 ORDER BY created_at, id",
                vec![Box::new(from) as Box<dyn ToSql>, Box::new(to) as Box<dyn ToSql>],
            ),
            TaskFilter::CompletedBetween(from, to) => (
                "WHERE completed = 1 AND updated_at BETWEEN ?1 AND ?2 ORDER BY updated_at, id",
                vec![Box::new(from) as Box<dyn ToSql>, Box::new(to) as Box<dyn ToSql>],
            ),
            TaskFilter::Instances(parent_id) => ("WHERE parent_task_id = ?1 ORDER BY date, id", vec![Box::new(parent_id) as Box<dyn ToSql>]),
        };

        let sql = format!("SELECT {} FROM tasks {}", TASK_COLUMNS, condition);
        let mut stmt = self.conn.prepare(&sql)?;
        let task_iter = stmt.query_map(params_from_iter(params.iter()), task_from_row)?;

        let mut tasks = Vec::new();
        for task in task_iter {
            tasks.push(task?);
        }

        Ok(tasks)
    }

    /// Writes every editable field of `task` and bumps `updated_at`.
    ///
    /// Moving a task to another date puts it at the end of that date's list.
    pub fn update(&mut self, task: &Task) -> Result<Task> {
        if task.title.trim().is_empty() {
            return Err(TaskError::EmptyTitle.into());
        }
        if let Some(rule) = &task.recurrence {
            rule.validate().map_err(TaskError::from)?;
        }

        let is_recurring = task.parent_task_id.is_none() && task.recurrence.as_ref().is_some_and(RecurrenceRule::is_recurring);
        let affected = self.conn.execute(
            UPDATE_TASK,
            params![
                task.title.trim(),
                task.date,
                task.priority.as_str(),
                task.completed,
                recurrence_json(task.recurrence.as_ref())?,
                is_recurring,
                now(),
                task.id
            ],
        )?;
        if affected == 0 {
            return Err(TaskError::NotFound(task.id).into());
        }

        self.get_by_id(task.id)?.ok_or_else(|| TaskError::NotFound(task.id).into())
    }

    pub fn set_completed(&mut self, id: i64, completed: bool) -> Result<()> {
        let affected = self.conn.execute(SET_COMPLETED, params![id, completed, now()])?;
        if affected == 0 {
            return Err(TaskError::NotFound(id).into());
        }
        Ok(())
    }

    /// Flips the completion flag and returns the new value.
    pub fn toggle(&mut self, id: i64) -> Result<bool> {
        let completed: Option<bool> = self
            .conn
            .query_row(TOGGLE_COMPLETED, params![id, now()], |row| row.get(0))
            .optional()?;
        completed.ok_or_else(|| TaskError::NotFound(id).into())
    }

    /// Moves a task to `position` (0-based) within its date's list and
    /// renumbers that list. Positions past the end move the task to the end.
    /// Returns the position the task ended up at.
    pub fn move_to(&mut self, id: i64, position: usize) -> Result<usize> {
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let date: NaiveDateTime = tx
            .query_row("SELECT date FROM tasks WHERE id = ?1", params![id], |row| row.get(0))
            .optional()?
            .ok_or(TaskError::NotFound(id))?;

        let mut ids = {
            let mut stmt = tx.prepare(SELECT_DAY_IDS)?;
            let ids = stmt.query_map(params![date], |row| row.get::<_, i64>(0))?.collect::<Result<Vec<_>, _>>()?;
            ids
        };
        ids.retain(|&other| other != id);
        let position = position.min(ids.len());
        ids.insert(position, id);

        {
            let mut stmt = tx.prepare(SET_ORDER)?;
            for (order, task_id) in ids.iter().enumerate() {
                stmt.execute(params![order as i64, task_id])?;
            }
        }
        tx.commit()?;

        Ok(position)
    }

    pub fn delete(&mut self, id: i64) -> Result<()> {
        let affected = self.conn.execute(DELETE_TASK, params![id])?;
        if affected == 0 {
            return Err(TaskError::NotFound(id).into());
        }
        Ok(())
    }

    /// Deletes every instance generated from `parent_id`; returns how many.
    pub fn delete_instances(&mut self, parent_id: i64) -> Result<usize> {
        let deleted = self.conn.execute(DELETE_INSTANCES, params![parent_id])?;
        Ok(deleted)
    }

    /// Materializes instances of `parent` at `dates` and returns the new rows.
    ///
    /// Instances copy the parent's title and priority, start uncompleted and
    /// carry no rule of their own.
    pub fn insert_instances(&mut self, parent: &Task, dates: &[NaiveDateTime]) -> Result<Vec<Task>> {
        if !parent.is_recurring || parent.recurrence_rule().is_none() {
            return Err(TaskError::from(RecurrenceError::NotRecurring(parent.id)).into());
        }

        let now = now();
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut ids = Vec::with_capacity(dates.len());

        for &date in dates {
            let exists: bool = tx.query_row(INSTANCE_EXISTS, params![parent.id, date], |row| row.get(0))?;
            if exists {
                continue;
            }

            insert_row(
                &tx,
                &RowValues {
                    title: &parent.title,
                    date,
                    priority: parent.priority,
                    completed: false,
                    recurrence: None,
                    parent_task_id: Some(parent.id),
                    is_recurring: false,
                },
                now,
            )?;
            ids.push(tx.last_insert_rowid());
        }
        tx.commit()?;

        debug!(task_id = parent.id, requested = dates.len(), inserted = ids.len(), "materialized instances");

        let mut instances = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(task) = self.get_by_id(id)? {
                instances.push(task);
            }
        }
        Ok(instances)
    }
}

/// Column values of a row about to be inserted.
struct RowValues<'a> {
    title: &'a str,
    date: NaiveDateTime,
    priority: Priority,
    completed: bool,
    recurrence: Option<String>,
    parent_task_id: Option<i64>,
    is_recurring: bool,
}

fn insert_row(conn: &Connection, values: &RowValues, now: NaiveDateTime) -> Result<()> {
    conn.execute(
        INSERT_TASK,
        params![
            values.title,
            values.date,
            values.priority.as_str(),
            values.completed,
            now,
            values.recurrence,
            values.parent_task_id,
            values.is_recurring
        ],
    )?;
    Ok(())
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn recurrence_json(rule: Option<&RecurrenceRule>) -> Result<Option<String>> {
    Ok(rule.map(serde_json::to_string).transpose()?)
}

fn conversion_error<E>(column: usize, error: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(error))
}

fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    let priority: String = row.get(4)?;
    let recurrence: Option<String> = row.get(8)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        date: row.get(2)?,
        order: row.get(3)?,
        priority: priority.parse().map_err(|e| conversion_error(4, e))?,
        completed: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        recurrence: recurrence
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(|e| conversion_error(8, e))?,
        parent_task_id: row.get(9)?,
        is_recurring: row.get(10)?,
    })
}
