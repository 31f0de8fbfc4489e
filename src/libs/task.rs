//! Task records and the recurrence rule attached to them.
//!
//! A task is scheduled on a calendar date (with a time of day), ordered
//! manually among the tasks of the same date, and optionally carries a
//! recurrence rule. Tasks holding an active rule are *parent* tasks
//! (`is_recurring = true`); the instances generated from them point back via
//! `parent_task_id` and are never recurring themselves.

use crate::libs::error::{RecurrenceError, TaskError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task priority. The declaration order is the reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(TaskError::InvalidPriority(s.to_string())),
        }
    }
}

/// Unit a recurrence rule steps by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceType::None => "none",
            RecurrenceType::Daily => "daily",
            RecurrenceType::Weekly => "weekly",
            RecurrenceType::Monthly => "monthly",
            RecurrenceType::Yearly => "yearly",
        }
    }
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceType {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(RecurrenceType::None),
            "daily" => Ok(RecurrenceType::Daily),
            "weekly" => Ok(RecurrenceType::Weekly),
            "monthly" => Ok(RecurrenceType::Monthly),
            "yearly" => Ok(RecurrenceType::Yearly),
            _ => Err(TaskError::InvalidRecurrenceType(s.to_string())),
        }
    }
}

fn default_interval() -> u32 {
    1
}

/// How a parent task repeats.
///
/// Serialized with the field names the storage layer persists
/// (`type`, `interval`, `endDate`, `count`, `weekdays`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    #[serde(rename = "type")]
    pub kind: RecurrenceType,

    /// Step multiplier: every `interval` days, weeks, months or years.
    #[serde(default = "default_interval")]
    pub interval: u32,

    /// No occurrence is generated after this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDateTime>,

    /// Maximum number of occurrences, the start date included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,

    /// Weekday indices, 0 = Sunday through 6 = Saturday. Only used by weekly rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekdays: Option<Vec<u8>>,
}

impl RecurrenceRule {
    pub fn new(kind: RecurrenceType, interval: u32) -> Self {
        Self {
            kind,
            interval,
            end_date: None,
            count: None,
            weekdays: None,
        }
    }

    pub fn daily(interval: u32) -> Self {
        Self::new(RecurrenceType::Daily, interval)
    }

    pub fn weekly(interval: u32) -> Self {
        Self::new(RecurrenceType::Weekly, interval)
    }

    pub fn monthly(interval: u32) -> Self {
        Self::new(RecurrenceType::Monthly, interval)
    }

    pub fn yearly(interval: u32) -> Self {
        Self::new(RecurrenceType::Yearly, interval)
    }

    pub fn with_end_date(mut self, end_date: NaiveDateTime) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_weekdays(mut self, weekdays: Vec<u8>) -> Self {
        self.weekdays = Some(weekdays);
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.kind != RecurrenceType::None
    }

    /// Checks the rule invariants: `interval >= 1`, `count >= 1`, weekdays in `0..=6`.
    pub fn validate(&self) -> Result<(), RecurrenceError> {
        if self.interval < 1 {
            return Err(RecurrenceError::InvalidInterval(self.interval));
        }
        if let Some(count) = self.count {
            if count < 1 {
                return Err(RecurrenceError::InvalidCount(count));
            }
        }
        if let Some(weekdays) = &self.weekdays {
            if let Some(&day) = weekdays.iter().find(|&&day| day > 6) {
                return Err(RecurrenceError::InvalidWeekday(day));
            }
        }
        Ok(())
    }

    /// Effective expansion horizon: the earlier of the rule's end date and `range_end`.
    pub fn horizon(&self, range_end: NaiveDateTime) -> NaiveDateTime {
        match self.end_date {
            Some(end_date) if end_date < range_end => end_date,
            _ => range_end,
        }
    }
}

/// A stored task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub date: NaiveDateTime,
    /// Manual position among the tasks sharing the same calendar date.
    pub order: i64,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
    #[serde(default)]
    pub parent_task_id: Option<i64>,
    #[serde(default)]
    pub is_recurring: bool,
}

impl Task {
    /// The active recurrence rule, if any. A rule of type `none` counts as absent.
    pub fn recurrence_rule(&self) -> Option<&RecurrenceRule> {
        self.recurrence.as_ref().filter(|rule| rule.is_recurring())
    }

    pub fn is_instance(&self) -> bool {
        self.parent_task_id.is_some()
    }

    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.completed && self.date < now
    }
}

/// Input for creating a task. Storage assigns id, order and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub date: NaiveDateTime,
    pub priority: Priority,
    pub completed: bool,
    pub recurrence: Option<RecurrenceRule>,
}

impl NewTask {
    pub fn new(title: &str, date: NaiveDateTime) -> Self {
        NewTask {
            title: title.trim().to_string(),
            date,
            priority: Priority::default(),
            completed: false,
            recurrence: None,
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(rule);
        self
    }

    /// Parent tasks are exactly the tasks carrying an active rule.
    pub fn is_recurring(&self) -> bool {
        self.recurrence.as_ref().is_some_and(RecurrenceRule::is_recurring)
    }

    /// Boundary validation: non-empty title and a well-formed rule.
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        if let Some(rule) = &self.recurrence {
            rule.validate()?;
        }
        Ok(())
    }
}

/// Selection criteria for fetching tasks from storage.
#[derive(Debug, Clone)]
pub enum TaskFilter {
    All,
    /// Scheduled within the inclusive range, sorted by date then manual order.
    DateRange(NaiveDateTime, NaiveDateTime),
    /// Created within the inclusive range, sorted by creation time.
    CreatedBetween(NaiveDateTime, NaiveDateTime),
    /// Completed tasks last updated within the inclusive range, sorted by update time.
    CompletedBetween(NaiveDateTime, NaiveDateTime),
    /// Instances generated from the given parent task.
    Instances(i64),
}
