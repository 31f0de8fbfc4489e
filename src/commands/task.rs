use crate::{
    db::tasks::Tasks,
    libs::{
        error::TaskError,
        formatter::{end_of_day, format_date, format_datetime, parse_date, parse_datetime, start_of_day},
        messages::Message,
        task::{NewTask, Priority, RecurrenceRule, RecurrenceType, Task, TaskFilter},
        view::View,
    },
    msg_bail_anyhow, msg_error_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::Local;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: TaskCommand,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Create a task at the end of its day's list
    Add {
        title: String,
        /// today, tomorrow, YYYY-MM-DD or YYYY-MM-DD HH:MM (default: now)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        #[command(flatten)]
        recurrence: RecurrenceArgs,
    },
    /// List tasks of a day or a date range
    List {
        /// Single day (default: today)
        #[arg(short, long, conflicts_with_all = ["from", "to", "all"])]
        date: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(short, long)]
        all: bool,
    },
    /// Show one task
    Show { id: i64 },
    /// Edit a task; without options the fields are prompted for
    Edit {
        id: i64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,
        #[command(flatten)]
        recurrence: RecurrenceArgs,
    },
    /// Mark a task as completed
    Done {
        id: i64,
        /// Mark as not completed instead
        #[arg(short, long, conflicts_with = "toggle")]
        undo: bool,
        /// Flip the current state
        #[arg(short, long)]
        toggle: bool,
    },
    /// Move a task to a position (0-based) within its day
    Move { id: i64, position: usize },
    /// Delete a task
    Delete {
        id: i64,
        /// Skip confirmation; generated instances are deleted too
        #[arg(short, long)]
        yes: bool,
    },
}

/// Recurrence options shared by `add` and `edit`.
#[derive(Debug, Args, Default)]
pub struct RecurrenceArgs {
    /// Repeat the task
    #[arg(long, value_enum)]
    repeat: Option<RecurrenceType>,
    /// Repeat every N days, weeks, months or years
    #[arg(long)]
    interval: Option<u32>,
    /// Last day on which an occurrence may fall
    #[arg(long)]
    until: Option<String>,
    /// Maximum number of occurrences, the task itself included
    #[arg(long)]
    count: Option<u32>,
    /// Weekdays for weekly repeats, 0 = Sunday (e.g. 1,3,5)
    #[arg(long, value_delimiter = ',')]
    weekdays: Option<Vec<u8>>,
}

impl RecurrenceArgs {
    /// The rule described by the options; `None` when `--repeat` is absent.
    pub fn rule(&self) -> Result<Option<RecurrenceRule>> {
        let Some(kind) = self.repeat else {
            if self.interval.is_some() || self.until.is_some() || self.count.is_some() || self.weekdays.is_some() {
                msg_bail_anyhow!(Message::RecurrenceOptionsWithoutType);
            }
            return Ok(None);
        };

        let mut rule = RecurrenceRule::new(kind, self.interval.unwrap_or(1));
        if let Some(until) = &self.until {
            rule = rule.with_end_date(end_of_day(parse_date(until)?));
        }
        if let Some(count) = self.count {
            rule = rule.with_count(count);
        }
        if let Some(weekdays) = &self.weekdays {
            rule = rule.with_weekdays(weekdays.clone());
        }
        rule.validate().map_err(TaskError::from)?;

        Ok(Some(rule))
    }
}

pub fn cmd(args: TaskArgs) -> Result<()> {
    match args.command {
        TaskCommand::Add {
            title,
            date,
            priority,
            recurrence,
        } => handle_add(title, date, priority, recurrence),
        TaskCommand::List { date, from, to, all } => handle_list(date, from, to, all),
        TaskCommand::Show { id } => handle_show(id),
        TaskCommand::Edit {
            id,
            title,
            date,
            priority,
            recurrence,
        } => handle_edit(id, title, date, priority, recurrence),
        TaskCommand::Done { id, undo, toggle } => handle_done(id, undo, toggle),
        TaskCommand::Move { id, position } => handle_move(id, position),
        TaskCommand::Delete { id, yes } => handle_delete(id, yes),
    }
}

fn handle_add(title: String, date: Option<String>, priority: Priority, recurrence: RecurrenceArgs) -> Result<()> {
    let date = match date {
        Some(input) => parse_datetime(&input)?,
        None => Local::now().naive_local(),
    };

    let mut new_task = NewTask::new(&title, date).priority(priority);
    if let Some(rule) = recurrence.rule()?.filter(RecurrenceRule::is_recurring) {
        new_task = new_task.recurrence(rule);
    }

    let task = Tasks::new()?.insert(&new_task)?;
    msg_success!(Message::TaskCreated(task.id, task.title));
    Ok(())
}

fn handle_list(date: Option<String>, from: Option<String>, to: Option<String>, all: bool) -> Result<()> {
    let tasks_db = Tasks::new()?;

    let (filter, header) = if all {
        (TaskFilter::All, "all".to_string())
    } else if from.is_some() || to.is_some() {
        let today = Local::now().date_naive();
        let from = from.as_deref().map(parse_date).transpose()?.unwrap_or(today);
        let to = to.as_deref().map(parse_date).transpose()?.unwrap_or(from);
        if from > to {
            msg_bail_anyhow!(Message::InvalidDateRange(format_date(from), format_date(to)));
        }
        (
            TaskFilter::DateRange(start_of_day(from), end_of_day(to)),
            format!("{} - {}", format_date(from), format_date(to)),
        )
    } else {
        let day = parse_date(date.as_deref().unwrap_or("today"))?;
        (TaskFilter::DateRange(start_of_day(day), end_of_day(day)), format_date(day))
    };

    let tasks = tasks_db.fetch(filter)?;
    if tasks.is_empty() {
        msg_info!(Message::TasksNotFound);
        return Ok(());
    }

    msg_print!(Message::TasksHeader(header), true);
    View::tasks(&tasks)?;
    Ok(())
}

fn find_task(tasks_db: &Tasks, id: i64) -> Result<Task> {
    tasks_db.get_by_id(id)?.ok_or_else(|| msg_error_anyhow!(Message::TaskNotFound(id)))
}

fn handle_show(id: i64) -> Result<()> {
    let task = find_task(&Tasks::new()?, id)?;

    msg_print!(Message::TaskDetailsHeader(task.id), true);
    View::task(&task)?;
    Ok(())
}

fn handle_edit(
    id: i64,
    title: Option<String>,
    date: Option<String>,
    priority: Option<Priority>,
    recurrence: RecurrenceArgs,
) -> Result<()> {
    let mut tasks_db = Tasks::new()?;
    let original = find_task(&tasks_db, id)?;

    let updated = match apply_options(&original, title, date, priority, &recurrence)? {
        Some(task) => task,
        None => prompt_changes(&original)?,
    };

    if updated == original {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }

    tasks_db.update(&updated)?;
    msg_success!(Message::TaskUpdated(id));
    Ok(())
}

/// Applies the `edit` options to a copy of `task`; `None` when no option was given.
///
/// Recurrence options are validated first, so `--count` without `--repeat`
/// fails instead of falling through to the prompts.
fn apply_options(
    task: &Task,
    title: Option<String>,
    date: Option<String>,
    priority: Option<Priority>,
    recurrence: &RecurrenceArgs,
) -> Result<Option<Task>> {
    let rule = recurrence.rule()?;
    if title.is_none() && date.is_none() && priority.is_none() && rule.is_none() {
        return Ok(None);
    }

    let mut task = task.clone();
    if let Some(title) = title {
        task.title = title.trim().to_string();
    }
    if let Some(date) = date {
        task.date = parse_datetime(&date)?;
    }
    if let Some(priority) = priority {
        task.priority = priority;
    }
    if let Some(rule) = rule {
        task.recurrence = Some(rule).filter(RecurrenceRule::is_recurring);
    }
    Ok(Some(task))
}

fn prompt_changes(task: &Task) -> Result<Task> {
    msg_print!(Message::TaskDetailsHeader(task.id), true);

    let title: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptTaskTitle.to_string())
        .default(task.title.clone())
        .interact_text()?;

    let date: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptTaskDate.to_string())
        .default(format_datetime(&task.date))
        .validate_with(|input: &String| parse_datetime(input).map(|_| ()).map_err(|e| e.to_string()))
        .interact_text()?;

    let priorities: Vec<&str> = Priority::ALL.iter().map(Priority::as_str).collect();
    let priority_index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptTaskPriority.to_string())
        .items(&priorities)
        .default(Priority::ALL.iter().position(|p| *p == task.priority).unwrap_or(1))
        .interact()?;

    let completed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptTaskCompleted.to_string())
        .default(task.completed)
        .interact()?;

    Ok(Task {
        title: title.trim().to_string(),
        date: parse_datetime(&date)?,
        priority: Priority::ALL[priority_index],
        completed,
        ..task.clone()
    })
}

fn handle_done(id: i64, undo: bool, toggle: bool) -> Result<()> {
    let mut tasks_db = Tasks::new()?;

    let completed = if toggle {
        tasks_db.toggle(id)?
    } else {
        tasks_db.set_completed(id, !undo)?;
        !undo
    };

    if completed {
        msg_success!(Message::TaskCompleted(id));
    } else {
        msg_success!(Message::TaskReopened(id));
    }
    Ok(())
}

fn handle_move(id: i64, position: usize) -> Result<()> {
    let position = Tasks::new()?.move_to(id, position)?;
    msg_success!(Message::TaskMoved(id, position));
    Ok(())
}

fn handle_delete(id: i64, yes: bool) -> Result<()> {
    let mut tasks_db = Tasks::new()?;
    let task = find_task(&tasks_db, id)?;

    let confirmed = yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteTask(task.title.clone()).to_string())
            .default(false)
            .interact()?;
    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    if task.is_recurring {
        let instances = tasks_db.fetch(TaskFilter::Instances(id))?.len();
        let delete_instances = instances > 0
            && (yes
                || Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::ConfirmDeleteInstances(instances).to_string())
                    .default(true)
                    .interact()?);
        if delete_instances {
            let removed = tasks_db.delete_instances(id)?;
            msg_success!(Message::InstancesRemoved(removed, id));
        }
    }

    tasks_db.delete(id)?;
    msg_success!(Message::TaskDeleted(id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_repeat_means_no_rule() {
        assert_eq!(RecurrenceArgs::default().rule().unwrap(), None);
    }

    #[test]
    fn repeat_options_build_a_rule() {
        let args = RecurrenceArgs {
            repeat: Some(RecurrenceType::Weekly),
            interval: Some(2),
            until: Some("2024-12-31".to_string()),
            count: Some(10),
            weekdays: Some(vec![1, 3, 5]),
        };
        let rule = args.rule().unwrap().unwrap();
        assert_eq!(rule.kind, RecurrenceType::Weekly);
        assert_eq!(rule.interval, 2);
        assert_eq!(rule.count, Some(10));
        assert_eq!(rule.weekdays, Some(vec![1, 3, 5]));
        assert_eq!(rule.end_date.unwrap().date(), parse_date("2024-12-31").unwrap());
    }

    #[test]
    fn options_without_repeat_are_rejected() {
        let args = RecurrenceArgs {
            count: Some(3),
            ..RecurrenceArgs::default()
        };
        assert!(args.rule().is_err());
    }

    fn stored_task() -> Task {
        let date = parse_datetime("2024-03-05 09:00").unwrap();
        Task {
            id: 5,
            title: "Water plants".to_string(),
            date,
            order: 0,
            priority: Priority::Medium,
            completed: false,
            created_at: date,
            updated_at: date,
            recurrence: None,
            parent_task_id: None,
            is_recurring: false,
        }
    }

    #[test]
    fn edit_without_options_goes_interactive() {
        let task = stored_task();
        assert_eq!(apply_options(&task, None, None, None, &RecurrenceArgs::default()).unwrap(), None);
    }

    #[test]
    fn edit_with_recurrence_options_but_no_repeat_fails() {
        let task = stored_task();
        for args in [
            RecurrenceArgs { count: Some(3), ..RecurrenceArgs::default() },
            RecurrenceArgs { interval: Some(2), ..RecurrenceArgs::default() },
            RecurrenceArgs { until: Some("2024-12-31".to_string()), ..RecurrenceArgs::default() },
            RecurrenceArgs { weekdays: Some(vec![1]), ..RecurrenceArgs::default() },
        ] {
            assert!(apply_options(&task, None, None, None, &args).is_err());
        }
    }

    #[test]
    fn edit_options_apply_to_a_copy() {
        let task = stored_task();
        let args = RecurrenceArgs {
            repeat: Some(RecurrenceType::Daily),
            count: Some(3),
            ..RecurrenceArgs::default()
        };
        let updated = apply_options(&task, Some(" Feed cat ".to_string()), None, Some(Priority::High), &args)
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Feed cat");
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.date, task.date);
        assert_eq!(updated.recurrence, Some(RecurrenceRule::daily(1).with_count(3)));

        let cleared = RecurrenceArgs {
            repeat: Some(RecurrenceType::None),
            ..RecurrenceArgs::default()
        };
        let updated = apply_options(&updated, None, None, None, &cleared).unwrap().unwrap();
        assert_eq!(updated.recurrence, None);
    }

    #[test]
    fn invalid_rule_is_rejected_before_storage() {
        let args = RecurrenceArgs {
            repeat: Some(RecurrenceType::Weekly),
            weekdays: Some(vec![7]),
            ..RecurrenceArgs::default()
        };
        let error = args.rule().unwrap_err();
        assert!(error.downcast_ref::<TaskError>().is_some());
    }
}
