use crate::{
    db::tasks::Tasks,
    libs::{
        formatter::{end_of_day, format_date, parse_date, start_of_day},
        messages::Message,
        recurrence::instance_dates,
        task::TaskFilter,
        view::View,
    },
    msg_bail_anyhow, msg_error_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use chrono::Duration;
use clap::Args;

/// Days covered when `--to` is not given.
const DEFAULT_RANGE_DAYS: i64 = 30;

#[derive(Debug, Args)]
pub struct RecurArgs {
    /// ID of the recurring task
    id: i64,
    /// First day to generate (default: the task's date)
    #[arg(long)]
    from: Option<String>,
    /// Last day to generate (default: 30 days after --from)
    #[arg(long)]
    to: Option<String>,
    /// Remove the generated instances instead
    #[arg(long, conflicts_with_all = ["from", "to"])]
    clear: bool,
}

pub fn cmd(args: RecurArgs) -> Result<()> {
    let mut tasks_db = Tasks::new()?;
    let parent = tasks_db
        .get_by_id(args.id)?
        .ok_or_else(|| msg_error_anyhow!(Message::TaskNotFound(args.id)))?;

    if !parent.is_recurring {
        msg_bail_anyhow!(Message::TaskNotRecurring(parent.id));
    }

    if args.clear {
        let removed = tasks_db.delete_instances(parent.id)?;
        msg_success!(Message::InstancesRemoved(removed, parent.id));
        return Ok(());
    }

    let from = match &args.from {
        Some(input) => parse_date(input)?,
        None => parent.date.date(),
    };
    let to = match &args.to {
        Some(input) => parse_date(input)?,
        None => from + Duration::days(DEFAULT_RANGE_DAYS),
    };
    if from > to {
        msg_bail_anyhow!(Message::InvalidDateRange(format_date(from), format_date(to)));
    }

    let dates = instance_dates(&parent, start_of_day(from), end_of_day(to))?;
    if dates.is_empty() {
        msg_info!(Message::NoInstancesInRange(parent.id));
        return Ok(());
    }

    let created = tasks_db.insert_instances(&parent, &dates)?;
    msg_success!(Message::InstancesGenerated(created.len(), parent.id));

    let instances = tasks_db.fetch(TaskFilter::Instances(parent.id))?;
    View::tasks(&instances)?;
    Ok(())
}
