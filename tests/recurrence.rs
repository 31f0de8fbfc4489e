#[cfg(test)]
mod tests {
    use caltask::db::db::DB_FILE_NAME;
    use caltask::db::tasks::Tasks;
    use caltask::libs::error::{RecurrenceError, TaskError};
    use caltask::libs::formatter::end_of_day;
    use caltask::libs::recurrence::instance_dates;
    use caltask::libs::task::{NewTask, Priority, RecurrenceRule, Task, TaskFilter};
    use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct RecurrenceTestContext {
        _temp_dir: TempDir,
        tasks: Tasks,
    }

    impl TestContext for RecurrenceTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let tasks = Tasks::open(temp_dir.path().join(DB_FILE_NAME)).unwrap();
            RecurrenceTestContext { _temp_dir: temp_dir, tasks }
        }
    }

    fn at(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap().and_hms_opt(7, 30, 0).unwrap()
    }

    fn until(month: u32, day: u32) -> NaiveDateTime {
        end_of_day(NaiveDate::from_ymd_opt(2024, month, day).unwrap())
    }

    fn parent(ctx: &mut RecurrenceTestContext, title: &str, rule: RecurrenceRule) -> Task {
        ctx.tasks
            .insert(&NewTask::new(title, at(1, 1)).priority(Priority::High).recurrence(rule))
            .unwrap()
    }

    #[test_context(RecurrenceTestContext)]
    #[test]
    fn test_daily_instances_respect_count(ctx: &mut RecurrenceTestContext) {
        let standup = parent(ctx, "Standup", RecurrenceRule::daily(1).with_count(5));

        let dates = instance_dates(&standup, at(1, 1), until(3, 1)).unwrap();
        let instances = ctx.tasks.insert_instances(&standup, &dates).unwrap();

        assert_eq!(instances.len(), 4);
        for (offset, instance) in instances.iter().enumerate() {
            assert_eq!(instance.date, at(1, 2 + offset as u32));
            assert_eq!(instance.title, "Standup");
            assert_eq!(instance.priority, Priority::High);
            assert_eq!(instance.parent_task_id, Some(standup.id));
            assert!(!instance.is_recurring);
            assert!(!instance.completed);
            assert_eq!(instance.recurrence, None);
        }
    }

    #[test_context(RecurrenceTestContext)]
    #[test]
    fn test_weekly_instances_on_listed_weekdays(ctx: &mut RecurrenceTestContext) {
        // 2024-01-01 is a Monday.
        let gym = parent(ctx, "Gym", RecurrenceRule::weekly(1).with_weekdays(vec![1, 3, 5]));

        let dates = instance_dates(&gym, at(1, 1), until(1, 14)).unwrap();
        let instances = ctx.tasks.insert_instances(&gym, &dates).unwrap();

        let days: Vec<u32> = instances.iter().map(|task| task.date.day()).collect();
        assert_eq!(days, vec![3, 5, 8, 10, 12]);
        assert!(instances
            .iter()
            .all(|task| matches!(task.date.weekday(), Weekday::Mon | Weekday::Wed | Weekday::Fri)));

        let stored = ctx.tasks.fetch(TaskFilter::Instances(gym.id)).unwrap();
        assert_eq!(stored.len(), 5);
    }

    #[test_context(RecurrenceTestContext)]
    #[test]
    fn test_generating_twice_skips_existing_dates(ctx: &mut RecurrenceTestContext) {
        let review = parent(ctx, "Weekly review", RecurrenceRule::weekly(1));

        let first = instance_dates(&review, at(1, 1), until(1, 15)).unwrap();
        assert_eq!(ctx.tasks.insert_instances(&review, &first).unwrap().len(), 2);

        let wider = instance_dates(&review, at(1, 1), until(1, 29)).unwrap();
        let added = ctx.tasks.insert_instances(&review, &wider).unwrap();
        assert_eq!(added.iter().map(|task| task.date).collect::<Vec<_>>(), vec![at(1, 22), at(1, 29)]);

        assert_eq!(ctx.tasks.fetch(TaskFilter::Instances(review.id)).unwrap().len(), 4);
    }

    #[test_context(RecurrenceTestContext)]
    #[test]
    fn test_instances_join_the_end_of_their_day(ctx: &mut RecurrenceTestContext) {
        ctx.tasks.insert(&NewTask::new("Dentist", at(1, 2))).unwrap();
        let standup = parent(ctx, "Standup", RecurrenceRule::daily(1).with_count(2));

        let dates = instance_dates(&standup, at(1, 1), until(1, 31)).unwrap();
        let instances = ctx.tasks.insert_instances(&standup, &dates).unwrap();

        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].date, at(1, 2));
        assert_eq!(instances[0].order, 1);
    }

    #[test_context(RecurrenceTestContext)]
    #[test]
    fn test_rule_end_date_limits_instances(ctx: &mut RecurrenceTestContext) {
        let rule = RecurrenceRule::daily(2).with_end_date(until(1, 7));
        let chores = parent(ctx, "Chores", rule);

        let dates = instance_dates(&chores, at(1, 1), until(2, 1)).unwrap();
        assert_eq!(dates, vec![at(1, 3), at(1, 5), at(1, 7)]);
    }

    #[test_context(RecurrenceTestContext)]
    #[test]
    fn test_non_recurring_task_is_rejected(ctx: &mut RecurrenceTestContext) {
        let plain = ctx.tasks.insert(&NewTask::new("One-off", at(1, 1))).unwrap();

        assert_eq!(
            instance_dates(&plain, at(1, 1), until(1, 31)),
            Err(RecurrenceError::NotRecurring(plain.id))
        );

        let error = ctx.tasks.insert_instances(&plain, &[at(1, 2)]).unwrap_err();
        assert_eq!(
            error.downcast_ref::<TaskError>(),
            Some(&TaskError::Recurrence(RecurrenceError::NotRecurring(plain.id)))
        );
        assert_eq!(ctx.tasks.fetch(TaskFilter::All).unwrap().len(), 1);
    }

    #[test_context(RecurrenceTestContext)]
    #[test]
    fn test_invalid_rule_is_rejected_on_insert(ctx: &mut RecurrenceTestContext) {
        let error = ctx
            .tasks
            .insert(&NewTask::new("Broken", at(1, 1)).recurrence(RecurrenceRule::weekly(1).with_weekdays(vec![9])))
            .unwrap_err();

        assert_eq!(
            error.downcast_ref::<TaskError>(),
            Some(&TaskError::Recurrence(RecurrenceError::InvalidWeekday(9)))
        );
    }

    #[test_context(RecurrenceTestContext)]
    #[test]
    fn test_delete_instances_keeps_parent(ctx: &mut RecurrenceTestContext) {
        let standup = parent(ctx, "Standup", RecurrenceRule::daily(1));
        let dates = instance_dates(&standup, at(1, 1), until(1, 10)).unwrap();
        ctx.tasks.insert_instances(&standup, &dates).unwrap();

        assert_eq!(ctx.tasks.delete_instances(standup.id).unwrap(), 9);
        assert!(ctx.tasks.fetch(TaskFilter::Instances(standup.id)).unwrap().is_empty());
        assert!(ctx.tasks.get_by_id(standup.id).unwrap().is_some());
        assert_eq!(ctx.tasks.delete_instances(standup.id).unwrap(), 0);
    }

    #[test_context(RecurrenceTestContext)]
    #[test]
    fn test_deleting_parent_detaches_kept_instances(ctx: &mut RecurrenceTestContext) {
        let standup = parent(ctx, "Standup", RecurrenceRule::daily(1).with_count(3));
        let dates = instance_dates(&standup, at(1, 1), until(1, 31)).unwrap();
        let instances = ctx.tasks.insert_instances(&standup, &dates).unwrap();

        ctx.tasks.delete(standup.id).unwrap();

        for instance in instances {
            let kept = ctx.tasks.get_by_id(instance.id).unwrap().unwrap();
            assert_eq!(kept.parent_task_id, None);
            assert!(!kept.is_instance());
        }
        assert!(ctx.tasks.fetch(TaskFilter::Instances(standup.id)).unwrap().is_empty());
    }
}
