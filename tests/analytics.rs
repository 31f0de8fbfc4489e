#[cfg(test)]
mod tests {
    use caltask::commands::stats::build_report;
    use caltask::commands::trends::load_trends;
    use caltask::db::db::DB_FILE_NAME;
    use caltask::db::tasks::Tasks;
    use caltask::libs::analytics::{AnalyticsWindow, TrendPeriod};
    use caltask::libs::config::{AnalyticsConfig, WeekStart};
    use caltask::libs::export::{ExportFormat, Exporter};
    use caltask::libs::task::{NewTask, Priority};
    use chrono::{NaiveDate, NaiveDateTime};
    use rusqlite::params;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct AnalyticsTestContext {
        temp_dir: TempDir,
        tasks: Tasks,
    }

    impl TestContext for AnalyticsTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let mut tasks = Tasks::open(temp_dir.path().join(DB_FILE_NAME)).unwrap();
            seed(&mut tasks);
            AnalyticsTestContext { temp_dir, tasks }
        }
    }

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    fn now() -> NaiveDateTime {
        at(2024, 1, 30, 20)
    }

    /// Inserts a task and backdates its timestamps, as if it had been
    /// created (and, when completed, finished) at `created`.
    fn add(tasks: &mut Tasks, title: &str, date: NaiveDateTime, created: NaiveDateTime, priority: Priority, completed: bool) {
        let task = tasks
            .insert(&NewTask::new(title, date).priority(priority).completed(completed))
            .unwrap();
        tasks
            .conn
            .execute(
                "UPDATE tasks SET created_at = ?1, updated_at = ?2 WHERE id = ?3",
                params![created, created, task.id],
            )
            .unwrap();
    }

    /// Four tasks inside a 30-day window ending 2024-01-30, one outside it.
    fn seed(tasks: &mut Tasks) {
        add(tasks, "Review budget", at(2024, 1, 28, 9), at(2024, 1, 28, 9), Priority::High, true);
        add(tasks, "Review pull request", at(2024, 1, 29, 9), at(2024, 1, 29, 9), Priority::Medium, true);
        add(tasks, "Write notes", at(2024, 1, 30, 9), at(2024, 1, 30, 9), Priority::Low, true);
        add(tasks, "Plan sprint", at(2024, 1, 29, 14), at(2024, 1, 30, 10), Priority::High, false);
        add(tasks, "Archive mail", at(2023, 12, 15, 9), at(2023, 12, 15, 9), Priority::Low, true);
    }

    #[test_context(AnalyticsTestContext)]
    #[test]
    fn test_report_over_window(ctx: &mut AnalyticsTestContext) {
        let report = build_report(&ctx.tasks, &AnalyticsConfig::default(), None, now()).unwrap();

        assert_eq!(report.period.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(report.period.end_date, NaiveDate::from_ymd_opt(2024, 1, 30).unwrap());
        assert_eq!(report.period.days, 30);

        let completion = &report.completion_stats;
        assert_eq!(completion.total_tasks, 4);
        assert_eq!(completion.completed_tasks, 3);
        assert_eq!(completion.completion_rate, 75.0);
        assert_eq!(completion.overdue_tasks, 1);

        let high = report.priority_stats.iter().find(|stat| stat.priority == Priority::High).unwrap();
        assert_eq!((high.total, high.completed, high.completion_rate), (2, 1, 50.0));
        assert_eq!(report.priority_stats.len(), 4);

        assert_eq!(report.daily_stats.len(), 30);
        assert_eq!(report.heatmap_data.len(), 30);
        let last_day = report.daily_stats.last().unwrap();
        assert_eq!((last_day.tasks_created, last_day.tasks_completed, last_day.completion_rate), (2, 1, 50.0));

        assert_eq!(report.streak_data.current_streak, 3);
        assert_eq!(report.streak_data.longest_streak, 3);
        assert_eq!(report.streak_data.last_completion_date, NaiveDate::from_ymd_opt(2024, 1, 30));

        assert_eq!(report.top_categories[0].category, "review");
        assert_eq!(report.top_categories[0].count, 2);

        assert_eq!(report.average_tasks_per_day, 0.13);
        // 0.4 * 75 + 30 * ((4 / 30) / 3) + 20 * (3 / 7) + 0.1 * 50
        assert_eq!(report.productivity_score, 44.9);
    }

    #[test_context(AnalyticsTestContext)]
    #[test]
    fn test_shorter_window(ctx: &mut AnalyticsTestContext) {
        let report = build_report(&ctx.tasks, &AnalyticsConfig::default(), Some(1), now()).unwrap();

        assert_eq!(report.period.days, 1);
        assert_eq!(report.completion_stats.total_tasks, 2);
        assert_eq!(report.daily_stats.len(), 1);
        assert_eq!(report.streak_data.current_streak, 1);
    }

    #[test_context(AnalyticsTestContext)]
    #[test]
    fn test_trends_by_period(ctx: &mut AnalyticsTestContext) {
        let config = AnalyticsConfig::default();
        let window = AnalyticsWindow::ending_at(now(), 30);

        let daily = load_trends(&ctx.tasks, &config, &window, TrendPeriod::Daily).unwrap();
        assert_eq!(daily.len(), 30);
        assert_eq!(daily.iter().map(|point| point.count).sum::<usize>(), 3);
        assert_eq!(daily[27].label, "2024-01-28");
        assert_eq!(daily[27].count, 1);

        // 2024-01-01 is a Monday, so Sunday weeks start on 2023-12-31.
        let weekly = load_trends(&ctx.tasks, &config, &window, TrendPeriod::Weekly).unwrap();
        assert_eq!(weekly.len(), 5);
        assert_eq!(weekly[0].label, "2023-12-31");
        assert_eq!(weekly[4].count, 3);

        let monday = AnalyticsConfig {
            week_start: WeekStart::Monday,
            ..AnalyticsConfig::default()
        };
        let weekly = load_trends(&ctx.tasks, &monday, &window, TrendPeriod::Weekly).unwrap();
        assert_eq!(weekly[0].label, "2024-01-01");
        assert_eq!(weekly.last().unwrap().label, "2024-01-29");
        assert_eq!(weekly.last().unwrap().count, 2);

        let monthly = load_trends(&ctx.tasks, &config, &window, TrendPeriod::Monthly).unwrap();
        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[0].label, "2024-01");
        assert_eq!(monthly[0].count, 3);
    }

    #[test_context(AnalyticsTestContext)]
    #[test]
    fn test_export_csv(ctx: &mut AnalyticsTestContext) {
        let report = build_report(&ctx.tasks, &AnalyticsConfig::default(), None, now()).unwrap();
        let path = ctx.temp_dir.path().join("report.csv");

        Exporter::new(ExportFormat::Csv, Some(path.clone())).export(&report).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "date");
        assert_eq!(&headers[4], "heatmap_level");

        let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.unwrap()).collect();
        assert_eq!(rows.len(), 30);
        assert_eq!(&rows[0][0], "2024-01-01");
        assert_eq!(&rows[29][0], "2024-01-30");
        assert_eq!(&rows[29][1], "2");
        assert_eq!(&rows[29][4], "1");
    }

    #[test_context(AnalyticsTestContext)]
    #[test]
    fn test_export_json(ctx: &mut AnalyticsTestContext) {
        let report = build_report(&ctx.tasks, &AnalyticsConfig::default(), None, now()).unwrap();
        let path = ctx.temp_dir.path().join("report.json");

        Exporter::new(ExportFormat::Json, Some(path.clone())).export(&report).unwrap();

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["completionStats"]["totalTasks"], 4);
        assert_eq!(json["streakData"]["currentStreak"], 3);
        assert_eq!(json["dailyStats"].as_array().unwrap().len(), 30);
        assert_eq!(json["productivityScore"], 44.9);
    }
}
