use super::analytics::{AnalyticsReport, HeatmapCell, TrendPoint};
use super::formatter::format_datetime;
use super::task::Task;
use anyhow::Result;
use prettytable::{row, Table};

/// Heatmap glyphs by level.
const HEAT_GLYPHS: [char; 5] = ['·', '░', '▒', '▓', '█'];

pub struct View {}

impl View {
    pub fn tasks(tasks: &[Task]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "DATE", "ORDER", "TITLE", "PRIORITY", "DONE", "REPEAT"]);
        for task in tasks {
            table.add_row(row![
                task.id,
                format_datetime(&task.date),
                task.order,
                task.title,
                task.priority,
                if task.completed { "✓" } else { "" },
                Self::repeat_label(task)
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn task(task: &Task) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", task.id]);
        table.add_row(row!["TITLE", task.title]);
        table.add_row(row!["DATE", format_datetime(&task.date)]);
        table.add_row(row!["ORDER", task.order]);
        table.add_row(row!["PRIORITY", task.priority]);
        table.add_row(row!["COMPLETED", task.completed]);
        table.add_row(row!["REPEAT", Self::repeat_label(task)]);
        if let Some(parent) = task.parent_task_id {
            table.add_row(row!["PARENT", parent]);
        }
        table.add_row(row!["CREATED", format_datetime(&task.created_at)]);
        table.add_row(row!["UPDATED", format_datetime(&task.updated_at)]);
        table.printstd();

        Ok(())
    }

    fn repeat_label(task: &Task) -> String {
        match task.recurrence_rule() {
            Some(rule) if rule.interval > 1 => format!("{} x{}", rule.kind, rule.interval),
            Some(rule) => rule.kind.to_string(),
            None if task.is_instance() => "instance".to_string(),
            None => String::new(),
        }
    }

    /// Summary, breakdown and rollup tables of an analytics report.
    pub fn report(report: &AnalyticsReport) -> Result<()> {
        let stats = &report.completion_stats;
        let mut summary = Table::new();
        summary.add_row(row!["TOTAL", "COMPLETED", "RATE", "OVERDUE", "AVG/DAY", "SCORE"]);
        summary.add_row(row![
            stats.total_tasks,
            stats.completed_tasks,
            format!("{:.2}%", stats.completion_rate),
            stats.overdue_tasks,
            format!("{:.2}", report.average_tasks_per_day),
            format!("{:.2}", report.productivity_score)
        ]);
        summary.printstd();

        let mut priorities = Table::new();
        priorities.add_row(row!["PRIORITY", "TOTAL", "COMPLETED", "RATE"]);
        for stat in &report.priority_stats {
            priorities.add_row(row![stat.priority, stat.total, stat.completed, format!("{:.2}%", stat.completion_rate)]);
        }
        priorities.printstd();

        let mut weeks = Table::new();
        weeks.add_row(row!["WEEK", "CREATED", "COMPLETED", "RATE", "AVG/DAY"]);
        for week in &report.weekly_stats {
            weeks.add_row(row![
                format!("{} - {}", week.week_start, week.week_end),
                week.tasks_created,
                week.tasks_completed,
                format!("{:.2}%", week.completion_rate),
                format!("{:.2}", week.average_tasks_per_day)
            ]);
        }
        weeks.printstd();

        let mut months = Table::new();
        months.add_row(row!["MONTH", "CREATED", "COMPLETED", "RATE", "AVG/DAY"]);
        for month in &report.monthly_stats {
            months.add_row(row![
                month.month,
                month.tasks_created,
                month.tasks_completed,
                format!("{:.2}%", month.completion_rate),
                format!("{:.2}", month.average_tasks_per_day)
            ]);
        }
        months.printstd();

        if !report.top_categories.is_empty() {
            let mut categories = Table::new();
            categories.add_row(row!["CATEGORY", "TASKS"]);
            for category in &report.top_categories {
                categories.add_row(row![category.category, category.count]);
            }
            categories.printstd();
        }

        println!("{}", Self::heatmap_strip(&report.heatmap_data));

        Ok(())
    }

    /// One glyph per day, oldest first.
    pub fn heatmap_strip(cells: &[HeatmapCell]) -> String {
        cells
            .iter()
            .map(|cell| HEAT_GLYPHS[usize::from(cell.level).min(HEAT_GLYPHS.len() - 1)])
            .collect()
    }

    pub fn trends(points: &[TrendPoint]) -> Result<()> {
        let peak = points.iter().map(|point| point.count).max().unwrap_or(0);
        let mut table = Table::new();

        table.add_row(row!["PERIOD", "COMPLETED", ""]);
        for point in points {
            let bar = if peak == 0 { 0 } else { point.count * 30 / peak };
            table.add_row(row![point.label, point.count, "■".repeat(bar)]);
        }
        table.printstd();

        Ok(())
    }
}
