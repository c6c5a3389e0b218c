// Deadline views and table rendering for the terminal shell

use crate::store::Store;
use crate::task::DueTask;
use crate::timestamp::{format_date, format_timestamp};
use chrono::NaiveDate;
use colored::Colorize;
use eyre::Result;

const HEADERS: [&str; 3] = ["ID", "Task Name", "Deadline"];

/// Tasks due on `today`, earliest deadline first
pub fn today(store: &Store, today: NaiveDate) -> Result<Vec<DueTask>> {
    let mut tasks = store.tasks_by_date(today)?;
    // Stable sort keeps storage order for equal deadlines
    tasks.sort_by_key(|t| t.deadline_date);
    Ok(tasks)
}

/// Tasks due on an arbitrary date, in storage order
pub fn on_date(store: &Store, date: NaiveDate) -> Result<Vec<DueTask>> {
    store.tasks_by_date(date)
}

/// Message shown when the today view is empty
pub fn empty_today_message() -> String {
    "No tasks due today.".to_string()
}

/// Message shown when a date view is empty
pub fn empty_date_message(date: NaiveDate) -> String {
    format!("No tasks due for {}.", format_date(date))
}

/// Render tasks as a plain-text table with `ID | Task Name | Deadline` columns
pub fn render_table(tasks: &[DueTask]) -> String {
    let rows: Vec<[String; 3]> = tasks
        .iter()
        .map(|t| [t.id.to_string(), t.task_name.clone(), format_timestamp(t.deadline_date)])
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();

    let header = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{:<w$}", h, w = w))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(&header.trim_end().bold().to_string());
    out.push('\n');

    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-");
    out.push_str(&rule);
    out.push('\n');

    for row in &rows {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = w))
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    fn seeded_store(temp: &TempDir) -> Store {
        let mut store = Store::open(temp.path().join("deadlines.sqlite")).unwrap();
        store.add_task("Report", ts(2024, 1, 1, 9, 0), ts(2024, 1, 5, 17, 0)).unwrap();
        store.add_task("Review", ts(2024, 1, 2, 10, 0), ts(2024, 1, 5, 8, 0)).unwrap();
        store.add_task("Elsewhere", ts(2024, 1, 2, 10, 0), ts(2024, 1, 6, 8, 0)).unwrap();
        store
    }

    fn names(tasks: &[DueTask]) -> Vec<&str> {
        tasks.iter().map(|t| t.task_name.as_str()).collect()
    }

    #[test]
    fn test_today_sorted_by_deadline() {
        let temp = TempDir::new().unwrap();
        let store = seeded_store(&temp);

        let tasks = today(&store, date(2024, 1, 5)).unwrap();
        assert_eq!(names(&tasks), vec!["Review", "Report"]);
    }

    #[test]
    fn test_on_date_keeps_storage_order() {
        let temp = TempDir::new().unwrap();
        let store = seeded_store(&temp);

        let tasks = on_date(&store, date(2024, 1, 5)).unwrap();
        assert_eq!(names(&tasks), vec!["Report", "Review"]);
    }

    #[test]
    fn test_today_stable_for_equal_deadlines() {
        let temp = TempDir::new().unwrap();
        let mut store = Store::open(temp.path().join("deadlines.sqlite")).unwrap();
        store.add_task("First", ts(2024, 1, 1, 9, 0), ts(2024, 1, 5, 12, 0)).unwrap();
        store.add_task("Second", ts(2024, 1, 1, 9, 0), ts(2024, 1, 5, 12, 0)).unwrap();

        let tasks = today(&store, date(2024, 1, 5)).unwrap();
        assert_eq!(names(&tasks), vec!["First", "Second"]);
    }

    #[test]
    fn test_empty_messages() {
        assert_eq!(empty_today_message(), "No tasks due today.");
        assert_eq!(empty_date_message(date(2024, 1, 5)), "No tasks due for 2024-01-05.");
    }

    #[test]
    fn test_render_table() {
        colored::control::set_override(false);

        let tasks = vec![
            DueTask {
                id: 2,
                task_name: "Review".to_string(),
                deadline_date: ts(2024, 1, 5, 8, 0),
            },
            DueTask {
                id: 10,
                task_name: "Quarterly report".to_string(),
                deadline_date: ts(2024, 1, 5, 17, 0),
            },
        ];

        let table = render_table(&tasks);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "ID | Task Name        | Deadline");
        assert_eq!(lines[1], "---+------------------+--------------------");
        assert_eq!(lines[2], "2  | Review           | 2024-01-05 08:00:00");
        assert_eq!(lines[3], "10 | Quarterly report | 2024-01-05 17:00:00");
    }
}
