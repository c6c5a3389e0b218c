//! Demo: a day of deadlines
//!
//! Adds two tasks due on the same day, shows the sorted "today" view and the
//! storage-order date view, then deletes one task.
//!
//! Run with: cargo run --example deadline_day

use chrono::NaiveDate;
use deadlines::{Store, timestamp, view};
use eyre::{Result, eyre};

fn main() -> Result<()> {
    // Create a temporary directory for this demo
    let temp_dir = tempfile::tempdir()?;
    let db_path = temp_dir.path().join("deadlines.sqlite");

    println!("Deadlines Demo");
    println!("==============\n");
    println!("Database: {}\n", db_path.display());

    let mut store = Store::open(&db_path)?;

    let day = NaiveDate::from_ymd_opt(2024, 1, 5).ok_or_else(|| eyre!("invalid demo date"))?;
    let jan = |d: u32| NaiveDate::from_ymd_opt(2024, 1, d).ok_or_else(|| eyre!("invalid demo date"));

    println!("1. ADD - Recording two tasks due on {}...", timestamp::format_date(day));
    let report = store.add_task(
        "Report",
        timestamp::combine(jan(1)?, 9, 0)?,
        timestamp::combine(day, 17, 0)?,
    )?;
    let review = store.add_task(
        "Review",
        timestamp::combine(jan(2)?, 10, 0)?,
        timestamp::combine(day, 8, 0)?,
    )?;
    println!("   Report -> ID {}, Review -> ID {}\n", report, review);

    println!("2. TODAY VIEW - Sorted by deadline:");
    print!("{}", view::render_table(&view::today(&store, day)?));
    println!();

    println!("3. DATE VIEW - Storage order:");
    print!("{}", view::render_table(&view::on_date(&store, day)?));
    println!();

    println!("4. DELETE - Removing Report (ID {})...", report);
    store.delete_task(report)?;
    print!("{}", view::render_table(&view::on_date(&store, day)?));
    println!();

    let empty_day = NaiveDate::from_ymd_opt(2024, 1, 6).ok_or_else(|| eyre!("invalid demo date"))?;
    println!("5. EMPTY DAY - Querying {}...", timestamp::format_date(empty_day));
    if view::on_date(&store, empty_day)?.is_empty() {
        println!("   {}", view::empty_date_message(empty_day));
    }

    store.close()?;
    println!("\nDemo complete.");
    Ok(())
}
