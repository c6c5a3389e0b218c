use chrono::{NaiveDate, Timelike};
use clap::{Parser, Subcommand};
use deadlines::{Config, DueTask, Store, TaskId, timestamp, view};
use eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deadlines")]
#[command(about = "Deadlines - record tasks and see what is due")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to a YAML config file (default: <config dir>/deadlines/config.yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the task database, overriding the config file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task name
        name: String,

        /// Start date as YYYY-MM-DD (default: today)
        #[arg(long, value_parser = parse_date_arg)]
        start_date: Option<NaiveDate>,

        /// Start time as HH:MM (default: now)
        #[arg(long)]
        start_time: Option<String>,

        /// Deadline date as YYYY-MM-DD (default: today)
        #[arg(long, value_parser = parse_date_arg)]
        deadline_date: Option<NaiveDate>,

        /// Deadline time as HH:MM (default: now)
        #[arg(long)]
        deadline_time: Option<String>,
    },

    /// Show tasks due today, earliest deadline first
    Today,

    /// Show tasks due on a given date
    On {
        /// Date as YYYY-MM-DD
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,
    },

    /// Delete a task by ID
    Delete {
        /// Task ID
        id: TaskId,
    },
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    timestamp::parse_date(s).map_err(|e| e.to_string())
}

fn main() {
    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let db_path = config.resolve_db_path(cli.db.as_deref())?;

    // Open store for this session
    let mut store = Store::open(&db_path)?;

    match cli.command {
        Commands::Add {
            name,
            start_date,
            start_time,
            deadline_date,
            deadline_time,
        } => {
            let now = timestamp::now();
            let start = resolve_timestamp(start_date, start_time.as_deref(), now)?;
            let deadline = resolve_timestamp(deadline_date, deadline_time.as_deref(), now)?;

            let id = store.add_task(&name, start, deadline)?;
            if cli.json {
                let task = store.get_task(id)?;
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                println!("Task added successfully! (ID {})", id);
            }
        }
        Commands::Today => {
            let today = timestamp::today();
            let tasks = view::today(&store, today)?;
            let title = format!("Deadlines for Today ({}):", timestamp::format_date(today));
            print_tasks(&tasks, cli.json, &title, &view::empty_today_message())?;
        }
        Commands::On { date } => {
            let tasks = view::on_date(&store, date)?;
            let title = format!("Deadlines for {}:", timestamp::format_date(date));
            print_tasks(&tasks, cli.json, &title, &view::empty_date_message(date))?;
        }
        Commands::Delete { id } => {
            store.delete_task(id)?;
            if cli.json {
                println!("{}", serde_json::json!({ "deleted": id }));
            } else {
                println!("Task {} deleted.", id);
            }
        }
    }

    store.close()
}

/// Combine optional date and HH:MM inputs, defaulting to the current date and time
fn resolve_timestamp(
    date: Option<NaiveDate>,
    time: Option<&str>,
    now: chrono::NaiveDateTime,
) -> Result<chrono::NaiveDateTime> {
    let date = date.unwrap_or_else(|| now.date());
    let (hour, minute) = match time {
        Some(t) => timestamp::parse_clock(t)?,
        None => (now.hour(), now.minute()),
    };
    timestamp::combine(date, hour, minute)
}

fn print_tasks(tasks: &[DueTask], json: bool, title: &str, empty_message: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tasks)?);
    } else if tasks.is_empty() {
        println!("{}", empty_message);
    } else {
        println!("{}", title);
        print!("{}", view::render_table(tasks));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn now() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_hms_opt(14, 30, 0).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_command() {
        let cli = Cli::parse_from([
            "deadlines",
            "add",
            "Report",
            "--deadline-date",
            "2024-01-05",
            "--deadline-time",
            "17:00",
        ]);

        match cli.command {
            Commands::Add {
                name,
                deadline_date,
                deadline_time,
                start_date,
                ..
            } => {
                assert_eq!(name, "Report");
                assert_eq!(deadline_date, NaiveDate::from_ymd_opt(2024, 1, 5));
                assert_eq!(deadline_time.as_deref(), Some("17:00"));
                assert!(start_date.is_none());
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        assert!(Cli::try_parse_from(["deadlines", "on", "2024-02-30"]).is_err());
    }

    #[test]
    fn test_resolve_timestamp_defaults_to_now() {
        let ts = resolve_timestamp(None, None, now()).unwrap();
        assert_eq!(ts, now());
    }

    #[test]
    fn test_resolve_timestamp_explicit() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let ts = resolve_timestamp(Some(date), Some("08:15"), now()).unwrap();
        assert_eq!(timestamp::format_timestamp(ts), "2024-02-01 08:15:00");
    }

    #[test]
    fn test_resolve_timestamp_out_of_range() {
        assert!(resolve_timestamp(None, Some("24:00"), now()).is_err());
    }
}
