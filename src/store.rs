// Task store backed by a single SQLite file

use crate::task::{DueTask, Task, TaskId};
use crate::timestamp::{format_date, parse_timestamp, to_stored};
use chrono::{NaiveDate, NaiveDateTime};
use eyre::{Context, Result, eyre};
use fs2::FileExt;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Persistent task store for one session
///
/// The SQLite connection and the session lock are released when the store is
/// dropped, or explicitly through [`Store::close`].
pub struct Store {
    path: PathBuf,
    db: Connection,
    _lock: File,
}

impl Store {
    /// Open the task database at the given file path
    ///
    /// Parent directories are created if needed and the `tasks` table is
    /// provisioned when missing. Fails if another session holds the store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let lock = Self::acquire_lock(&path)?;

        let db = Connection::open(&path).context("Failed to open SQLite database")?;

        let store = Self { path, db, _lock: lock };
        store.create_schema()?;

        info!(path = %store.path.display(), "Opened task store");
        Ok(store)
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the session, reporting any failure to release the database
    pub fn close(self) -> Result<()> {
        let Self { path, db, _lock } = self;
        db.close()
            .map_err(|(_, e)| e)
            .context("Failed to close SQLite database")?;
        debug!(path = %path.display(), "Closed task store");
        Ok(())
    }

    fn lock_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".lock");
        path.with_file_name(name)
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        let lock_path = Self::lock_path(path);
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .context("Failed to open store lock file")?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(file),
            Err(e) => Err(Self::lock_error(path, e)),
        }
    }

    /// Only a contended lock means another session holds the store
    fn lock_error(path: &Path, err: io::Error) -> eyre::Report {
        if err.kind() == fs2::lock_contended_error().kind() {
            eyre!("Task store {} is in use by another session", path.display())
        } else {
            eyre::Report::new(err).wrap_err("Failed to acquire store lock")
        }
    }

    /// Create the tasks table if it is not already provisioned
    fn create_schema(&self) -> Result<()> {
        debug!("Creating database schema");

        // AUTOINCREMENT keeps ids from being reused after the highest is deleted
        self.db
            .execute_batch(
                r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task_name TEXT NOT NULL,
                start_date TEXT NOT NULL,
                deadline_date TEXT NOT NULL
            );
            "#,
            )
            .context("Failed to create tasks table")?;

        Ok(())
    }

    // ========================================================================
    // Task operations
    // ========================================================================

    /// Add a task and return its new id
    ///
    /// No validation is applied: empty names and deadlines before the start
    /// are stored as given. Timestamps whose year does not fit
    /// `YYYY-MM-DD HH:MM:SS` are rejected, since no date query could find them.
    pub fn add_task(&mut self, task_name: &str, start: NaiveDateTime, deadline: NaiveDateTime) -> Result<TaskId> {
        let start = to_stored(start).context("Invalid start_date")?;
        let deadline = to_stored(deadline).context("Invalid deadline_date")?;

        self.db
            .execute(
                "INSERT INTO tasks (task_name, start_date, deadline_date) VALUES (?1, ?2, ?3)",
                params![task_name, start, deadline],
            )
            .context("Failed to insert task")?;

        let id = self.db.last_insert_rowid();
        debug!(id, task_name, "Added task");
        Ok(id)
    }

    /// Get a single task by id
    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>> {
        let row = self
            .db
            .query_row(
                "SELECT id, task_name, start_date, deadline_date FROM tasks WHERE id = ?1",
                [id],
                |row| {
                    Ok((
                        row.get::<_, TaskId>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()
            .context("Failed to query task")?;

        match row {
            Some((id, task_name, start, deadline)) => Ok(Some(Task {
                id,
                task_name,
                start_date: parse_timestamp(&start).with_context(|| format!("Task {} has a bad start_date", id))?,
                deadline_date: parse_timestamp(&deadline)
                    .with_context(|| format!("Task {} has a bad deadline_date", id))?,
            })),
            None => Ok(None),
        }
    }

    /// List tasks whose deadline falls on the given calendar date
    ///
    /// Only the date portion of `deadline_date` is compared; `start_date` is
    /// ignored. Results are in storage order.
    pub fn tasks_by_date(&self, date: NaiveDate) -> Result<Vec<DueTask>> {
        let mut stmt = self
            .db
            .prepare("SELECT id, task_name, deadline_date FROM tasks WHERE date(deadline_date) = ?1 ORDER BY id")
            .context("Failed to prepare date query")?;

        let rows = stmt.query_map([format_date(date)], |row| {
            Ok((
                row.get::<_, TaskId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut results = Vec::new();
        for row_result in rows {
            let (id, task_name, deadline) = row_result.context("Failed to read task row")?;
            let deadline_date =
                parse_timestamp(&deadline).with_context(|| format!("Task {} has a bad deadline_date", id))?;
            results.push(DueTask {
                id,
                task_name,
                deadline_date,
            });
        }

        debug!(date = %date, count = results.len(), "Queried tasks by deadline date");
        Ok(results)
    }

    /// Delete a task by id; unknown ids are ignored
    pub fn delete_task(&mut self, id: TaskId) -> Result<()> {
        let removed = self
            .db
            .execute("DELETE FROM tasks WHERE id = ?1", [id])
            .context("Failed to delete task")?;

        debug!(id, removed, "Deleted task");
        Ok(())
    }
}
