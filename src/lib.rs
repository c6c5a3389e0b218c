// Deadlines - personal deadline tracking on SQLite

pub mod config;
pub mod store;
pub mod task;
pub mod timestamp;
pub mod view;

// Re-export main types for convenience
pub use config::Config;
pub use store::Store;
pub use task::{DueTask, Task, TaskId};

// Re-export rusqlite for callers that need the raw connection types
pub use rusqlite;
