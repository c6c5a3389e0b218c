// Task records

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Store-assigned task identifier
pub type TaskId = i64;

/// A tracked task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub task_name: String,
    #[serde(with = "stored_timestamp")]
    pub start_date: NaiveDateTime,
    #[serde(with = "stored_timestamp")]
    pub deadline_date: NaiveDateTime,
}

/// A task as returned by a date query: id, name and deadline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueTask {
    pub id: TaskId,
    pub task_name: String,
    #[serde(with = "stored_timestamp")]
    pub deadline_date: NaiveDateTime,
}

/// Serialize timestamps in the same `YYYY-MM-DD HH:MM:SS` form the store uses
mod stored_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&crate::timestamp::format_timestamp(*ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        crate::timestamp::parse_timestamp(&s).map_err(de::Error::custom)
    }
}
