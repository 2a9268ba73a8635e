//! Task records as reported by the scheduler.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// One batch of task records, e.g. a single `DescribeTasks` page.
pub type TaskGroup = Vec<TaskRecord>;

/// A single observed task launch.
///
/// Timestamps are optional so that "not provided" stays distinct from any
/// legitimately provided instant. A missing field, `null` and `""` all decode
/// to `None`; a non-empty value must be RFC 3339.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// When the task started running.
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub started_at: Option<DateTime<Utc>>,

    /// When the task was created.
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,

    /// Task identifier, only used to report which task hit an extreme.
    #[serde(default, deserialize_with = "nullable_string")]
    pub task_arn: String,
}

impl TaskRecord {
    /// Create a record with both timestamps present.
    pub fn new(
        task_arn: impl Into<String>,
        created_at: DateTime<Utc>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            started_at: Some(started_at),
            created_at: Some(created_at),
            task_arn: task_arn.into(),
        }
    }

    /// Builder method to clear the start timestamp.
    pub fn without_started_at(mut self) -> Self {
        self.started_at = None;
        self
    }

    /// Builder method to clear the creation timestamp.
    pub fn without_created_at(mut self) -> Self {
        self.created_at = None;
        self
    }
}

fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|ts| Some(ts.with_timezone(&Utc)))
            .map_err(|e| de::Error::custom(format!("invalid timestamp '{value}': {e}"))),
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
