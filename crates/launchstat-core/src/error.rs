//! Launch latency errors.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised while loading or aggregating task records.
///
/// Every variant is terminal: a single bad record fails the whole batch.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Reading the input source failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Input is not valid JSON or not an array of task-group arrays.
    #[error("failed to decode task groups: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// No task records across all groups.
    #[error("no tasks to process")]
    NoTasks,

    /// A record has no `startedAt` timestamp.
    #[error("task '{task_arn}' (group {group}, index {index}) is missing startedAt")]
    MissingStartedAt {
        group: usize,
        index: usize,
        task_arn: String,
    },

    /// A record has no `createdAt` timestamp.
    #[error("task '{task_arn}' (group {group}, index {index}) is missing createdAt")]
    MissingCreatedAt {
        group: usize,
        index: usize,
        task_arn: String,
    },

    /// A record started before it was created.
    #[error(
        "task '{task_arn}' (group {group}, index {index}) started at {started_at} before it was created at {created_at}"
    )]
    InvalidOrdering {
        group: usize,
        index: usize,
        task_arn: String,
        created_at: DateTime<Utc>,
        started_at: DateTime<Utc>,
    },

    /// Summed durations no longer fit in a `Duration`.
    #[error("total launch duration overflowed")]
    DurationOverflow,
}
