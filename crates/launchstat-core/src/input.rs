//! Decoding of raw task-group documents.

use tracing::debug;

use crate::{LaunchError, TaskGroup};

/// Decode a JSON array of task-group arrays.
///
/// Only checks shape and timestamp syntax. Presence and ordering of the
/// timestamps are validated later by [`crate::reduce`].
pub fn parse_task_groups(input: &[u8]) -> Result<Vec<TaskGroup>, LaunchError> {
    let groups: Vec<TaskGroup> = serde_json::from_slice(input)?;
    debug!(
        bytes = input.len(),
        groups = groups.len(),
        "Decoded task groups"
    );
    Ok(groups)
}
