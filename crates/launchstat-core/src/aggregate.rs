//! Launch latency aggregation.
//!
//! [`reduce`] walks every record once, group by group, validating
//! timestamps and folding durations into an [`AggregateResult`]. The first
//! invalid record aborts the whole reduction.

use std::time::Duration;

use tracing::{debug, trace};

use crate::{LaunchError, TaskGroup, TaskRecord};

/// A launch duration together with the task that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationSample {
    /// Time between creation and start.
    pub duration: Duration,

    /// Task that produced this duration.
    pub task_arn: String,
}

impl DurationSample {
    /// Create a new DurationSample.
    pub fn new(duration: Duration, task_arn: impl Into<String>) -> Self {
        Self {
            duration,
            task_arn: task_arn.into(),
        }
    }
}

/// Summary statistics over at least one task.
///
/// Only built through [`reduce`] or [`AggregateResult::from_sample`], so the
/// task count is never zero and the average is always defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult {
    total_duration: Duration,
    min: DurationSample,
    max: DurationSample,
    task_count: usize,
}

impl AggregateResult {
    /// Aggregate over a single sample.
    pub fn from_sample(sample: DurationSample) -> Self {
        Self {
            total_duration: sample.duration,
            min: sample.clone(),
            max: sample,
            task_count: 1,
        }
    }

    /// Combine with an aggregate over records seen after this one.
    ///
    /// Extremes are only replaced by strictly smaller/larger values, so on
    /// ties the earlier sample (`self`) wins.
    pub fn merge(self, later: AggregateResult) -> Result<Self, LaunchError> {
        let total_duration = self
            .total_duration
            .checked_add(later.total_duration)
            .ok_or(LaunchError::DurationOverflow)?;

        let min = if later.min.duration < self.min.duration {
            later.min
        } else {
            self.min
        };
        let max = if later.max.duration > self.max.duration {
            later.max
        } else {
            self.max
        };

        Ok(Self {
            total_duration,
            min,
            max,
            task_count: self.task_count + later.task_count,
        })
    }

    /// Sum of all launch durations.
    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// Shortest launch, earliest task on ties.
    pub fn min(&self) -> &DurationSample {
        &self.min
    }

    /// Longest launch, earliest task on ties.
    pub fn max(&self) -> &DurationSample {
        &self.max
    }

    /// Number of tasks folded into this aggregate.
    pub fn task_count(&self) -> usize {
        self.task_count
    }

    /// Mean launch duration, truncated to whole nanoseconds.
    pub fn average_duration(&self) -> Duration {
        let nanos = self.total_duration.as_nanos() / self.task_count as u128;
        let secs = nanos / 1_000_000_000;
        let subsec = nanos % 1_000_000_000;
        // average <= total, so the whole seconds always fit in u64
        Duration::new(secs as u64, subsec as u32)
    }
}

/// Validate every record and fold their launch durations.
///
/// Records are visited group by group, in order. Checks per record run in a
/// fixed order: missing `startedAt`, missing `createdAt`, then start before
/// creation.
pub fn reduce(groups: &[TaskGroup]) -> Result<AggregateResult, LaunchError> {
    let record_count: usize = groups.iter().map(Vec::len).sum();
    debug!(groups = groups.len(), tasks = record_count, "Reducing task groups");

    if record_count == 0 {
        return Err(LaunchError::NoTasks);
    }

    let mut records = groups.iter().enumerate().flat_map(|(group, tasks)| {
        tasks
            .iter()
            .enumerate()
            .map(move |(index, record)| (group, index, record))
    });

    let folded = records.try_fold(
        None,
        |acc: Option<AggregateResult>, (group, index, record)| -> Result<_, LaunchError> {
            let sample = launch_sample(record, group, index)?;
            trace!(
                group,
                index,
                task_arn = %sample.task_arn,
                duration_ns = saturating_nanos(sample.duration),
                "Folded task"
            );

            let single = AggregateResult::from_sample(sample);
            match acc {
                None => Ok(Some(single)),
                Some(acc) => acc.merge(single).map(Some),
            }
        },
    )?;

    let aggregate = folded.ok_or(LaunchError::NoTasks)?;
    debug!(
        tasks = aggregate.task_count,
        total_ns = saturating_nanos(aggregate.total_duration),
        min_arn = %aggregate.min.task_arn,
        max_arn = %aggregate.max.task_arn,
        "Reduced task groups"
    );

    Ok(aggregate)
}

fn launch_sample(
    record: &TaskRecord,
    group: usize,
    index: usize,
) -> Result<DurationSample, LaunchError> {
    let started_at = record.started_at.ok_or_else(|| LaunchError::MissingStartedAt {
        group,
        index,
        task_arn: record.task_arn.clone(),
    })?;
    let created_at = record.created_at.ok_or_else(|| LaunchError::MissingCreatedAt {
        group,
        index,
        task_arn: record.task_arn.clone(),
    })?;

    // negative deltas fail the conversion
    let duration = (started_at - created_at)
        .to_std()
        .map_err(|_| LaunchError::InvalidOrdering {
            group,
            index,
            task_arn: record.task_arn.clone(),
            created_at,
            started_at,
        })?;

    Ok(DurationSample::new(duration, record.task_arn.as_str()))
}

/// Nanoseconds as a log field, clamped to `u64::MAX` (~584 years).
fn saturating_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
