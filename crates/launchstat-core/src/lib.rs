//! Launch latency statistics for scheduled tasks.
//!
//! This crate holds the pure domain logic:
//! - decoding task-group documents
//! - validating task timestamps
//! - folding launch durations into summary statistics
//!
//! It performs no I/O; reading input and printing reports is left to the
//! `launchstat` binary.

pub mod aggregate;
pub mod duration;
pub mod error;
pub mod input;
pub mod task;

// Re-export commonly used types
pub use aggregate::{reduce, AggregateResult, DurationSample};
pub use duration::format_duration;
pub use error::LaunchError;
pub use input::parse_task_groups;
pub use task::{TaskGroup, TaskRecord};
