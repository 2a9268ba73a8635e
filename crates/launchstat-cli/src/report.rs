//! Report rendering.

use std::time::Duration;

use launchstat_core::{format_duration, AggregateResult, DurationSample};
use serde::Serialize;

use crate::config::OutputFormat;

/// Machine-readable form of an aggregate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LaunchReport<'a> {
    task_count: usize,
    total_duration: String,
    total_duration_nanos: u128,
    average_duration: String,
    average_duration_nanos: u128,
    minimum: SampleReport<'a>,
    maximum: SampleReport<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SampleReport<'a> {
    task_arn: &'a str,
    duration: String,
    duration_nanos: u128,
}

impl<'a> From<&'a DurationSample> for SampleReport<'a> {
    fn from(sample: &'a DurationSample) -> Self {
        Self {
            task_arn: &sample.task_arn,
            duration: format_duration(sample.duration),
            duration_nanos: sample.duration.as_nanos(),
        }
    }
}

/// Render an aggregate in the requested format.
pub fn render(
    aggregate: &AggregateResult,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(aggregate)),
        OutputFormat::Json => render_json(aggregate),
    }
}

fn render_text(aggregate: &AggregateResult) -> String {
    let lines = [
        ("Average duration", format_duration(aggregate.average_duration())),
        ("Minimum duration", format_duration(aggregate.min().duration)),
        ("Maximum duration", format_duration(aggregate.max().duration)),
        ("Minimum task ARN", aggregate.min().task_arn.clone()),
        ("Maximum task ARN", aggregate.max().task_arn.clone()),
    ];

    lines
        .iter()
        .map(|(label, value)| format!("{label}: {value}\n"))
        .collect()
}

fn render_json(aggregate: &AggregateResult) -> Result<String, serde_json::Error> {
    let total: Duration = aggregate.total_duration();
    let average = aggregate.average_duration();
    let report = LaunchReport {
        task_count: aggregate.task_count(),
        total_duration: format_duration(total),
        total_duration_nanos: total.as_nanos(),
        average_duration: format_duration(average),
        average_duration_nanos: average.as_nanos(),
        minimum: aggregate.min().into(),
        maximum: aggregate.max().into(),
    };

    let mut out = serde_json::to_string_pretty(&report)?;
    out.push('\n');
    Ok(out)
}
