//! launchstat - report task launch latency statistics.
//!
//! Reads a JSON array of task-group arrays (e.g. collected ECS
//! `DescribeTasks` pages) and prints how long tasks took to start.

use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod report;

use config::{Config, OutputFormat};
use launchstat_core::{parse_task_groups, reduce, LaunchError};

/// Report launch latency statistics for scheduled tasks.
#[derive(Parser, Debug)]
#[command(name = "launchstat")]
#[command(about = "Summarize task launch latency", long_about = None)]
#[command(version)]
struct Args {
    /// Read task groups from this file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = Config {
        input: args.input,
        format: args.format,
        verbose: args.verbose,
    };

    // Logs go to stderr, stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.default_log_directive())),
        )
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    let outcome = run(&config, io::stdin().lock(), &mut io::stdout().lock());
    ExitCode::from(exit_status(&outcome, &mut io::stderr()))
}

/// Read, aggregate and write the report. Nothing reaches `stdout` unless the
/// whole pipeline succeeds.
fn run(config: &Config, stdin: impl Read, stdout: &mut impl Write) -> Result<(), Box<dyn Error>> {
    let input = read_input(config.input.as_deref(), stdin)?;
    info!(bytes = input.len(), "Read task input");

    let groups = parse_task_groups(&input)?;
    let aggregate = reduce(&groups)?;
    debug!(tasks = aggregate.task_count(), "Computed launch statistics");

    let rendered = report::render(&aggregate, config.format)?;
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

/// Map the outcome of [`run`] to a process exit status, reporting failures.
fn exit_status(outcome: &Result<(), Box<dyn Error>>, stderr: &mut impl Write) -> u8 {
    match outcome {
        Ok(()) => 0,
        Err(e) => {
            // nothing sensible left to do if stderr itself is gone
            let _ = writeln!(stderr, "Error: {e}");
            1
        }
    }
}

fn read_input(path: Option<&Path>, mut stdin: impl Read) -> Result<Vec<u8>, LaunchError> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Reading task groups from file");
            Ok(fs::read(path)?)
        }
        None => {
            debug!("Reading task groups from stdin");
            let mut buf = Vec::new();
            stdin.read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["launchstat"]);

        assert_eq!(args.input, None);
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.verbose);
    }

    #[test]
    fn test_args_json_from_file() {
        let args = Args::parse_from(["launchstat", "--format", "json", "-i", "tasks.json", "-v"]);

        assert_eq!(args.input, Some(PathBuf::from("tasks.json")));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.verbose);
    }

    #[test]
    fn test_log_directive() {
        let mut config = Config {
            input: None,
            format: OutputFormat::Text,
            verbose: false,
        };
        assert_eq!(config.default_log_directive(), "launchstat=warn");

        config.verbose = true;
        assert_eq!(config.default_log_directive(), "launchstat=debug");
    }

    #[test]
    fn test_read_missing_file() {
        let path = Path::new("/nonexistent/launchstat/tasks.json");
        let err = read_input(Some(path), io::empty()).unwrap_err();
        assert!(matches!(err, LaunchError::Io(_)));
    }

    const TWO_TASKS: &str = r#"[[
        {"createdAt":"2021-08-01T00:00:00Z","startedAt":"2021-08-01T00:00:10Z","taskArn":"A"},
        {"createdAt":"2021-08-01T00:00:00Z","startedAt":"2021-08-01T00:00:11Z","taskArn":"B"}
    ]]"#;

    fn base_config(format: OutputFormat) -> Config {
        Config {
            input: None,
            format,
            verbose: false,
        }
    }

    fn run_with_stdin(format: OutputFormat, stdin: &str) -> (Result<(), Box<dyn Error>>, String) {
        let mut stdout = Vec::new();
        let outcome = run(&base_config(format), stdin.as_bytes(), &mut stdout);
        (outcome, String::from_utf8(stdout).unwrap())
    }

    fn launch_error(outcome: &Result<(), Box<dyn Error>>) -> &LaunchError {
        outcome
            .as_ref()
            .unwrap_err()
            .downcast_ref::<LaunchError>()
            .unwrap()
    }

    #[test]
    fn test_run_writes_text_report() {
        let (outcome, stdout) = run_with_stdin(OutputFormat::Text, TWO_TASKS);

        assert!(outcome.is_ok());
        assert_eq!(
            stdout,
            "Average duration: 10.5s\n\
             Minimum duration: 10s\n\
             Maximum duration: 11s\n\
             Minimum task ARN: A\n\
             Maximum task ARN: B\n"
        );
    }

    #[test]
    fn test_run_writes_json_report() {
        let (outcome, stdout) = run_with_stdin(OutputFormat::Json, TWO_TASKS);

        assert!(outcome.is_ok());
        let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(value["taskCount"], 2);
        assert_eq!(value["maximum"]["taskArn"], "B");
    }

    #[test]
    fn test_run_reads_input_file() {
        let path = std::env::temp_dir().join(format!("launchstat-{}.json", std::process::id()));
        fs::write(&path, TWO_TASKS).unwrap();
        let config = Config {
            input: Some(path.clone()),
            ..base_config(OutputFormat::Text)
        };

        let mut stdout = Vec::new();
        let outcome = run(&config, io::empty(), &mut stdout);
        fs::remove_file(&path).unwrap();

        assert!(outcome.is_ok());
        assert!(String::from_utf8(stdout).unwrap().starts_with("Average duration: 10.5s\n"));
    }

    #[test]
    fn test_run_no_tasks() {
        let (outcome, stdout) = run_with_stdin(OutputFormat::Text, "[]");

        assert!(matches!(launch_error(&outcome), LaunchError::NoTasks));
        assert!(stdout.is_empty());
    }

    #[test]
    fn test_run_malformed_json() {
        for input in ["", "invalid", "[[{]]"] {
            let (outcome, stdout) = run_with_stdin(OutputFormat::Text, input);

            assert!(matches!(
                launch_error(&outcome),
                LaunchError::Deserialization(_)
            ));
            assert!(stdout.is_empty());
        }
    }

    #[test]
    fn test_run_start_before_creation() {
        let input = r#"[
            [{"createdAt":"2021-08-01T00:00:00Z","startedAt":"2021-08-01T00:00:05Z","taskArn":"ok"}],
            [{"createdAt":"2021-08-01T00:00:05Z","startedAt":"2021-08-01T00:00:00Z","taskArn":"early"}]
        ]"#;

        let (outcome, stdout) = run_with_stdin(OutputFormat::Json, input);

        assert!(matches!(
            launch_error(&outcome),
            LaunchError::InvalidOrdering { group: 1, index: 0, .. }
        ));
        assert!(stdout.is_empty());
    }

    #[test]
    fn test_exit_status() {
        let mut stderr = Vec::new();
        assert_eq!(exit_status(&Ok(()), &mut stderr), 0);
        assert!(stderr.is_empty());

        let (outcome, _) = run_with_stdin(OutputFormat::Text, "[]");
        assert_eq!(exit_status(&outcome, &mut stderr), 1);
        assert_eq!(String::from_utf8(stderr).unwrap(), "Error: no tasks to process\n");
    }
}
