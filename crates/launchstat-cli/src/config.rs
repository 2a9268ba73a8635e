//! CLI configuration.

use std::path::PathBuf;

use clap::ValueEnum;

/// How the report is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `Label: value` line per statistic.
    #[default]
    Text,
    /// A single pretty-printed JSON object.
    Json,
}

/// Resolved run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// File to read task groups from; stdin when unset.
    pub input: Option<PathBuf>,

    /// Report format.
    pub format: OutputFormat,

    /// Log debug output from the aggregation.
    pub verbose: bool,
}

impl Config {
    /// Log directive used when `RUST_LOG` is unset.
    pub fn default_log_directive(&self) -> &'static str {
        if self.verbose {
            "launchstat=debug"
        } else {
            "launchstat=warn"
        }
    }
}
