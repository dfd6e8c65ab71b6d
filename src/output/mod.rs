//! Output formatting for update outcomes
//!
//! This module provides:
//! - Text output for human-readable display
//! - JSON output for machine processing

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use std::io::Write;

/// Outcome of one lockfile re-resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The resolver produced content that differs from the committed lockfile
    Updated {
        /// Re-resolved lockfile content
        content: String,
    },
    /// The resolver ran and produced the content already on disk
    AlreadyCurrent,
    /// The resolver failed in a way that is treated as a no-op
    Skipped,
    /// The update failed with a classified error
    Failed {
        /// Error category in snake_case
        category: String,
        /// Failure message
        message: String,
    },
}

impl UpdateOutcome {
    /// Stable status label used in machine output
    pub fn status(&self) -> &'static str {
        match self {
            UpdateOutcome::Updated { .. } => "updated",
            UpdateOutcome::AlreadyCurrent => "current",
            UpdateOutcome::Skipped => "skipped",
            UpdateOutcome::Failed { .. } => "failed",
        }
    }
}

/// Result of a relock run, rendered by the output formatters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Name of the lockfile that was re-resolved
    pub lockfile: String,
    /// Labels for the requested targets
    pub requested: Vec<String>,
    /// What happened
    pub outcome: UpdateOutcome,
    /// Whether the new content was written back to disk
    pub applied: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Minimal output
    Quiet,
    /// Normal output
    #[default]
    Normal,
    /// Detailed output with additional information
    Verbose,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format (text, json)
    pub format: OutputFormat,
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Whether to use colors (when supported)
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: Verbosity::default(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// Create a new output configuration
    pub fn new(format: OutputFormat, verbosity: Verbosity) -> Self {
        Self {
            format,
            verbosity,
            color: true,
        }
    }

    /// Create configuration from CLI arguments
    pub fn from_cli(json: bool, verbose: bool, quiet: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Self {
            format,
            verbosity,
            color: true,
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the update report
    fn format(&self, report: &UpdateReport, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(config.verbosity, config.color)),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.verbosity)),
    }
}
