//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of the update report
//! - Structured category and message fields for classified failures

use crate::output::{OutputFormatter, UpdateOutcome, UpdateReport, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full report
#[derive(Serialize)]
struct JsonReport {
    /// Name of the lockfile that was re-resolved
    lockfile: String,
    /// Stable status label (updated, current, skipped, failed)
    status: String,
    /// Whether the new content was written back to disk
    applied: bool,
    /// Labels for the requested targets
    #[serde(skip_serializing_if = "Vec::is_empty")]
    requested: Vec<String>,
    /// Classified error category, present for failed status
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    /// Failure message, present for failed status
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// Re-resolved lockfile content. Omitted once the content has been
    /// written in place, unless running verbose.
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

impl JsonFormatter {
    /// Convert the report to its JSON representation
    fn report_to_json(&self, report: &UpdateReport) -> JsonReport {
        let (category, error) = match &report.outcome {
            UpdateOutcome::Failed { category, message } => {
                (Some(category.clone()), Some(message.clone()))
            }
            _ => (None, None),
        };

        let content = match &report.outcome {
            UpdateOutcome::Updated { content }
                if !report.applied || self.verbosity == Verbosity::Verbose =>
            {
                Some(content.clone())
            }
            _ => None,
        };

        JsonReport {
            lockfile: report.lockfile.clone(),
            status: report.outcome.status().to_string(),
            applied: report.applied,
            requested: report.requested.clone(),
            category,
            error,
            content,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &UpdateReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = self.report_to_json(report);

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }
}
