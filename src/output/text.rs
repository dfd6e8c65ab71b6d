//! Text output formatter for human-readable display
//!
//! This module provides:
//! - One-line status display for the re-resolved lockfile
//! - Classified failure display with category labels
//! - Per-target detail in verbose mode

use crate::output::{OutputFormatter, UpdateOutcome, UpdateReport, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Format a classified failure
    fn format_failure(
        &self,
        category: &str,
        message: &str,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.color {
            writeln!(
                writer,
                "{}: {}",
                format!("error[{}]", category).red().bold(),
                message
            )
        } else {
            writeln!(writer, "error[{}]: {}", category, message)
        }
    }

    /// Format the one-line status for a non-failure outcome
    fn format_status_line(
        &self,
        report: &UpdateReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let targets = report.requested.len();
        let target_noun = if targets == 1 { "target" } else { "targets" };

        match &report.outcome {
            UpdateOutcome::Updated { .. } if report.applied => {
                if self.color {
                    writeln!(
                        writer,
                        "{} {} ({} {})",
                        "updated".green().bold(),
                        report.lockfile,
                        targets,
                        target_noun
                    )
                } else {
                    writeln!(
                        writer,
                        "updated {} ({} {})",
                        report.lockfile, targets, target_noun
                    )
                }
            }
            UpdateOutcome::Updated { .. } => {
                if self.color {
                    writeln!(
                        writer,
                        "{} {} ({} {}), run with --write to apply",
                        "resolved".green().bold(),
                        report.lockfile,
                        targets,
                        target_noun
                    )
                } else {
                    writeln!(
                        writer,
                        "resolved {} ({} {}), run with --write to apply",
                        report.lockfile, targets, target_noun
                    )
                }
            }
            UpdateOutcome::AlreadyCurrent => {
                let line = format!("{} is already up to date", report.lockfile);
                if self.color {
                    writeln!(writer, "{}", line.dimmed())
                } else {
                    writeln!(writer, "{}", line)
                }
            }
            UpdateOutcome::Skipped => {
                let line = format!(
                    "left {} unchanged (benign resolver failure)",
                    report.lockfile
                );
                if self.color {
                    writeln!(writer, "{}", line.dimmed())
                } else {
                    writeln!(writer, "{}", line)
                }
            }
            UpdateOutcome::Failed { .. } => Ok(()),
        }
    }

    /// List the requested targets, one per line
    fn format_targets(&self, report: &UpdateReport, writer: &mut dyn Write) -> std::io::Result<()> {
        for label in &report.requested {
            if self.color {
                writeln!(writer, "  {}", label.dimmed())?;
            } else {
                writeln!(writer, "  {}", label)?;
            }
        }
        Ok(())
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &UpdateReport, writer: &mut dyn Write) -> std::io::Result<()> {
        if let UpdateOutcome::Failed { category, message } = &report.outcome {
            return self.format_failure(category, message, writer);
        }

        if self.verbosity == Verbosity::Quiet {
            return Ok(());
        }

        self.format_status_line(report, writer)?;

        if self.verbosity == Verbosity::Verbose && !report.requested.is_empty() {
            self.format_targets(report, writer)?;
        }

        Ok(())
    }
}
