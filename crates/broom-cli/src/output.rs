//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use broom_sweeper::{JobOutcome, RunReport, SweepMetrics};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the outcome of one run.
    pub fn format_report(&self, report: &RunReport) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            CliFormat::Table => Ok(self.format_report_table(report)),
        }
    }

    /// Format metrics accumulated over several periodic cycles.
    pub fn format_totals(&self, totals: &SweepMetrics, cycles: usize) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "cycles": cycles,
                "totals": totals,
            }))?),
            CliFormat::Table => Ok(format!("Cycles: {}\n{}", cycles, totals.summary())),
        }
    }

    fn format_report_table(&self, report: &RunReport) -> String {
        if report.jobs.is_empty() {
            return self.colorize("No jobs configured.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record([
            "Job", "Status", "Deleted", "Shredded", "Moved", "Dirs", "Errors", "Note",
        ]);

        for job in &report.jobs {
            match &job.outcome {
                JobOutcome::Swept { metrics } => {
                    let status = if report.dry_run { "dry run" } else { "swept" };
                    builder.push_record([
                        job.name.clone(),
                        self.colorize(status, "green"),
                        metrics.deleted.to_string(),
                        metrics.shredded.to_string(),
                        metrics.moved.to_string(),
                        metrics.dirs_removed.to_string(),
                        self.count_cell(metrics.errors),
                        String::new(),
                    ]);
                }
                JobOutcome::Skipped { reason } => {
                    builder.push_record([
                        job.name.clone(),
                        self.colorize("skipped", "red"),
                        "-".to_string(),
                        "-".to_string(),
                        "-".to_string(),
                        "-".to_string(),
                        "-".to_string(),
                        reason.clone(),
                    ]);
                }
            }
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn count_cell(&self, errors: usize) -> String {
        if errors == 0 {
            errors.to_string()
        } else {
            self.colorize(&errors.to_string(), "red")
        }
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("Error: {}", message), "red")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
