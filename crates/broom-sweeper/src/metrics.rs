//! Metrics collection for sweep operations

use serde::Serialize;

/// Counters collected during one sweep (or summed over several)
///
/// In dry-run mode the disposal counters record what *would* have happened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepMetrics {
    /// Candidate files that passed the name filters
    pub files_examined: usize,

    /// Candidate files kept because they are not old enough
    pub files_retained: usize,

    /// Files removed outright
    pub deleted: usize,

    /// Files overwritten before removal
    pub shredded: usize,

    /// Files relocated to the trash directory
    pub moved: usize,

    /// Files that disappeared before they could be disposed of
    pub vanished: usize,

    /// Empty directories removed
    pub dirs_removed: usize,

    /// Bytes of file data disposed of
    pub bytes_reclaimed: u64,

    /// Per-file or per-directory failures
    pub errors: usize,

    /// Sweeps folded into these counters
    pub sweep_count: usize,
}

impl SweepMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Files disposed of by any strategy
    pub fn total_disposed(&self) -> usize {
        self.deleted + self.shredded + self.moved
    }

    /// Add another set of counters into this one
    pub fn merge(&mut self, other: &SweepMetrics) {
        self.files_examined += other.files_examined;
        self.files_retained += other.files_retained;
        self.deleted += other.deleted;
        self.shredded += other.shredded;
        self.moved += other.moved;
        self.vanished += other.vanished;
        self.dirs_removed += other.dirs_removed;
        self.bytes_reclaimed += other.bytes_reclaimed;
        self.errors += other.errors;
        self.sweep_count += other.sweep_count;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Sweep Metrics Summary".to_string(),
            "=====================".to_string(),
            format!("Sweeps: {}", self.sweep_count),
            format!("Files examined: {}", self.files_examined),
            format!("Files retained (too recent): {}", self.files_retained),
            String::new(),
        ];

        if self.total_disposed() > 0 {
            lines.push("Disposals:".to_string());
            lines.push(format!("  Deleted: {}", self.deleted));
            lines.push(format!("  Shredded: {}", self.shredded));
            lines.push(format!("  Moved to trash: {}", self.moved));
            lines.push(format!("  Total: {}", self.total_disposed()));
            lines.push(format!("  Bytes: {}", self.bytes_reclaimed));
            lines.push(String::new());
        }

        lines.push(format!("Empty directories removed: {}", self.dirs_removed));
        if self.vanished > 0 {
            lines.push(format!("Vanished before disposal: {}", self.vanished));
        }
        lines.push(format!("Errors: {}", self.errors));

        lines.join("\n")
    }
}

/// What happened to one job during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobOutcome {
    /// The job was swept
    Swept {
        /// Counters for this sweep
        metrics: SweepMetrics,
    },

    /// The job never reached the engine
    Skipped {
        /// Why it was skipped
        reason: String,
    },
}

/// One job's line in a [`RunReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobReport {
    /// Job (section) name
    pub name: String,

    /// Outcome
    #[serde(flatten)]
    pub outcome: JobOutcome,
}

/// Result of one orchestrator run, in job order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Whether the run was a dry run
    pub dry_run: bool,

    /// Per-job outcomes
    pub jobs: Vec<JobReport>,
}

impl RunReport {
    /// Create an empty report
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            jobs: Vec::new(),
        }
    }

    /// Record a swept job
    pub fn record_swept(&mut self, name: impl Into<String>, metrics: SweepMetrics) {
        self.jobs.push(JobReport {
            name: name.into(),
            outcome: JobOutcome::Swept { metrics },
        });
    }

    /// Record a skipped job
    pub fn record_skipped(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        self.jobs.push(JobReport {
            name: name.into(),
            outcome: JobOutcome::Skipped {
                reason: reason.into(),
            },
        });
    }

    /// Number of jobs that were swept
    pub fn swept_count(&self) -> usize {
        self.jobs
            .iter()
            .filter(|j| matches!(j.outcome, JobOutcome::Swept { .. }))
            .count()
    }

    /// Number of jobs that were skipped
    pub fn skipped_count(&self) -> usize {
        self.jobs.len() - self.swept_count()
    }

    /// Metrics summed over every swept job
    pub fn totals(&self) -> SweepMetrics {
        let mut totals = SweepMetrics::new();
        for job in &self.jobs {
            if let JobOutcome::Swept { metrics } = &job.outcome {
                totals.merge(metrics);
            }
        }
        totals
    }

    /// Outcome for a job by name
    pub fn job(&self, name: &str) -> Option<&JobOutcome> {
        self.jobs.iter().find(|j| j.name == name).map(|j| &j.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(deleted: usize, moved: usize, errors: usize) -> SweepMetrics {
        SweepMetrics {
            deleted,
            moved,
            errors,
            sweep_count: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_metrics_creation() {
        let metrics = SweepMetrics::new();
        assert_eq!(metrics.total_disposed(), 0);
        assert_eq!(metrics.sweep_count, 0);
    }

    #[test]
    fn test_merge() {
        let mut total = metrics(2, 1, 0);
        total.merge(&metrics(3, 0, 1));
        assert_eq!(total.deleted, 5);
        assert_eq!(total.moved, 1);
        assert_eq!(total.errors, 1);
        assert_eq!(total.sweep_count, 2);
        assert_eq!(total.total_disposed(), 6);
    }

    #[test]
    fn test_reset() {
        let mut m = metrics(2, 1, 1);
        m.reset();
        assert_eq!(m, SweepMetrics::default());
    }

    #[test]
    fn test_summary_generation() {
        let summary = metrics(4, 0, 0).summary();
        assert!(summary.contains("Sweep Metrics Summary"));
        assert!(summary.contains("Deleted: 4"));
        assert!(summary.contains("Errors: 0"));

        let summary = SweepMetrics::new().summary();
        assert!(!summary.contains("Disposals:"));
    }

    #[test]
    fn test_run_report_totals() {
        let mut report = RunReport::new(false);
        report.record_swept("a", metrics(1, 0, 0));
        report.record_skipped("b", "No such directory: /nope");
        report.record_swept("c", metrics(0, 2, 1));

        assert_eq!(report.swept_count(), 2);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.totals().total_disposed(), 3);
        assert!(matches!(report.job("b"), Some(JobOutcome::Skipped { .. })));
        assert!(report.job("missing").is_none());
    }

    #[test]
    fn test_run_report_json_shape() {
        let mut report = RunReport::new(true);
        report.record_skipped("b", "bad");
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["dry_run"], true);
        assert_eq!(value["jobs"][0]["name"], "b");
        assert_eq!(value["jobs"][0]["status"], "skipped");
        assert_eq!(value["jobs"][0]["reason"], "bad");
    }
}
