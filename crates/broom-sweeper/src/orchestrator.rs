//! Orchestration of many independent sweep jobs

use crate::{JobDefinition, Result, RunReport, SweepError, Sweeper, SweeperConfig};
use broom_domain::{ConfigSection, NamePattern, SweepEvent, SweepJob, SweepObserver};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Runs every configured job in order, one full sweep at a time
///
/// Each job is resolved fresh from its definition on every run: the root
/// path is expanded and validated, patterns are compiled, the trash
/// directory is created if missing, and a shred/trash conflict is settled in
/// favor of the trash. A job that fails any of these steps is reported and
/// skipped; the remaining jobs still run.
///
/// # Examples
///
/// ```no_run
/// use broom_sweeper::{JobDefinition, Orchestrator, SweeperConfig, TracingObserver};
/// use std::sync::Arc;
///
/// let orchestrator = Orchestrator::new(SweeperConfig::dry_run(), Arc::new(TracingObserver));
/// let jobs = vec![
///     JobDefinition::new("downloads", "~/Downloads", 30).with_ignore("*.part"),
///     JobDefinition::new("screenshots", "~/Desktop", 7).with_match("Screenshot*"),
/// ];
///
/// let report = orchestrator.run(&jobs);
/// println!("{} swept, {} skipped", report.swept_count(), report.skipped_count());
/// ```
pub struct Orchestrator {
    config: SweeperConfig,
    observer: Arc<dyn SweepObserver>,
    sweeper: Sweeper,
}

impl Orchestrator {
    /// Create an orchestrator reporting to `observer`
    pub fn new(config: SweeperConfig, observer: Arc<dyn SweepObserver>) -> Self {
        Self {
            sweeper: Sweeper::new(observer.clone()),
            config,
            observer,
        }
    }

    /// The run configuration
    pub fn config(&self) -> &SweeperConfig {
        &self.config
    }

    /// Parse config sections into jobs, then run them
    ///
    /// A section that cannot be parsed is reported and skipped like any other
    /// failing job. In strict mode the run fails with
    /// [`SweepError::NoRunnableJobs`] when not a single job was swept.
    pub fn run_sections<S: ConfigSection>(&self, sections: &[S]) -> Result<RunReport> {
        let mut report = RunReport::new(self.config.dry_run);
        self.emit(SweepEvent::RunStarted {
            jobs: sections.len(),
            dry_run: self.config.dry_run,
        });

        for section in sections {
            match JobDefinition::from_section(section) {
                Ok(definition) => self.run_one(&definition, &mut report),
                Err(e) => {
                    self.emit(SweepEvent::JobRejected {
                        job: section.name().to_string(),
                        reason: e.to_string(),
                    });
                    report.record_skipped(section.name(), e.to_string());
                }
            }
        }

        self.check_strict(report)
    }

    /// Run already-parsed job definitions in order
    pub fn run(&self, definitions: &[JobDefinition]) -> RunReport {
        let mut report = RunReport::new(self.config.dry_run);
        self.emit(SweepEvent::RunStarted {
            jobs: definitions.len(),
            dry_run: self.config.dry_run,
        });

        for definition in definitions {
            self.run_one(definition, &mut report);
        }

        report
    }

    /// Like [`Orchestrator::run`], honoring strict mode
    pub fn run_checked(&self, definitions: &[JobDefinition]) -> Result<RunReport> {
        self.check_strict(self.run(definitions))
    }

    /// Turn a definition into a validated, immutable job
    ///
    /// Emits warning events for adjustments (trash creation, dropped shred)
    /// but no error events: the caller reports the returned error.
    pub fn resolve(&self, definition: &JobDefinition) -> Result<SweepJob> {
        let name = definition.name.as_str();

        let path = resolve_path(&definition.path)?;
        if !path.is_dir() {
            return Err(SweepError::NotADirectory { path });
        }

        let ignore = NamePattern::ignoring(&definition.ignore_list).map_err(|source| {
            SweepError::Pattern {
                section: name.to_string(),
                source,
            }
        })?;
        let matcher = NamePattern::matching(&definition.match_list).map_err(|source| {
            SweepError::Pattern {
                section: name.to_string(),
                source,
            }
        })?;

        let mut job = SweepJob::with_days(name, path, definition.num_days)
            .with_ignore(ignore)
            .with_match(matcher)
            .with_shred(definition.shred)
            .with_remove_empty_dirs(definition.remove_empty);

        if let Some(raw_trash) = &definition.trash {
            if job.shred {
                self.emit(SweepEvent::ShredIgnored {
                    job: name.to_string(),
                });
                job.shred = false;
            }

            let trash = resolve_path(raw_trash)?;
            self.ensure_trash_dir(name, &trash)?;
            job.trash = Some(trash);
        }

        Ok(job)
    }

    fn run_one(&self, definition: &JobDefinition, report: &mut RunReport) {
        match self.resolve(definition) {
            Ok(job) => {
                let metrics = self.sweeper.sweep(&job, self.config.dry_run);
                report.record_swept(&job.name, metrics);
            }
            Err(e) => {
                self.report_rejection(&definition.name, &e);
                report.record_skipped(&definition.name, e.to_string());
            }
        }
    }

    /// Create the trash directory if needed
    ///
    /// In dry-run mode the creation is only announced.
    fn ensure_trash_dir(&self, job: &str, trash: &Path) -> Result<()> {
        if trash.is_dir() {
            return Ok(());
        }
        if trash.exists() {
            return Err(SweepError::TrashDirectory {
                path: trash.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "exists and is not a directory",
                ),
            });
        }

        self.emit(SweepEvent::CreatingTrashDir {
            job: job.to_string(),
            path: trash.to_path_buf(),
        });
        if self.config.dry_run {
            return Ok(());
        }

        fs::create_dir_all(trash).map_err(|source| SweepError::TrashDirectory {
            path: trash.to_path_buf(),
            source,
        })
    }

    fn report_rejection(&self, job: &str, error: &SweepError) {
        let event = match error {
            SweepError::NotADirectory { path } => SweepEvent::InvalidDirectory {
                job: job.to_string(),
                path: path.clone(),
            },
            SweepError::TrashDirectory { path, source } => SweepEvent::InvalidTrashDir {
                job: job.to_string(),
                path: path.clone(),
                reason: source.to_string(),
            },
            other => SweepEvent::JobRejected {
                job: job.to_string(),
                reason: other.to_string(),
            },
        };
        self.emit(event);
    }

    fn check_strict(&self, report: RunReport) -> Result<RunReport> {
        if self.config.strict && report.swept_count() == 0 {
            return Err(SweepError::NoRunnableJobs {
                rejected: report.skipped_count(),
            });
        }
        Ok(report)
    }

    fn emit(&self, event: SweepEvent) {
        self.observer.observe(&event);
    }
}

/// Expand a leading `~` and make the path absolute
pub fn resolve_path(raw: &str) -> Result<PathBuf> {
    let expanded = expand_tilde(raw)?;
    std::path::absolute(&expanded).map_err(|e| SweepError::Unresolvable {
        raw: raw.to_string(),
        reason: e.to_string(),
    })
}

fn expand_tilde(raw: &str) -> Result<PathBuf> {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return Ok(PathBuf::from(raw)),
    };

    let home = dirs::home_dir().ok_or_else(|| SweepError::Unresolvable {
        raw: raw.to_string(),
        reason: "could not find home directory".to_string(),
    })?;

    if rest.is_empty() {
        Ok(home)
    } else {
        Ok(home.join(rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordingObserver;
    use broom_domain::Disposal;
    use tempfile::TempDir;

    fn new_orchestrator(config: SweeperConfig) -> (Orchestrator, Arc<RecordingObserver>) {
        let recorder = Arc::new(RecordingObserver::new());
        (Orchestrator::new(config, recorder.clone()), recorder)
    }

    fn path_str(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_tilde("~").unwrap(), home);
        assert_eq!(expand_tilde("~/Downloads").unwrap(), home.join("Downloads"));
        assert_eq!(expand_tilde("~other/x").unwrap(), PathBuf::from("~other/x"));
        assert_eq!(expand_tilde("/abs").unwrap(), PathBuf::from("/abs"));
    }

    #[test]
    fn test_resolve_path_is_absolute() {
        assert!(resolve_path("relative/dir").unwrap().is_absolute());
        assert_eq!(resolve_path("~").unwrap(), dirs::home_dir().unwrap());
    }

    #[test]
    fn test_resolve_valid_job() {
        let dir = TempDir::new().unwrap();
        let (orchestrator, _) = new_orchestrator(SweeperConfig::default());
        let def = JobDefinition::new("t", path_str(dir.path()), 2)
            .with_ignore("*.log")
            .with_match("*.txt,*.md");

        let job = orchestrator.resolve(&def).unwrap();
        assert_eq!(job.path, dir.path());
        assert_eq!(job.max_age.as_secs(), 2 * 86400);
        assert_eq!(job.ignore.globs(), ["*.log"]);
        assert_eq!(job.matcher.globs(), ["*.txt", "*.md"]);
        assert_eq!(job.disposal(), Disposal::Delete);
    }

    #[test]
    fn test_resolve_rejects_missing_directory() {
        let dir = TempDir::new().unwrap();
        let (orchestrator, _) = new_orchestrator(SweeperConfig::default());
        let def = JobDefinition::new("t", path_str(&dir.path().join("nope")), 1);

        let err = orchestrator.resolve(&def).unwrap_err();
        assert!(matches!(err, SweepError::NotADirectory { .. }));
    }

    #[test]
    fn test_resolve_rejects_bad_pattern() {
        let dir = TempDir::new().unwrap();
        let (orchestrator, _) = new_orchestrator(SweeperConfig::default());
        let def = JobDefinition::new("t", path_str(dir.path()), 1).with_match("[oops");

        let err = orchestrator.resolve(&def).unwrap_err();
        assert!(matches!(err, SweepError::Pattern { .. }));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_shred_dropped_when_trash_set() {
        let dir = TempDir::new().unwrap();
        let trash = dir.path().join("trash");
        fs::create_dir(&trash).unwrap();

        let (orchestrator, recorder) = new_orchestrator(SweeperConfig::default());
        let def = JobDefinition::new("t", path_str(dir.path()), 1)
            .with_trash(path_str(&trash))
            .with_shred(true);

        let job = orchestrator.resolve(&def).unwrap();
        assert!(!job.shred);
        assert_eq!(job.disposal(), Disposal::Trash(trash));
        assert_eq!(
            recorder.events(),
            vec![SweepEvent::ShredIgnored { job: "t".into() }]
        );
    }

    #[test]
    fn test_missing_trash_is_created() {
        let dir = TempDir::new().unwrap();
        let trash = dir.path().join("new/trash");

        let (orchestrator, recorder) = new_orchestrator(SweeperConfig::default());
        let def = JobDefinition::new("t", path_str(dir.path()), 1).with_trash(path_str(&trash));

        orchestrator.resolve(&def).unwrap();
        assert!(trash.is_dir());
        assert!(matches!(
            recorder.events()[0],
            SweepEvent::CreatingTrashDir { .. }
        ));
    }

    #[test]
    fn test_missing_trash_not_created_in_dry_run() {
        let dir = TempDir::new().unwrap();
        let trash = dir.path().join("trash");

        let (orchestrator, _) = new_orchestrator(SweeperConfig::dry_run());
        let def = JobDefinition::new("t", path_str(dir.path()), 1).with_trash(path_str(&trash));

        let job = orchestrator.resolve(&def).unwrap();
        assert_eq!(job.trash, Some(trash.clone()));
        assert!(!trash.exists());
    }

    #[test]
    fn test_trash_that_is_a_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let trash = dir.path().join("trash");
        fs::write(&trash, "not a dir").unwrap();

        let (orchestrator, _) = new_orchestrator(SweeperConfig::default());
        let def = JobDefinition::new("t", path_str(dir.path()), 1).with_trash(path_str(&trash));

        let err = orchestrator.resolve(&def).unwrap_err();
        assert!(matches!(err, SweepError::TrashDirectory { .. }));
    }

    #[test]
    fn test_strict_mode_fails_without_runnable_jobs() {
        let dir = TempDir::new().unwrap();
        let config = SweeperConfig {
            strict: true,
            ..Default::default()
        };
        let (orchestrator, _) = new_orchestrator(config);
        let defs = vec![JobDefinition::new("t", path_str(&dir.path().join("nope")), 1)];

        let err = orchestrator.run_checked(&defs).unwrap_err();
        assert!(matches!(err, SweepError::NoRunnableJobs { rejected: 1 }));

        // Non-strict runs report the skip instead
        let (orchestrator, _) = new_orchestrator(SweeperConfig::default());
        let report = orchestrator.run_checked(&defs).unwrap();
        assert_eq!(report.skipped_count(), 1);
    }
}
