//! Core sweep engine: one tree walk per job

use crate::dispose;
use crate::{SweepError, SweepMetrics};
use broom_domain::{Disposal, SweepEvent, SweepJob, SweepObserver};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

/// Sweep engine for a single job
///
/// Owns no state beyond the observer it reports to: every call to
/// [`Sweeper::sweep`] performs one complete, independent traversal.
///
/// The walk is depth-first and top-down so that filtered directories are
/// pruned before descent. Empty-directory removal is a second, bottom-up pass
/// over the directories the walk entered: each one is judged only after all
/// of its children were handled, so removals cascade up the tree within a
/// single sweep, stopping at the job root, which is never removed.
///
/// # Examples
///
/// ```no_run
/// use broom_domain::SweepJob;
/// use broom_sweeper::{Sweeper, TracingObserver};
/// use std::sync::Arc;
///
/// let sweeper = Sweeper::new(Arc::new(TracingObserver));
/// let job = SweepJob::with_days("downloads", "/home/me/Downloads", 30);
///
/// let metrics = sweeper.sweep(&job, true);
/// println!("{}", metrics.summary());
/// ```
pub struct Sweeper {
    observer: Arc<dyn SweepObserver>,
}

impl Sweeper {
    /// Create a sweeper that reports to `observer`
    pub fn new(observer: Arc<dyn SweepObserver>) -> Self {
        Self { observer }
    }

    /// Walk `job.path` once, disposing of every qualifying file
    ///
    /// Never fails as a whole: unreadable directories and failed disposals
    /// are reported as error events and counted, and the walk continues.
    pub fn sweep(&self, job: &SweepJob, dry_run: bool) -> SweepMetrics {
        self.sweep_at(job, dry_run, SystemTime::now())
    }

    /// Same as [`Sweeper::sweep`], measuring age against `now`
    pub fn sweep_at(&self, job: &SweepJob, dry_run: bool, now: SystemTime) -> SweepMetrics {
        let mut metrics = SweepMetrics::new();
        metrics.sweep_count = 1;

        self.emit(SweepEvent::SweepStarted {
            job: job.name.clone(),
        });

        // A threshold before the epoch means nothing can be old enough
        let threshold = now.checked_sub(job.max_age);
        let disposal = job.disposal();
        let trash = job.trash.as_deref();

        let walker = WalkDir::new(&job.path)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || (job.admits(entry.file_name()) && Some(entry.path()) != trash)
            });

        let mut visited_dirs = Vec::new();
        // Dry runs track what a real run would have removed
        let mut gone = HashSet::new();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    metrics.errors += 1;
                    self.emit(SweepEvent::WalkFailed {
                        path: e.path().map(Path::to_path_buf),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                if entry.depth() > 0 {
                    visited_dirs.push(entry.into_path());
                }
                continue;
            }

            if entry.depth() == 0 || is_dir_symlink(&entry) {
                continue;
            }

            let disposed = self.visit_file(&entry, &disposal, threshold, dry_run, &mut metrics);
            if dry_run && disposed {
                gone.insert(entry.into_path());
            }
        }

        // Pre-order reversed puts every directory after all of its descendants
        if job.remove_empty_dirs {
            for dir in visited_dirs.iter().rev() {
                if Some(dir.as_path()) == trash {
                    continue;
                }
                if self.prune_if_empty(dir, &gone, dry_run, &mut metrics) && dry_run {
                    gone.insert(dir.clone());
                }
            }
        }

        self.emit(SweepEvent::SweepFinished {
            job: job.name.clone(),
            disposed: metrics.total_disposed(),
            dirs_removed: metrics.dirs_removed,
            errors: metrics.errors,
        });

        metrics
    }

    /// Age-check one candidate file and dispose of it if it qualifies
    ///
    /// Returns true when the file was (or in a dry run, would have been)
    /// disposed of.
    fn visit_file(
        &self,
        entry: &DirEntry,
        disposal: &Disposal,
        threshold: Option<SystemTime>,
        dry_run: bool,
        metrics: &mut SweepMetrics,
    ) -> bool {
        let path = entry.path();
        metrics.files_examined += 1;

        // Follows symlinks, so a dangling link reads as vanished
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(e) if dispose::is_vanished(&e) => {
                metrics.vanished += 1;
                self.emit(SweepEvent::Vanished {
                    path: path.to_path_buf(),
                });
                return false;
            }
            Err(e) => {
                metrics.errors += 1;
                self.emit(SweepEvent::DisposalFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                return false;
            }
        };

        let old_enough = match (threshold, meta.modified()) {
            (Some(threshold), Ok(mtime)) => mtime < threshold,
            (None, _) => false,
            (_, Err(e)) => {
                metrics.errors += 1;
                self.emit(SweepEvent::DisposalFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                return false;
            }
        };

        if !old_enough {
            metrics.files_retained += 1;
            return false;
        }

        // Shredding a link would overwrite its target; only the link goes
        let unlink = Disposal::Delete;
        let disposal = if entry.path_is_symlink() && *disposal == Disposal::Shred {
            &unlink
        } else {
            disposal
        };

        let size = meta.len();
        let result = match disposal {
            Disposal::Trash(trash) => {
                self.emit(SweepEvent::Moving {
                    path: path.to_path_buf(),
                    trash: trash.clone(),
                });
                if dry_run {
                    Ok(())
                } else {
                    dispose::move_to_trash(path, trash).map(|_| ())
                }
            }
            Disposal::Shred => {
                self.emit(SweepEvent::SecurelyDeleting {
                    path: path.to_path_buf(),
                });
                if dry_run {
                    Ok(())
                } else {
                    dispose::shred(path).map(|_| ())
                }
            }
            Disposal::Delete => {
                self.emit(SweepEvent::Deleting {
                    path: path.to_path_buf(),
                });
                if dry_run {
                    Ok(())
                } else {
                    dispose::delete(path)
                }
            }
        };

        match result {
            Ok(()) => {
                match disposal {
                    Disposal::Trash(_) => metrics.moved += 1,
                    Disposal::Shred => metrics.shredded += 1,
                    Disposal::Delete => metrics.deleted += 1,
                }
                metrics.bytes_reclaimed += size;
                true
            }
            Err(e) if e.is_vanished() => {
                metrics.vanished += 1;
                self.emit(SweepEvent::Vanished {
                    path: path.to_path_buf(),
                });
                false
            }
            Err(SweepError::Io { source, .. }) => {
                metrics.errors += 1;
                self.emit(SweepEvent::DisposalFailed {
                    path: path.to_path_buf(),
                    reason: source.to_string(),
                });
                false
            }
            Err(e) => {
                metrics.errors += 1;
                self.emit(SweepEvent::DisposalFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                false
            }
        }
    }

    /// Remove a visited directory if nothing is left in it on disk
    ///
    /// Emptiness is judged on the real directory listing, so children that
    /// were filtered out but still exist keep the directory alive. Entries in
    /// `gone` count as absent; a dry run fills it with everything it would
    /// have removed so that cascades are reported as a real run performs them.
    /// Returns true when the directory was (or would have been) removed.
    fn prune_if_empty(
        &self,
        path: &Path,
        gone: &HashSet<PathBuf>,
        dry_run: bool,
        metrics: &mut SweepMetrics,
    ) -> bool {
        let is_empty = match fs::read_dir(path) {
            Ok(mut entries) => entries.all(|entry| {
                entry
                    .map(|entry| gone.contains(&entry.path()))
                    .unwrap_or(false)
            }),
            Err(e) if dispose::is_vanished(&e) => return false,
            Err(e) => {
                metrics.errors += 1;
                self.emit(SweepEvent::WalkFailed {
                    path: Some(path.to_path_buf()),
                    reason: e.to_string(),
                });
                return false;
            }
        };

        if !is_empty {
            return false;
        }

        self.emit(SweepEvent::RemovingEmptyDir {
            path: path.to_path_buf(),
        });
        if dry_run {
            metrics.dirs_removed += 1;
            return true;
        }

        match fs::remove_dir(path) {
            Ok(()) => {
                metrics.dirs_removed += 1;
                true
            }
            Err(e) if dispose::is_vanished(&e) => false,
            Err(e) => {
                metrics.errors += 1;
                self.emit(SweepEvent::WalkFailed {
                    path: Some(path.to_path_buf()),
                    reason: e.to_string(),
                });
                false
            }
        }
    }

    fn emit(&self, event: SweepEvent) {
        self.observer.observe(&event);
    }
}

/// Symlinks to directories are neither descended into nor disposed of
fn is_dir_symlink(entry: &DirEntry) -> bool {
    entry.path_is_symlink() && entry.path().is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordingObserver;
    use broom_domain::NamePattern;
    use filetime::{set_file_mtime, FileTime};
    use std::time::Duration;
    use tempfile::TempDir;

    const DAY: u64 = 86400;

    fn make_file(dir: &Path, name: &str, age_days: u64) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, name.as_bytes()).unwrap();
        let mtime = SystemTime::now() - Duration::from_secs(age_days * DAY);
        set_file_mtime(&path, FileTime::from_system_time(mtime)).unwrap();
        path
    }

    fn sweeper() -> (Sweeper, Arc<RecordingObserver>) {
        let recorder = Arc::new(RecordingObserver::new());
        (Sweeper::new(recorder.clone()), recorder)
    }

    #[test]
    fn test_deletes_only_old_files() {
        let dir = TempDir::new().unwrap();
        let old = make_file(dir.path(), "old.txt", 5);
        let fresh = make_file(dir.path(), "fresh.txt", 0);

        let (sweeper, recorder) = sweeper();
        let job = SweepJob::with_days("t", dir.path(), 1);
        let metrics = sweeper.sweep(&job, false);

        assert!(!old.exists());
        assert!(fresh.exists());
        assert_eq!(metrics.deleted, 1);
        assert_eq!(metrics.files_retained, 1);
        assert_eq!(metrics.files_examined, 2);
        assert_eq!(recorder.messages()[0], "Sweeping t");
        assert!(recorder
            .messages()
            .contains(&format!("Deleting {}", old.display())));
    }

    #[test]
    fn test_threshold_is_strict() {
        let dir = TempDir::new().unwrap();
        let file = make_file(dir.path(), "edge.txt", 0);
        let mtime = fs::metadata(&file).unwrap().modified().unwrap();

        let (sweeper, _) = sweeper();
        let job = SweepJob::new("t", dir.path(), Duration::from_secs(DAY));

        // Exactly max_age old: mtime == now - max_age, not disposed
        let metrics = sweeper.sweep_at(&job, false, mtime + Duration::from_secs(DAY));
        assert!(file.exists());
        assert_eq!(metrics.files_retained, 1);

        let metrics = sweeper.sweep_at(&job, false, mtime + Duration::from_secs(DAY + 1));
        assert!(!file.exists());
        assert_eq!(metrics.deleted, 1);
    }

    #[test]
    fn test_ignored_directory_is_not_descended() {
        let dir = TempDir::new().unwrap();
        let kept = make_file(dir.path(), "keep/old.txt", 5);
        let swept = make_file(dir.path(), "other/old.txt", 5);

        let (sweeper, _) = sweeper();
        let job = SweepJob::with_days("t", dir.path(), 1)
            .with_ignore(NamePattern::ignoring("keep").unwrap());
        sweeper.sweep(&job, false);

        assert!(kept.exists());
        assert!(!swept.exists());
        // Its only file is gone, so `other` is pruned in the same pass
        assert!(!dir.path().join("other").exists());
    }

    #[test]
    fn test_match_applies_to_directories_too() {
        let dir = TempDir::new().unwrap();
        let nested = make_file(dir.path(), "sub/old.txt", 5);
        let top = make_file(dir.path(), "old.txt", 5);

        let (sweeper, _) = sweeper();
        let job = SweepJob::with_days("t", dir.path(), 1)
            .with_match(NamePattern::matching("*.txt").unwrap());
        sweeper.sweep(&job, false);

        assert!(!top.exists());
        // `sub` does not match *.txt, so it is never entered
        assert!(nested.exists());
    }

    #[test]
    fn test_empty_dirs_cascade_but_root_survives() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
        make_file(dir.path(), "a/b/old.txt", 5);

        let (sweeper, _) = sweeper();
        let job = SweepJob::with_days("t", dir.path(), 1);
        let metrics = sweeper.sweep(&job, false);

        assert!(!dir.path().join("a").exists());
        assert!(dir.path().exists());
        assert_eq!(metrics.dirs_removed, 3);
    }

    #[test]
    fn test_filtered_children_keep_directory() {
        let dir = TempDir::new().unwrap();
        let ignored = make_file(dir.path(), "sub/b.log", 5);

        let (sweeper, _) = sweeper();
        let job = SweepJob::with_days("t", dir.path(), 1)
            .with_ignore(NamePattern::ignoring("*.log").unwrap());
        let metrics = sweeper.sweep(&job, false);

        assert!(ignored.exists());
        assert_eq!(metrics.dirs_removed, 0);
    }

    #[test]
    fn test_remove_empty_disabled() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();

        let (sweeper, _) = sweeper();
        let job = SweepJob::with_days("t", dir.path(), 1).with_remove_empty_dirs(false);
        sweeper.sweep(&job, false);

        assert!(dir.path().join("empty").exists());
    }

    #[test]
    fn test_shred_disposal() {
        let dir = TempDir::new().unwrap();
        let file = make_file(dir.path(), "secret.txt", 5);

        let (sweeper, recorder) = sweeper();
        let job = SweepJob::with_days("t", dir.path(), 1).with_shred(true);
        let metrics = sweeper.sweep(&job, false);

        assert!(!file.exists());
        assert_eq!(metrics.shredded, 1);
        assert_eq!(metrics.deleted, 0);
        assert!(recorder
            .messages()
            .contains(&format!("Securely deleting {}", file.display())));
    }

    #[test]
    fn test_dry_run_reports_without_mutating() {
        let dir = TempDir::new().unwrap();
        let file = make_file(dir.path(), "old.txt", 5);
        fs::create_dir(dir.path().join("empty")).unwrap();

        let (sweeper, recorder) = sweeper();
        let job = SweepJob::with_days("t", dir.path(), 1);
        let metrics = sweeper.sweep(&job, true);

        assert!(file.exists());
        assert!(dir.path().join("empty").exists());
        assert_eq!(metrics.deleted, 1);
        assert_eq!(metrics.dirs_removed, 1);
        assert!(recorder.events().iter().any(|e| e.is_disposal()));
    }

    #[test]
    fn test_huge_max_age_disposes_nothing() {
        let dir = TempDir::new().unwrap();
        let file = make_file(dir.path(), "old.txt", 5000);

        let (sweeper, _) = sweeper();
        let job = SweepJob::new("t", dir.path(), Duration::from_secs(u64::MAX));
        let metrics = sweeper.sweep(&job, false);

        assert!(file.exists());
        assert_eq!(metrics.total_disposed(), 0);
    }

    #[test]
    fn test_missing_root_reports_walk_error() {
        let dir = TempDir::new().unwrap();
        let (sweeper, recorder) = sweeper();
        let job = SweepJob::with_days("t", dir.path().join("gone"), 1);
        let metrics = sweeper.sweep(&job, false);

        assert_eq!(metrics.errors, 1);
        assert!(matches!(
            recorder.events()[1],
            SweepEvent::WalkFailed { .. }
        ));
    }

    #[test]
    fn test_dry_run_reports_cascading_removals() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
        make_file(dir.path(), "a/b/old.txt", 5);

        let (sweeper, recorder) = sweeper();
        let job = SweepJob::with_days("t", dir.path(), 1);
        let dry = sweeper.sweep(&job, true);

        assert!(dir.path().join("a/b/c").exists());
        assert_eq!(dry.dirs_removed, 3);
        let removing = recorder
            .messages()
            .into_iter()
            .filter(|m| m.starts_with("Removing empty directory"))
            .count();
        assert_eq!(removing, 3);

        let real = sweeper.sweep(&job, false);
        assert_eq!(real.dirs_removed, dry.dirs_removed);
        assert_eq!(real.deleted, dry.deleted);
    }

    #[test]
    fn test_dry_run_cascade_stops_at_retained_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        make_file(dir.path(), "a/fresh.txt", 0);

        let (sweeper, _) = sweeper();
        let job = SweepJob::with_days("t", dir.path(), 1);
        let metrics = sweeper.sweep(&job, true);

        // Only `b` would go; `a` still holds a fresh file
        assert_eq!(metrics.dirs_removed, 1);
    }

    #[test]
    fn test_trash_inside_tree_is_skipped() {
        let dir = TempDir::new().unwrap();
        let trash = dir.path().join(".trash");
        fs::create_dir(&trash).unwrap();
        make_file(dir.path(), "a.txt", 10);

        let (sweeper, recorder) = sweeper();
        let job = SweepJob::with_days("t", dir.path(), 1).with_trash(&trash);

        let first = sweeper.sweep(&job, false);
        assert_eq!(first.moved, 1);
        assert!(trash.join("a.txt").exists());

        recorder.clear();
        let second = sweeper.sweep(&job, false);
        assert_eq!(second.moved, 0);
        assert_eq!(second.files_examined, 0);
        assert!(!recorder.events().iter().any(|e| e.is_disposal()));
        assert!(trash.join("a.txt").exists());
    }

    #[test]
    fn test_empty_trash_inside_tree_is_kept() {
        let dir = TempDir::new().unwrap();
        let trash = dir.path().join("sub/.trash");
        fs::create_dir_all(&trash).unwrap();

        let (sweeper, _) = sweeper();
        let job = SweepJob::with_days("t", dir.path(), 1).with_trash(&trash);
        let metrics = sweeper.sweep(&job, false);

        assert!(trash.is_dir());
        assert_eq!(metrics.dirs_removed, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_shred_removes_symlink_but_not_target() {
        let outside = TempDir::new().unwrap();
        let target = outside.path().join("important.doc");
        fs::write(&target, "PRECIOUS DATA").unwrap();
        let mtime = SystemTime::now() - Duration::from_secs(10 * DAY);
        set_file_mtime(&target, FileTime::from_system_time(mtime)).unwrap();

        let dir = TempDir::new().unwrap();
        let link = dir.path().join("link.doc");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let (sweeper, recorder) = sweeper();
        let job = SweepJob::with_days("t", dir.path(), 1).with_shred(true);
        let metrics = sweeper.sweep(&job, false);

        assert!(fs::symlink_metadata(&link).is_err());
        assert_eq!(fs::read_to_string(&target).unwrap(), "PRECIOUS DATA");
        assert_eq!(metrics.deleted, 1);
        assert_eq!(metrics.shredded, 0);
        assert!(recorder
            .messages()
            .contains(&format!("Deleting {}", link.display())));
    }
}
