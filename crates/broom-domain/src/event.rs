//! Sweep events - everything a sweep or run reports

use std::fmt;
use std::path::PathBuf;

/// Severity of a [`SweepEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventLevel {
    /// Diagnostic detail (race skips, young files)
    Debug,
    /// Normal progress: job starts and disposal actions
    Info,
    /// Configuration was adjusted to keep going
    Warn,
    /// A job or a file could not be processed
    Error,
}

/// A single observable step of a run
///
/// Dry runs emit the same disposal events as real runs; only the filesystem
/// mutation is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepEvent {
    /// A run over all configured jobs began
    RunStarted {
        /// Number of jobs about to be processed
        jobs: usize,
        /// Whether filesystem mutations are suppressed
        dry_run: bool,
    },

    /// A job's sweep began
    SweepStarted {
        /// Job name
        job: String,
    },

    /// A file is being relocated into the trash
    Moving {
        /// Source file
        path: PathBuf,
        /// Trash directory
        trash: PathBuf,
    },

    /// A file is being overwritten and removed
    SecurelyDeleting {
        /// File being shredded
        path: PathBuf,
    },

    /// A file is being removed
    Deleting {
        /// File being removed
        path: PathBuf,
    },

    /// A directory with no remaining entries is being removed
    RemovingEmptyDir {
        /// Directory being removed
        path: PathBuf,
    },

    /// A file vanished between listing and disposal
    Vanished {
        /// The missing file
        path: PathBuf,
    },

    /// The configured trash directory did not exist and is being created
    CreatingTrashDir {
        /// Job name
        job: String,
        /// Trash directory
        path: PathBuf,
    },

    /// Both shred and trash were configured; shred is dropped
    ShredIgnored {
        /// Job name
        job: String,
    },

    /// The configured path is not an existing directory
    InvalidDirectory {
        /// Job name
        job: String,
        /// Resolved path
        path: PathBuf,
    },

    /// The trash directory is unusable
    InvalidTrashDir {
        /// Job name
        job: String,
        /// Resolved trash path
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// A section could not be turned into a job
    JobRejected {
        /// Section name
        job: String,
        /// What went wrong
        reason: String,
    },

    /// Moving, shredding or deleting a file failed
    DisposalFailed {
        /// The file
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// A directory could not be read or removed during the walk
    WalkFailed {
        /// The entry, when known
        path: Option<PathBuf>,
        /// What went wrong
        reason: String,
    },

    /// A job's sweep finished
    SweepFinished {
        /// Job name
        job: String,
        /// Files disposed of (or that would have been, in a dry run)
        disposed: usize,
        /// Directories removed
        dirs_removed: usize,
        /// Errors encountered
        errors: usize,
    },
}

impl SweepEvent {
    /// Severity used when routing the event to a log sink
    pub fn level(&self) -> EventLevel {
        match self {
            SweepEvent::Vanished { .. } => EventLevel::Debug,
            SweepEvent::RunStarted { .. }
            | SweepEvent::SweepStarted { .. }
            | SweepEvent::Moving { .. }
            | SweepEvent::SecurelyDeleting { .. }
            | SweepEvent::Deleting { .. }
            | SweepEvent::RemovingEmptyDir { .. }
            | SweepEvent::SweepFinished { .. } => EventLevel::Info,
            SweepEvent::CreatingTrashDir { .. } | SweepEvent::ShredIgnored { .. } => {
                EventLevel::Warn
            }
            SweepEvent::InvalidDirectory { .. }
            | SweepEvent::InvalidTrashDir { .. }
            | SweepEvent::JobRejected { .. }
            | SweepEvent::DisposalFailed { .. }
            | SweepEvent::WalkFailed { .. } => EventLevel::Error,
        }
    }

    /// True for the per-file disposal actions
    pub fn is_disposal(&self) -> bool {
        matches!(
            self,
            SweepEvent::Moving { .. } | SweepEvent::SecurelyDeleting { .. } | SweepEvent::Deleting { .. }
        )
    }
}

impl fmt::Display for SweepEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepEvent::RunStarted { jobs, dry_run } => {
                write!(f, "Starting broom ({} job(s)", jobs)?;
                if *dry_run {
                    write!(f, ", dry run")?;
                }
                write!(f, ")")
            }
            SweepEvent::SweepStarted { job } => write!(f, "Sweeping {}", job),
            SweepEvent::Moving { path, trash } => {
                write!(f, "Moving {} to {}", path.display(), trash.display())
            }
            SweepEvent::SecurelyDeleting { path } => {
                write!(f, "Securely deleting {}", path.display())
            }
            SweepEvent::Deleting { path } => write!(f, "Deleting {}", path.display()),
            SweepEvent::RemovingEmptyDir { path } => {
                write!(f, "Removing empty directory {}", path.display())
            }
            SweepEvent::Vanished { path } => {
                write!(f, "Skipping {} (no longer exists)", path.display())
            }
            SweepEvent::CreatingTrashDir { job, path } => {
                write!(f, "[{}] Creating trash directory {}", job, path.display())
            }
            SweepEvent::ShredIgnored { job } => {
                write!(f, "[{}] Ignoring 'shred' option while 'trash' is set", job)
            }
            SweepEvent::InvalidDirectory { job, path } => {
                write!(f, "[{}] No such directory: {}", job, path.display())
            }
            SweepEvent::InvalidTrashDir { job, path, reason } => write!(
                f,
                "[{}] Unusable trash directory {}: {}",
                job,
                path.display(),
                reason
            ),
            SweepEvent::JobRejected { job, reason } => write!(f, "[{}] {}", job, reason),
            SweepEvent::DisposalFailed { path, reason } => {
                write!(f, "Failed to dispose of {}: {}", path.display(), reason)
            }
            SweepEvent::WalkFailed { path: Some(path), reason } => {
                write!(f, "Failed to walk {}: {}", path.display(), reason)
            }
            SweepEvent::WalkFailed { path: None, reason } => write!(f, "Walk error: {}", reason),
            SweepEvent::SweepFinished {
                job,
                disposed,
                dirs_removed,
                errors,
            } => write!(
                f,
                "Finished {}: {} file(s), {} empty dir(s), {} error(s)",
                job, disposed, dirs_removed, errors
            ),
        }
    }
}
