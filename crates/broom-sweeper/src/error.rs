//! Error types for sweep operations

use broom_domain::{OptionValueError, PatternError};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Errors that can occur while resolving or running sweep jobs
///
/// Every variant except [`SweepError::NoRunnableJobs`] and
/// [`SweepError::Worker`] is scoped to a single job or a single file.
#[derive(Error, Debug)]
pub enum SweepError {
    /// A required option is absent from a section
    #[error("No option '{option}' in section: '{section}'")]
    MissingOption {
        /// Section name
        section: String,
        /// Missing key
        option: &'static str,
    },

    /// An option is present but unusable
    #[error("Invalid value for '{option}' in section '{section}': {reason}")]
    InvalidOption {
        /// Section name
        section: String,
        /// Offending key
        option: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// A glob in `match` or `ignore` did not compile
    #[error("Invalid pattern in section '{section}': {source}")]
    Pattern {
        /// Section name
        section: String,
        /// Underlying glob error
        #[source]
        source: PatternError,
    },

    /// The configured path is not an existing directory
    #[error("No such directory: {}", path.display())]
    NotADirectory {
        /// Resolved path
        path: PathBuf,
    },

    /// A path could not be resolved to an absolute path
    #[error("Cannot resolve path '{raw}': {reason}")]
    Unresolvable {
        /// Path as configured
        raw: String,
        /// What went wrong
        reason: String,
    },

    /// The trash directory could not be created
    #[error("Cannot create trash directory {}: {source}", path.display())]
    TrashDirectory {
        /// Resolved trash path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Filesystem error while disposing of a single file
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file or directory involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Strict mode: not a single section produced a runnable job
    #[error("No runnable jobs: {rejected} section(s) rejected")]
    NoRunnableJobs {
        /// Sections that failed to resolve
        rejected: usize,
    },

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}

impl SweepError {
    /// Build an [`SweepError::InvalidOption`] from a value-shape error
    pub fn invalid_value(section: &str, option: &'static str, err: OptionValueError) -> Self {
        SweepError::InvalidOption {
            section: section.to_string(),
            option,
            reason: err.to_string(),
        }
    }

    /// True when an I/O failure only means the entry was already gone
    pub fn is_vanished(&self) -> bool {
        matches!(self, SweepError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }

    /// True for errors caused by the configuration itself
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SweepError::MissingOption { .. }
                | SweepError::InvalidOption { .. }
                | SweepError::Pattern { .. }
        )
    }
}
