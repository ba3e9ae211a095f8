//! Sweep job module - one watched directory and its cleanup policy

use crate::NamePattern;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Seconds in one configured "day" of age
pub const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// How a qualifying file leaves its directory
///
/// A job has exactly one disposal mode. Shredding is only ever chosen when no
/// trash directory is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposal {
    /// Remove the file
    Delete,

    /// Overwrite the file's bytes with random data, then remove it
    Shred,

    /// Rename the file into this directory, keeping its base name
    Trash(PathBuf),
}

impl Disposal {
    /// Short verb used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposal::Delete => "delete",
            Disposal::Shred => "shred",
            Disposal::Trash(_) => "trash",
        }
    }
}

/// One configured cleanup target, fully resolved
///
/// A `SweepJob` is built fresh for every run and never mutated afterwards:
/// paths are absolute and validated, patterns are compiled, and the
/// shred/trash conflict has already been settled.
///
/// # Examples
///
/// ```
/// use broom_domain::{Disposal, SweepJob};
/// use std::time::Duration;
///
/// let job = SweepJob::new("downloads", "/home/me/Downloads", Duration::from_secs(86400))
///     .with_trash("/home/me/.trash")
///     .with_shred(true);
///
/// // Shred is never honored alongside a trash directory
/// assert_eq!(job.disposal(), Disposal::Trash("/home/me/.trash".into()));
/// ```
#[derive(Debug, Clone)]
pub struct SweepJob {
    /// Identifier used in logs (the config section name)
    pub name: String,

    /// Absolute root directory to scan
    pub path: PathBuf,

    /// Files last modified longer ago than this qualify for disposal
    pub max_age: Duration,

    /// Names excluded from descent and disposal
    pub ignore: NamePattern,

    /// Names eligible for descent and disposal
    pub matcher: NamePattern,

    /// Relocate instead of deleting
    pub trash: Option<PathBuf>,

    /// Overwrite before deleting (ignored when `trash` is set)
    pub shred: bool,

    /// Remove directories left with no entries
    pub remove_empty_dirs: bool,
}

impl SweepJob {
    /// Create a job with default filters: match everything, ignore nothing,
    /// plain deletion, and empty-directory removal enabled
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            max_age,
            ignore: NamePattern::nothing(),
            matcher: NamePattern::everything(),
            trash: None,
            shred: false,
            remove_empty_dirs: true,
        }
    }

    /// Create a job whose age threshold is a whole number of days
    pub fn with_days(name: impl Into<String>, path: impl Into<PathBuf>, days: u64) -> Self {
        Self::new(name, path, Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY)))
    }

    /// Set the ignore pattern
    pub fn with_ignore(mut self, ignore: NamePattern) -> Self {
        self.ignore = ignore;
        self
    }

    /// Set the match pattern
    pub fn with_match(mut self, matcher: NamePattern) -> Self {
        self.matcher = matcher;
        self
    }

    /// Set the trash directory
    pub fn with_trash(mut self, trash: impl Into<PathBuf>) -> Self {
        self.trash = Some(trash.into());
        self
    }

    /// Enable or disable shredding
    pub fn with_shred(mut self, shred: bool) -> Self {
        self.shred = shred;
        self
    }

    /// Enable or disable empty-directory removal
    pub fn with_remove_empty_dirs(mut self, remove: bool) -> Self {
        self.remove_empty_dirs = remove;
        self
    }

    /// The disposal mode for every qualifying file of this job
    pub fn disposal(&self) -> Disposal {
        match (&self.trash, self.shred) {
            (Some(trash), _) => Disposal::Trash(trash.clone()),
            (None, true) => Disposal::Shred,
            (None, false) => Disposal::Delete,
        }
    }

    /// Whether an entry name passes both filters
    ///
    /// Ignore always wins over match.
    pub fn admits(&self, name: &OsStr) -> bool {
        self.matcher.matches(name) && !self.ignore.matches(name)
    }

    /// Destination of `file` inside the trash directory, if one is set
    pub fn trash_destination(&self, file: &Path) -> Option<PathBuf> {
        let trash = self.trash.as_ref()?;
        file.file_name().map(|name| trash.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> &OsStr {
        OsStr::new(s)
    }

    #[test]
    fn test_defaults() {
        let job = SweepJob::with_days("tmp", "/tmp/x", 3);
        assert_eq!(job.max_age, Duration::from_secs(3 * 86400));
        assert!(job.remove_empty_dirs);
        assert!(!job.shred);
        assert_eq!(job.disposal(), Disposal::Delete);
        assert!(job.admits(name("anything")));
    }

    #[test]
    fn test_disposal_modes() {
        let job = SweepJob::with_days("a", "/a", 1).with_shred(true);
        assert_eq!(job.disposal(), Disposal::Shred);

        let job = SweepJob::with_days("a", "/a", 1).with_trash("/t");
        assert_eq!(job.disposal(), Disposal::Trash(PathBuf::from("/t")));

        let job = job.with_shred(true);
        assert_eq!(job.disposal(), Disposal::Trash(PathBuf::from("/t")));
    }

    #[test]
    fn test_ignore_takes_precedence() {
        let job = SweepJob::with_days("a", "/a", 1)
            .with_match(NamePattern::matching("*.txt").unwrap())
            .with_ignore(NamePattern::ignoring("secret*").unwrap());

        assert!(job.admits(name("notes.txt")));
        assert!(!job.admits(name("secret.txt")));
        assert!(!job.admits(name("notes.csv")));
    }

    #[test]
    fn test_trash_destination_keeps_base_name() {
        let job = SweepJob::with_days("a", "/watched", 1).with_trash("/trash");
        assert_eq!(
            job.trash_destination(Path::new("/watched/deep/d.bin")),
            Some(PathBuf::from("/trash/d.bin"))
        );

        let job = SweepJob::with_days("a", "/watched", 1);
        assert_eq!(job.trash_destination(Path::new("/watched/d.bin")), None);
    }

    #[test]
    fn test_huge_day_count_saturates() {
        let job = SweepJob::with_days("a", "/a", u64::MAX);
        assert_eq!(job.max_age, Duration::from_secs(u64::MAX));
    }
}
