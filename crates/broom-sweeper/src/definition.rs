//! Job definitions: the as-configured form of a sweep job

use crate::{Result, SweepError};
use broom_domain::ConfigSection;
use serde::{Deserialize, Serialize};

/// Config keys understood in a job section
pub mod keys {
    /// Root directory to scan (required)
    pub const PATH: &str = "path";
    /// Age threshold in days (required)
    pub const NUM_DAYS: &str = "numdays";
    /// Trash directory
    pub const TRASH: &str = "trash";
    /// Comma-separated globs to exclude
    pub const IGNORE: &str = "ignore";
    /// Comma-separated globs to include
    pub const MATCH: &str = "match";
    /// Overwrite before deleting
    pub const SHRED: &str = "shred";
    /// Remove directories left empty
    pub const REMOVE_EMPTY: &str = "removeempty";
}

/// A job exactly as configured, before any path is resolved or validated
///
/// # Examples
///
/// ```
/// use broom_sweeper::JobDefinition;
///
/// let def = JobDefinition::new("downloads", "~/Downloads", 30).with_ignore("*.part");
/// assert_eq!(def.match_list, "*");
/// assert!(def.remove_empty);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDefinition {
    /// Section name
    pub name: String,

    /// Root directory, possibly relative or starting with `~`
    pub path: String,

    /// Age threshold in whole days
    pub num_days: u64,

    /// Trash directory, possibly relative or starting with `~`
    pub trash: Option<String>,

    /// Comma-separated globs to exclude
    pub ignore_list: String,

    /// Comma-separated globs to include
    pub match_list: String,

    /// Overwrite before deleting
    pub shred: bool,

    /// Remove directories left empty
    pub remove_empty: bool,
}

impl JobDefinition {
    /// Create a definition with every optional key at its default
    pub fn new(name: impl Into<String>, path: impl Into<String>, num_days: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            num_days,
            trash: None,
            ignore_list: String::new(),
            match_list: "*".to_string(),
            shred: false,
            remove_empty: true,
        }
    }

    /// Set the trash directory
    pub fn with_trash(mut self, trash: impl Into<String>) -> Self {
        self.trash = Some(trash.into());
        self
    }

    /// Set the ignore list
    pub fn with_ignore(mut self, ignore: impl Into<String>) -> Self {
        self.ignore_list = ignore.into();
        self
    }

    /// Set the match list
    pub fn with_match(mut self, matcher: impl Into<String>) -> Self {
        self.match_list = matcher.into();
        self
    }

    /// Enable or disable shredding
    pub fn with_shred(mut self, shred: bool) -> Self {
        self.shred = shred;
        self
    }

    /// Enable or disable empty-directory removal
    pub fn with_remove_empty(mut self, remove: bool) -> Self {
        self.remove_empty = remove;
        self
    }

    /// Read a definition from one config section
    ///
    /// `path` and `numdays` are required; their absence is reported as
    /// [`SweepError::MissingOption`]. A negative `numdays` or a malformed
    /// integer/boolean is [`SweepError::InvalidOption`].
    pub fn from_section<S: ConfigSection + ?Sized>(section: &S) -> Result<Self> {
        let name = section.name();

        let path = section
            .get(keys::PATH)
            .ok_or_else(|| missing(name, keys::PATH))?;

        let num_days = section
            .get_int(keys::NUM_DAYS)
            .map_err(|e| SweepError::invalid_value(name, keys::NUM_DAYS, e))?
            .ok_or_else(|| missing(name, keys::NUM_DAYS))?;
        let num_days = u64::try_from(num_days).map_err(|_| SweepError::InvalidOption {
            section: name.to_string(),
            option: keys::NUM_DAYS,
            reason: format!("{} is negative", num_days),
        })?;

        let shred = section
            .get_bool(keys::SHRED)
            .map_err(|e| SweepError::invalid_value(name, keys::SHRED, e))?
            .unwrap_or(false);

        let remove_empty = section
            .get_bool(keys::REMOVE_EMPTY)
            .map_err(|e| SweepError::invalid_value(name, keys::REMOVE_EMPTY, e))?
            .unwrap_or(true);

        Ok(Self {
            name: name.to_string(),
            path,
            num_days,
            trash: section.get(keys::TRASH).filter(|t| !t.trim().is_empty()),
            ignore_list: section.get(keys::IGNORE).unwrap_or_default(),
            match_list: section.get(keys::MATCH).unwrap_or_else(|| "*".to_string()),
            shred,
            remove_empty,
        })
    }
}

fn missing(section: &str, option: &'static str) -> SweepError {
    SweepError::MissingOption {
        section: section.to_string(),
        option,
    }
}
