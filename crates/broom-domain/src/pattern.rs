//! Name pattern module - glob filters applied to directory-entry names

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::ffi::OsStr;
use std::fmt;
use thiserror::Error;

/// Error raised when a glob in a pattern list cannot be compiled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid glob '{glob}': {reason}")]
pub struct PatternError {
    /// The offending glob, as written
    pub glob: String,
    /// Why it was rejected
    pub reason: String,
}

/// A compiled alternation of shell globs, matched against whole entry names
///
/// Supports `*` (any run of characters), `?` (one character) and `[...]` /
/// `[!...]` character classes. Matching is case-sensitive and anchored: a
/// name matches when at least one glob matches all of it.
///
/// Patterns are built once per job and then shared by every step of a walk.
///
/// # Examples
///
/// ```
/// use broom_domain::NamePattern;
///
/// let pattern = NamePattern::matching("*.txt, *.md").unwrap();
/// assert!(pattern.matches("notes.md".as_ref()));
/// assert!(!pattern.matches("data.csv".as_ref()));
///
/// let ignore = NamePattern::ignoring("").unwrap();
/// assert!(!ignore.matches("anything".as_ref()));
/// ```
#[derive(Clone)]
pub struct NamePattern {
    globs: Vec<String>,
    set: GlobSet,
}

impl NamePattern {
    /// Compile an inclusion list: an empty list means "match everything"
    pub fn matching(list: &str) -> Result<Self, PatternError> {
        let globs = split_list(list);
        if globs.is_empty() {
            return Self::compile(vec!["*".to_string()]);
        }
        Self::compile(globs)
    }

    /// Compile an exclusion list: an empty list means "match nothing"
    pub fn ignoring(list: &str) -> Result<Self, PatternError> {
        Self::compile(split_list(list))
    }

    /// A pattern that matches every name
    pub fn everything() -> Self {
        Self::matching("").unwrap_or_else(|_| Self::nothing())
    }

    /// A pattern that matches no name
    pub fn nothing() -> Self {
        Self {
            globs: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    /// Compile an explicit list of globs into one alternation
    pub fn compile<I, S>(globs: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let globs: Vec<String> = globs.into_iter().map(Into::into).collect();
        let mut builder = GlobSetBuilder::new();

        for glob in &globs {
            let compiled = GlobBuilder::new(&to_glob_syntax(glob))
                .literal_separator(false)
                .backslash_escape(false)
                .build()
                .map_err(|e| PatternError {
                    glob: glob.clone(),
                    reason: e.kind().to_string(),
                })?;
            builder.add(compiled);
        }

        let set = builder.build().map_err(|e| PatternError {
            glob: globs.join(","),
            reason: e.to_string(),
        })?;

        Ok(Self { globs, set })
    }

    /// Whether `name` (a single path component) matches any glob
    pub fn matches(&self, name: &OsStr) -> bool {
        !self.globs.is_empty() && self.set.is_match(name)
    }

    /// The globs this pattern was compiled from
    pub fn globs(&self) -> &[String] {
        &self.globs
    }

    /// True when the pattern can never match
    pub fn is_empty(&self) -> bool {
        self.globs.is_empty()
    }
}

impl fmt::Debug for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NamePattern").field(&self.globs).finish()
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.globs.join(","))
    }
}

impl PartialEq for NamePattern {
    fn eq(&self, other: &Self) -> bool {
        self.globs == other.globs
    }
}

/// Rewrite a shell glob for `globset`
///
/// Braces are literal characters here, not alternation, and a `[` with no
/// closing `]` is a literal `[`. Both are wrapped in one-character classes.
fn to_glob_syntax(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::with_capacity(glob.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '[' => {
                let mut end = i + 1;
                if chars.get(end) == Some(&'!') {
                    end += 1;
                }
                // A leading `]` is part of the class
                if chars.get(end) == Some(&']') {
                    end += 1;
                }
                while end < chars.len() && chars[end] != ']' {
                    end += 1;
                }

                if end < chars.len() {
                    out.extend(&chars[i..=end]);
                    i = end + 1;
                } else {
                    out.push_str("[[]");
                    i += 1;
                }
            }
            '{' => {
                out.push_str("[{]");
                i += 1;
            }
            '}' => {
                out.push_str("[}]");
                i += 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Split a comma-separated glob list, dropping blank entries
fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|glob| !glob.is_empty())
        .map(str::to_string)
        .collect()
}
