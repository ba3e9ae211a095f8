//! Trait definitions for external interactions
//!
//! These traits define the boundaries between sweep logic and its
//! collaborators. Implementations live in other crates.

use crate::SweepEvent;
use thiserror::Error;

/// Receives every event produced by the orchestrator and the sweep engine
///
/// Implemented by the infrastructure layer (`broom-sweeper` forwards to
/// `tracing`; tests record events in memory).
pub trait SweepObserver: Send + Sync {
    /// Handle one event
    fn observe(&self, event: &SweepEvent);
}

/// A configuration value that exists but has the wrong shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionValueError {
    /// Expected an integer
    #[error("'{0}' is not an integer")]
    NotAnInteger(String),
    /// Expected a boolean
    #[error("'{0}' is not a boolean")]
    NotABoolean(String),
}

/// One named section of already-parsed configuration
///
/// Values are looked up by key; `get_int` and `get_bool` parse the string
/// form by default, so a plain key/value source only has to implement
/// [`ConfigSection::get`].
///
/// # Examples
///
/// ```
/// use broom_domain::ConfigSection;
/// use std::collections::HashMap;
///
/// struct Section(HashMap<&'static str, &'static str>);
///
/// impl ConfigSection for Section {
///     fn name(&self) -> &str { "downloads" }
///     fn get(&self, key: &str) -> Option<String> {
///         self.0.get(key).map(|v| v.to_string())
///     }
/// }
///
/// let section = Section(HashMap::from([("numdays", "30"), ("shred", "yes")]));
/// assert_eq!(section.get_int("numdays"), Ok(Some(30)));
/// assert_eq!(section.get_bool("shred"), Ok(Some(true)));
/// assert_eq!(section.get_bool("removeempty"), Ok(None));
/// ```
pub trait ConfigSection {
    /// Section name (becomes the job name)
    fn name(&self) -> &str;

    /// Raw string value of `key`
    fn get(&self, key: &str) -> Option<String>;

    /// Integer value of `key`
    fn get_int(&self, key: &str) -> Result<Option<i64>, OptionValueError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| OptionValueError::NotAnInteger(raw)),
        }
    }

    /// Boolean value of `key`
    ///
    /// Accepts `1/yes/true/on` and `0/no/false/off`, case-insensitively.
    fn get_bool(&self, key: &str) -> Result<Option<bool>, OptionValueError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => parse_bool(&raw)
                .map(Some)
                .ok_or(OptionValueError::NotABoolean(raw)),
        }
    }
}

/// Parse the boolean spellings accepted in configuration files
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}
