//! Configuration file discovery and loading.
//!
//! A config file is TOML. Every top-level table is one sweep job, named by
//! its table header and run in file order:
//!
//! ```toml
//! [Downloads]
//! path = "~/Downloads"
//! numdays = 30
//! trash = "~/.Trash"
//! ignore = "*.part,*.crdownload"
//!
//! [Scratch]
//! path = "/tmp/scratch"
//! numdays = "7"
//! shred = "yes"
//! ```

use crate::error::{CliError, Result};
use broom_domain::{parse_bool, ConfigSection, OptionValueError};
use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// File name under the platform config directory.
const CONFIG_FILE: &str = "config.toml";

/// Legacy dotfile in the home directory.
const DOTFILE: &str = ".broomrc";

/// A loaded configuration file.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    sections: Vec<TomlSection>,
}

/// One job section of a [`ConfigFile`].
#[derive(Debug, Clone, PartialEq)]
pub struct TomlSection {
    name: String,
    table: Table,
}

impl ConfigFile {
    /// Default config locations, most preferred first.
    pub fn default_locations() -> Vec<PathBuf> {
        let mut locations = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            locations.push(config_dir.join("broom").join(CONFIG_FILE));
        }
        if let Some(home) = dirs::home_dir() {
            locations.push(home.join(DOTFILE));
        }
        locations
    }

    /// Pick the config file to load.
    ///
    /// An explicit path must exist. Otherwise the first existing default
    /// location wins.
    pub fn discover(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.is_file() {
                return Ok(path.to_path_buf());
            }
            return Err(CliError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let locations = Self::default_locations();
        if let Some(found) = locations.iter().find(|p| p.is_file()) {
            return Ok(found.clone());
        }

        Err(CliError::ConfigNotFound {
            path: locations
                .into_iter()
                .next()
                .unwrap_or_else(|| PathBuf::from(DOTFILE)),
        })
    }

    /// Load and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|error| CliError::ConfigRead {
            path: path.to_path_buf(),
            error,
        })?;
        Self::parse(&contents, path)
    }

    /// Parse config contents read from `path`.
    pub fn parse(contents: &str, path: &Path) -> Result<Self> {
        let root = contents.parse::<Table>().map_err(|error| CliError::Toml {
            path: path.to_path_buf(),
            error,
        })?;

        let mut sections = Vec::with_capacity(root.len());
        for (name, value) in root {
            match value {
                Value::Table(table) => sections.push(TomlSection { name, table }),
                other => {
                    return Err(CliError::Config(format!(
                        "{}: top-level key '{}' is a {}, expected a [section]",
                        path.display(),
                        name,
                        other.type_str()
                    )))
                }
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            sections,
        })
    }

    /// Where the file was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Job sections in file order.
    pub fn sections(&self) -> &[TomlSection] {
        &self.sections
    }
}

impl TomlSection {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.table
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }
}

impl ConfigSection for TomlSection {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<String> {
        match self.lookup(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Array(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                Some(parts.join(","))
            }
            other => Some(other.to_string()),
        }
    }

    fn get_int(&self, key: &str) -> std::result::Result<Option<i64>, OptionValueError> {
        match self.lookup(key) {
            None => Ok(None),
            Some(Value::Integer(n)) => Ok(Some(*n)),
            Some(Value::String(raw)) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| OptionValueError::NotAnInteger(raw.clone())),
            Some(other) => Err(OptionValueError::NotAnInteger(other.to_string())),
        }
    }

    fn get_bool(&self, key: &str) -> std::result::Result<Option<bool>, OptionValueError> {
        match self.lookup(key) {
            None => Ok(None),
            Some(Value::Boolean(b)) => Ok(Some(*b)),
            Some(Value::Integer(0)) => Ok(Some(false)),
            Some(Value::Integer(1)) => Ok(Some(true)),
            Some(Value::String(raw)) => parse_bool(raw)
                .map(Some)
                .ok_or_else(|| OptionValueError::NotABoolean(raw.clone())),
            Some(other) => Err(OptionValueError::NotABoolean(other.to_string())),
        }
    }
}
