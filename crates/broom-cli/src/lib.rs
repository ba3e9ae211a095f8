//! Broom CLI library.
//!
//! Argument parsing, config file loading, logging setup and summary output
//! for the `broom` binary. The sweeping itself lives in `broom-sweeper`.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

pub use app::execute;
pub use cli::{Cli, CliFormat};
pub use config::{ConfigFile, TomlSection};
pub use error::{CliError, Result};
pub use output::Formatter;
