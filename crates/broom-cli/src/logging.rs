//! Tracing subscriber setup for the `broom` binary.
//!
//! Two layers: a console layer that prints bare messages to stderr, and a
//! non-blocking file layer with timestamps and levels. The file layer is
//! skipped for dry runs so that a preview leaves no trace on disk.

use crate::error::{CliError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Default file filter when `RUST_LOG` is unset.
const DEFAULT_FILE_FILTER: &str = "info";

/// Logging options derived from the command line.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Show info-level messages on the console
    pub verbose: bool,
    /// Skip the log file
    pub dry_run: bool,
    /// Log file path; `None` disables the file layer
    pub log_file: Option<PathBuf>,
}

impl LogOptions {
    /// Console threshold.
    pub fn console_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::INFO
        } else {
            LevelFilter::ERROR
        }
    }

    /// The log file to write, if any.
    pub fn file(&self) -> Option<&Path> {
        if self.dry_run {
            return None;
        }
        self.log_file.as_deref()
    }
}

/// Default log file location under the platform cache directory.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("broom").join("broom.log"))
}

/// Install the global subscriber.
///
/// Returns the file writer's guard, which must stay alive until exit so
/// buffered lines are flushed. A log file that cannot be opened is reported
/// on stderr and logging continues on the console only.
pub fn init(options: &LogOptions) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match options.file().map(file_writer) {
        Some(Ok((writer, guard))) => {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILE_FILTER));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .with_filter(filter);
            (Some(layer), Some(guard))
        }
        Some(Err(e)) => {
            eprintln!("Warning: failed to open log file: {}", e);
            (None, None)
        }
        None => (None, None),
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_filter(options.console_level());

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))?;

    Ok(guard)
}

fn file_writer(path: &Path) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| CliError::Logging(format!("not a file path: {}", path.display())))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .map_err(|e| CliError::Logging(e.to_string()))?;

    Ok(tracing_appender::non_blocking(appender))
}
