//! Top-level command execution.

use crate::cli::{Cli, CliFormat};
use crate::config::ConfigFile;
use crate::error::Result;
use crate::output::Formatter;
use broom_domain::SweepObserver;
use broom_sweeper::{Orchestrator, SweepWorker, SweeperConfig, TracingObserver};
use std::sync::Arc;

impl Cli {
    /// Run-time knobs for the sweeper.
    pub fn sweeper_config(&self) -> SweeperConfig {
        let defaults = SweeperConfig::default();
        SweeperConfig {
            dry_run: self.dry_run,
            strict: self.strict,
            interval_minutes: self.every.unwrap_or(defaults.interval_minutes),
        }
    }

    /// Formatter for the summary and for error messages.
    pub fn formatter(&self) -> Formatter {
        Formatter::new(self.summary.unwrap_or(CliFormat::Table), !self.no_color)
    }
}

/// Load the config and sweep once, or periodically with `--every`.
///
/// Returns the rendered summary when `--summary` was given.
pub fn execute(cli: &Cli) -> Result<Option<String>> {
    let path = ConfigFile::discover(cli.config.as_deref())?;
    let config = ConfigFile::load(&path)?;
    tracing::debug!(
        "Loaded {} job section(s) from {}",
        config.sections().len(),
        config.path().display()
    );

    let observer: Arc<dyn SweepObserver> = Arc::new(TracingObserver);
    let formatter = cli.formatter();

    if cli.every.is_none() {
        let orchestrator = Orchestrator::new(cli.sweeper_config(), observer);
        let report = orchestrator.run_sections(config.sections())?;
        return match cli.summary {
            Some(_) => Ok(Some(formatter.format_report(&report)?)),
            None => Ok(None),
        };
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut worker = SweepWorker::new(cli.sweeper_config(), observer);
    runtime.block_on(async {
        match cli.cycles {
            Some(cycles) => worker.run_cycles(config.sections(), cycles).await,
            None => worker.run(config.sections()).await,
        }
    })?;

    match cli.summary {
        Some(_) => Ok(Some(formatter.format_totals(worker.totals(), worker.cycles())?)),
        None => Ok(None),
    }
}
