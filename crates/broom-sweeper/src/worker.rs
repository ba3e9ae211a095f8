//! Periodic worker for continuous sweeping

use crate::{Orchestrator, SweepError, SweepMetrics, SweeperConfig};
use broom_domain::{ConfigSection, SweepObserver};
use std::future::Future;
use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Worker that re-runs every job on a schedule
///
/// Each tick is one complete, synchronous orchestrator run over the config
/// sections. Sections are parsed and resolved fresh on every cycle, so a
/// directory that appears later is picked up on the next tick. A shutdown
/// signal is only honored between cycles.
///
/// # Examples
///
/// ```no_run
/// use broom_domain::ConfigSection;
/// use broom_sweeper::{SweepWorker, SweeperConfig, TracingObserver};
/// use std::sync::Arc;
///
/// struct Downloads;
///
/// impl ConfigSection for Downloads {
///     fn name(&self) -> &str {
///         "downloads"
///     }
///
///     fn get(&self, key: &str) -> Option<String> {
///         match key {
///             "path" => Some("~/Downloads".to_string()),
///             "numdays" => Some("30".to_string()),
///             _ => None,
///         }
///     }
/// }
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = SweeperConfig::default();
///     let mut worker = SweepWorker::new(config, Arc::new(TracingObserver));
///
///     // Run indefinitely (until Ctrl+C)
///     worker.run(&[Downloads]).await?;
///     Ok(())
/// }
/// ```
pub struct SweepWorker {
    orchestrator: Orchestrator,
    interval: Duration,
    totals: SweepMetrics,
    cycles: usize,
}

impl SweepWorker {
    /// Create a worker using the configured interval
    pub fn new(config: SweeperConfig, observer: Arc<dyn SweepObserver>) -> Self {
        let interval = config.interval();
        Self {
            orchestrator: Orchestrator::new(config, observer),
            interval,
            totals: SweepMetrics::new(),
            cycles: 0,
        }
    }

    /// Override the interval between cycles
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Metrics summed over every completed cycle
    pub fn totals(&self) -> &SweepMetrics {
        &self.totals
    }

    /// Number of completed cycles
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// Run the worker indefinitely
    ///
    /// Sweeps on every tick until a shutdown signal (Ctrl+C) is received.
    ///
    /// # Errors
    ///
    /// Returns an error if a strict-mode cycle finds no runnable job, or if
    /// the shutdown signal cannot be listened for.
    pub async fn run<S: ConfigSection>(&mut self, sections: &[S]) -> Result<(), SweepError> {
        self.run_until(sections, tokio::signal::ctrl_c()).await
    }

    /// Run the worker until `shutdown` completes
    ///
    /// The shutdown future is created once and polled ahead of every tick, so
    /// a signal that arrives while a cycle is running stops the worker as
    /// soon as that cycle ends.
    pub async fn run_until<S, F>(&mut self, sections: &[S], shutdown: F) -> Result<(), SweepError>
    where
        S: ConfigSection,
        F: Future<Output = std::io::Result<()>>,
    {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!("Sweep worker started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                biased;

                signal = &mut shutdown => {
                    signal.map_err(|e| SweepError::Worker(e.to_string()))?;
                    tracing::info!("Shutdown signal received, stopping sweep worker");
                    break;
                }
                _ = ticker.tick() => {
                    self.cycle(sections)?;
                }
            }
        }

        tracing::info!("Sweep worker stopped. Final metrics:\n{}", self.totals.summary());

        Ok(())
    }

    /// Run for a specific number of cycles
    ///
    /// The first cycle starts immediately; later ones wait for the interval.
    pub async fn run_cycles<S: ConfigSection>(
        &mut self,
        sections: &[S],
        cycles: usize,
    ) -> Result<(), SweepError> {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            "Sweep worker started for {} cycles (interval: {:?})",
            cycles,
            self.interval
        );

        for cycle in 0..cycles {
            ticker.tick().await;
            tracing::debug!("Starting sweep cycle {}/{}", cycle + 1, cycles);
            self.cycle(sections)?;
        }

        tracing::info!("Sweep worker finished {} cycles", cycles);

        Ok(())
    }

    fn cycle<S: ConfigSection>(&mut self, sections: &[S]) -> Result<(), SweepError> {
        let report = self.orchestrator.run_sections(sections)?;
        let totals = report.totals();

        tracing::info!(
            "Sweep cycle completed: {} disposed, {} empty dirs removed, {} skipped job(s), {} error(s)",
            totals.total_disposed(),
            totals.dirs_removed,
            report.skipped_count(),
            totals.errors
        );

        self.totals.merge(&totals);
        self.cycles += 1;
        Ok(())
    }
}
