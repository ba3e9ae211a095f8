//! Broom Sweeper
//!
//! Sweep engine and orchestration for age-based filesystem cleanup.
//!
//! # Overview
//!
//! The sweeper is responsible for:
//! - **Walking**: One depth-first traversal per job, pruning filtered directories
//! - **Age checks**: Files older than the job's threshold qualify for disposal
//! - **Disposal**: Delete, shred-then-delete, or move to a trash directory
//! - **Empty-directory pruning**: Bottom-up removal of directories left empty
//! - **Orchestration**: Running many independent jobs, isolating their failures
//! - **Metrics collection**: Counting what each sweep did
//!
//! ## Disposal Strategies
//!
//! | Configured | Strategy | Event |
//! |------------|----------|-------|
//! | nothing | delete | `Deleting <path>` |
//! | `shred` | overwrite with random bytes, then delete | `Securely deleting <path>` |
//! | `trash` | rename into the trash directory | `Moving <path> to <trash>` |
//! | `shred` + `trash` | trash (shred is dropped with a warning) | `Moving <path> to <trash>` |
//!
//! # Usage
//!
//! ## One-time Run
//!
//! ```no_run
//! use broom_sweeper::{JobDefinition, Orchestrator, SweeperConfig, TracingObserver};
//! use std::sync::Arc;
//!
//! let orchestrator = Orchestrator::new(SweeperConfig::default(), Arc::new(TracingObserver));
//! let report = orchestrator.run(&[JobDefinition::new("downloads", "~/Downloads", 30)]);
//! println!("{}", report.totals().summary());
//! ```
//!
//! ## Periodic Worker
//!
//! [`SweepWorker`] repeats a full run over the config sections on a fixed
//! interval until Ctrl+C; see its documentation for a complete program.
//!
//! # Observing a Run
//!
//! Nothing in this crate writes to a global logger directly during a sweep:
//! every action is a [`broom_domain::SweepEvent`] delivered to the injected
//! [`broom_domain::SweepObserver`]. [`TracingObserver`] forwards events to
//! `tracing`; [`RecordingObserver`] keeps them in memory.

#![warn(missing_docs)]

mod config;
mod definition;
mod dispose;
mod error;
mod metrics;
mod observer;
mod orchestrator;
mod sweeper;
mod worker;

pub use config::SweeperConfig;
pub use definition::{keys, JobDefinition};
pub use error::{Result, SweepError};
pub use metrics::{JobOutcome, JobReport, RunReport, SweepMetrics};
pub use observer::{RecordingObserver, TracingObserver};
pub use orchestrator::{resolve_path, Orchestrator};
pub use sweeper::Sweeper;
pub use worker::SweepWorker;
