//! Broom Domain Layer
//!
//! This crate contains the value types shared by the sweep engine and its
//! callers. It holds no I/O: every type here is either an immutable value or
//! a trait describing an external interaction.
//!
//! ## Key Concepts
//!
//! - **SweepJob**: One watched directory with its own cleanup policy
//! - **NamePattern**: A compiled glob alternation applied to entry names
//! - **Disposal**: How a qualifying file leaves its directory (delete, shred, trash)
//! - **SweepEvent**: Everything a sweep reports, routed through a [`SweepObserver`]
//! - **ConfigSection**: Accessors over one named section of configuration
//!
//! ## Architecture
//!
//! - Pure values only, no filesystem access
//! - Trait definitions for all external interactions
//! - The engine and orchestrator live in `broom-sweeper`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod event;
pub mod job;
pub mod pattern;
pub mod traits;

// Re-exports for convenience
pub use event::{EventLevel, SweepEvent};
pub use job::{Disposal, SweepJob, SECONDS_PER_DAY};
pub use pattern::{NamePattern, PatternError};
pub use traits::{parse_bool, ConfigSection, OptionValueError, SweepObserver};
