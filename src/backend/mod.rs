//! Logging backend contract.
//!
//! # Responsibilities
//! - Hand out one logger handle per logger name
//! - Answer whether a level is admitted before any formatting happens
//! - Emit a single preformatted message at a level
//!
//! # Design Decisions
//! - Thresholds, sinks and output formats belong to the backend; the
//!   interceptor only calls `is_enabled` and `log`
//! - Emission is fallible so sinks can reject records; callers decide
//!   whether to surface that
//! - Two backends ship with the crate: `TracingBackend` for real processes
//!   and `MemoryBackend` for tests and embedding

pub mod memory;
pub mod tracing_sink;

use std::sync::Arc;

use thiserror::Error;

use crate::level::Level;

pub use memory::{CapturedRecord, MemoryBackend};
pub use tracing_sink::{ThresholdTable, TracingBackend, CALL_LOG_TARGET};

/// A shared handle to a named logger.
pub type LoggerHandle = Arc<dyn Logger>;

/// Failure to emit a record.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("log sink rejected record: {0}")]
    Rejected(String),
    #[error("log sink i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

/// A named logger obtained from a [`LogBackend`].
pub trait Logger: Send + Sync + 'static {
    /// The name the handle was created for.
    fn name(&self) -> &str;

    /// Check if a level is admitted by the effective threshold.
    fn is_enabled(&self, level: Level) -> bool;

    /// Emit a preformatted message.
    fn log(&self, level: Level, message: &str) -> Result<(), EmitError>;
}

/// Source of logger handles, keyed by name.
pub trait LogBackend: Send + Sync + 'static {
    fn logger(&self, name: &str) -> LoggerHandle;
}

impl<B: LogBackend + ?Sized> LogBackend for Arc<B> {
    fn logger(&self, name: &str) -> LoggerHandle {
        (**self).logger(name)
    }
}
