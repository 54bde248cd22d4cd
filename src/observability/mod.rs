//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Interceptor hooks produce:
//!     → backend (the call log records themselves)
//!     → metrics.rs (records, suppressed failures, logger creation)
//!     → tracing (the crate's own diagnostics)
//!
//! logging.rs installs the process-wide subscriber that renders both
//! the crate's diagnostics and records forwarded by `TracingBackend`.
//! ```
//!
//! # Design Decisions
//! - Metric updates are no-ops until the host installs a recorder
//! - Failures inside hooks are visible here, never to the intercepted caller

pub mod logging;
pub mod metrics;
