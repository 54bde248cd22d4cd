//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CallLogConfig (validated, immutable)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → dropped if equal to the last delivered config
//!     → new config sent to the owner, which swaps backend thresholds
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an empty file is a valid config
//! - Validation separates syntactic (serde) from semantic checks
//! - Only thresholds are hot-reloadable; logging init happens once

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{CallLogConfig, InterceptorConfig, LoggingConfig, ThresholdConfig, ThresholdOverride};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
