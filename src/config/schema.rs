//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::format::DEFAULT_PLACEHOLDER;
use crate::level::Level;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CallLogConfig {
    /// Process logging (subscriber) settings.
    pub logging: LoggingConfig,

    /// Per-logger thresholds used by the tracing backend.
    pub thresholds: ThresholdConfig,

    /// Interceptor behavior.
    pub interceptor: InterceptorConfig,
}

/// Subscriber configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence when set.
    pub filter: String,

    /// Emit JSON lines instead of the human-readable format.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,call_log=trace".to_string(),
            json: false,
        }
    }
}

/// Threshold table source.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Threshold for loggers with no matching override.
    pub default: Level,

    /// Per-target overrides; the longest matching target wins.
    pub overrides: Vec<ThresholdOverride>,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            default: Level::Info,
            overrides: Vec::new(),
        }
    }
}

/// Threshold for one logger-name prefix.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ThresholdOverride {
    /// Type path prefix, e.g. `my_app::db`.
    pub target: String,

    pub level: Level,
}

/// Interceptor configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct InterceptorConfig {
    /// Text logged in place of a value whose `Display` impl fails.
    pub placeholder: String,
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}
