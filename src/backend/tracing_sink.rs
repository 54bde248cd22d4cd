//! Backend that forwards call log records to `tracing`.
//!
//! Every record becomes an event on the `call_log` target, with the owning
//! logger name and the original severity as fields. Per-logger thresholds
//! live in a [`ThresholdTable`] behind an `ArcSwap`, so a config reload
//! changes what already-cached handles admit.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::backend::{EmitError, LogBackend, Logger, LoggerHandle};
use crate::config::ThresholdConfig;
use crate::level::Level;

/// `tracing` target used for every forwarded record.
pub const CALL_LOG_TARGET: &str = "call_log";

/// Minimum levels per logger-name prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdTable {
    default: Level,
    /// Sorted longest target first so the first match is the most specific.
    overrides: Vec<(String, Level)>,
}

impl ThresholdTable {
    pub fn new(default: Level) -> Self {
        Self {
            default,
            overrides: Vec::new(),
        }
    }

    /// Set the threshold for `target` and every logger nested below it.
    pub fn with_override(mut self, target: impl Into<String>, level: Level) -> Self {
        let target = target.into();
        self.overrides.retain(|(existing, _)| *existing != target);
        self.overrides.push((target, level));
        self.overrides.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        self
    }

    pub fn from_config(config: &ThresholdConfig) -> Self {
        config
            .overrides
            .iter()
            .fold(Self::new(config.default), |table, o| {
                table.with_override(o.target.clone(), o.level)
            })
    }

    pub fn default_level(&self) -> Level {
        self.default
    }

    /// Resolve the threshold for a logger name.
    ///
    /// A target matches the name itself and any `target::...` path below it.
    pub fn threshold_for(&self, name: &str) -> Level {
        self.overrides
            .iter()
            .find(|(target, _)| {
                name == target
                    || name
                        .strip_prefix(target.as_str())
                        .is_some_and(|rest| rest.starts_with("::") || rest.starts_with('<'))
            })
            .map(|(_, level)| *level)
            .unwrap_or(self.default)
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

/// Backend forwarding records to the active `tracing` subscriber.
#[derive(Debug, Clone)]
pub struct TracingBackend {
    thresholds: Arc<ArcSwap<ThresholdTable>>,
}

impl TracingBackend {
    pub fn new(thresholds: ThresholdTable) -> Self {
        Self {
            thresholds: Arc::new(ArcSwap::from_pointee(thresholds)),
        }
    }

    pub fn from_config(config: &ThresholdConfig) -> Self {
        Self::new(ThresholdTable::from_config(config))
    }

    /// Atomically replace the threshold table.
    pub fn update_thresholds(&self, thresholds: ThresholdTable) {
        tracing::info!(
            default = %thresholds.default_level(),
            overrides = thresholds.overrides.len(),
            "Call log thresholds updated"
        );
        self.thresholds.store(Arc::new(thresholds));
    }

    pub fn thresholds(&self) -> Arc<ThresholdTable> {
        self.thresholds.load_full()
    }
}

impl Default for TracingBackend {
    fn default() -> Self {
        Self::new(ThresholdTable::default())
    }
}

impl LogBackend for TracingBackend {
    fn logger(&self, name: &str) -> LoggerHandle {
        Arc::new(TracingLogger {
            name: name.to_string(),
            thresholds: self.thresholds.clone(),
        })
    }
}

#[derive(Debug)]
struct TracingLogger {
    name: String,
    thresholds: Arc<ArcSwap<ThresholdTable>>,
}

// `tracing` needs the level as a constant in each callsite.
macro_rules! forward {
    ($lvl:expr, $logger:expr, $severity:expr, $message:expr) => {
        tracing::event!(
            target: CALL_LOG_TARGET,
            $lvl,
            logger = %$logger,
            severity = %$severity,
            "{}",
            $message
        )
    };
}

fn subscriber_admits(level: Level) -> bool {
    match level.as_tracing() {
        tracing::Level::TRACE => tracing::enabled!(target: CALL_LOG_TARGET, tracing::Level::TRACE),
        tracing::Level::DEBUG => tracing::enabled!(target: CALL_LOG_TARGET, tracing::Level::DEBUG),
        tracing::Level::INFO => tracing::enabled!(target: CALL_LOG_TARGET, tracing::Level::INFO),
        tracing::Level::WARN => tracing::enabled!(target: CALL_LOG_TARGET, tracing::Level::WARN),
        _ => tracing::enabled!(target: CALL_LOG_TARGET, tracing::Level::ERROR),
    }
}

impl Logger for TracingLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, level: Level) -> bool {
        level >= self.thresholds.load().threshold_for(&self.name) && subscriber_admits(level)
    }

    fn log(&self, level: Level, message: &str) -> Result<(), EmitError> {
        match level.as_tracing() {
            tracing::Level::TRACE => forward!(tracing::Level::TRACE, self.name, level, message),
            tracing::Level::DEBUG => forward!(tracing::Level::DEBUG, self.name, level, message),
            tracing::Level::INFO => forward!(tracing::Level::INFO, self.name, level, message),
            tracing::Level::WARN => forward!(tracing::Level::WARN, self.name, level, message),
            _ => forward!(tracing::Level::ERROR, self.name, level, message),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn subscriber(buf: SharedBuf) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || buf.clone())
            .finish()
    }

    #[test]
    fn test_threshold_table_longest_prefix_wins() {
        let table = ThresholdTable::new(Level::Warn)
            .with_override("app", Level::Info)
            .with_override("app::db", Level::Trace);

        assert_eq!(table.threshold_for("app::db::Pool"), Level::Trace);
        assert_eq!(table.threshold_for("app::http::Server"), Level::Info);
        assert_eq!(table.threshold_for("app"), Level::Info);
        assert_eq!(table.threshold_for("other::Thing"), Level::Warn);
    }

    #[test]
    fn test_threshold_table_requires_path_boundary() {
        let table = ThresholdTable::new(Level::Error).with_override("app", Level::Debug);
        assert_eq!(table.threshold_for("application::Main"), Level::Error);
        assert_eq!(table.threshold_for("app<u8>"), Level::Debug);
    }

    #[test]
    fn test_threshold_override_replaces_existing_target() {
        let table = ThresholdTable::new(Level::Info)
            .with_override("app", Level::Debug)
            .with_override("app", Level::Error);
        assert_eq!(table.threshold_for("app::X"), Level::Error);
    }

    #[test]
    fn test_tracing_logger_forwards_event() {
        let buf = SharedBuf::default();
        let backend = TracingBackend::new(ThresholdTable::new(Level::Trace));
        let logger = backend.logger("app::Foo");

        tracing::subscriber::with_default(subscriber(buf.clone()), || {
            assert!(logger.is_enabled(Level::Info));
            logger.log(Level::Info, "Entering method bar[hello, 123]").unwrap();
        });

        let out = buf.contents();
        assert!(out.contains("Entering method bar[hello, 123]"));
        assert!(out.contains("logger=app::Foo"));
        assert!(out.contains(CALL_LOG_TARGET));
    }

    #[test]
    fn test_update_thresholds_applies_to_cached_handles() {
        let buf = SharedBuf::default();
        let backend = TracingBackend::new(ThresholdTable::new(Level::Error));
        let logger = backend.logger("app::Foo");

        tracing::subscriber::with_default(subscriber(buf), || {
            assert!(!logger.is_enabled(Level::Info));
            backend.update_thresholds(ThresholdTable::new(Level::Info));
            assert!(logger.is_enabled(Level::Info));
        });
    }
}
