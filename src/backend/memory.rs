//! In-memory backend that captures records.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::backend::{EmitError, LogBackend, Logger, LoggerHandle};
use crate::level::Level;

/// A record captured by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    pub logger: String,
    pub level: Level,
    pub message: String,
}

#[derive(Debug)]
struct Shared {
    threshold: AtomicU8,
    capacity: Option<usize>,
    records: Mutex<Vec<CapturedRecord>>,
    loggers_created: AtomicUsize,
}

/// Backend that appends every admitted record to a shared buffer.
///
/// Clones share the same buffer and threshold, so a test can keep one clone
/// for assertions while the registry owns another.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    shared: Arc<Shared>,
}

impl MemoryBackend {
    /// Create a backend that admits every level.
    pub fn new() -> Self {
        Self::with_threshold(Level::Trace)
    }

    /// Create a backend that admits `threshold` and above.
    pub fn with_threshold(threshold: Level) -> Self {
        Self {
            shared: Arc::new(Shared {
                threshold: AtomicU8::new(threshold as u8),
                capacity: None,
                records: Mutex::new(Vec::new()),
                loggers_created: AtomicUsize::new(0),
            }),
        }
    }

    /// Limit the buffer; records beyond `capacity` are rejected.
    pub fn with_capacity(self, capacity: usize) -> Self {
        let threshold = self.threshold();
        Self {
            shared: Arc::new(Shared {
                threshold: AtomicU8::new(threshold as u8),
                capacity: Some(capacity),
                records: Mutex::new(Vec::with_capacity(capacity)),
                loggers_created: AtomicUsize::new(0),
            }),
        }
    }

    pub fn threshold(&self) -> Level {
        Level::from(self.shared.threshold.load(Ordering::Relaxed))
    }

    /// Change the threshold for every handle created by this backend.
    pub fn set_threshold(&self, threshold: Level) {
        self.shared.threshold.store(threshold as u8, Ordering::Relaxed);
    }

    /// Snapshot of all captured records.
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.shared
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Captured messages only, in emission order.
    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.message).collect()
    }

    pub fn clear(&self) {
        self.shared
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    /// Number of handles handed out so far.
    pub fn loggers_created(&self) -> usize {
        self.shared.loggers_created.load(Ordering::Relaxed)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LogBackend for MemoryBackend {
    fn logger(&self, name: &str) -> LoggerHandle {
        self.shared.loggers_created.fetch_add(1, Ordering::Relaxed);
        Arc::new(MemoryLogger {
            name: name.to_string(),
            shared: self.shared.clone(),
        })
    }
}

#[derive(Debug)]
struct MemoryLogger {
    name: String,
    shared: Arc<Shared>,
}

impl Logger for MemoryLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, level: Level) -> bool {
        level >= Level::from(self.shared.threshold.load(Ordering::Relaxed))
    }

    fn log(&self, level: Level, message: &str) -> Result<(), EmitError> {
        let mut records = self
            .shared
            .records
            .lock()
            .map_err(|_| EmitError::Rejected("record buffer poisoned".into()))?;

        if let Some(capacity) = self.shared.capacity {
            if records.len() >= capacity {
                return Err(EmitError::Rejected(format!(
                    "record buffer full ({capacity} records)"
                )));
            }
        }

        records.push(CapturedRecord {
            logger: self.name.clone(),
            level,
            message: message.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_captures_records() {
        let backend = MemoryBackend::new();
        let logger = backend.logger("app::Foo");

        logger.log(Level::Info, "hello").unwrap();

        assert_eq!(
            backend.records(),
            vec![CapturedRecord {
                logger: "app::Foo".into(),
                level: Level::Info,
                message: "hello".into(),
            }]
        );
        assert_eq!(backend.loggers_created(), 1);
    }

    #[test]
    fn test_threshold_is_shared_with_existing_handles() {
        let backend = MemoryBackend::with_threshold(Level::Warn);
        let logger = backend.logger("app::Foo");

        assert!(!logger.is_enabled(Level::Info));
        assert!(logger.is_enabled(Level::Error));

        backend.set_threshold(Level::Debug);
        assert!(logger.is_enabled(Level::Info));
        assert!(!logger.is_enabled(Level::Trace));
    }

    #[test]
    fn test_capacity_rejects_overflow() {
        let backend = MemoryBackend::new().with_capacity(1);
        let logger = backend.logger("app::Foo");

        logger.log(Level::Info, "first").unwrap();
        let err = logger.log(Level::Info, "second").unwrap_err();

        assert!(matches!(err, EmitError::Rejected(_)));
        assert_eq!(backend.messages(), vec!["first".to_string()]);
    }

    #[test]
    fn test_clear() {
        let backend = MemoryBackend::new();
        backend.logger("x").log(Level::Info, "m").unwrap();
        backend.clear();
        assert!(backend.records().is_empty());
    }
}
