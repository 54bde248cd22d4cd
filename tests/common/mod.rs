//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::error::Error;
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use call_log::backend::{EmitError, LogBackend, Logger, LoggerHandle};
use call_log::{CallInterceptor, Level, LoggerRegistry, LoggingDirective, MemoryBackend};

/// Cause raised by `Foo::risky`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllegalState(pub &'static str);

impl fmt::Display for IllegalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IllegalStateException: {}", self.0)
    }
}

impl Error for IllegalState {}

/// Wrapper error returned to callers of `Foo::risky`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationFailed(pub IllegalState);

impl fmt::Display for InvocationFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invocation failed")
    }
}

impl Error for InvocationFailed {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// Instrumented type mirroring the scenarios the interceptor is built for.
pub struct Foo {
    interceptor: Arc<CallInterceptor>,
    level: Level,
}

impl Foo {
    pub fn new(interceptor: Arc<CallInterceptor>, level: Level) -> Self {
        Self { interceptor, level }
    }

    pub fn bar(&self, greeting: &str, count: i32) {
        self.interceptor
            .invocation(self, "bar", LoggingDirective::new(self.level))
            .args(&[&greeting, &count])
            .void(|| {})
    }

    pub fn compute(&self, x: i64) -> i64 {
        self.interceptor
            .invocation(self, "compute", LoggingDirective::new(self.level))
            .args(&[&x])
            .returning(|| x * x)
    }

    pub fn risky(&self) -> Result<(), InvocationFailed> {
        self.interceptor
            .invocation(self, "risky", LoggingDirective::new(self.level))
            .fallible_void(|| Err(InvocationFailed(IllegalState("bad state"))))
    }

    pub fn echo(&self, value: &dyn fmt::Display) -> String {
        self.interceptor
            .invocation(self, "echo", LoggingDirective::new(self.level))
            .args(&[value])
            .returning(|| value.to_string())
    }
}

/// Interceptor over a fresh memory backend admitting `threshold` and above.
pub fn memory_interceptor(threshold: Level) -> (MemoryBackend, Arc<CallInterceptor>) {
    let backend = MemoryBackend::with_threshold(threshold);
    let registry = Arc::new(LoggerRegistry::new(backend.clone()));
    (backend, Arc::new(CallInterceptor::new(registry)))
}

/// Interceptor over an arbitrary backend.
pub fn interceptor_with(backend: impl LogBackend) -> Arc<CallInterceptor> {
    Arc::new(CallInterceptor::new(Arc::new(LoggerRegistry::new(backend))))
}

/// Display impl that counts how often it is rendered.
#[derive(Default)]
pub struct CountingDisplay {
    renders: AtomicUsize,
}

impl CountingDisplay {
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl fmt::Display for CountingDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.renders.fetch_add(1, Ordering::SeqCst);
        f.write_str("counted")
    }
}

/// Error whose `Display` counts how often it is rendered.
#[derive(Debug, Clone, Default)]
pub struct CountingError {
    renders: Arc<AtomicUsize>,
}

impl CountingError {
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl fmt::Display for CountingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.renders.fetch_add(1, Ordering::SeqCst);
        f.write_str("counted failure")
    }
}

impl Error for CountingError {}

/// How a [`FaultyBackend`] logger misbehaves.
#[derive(Debug, Clone, Copy)]
pub enum Fault {
    RejectEmit,
    IoFailure,
    PanicOnEmit,
    PanicOnEnabled,
}

/// Backend whose loggers admit everything and then fail.
#[derive(Debug, Clone, Copy)]
pub struct FaultyBackend(pub Fault);

impl LogBackend for FaultyBackend {
    fn logger(&self, name: &str) -> LoggerHandle {
        Arc::new(FaultyLogger {
            name: name.to_string(),
            fault: self.0,
        })
    }
}

struct FaultyLogger {
    name: String,
    fault: Fault,
}

impl Logger for FaultyLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, _level: Level) -> bool {
        if let Fault::PanicOnEnabled = self.fault {
            panic!("threshold lookup exploded");
        }
        true
    }

    fn log(&self, _level: Level, _message: &str) -> Result<(), EmitError> {
        match self.fault {
            Fault::RejectEmit => Err(EmitError::Rejected("sink closed".into())),
            Fault::IoFailure => Err(io::Error::new(io::ErrorKind::Other, "disk full").into()),
            Fault::PanicOnEmit => panic!("sink exploded"),
            Fault::PanicOnEnabled => Ok(()),
        }
    }
}
