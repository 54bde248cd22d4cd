//! Entry and exit hooks.

use std::error::Error;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::config::InterceptorConfig;
use crate::format::ArgumentFormatter;
use crate::level::Level;
use crate::observability::metrics;
use crate::registry::{LoggerRegistry, Owner};

/// Text logged as the result of a call that returns no value.
pub const VOID_TEXT: &str = "void";

/// Severity selected for a wrapped call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggingDirective {
    level: Level,
}

impl LoggingDirective {
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    pub const fn trace() -> Self {
        Self::new(Level::Trace)
    }

    pub const fn debug() -> Self {
        Self::new(Level::Debug)
    }

    pub const fn info() -> Self {
        Self::new(Level::Info)
    }

    pub const fn warn() -> Self {
        Self::new(Level::Warn)
    }

    pub const fn error() -> Self {
        Self::new(Level::Error)
    }

    pub const fn fatal() -> Self {
        Self::new(Level::Fatal)
    }

    pub const fn level(&self) -> Level {
        self.level
    }
}

impl From<Level> for LoggingDirective {
    fn from(level: Level) -> Self {
        Self::new(level)
    }
}

/// What the interception point knows about one call.
#[derive(Clone, Copy)]
pub struct CallContext<'a> {
    pub owner: Owner,
    pub method: &'a str,
    /// Positional arguments in declaration order.
    pub args: &'a [&'a dyn Display],
}

impl<'a> CallContext<'a> {
    pub fn new(owner: Owner, method: &'a str, args: &'a [&'a dyn Display]) -> Self {
        Self {
            owner,
            method,
            args,
        }
    }
}

/// Outcome of a call that returned normally.
#[derive(Clone, Copy)]
pub enum ReturnValue<'a> {
    /// The call has no return value.
    Void,
    Value(&'a dyn Display),
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Entry,
    Return,
    Failure,
}

impl Phase {
    fn as_str(&self) -> &'static str {
        match self {
            Phase::Entry => "entry",
            Phase::Return => "return",
            Phase::Failure => "failure",
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Phase::Entry => "Entering",
            Phase::Return | Phase::Failure => "Exiting",
        }
    }
}

/// The cause logged for a failed call: the error's source if it has one,
/// otherwise the error itself.
pub fn failure_cause<'e>(error: &'e (dyn Error + 'static)) -> &'e (dyn Error + 'static) {
    error.source().unwrap_or(error)
}

/// Emits entry and exit records for wrapped calls.
///
/// Holds no per-call state; one instance is shared by every wrapped call.
#[derive(Debug)]
pub struct CallInterceptor {
    registry: Arc<LoggerRegistry>,
    formatter: ArgumentFormatter,
}

impl CallInterceptor {
    pub fn new(registry: Arc<LoggerRegistry>) -> Self {
        Self {
            registry,
            formatter: ArgumentFormatter::new(),
        }
    }

    pub fn from_config(registry: Arc<LoggerRegistry>, config: &InterceptorConfig) -> Self {
        Self::new(registry)
            .with_formatter(ArgumentFormatter::new().with_placeholder(config.placeholder.clone()))
    }

    pub fn with_formatter(mut self, formatter: ArgumentFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn registry(&self) -> &Arc<LoggerRegistry> {
        &self.registry
    }

    pub fn formatter(&self) -> &ArgumentFormatter {
        &self.formatter
    }

    /// Log `Entering method <method>[<args>]` before the call runs.
    pub fn on_entry(&self, ctx: &CallContext<'_>, directive: LoggingDirective) {
        self.observe(Phase::Entry, ctx, directive, |f| f.format(ctx.args));
    }

    /// Log `Exiting method <method>[<value>]`, or `[void]`, after a normal return.
    pub fn on_return(
        &self,
        ctx: &CallContext<'_>,
        directive: LoggingDirective,
        returned: ReturnValue<'_>,
    ) {
        self.observe(Phase::Return, ctx, directive, |f| match returned {
            ReturnValue::Void => VOID_TEXT.to_string(),
            ReturnValue::Value(value) => f.render(value),
        });
    }

    /// Log `Exiting method <method>[<cause>]` after the call failed.
    ///
    /// Only observes: the caller still owns `error` and returns it unchanged.
    pub fn on_failure(
        &self,
        ctx: &CallContext<'_>,
        directive: LoggingDirective,
        error: &(dyn Error + 'static),
    ) {
        self.observe(Phase::Failure, ctx, directive, |f| {
            f.render(&failure_cause(error))
        });
    }

    fn observe(
        &self,
        phase: Phase,
        ctx: &CallContext<'_>,
        directive: LoggingDirective,
        detail: impl FnOnce(&ArgumentFormatter) -> String,
    ) {
        let level = directive.level();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let logger = self.registry.get(ctx.owner);
            if !logger.is_enabled(level) {
                return;
            }

            let message = format!(
                "{} method {}[{}]",
                phase.verb(),
                ctx.method,
                detail(&self.formatter)
            );
            match logger.log(level, &message) {
                Ok(()) => metrics::record_emitted(phase.as_str(), level),
                Err(e) => {
                    metrics::record_emit_failure(phase.as_str());
                    tracing::warn!(
                        logger = logger.name(),
                        phase = phase.as_str(),
                        error = %e,
                        "Call log record dropped"
                    );
                }
            }
        }));

        if outcome.is_err() {
            metrics::record_hook_panic(phase.as_str());
        }
    }
}
