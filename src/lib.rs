//! Method-call logging interceptor.
//!
//! Wrapped calls log `Entering method <name>[<args>]` before they run and
//! `Exiting method <name>[<result>]` after, at a severity chosen where the call
//! is wrapped. Writing the records is left to a [`backend::LogBackend`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use call_log::{CallInterceptor, Level, LoggerRegistry, LoggingDirective, MemoryBackend};
//!
//! struct Foo;
//!
//! let backend = MemoryBackend::new();
//! let interceptor = CallInterceptor::new(Arc::new(LoggerRegistry::new(backend.clone())));
//!
//! let foo = Foo;
//! interceptor
//!     .invocation(&foo, "bar", LoggingDirective::new(Level::Info))
//!     .args(&[&"hello", &123])
//!     .void(|| {});
//!
//! assert_eq!(backend.messages()[1], "Exiting method bar[void]");
//! ```

pub mod backend;
pub mod config;
pub mod format;
pub mod interceptor;
pub mod level;
pub mod observability;
pub mod registry;

pub use backend::{LogBackend, Logger, LoggerHandle, MemoryBackend, TracingBackend};
pub use config::CallLogConfig;
pub use format::{nullable, ArgumentFormatter, Nullable};
pub use interceptor::{CallInterceptor, CallLoggingLayer, Invocation, LoggingDirective, ReturnValue};
pub use level::Level;
pub use registry::{LoggerRegistry, Owner};
