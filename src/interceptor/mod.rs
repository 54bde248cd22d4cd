//! Call interception subsystem.
//!
//! # Data Flow
//! ```text
//! caller
//!     → invocation.rs / layer.rs (explicit wrapping, chosen at composition time)
//!     → hooks.rs on_entry            "Entering method m[args]"
//!     → wrapped call
//!     → hooks.rs on_return           "Exiting method m[value]" / "Exiting method m[void]"
//!        or on_failure               "Exiting method m[cause]"
//!     → original result handed back unchanged
//! ```
//!
//! # Design Decisions
//! - No annotation scanning: call sites opt in by wrapping the call
//! - Void vs value-returning calls are distinct wrapper methods, not a runtime check
//! - Hooks never panic into the caller and never alter the wrapped result
//! - A panic in the wrapped call is not a failure; it unwinds with no exit record

pub mod hooks;
pub mod invocation;
pub mod layer;

pub use hooks::{CallContext, CallInterceptor, LoggingDirective, ReturnValue, VOID_TEXT};
pub use invocation::Invocation;
pub use layer::{CallLogging, CallLoggingLayer};
