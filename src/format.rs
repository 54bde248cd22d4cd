//! Rendering of argument lists and single values for call log messages.
//!
//! # Responsibilities
//! - Join positional arguments with `", "`, no brackets, no trailing separator
//! - Render single values (return values, failure causes) on their own path
//! - Never fail: a value whose `Display` impl errors or panics is replaced by
//!   a placeholder
//!
//! # Absent values
//! Rust has no null. Optional arguments go through [`Nullable`] (see
//! [`nullable`]), which renders `None` as the literal text `null`.

use std::borrow::Cow;
use std::fmt::{self, Display, Write};
use std::panic::{self, AssertUnwindSafe};

use crate::observability::metrics;

/// Separator between rendered arguments.
pub const ARG_SEPARATOR: &str = ", ";

/// Text rendered for an absent value.
pub const NULL_TEXT: &str = "null";

/// Default replacement for a value that cannot be rendered.
pub const DEFAULT_PLACEHOLDER: &str = "<unrenderable>";

/// Display adapter for optional values: `None` renders as `null`.
#[derive(Debug, Clone, Copy)]
pub struct Nullable<'a, T: ?Sized>(pub Option<&'a T>);

/// Wrap an `Option` so it can be passed as a call argument.
pub fn nullable<T>(value: &Option<T>) -> Nullable<'_, T> {
    Nullable(value.as_ref())
}

impl<T: Display + ?Sized> Display for Nullable<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str(NULL_TEXT),
        }
    }
}

/// Renders call arguments and single values.
#[derive(Debug, Clone)]
pub struct ArgumentFormatter {
    placeholder: Cow<'static, str>,
}

impl ArgumentFormatter {
    pub fn new() -> Self {
        Self {
            placeholder: Cow::Borrowed(DEFAULT_PLACEHOLDER),
        }
    }

    /// Use `placeholder` for values that fail to render.
    pub fn with_placeholder(mut self, placeholder: impl Into<Cow<'static, str>>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Join `args` as `a, b, c`. An empty list renders as the empty string.
    pub fn format(&self, args: &[&dyn Display]) -> String {
        let mut buf = String::new();
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                buf.push_str(ARG_SEPARATOR);
            }
            self.render_into(&mut buf, *arg);
        }
        buf
    }

    /// Render one value with its own `Display` form.
    ///
    /// Return values and failure causes go through here, never through
    /// [`format`](Self::format).
    pub fn render(&self, value: &dyn Display) -> String {
        let mut buf = String::new();
        self.render_into(&mut buf, value);
        buf
    }

    fn render_into(&self, buf: &mut String, value: &dyn Display) {
        let start = buf.len();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| write!(buf, "{value}")));
        if !matches!(outcome, Ok(Ok(()))) {
            buf.truncate(start);
            buf.push_str(&self.placeholder);
            metrics::record_render_failure();
        }
    }
}

impl Default for ArgumentFormatter {
    fn default() -> Self {
        Self::new()
    }
}
