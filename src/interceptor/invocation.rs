//! Explicit wrapping of individual calls.
//!
//! An [`Invocation`] is built at the call site with the owning target, the
//! method name and the directive, optionally given the arguments, and then
//! consumed by the terminal method that matches the call's shape.

use std::error::Error;
use std::fmt::Display;
use std::future::Future;

use crate::interceptor::hooks::{CallContext, CallInterceptor, LoggingDirective, ReturnValue};
use crate::registry::Owner;

/// One wrapped call, ready to run.
#[must_use = "an invocation logs nothing until a terminal method runs it"]
pub struct Invocation<'a> {
    interceptor: &'a CallInterceptor,
    owner: Owner,
    method: &'a str,
    directive: LoggingDirective,
    args: &'a [&'a dyn Display],
}

impl CallInterceptor {
    /// Start wrapping a call to `method` on `target`.
    ///
    /// The logger is chosen by `target`'s concrete type. Call this from the
    /// implementing type's method so the owner is the implementor, not a
    /// trait object.
    pub fn invocation<'a, T: 'static>(
        &'a self,
        target: &T,
        method: &'a str,
        directive: LoggingDirective,
    ) -> Invocation<'a> {
        self.invocation_for(Owner::of_val(target), method, directive)
    }

    /// Start wrapping a call attributed to an explicit owner.
    pub fn invocation_for<'a>(
        &'a self,
        owner: Owner,
        method: &'a str,
        directive: LoggingDirective,
    ) -> Invocation<'a> {
        Invocation {
            interceptor: self,
            owner,
            method,
            directive,
            args: &[],
        }
    }
}

impl<'a> Invocation<'a> {
    /// Positional arguments, in declaration order.
    pub fn args(mut self, args: &'a [&'a dyn Display]) -> Self {
        self.args = args;
        self
    }

    fn context(&self) -> CallContext<'a> {
        CallContext::new(self.owner, self.method, self.args)
    }

    /// Run a call that returns a value.
    pub fn returning<R: Display>(self, call: impl FnOnce() -> R) -> R {
        let ctx = self.context();
        self.interceptor.on_entry(&ctx, self.directive);
        let value = call();
        self.interceptor
            .on_return(&ctx, self.directive, ReturnValue::Value(&value));
        value
    }

    /// Run a call that returns nothing.
    pub fn void(self, call: impl FnOnce()) {
        let ctx = self.context();
        self.interceptor.on_entry(&ctx, self.directive);
        call();
        self.interceptor.on_return(&ctx, self.directive, ReturnValue::Void);
    }

    /// Run a call that may fail. The result is returned untouched.
    pub fn fallible<T, E>(self, call: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        T: Display,
        E: Error + 'static,
    {
        let ctx = self.context();
        self.interceptor.on_entry(&ctx, self.directive);
        let result = call();
        match &result {
            Ok(value) => self
                .interceptor
                .on_return(&ctx, self.directive, ReturnValue::Value(value)),
            Err(e) => self.interceptor.on_failure(&ctx, self.directive, e),
        }
        result
    }

    /// Run a call that may fail and has no value on success.
    pub fn fallible_void<E>(self, call: impl FnOnce() -> Result<(), E>) -> Result<(), E>
    where
        E: Error + 'static,
    {
        let ctx = self.context();
        self.interceptor.on_entry(&ctx, self.directive);
        let result = call();
        match &result {
            Ok(()) => self.interceptor.on_return(&ctx, self.directive, ReturnValue::Void),
            Err(e) => self.interceptor.on_failure(&ctx, self.directive, e),
        }
        result
    }

    /// Wrap a future that resolves to a value.
    ///
    /// The entry record is written here, when the future is built, not when
    /// it is first polled. A future dropped without being polled leaves an
    /// `Entering` record for a body that never ran. The arguments are not
    /// kept across the await.
    pub fn returning_async<F>(self, call: F) -> impl Future<Output = F::Output> + 'a
    where
        F: Future + 'a,
        F::Output: Display,
    {
        let Invocation {
            interceptor,
            owner,
            method,
            directive,
            args,
        } = self;
        interceptor.on_entry(&CallContext::new(owner, method, args), directive);

        async move {
            let value = call.await;
            let ctx = CallContext::new(owner, method, &[]);
            interceptor.on_return(&ctx, directive, ReturnValue::Value(&value));
            value
        }
    }

    /// Wrap a future that may fail. The result is returned untouched.
    ///
    /// As with [`Invocation::returning_async`], the entry record is written
    /// when the future is built, so an unpolled, dropped future still logs
    /// its entry.
    pub fn fallible_async<F, T, E>(self, call: F) -> impl Future<Output = Result<T, E>> + 'a
    where
        F: Future<Output = Result<T, E>> + 'a,
        T: Display,
        E: Error + 'static,
    {
        let Invocation {
            interceptor,
            owner,
            method,
            directive,
            args,
        } = self;
        interceptor.on_entry(&CallContext::new(owner, method, args), directive);

        async move {
            let result = call.await;
            let ctx = CallContext::new(owner, method, &[]);
            match &result {
                Ok(value) => interceptor.on_return(&ctx, directive, ReturnValue::Value(value)),
                Err(e) => interceptor.on_failure(&ctx, directive, e),
            }
            result
        }
    }
}
