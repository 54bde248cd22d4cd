//! Tower middleware that logs every call to a wrapped service.
//!
//! # Responsibilities
//! - Log entry with the request as the single argument
//! - Log exit with the response, or the failure cause, once the response
//!   future resolves
//! - Hand the inner service's result back unchanged
//!
//! # Design Decisions
//! - The owner defaults to the inner service type; closures built with
//!   `service_fn` have unreadable type names, so the owner can be overridden
//! - Readiness is delegated untouched; only `call` is observed

use std::error::Error;
use std::fmt::Display;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::interceptor::hooks::{CallContext, CallInterceptor, LoggingDirective, ReturnValue};
use crate::registry::Owner;

/// Layer producing [`CallLogging`] services.
#[derive(Debug, Clone)]
pub struct CallLoggingLayer {
    interceptor: Arc<CallInterceptor>,
    method: &'static str,
    directive: LoggingDirective,
    owner: Option<Owner>,
}

impl CallLoggingLayer {
    pub fn new(
        interceptor: Arc<CallInterceptor>,
        method: &'static str,
        directive: LoggingDirective,
    ) -> Self {
        Self {
            interceptor,
            method,
            directive,
            owner: None,
        }
    }

    /// Attribute calls to `T` instead of the inner service type.
    pub fn owner<T: ?Sized + 'static>(mut self) -> Self {
        self.owner = Some(Owner::of::<T>());
        self
    }
}

impl<S: 'static> Layer<S> for CallLoggingLayer {
    type Service = CallLogging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CallLogging {
            inner,
            interceptor: self.interceptor.clone(),
            owner: self.owner.unwrap_or_else(Owner::of::<S>),
            method: self.method,
            directive: self.directive,
        }
    }
}

/// Service wrapper that logs entry and exit of every call.
#[derive(Debug, Clone)]
pub struct CallLogging<S> {
    inner: S,
    interceptor: Arc<CallInterceptor>,
    owner: Owner,
    method: &'static str,
    directive: LoggingDirective,
}

impl<S> CallLogging<S> {
    pub fn owner(&self) -> Owner {
        self.owner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, Req> Service<Req> for CallLogging<S>
where
    S: Service<Req>,
    S::Future: Send + 'static,
    S::Response: Display + 'static,
    S::Error: Error + 'static,
    Req: Display,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<S::Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let args: [&dyn Display; 1] = [&req];
        self.interceptor
            .on_entry(&CallContext::new(self.owner, self.method, &args), self.directive);

        let response = self.inner.call(req);
        let interceptor = self.interceptor.clone();
        let (owner, method, directive) = (self.owner, self.method, self.directive);

        Box::pin(async move {
            let result = response.await;
            let ctx = CallContext::new(owner, method, &[]);
            match &result {
                Ok(value) => interceptor.on_return(&ctx, directive, ReturnValue::Value(value)),
                Err(e) => interceptor.on_failure(&ctx, directive, e),
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::registry::LoggerRegistry;
    use std::fmt;
    use tower::{service_fn, ServiceExt};

    struct Squarer;

    #[derive(Debug)]
    struct Overflow;

    impl fmt::Display for Overflow {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("overflow")
        }
    }

    impl Error for Overflow {}

    fn setup() -> (MemoryBackend, Arc<CallInterceptor>) {
        let backend = MemoryBackend::new();
        let registry = Arc::new(LoggerRegistry::new(backend.clone()));
        (backend, Arc::new(CallInterceptor::new(registry)))
    }

    #[tokio::test]
    async fn test_layer_logs_request_and_response() {
        let (backend, interceptor) = setup();
        let svc = CallLoggingLayer::new(interceptor, "square", LoggingDirective::info())
            .owner::<Squarer>()
            .layer(service_fn(|x: u32| async move { x.checked_mul(x).ok_or(Overflow) }));

        let out = svc.oneshot(4).await.unwrap();

        assert_eq!(out, 16);
        let records = backend.records();
        assert_eq!(records[0].message, "Entering method square[4]");
        assert_eq!(records[1].message, "Exiting method square[16]");
        assert_eq!(records[1].logger, Owner::of::<Squarer>().name());
    }

    #[tokio::test]
    async fn test_layer_passes_error_through() {
        let (backend, interceptor) = setup();
        let svc = CallLoggingLayer::new(interceptor, "square", LoggingDirective::error())
            .layer(service_fn(|x: u32| async move { x.checked_mul(x).ok_or(Overflow) }));

        let err = svc.oneshot(u32::MAX).await.unwrap_err();

        assert_eq!(err.to_string(), "overflow");
        assert_eq!(
            backend.messages()[1],
            "Exiting method square[overflow]".to_string()
        );
    }

    #[test]
    fn test_default_owner_is_inner_service() {
        let (_backend, interceptor) = setup();
        let svc = CallLoggingLayer::new(interceptor, "noop", LoggingDirective::info())
            .layer(service_fn(|x: u8| async move { Ok::<u8, Overflow>(x) }));
        assert!(svc.owner().name().contains("ServiceFn"));
    }

    #[tokio::test]
    async fn test_into_inner_bypasses_logging() {
        let (backend, interceptor) = setup();
        let svc = CallLoggingLayer::new(interceptor, "square", LoggingDirective::info())
            .layer(service_fn(|x: u32| async move { x.checked_mul(x).ok_or(Overflow) }));

        let out = svc.into_inner().oneshot(3).await.unwrap();

        assert_eq!(out, 9);
        assert!(backend.records().is_empty());
    }
}
