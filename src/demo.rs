//! Instrumented sample type driven by the demo binary.

use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future::{self, Ready};
use thiserror::Error;
use tower::{Layer, Service, ServiceExt};

use call_log::interceptor::CallLogging;
use call_log::{nullable, CallInterceptor, CallLoggingLayer, LoggingDirective};

#[derive(Debug, Error)]
#[error("bad state: {0}")]
pub struct BadState(pub String);

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("risky call failed")]
    Risky(#[source] BadState),
    #[error("square of {0} overflows")]
    Overflow(u64),
}

/// Squares its request, failing on overflow.
#[derive(Debug, Clone, Copy)]
pub struct SquareService;

impl Service<u64> for SquareService {
    type Response = u64;
    type Error = DemoError;
    type Future = Ready<Result<u64, DemoError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, x: u64) -> Self::Future {
        future::ready(x.checked_mul(x).ok_or(DemoError::Overflow(x)))
    }
}

/// A type whose methods are wrapped by the interceptor.
#[derive(Clone)]
pub struct Calculator {
    interceptor: Arc<CallInterceptor>,
    square: CallLogging<SquareService>,
}

impl Calculator {
    pub fn new(interceptor: Arc<CallInterceptor>) -> Self {
        let square = CallLoggingLayer::new(interceptor.clone(), "square", LoggingDirective::debug())
            .layer(SquareService);

        Self {
            interceptor,
            square,
        }
    }

    pub fn bar(&self, greeting: &str, count: i32) {
        self.interceptor
            .invocation(self, "bar", LoggingDirective::info())
            .args(&[&greeting, &count])
            .void(|| {
                tracing::trace!(greeting, count, "bar body");
            })
    }

    pub fn compute(&self, x: i64) -> i64 {
        self.interceptor
            .invocation(self, "compute", LoggingDirective::debug())
            .args(&[&x])
            .returning(|| x * x)
    }

    pub fn describe(&self, label: Option<String>) -> usize {
        self.interceptor
            .invocation(self, "describe", LoggingDirective::info())
            .args(&[&nullable(&label)])
            .returning(|| label.as_deref().map_or(0, str::len))
    }

    pub fn risky(&self, fail: bool) -> Result<u32, DemoError> {
        self.interceptor
            .invocation(self, "risky", LoggingDirective::warn())
            .args(&[&fail])
            .fallible(|| {
                if fail {
                    Err(DemoError::Risky(BadState("invariant broken".into())))
                } else {
                    Ok(7)
                }
            })
    }

    pub async fn square(&self, x: u64) -> Result<u64, DemoError> {
        self.square.clone().oneshot(x).await
    }

    /// One round of calls from a worker.
    pub async fn exercise(&self, worker: usize, round: u64) {
        self.bar("hello", worker as i32);
        let squared = self.compute(round as i64);
        let described = self.describe((round % 2 == 0).then(|| format!("round-{round}")));

        if let Err(e) = self.risky(round % 3 == 2) {
            tracing::debug!(worker, round, error = %e, "risky call failed as planned");
        }

        let big = if round % 4 == 3 { u64::MAX } else { round };
        match self.square(big).await {
            Ok(value) => tracing::debug!(worker, round, squared, described, value, "round complete"),
            Err(e) => tracing::debug!(worker, round, error = %e, "square rejected"),
        }
    }
}
