//! Per-type logger cache.
//!
//! # Responsibilities
//! - Resolve the owning type of an intercepted call to a logger handle
//! - Create handles lazily, on first use, keyed by the type's name
//! - Hand out the same handle for every later lookup of that type
//!
//! # Design Decisions
//! - Keyed by `TypeId`; the backend only ever sees `type_name`
//! - `DashMap` entry API makes the miss path atomic per key, so concurrent
//!   first use converges on a single handle
//! - Entries are never evicted: the map grows with the number of instrumented
//!   types, not with call volume
//! - Owned and shared by `Arc`, not a process global

use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use crate::backend::{LogBackend, LoggerHandle};
use crate::observability::metrics;

/// Identity of the type that owns an intercepted method.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Owner {
    id: TypeId,
    name: &'static str,
}

impl Owner {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Owner of `target`'s concrete type.
    ///
    /// Trait objects are rejected at compile time; callers holding a
    /// `&dyn Trait` pass the implementor's `self` or use [`Owner::of`].
    pub fn of_val<T: 'static>(_target: &T) -> Self {
        Self::of::<T>()
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name; used as the logger name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Owner").field(&self.name).finish()
    }
}

/// Cache of one logger handle per owning type.
pub struct LoggerRegistry {
    backend: Box<dyn LogBackend>,
    loggers: DashMap<TypeId, LoggerHandle>,
}

impl LoggerRegistry {
    pub fn new(backend: impl LogBackend) -> Self {
        Self {
            backend: Box::new(backend),
            loggers: DashMap::new(),
        }
    }

    /// Logger for `owner`, created on first use.
    pub fn get(&self, owner: Owner) -> LoggerHandle {
        if let Some(handle) = self.loggers.get(&owner.id()).map(|e| Arc::clone(e.value())) {
            return handle;
        }

        let handle = self
            .loggers
            .entry(owner.id())
            .or_insert_with(|| {
                tracing::debug!(owner = owner.name(), "Creating call logger");
                metrics::record_logger_created();
                self.backend.logger(owner.name())
            })
            .value()
            .clone();
        handle
    }

    pub fn get_for<T: ?Sized + 'static>(&self) -> LoggerHandle {
        self.get(Owner::of::<T>())
    }

    /// Number of cached handles.
    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }
}

impl fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("loggers", &self.loggers.len())
            .finish_non_exhaustive()
    }
}
