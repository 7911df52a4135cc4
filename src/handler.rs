use std::error::Error;
use std::sync::Arc;

use crate::context::LogContext;
use crate::level::Level;
use crate::record::{Attr, LogRecord};

/// Destination for [`LogRecord`]s produced by a [`Logger`](crate::logger::Logger).
///
/// Implementations either emit records to a concrete sink (JSON lines on
/// stdout, key/value text, a test buffer) or decorate another handler, as
/// [`ContextHandler`](crate::enrich::ContextHandler) does. Since decorators
/// are handlers too, chains of any depth compose.
///
/// Handlers are shared across threads behind an `Arc` and must not rely on
/// being called from a single thread.
pub trait Handler: Send + Sync {
    /// Report whether a record at `level` would be emitted.
    ///
    /// The logger calls this before building a record, so a disabled level
    /// costs one call and nothing else.
    fn enabled(&self, ctx: &LogContext, level: Level) -> bool;

    /// Emit a single record.
    ///
    /// **Parameters**
    /// - `ctx`: request context of the call site; may be empty.
    /// - `record`: the fully populated record, owned by the handler from here on.
    ///
    /// **Returns**
    /// - `Ok(())` if the record was written.
    /// - `Err(..)` if the sink failed. Callers get the error back unchanged;
    ///   there is no retry.
    fn handle(&self, ctx: &LogContext, record: LogRecord) -> Result<(), HandlerError>;

    /// Derive a handler whose records all carry `attrs`.
    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler>;

    /// Derive a handler that nests every later attribute under `name`.
    fn with_group(&self, name: &str) -> Arc<dyn Handler>;
}

/// Error type returned from [`Handler::handle`].
#[derive(thiserror::Error, Debug)]
pub enum HandlerError {
    #[error("failed to write log record: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize log record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("log backend error: {0}")]
    Backend(Box<dyn Error + Send + Sync>),
}

impl HandlerError {
    pub fn backend(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        HandlerError::Backend(err.into())
    }
}

/// A handler that accepts every record and drops it.
///
/// Useful for measuring the overhead of the logging path itself without
/// any I/O, and for tests that only care about the logger's plumbing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

impl Handler for NoopHandler {
    fn enabled(&self, _ctx: &LogContext, _level: Level) -> bool {
        true
    }

    fn handle(&self, _ctx: &LogContext, _record: LogRecord) -> Result<(), HandlerError> {
        Ok(())
    }

    fn with_attrs(&self, _attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(NoopHandler)
    }

    fn with_group(&self, _name: &str) -> Arc<dyn Handler> {
        Arc::new(NoopHandler)
    }
}
