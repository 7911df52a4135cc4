use std::sync::Arc;

use crate::context::LogContext;
use crate::handler::{Handler, HandlerError};
use crate::level::Level;
use crate::record::{Attr, LogRecord};

/// Handler decorator that attaches request identifiers from the call's
/// [`LogContext`] to every record before passing it on.
///
/// For each [`ContextKey`](crate::context::ContextKey) present in the
/// context, an attribute named after the key is added. The injected
/// attributes always come first, in `ContextKey::ALL` order, followed by
/// whatever the call site supplied. Missing keys are skipped; there is no
/// error case of its own, the wrapped handler's result is returned as-is.
///
/// Handlers derived via [`Handler::with_attrs`] and [`Handler::with_group`]
/// are wrapped again, so enrichment survives scoping.
#[derive(Clone)]
pub struct ContextHandler {
    inner: Arc<dyn Handler>,
}

impl ContextHandler {
    pub fn new(inner: Arc<dyn Handler>) -> Self {
        ContextHandler { inner }
    }

    pub fn inner(&self) -> &Arc<dyn Handler> {
        &self.inner
    }
}

impl Handler for ContextHandler {
    fn enabled(&self, ctx: &LogContext, level: Level) -> bool {
        self.inner.enabled(ctx, level)
    }

    fn handle(&self, ctx: &LogContext, mut record: LogRecord) -> Result<(), HandlerError> {
        let injected: Vec<Attr> = ctx
            .fields()
            .iter()
            .map(|(key, value)| Attr::string(key.as_str(), value))
            .collect();
        record.prepend_attrs(injected);

        self.inner.handle(ctx, record)
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(ContextHandler::new(self.inner.with_attrs(attrs)))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(ContextHandler::new(self.inner.with_group(name)))
    }
}
