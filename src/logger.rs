use std::fmt;
use std::io::Write;
use std::sync::Arc;

use crate::config::{LoggerConfig, Profile};
use crate::context::LogContext;
use crate::enrich::ContextHandler;
use crate::handler::{Handler, HandlerError};
use crate::json::{HandlerOptions, JsonHandler};
use crate::level::Level;
use crate::record::{Attr, LogRecord};

/// Front end for emitting structured records through one handler chain.
///
/// A `Logger` is cheap to clone; clones share the same chain. The chain is
/// fixed at construction and never changes afterwards.
///
/// Every emission method returns the handler's result, so sink failures
/// reach the caller instead of being swallowed.
#[derive(Clone)]
pub struct Logger {
    handler: Arc<dyn Handler>,
}

impl Logger {
    /// Build a logger from an explicit configuration.
    pub fn new(config: LoggerConfig) -> Self {
        match config {
            LoggerConfig::Environment(profile) => {
                Logger::enriched(JsonHandler::stdout(HandlerOptions { level: profile.threshold() }))
            }
            LoggerConfig::Handler(handler) => Logger::from_handler(handler),
        }
    }

    /// Use `handler` as the whole chain, without enrichment.
    pub fn from_handler(handler: Arc<dyn Handler>) -> Self {
        Logger { handler }
    }

    /// The default chain (JSON lines at the profile's threshold, enriched
    /// with request identifiers) over an arbitrary writer.
    pub fn for_profile(profile: Profile, writer: impl Write + Send + 'static) -> Self {
        Logger::enriched(JsonHandler::new(writer, HandlerOptions { level: profile.threshold() }))
    }

    fn enriched(json: JsonHandler) -> Self {
        Logger::from_handler(Arc::new(ContextHandler::new(Arc::new(json))))
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.handler.enabled(&LogContext::background(), level)
    }

    /// Emit one record at `level` within `ctx`.
    ///
    /// Nothing is built when the level is disabled.
    pub fn log(
        &self,
        ctx: &LogContext,
        level: Level,
        message: &str,
        attrs: impl IntoIterator<Item = Attr>,
    ) -> Result<(), HandlerError> {
        if !self.handler.enabled(ctx, level) {
            return Ok(());
        }
        let mut record = LogRecord::new(level, message);
        record.add_attrs(attrs);
        self.handler.handle(ctx, record)
    }

    pub fn debug(&self, message: &str, attrs: impl IntoIterator<Item = Attr>) -> Result<(), HandlerError> {
        self.log(&LogContext::background(), Level::Debug, message, attrs)
    }

    pub fn info(&self, message: &str, attrs: impl IntoIterator<Item = Attr>) -> Result<(), HandlerError> {
        self.log(&LogContext::background(), Level::Info, message, attrs)
    }

    pub fn warn(&self, message: &str, attrs: impl IntoIterator<Item = Attr>) -> Result<(), HandlerError> {
        self.log(&LogContext::background(), Level::Warn, message, attrs)
    }

    pub fn error(&self, message: &str, attrs: impl IntoIterator<Item = Attr>) -> Result<(), HandlerError> {
        self.log(&LogContext::background(), Level::Error, message, attrs)
    }

    pub fn debug_ctx(
        &self,
        ctx: &LogContext,
        message: &str,
        attrs: impl IntoIterator<Item = Attr>,
    ) -> Result<(), HandlerError> {
        self.log(ctx, Level::Debug, message, attrs)
    }

    pub fn info_ctx(
        &self,
        ctx: &LogContext,
        message: &str,
        attrs: impl IntoIterator<Item = Attr>,
    ) -> Result<(), HandlerError> {
        self.log(ctx, Level::Info, message, attrs)
    }

    pub fn warn_ctx(
        &self,
        ctx: &LogContext,
        message: &str,
        attrs: impl IntoIterator<Item = Attr>,
    ) -> Result<(), HandlerError> {
        self.log(ctx, Level::Warn, message, attrs)
    }

    pub fn error_ctx(
        &self,
        ctx: &LogContext,
        message: &str,
        attrs: impl IntoIterator<Item = Attr>,
    ) -> Result<(), HandlerError> {
        self.log(ctx, Level::Error, message, attrs)
    }

    /// A logger whose records all carry `attrs`.
    pub fn with(&self, attrs: impl IntoIterator<Item = Attr>) -> Logger {
        Logger::from_handler(self.handler.with_attrs(attrs.into_iter().collect()))
    }

    /// A logger that nests later attributes under `name`.
    pub fn with_group(&self, name: &str) -> Logger {
        Logger::from_handler(self.handler.with_group(name))
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}
