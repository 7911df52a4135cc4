use std::io::Write;
use std::sync::Arc;

use serde_json::Value;

use crate::context::LogContext;
use crate::handler::{Handler, HandlerError};
use crate::level::Level;
use crate::record::{Attr, LogRecord};
use crate::scope::{rename_builtin, Fields, Scope, SharedWriter};

/// Options shared by the built-in backends.
///
/// **Fields**
/// - `level`: minimum severity that is emitted; anything below is
///   reported as disabled.
#[derive(Debug, Clone, Copy)]
pub struct HandlerOptions {
    pub level: Level,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self { level: Level::Info }
    }
}

/// Backend that writes each record as one JSON object per line.
///
/// The object starts with `timestamp` (RFC 3339), `level` and `message`,
/// followed by the handler's static attributes and then the record's own
/// attributes, in insertion order. Repeated attribute keys are all written.
/// A top-level attribute named like a built-in field is written as
/// `fields.<key>` so it cannot shadow it.
#[derive(Clone)]
pub struct JsonHandler {
    writer: SharedWriter,
    options: HandlerOptions,
    scope: Scope,
}

impl JsonHandler {
    pub fn new(writer: impl Write + Send + 'static, options: HandlerOptions) -> Self {
        JsonHandler {
            writer: SharedWriter::new(writer),
            options,
            scope: Scope::default(),
        }
    }

    /// JSON lines on the process's standard output.
    pub fn stdout(options: HandlerOptions) -> Self {
        JsonHandler::new(std::io::stdout(), options)
    }

    fn render(&self, record: LogRecord) -> Result<Vec<u8>, HandlerError> {
        let mut line = Fields::default();
        line.push("timestamp", Value::String(record.timestamp.to_rfc3339()));
        line.push("level", Value::String(record.level.to_string()));
        line.push("message", Value::String(record.message));
        for (key, node) in self.scope.nest(record.attrs).0 {
            line.0.push((rename_builtin(key), node));
        }

        Ok(serde_json::to_vec(&line)?)
    }
}

impl Handler for JsonHandler {
    fn enabled(&self, _ctx: &LogContext, level: Level) -> bool {
        level >= self.options.level
    }

    fn handle(&self, _ctx: &LogContext, record: LogRecord) -> Result<(), HandlerError> {
        let line = self.render(record)?;
        self.writer.write_line(&line)?;
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(JsonHandler {
            writer: self.writer.clone(),
            options: self.options,
            scope: self.scope.with_attrs(attrs),
        })
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        let scope = self.scope.with_group(name).unwrap_or_else(|| self.scope.clone());
        Arc::new(JsonHandler {
            writer: self.writer.clone(),
            options: self.options,
            scope,
        })
    }
}
