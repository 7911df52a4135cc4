use std::fmt::Write as _;
use std::io::Write;
use std::sync::Arc;

use serde_json::Value;

use crate::context::LogContext;
use crate::handler::{Handler, HandlerError};
use crate::json::HandlerOptions;
use crate::level::Level;
use crate::record::{Attr, LogRecord};
use crate::scope::{rename_builtin, Scope, SharedWriter};

/// Backend that writes `key=value` lines, e.g.
///
/// `timestamp=2024-05-01T10:00:00+00:00 level=INFO message="user logged in" user_id=u1`
///
/// Attributes inside a group are written with a dotted prefix (`http.status=200`).
/// Strings containing whitespace, quotes or `=` are quoted. Top-level
/// attributes named like a built-in field are written as `fields.<key>`.
#[derive(Clone)]
pub struct TextHandler {
    writer: SharedWriter,
    options: HandlerOptions,
    scope: Scope,
}

impl TextHandler {
    pub fn new(writer: impl Write + Send + 'static, options: HandlerOptions) -> Self {
        TextHandler {
            writer: SharedWriter::new(writer),
            options,
            scope: Scope::default(),
        }
    }

    fn render(&self, record: LogRecord) -> String {
        let mut line = String::new();
        let _ = write!(
            line,
            "timestamp={} level={} message={}",
            record.timestamp.to_rfc3339(),
            record.level,
            quote(&record.message)
        );
        for (key, value) in self.scope.flatten(record.attrs) {
            let _ = write!(line, " {}={}", rename_builtin(key), format_value(&value));
        }
        line
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => quote(s),
        other => quote(&other.to_string()),
    }
}

fn quote(s: &str) -> String {
    let needs_quotes = s.is_empty()
        || s.chars().any(|c| c.is_whitespace() || c == '"' || c == '=' || c.is_control());
    if needs_quotes {
        // Debug formatting gives a double-quoted, escaped string.
        format!("{:?}", s)
    } else {
        s.to_string()
    }
}

impl Handler for TextHandler {
    fn enabled(&self, _ctx: &LogContext, level: Level) -> bool {
        level >= self.options.level
    }

    fn handle(&self, _ctx: &LogContext, record: LogRecord) -> Result<(), HandlerError> {
        let line = self.render(record);
        self.writer.write_line(line.as_bytes())?;
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(TextHandler {
            writer: self.writer.clone(),
            options: self.options,
            scope: self.scope.with_attrs(attrs),
        })
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        let scope = self.scope.with_group(name).unwrap_or_else(|| self.scope.clone());
        Arc::new(TextHandler {
            writer: self.writer.clone(),
            options: self.options,
            scope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::tests::Buffer;

    #[test]
    fn renders_key_value_pairs() {
        let buf = Buffer::default();
        let handler = TextHandler::new(buf.clone(), HandlerOptions { level: Level::Debug });

        let mut record = LogRecord::new(Level::Error, "payment failed");
        record.add_attrs([Attr::new("order", "o-1"), Attr::new("retry", true)]);
        handler
            .with_group("billing")
            .handle(&LogContext::background(), record)
            .unwrap();

        let line = &buf.lines()[0];
        assert!(line.starts_with("timestamp="));
        assert!(line.contains(" level=ERROR message=\"payment failed\" "));
        assert!(line.ends_with("billing.order=o-1 billing.retry=true"));
    }

    #[test]
    fn attrs_cannot_shadow_builtin_fields() {
        let buf = Buffer::default();
        let handler = TextHandler::new(buf.clone(), HandlerOptions::default());

        let mut record = LogRecord::new(Level::Info, "real");
        record.add_attrs([Attr::new("level", "x")]);
        handler.handle(&LogContext::background(), record).unwrap();

        let line = &buf.lines()[0];
        assert!(line.contains(" level=INFO message=real "));
        assert!(line.ends_with(" fields.level=x"));
    }

    #[test]
    fn quotes_only_when_needed() {
        assert_eq!(quote("plain"), "plain");
        assert_eq!(quote("two words"), "\"two words\"");
        assert_eq!(quote("a=b"), "\"a=b\"");
        assert_eq!(quote(""), "\"\"");
    }
}
