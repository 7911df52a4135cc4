use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::level::Level;

/// A single structured key/value pair attached to a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Attr { key: key.into(), value: value.into() }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Attr { key: key.into(), value: Value::String(value.into()) }
    }

    /// Attach an error by its display text.
    pub fn error(key: impl Into<String>, err: &dyn std::error::Error) -> Self {
        Attr::string(key, err.to_string())
    }
}

/// Normalized log record passed through a [`Handler`](crate::handler::Handler) chain.
///
/// Handlers receive the record by value; whatever the last handler in the
/// chain does with it is final.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    pub attrs: Vec<Attr>,
}

impl LogRecord {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        LogRecord {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            attrs: Vec::new(),
        }
    }

    pub fn add_attrs(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        self.attrs.extend(attrs);
    }

    /// Insert `attrs` ahead of the attributes already on the record.
    pub fn prepend_attrs(&mut self, attrs: Vec<Attr>) {
        if attrs.is_empty() {
            return;
        }
        let existing = std::mem::replace(&mut self.attrs, attrs);
        self.attrs.extend(existing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepend_keeps_both_orders() {
        let mut record = LogRecord::new(Level::Info, "hello");
        record.add_attrs([Attr::new("a", 1), Attr::new("b", 2)]);
        record.prepend_attrs(vec![Attr::new("x", "1"), Attr::new("y", "2")]);

        let keys: Vec<&str> = record.attrs.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, ["x", "y", "a", "b"]);
    }

    #[test]
    fn error_attr_uses_display_text() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let attr = Attr::error("error", &err);
        assert_eq!(attr.value, Value::String("disk on fire".into()));
    }
}
