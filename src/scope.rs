use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::record::Attr;

/// Writer shared by a handler and every handler derived from it.
///
/// One line is written per lock acquisition, so records from concurrent
/// callers never interleave.
#[derive(Clone)]
pub(crate) struct SharedWriter {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl SharedWriter {
    pub(crate) fn new(writer: impl Write + Send + 'static) -> Self {
        SharedWriter { inner: Arc::new(Mutex::new(Box::new(writer))) }
    }

    pub(crate) fn write_line(&self, line: &[u8]) -> io::Result<()> {
        // A panic in another writer leaves the sink usable, keep going.
        let mut guard = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.write_all(line)?;
        guard.write_all(b"\n")?;
        guard.flush()
    }
}

/// Static attributes and open groups accumulated via `with_attrs` / `with_group`.
///
/// Each static attribute remembers how many groups were open when it was
/// added; per-record attributes always land in the innermost group.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scope {
    groups: Vec<String>,
    attrs: Vec<(usize, Attr)>,
}

impl Scope {
    pub(crate) fn with_attrs(&self, attrs: Vec<Attr>) -> Scope {
        let mut scope = self.clone();
        let depth = scope.groups.len();
        scope.attrs.extend(attrs.into_iter().map(|attr| (depth, attr)));
        scope
    }

    /// `None` when `name` is empty: an unnamed group is no group.
    pub(crate) fn with_group(&self, name: &str) -> Option<Scope> {
        if name.is_empty() {
            return None;
        }
        let mut scope = self.clone();
        scope.groups.push(name.to_string());
        Some(scope)
    }

    /// Build the nested attribute pairs for one record.
    ///
    /// Keys are kept in order and never merged, so repeated keys are all
    /// emitted. Groups that end up with no attributes are left out entirely.
    pub(crate) fn nest(&self, record_attrs: Vec<Attr>) -> Fields {
        let innermost = self.groups.len();
        let mut record_attrs = Some(record_attrs);
        let mut child: Option<Fields> = None;

        for depth in (0..=innermost).rev() {
            let mut fields = Fields::default();
            for (_, attr) in self.attrs.iter().filter(|(d, _)| *d == depth) {
                fields.push(attr.key.clone(), attr.value.clone());
            }
            if depth == innermost {
                for attr in record_attrs.take().unwrap_or_default() {
                    fields.push(attr.key, attr.value);
                }
            }
            if let Some(nested) = child.take() {
                if !nested.is_empty() {
                    fields.0.push((self.groups[depth].clone(), Node::Group(nested)));
                }
            }
            child = Some(fields);
        }

        child.unwrap_or_default()
    }

    /// Flatten static and record attributes into dotted keys, in order.
    pub(crate) fn flatten(&self, record_attrs: Vec<Attr>) -> Vec<(String, Value)> {
        let prefix = |depth: usize| -> String {
            self.groups[..depth].iter().map(|g| format!("{}.", g)).collect()
        };

        let mut out: Vec<(String, Value)> = self
            .attrs
            .iter()
            .map(|(depth, attr)| (format!("{}{}", prefix(*depth), attr.key), attr.value.clone()))
            .collect();

        let record_prefix = prefix(self.groups.len());
        out.extend(
            record_attrs
                .into_iter()
                .map(|attr| (format!("{}{}", record_prefix, attr.key), attr.value)),
        );
        out
    }
}

/// Keys every rendered line carries on its own.
pub(crate) const BUILTIN_KEYS: [&str; 3] = ["timestamp", "level", "message"];

/// Move a top-level attribute key out of the way of a built-in field.
pub(crate) fn rename_builtin(key: String) -> String {
    if BUILTIN_KEYS.contains(&key.as_str()) {
        format!("fields.{}", key)
    } else {
        key
    }
}

/// Ordered key/value pairs serialized as one JSON object.
///
/// Unlike `serde_json::Map`, a repeated key does not replace the earlier
/// entry; both are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Fields(pub(crate) Vec<(String, Node)>);

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Value(Value),
    Group(Fields),
}

impl Fields {
    pub(crate) fn push(&mut self, key: impl Into<String>, value: Value) {
        self.0.push((key.into(), Node::Value(value)));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, node) in &self.0 {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Value(value) => value.serialize(serializer),
            Node::Group(fields) => fields.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nest_places_attrs_at_their_depth() {
        let scope = Scope::default()
            .with_attrs(vec![Attr::new("service", "api")])
            .with_group("http")
            .unwrap()
            .with_attrs(vec![Attr::new("method", "GET")]);

        let nested = scope.nest(vec![Attr::new("status", 200)]);
        assert_eq!(
            serde_json::to_value(&nested).unwrap(),
            json!({ "service": "api", "http": { "method": "GET", "status": 200 } })
        );
    }

    #[test]
    fn empty_groups_are_dropped() {
        let scope = Scope::default().with_group("outer").unwrap().with_group("inner").unwrap();
        assert!(scope.nest(Vec::new()).is_empty());
        assert!(Scope::default().with_group("").is_none());
    }

    #[test]
    fn repeated_keys_are_all_written() {
        let scope = Scope::default().with_attrs(vec![Attr::new("user_id", "static")]);
        let nested = scope.nest(vec![
            Attr::new("user_id", "u1"),
            Attr::new("user_id", "call-site"),
        ]);

        assert_eq!(
            serde_json::to_string(&nested).unwrap(),
            r#"{"user_id":"static","user_id":"u1","user_id":"call-site"}"#
        );
    }

    #[test]
    fn only_builtin_keys_are_renamed() {
        assert_eq!(rename_builtin("message".to_string()), "fields.message");
        assert_eq!(rename_builtin("level".to_string()), "fields.level");
        assert_eq!(rename_builtin("user_id".to_string()), "user_id");
    }

    #[test]
    fn flatten_prefixes_group_path() {
        let scope = Scope::default()
            .with_group("req")
            .unwrap()
            .with_attrs(vec![Attr::new("path", "/")]);

        let keys: Vec<String> = scope
            .flatten(vec![Attr::new("status", 404)])
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, ["req.path", "req.status"]);
    }
}
