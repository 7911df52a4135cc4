use std::fmt;
use std::sync::Arc;

/// The closed set of request identifiers the enrichment handler knows about.
///
/// Being a dedicated type, a `ContextKey` can never be confused with an
/// arbitrary string key written by unrelated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKey {
    RequestId,
    CorrelationId,
    UserId,
    AccountId,
    OrgId,
}

impl ContextKey {
    /// All keys, in the order they are attached to a record.
    pub const ALL: [ContextKey; 5] = [
        ContextKey::RequestId,
        ContextKey::CorrelationId,
        ContextKey::UserId,
        ContextKey::AccountId,
        ContextKey::OrgId,
    ];

    /// Attribute name used when the value is attached to a record.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKey::RequestId => "request_id",
            ContextKey::CorrelationId => "correlation_id",
            ContextKey::UserId => "user_id",
            ContextKey::AccountId => "account_id",
            ContextKey::OrgId => "org_id",
        }
    }

    pub fn from_name(name: &str) -> Option<ContextKey> {
        ContextKey::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request-scoped identifiers, one typed slot per [`ContextKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFields {
    pub request_id: Option<String>,
    pub correlation_id: Option<String>,
    pub user_id: Option<String>,
    pub account_id: Option<String>,
    pub org_id: Option<String>,
}

impl RequestFields {
    pub fn get(&self, key: ContextKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    pub fn set(&mut self, key: ContextKey, value: impl Into<String>) {
        *self.slot_mut(key) = Some(value.into());
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    pub fn org_id(&self) -> Option<&str> {
        self.org_id.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        ContextKey::ALL.iter().all(|key| self.slot(*key).is_none())
    }

    /// Fill every slot that is empty here but set in `other`.
    pub fn merge_missing(&mut self, other: &RequestFields) {
        for key in ContextKey::ALL {
            if self.slot(key).is_none() {
                if let Some(value) = other.get(key) {
                    self.set(key, value);
                }
            }
        }
    }

    /// Present values in [`ContextKey::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (ContextKey, &str)> + '_ {
        ContextKey::ALL
            .into_iter()
            .filter_map(move |key| self.get(key).map(|value| (key, value)))
    }

    fn slot(&self, key: ContextKey) -> &Option<String> {
        match key {
            ContextKey::RequestId => &self.request_id,
            ContextKey::CorrelationId => &self.correlation_id,
            ContextKey::UserId => &self.user_id,
            ContextKey::AccountId => &self.account_id,
            ContextKey::OrgId => &self.org_id,
        }
    }

    fn slot_mut(&mut self, key: ContextKey) -> &mut Option<String> {
        match key {
            ContextKey::RequestId => &mut self.request_id,
            ContextKey::CorrelationId => &mut self.correlation_id,
            ContextKey::UserId => &mut self.user_id,
            ContextKey::AccountId => &mut self.account_id,
            ContextKey::OrgId => &mut self.org_id,
        }
    }
}

/// Immutable carrier of request-scoped identifiers for one logical operation.
///
/// Deriving a context with [`LogContext::with`] returns a new value and
/// leaves the parent untouched, so a context can be handed to concurrent
/// tasks freely. Cloning is an `Arc` bump.
#[derive(Debug, Clone, Default)]
pub struct LogContext {
    fields: Arc<RequestFields>,
}

impl LogContext {
    /// The empty context: no identifiers present.
    pub fn background() -> Self {
        LogContext::default()
    }

    pub fn from_fields(fields: RequestFields) -> Self {
        LogContext { fields: Arc::new(fields) }
    }

    pub fn with(&self, key: ContextKey, value: impl Into<String>) -> Self {
        let mut fields = (*self.fields).clone();
        fields.set(key, value);
        LogContext::from_fields(fields)
    }

    pub fn with_request_id(&self, value: impl Into<String>) -> Self {
        self.with(ContextKey::RequestId, value)
    }

    pub fn with_correlation_id(&self, value: impl Into<String>) -> Self {
        self.with(ContextKey::CorrelationId, value)
    }

    pub fn with_user_id(&self, value: impl Into<String>) -> Self {
        self.with(ContextKey::UserId, value)
    }

    pub fn with_account_id(&self, value: impl Into<String>) -> Self {
        self.with(ContextKey::AccountId, value)
    }

    pub fn with_org_id(&self, value: impl Into<String>) -> Self {
        self.with(ContextKey::OrgId, value)
    }

    /// Look up one identifier. `None` simply means "not set".
    pub fn lookup(&self, key: ContextKey) -> Option<&str> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &RequestFields {
        &self.fields
    }
}

impl From<RequestFields> for LogContext {
    fn from(fields: RequestFields) -> Self {
        LogContext::from_fields(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names_are_stable() {
        let names: Vec<&str> = ContextKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, ["request_id", "correlation_id", "user_id", "account_id", "org_id"]);
        assert_eq!(ContextKey::from_name("org_id"), Some(ContextKey::OrgId));
        assert_eq!(ContextKey::from_name("tenant_id"), None);
    }

    #[test]
    fn deriving_leaves_parent_untouched() {
        let parent = LogContext::background().with_request_id("r1");
        let child = parent.with_user_id("u1").with_request_id("r2");

        assert_eq!(parent.lookup(ContextKey::RequestId), Some("r1"));
        assert_eq!(parent.lookup(ContextKey::UserId), None);
        assert_eq!(child.lookup(ContextKey::RequestId), Some("r2"));
        assert_eq!(child.lookup(ContextKey::UserId), Some("u1"));
    }

    #[test]
    fn iter_follows_key_order() {
        let ctx = LogContext::background()
            .with_org_id("o1")
            .with_correlation_id("abc")
            .with_user_id("u1");

        let present: Vec<(ContextKey, &str)> = ctx.fields().iter().collect();
        assert_eq!(
            present,
            [
                (ContextKey::CorrelationId, "abc"),
                (ContextKey::UserId, "u1"),
                (ContextKey::OrgId, "o1"),
            ]
        );
    }

    #[test]
    fn merge_missing_does_not_overwrite() {
        let mut inner = RequestFields::default();
        inner.set(ContextKey::UserId, "inner");
        let mut outer = RequestFields::default();
        outer.set(ContextKey::UserId, "outer");
        outer.set(ContextKey::AccountId, "acct");

        inner.merge_missing(&outer);
        assert_eq!(inner.user_id(), Some("inner"));
        assert_eq!(inner.account_id(), Some("acct"));
        assert!(RequestFields::default().is_empty());
    }
}
