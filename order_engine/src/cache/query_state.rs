use std::{borrow::Cow, fmt::Display};

/// The logical name a query result is cached under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Cow<'static, str>);

/// The key of the order list query.
pub const ORDERS_QUERY_KEY: QueryKey = QueryKey::from_static("orders");

impl QueryKey {
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for QueryKey {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The outcome of the most recent fetch for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState {
    /// Nothing has been fetched for this key yet.
    Pending,
    /// The last fetch succeeded.
    Success,
    /// The last fetch failed with the given message. Any previously fetched value is still cached.
    Failed(String),
}

impl QueryState {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}
