//! Relation fields and identifier extraction.
//!
//! Source records link to each other in several shapes: bare ids, API
//! paths (`/api/people/<id>`), full URLs, or embedded objects carrying an
//! `id`. Every shape is decoded into a [`Relation`] once, at load time, and
//! resolved to a plain identifier under an [`IdPolicy`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("Invalid UUID regex")
});

/// How a relation string without a UUID is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    /// Only UUID-shaped substrings count, for strings and embedded ids
    /// alike; anything else is dropped.
    Strict,
    /// Strings and embedded ids without a UUID are taken verbatim.
    Lenient,
}

/// A reference to another record, as it appears in source data.
#[derive(Debug, Clone, PartialEq)]
pub enum Relation {
    /// A bare id, an API path or a full URL
    Ref(String),
    /// An embedded record
    Inline { id: Option<String> },
    /// Anything else (numbers, booleans, null)
    Other,
}

impl Relation {
    /// Resolve the relation to an identifier.
    ///
    /// A `Strict` result is always a bare UUID, so resolving it again as a
    /// `Ref` yields the same id.
    pub fn resolve(&self, policy: IdPolicy) -> Option<String> {
        match self {
            Relation::Ref(s) | Relation::Inline { id: Some(s) } => resolve_str(s, policy),
            Relation::Inline { id: None } | Relation::Other => None,
        }
    }
}

fn resolve_str(s: &str, policy: IdPolicy) -> Option<String> {
    if s.is_empty() {
        return None;
    }

    match extract_uuid(s) {
        Some(uuid) => Some(uuid.to_string()),
        None if policy == IdPolicy::Lenient => Some(s.to_string()),
        None => None,
    }
}

impl From<Value> for Relation {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Relation::Ref(s),
            Value::Object(map) => Relation::Inline {
                id: map.get("id").and_then(Value::as_str).map(str::to_string),
            },
            _ => Relation::Other,
        }
    }
}

impl<'de> Deserialize<'de> for Relation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Relation::from)
    }
}

/// Find the first UUID-shaped substring (8-4-4-4-12 hex groups).
pub fn extract_uuid(s: &str) -> Option<&str> {
    UUID_RE.find(s).map(|m| m.as_str())
}

/// Resolve a list of relations, dropping the ones that do not resolve.
pub fn resolve_all(relations: &[Relation], policy: IdPolicy) -> Vec<String> {
    relations
        .iter()
        .filter_map(|r| r.resolve(policy))
        .collect()
}

/// Deserialize a relation list, treating any non-array value as empty.
pub(crate) fn list<'de, D>(deserializer: D) -> Result<Vec<Relation>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(Relation::from).collect(),
        _ => Vec::new(),
    })
}
