//! Funding field normalization.
//!
//! A package's `funding` field may be absent, a URL string, an object, or
//! an array mixing both. Everything is funnelled through [`normalize`] and
//! [`is_valid`] once, so the rest of the crate only ever sees
//! [`FundingEntry`] values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A normalized funding source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingEntry {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub url: String,
    /// Unrecognized fields, passed through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FundingEntry {
    /// Create an entry with just a URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            kind: None,
            url: url.into(),
            extra: Map::new(),
        }
    }

    /// Build an entry from a validated object.
    ///
    /// A non-string `type` is kept among the extras rather than dropped.
    fn from_object(mut obj: Map<String, Value>) -> Option<Self> {
        let url = match obj.remove("url") {
            Some(Value::String(url)) if !url.is_empty() => url,
            _ => return None,
        };
        let kind = match obj.remove("type") {
            Some(Value::String(kind)) => Some(kind),
            Some(other) => {
                obj.insert("type".to_string(), other);
                None
            }
            None => None,
        };
        Some(Self {
            kind,
            url,
            extra: obj,
        })
    }

    /// Set the funding type.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// One or several funding entries, serialized the way they were declared:
/// a bare object for one, an array for many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Funding {
    One(FundingEntry),
    Many(Vec<FundingEntry>),
}

impl Funding {
    /// Wrap validated entries. Returns `None` when there are none.
    #[must_use]
    pub fn from_entries(mut entries: Vec<FundingEntry>) -> Option<Self> {
        match entries.len() {
            0 => None,
            1 => entries.pop().map(Self::One),
            _ => Some(Self::Many(entries)),
        }
    }

    /// All entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[FundingEntry] {
        match self {
            Self::One(entry) => std::slice::from_ref(entry),
            Self::Many(entries) => entries,
        }
    }

    /// The first entry, used when a single URL has to represent a package.
    #[must_use]
    pub fn first(&self) -> Option<&FundingEntry> {
        self.entries().first()
    }
}

/// Normalize a raw funding declaration.
///
/// Strings become `{ "url": s }`, objects pass through untouched, arrays
/// are normalized element by element (order and duplicates kept). Nothing
/// is filtered here; see [`is_valid`].
#[must_use]
pub fn normalize(value: Option<&Value>) -> Option<Value> {
    value.map(normalize_value)
}

fn normalize_value(value: &Value) -> Value {
    match value {
        Value::String(url) => {
            let mut obj = Map::new();
            obj.insert("url".to_string(), Value::String(url.clone()));
            Value::Object(obj)
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize_value).collect()),
        other => other.clone(),
    }
}

/// True iff `entry` is an object with a non-empty string `url`.
#[must_use]
pub fn is_valid(entry: &Value) -> bool {
    entry
        .get("url")
        .and_then(Value::as_str)
        .is_some_and(|url| !url.is_empty())
        && entry.is_object()
}

/// Normalize, flatten and keep only valid entries.
///
/// Never fails: malformed input simply produces fewer entries.
#[must_use]
pub fn valid_entries(value: Option<&Value>) -> Vec<FundingEntry> {
    let Some(normalized) = normalize(value) else {
        return Vec::new();
    };

    let candidates = match normalized {
        Value::Array(items) => items,
        single => vec![single],
    };

    candidates
        .into_iter()
        .filter(is_valid)
        .filter_map(|entry| match entry {
            Value::Object(obj) => FundingEntry::from_object(obj),
            _ => None,
        })
        .collect()
}
