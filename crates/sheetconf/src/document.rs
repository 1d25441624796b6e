//! Row identifiers and the documents handed to the format encoders

use std::fmt;

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// One row of output: canonical key to typed value, in column order
pub type RowObject = serde_json::Map<String, Value>;

/// Identifier of a data row (the value of its first column)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowKey {
    /// Integer identifier
    Int(i64),
    /// Any other identifier, kept as text
    Text(String),
}

impl RowKey {
    /// Get the key as an integer, if it is one
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RowKey::Int(n) => Some(*n),
            RowKey::Text(_) => None,
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Int(n) => write!(f, "{}", n),
            RowKey::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowKey {
    fn from(n: i64) -> Self {
        RowKey::Int(n)
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        RowKey::Text(s.to_string())
    }
}

impl From<String> for RowKey {
    fn from(s: String) -> Self {
        RowKey::Text(s)
    }
}

/// An ordered mapping from row identifier to value
///
/// Both generated sheets (id to row object) and manifests (sheet name to
/// `true`) are documents. Entries keep insertion order, so encoders write
/// rows in sheet order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: IndexMap<RowKey, Value>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry unless the key is already present
    ///
    /// Returns `false` (and leaves the document unchanged) on a duplicate key.
    pub fn insert_new(&mut self, key: RowKey, value: Value) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Insert or replace an entry
    pub fn insert(&mut self, key: RowKey, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }

    pub fn get(&self, key: &RowKey) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &RowKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&RowKey, &Value)> {
        self.entries.iter()
    }
}

impl FromIterator<(RowKey, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (RowKey, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Serializes as a map keyed by the identifiers' text form
impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(&key.to_string(), value)?;
        }
        map.end()
    }
}
