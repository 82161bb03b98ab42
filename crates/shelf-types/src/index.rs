use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Location of one stored record: a collection name and a key within it.
///
/// Two indexes are equal iff both the collection and the key are equal.
/// An `Index` is immutable once built; both parts are always present.
///
/// Indexes are serde-serializable and have a compact byte form
/// ([`to_bytes`](Index::to_bytes)) so that secondary views built on top of the
/// store can use them as keys.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Index {
    collection: String,
    key: String,
}

impl Index {
    /// Create an index from a collection name and a key.
    pub fn new(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            key: key.into(),
        }
    }

    /// The collection this index points into.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The key within the collection.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Consume the index, returning `(collection, key)`.
    pub fn into_parts(self) -> (String, String) {
        (self.collection, self.key)
    }

    /// Encode into the compact bincode byte form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TypeError> {
        bincode::serialize(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Decode from bytes produced by [`to_bytes`](Index::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TypeError> {
        bincode::deserialize(bytes).map_err(|e| TypeError::MalformedIndex(e.to_string()))
    }
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Index({}:{})", self.collection, self.key)
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.collection, self.key)
    }
}

impl<C: Into<String>, K: Into<String>> From<(C, K)> for Index {
    fn from((collection, key): (C, K)) -> Self {
        Self::new(collection, key)
    }
}
