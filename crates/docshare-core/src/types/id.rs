//! Server-assigned identifiers.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a document.
pub type DocumentId = EntityId;

/// Identifier of a user account.
pub type UserId = EntityId;

/// Opaque, server-assigned identifier of a document or user account.
///
/// The backend may emit identifiers as JSON numbers or strings; both are
/// accepted and kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Creates a new identifier from its textual form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self::from(n),
            RawId::Text(s) => Self(s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_textual_ids() {
        let numeric: EntityId = serde_json::from_str("17").unwrap();
        let textual: EntityId = serde_json::from_str("\"doc-17\"").unwrap();

        assert_eq!(numeric.as_str(), "17");
        assert_eq!(textual.to_string(), "doc-17");
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "\"17\"");
    }
}
