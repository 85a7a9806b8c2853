//! Type-safe chain identifier.
//!
//! [`ChainId`] is a newtype wrapper around an opaque string key (typically a
//! genesis hash or a well-known network slug) providing type safety so that
//! chain identifiers cannot be confused with other strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a blockchain network configuration.
///
/// Supplied externally (chains file, embedding application) and immutable
/// thereafter. Used as the dictionary key in the connection pool registries,
/// state-event discriminator, and subscription target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    /// Creates a `ChainId` from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChainId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ChainId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
