//! Trait abstraction for form persistence to enable mocking in tests

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identifier a store hands out for a saved form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredId(pub String);

impl StoredId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoredId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StoredId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Storage backend for serialized form documents.
///
/// Retry policy, if any, belongs to the implementation; callers surface
/// errors as they are.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormStore: Send + Sync {
    /// Store a serialized form and return its id
    async fn save(&mut self, serialized: String) -> Result<StoredId>;

    /// Fetch a previously saved form
    async fn load(&mut self, id: &StoredId) -> Result<String>;
}
