//! In-memory form store

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use indexmap::IndexMap;

use super::traits::{FormStore, StoredId};

/// Keeps saved forms in a map for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    forms: IndexMap<StoredId, String>,
    saves: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of stored forms, oldest first
    pub fn ids(&self) -> Vec<StoredId> {
        self.forms.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

#[async_trait]
impl FormStore for MemoryStore {
    async fn save(&mut self, serialized: String) -> Result<StoredId> {
        self.saves += 1;
        let id = StoredId(format!("form_{}", self.saves));
        self.forms.insert(id.clone(), serialized);
        Ok(id)
    }

    async fn load(&mut self, id: &StoredId) -> Result<String> {
        self.forms
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("No stored form with id {}", id))
    }
}
