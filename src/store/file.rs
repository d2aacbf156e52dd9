//! Directory-backed form store: one JSON file per saved form

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use super::traits::{FormStore, StoredId};

const EXTENSION: &str = "json";

/// Saves each form as `<dir>/<id>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &StoredId) -> Result<PathBuf> {
        let valid = !id.as_str().is_empty()
            && id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(anyhow!("Invalid form id: {}", id));
        }
        Ok(self.dir.join(format!("{}.{EXTENSION}", id.as_str())))
    }

    /// Ids of stored forms, sorted
    pub async fn ids(&self) -> Result<Vec<StoredId>> {
        let mut ids = Vec::new();
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ids),
            Err(e) => return Err(e).context("Failed to read form directory"),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(StoredId(stem.to_string()));
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl FormStore for FileStore {
    async fn save(&mut self, serialized: String) -> Result<StoredId> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let id = StoredId(Uuid::new_v4().simple().to_string());
        let path = self.path_for(&id)?;
        fs::write(&path, serialized)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Wrote form {} to {}", id, path.display());
        Ok(id)
    }

    async fn load(&mut self, id: &StoredId) -> Result<String> {
        let path = self.path_for(id)?;
        fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}
