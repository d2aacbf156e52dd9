//! Configuration handling for the form builder

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::builder::BuilderContext;
use crate::registry::FieldTypeRegistry;
use crate::state::{IdGenerator, SequentialIds, UuidIds};

/// Environment variable overriding the store directory
pub const STORE_DIR_ENV: &str = "FORM_LAYOUT_STORE_DIR";

/// Host used in preview urls when none is configured
pub const DEFAULT_PREVIEW_HOST: &str = "localhost:3000";

/// User configuration for the form builder
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuilderConfig {
    /// Directory saved forms are written to
    pub store_dir: Option<PathBuf>,
    /// `uuid` (default) or `sequential`
    pub id_strategy: Option<String>,
    /// Host shown in form preview urls
    pub preview_host: Option<String>,
}

impl BuilderConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "form-layout", "form-layout")
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: BuilderConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Where saved forms live: env override, then config, then the platform data dir
    pub fn store_path(&self) -> PathBuf {
        if let Some(dir) = env::var_os(STORE_DIR_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        if let Some(dir) = &self.store_dir {
            return dir.clone();
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join("forms"))
            .unwrap_or_else(|| PathBuf::from("forms"))
    }

    pub fn preview_host(&self) -> &str {
        self.preview_host.as_deref().unwrap_or(DEFAULT_PREVIEW_HOST)
    }

    /// Id generator selected by `id_strategy`
    pub fn id_generator(&self) -> Box<dyn IdGenerator> {
        match self.id_strategy.as_deref() {
            Some("sequential") => Box::new(SequentialIds::new()),
            _ => Box::new(UuidIds),
        }
    }

    /// Session context with the built-in field kinds
    pub fn context(&self) -> BuilderContext {
        BuilderContext::new(Arc::new(FieldTypeRegistry::builtin()), self.id_generator())
    }
}
