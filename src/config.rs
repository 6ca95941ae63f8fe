//! Configuration
//!
//! A small JSON file holds the API key and saved connection profiles.
//! Environment variables (optionally from `.env`) override the file.

use crate::error::{Result, SnapError};
use crate::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_CONFIG_FILE: &str = "snapbase_config.json";

fn default_port() -> u16 {
    3306
}

/// Saved MySQL connection details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbProfile {
    pub name: String,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl DbProfile {
    /// Stored password, or `SNAPBASE_DB_PASSWORD` when the profile has none.
    pub fn resolved_password(&self) -> Option<String> {
        self.password
            .clone()
            .or_else(|| std::env::var("SNAPBASE_DB_PASSWORD").ok())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub db_profiles: Vec<DbProfile>,
}

impl SnapConfig {
    /// Load from `path`; a missing file gives the default config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)
            .map_err(|e| SnapError::Config(format!("Invalid config {:?}: {}", path, e)))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Environment key first (`SNAPBASE_API_KEY`, then `NVIDIA_API_KEY`), then the stored one.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var("SNAPBASE_API_KEY")
            .or_else(|_| std::env::var("NVIDIA_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }

    pub fn profile(&self, name: &str) -> Option<&DbProfile> {
        self.db_profiles.iter().find(|p| p.name == name)
    }

    /// Insert, or replace the profile with the same name.
    pub fn upsert_profile(&mut self, profile: DbProfile) {
        match self.db_profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => *existing = profile,
            None => self.db_profiles.push(profile),
        }
    }
}

/// Config file location: explicit path, then `SNAPBASE_CONFIG`, then the default name.
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var("SNAPBASE_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Model endpoint settings, from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
}

impl LlmSettings {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("SNAPBASE_LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("SNAPBASE_LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        }
    }
}
