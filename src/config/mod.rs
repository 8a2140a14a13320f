// Configuration management for reelpipe
// Handles loading/saving settings, with sensible defaults when config is missing

use crate::media::DEFAULT_EXTENSIONS;
use crate::storage::{Location, PermissionGrant, StaticPermissionStore};
use anyhow::Result;
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub library: LibraryConfig,
    pub gestures: GestureConfig,
    pub audio: AudioConfig,
    pub permissions: PermissionsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub seek_forward_ms: i64,
    pub seek_backward_ms: i64,
    pub fling_distance_threshold: f32,
    pub fling_velocity_threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub bit_perfect: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionsConfig {
    /// Folder grants for the desktop permission store (location strings)
    pub granted_trees: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Daily-rolling log files go here when set
    pub directory: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            seek_forward_ms: 15_000,
            seek_backward_ms: 10_000,
            fling_distance_threshold: 100.0,
            fling_velocity_threshold: 100.0,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { bit_perfect: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,reelpipe=debug".to_string(),
            directory: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;

        Ok(())
    }

    /// Grants from `permissions.granted_trees`; unparseable entries are logged and skipped
    pub fn permission_store(&self) -> StaticPermissionStore {
        let grants = self
            .permissions
            .granted_trees
            .iter()
            .filter_map(|raw| match Location::parse(raw) {
                Ok(location) => Some(PermissionGrant::readable(location)),
                Err(e) => {
                    warn!("Ignoring configured grant '{}': {}", raw, e);
                    None
                }
            })
            .collect();
        StaticPermissionStore::new(grants)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("reelpipe");

        Ok(config_dir.join("config.toml"))
    }
}
