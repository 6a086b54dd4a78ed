//! Application Configuration
//!
//! Settings for the KeepAlive tool itself:
//! - Where to find `adb`
//! - Where configuration documents come from
//! - Which package is inspected on the device
//! - How long a single device query may take

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, Result};
use crate::loader::{BundledSource, DirectorySource, DocumentSource};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration version for migrations
    pub version: u32,
    /// Path to Android SDK (adb lives in platform-tools)
    pub sdk_path: Option<PathBuf>,
    /// Directory overriding the bundled configuration documents
    pub assets_dir: Option<PathBuf>,
    /// Package whose capabilities are inspected
    pub package_name: Option<String>,
    /// Upper bound for one device query, in milliseconds
    pub query_timeout_ms: u64,
    /// Default log filter
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            sdk_path: None,
            assets_dir: None,
            package_name: None,
            query_timeout_ms: 5000,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "keepalive", "KeepAlive")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the configuration file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load configuration from the default location, creating it if missing
    pub async fn load() -> Result<Self> {
        let config_file = Self::config_file()
            .ok_or_else(|| ConfigError::AppConfig("Cannot determine config path".into()))?;
        Self::load_from(&config_file).await
    }

    /// Load configuration from a specific file, creating it if missing
    pub async fn load_from(config_file: &Path) -> Result<Self> {
        if config_file.exists() {
            debug!("Loading config from {:?}", config_file);
            let contents = tokio::fs::read_to_string(config_file).await?;
            let config: AppConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            info!("Config file not found, using defaults");
            let config = AppConfig::default();
            config.save_to(config_file).await?;
            Ok(config)
        }
    }

    /// Save configuration to a specific file
    pub async fn save_to(&self, config_file: &Path) -> Result<()> {
        if let Some(parent) = config_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = toml::to_string_pretty(self)?;
        tokio::fs::write(config_file, contents).await?;

        debug!("Config saved to {:?}", config_file);
        Ok(())
    }

    /// Per-query timeout
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// Android SDK path, with environment fallback
    pub fn get_sdk_path(&self) -> Option<PathBuf> {
        self.sdk_path.clone().or_else(|| {
            ["ANDROID_HOME", "ANDROID_SDK_ROOT"]
                .iter()
                .filter_map(|var| std::env::var_os(var))
                .map(PathBuf::from)
                .find(|p| p.exists())
        })
    }

    /// Document source selected by this configuration
    pub fn document_source(&self) -> Box<dyn DocumentSource> {
        match &self.assets_dir {
            Some(dir) => Box::new(DirectorySource::new(dir)),
            None => Box::new(BundledSource),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.query_timeout(), Duration::from_secs(5));
        assert!(config.assets_dir.is_none());
        assert!(config.document_source().fetch("default.json").unwrap().is_some());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = toml::from_str("package_name = \"com.example.app\"").unwrap();
        assert_eq!(config.package_name.as_deref(), Some("com.example.app"));
        assert_eq!(config.query_timeout_ms, 5000);
    }

    #[tokio::test]
    async fn test_load_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let created = AppConfig::load_from(&path).await.unwrap();
        assert!(path.exists());

        let reloaded = AppConfig::load_from(&path).await.unwrap();
        assert_eq!(reloaded.log_level, created.log_level);
    }
}
