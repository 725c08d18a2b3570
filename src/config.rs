//! Cache configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::file_reader::FileReadConfig;
use crate::core::model::DEFAULT_APPLICATION_ID;

pub const ENV_APPLICATION_ID: &str = "FORMCACHE_APPLICATION_ID";
pub const ENV_MAX_FILE_SIZE: &str = "FORMCACHE_MAX_FILE_SIZE";
pub const ENV_ENCODING: &str = "FORMCACHE_ENCODING";

/// Everything the loader needs besides the path resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormCacheConfig {
    /// Application whose directory holds the form templates
    pub application_id: String,

    /// Per-file read policy
    pub read: FileReadConfig,
}

impl Default for FormCacheConfig {
    fn default() -> Self {
        Self {
            application_id: DEFAULT_APPLICATION_ID.to_string(),
            read: FileReadConfig::default(),
        }
    }
}

impl FormCacheConfig {
    pub fn with_application_id(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = application_id.into();
        self
    }

    /// Application id used for resolution; blank ids fall back to the default
    pub fn effective_application_id(&self) -> &str {
        let id = self.application_id.trim();
        if id.is_empty() {
            DEFAULT_APPLICATION_ID
        } else {
            id
        }
    }

    /// Defaults overridden by `FORMCACHE_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(id) = std::env::var(ENV_APPLICATION_ID) {
            config.application_id = id;
        }
        if let Ok(size) = std::env::var(ENV_MAX_FILE_SIZE) {
            config.read.max_file_size = size
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {:?}", ENV_MAX_FILE_SIZE, size))?;
        }
        if let Ok(encoding) = std::env::var(ENV_ENCODING) {
            config.read.encoding_strategy = encoding
                .parse()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Invalid {}", ENV_ENCODING))?;
        }

        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file_reader::EncodingStrategy;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = FormCacheConfig::default();
        assert_eq!(config.application_id, DEFAULT_APPLICATION_ID);
        assert_eq!(config.read, FileReadConfig::default());
    }

    #[test]
    fn test_effective_application_id_fallback() {
        let config = FormCacheConfig::default().with_application_id("");
        assert_eq!(config.effective_application_id(), DEFAULT_APPLICATION_ID);

        let config = FormCacheConfig::default().with_application_id("   ");
        assert_eq!(config.effective_application_id(), DEFAULT_APPLICATION_ID);

        let config = FormCacheConfig::default().with_application_id("payroll");
        assert_eq!(config.effective_application_id(), "payroll");
    }

    #[test]
    fn test_from_json_file_partial() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("formcache.json");
        std::fs::write(
            &path,
            r#"{"application_id": "tax", "read": {"encoding_strategy": "strict"}}"#,
        )
        .unwrap();

        let config = FormCacheConfig::from_json_file(&path).unwrap();
        assert_eq!(config.application_id, "tax");
        assert_eq!(config.read.encoding_strategy, EncodingStrategy::Strict);
        assert_eq!(
            config.read.max_file_size,
            FileReadConfig::default().max_file_size
        );
    }

    #[test]
    fn test_from_json_file_invalid() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("formcache.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FormCacheConfig::from_json_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
