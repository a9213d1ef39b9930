//! Per-model configuration.
//!
//! [`ModelConfig`] enumerates the options a model understands and keeps an
//! open `extra` map for application-specific settings. It is YAML
//! serializable so models can be configured from a file.
//!
//! # Example YAML
//!
//! ```yaml
//! table: tags
//! primary_key: id
//! parent_column: parent_id
//! error_family: TagsError
//! max_rows: 500
//! license: ACME-1234
//! modules:
//!   - tagging
//! extra:
//!   page_size: 20
//! ```

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or saving a [`ModelConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn default_primary_key() -> String {
    "id".to_string()
}

/// Typed configuration of a model.
///
/// Every field is optional in YAML.
///
/// # Examples
///
/// ```
/// use table_model_core::ModelConfig;
///
/// let config: ModelConfig = serde_yaml::from_str("table: tags\nmax_rows: 10\n").unwrap();
/// assert_eq!(config.table.as_deref(), Some("tags"));
/// assert_eq!(config.primary_key, "id");
/// assert_eq!(config.max_rows, Some(10));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Table to bind on construction.
    pub table: Option<String>,
    /// Primary-key column.
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    /// Parent column enabling tree mode.
    pub parent_column: Option<String>,
    /// Overrides the model's default error family.
    pub error_family: Option<String>,
    /// Row quota checked by `Model::enforce_configured_quota` and CSV import.
    pub max_rows: Option<u64>,
    /// License string, stored for callers.
    pub license: Option<String>,
    /// Enabled application modules, stored for callers.
    pub modules: Option<Vec<String>>,
    /// Open settings added through `Model::add_config`.
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            table: None,
            primary_key: default_primary_key(),
            parent_column: None,
            error_family: None,
            max_rows: None,
            license: None,
            modules: None,
            extra: BTreeMap::new(),
        }
    }
}

impl ModelConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be written, or
    /// [`ConfigError::Yaml`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Reads an `extra` setting.
    pub fn get_extra(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
table: tags
primary_key: tag_id
parent_column: parent_id
error_family: TagsError
max_rows: 500
license: ACME-1234
modules:
  - tagging
  - search
extra:
  page_size: 20
  label: Tags
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: ModelConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.table.as_deref(), Some("tags"));
        assert_eq!(config.primary_key, "tag_id");
        assert_eq!(config.parent_column.as_deref(), Some("parent_id"));
        assert_eq!(config.error_family.as_deref(), Some("TagsError"));
        assert_eq!(config.max_rows, Some(500));
        assert_eq!(config.license.as_deref(), Some("ACME-1234"));
        assert_eq!(
            config.modules,
            Some(vec!["tagging".to_string(), "search".to_string()])
        );
        assert_eq!(config.get_extra("page_size"), Some(&serde_json::json!(20)));
        assert_eq!(config.get_extra("label"), Some(&serde_json::json!("Tags")));
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: ModelConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, ModelConfig::default());
        assert_eq!(config.primary_key, "id");
        assert!(config.extra.is_empty());
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.yml");

        let original: ModelConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        original.save(&path).unwrap();

        let loaded = ModelConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelConfig::load(dir.path().join("missing.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
