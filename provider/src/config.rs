//! Provider block configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! namespace: admin/platform
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use resource_schema_core::validate_no_leading_trailing_slashes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::FIELD_NAMESPACE;
use crate::error::Result;

/// Settings of the provider configuration block that schema hooks read.
///
/// # Examples
///
/// ```
/// use resource_schema_provider::ProviderConfig;
///
/// let config = ProviderConfig::from_yaml_str("version: \"1.0\"\nnamespace: admin\n").unwrap();
/// assert_eq!(config.namespace.as_deref(), Some("admin"));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Configuration format version (e.g., `"1.0"`).
    #[serde(default)]
    pub version: String,
    /// Parent namespace for every resource managed by this provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ProviderConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::ConfigError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::ConfigError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Checks the namespace with the same rule resources apply to their own
    /// `namespace` field.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidNamespace`](crate::ConfigError::InvalidNamespace) for
    /// a namespace with a leading or trailing `/`.
    pub fn validate(&self) -> Result<()> {
        if let Some(ns) = &self.namespace {
            validate_no_leading_trailing_slashes(&Value::String(ns.clone()), FIELD_NAMESPACE)?;
        }
        Ok(())
    }
}
