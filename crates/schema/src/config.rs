//! Schema configuration via `colkey.toml`
//!
//! The application stores are always available unless switched off. Extra
//! stores are declared as `[[column_family]]` tables in the same syntax the
//! built-in ones use. On first start a commented default file is written;
//! edit it and restart to change the schema.

use crate::descriptor::ColumnFamilyDef;
use crate::error::{Result, SchemaError};
use colkey_core::KeyLimits;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "colkey.toml";

/// Schema configuration loaded from `colkey.toml`
///
/// # Example
///
/// ```toml
/// include_application = true
///
/// [limits]
/// max_components = 16
///
/// [[column_family]]
/// name = "Device_Index"
/// comparator = "DynamicCompositeType(s=>UTF8Type,T=>TimeUUIDType(reversed=true))"
/// indexes = "owner,email:UTF8Type"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Register the fixed application stores
    #[serde(default = "default_include_application")]
    pub include_application: bool,
    /// Key size limits applied by every composite codec
    #[serde(default)]
    pub limits: KeyLimits,
    /// Additional store declarations
    #[serde(default, rename = "column_family", skip_serializing_if = "Vec::is_empty")]
    pub column_families: Vec<ColumnFamilyDef>,
}

fn default_include_application() -> bool {
    true
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            include_application: default_include_application(),
            limits: KeyLimits::default(),
            column_families: Vec::new(),
        }
    }
}

impl SchemaConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# colkey schema configuration
#
# Register the built-in application stores (default: true)
include_application = true

# Key size limits for composite column names.
[limits]
max_component_bytes = 65535
max_components = 64
max_key_bytes = 65535

# Extra stores use the same declaration syntax as the built-in ones.
# Bad comparators or index specs abort startup.
# [[column_family]]
# name = "Device_Index"
# comparator = "DynamicCompositeType(s=>UTF8Type,T=>TimeUUIDType(reversed=true))"
# validator = "BytesType"          # optional
# indexes = "owner,email:UTF8Type" # optional
# create = true                    # optional, default true
"#
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SchemaConfig = toml::from_str(content)
            .map_err(|e| SchemaError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            SchemaError::Config(msg) => {
                SchemaError::Config(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SchemaError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let l = &self.limits;
        if l.max_components == 0 || l.max_key_bytes == 0 {
            return Err(SchemaError::Config(
                "limits.max_components and limits.max_key_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
