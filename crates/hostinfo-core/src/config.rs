//! Configuration types for hostinfo.

use hostinfo_audit::AuditConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{HostinfoError, Result};

/// Config file read when none is named explicitly.
pub const DEFAULT_CONFIG_PATH: &str = "./hostinfo.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostinfoConfig {
    /// Key catalog location.
    pub catalog: CatalogConfig,

    /// Attribute store location.
    pub store: StoreConfig,

    /// Audit pass selection.
    pub audit: AuditConfig,

    /// CSV import behaviour.
    pub import: ImportConfig,

    /// Logging.
    pub log: LogConfig,
}

impl HostinfoConfig {
    /// Reads a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`HostinfoError::ConfigIo`] if the file cannot be read and
    /// [`HostinfoError::ConfigParse`] if it is not valid TOML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| HostinfoError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML config text.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Reads `path` if given; otherwise reads [`DEFAULT_CONFIG_PATH`] if it
    /// exists, falling back to defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Key catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog file, TOML or JSON.
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./hostinfo-keys.toml"),
        }
    }
}

/// Attribute store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database directory.
    pub path: PathBuf,

    /// Use a throwaway database instead of `path`.
    pub temporary: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./hostinfo.db"),
            temporary: false,
        }
    }
}

/// CSV import configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Origin recorded against every imported value.
    pub origin: String,

    /// Lowercase cell values before conversion.
    pub lowercase: bool,

    /// Cell values treated as blank.
    pub skip_values: Vec<String>,

    /// Abort on the first warning.
    pub strict: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            origin: "csv-import".to_string(),
            lowercase: true,
            skip_values: vec!["unknown".to_string()],
            strict: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HostinfoConfig::default();
        assert!(config.audit.restricted);
        assert!(!config.audit.single_valued);
        assert!(!config.audit.referential);
        assert!(config.import.lowercase);
        assert_eq!(config.import.skip_values, vec!["unknown"]);
        assert!(!config.import.strict);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_partial_toml() {
        let config = HostinfoConfig::from_toml_str(
            r#"
[store]
temporary = true

[audit]
single_valued = true
referential = true

[import]
origin = "asset-register"
"#,
        )
        .unwrap();
        assert!(config.store.temporary);
        assert!(config.audit.single_valued);
        assert!(config.audit.referential);
        assert!(config.audit.restricted);
        assert_eq!(config.import.origin, "asset-register");
        assert!(config.import.lowercase);
    }

    #[test]
    fn test_bad_toml() {
        let err = HostinfoConfig::from_toml_str("[store\n").unwrap_err();
        assert!(matches!(err, HostinfoError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = HostinfoConfig::discover(Some(Path::new("/nonexistent/hostinfo.toml")))
            .unwrap_err();
        assert!(matches!(err, HostinfoError::ConfigIo { .. }));
    }
}
