//! Error types for hostinfo.

use thiserror::Error;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum HostinfoError {
    /// The config file could not be read.
    #[error("cannot read config {path}: {source}")]
    ConfigIo {
        /// Path that was read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML.
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Catalog error passthrough.
    #[error("catalog error: {0}")]
    Catalog(#[from] hostinfo_catalog::CatalogError),

    /// Converter registry error passthrough.
    #[error("converter registry error: {0}")]
    Registry(#[from] hostinfo_convert::ConvertError),

    /// Store error passthrough.
    #[error("store error: {0}")]
    Store(#[from] hostinfo_store::StoreError),

    /// Audit error passthrough.
    #[error("audit error: {0}")]
    Audit(#[from] hostinfo_audit::AuditError),

    /// The import file is not valid CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The import file could not be opened.
    #[error("cannot read {path}: {source}")]
    InputIo {
        /// Path that was read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A warning raised while importing in strict mode.
    #[error("strict import aborted: {0}")]
    Strict(String),
}

/// Result type for hostinfo operations.
pub type Result<T> = std::result::Result<T, HostinfoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_display() {
        let err = HostinfoError::from(hostinfo_store::StoreError::MissingHost("alpha".into()));
        assert_eq!(err.to_string(), "store error: no such host 'alpha'");
    }

    #[test]
    fn test_strict_display() {
        let err = HostinfoError::Strict("line 3: Unknown class: qa".into());
        assert!(err.to_string().contains("line 3"));
    }
}
