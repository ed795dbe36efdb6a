//! # Store Data Model
//!
//! One record per `(host, key)` pair. Values are opaque strings; list keys
//! hold their members comma-joined. Every record remembers where it came
//! from so a later import can tell hand-entered data from loaded data.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One attribute value held by one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostValue {
    /// Host name.
    pub host: String,
    /// Canonical attribute key.
    pub key: String,
    /// Stored value, comma-joined for list keys.
    pub value: String,
    /// Where the value came from, if recorded.
    pub origin: Option<String>,
}

impl HostValue {
    /// A value with no recorded origin.
    pub fn new(host: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            key: key.into(),
            value: value.into(),
            origin: None,
        }
    }

    /// Sets the origin.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}={}", self.host, self.key, self.value)
    }
}

/// On-disk form of a record; host and key live in the record key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredValue {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl StoredValue {
    pub(crate) fn into_host_value(self, host: &str, key: &str) -> HostValue {
        HostValue {
            host: host.to_string(),
            key: key.to_string(),
            value: self.value,
            origin: self.origin,
        }
    }
}

/// Errors raised by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The embedded database failed.
    #[error("database error: {0}")]
    Database(#[from] sled::Error),

    /// A record could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A single record could not be read back. Scans yield this per record
    /// and carry on.
    #[error("unreadable record for {host} {key}: {reason}")]
    UnreadableRecord {
        /// Host part of the record key, as far as it could be decoded.
        host: String,
        /// Attribute key.
        key: String,
        /// What went wrong.
        reason: String,
    },

    /// A write targeted a host that was never added.
    #[error("no such host '{0}'")]
    MissingHost(String),

    /// A host or key name the store cannot represent.
    #[error("invalid name {0:?}")]
    InvalidName(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_value_display() {
        let value = HostValue::new("alpha", "os", "linux").with_origin("import");
        assert_eq!(value.to_string(), "alpha os=linux");
        assert_eq!(value.origin.as_deref(), Some("import"));
    }

    #[test]
    fn test_stored_value_omits_missing_origin() {
        let stored = StoredValue {
            value: "linux".to_string(),
            origin: None,
        };
        assert_eq!(serde_json::to_string(&stored).unwrap(), r#"{"value":"linux"}"#);
    }
}
