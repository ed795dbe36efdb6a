//! # Core Types for Attribute Conversion
//!
//! Every converter honors one contract: a raw imported string goes in, a
//! [`ConverterResult`] comes out, optionally accompanied by a single
//! [`ConvertWarning`]. The registry flattens that into a [`Conversion`], the
//! list of canonical `(key, value)` facts that the import pipeline writes.
//!
//! ## Result Forms
//!
//! | Form | Meaning | Example |
//! |------|---------|---------|
//! | `Scalar` | Value for the resolved key, normalized | `"QV"` → `site=222lonsdale` |
//! | `Fanout` | Zero or more derived keys | `"redhat 7.2"` → `os=redhat`, `osrev=7.2` |
//! | `Empty` | Input discarded, nothing written | `"n/a"` for a site |
//!
//! Warnings are data, not control flow. A converter that cannot classify
//! its input still produces a result; the warning travels beside it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// A normalized `(key, value)` fact attached to a host.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CanonicalAttribute {
    /// Canonical key name.
    pub key: String,

    /// Canonical value.
    pub value: String,
}

impl CanonicalAttribute {
    /// Creates a new attribute.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for CanonicalAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Output of a single converter invocation.
///
/// `Fanout` uses a `BTreeMap` so derived keys are unique and always emitted
/// in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConverterResult {
    /// Value for the key the converter was resolved under.
    Scalar(String),

    /// Derived attributes, keyed by canonical key.
    Fanout(BTreeMap<String, String>),

    /// Input discarded; no attribute is written.
    Empty,
}

impl ConverterResult {
    /// Creates a scalar result.
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// Creates a fan-out result from `(key, value)` pairs.
    pub fn fanout<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Fanout(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns true if no attribute would be written.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Fanout(map) => map.is_empty(),
            Self::Scalar(_) => false,
        }
    }

    /// Flattens the result into attributes, attaching a scalar to `key`.
    pub fn into_attributes(self, key: &str) -> Vec<CanonicalAttribute> {
        match self {
            Self::Scalar(value) => vec![CanonicalAttribute::new(key, value)],
            Self::Fanout(map) => map
                .into_iter()
                .map(|(k, v)| CanonicalAttribute::new(k, v))
                .collect(),
            Self::Empty => Vec::new(),
        }
    }
}

/// A recoverable diagnostic raised while converting a value.
///
/// Never fatal: the conversion that raised it still produced a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvertWarning {
    /// A non-empty, non-sentinel value the converter could not classify.
    UnknownValue {
        /// Canonical key of the converter that raised it.
        key: String,
        /// The value as received.
        value: String,
    },

    /// A site name missing from the site table.
    UnmappedSite {
        /// The site name as received.
        value: String,
    },
}

impl ConvertWarning {
    /// Creates an `UnknownValue` warning.
    pub fn unknown(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The raw value the warning refers to.
    pub fn value(&self) -> &str {
        match self {
            Self::UnknownValue { value, .. } | Self::UnmappedSite { value } => value,
        }
    }
}

impl fmt::Display for ConvertWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownValue { key, value } => write!(f, "Unknown {}: {}", key, value),
            Self::UnmappedSite { value } => write!(f, "Unhandled site: {}", value),
        }
    }
}

/// A converter's result together with the warning it raised, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The converted value(s).
    pub result: ConverterResult,

    /// Diagnostic raised during conversion.
    pub warning: Option<ConvertWarning>,
}

impl Outcome {
    /// An outcome without a warning.
    pub fn new(result: ConverterResult) -> Self {
        Self {
            result,
            warning: None,
        }
    }

    /// An outcome carrying a warning.
    pub fn warned(result: ConverterResult, warning: ConvertWarning) -> Self {
        Self {
            result,
            warning: Some(warning),
        }
    }

    /// Shorthand for an empty outcome.
    pub fn empty() -> Self {
        Self::new(ConverterResult::Empty)
    }
}

impl From<ConverterResult> for Outcome {
    fn from(result: ConverterResult) -> Self {
        Self::new(result)
    }
}

/// The flattened result of converting one imported field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Conversion {
    /// Canonical key the field's alias resolved to.
    pub key: String,

    /// Attributes to write, in key order for fan-out results.
    pub attributes: Vec<CanonicalAttribute>,

    /// Warnings raised while converting.
    pub warnings: Vec<ConvertWarning>,
}

impl Conversion {
    /// Flattens an outcome for the given canonical key.
    pub fn from_outcome(key: impl Into<String>, outcome: Outcome) -> Self {
        let key = key.into();
        let attributes = outcome.result.into_attributes(&key);
        Self {
            key,
            attributes,
            warnings: outcome.warning.into_iter().collect(),
        }
    }

    /// Returns true if nothing would be written.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Looks up the value produced for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }
}

/// Errors raised while building a converter registry.
///
/// These are configuration errors and are fatal at startup.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Two canonical keys claimed the same alias.
    #[error("alias '{alias}' already maps to key '{existing}', cannot map it to '{incoming}'")]
    AliasConflict {
        /// The normalized alias.
        alias: String,
        /// Key that already owns the alias.
        existing: String,
        /// Key that tried to claim it.
        incoming: String,
    },

    /// An alias that is empty after normalization.
    #[error("invalid alias {0:?} for key '{1}'")]
    InvalidAlias(String, String),
}

/// Result type for registry construction.
pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_attaches_to_key() {
        let attrs = ConverterResult::scalar("linux").into_attributes("os");
        assert_eq!(attrs, vec![CanonicalAttribute::new("os", "linux")]);
    }

    #[test]
    fn test_fanout_ignores_key_and_orders_entries() {
        let result = ConverterResult::fanout([("type", "virtual"), ("vmtype", "vmware")]);
        let attrs = result.into_attributes("hwdesc");
        assert_eq!(attrs[0], CanonicalAttribute::new("type", "virtual"));
        assert_eq!(attrs[1], CanonicalAttribute::new("vmtype", "vmware"));
    }

    #[test]
    fn test_empty_fanout_is_empty() {
        assert!(ConverterResult::Empty.is_empty());
        assert!(ConverterResult::Fanout(BTreeMap::new()).is_empty());
        assert!(!ConverterResult::scalar("").is_empty());
    }

    #[test]
    fn test_warning_display() {
        let warning = ConvertWarning::UnmappedSite {
            value: "Nowhere Pty Ltd".to_string(),
        };
        assert_eq!(warning.to_string(), "Unhandled site: Nowhere Pty Ltd");
        assert_eq!(
            ConvertWarning::unknown("hwdesc", "toaster").to_string(),
            "Unknown hwdesc: toaster"
        );
    }

    #[test]
    fn test_conversion_collects_warning() {
        let outcome = Outcome::warned(
            ConverterResult::scalar("hpux"),
            ConvertWarning::unknown("os", "hpux"),
        );
        let conversion = Conversion::from_outcome("os", outcome);
        assert_eq!(conversion.get("os"), Some("hpux"));
        assert_eq!(conversion.warnings.len(), 1);
    }

    #[test]
    fn test_conversion_json_shape() {
        let conversion = Conversion::from_outcome(
            "site",
            ConverterResult::fanout([("type", "virtual"), ("vmtype", "vmware")]).into(),
        );
        let json = serde_json::to_value(&conversion).unwrap();
        assert_eq!(json["key"], "site");
        assert_eq!(json["attributes"][1]["value"], "vmware");
        assert_eq!(json["warnings"], serde_json::json!([]));
    }
}
