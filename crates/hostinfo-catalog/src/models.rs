//! # Key Catalog Data Model
//!
//! Each attribute key a host may carry is declared once in the catalog with
//! its value shape and, optionally, the enumerated set of values it may take.
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `type` | `single`, `list` or `date`; `list` keys may hold several values |
//! | `restricted` | Values must come from `values` |
//! | `values` | Legal values of a restricted key |
//! | `aliases` | Extra import header names for the key |
//! | `readonly` | Imports never write the key |
//! | `listed_by` | List key on the parent host that names this host |
//!
//! The two policy facets are independent: a key may be single-valued,
//! restricted, both, or neither.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Shape of the values a key holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    /// Exactly one value per host.
    #[default]
    Single,
    /// Any number of values per host, stored comma-separated.
    List,
    /// One date value per host.
    Date,
}

impl KeyKind {
    /// Returns true if a host may hold at most one value.
    pub fn is_single_valued(self) -> bool {
        !matches!(self, KeyKind::List)
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyKind::Single => "single",
            KeyKind::List => "list",
            KeyKind::Date => "date",
        };
        f.pad(name)
    }
}

/// Declaration of one attribute key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySpec {
    /// Canonical key name.
    pub key: String,

    /// Value shape.
    #[serde(rename = "type", default)]
    pub kind: KeyKind,

    /// Whether values are limited to `values`.
    #[serde(default)]
    pub restricted: bool,

    /// Legal values when restricted.
    #[serde(default)]
    pub values: Vec<String>,

    /// Additional import header names.
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Free-text description.
    #[serde(default, alias = "desc")]
    pub description: String,

    /// Whether the key may only be changed by administrators.
    #[serde(default)]
    pub readonly: bool,

    /// Parent list key this key points back at, e.g. `zonemaster` is
    /// listed by `zones`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listed_by: Option<String>,
}

impl KeySpec {
    /// A single-valued, unrestricted key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: KeyKind::Single,
            restricted: false,
            values: Vec::new(),
            aliases: Vec::new(),
            description: String::new(),
            readonly: false,
            listed_by: None,
        }
    }

    /// Sets the value shape.
    #[must_use]
    pub fn with_kind(mut self, kind: KeyKind) -> Self {
        self.kind = kind;
        self
    }

    /// Restricts the key to the given values.
    #[must_use]
    pub fn restricted_to<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.restricted = true;
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Adds an import alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the key read-only for imports.
    #[must_use]
    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    /// Declares the parent list key that names hosts holding this key.
    #[must_use]
    pub fn listed_by(mut self, parent: impl Into<String>) -> Self {
        self.listed_by = Some(parent.into());
        self
    }
}

/// A parent/child relation between two keys.
///
/// A host whose `child` value names a parent should appear in that
/// parent's `parent` list, and the other way round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyLink {
    /// List key on the parent host, e.g. `blades`.
    pub parent: String,
    /// Key on the child host naming its parent, e.g. `bladeenclosure`.
    pub child: String,
}

/// The ordered set of legal values of a restricted key.
///
/// Membership is an exact, case-sensitive match on the canonical value.
///
/// # Example
///
/// ```rust
/// use hostinfo_catalog::RestrictedValueSet;
///
/// let set = RestrictedValueSet::from_iter(["prod", "dev"]);
/// assert!(set.contains("prod"));
/// assert!(!set.contains("Prod"));
/// assert_eq!(set.to_string(), "{dev,prod}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestrictedValueSet(BTreeSet<String>);

impl RestrictedValueSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `value` is legal.
    pub fn contains(&self, value: &str) -> bool {
        self.0.contains(value)
    }

    /// Iterates over legal values in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of legal values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no value is legal.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Legal values as owned strings, in order.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for RestrictedValueSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for RestrictedValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.to_vec().join(","))
    }
}

/// Policy facets of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyPolicy {
    /// A host may hold at most one value.
    pub single_valued: bool,
    /// Values are drawn from an enumerated set.
    pub restricted: bool,
}

/// Errors raised while loading or validating a catalog.
///
/// All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("cannot read catalog {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON catalog.
    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed TOML catalog.
    #[error("invalid TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),

    /// A key name that is empty or contains whitespace.
    #[error("invalid key name {0:?}")]
    InvalidKeyName(String),

    /// The same key declared twice.
    #[error("key '{0}' declared more than once")]
    DuplicateKey(String),

    /// Legal values listed for a key that is not restricted.
    #[error("key '{0}' lists values but is not restricted")]
    ValuesWithoutRestriction(String),

    /// An alias claimed by two keys.
    #[error("alias '{alias}' claimed by both '{first}' and '{second}'")]
    AliasConflict {
        /// The normalized alias.
        alias: String,
        /// Key that claimed it first.
        first: String,
        /// Key that claimed it again.
        second: String,
    },

    /// A `listed_by` that does not name another declared list key.
    #[error("key '{key}' is listed by '{parent}', which is not a declared list key")]
    InvalidLink {
        /// The child key.
        key: String,
        /// The named parent key.
        parent: String,
    },
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
