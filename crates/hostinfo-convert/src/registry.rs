//! # Converter Registry
//!
//! Maps the header strings people actually type ("O/S", "Operating System",
//! "location (site)") to the converter for one canonical key.
//!
//! ## Lifecycle
//!
//! ```text
//!   RegistryBuilder ──register()──▶ RegistryBuilder ──build()──▶ ConverterRegistry
//!        │                                                          (immutable)
//!        └──alias()── identity aliases from the key catalog
//! ```
//!
//! [`RegistryBuilder::with_builtin`] also claims [`IDENTITY_ALIASES`], the
//! spreadsheet headers for keys that are copied without conversion.
//!
//! ## Invariants
//!
//! - Alias lookup is case-insensitive and whitespace-normalized.
//! - An alias belongs to exactly one canonical key; a second claim is an
//!   [`ConvertError::AliasConflict`].
//! - Aliases with no converter behind them resolve to the identity
//!   converter under their own normalized name.

use std::collections::HashMap;
use std::fmt;

use crate::converter::{identity, Converter};
use crate::hardware::HardwareConverter;
use crate::models::{Conversion, ConvertError, Outcome, Result};
use crate::os::{OsConverter, OsRevConverter};
use crate::site::SiteConverter;
use crate::tags::{
    BackupServerConverter, ClassConverter, DstPatchedConverter, RackConverter, ServiceConverter,
};

/// Header names that map straight onto a key with no converter.
pub const IDENTITY_ALIASES: &[(&str, &[&str])] = &[
    ("asset", &["asset tag", "asset id"]),
    ("databases", &["database name"]),
    ("serial", &["serial number"]),
    ("osrelease", &["operatingsystemservicepack", "osrel", "ops"]),
];

/// Normalizes an alias: trimmed, inner whitespace collapsed, lowercased.
///
/// # Example
///
/// ```rust
/// use hostinfo_convert::registry::normalize_alias;
///
/// assert_eq!(normalize_alias("  Operating   System "), "operating system");
/// ```
pub fn normalize_alias(alias: &str) -> String {
    alias
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug, Clone)]
enum Target {
    Converter(usize),
    Key(String),
}

/// What an alias resolved to.
pub enum Resolved<'a> {
    /// A registered converter.
    Converter(&'a dyn Converter),

    /// No converter: values pass through under this canonical key.
    Identity(String),
}

impl Resolved<'_> {
    /// Canonical key for scalar results.
    pub fn key(&self) -> &str {
        match self {
            Resolved::Converter(converter) => converter.key(),
            Resolved::Identity(key) => key,
        }
    }

    /// Returns true if no converter is registered for the alias.
    pub fn is_identity(&self) -> bool {
        matches!(self, Resolved::Identity(_))
    }

    /// Runs the resolved converter.
    pub fn convert(&self, raw: Option<&str>) -> Outcome {
        match self {
            Resolved::Converter(converter) => converter.convert(raw),
            Resolved::Identity(_) => identity(raw),
        }
    }
}

impl fmt::Debug for Resolved<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Converter(converter) => {
                f.debug_tuple("Converter").field(&converter.key()).finish()
            }
            Resolved::Identity(key) => f.debug_tuple("Identity").field(key).finish(),
        }
    }
}

/// Collects converters and aliases before freezing them into a registry.
#[derive(Default)]
pub struct RegistryBuilder {
    converters: Vec<Box<dyn Converter>>,
    aliases: HashMap<String, Target>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every built-in converter and the [`IDENTITY_ALIASES`].
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::AliasConflict`] if an alias already claimed on
    /// this builder collides with a built-in one.
    pub fn with_builtin(self) -> Result<Self> {
        let mut builder = self
            .register(OsConverter)?
            .register(OsRevConverter)?
            .register(SiteConverter)?
            .register(HardwareConverter)?
            .register(ServiceConverter)?
            .register(ClassConverter)?
            .register(RackConverter)?
            .register(DstPatchedConverter)?
            .register(BackupServerConverter)?;
        for (key, aliases) in IDENTITY_ALIASES {
            for alias in *aliases {
                builder = builder.alias(key, alias)?;
            }
        }
        Ok(builder)
    }

    /// Registers a converter under all of its aliases.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::AliasConflict`] if an alias already belongs to
    /// a different key.
    pub fn register<C: Converter + 'static>(mut self, converter: C) -> Result<Self> {
        let index = self.converters.len();
        let key = converter.key().to_string();
        let aliases: Vec<String> = converter.aliases().iter().map(|a| a.to_string()).collect();
        self.converters.push(Box::new(converter));

        for alias in std::iter::once(key.clone()).chain(aliases) {
            self.claim(&alias, Target::Converter(index), &key)?;
        }
        Ok(self)
    }

    /// Maps an extra alias to a key.
    ///
    /// The alias resolves to the key's converter if one is registered,
    /// otherwise to the identity converter. Claiming an alias that already
    /// resolves to `key` is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::AliasConflict`] if the alias belongs to a
    /// different key.
    pub fn alias(mut self, key: &str, alias: &str) -> Result<Self> {
        let key = normalize_alias(key);
        let target = match self.converters.iter().position(|c| c.key() == key) {
            Some(index) => Target::Converter(index),
            None => Target::Key(key.clone()),
        };
        self.claim(alias, target, &key)?;
        Ok(self)
    }

    /// Freezes the builder.
    pub fn build(self) -> ConverterRegistry {
        ConverterRegistry {
            converters: self.converters,
            aliases: self.aliases,
        }
    }

    fn claim(&mut self, alias: &str, target: Target, key: &str) -> Result<()> {
        let normalized = normalize_alias(alias);
        if normalized.is_empty() {
            return Err(ConvertError::InvalidAlias(alias.to_string(), key.to_string()));
        }
        if let Some(existing) = self.aliases.get(&normalized) {
            let existing_key = match existing {
                Target::Converter(i) => self.converters[*i].key(),
                Target::Key(k) => k.as_str(),
            };
            if existing_key == key {
                return Ok(());
            }
            return Err(ConvertError::AliasConflict {
                alias: normalized,
                existing: existing_key.to_string(),
                incoming: key.to_string(),
            });
        }
        self.aliases.insert(normalized, target);
        Ok(())
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("converters", &self.converters.len())
            .field("aliases", &self.aliases.len())
            .finish()
    }
}

/// Immutable alias → converter lookup.
///
/// # Example
///
/// ```rust
/// use hostinfo_convert::ConverterRegistry;
///
/// let registry = ConverterRegistry::builtin();
///
/// let conversion = registry.convert("Operating System", Some("redhat 7.2"));
/// assert_eq!(conversion.get("os"), Some("redhat"));
/// assert_eq!(conversion.get("osrev"), Some("7.2"));
///
/// // Unregistered keys pass through unchanged.
/// let conversion = registry.convert("serial", Some("SGH123"));
/// assert_eq!(conversion.get("serial"), Some("SGH123"));
/// ```
pub struct ConverterRegistry {
    converters: Vec<Box<dyn Converter>>,
    aliases: HashMap<String, Target>,
}

impl ConverterRegistry {
    /// Starts a new builder.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// A registry holding exactly the built-in converters.
    pub fn builtin() -> Self {
        RegistryBuilder::new()
            .with_builtin()
            .expect("built-in converter aliases are disjoint")
            .build()
    }

    /// Resolves an alias or key name.
    pub fn resolve(&self, alias: &str) -> Resolved<'_> {
        let normalized = normalize_alias(alias);
        match self.aliases.get(&normalized) {
            Some(Target::Converter(i)) => Resolved::Converter(self.converters[*i].as_ref()),
            Some(Target::Key(key)) => Resolved::Identity(key.clone()),
            None => Resolved::Identity(normalized),
        }
    }

    /// Returns the canonical key an alias resolves to.
    pub fn canonical_key(&self, alias: &str) -> String {
        self.resolve(alias).key().to_string()
    }

    /// Returns true if the alias was registered explicitly.
    pub fn knows(&self, alias: &str) -> bool {
        self.aliases.contains_key(&normalize_alias(alias))
    }

    /// Converts one imported field into canonical attributes.
    pub fn convert(&self, alias: &str, raw: Option<&str>) -> Conversion {
        let resolved = self.resolve(alias);
        Conversion::from_outcome(resolved.key(), resolved.convert(raw))
    }

    /// Iterates over the registered converters.
    pub fn converters(&self) -> impl Iterator<Item = &dyn Converter> {
        self.converters.iter().map(|c| c.as_ref())
    }

    /// Number of registered aliases.
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field(
                "converters",
                &self.converters.iter().map(|c| c.key()).collect::<Vec<_>>(),
            )
            .field("aliases", &self.aliases.len())
            .finish()
    }
}
