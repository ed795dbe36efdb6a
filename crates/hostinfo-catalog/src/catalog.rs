//! # Key Catalog
//!
//! The policy store the auditor and importer consult. Loaded once at
//! startup from TOML or JSON and read-only afterwards.
//!
//! ## File Format
//!
//! ```toml
//! [[key]]
//! key = "class"
//! restricted = true
//! values = ["dev", "prod", "staging", "test"]
//!
//! [[key]]
//! key = "virtuals"
//! type = "list"
//!
//! [[key]]
//! key = "serial"
//! aliases = ["serial number", "asset serial"]
//! ```
//!
//! The JSON form is `{"keys": [{"key": "class", ...}]}`.
//!
//! ## Validation
//!
//! Loading fails on empty or whitespace-containing key names, duplicate
//! keys, values declared on an unrestricted key, aliases claimed by two
//! keys, and a `listed_by` that is not a list key. A key's own name counts
//! as one of its aliases. Key names are case-insensitive and stored
//! lowercase.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::models::{
    CatalogError, KeyKind, KeyLink, KeyPolicy, KeySpec, RestrictedValueSet, Result,
};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "key", alias = "keys")]
    keys: Vec<KeySpec>,
}

#[derive(Debug, Clone)]
struct KeyEntry {
    spec: KeySpec,
    values: RestrictedValueSet,
}

/// The declared attribute keys and their policies.
///
/// # Example
///
/// ```rust
/// use hostinfo_catalog::{KeyCatalog, KeyKind, KeySpec};
///
/// let catalog = KeyCatalog::from_specs([
///     KeySpec::new("class").restricted_to(["dev", "prod"]),
///     KeySpec::new("virtuals").with_kind(KeyKind::List),
/// ])
/// .unwrap();
///
/// assert!(catalog.is_restricted("class"));
/// assert!(catalog.is_single_valued("class"));
/// assert!(!catalog.is_single_valued("virtuals"));
/// assert!(catalog.legal_values("class").unwrap().contains("prod"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyCatalog {
    entries: Vec<KeyEntry>,
    index: HashMap<String, usize>,
}

impl KeyCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and validates a catalog from key declarations.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] describing the first invalid declaration.
    pub fn from_specs<I: IntoIterator<Item = KeySpec>>(specs: I) -> Result<Self> {
        let mut catalog = Self::new();

        for mut spec in specs {
            let key = spec.key.trim().to_lowercase();
            if key.is_empty() || key.contains(char::is_whitespace) {
                return Err(CatalogError::InvalidKeyName(spec.key));
            }
            if catalog.index.contains_key(&key) {
                return Err(CatalogError::DuplicateKey(key));
            }
            if !spec.restricted && !spec.values.is_empty() {
                return Err(CatalogError::ValuesWithoutRestriction(key));
            }

            spec.key = key.clone();
            if let Some(parent) = spec.listed_by.as_mut() {
                *parent = parent.trim().to_lowercase();
            }
            let values = spec.values.iter().cloned().collect();
            catalog.index.insert(key, catalog.entries.len());
            catalog.entries.push(KeyEntry { spec, values });
        }

        catalog.check_aliases()?;
        catalog.check_links()?;
        debug!("Catalog built with {} keys", catalog.entries.len());
        Ok(catalog)
    }

    /// Every key owns its own name as an alias, so an alias naming another
    /// key conflicts whichever is declared first.
    fn check_aliases(&self) -> Result<()> {
        let mut owner: HashMap<String, &str> = self
            .keys()
            .map(|spec| (spec.key.clone(), spec.key.as_str()))
            .collect();

        for spec in self.keys() {
            for alias in &spec.aliases {
                let alias = normalize(alias);
                if let Some(first) = owner.get(alias.as_str()).copied() {
                    if first != spec.key {
                        return Err(CatalogError::AliasConflict {
                            alias,
                            first: first.to_string(),
                            second: spec.key.clone(),
                        });
                    }
                    continue;
                }
                owner.insert(alias, spec.key.as_str());
            }
        }
        Ok(())
    }

    fn check_links(&self) -> Result<()> {
        for spec in self.keys() {
            let Some(parent) = &spec.listed_by else {
                continue;
            };
            let valid = self
                .get(parent)
                .is_some_and(|target| target.kind == KeyKind::List && target.key != spec.key);
            if !valid {
                return Err(CatalogError::InvalidLink {
                    key: spec.key.clone(),
                    parent: parent.clone(),
                });
            }
        }
        Ok(())
    }

    /// Parses a JSON catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] for malformed input, or a validation
    /// error.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(input)?;
        Self::from_specs(file.keys)
    }

    /// Parses a TOML catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Toml`] for malformed input, or a validation
    /// error.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(input)?;
        Self::from_specs(file.keys)
    }

    /// Loads a catalog file; `.json` files are parsed as JSON, anything else
    /// as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read, or a parse or
    /// validation error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let catalog = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        info!(
            "Loaded key catalog from {} ({} keys, {} restricted)",
            path.display(),
            catalog.len(),
            catalog.restricted_keys().len()
        );
        Ok(catalog)
    }

    fn entry(&self, key: &str) -> Option<&KeyEntry> {
        let key = key.trim().to_lowercase();
        self.index.get(&key).map(|i| &self.entries[*i])
    }

    /// Returns the declaration of a key.
    pub fn get(&self, key: &str) -> Option<&KeySpec> {
        self.entry(key).map(|e| &e.spec)
    }

    /// Returns true if the key is declared.
    pub fn contains(&self, key: &str) -> bool {
        self.entry(key).is_some()
    }

    /// Returns true if a host may hold at most one value for the key.
    ///
    /// Undeclared keys are not single-valued.
    pub fn is_single_valued(&self, key: &str) -> bool {
        self.entry(key)
            .is_some_and(|e| e.spec.kind.is_single_valued())
    }

    /// Returns true if the key's values are drawn from an enumerated set.
    pub fn is_restricted(&self, key: &str) -> bool {
        self.entry(key).is_some_and(|e| e.spec.restricted)
    }

    /// Legal values of a restricted key; `None` if the key is unrestricted
    /// or undeclared.
    pub fn legal_values(&self, key: &str) -> Option<&RestrictedValueSet> {
        self.entry(key)
            .filter(|e| e.spec.restricted)
            .map(|e| &e.values)
    }

    /// Both policy facets of a key.
    pub fn policy(&self, key: &str) -> KeyPolicy {
        KeyPolicy {
            single_valued: self.is_single_valued(key),
            restricted: self.is_restricted(key),
        }
    }

    /// All declarations, in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = &KeySpec> {
        self.entries.iter().map(|e| &e.spec)
    }

    /// Restricted keys, in catalog order.
    pub fn restricted_keys(&self) -> Vec<&str> {
        self.keys()
            .filter(|spec| spec.restricted)
            .map(|spec| spec.key.as_str())
            .collect()
    }

    /// Single-valued keys, in catalog order.
    pub fn single_valued_keys(&self) -> Vec<&str> {
        self.keys()
            .filter(|spec| spec.kind.is_single_valued())
            .map(|spec| spec.key.as_str())
            .collect()
    }

    /// Every `(key, alias)` pair declared in the catalog.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys().flat_map(|spec| {
            spec.aliases
                .iter()
                .map(move |alias| (spec.key.as_str(), alias.as_str()))
        })
    }

    /// Parent/child key pairs declared through `listed_by`, in catalog order.
    pub fn links(&self) -> Vec<KeyLink> {
        self.keys()
            .filter_map(|spec| {
                spec.listed_by.as_ref().map(|parent| KeyLink {
                    parent: parent.clone(),
                    child: spec.key.clone(),
                })
            })
            .collect()
    }

    /// Number of declared keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no key is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(alias: &str) -> String {
    alias
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TOML_CATALOG: &str = r#"
[[key]]
key = "class"
restricted = true
values = ["dev", "prod", "staging", "test"]

[[key]]
key = "Virtuals"
type = "list"

[[key]]
key = "serial"
aliases = ["Serial   Number"]

[[key]]
key = "tags"
type = "list"
restricted = true
values = ["backup", "dmz"]
"#;

    #[test]
    fn test_toml_catalog() {
        let catalog = KeyCatalog::from_toml_str(TOML_CATALOG).unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.restricted_keys(), vec!["class", "tags"]);
        assert_eq!(catalog.single_valued_keys(), vec!["class", "serial"]);
        assert_eq!(catalog.get("VIRTUALS").unwrap().kind, KeyKind::List);
    }

    #[test]
    fn test_facets_are_independent() {
        let catalog = KeyCatalog::from_toml_str(TOML_CATALOG).unwrap();
        let both = catalog.policy("class");
        let restricted_only = catalog.policy("tags");
        let single_only = catalog.policy("serial");
        let neither = catalog.policy("virtuals");
        assert!(both.single_valued && both.restricted);
        assert!(!restricted_only.single_valued && restricted_only.restricted);
        assert!(single_only.single_valued && !single_only.restricted);
        assert!(!neither.single_valued && !neither.restricted);
    }

    #[test]
    fn test_json_catalog() {
        let catalog = KeyCatalog::from_json_str(
            r#"{"keys": [{"key": "os", "restricted": true, "values": ["linux", "windows"]}]}"#,
        )
        .unwrap();
        let values = catalog.legal_values("os").unwrap();
        assert!(values.contains("linux"));
        assert!(!values.contains("Linux"));
    }

    #[test]
    fn test_unknown_key_has_no_policy() {
        let catalog = KeyCatalog::from_toml_str(TOML_CATALOG).unwrap();
        assert_eq!(catalog.policy("nosuch"), KeyPolicy::default());
        assert!(catalog.legal_values("nosuch").is_none());
        assert!(catalog.legal_values("serial").is_none());
    }

    #[test]
    fn test_aliases_listed() {
        let catalog = KeyCatalog::from_toml_str(TOML_CATALOG).unwrap();
        let aliases: Vec<_> = catalog.aliases().collect();
        assert_eq!(aliases, vec![("serial", "Serial   Number")]);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = KeyCatalog::from_specs([KeySpec::new("os"), KeySpec::new("OS")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateKey(k) if k == "os"));
    }

    #[test]
    fn test_invalid_key_name_rejected() {
        for name in ["", "  ", "two words"] {
            let err = KeyCatalog::from_specs([KeySpec::new(name)]).unwrap_err();
            assert!(matches!(err, CatalogError::InvalidKeyName(_)), "{:?}", name);
        }
    }

    #[test]
    fn test_values_without_restriction_rejected() {
        let mut spec = KeySpec::new("class");
        spec.values = vec!["dev".to_string()];
        let err = KeyCatalog::from_specs([spec]).unwrap_err();
        assert!(matches!(err, CatalogError::ValuesWithoutRestriction(_)));
    }

    #[test]
    fn test_alias_conflict_rejected() {
        let err = KeyCatalog::from_specs([
            KeySpec::new("serial").with_alias("tag"),
            KeySpec::new("asset").with_alias(" TAG "),
        ])
        .unwrap_err();
        match err {
            CatalogError::AliasConflict { alias, first, second } => {
                assert_eq!(alias, "tag");
                assert_eq!(first, "serial");
                assert_eq!(second, "asset");
            }
            other => panic!("expected AliasConflict, got {:?}", other),
        }
    }

    #[test]
    fn test_alias_naming_another_key_rejected() {
        let forward = KeyCatalog::from_specs([
            KeySpec::new("serial"),
            KeySpec::new("asset").with_alias("Serial"),
        ])
        .unwrap_err();
        let backward = KeyCatalog::from_specs([
            KeySpec::new("asset").with_alias("serial"),
            KeySpec::new("serial"),
        ])
        .unwrap_err();
        for err in [forward, backward] {
            match err {
                CatalogError::AliasConflict { alias, first, second } => {
                    assert_eq!(alias, "serial");
                    assert_eq!(first, "serial");
                    assert_eq!(second, "asset");
                }
                other => panic!("expected AliasConflict, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_alias_repeating_own_name_allowed() {
        let catalog = KeyCatalog::from_specs([KeySpec::new("serial").with_alias("SERIAL")]).unwrap();
        assert!(catalog.contains("serial"));
    }

    #[test]
    fn test_links_in_catalog_order() {
        let catalog = KeyCatalog::from_specs([
            KeySpec::new("zones").with_kind(KeyKind::List),
            KeySpec::new("blades").with_kind(KeyKind::List),
            KeySpec::new("bladeenclosure").listed_by("Blades"),
            KeySpec::new("zonemaster").listed_by("zones"),
        ])
        .unwrap();
        assert_eq!(
            catalog.links(),
            vec![
                KeyLink { parent: "blades".into(), child: "bladeenclosure".into() },
                KeyLink { parent: "zones".into(), child: "zonemaster".into() },
            ]
        );
    }

    #[test]
    fn test_link_to_missing_or_single_key_rejected() {
        let missing =
            KeyCatalog::from_specs([KeySpec::new("zonemaster").listed_by("zones")]).unwrap_err();
        assert!(matches!(missing, CatalogError::InvalidLink { ref parent, .. } if parent == "zones"));

        let single = KeyCatalog::from_specs([
            KeySpec::new("zones"),
            KeySpec::new("zonemaster").listed_by("zones"),
        ])
        .unwrap_err();
        assert!(matches!(single, CatalogError::InvalidLink { ref key, .. } if key == "zonemaster"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = KeyCatalog::from_toml_str("[[key]]\nkey = ").unwrap_err();
        assert!(matches!(err, CatalogError::Toml(_)));
    }

    #[test]
    fn test_load_by_extension() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"keys": [{{"key": "site"}}]}}"#).unwrap();
        assert!(KeyCatalog::load(json.path()).unwrap().contains("site"));

        let mut toml = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(toml, "{}", TOML_CATALOG).unwrap();
        assert_eq!(KeyCatalog::load(toml.path()).unwrap().len(), 4);
    }

    #[test]
    fn test_load_missing_file() {
        let err = KeyCatalog::load("/nonexistent/catalog.toml").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
