//! # Hostinfo Catalog - Key Policy Store
//!
//! Declares which attribute keys exist and what constraints their values
//! obey. Two independent facets are tracked per key:
//!
//! | Facet | Question answered | Used by |
//! |-------|-------------------|---------|
//! | single-valued | May a host hold more than one value? | single-valued audit pass, import |
//! | restricted | Must values come from an enumerated set? | restricted-value audit pass |
//!
//! Keys may also be read-only, hold dates (see [`date`]), or point back at
//! a parent host's list key, which the referential audit pass checks.
//!
//! The catalog is configuration: it is loaded once per process, validated
//! up front, and never mutated afterwards. A malformed catalog is one of the
//! few conditions that stops the program.
//!
//! ## Usage
//!
//! ```rust
//! use hostinfo_catalog::KeyCatalog;
//!
//! let catalog = KeyCatalog::from_toml_str(r#"
//! [[key]]
//! key = "class"
//! restricted = true
//! values = ["dev", "prod"]
//! "#).unwrap();
//!
//! assert_eq!(catalog.restricted_keys(), vec!["class"]);
//! assert_eq!(catalog.legal_values("class").unwrap().to_string(), "{dev,prod}");
//! ```

pub mod catalog;
pub mod date;
pub mod models;

pub use catalog::KeyCatalog;
pub use date::{normalize_date, normalize_date_on};
pub use models::{
    CatalogError, KeyKind, KeyLink, KeyPolicy, KeySpec, RestrictedValueSet, Result,
};
