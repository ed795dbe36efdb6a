//! # Hostinfo Convert - Attribute Normalization
//!
//! Imported host data arrives as whatever a spreadsheet or inventory export
//! happened to contain: `"O/S"` columns holding `"RedHat 7.2"`, sites typed
//! as `"QV"` or `"co-lo"`, hardware described in prose. This crate turns
//! each such field into canonical key/value attributes.
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`ConverterRegistry`] | Alias → converter lookup, immutable once built |
//! | [`Converter`] | The per-key normalization capability |
//! | [`os`] | `os` split into family/detail, `osrev` repairs |
//! | [`site`] | Site synonym table |
//! | [`hardware`] | `hwdesc` fan-out into `hardware` and `type` |
//! | [`tags`] | `service`, `class`, `rack`, `dst_patched`, `buserver` cleanup |
//!
//! ## Architecture
//!
//! ```text
//!  header alias ──▶ ┌──────────────────┐      ┌──────────────┐
//!                   │ ConverterRegistry│─────▶│  Converter   │── Outcome
//!  raw value ─────▶ │  (normalized     │      │  (or identity)│  ├─ ConverterResult
//!                   │   alias table)   │      └──────────────┘  └─ Option<ConvertWarning>
//!                   └──────────────────┘
//!                            │
//!                            ▼
//!                   Conversion { attributes, warnings }
//! ```
//!
//! ## Conversion Rules
//!
//! - A value containing `virtual` is a VM in every converter that checks for
//!   it (`site`, `hwdesc`), before any other rule.
//! - Placeholder values (`none`, `n/a`, `???`) are declared per converter.
//! - Unclassifiable values are kept verbatim and reported as a warning,
//!   never as an error.
//!
//! ## Usage
//!
//! ```rust
//! use hostinfo_convert::{CanonicalAttribute, ConverterRegistry};
//!
//! let registry = ConverterRegistry::builtin();
//!
//! let conversion = registry.convert("hardware", Some("HP ProLiant DL380 G5"));
//! assert!(conversion.attributes.contains(&CanonicalAttribute::new("type", "server")));
//!
//! let conversion = registry.convert("site", Some("Nowhere Pty Ltd"));
//! assert_eq!(conversion.get("site"), Some("Nowhere Pty Ltd"));
//! assert_eq!(conversion.warnings.len(), 1);
//! ```

pub mod converter;
pub mod hardware;
pub mod models;
pub mod os;
pub mod registry;
pub mod sentinels;
pub mod site;
pub mod tags;

pub use converter::{identity, Converter};
pub use models::{
    CanonicalAttribute, Conversion, ConvertError, ConvertWarning, ConverterResult, Outcome,
};
pub use registry::{ConverterRegistry, RegistryBuilder, Resolved};

#[cfg(test)]
mod tests;
