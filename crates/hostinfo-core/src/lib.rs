//! # Hostinfo Core - CMDB Attribute Normalization and Validation
//!
//! Ties the hostinfo crates together behind one facade.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           HOSTINFO                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  CSV ──▶ Importer ──▶ ConverterRegistry ──▶ AttributeStore      │
//! │              │         (os, site, hwdesc,        │              │
//! │              │          osrev, class, ...)       │              │
//! │              ▼                                   ▼              │
//! │         KeyCatalog ◀──────── policies ──────── Auditor ──▶ sink │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! | Component | Crate | Role |
//! |-----------|-------|------|
//! | Converter registry | `hostinfo-convert` | Alias lookup and value normalization |
//! | Key catalog | `hostinfo-catalog` | Single-valued and restricted policies |
//! | Attribute store | `hostinfo-store` | Host/value persistence |
//! | Auditor | `hostinfo-audit` | Population-wide policy checks |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hostinfo_core::{Hostinfo, HostinfoConfig};
//!
//! let config = HostinfoConfig::load("hostinfo.toml")?;
//! let hostinfo = Hostinfo::new(config)?;
//!
//! let summary = hostinfo.import_csv("servers.csv", false)?;
//! println!("{}", summary);
//!
//! let report = hostinfo.audit()?;
//! for violation in &report.violations {
//!     println!("{}", violation);
//! }
//! # Ok::<(), hostinfo_core::HostinfoError>(())
//! ```

pub mod config;
pub mod error;
pub mod hostinfo;
pub mod import;

pub use config::{
    CatalogConfig, HostinfoConfig, ImportConfig, LogConfig, StoreConfig, DEFAULT_CONFIG_PATH,
};
pub use error::{HostinfoError, Result};
pub use hostinfo::{build_registry, Hostinfo};
pub use import::{Column, ImportSummary, ImportWarning, Importer};

pub use hostinfo_audit::{AuditConfig, AuditReport, AuditSummary};
