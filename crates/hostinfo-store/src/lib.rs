//! # Hostinfo Store - Host Attribute Persistence
//!
//! Hosts carry a bag of `key=value` attributes. This crate defines the
//! [`AttributeStore`] seam the importer writes through and the auditor scans,
//! plus two backends:
//!
//! | Backend | Use |
//! |---------|-----|
//! | [`MemoryStore`] | Tests, dry runs |
//! | [`SledStore`] | Default on-disk database |
//!
//! Per-key scans are the audit's only read path. They yield records in host
//! order and report a damaged record as an `Err` item instead of stopping.

pub mod memory;
pub mod models;
pub mod storage;
pub mod store;

pub use memory::MemoryStore;
pub use models::{HostValue, Result, StoreError};
pub use storage::SledStore;
pub use store::{AttributeStore, Scan};
