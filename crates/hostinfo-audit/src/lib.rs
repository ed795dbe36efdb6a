//! # Hostinfo Audit - Population Integrity Checks
//!
//! Scans the entire host population for attribute values that break the
//! key catalog's policies and streams each finding to a sink.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   restricted_keys()    ┌─────────────────────┐
//! │  KeyCatalog  │──────────────────────▶ │                     │
//! └──────────────┘   single_valued_keys() │       Auditor       │
//!                    links()              │                     │
//! ┌──────────────┐   scan_key(key)        │  restricted pass    │──▶ ViolationSink
//! │AttributeStore│──────────────────────▶ │  single-valued pass │    (Vec / text / JSON)
//! └──────────────┘   Result<HostValue>    │  referential pass   │
//!                                         └─────────────────────┘
//! ```
//!
//! The audit is read-only. It never repairs data and never stops because of
//! a bad record.
//!
//! ## Usage
//!
//! ```rust
//! use hostinfo_audit::{AuditConfig, Auditor, TextSink};
//! use hostinfo_catalog::{KeyCatalog, KeySpec};
//! use hostinfo_store::{AttributeStore, MemoryStore};
//!
//! let catalog = KeyCatalog::from_specs([KeySpec::new("os")]).unwrap();
//! let store = MemoryStore::new();
//! store.add_host("alpha").unwrap();
//! store.put("alpha", "os", "linux,aix", None).unwrap();
//!
//! let mut sink = TextSink::new(Vec::new());
//! let summary = Auditor::new(&catalog, &store)
//!     .with_config(AuditConfig::default().with_single_valued(true))
//!     .run(&mut sink)
//!     .unwrap();
//!
//! assert_eq!(summary.violations(), 1);
//! assert_eq!(
//!     String::from_utf8(sink.into_inner()).unwrap(),
//!     "alpha os=linux,aix has multiple values\n"
//! );
//! ```

pub mod auditor;
pub mod error;
pub mod report;
pub mod violation;

pub use auditor::{AuditConfig, AuditReport, AuditSummary, Auditor, Pass, PassSummary};
pub use error::{AuditError, Result};
pub use report::{JsonLinesSink, TextSink, ViolationSink};
pub use violation::{Violation, ViolationKind};
