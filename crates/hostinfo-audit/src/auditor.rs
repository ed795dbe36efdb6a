//! # Population Auditor
//!
//! Walks every host holding a policed key and reports values that break the
//! key's policy. Three passes:
//!
//! | Pass | Keys | Flags | Default |
//! |------|------|-------|---------|
//! | restricted | restricted keys | value not in legal set | on |
//! | single-valued | single-valued keys | value contains `,` | off |
//! | referential | `listed_by` pairs | parent and child disagree | off |
//!
//! The referential pass checks each parent/child key pair both ways:
//!
//! ```text
//!   parent host ── zones = z1,z2 ──▶ z1, z2 must each hold zonemaster = parent
//!   child host ── zonemaster = p ──▶ p's zones must list the child
//! ```
//!
//! ## Guarantees
//!
//! - Every `(host, key)` pair a pass scans is visited exactly once.
//! - A pass never stops at the first violation.
//! - Unreadable records are skipped, logged and counted.
//! - Only a failing sink aborts an audit.
//!
//! With `parallel` set each enabled pass scans on its own thread and the
//! findings reach the sink after all finish, in the order of the table.

use hostinfo_catalog::KeyCatalog;
use hostinfo_store::AttributeStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::thread;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::report::ViolationSink;
use crate::violation::Violation;

/// Which audit passes run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Run the restricted-value pass.
    pub restricted: bool,
    /// Run the single-valued pass.
    pub single_valued: bool,
    /// Run the referential pass.
    pub referential: bool,
    /// Run passes concurrently.
    pub parallel: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            restricted: true,
            single_valued: false,
            referential: false,
            parallel: false,
        }
    }
}

impl AuditConfig {
    /// Enables or disables the restricted-value pass.
    #[must_use]
    pub fn with_restricted(mut self, enabled: bool) -> Self {
        self.restricted = enabled;
        self
    }

    /// Enables or disables the single-valued pass.
    #[must_use]
    pub fn with_single_valued(mut self, enabled: bool) -> Self {
        self.single_valued = enabled;
        self
    }

    /// Enables or disables the referential pass.
    #[must_use]
    pub fn with_referential(mut self, enabled: bool) -> Self {
        self.referential = enabled;
        self
    }

    /// Runs enabled passes concurrently.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }
}

/// An audit pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    /// Values checked against legal sets.
    Restricted,
    /// Single-valued keys checked for lists.
    SingleValued,
    /// Parent and child keys checked against each other.
    Referential,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Restricted => f.write_str("restricted"),
            Pass::SingleValued => f.write_str("single-valued"),
            Pass::Referential => f.write_str("referential"),
        }
    }
}

/// Counters for one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassSummary {
    /// The pass.
    pub pass: Pass,
    /// Keys scanned.
    pub keys: usize,
    /// Records checked.
    pub visited: usize,
    /// Violations reported.
    pub violations: usize,
    /// Unreadable records skipped.
    pub skipped: usize,
}

impl PassSummary {
    fn new(pass: Pass) -> Self {
        Self {
            pass,
            keys: 0,
            visited: 0,
            violations: 0,
            skipped: 0,
        }
    }
}

/// Counters for a whole audit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// One entry per pass that ran, in run order.
    pub passes: Vec<PassSummary>,
}

impl AuditSummary {
    /// Records checked across passes.
    pub fn visited(&self) -> usize {
        self.passes.iter().map(|p| p.visited).sum()
    }

    /// Violations reported across passes.
    pub fn violations(&self) -> usize {
        self.passes.iter().map(|p| p.violations).sum()
    }

    /// Unreadable records skipped across passes.
    pub fn skipped(&self) -> usize {
        self.passes.iter().map(|p| p.skipped).sum()
    }

    /// Returns true if no violation was reported.
    pub fn is_clean(&self) -> bool {
        self.violations() == 0
    }

    /// The summary of one pass, if it ran.
    pub fn pass(&self, pass: Pass) -> Option<&PassSummary> {
        self.passes.iter().find(|p| p.pass == pass)
    }
}

impl fmt::Display for AuditSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records checked, {} violations, {} skipped",
            self.visited(),
            self.violations(),
            self.skipped()
        )
    }
}

/// Violations and counters collected in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    /// Every violation found.
    pub violations: Vec<Violation>,
    /// Counters.
    pub summary: AuditSummary,
}

/// Audits a host population against a key catalog.
///
/// # Example
///
/// ```rust
/// use hostinfo_audit::Auditor;
/// use hostinfo_catalog::{KeyCatalog, KeySpec};
/// use hostinfo_store::{AttributeStore, MemoryStore};
///
/// let catalog = KeyCatalog::from_specs([KeySpec::new("class").restricted_to(["dev", "prod"])]).unwrap();
/// let store = MemoryStore::new();
/// store.add_host("alpha").unwrap();
/// store.put("alpha", "class", "qa", None).unwrap();
///
/// let report = Auditor::new(&catalog, &store).collect();
/// assert_eq!(report.violations[0].to_string(), "alpha class=qa not in {dev,prod}");
/// ```
pub struct Auditor<'a, S: AttributeStore + ?Sized> {
    catalog: &'a KeyCatalog,
    store: &'a S,
    config: AuditConfig,
}

impl<'a, S: AttributeStore + ?Sized> Auditor<'a, S> {
    /// An auditor with the default passes.
    pub fn new(catalog: &'a KeyCatalog, store: &'a S) -> Self {
        Self {
            catalog,
            store,
            config: AuditConfig::default(),
        }
    }

    /// Replaces the pass selection.
    #[must_use]
    pub fn with_config(mut self, config: AuditConfig) -> Self {
        self.config = config;
        self
    }

    /// The active pass selection.
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Runs the enabled passes, reporting into `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Sink`](crate::AuditError::Sink) if the sink
    /// fails. Violations already handed over stay reported.
    pub fn run<K: ViolationSink + ?Sized>(&self, sink: &mut K) -> Result<AuditSummary> {
        info!(
            "Audit starting (restricted={}, single_valued={}, referential={}, parallel={})",
            self.config.restricted,
            self.config.single_valued,
            self.config.referential,
            self.config.parallel
        );

        let passes = self.enabled_passes();
        let mut summary = AuditSummary::default();
        if self.config.parallel && passes.len() > 1 {
            self.run_parallel(&passes, sink, &mut summary)?;
        } else {
            for pass in passes {
                summary.passes.push(self.run_pass(pass, sink)?);
            }
        }
        sink.finish()?;

        info!("Audit finished: {}", summary);
        Ok(summary)
    }

    /// Runs the enabled passes and keeps every violation in memory.
    pub fn collect(&self) -> AuditReport {
        let mut violations = Vec::new();
        // Collecting into a Vec cannot fail.
        let summary = self.run(&mut violations).unwrap_or_default();
        AuditReport {
            violations,
            summary,
        }
    }

    /// Runs one pass, whether or not it is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Sink`](crate::AuditError::Sink) if the sink
    /// fails.
    pub fn run_pass<K: ViolationSink + ?Sized>(&self, pass: Pass, sink: &mut K) -> Result<PassSummary> {
        match pass {
            Pass::Restricted => self.restricted_pass(sink),
            Pass::SingleValued => self.single_valued_pass(sink),
            Pass::Referential => self.referential_pass(sink),
        }
    }

    fn enabled_passes(&self) -> Vec<Pass> {
        [
            (self.config.restricted, Pass::Restricted),
            (self.config.single_valued, Pass::SingleValued),
            (self.config.referential, Pass::Referential),
        ]
        .into_iter()
        .filter_map(|(enabled, pass)| enabled.then_some(pass))
        .collect()
    }

    /// Checks every restricted key against its legal set.
    pub fn restricted_pass<K: ViolationSink + ?Sized>(&self, sink: &mut K) -> Result<PassSummary> {
        let mut summary = PassSummary::new(Pass::Restricted);
        for key in self.catalog.restricted_keys() {
            let Some(allowed) = self.catalog.legal_values(key) else {
                continue;
            };
            summary.keys += 1;
            debug!("Checking {} against {}", key, allowed);

            self.scan(key, &mut summary, sink, |value| {
                (!allowed.contains(&value.value)).then(|| {
                    Violation::not_allowed(&value.host, &value.key, &value.value, allowed.clone())
                })
            })?;
        }
        Ok(summary)
    }

    /// Checks every single-valued key for comma-separated lists.
    pub fn single_valued_pass<K: ViolationSink + ?Sized>(
        &self,
        sink: &mut K,
    ) -> Result<PassSummary> {
        let mut summary = PassSummary::new(Pass::SingleValued);
        for key in self.catalog.single_valued_keys() {
            summary.keys += 1;
            debug!("Checking {} for multiple values", key);

            self.scan(key, &mut summary, sink, |value| {
                value
                    .value
                    .contains(',')
                    .then(|| Violation::multiple_values(&value.host, &value.key, &value.value))
            })?;
        }
        Ok(summary)
    }

    /// Checks every parent/child key pair from both ends.
    ///
    /// A listed host without the child key is a phantom child. A listed host
    /// whose child key is anything but the listing parent is a mismatch. A
    /// child naming a parent that does not list it is unlisted.
    pub fn referential_pass<K: ViolationSink + ?Sized>(&self, sink: &mut K) -> Result<PassSummary> {
        let mut summary = PassSummary::new(Pass::Referential);
        for link in self.catalog.links() {
            summary.keys += 2;
            debug!("Checking {} against {}", link.child, link.parent);
            let parents = self.members(&link.parent, &mut summary);
            let children = self.members(&link.child, &mut summary);

            for (parent, listed) in &parents {
                for child in listed {
                    let violation = match children.get(child) {
                        None => Violation::phantom_child(parent, &link.parent, child, &link.child),
                        Some(named) if named.len() == 1 && named[0] == *parent => continue,
                        Some(named) => Violation::parent_mismatch(
                            child,
                            &link.child,
                            named.join(","),
                            parent,
                            &link.parent,
                        ),
                    };
                    summary.violations += 1;
                    sink.report(violation)?;
                }
            }

            for (child, named) in &children {
                for parent in named {
                    let listed = parents
                        .get(parent)
                        .is_some_and(|listed| listed.contains(child));
                    if !listed {
                        summary.violations += 1;
                        sink.report(Violation::unlisted_child(
                            child,
                            &link.child,
                            parent,
                            &link.parent,
                        ))?;
                    }
                }
            }
        }
        Ok(summary)
    }

    /// Every host's comma-separated members of `key`.
    fn members(&self, key: &str, summary: &mut PassSummary) -> BTreeMap<String, Vec<String>> {
        let mut members = BTreeMap::new();
        for record in self.store.scan_key(key) {
            match record {
                Ok(value) => {
                    summary.visited += 1;
                    let list: Vec<String> = value
                        .value
                        .split(',')
                        .map(str::trim)
                        .filter(|m| !m.is_empty())
                        .map(str::to_string)
                        .collect();
                    members.insert(value.host, list);
                }
                Err(err) => {
                    summary.skipped += 1;
                    warn!("Skipping unreadable record during {} pass: {}", summary.pass, err);
                }
            }
        }
        members
    }

    fn scan<K, F>(&self, key: &str, summary: &mut PassSummary, sink: &mut K, check: F) -> Result<()>
    where
        K: ViolationSink + ?Sized,
        F: Fn(&hostinfo_store::HostValue) -> Option<Violation>,
    {
        for record in self.store.scan_key(key) {
            match record {
                Ok(value) => {
                    summary.visited += 1;
                    if let Some(violation) = check(&value) {
                        summary.violations += 1;
                        sink.report(violation)?;
                    }
                }
                Err(err) => {
                    summary.skipped += 1;
                    warn!("Skipping unreadable record during {} pass: {}", summary.pass, err);
                }
            }
        }
        Ok(())
    }

    fn run_parallel<K: ViolationSink + ?Sized>(
        &self,
        passes: &[Pass],
        sink: &mut K,
        summary: &mut AuditSummary,
    ) -> Result<()> {
        let outcomes: Vec<Result<(PassSummary, Vec<Violation>)>> = thread::scope(|scope| {
            let handles: Vec<_> = passes
                .iter()
                .map(|&pass| {
                    scope.spawn(move || {
                        let mut found = Vec::new();
                        self.run_pass(pass, &mut found).map(|s| (s, found))
                    })
                })
                .collect();
            handles.into_iter().map(join).collect()
        });

        for outcome in outcomes {
            let (pass, found) = outcome?;
            for violation in found {
                sink.report(violation)?;
            }
            summary.passes.push(pass);
        }
        Ok(())
    }
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    match handle.join() {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

impl<S: AttributeStore + ?Sized> fmt::Debug for Auditor<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auditor")
            .field("keys", &self.catalog.len())
            .field("config", &self.config)
            .finish()
    }
}
