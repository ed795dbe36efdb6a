//! The hostinfo facade.
//!
//! [`Hostinfo`] owns the catalog, the converter registry and the store, and
//! exposes the three things users do with them: convert a value, import a
//! spreadsheet, audit the population.

use hostinfo_audit::{AuditConfig, AuditReport, AuditSummary, Auditor, ViolationSink};
use hostinfo_catalog::KeyCatalog;
use hostinfo_convert::{Conversion, ConverterRegistry};
use hostinfo_store::{AttributeStore, SledStore};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

use crate::config::HostinfoConfig;
use crate::error::{HostinfoError, Result};
use crate::import::{ImportSummary, Importer, HOSTNAME_HEADERS, HOSTNAME_KEY};

/// Builds the converter registry for a catalog: every built-in converter,
/// the host column headers reserved under `hostname`, then the catalog's
/// declared aliases.
///
/// # Errors
///
/// Returns [`HostinfoError::Registry`] if a catalog alias collides with a
/// built-in alias of another key or with a host column header, or if a
/// catalog key is named like a host column.
pub fn build_registry(catalog: &KeyCatalog) -> Result<ConverterRegistry> {
    let mut builder = ConverterRegistry::builder().with_builtin()?;
    for header in HOSTNAME_HEADERS {
        builder = builder.alias(HOSTNAME_KEY, header)?;
    }
    // Such a column is always read as the host name.
    for spec in catalog.keys() {
        if spec.key != HOSTNAME_KEY && HOSTNAME_HEADERS.contains(&spec.key.as_str()) {
            builder = builder.alias(&spec.key, &spec.key)?;
        }
    }
    for (key, alias) in catalog.aliases() {
        builder = builder.alias(key, alias)?;
    }
    Ok(builder.build())
}

/// Catalog, registry and store wired together.
///
/// # Example
///
/// ```rust
/// use hostinfo_catalog::{KeyCatalog, KeySpec};
/// use hostinfo_core::{Hostinfo, HostinfoConfig};
/// use hostinfo_store::MemoryStore;
///
/// let catalog = KeyCatalog::from_specs([
///     KeySpec::new("os").restricted_to(["linux", "solaris"]),
/// ]).unwrap();
/// let hostinfo = Hostinfo::with_parts(HostinfoConfig::default(), catalog, MemoryStore::new()).unwrap();
///
/// let summary = hostinfo.import_reader("host,os\nalpha,linux\nbravo,hpux\n".as_bytes(), false).unwrap();
/// assert_eq!(summary.new_hosts, 2);
///
/// let report = hostinfo.audit().unwrap();
/// assert_eq!(report.violations[0].to_string(), "bravo os=hpux not in {linux,solaris}");
/// ```
pub struct Hostinfo<S: AttributeStore = SledStore> {
    config: HostinfoConfig,
    catalog: KeyCatalog,
    registry: ConverterRegistry,
    store: S,
}

impl Hostinfo<SledStore> {
    /// Loads the catalog and opens the store named in `config`.
    ///
    /// # Errors
    ///
    /// Fails if the catalog cannot be loaded, its aliases conflict, or the
    /// database cannot be opened.
    pub fn new(config: HostinfoConfig) -> Result<Self> {
        let catalog = KeyCatalog::load(&config.catalog.path)?;
        let store = if config.store.temporary {
            SledStore::temporary()?
        } else {
            SledStore::open(&config.store.path)?
        };
        Self::with_parts(config, catalog, store)
    }
}

impl<S: AttributeStore> Hostinfo<S> {
    /// Wires an already-loaded catalog and store.
    pub fn with_parts(config: HostinfoConfig, catalog: KeyCatalog, store: S) -> Result<Self> {
        let registry = build_registry(&catalog)?;
        info!(
            "Hostinfo ready: {} keys, {} aliases",
            catalog.len(),
            registry.alias_count()
        );
        Ok(Self {
            config,
            catalog,
            registry,
            store,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &HostinfoConfig {
        &self.config
    }

    /// The key catalog.
    pub fn catalog(&self) -> &KeyCatalog {
        &self.catalog
    }

    /// The converter registry.
    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// The attribute store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Converts one value as an import would.
    pub fn convert(&self, alias: &str, raw: Option<&str>) -> Conversion {
        self.registry.convert(alias, raw)
    }

    /// Imports a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`HostinfoError::InputIo`] if the file cannot be opened, or
    /// any error from [`Importer::import`].
    pub fn import_csv<P: AsRef<Path>>(&self, path: P, dry_run: bool) -> Result<ImportSummary> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| HostinfoError::InputIo {
            path: path.display().to_string(),
            source,
        })?;
        info!("Importing {}", path.display());
        self.import_reader(BufReader::new(file), dry_run)
    }

    /// Imports CSV text from any reader.
    pub fn import_reader<R: Read>(&self, reader: R, dry_run: bool) -> Result<ImportSummary> {
        Importer::new(&self.registry, &self.catalog, &self.store)
            .with_config(self.config.import.clone())
            .with_dry_run(dry_run)
            .import(reader)
    }

    /// Audits with the configured passes, collecting violations in memory.
    pub fn audit(&self) -> Result<AuditReport> {
        Ok(self.auditor(self.config.audit).collect())
    }

    /// Audits with `config`, streaming violations into `sink`.
    pub fn audit_into<K: ViolationSink + ?Sized>(
        &self,
        config: AuditConfig,
        sink: &mut K,
    ) -> Result<AuditSummary> {
        Ok(self.auditor(config).run(sink)?)
    }

    fn auditor(&self, config: AuditConfig) -> Auditor<'_, S> {
        Auditor::new(&self.catalog, &self.store).with_config(config)
    }
}

impl<S: AttributeStore> std::fmt::Debug for Hostinfo<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hostinfo")
            .field("keys", &self.catalog.len())
            .field("registry", &self.registry)
            .finish()
    }
}
