//! # CSV Import Pipeline
//!
//! Loads a spreadsheet export into the attribute store, normalizing every
//! cell through the converter registry on the way.
//!
//! ## Flow
//!
//! ```text
//!   header row ──▶ column map (registry + catalog)
//!        │
//!   data rows ──▶ hostname ──sanitize──▶ host
//!        │
//!        └──▶ cell ──trim/lowercase──▶ registry.convert ──▶ attributes ──▶ store
//!                                             │
//!                                             └──▶ warnings (logged, returned)
//! ```
//!
//! ## Rules
//!
//! - A header names the host column if it is one of [`HOSTNAME_HEADERS`].
//!   Any other header is mapped when the key it resolves to is declared in
//!   the catalog, and skipped otherwise.
//! - Rows without a usable hostname are skipped with a warning.
//! - Blank cells and configured skip values (`unknown`) write nothing.
//! - Read-only keys are never written; each attempt is a warning.
//! - `date` values are stored as `YYYY-MM-DD`; a value that is not a date is
//!   dropped with a warning.
//! - `list` keys gain the value if it is not already present; other keys
//!   are overwritten.
//! - In strict mode the first warning aborts the import. Writes made before
//!   it stay in the store.

use hostinfo_catalog::{normalize_date, KeyCatalog, KeyKind};
use hostinfo_convert::{CanonicalAttribute, ConvertWarning, ConverterRegistry};
use hostinfo_store::AttributeStore;
use std::collections::BTreeSet;
use std::fmt;
use std::io::Read;
use tracing::{debug, info, warn};

use crate::config::ImportConfig;
use crate::error::{HostinfoError, Result};

/// Key the host column is reserved under in the registry.
pub const HOSTNAME_KEY: &str = "hostname";

/// Header names that identify the host column.
pub const HOSTNAME_HEADERS: &[&str] = &[
    "hostname",
    "host",
    "server",
    "servername",
    "server name",
    "item detail",
];

/// Interface suffixes stripped from host names.
const HOST_SUFFIXES: &[&str] = &[".ext0", ".ext1", ".ext2", ".ext3", ".drx", ".t3"];

/// Normalizes a host name from a spreadsheet cell.
///
/// ```rust
/// use hostinfo_core::import::sanitize_hostname;
///
/// assert_eq!(sanitize_hostname(" WebServer01.ext1 "), "webserver01");
/// assert_eq!(sanitize_hostname("db (primary)"), "db_primary");
/// ```
pub fn sanitize_hostname(raw: &str) -> String {
    let mut host = raw.trim().to_lowercase().replace(' ', "_");
    host.retain(|c| c != '(' && c != ')');
    for suffix in HOST_SUFFIXES {
        host = host.replace(suffix, "");
    }
    host
}

/// How a CSV column is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// The host name.
    Hostname,
    /// Converted through the registry under this header.
    Mapped {
        /// Header as written in the file.
        header: String,
        /// Canonical key the header resolves to.
        key: String,
    },
    /// Ignored.
    Unmapped(String),
}

/// A problem found while importing. None of these stop a non-strict import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportWarning {
    /// A converter did not recognize a value.
    Convert {
        /// File line.
        line: u64,
        /// Host the row describes.
        host: String,
        /// The converter's warning.
        warning: ConvertWarning,
    },
    /// A row with no host name.
    MissingHostname {
        /// File line.
        line: u64,
    },
    /// A row whose host name is a placeholder.
    BadHostname {
        /// File line.
        line: u64,
        /// The sanitized name.
        host: String,
    },
    /// A converter produced a key the catalog does not declare.
    UndeclaredKey {
        /// File line.
        line: u64,
        /// Host the row describes.
        host: String,
        /// The attribute that was dropped.
        attribute: CanonicalAttribute,
    },
    /// A value for a read-only key.
    ReadonlyKey {
        /// File line.
        line: u64,
        /// Host the row describes.
        host: String,
        /// The attribute that was dropped.
        attribute: CanonicalAttribute,
    },
    /// A `date` key value in no accepted layout.
    InvalidDate {
        /// File line.
        line: u64,
        /// Host the row describes.
        host: String,
        /// The attribute that was dropped.
        attribute: CanonicalAttribute,
    },
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportWarning::Convert { line, host, warning } => {
                write!(f, "line {} ({}): {}", line, host, warning)
            }
            ImportWarning::MissingHostname { line } => {
                write!(f, "line {}: no hostname to use", line)
            }
            ImportWarning::BadHostname { line, host } => {
                write!(f, "line {}: no good hostname to use - {}", line, host)
            }
            ImportWarning::UndeclaredKey {
                line,
                host,
                attribute,
            } => write!(
                f,
                "line {} ({}): key '{}' is not declared, dropping {}",
                line, host, attribute.key, attribute
            ),
            ImportWarning::ReadonlyKey {
                line,
                host,
                attribute,
            } => write!(
                f,
                "line {} ({}): key '{}' is read-only, dropping {}",
                line, host, attribute.key, attribute
            ),
            ImportWarning::InvalidDate {
                line,
                host,
                attribute,
            } => write!(
                f,
                "line {} ({}): '{}' is not a date, dropping {}",
                line, host, attribute.value, attribute
            ),
        }
    }
}

/// Counters and warnings from one import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Data rows read.
    pub rows: usize,
    /// Rows skipped for lack of a host name.
    pub skipped_rows: usize,
    /// Distinct hosts the file describes.
    pub hosts: BTreeSet<String>,
    /// Hosts that did not exist before.
    pub new_hosts: usize,
    /// Values written, or that would be written in a dry run.
    pub written: usize,
    /// Values already present and left alone.
    pub unchanged: usize,
    /// Headers that were ignored.
    pub unmapped_headers: Vec<String>,
    /// Every warning raised.
    pub warnings: Vec<ImportWarning>,
    /// Nothing was written.
    pub dry_run: bool,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows, {} hosts ({} new), {} values written, {} unchanged, {} warnings",
            self.rows,
            self.hosts.len(),
            self.new_hosts,
            self.written,
            self.unchanged,
            self.warnings.len()
        )?;
        if self.dry_run {
            f.write_str(" (dry run)")?;
        }
        Ok(())
    }
}

/// Imports CSV data into a store.
pub struct Importer<'a, S: AttributeStore + ?Sized> {
    registry: &'a ConverterRegistry,
    catalog: &'a KeyCatalog,
    store: &'a S,
    config: ImportConfig,
    dry_run: bool,
}

impl<'a, S: AttributeStore + ?Sized> Importer<'a, S> {
    /// An importer with default settings.
    pub fn new(registry: &'a ConverterRegistry, catalog: &'a KeyCatalog, store: &'a S) -> Self {
        Self {
            registry,
            catalog,
            store,
            config: ImportConfig::default(),
            dry_run: false,
        }
    }

    /// Replaces the import settings.
    #[must_use]
    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    /// Converts and counts without writing.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Maps header cells to columns.
    pub fn analyse_headers<'h, I: IntoIterator<Item = &'h str>>(&self, headers: I) -> Vec<Column> {
        headers
            .into_iter()
            .map(|header| {
                let normalized = hostinfo_convert::registry::normalize_alias(header);
                if HOSTNAME_HEADERS.contains(&normalized.as_str()) {
                    return Column::Hostname;
                }
                let key = self.registry.canonical_key(header);
                if self.catalog.contains(&key) {
                    debug!("Column '{}' -> {}", header, key);
                    Column::Mapped {
                        header: header.to_string(),
                        key,
                    }
                } else {
                    info!("Column '{}' unmapped", header);
                    Column::Unmapped(header.to_string())
                }
            })
            .collect()
    }

    /// Imports CSV text from a reader. The first record is the header row.
    ///
    /// # Errors
    ///
    /// Returns [`HostinfoError::Csv`] for unreadable CSV,
    /// [`HostinfoError::Store`] if a write fails, and
    /// [`HostinfoError::Strict`] on the first warning in strict mode.
    pub fn import<R: Read>(&self, reader: R) -> Result<ImportSummary> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns = self.analyse_headers(csv.headers()?.iter());
        if !columns.contains(&Column::Hostname) {
            warn!("No hostname column in import headers");
        }

        let mut summary = ImportSummary {
            dry_run: self.dry_run,
            unmapped_headers: columns
                .iter()
                .filter_map(|c| match c {
                    Column::Unmapped(header) => Some(header.clone()),
                    _ => None,
                })
                .collect(),
            ..ImportSummary::default()
        };

        info!(
            "Importing with origin '{}'{}",
            self.config.origin,
            if self.dry_run { " (dry run)" } else { "" }
        );

        for record in csv.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            summary.rows += 1;
            self.import_row(&columns, &record, line, &mut summary)?;
        }

        info!("Import finished: {}", summary);
        Ok(summary)
    }

    fn import_row(
        &self,
        columns: &[Column],
        record: &csv::StringRecord,
        line: u64,
        summary: &mut ImportSummary,
    ) -> Result<()> {
        // Extra cells beyond the header row are ignored.
        let cells: Vec<(&Column, &str)> = columns.iter().zip(record.iter()).collect();

        let host = cells
            .iter()
            .find(|(column, cell)| **column == Column::Hostname && !cell.trim().is_empty())
            .map(|(_, cell)| sanitize_hostname(cell));

        let host = match host {
            Some(host) if host.is_empty() => {
                return self.skip_row(ImportWarning::MissingHostname { line }, summary)
            }
            Some(host) if host.starts_with("????") => {
                return self.skip_row(ImportWarning::BadHostname { line, host }, summary)
            }
            Some(host) => host,
            None => return self.skip_row(ImportWarning::MissingHostname { line }, summary),
        };

        let mut attributes = Vec::new();
        for (column, cell) in cells {
            let Column::Mapped { header, .. } = column else {
                continue;
            };
            let Some(value) = self.clean(cell) else {
                continue;
            };
            let conversion = self.registry.convert(header, Some(value.as_str()));
            for warning in conversion.warnings {
                self.warn(
                    ImportWarning::Convert {
                        line,
                        host: host.clone(),
                        warning,
                    },
                    summary,
                )?;
            }
            attributes.extend(conversion.attributes);
        }

        self.ensure_host(&host, summary)?;
        for mut attribute in attributes {
            let Some(spec) = self.catalog.get(&attribute.key) else {
                self.warn(
                    ImportWarning::UndeclaredKey {
                        line,
                        host: host.clone(),
                        attribute,
                    },
                    summary,
                )?;
                continue;
            };
            if spec.readonly {
                self.warn(
                    ImportWarning::ReadonlyKey {
                        line,
                        host: host.clone(),
                        attribute,
                    },
                    summary,
                )?;
                continue;
            }
            if spec.kind == KeyKind::Date {
                match normalize_date(&attribute.value) {
                    Some(date) => attribute.value = date,
                    None => {
                        self.warn(
                            ImportWarning::InvalidDate {
                                line,
                                host: host.clone(),
                                attribute,
                            },
                            summary,
                        )?;
                        continue;
                    }
                }
            }
            self.write(&host, &attribute, summary)?;
        }
        Ok(())
    }

    fn clean(&self, cell: &str) -> Option<String> {
        let value = cell.trim();
        if value.is_empty() {
            return None;
        }
        let value = if self.config.lowercase {
            value.to_lowercase()
        } else {
            value.to_string()
        };
        let skipped = self
            .config
            .skip_values
            .iter()
            .any(|skip| skip.eq_ignore_ascii_case(&value));
        (!skipped).then_some(value)
    }

    fn ensure_host(&self, host: &str, summary: &mut ImportSummary) -> Result<()> {
        if !summary.hosts.insert(host.to_string()) {
            return Ok(());
        }
        let created = if self.dry_run {
            !self.store.has_host(host)?
        } else {
            self.store.add_host(host)?
        };
        if created {
            debug!("New host {}", host);
            summary.new_hosts += 1;
        }
        Ok(())
    }

    fn write(
        &self,
        host: &str,
        attribute: &CanonicalAttribute,
        summary: &mut ImportSummary,
    ) -> Result<()> {
        let existing = self.store.get(host, &attribute.key)?.map(|v| v.value);
        let is_list = self
            .catalog
            .get(&attribute.key)
            .is_some_and(|spec| spec.kind == KeyKind::List);

        let value = match existing {
            Some(current) if is_list => {
                let mut members: Vec<&str> =
                    current.split(',').filter(|m| !m.is_empty()).collect();
                if members.contains(&attribute.value.as_str()) {
                    summary.unchanged += 1;
                    return Ok(());
                }
                members.push(&attribute.value);
                members.join(",")
            }
            Some(current) if current == attribute.value => {
                summary.unchanged += 1;
                return Ok(());
            }
            _ => attribute.value.clone(),
        };

        debug!("{} {}={}", host, attribute.key, value);
        if !self.dry_run {
            self.store
                .put(host, &attribute.key, &value, Some(&self.config.origin))?;
        }
        summary.written += 1;
        Ok(())
    }

    fn skip_row(&self, warning: ImportWarning, summary: &mut ImportSummary) -> Result<()> {
        summary.skipped_rows += 1;
        self.warn(warning, summary)
    }

    fn warn(&self, warning: ImportWarning, summary: &mut ImportSummary) -> Result<()> {
        warn!("{}", warning);
        if self.config.strict {
            return Err(HostinfoError::Strict(warning.to_string()));
        }
        summary.warnings.push(warning);
        Ok(())
    }
}

impl<S: AttributeStore + ?Sized> fmt::Debug for Importer<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Importer")
            .field("config", &self.config)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostinfo_catalog::KeySpec;
    use hostinfo_store::MemoryStore;

    fn catalog() -> KeyCatalog {
        KeyCatalog::from_specs([
            KeySpec::new("os"),
            KeySpec::new("osrev"),
            KeySpec::new("site"),
            KeySpec::new("class").restricted_to(["dev", "prod", "staging", "test"]),
            KeySpec::new("serial"),
            KeySpec::new("databases").with_kind(KeyKind::List),
            KeySpec::new("asset").with_readonly(true),
            KeySpec::new("installed").with_kind(KeyKind::Date),
        ])
        .unwrap()
    }

    fn run(csv: &str, config: ImportConfig) -> (MemoryStore, Result<ImportSummary>) {
        let registry = ConverterRegistry::builtin();
        let catalog = catalog();
        let store = MemoryStore::new();
        let result = Importer::new(&registry, &catalog, &store)
            .with_config(config)
            .import(csv.as_bytes());
        (store, result)
    }

    fn value(store: &MemoryStore, host: &str, key: &str) -> Option<String> {
        store.get(host, key).unwrap().map(|v| v.value)
    }

    #[test]
    fn test_sanitize_hostname() {
        assert_eq!(sanitize_hostname("WEB01"), "web01");
        assert_eq!(sanitize_hostname("  app server  "), "app_server");
        assert_eq!(sanitize_hostname("(db1)"), "db1");
        assert_eq!(sanitize_hostname("mail.drx"), "mail");
        assert_eq!(sanitize_hostname("fw.t3"), "fw");
        assert_eq!(sanitize_hostname("nas.ext3"), "nas");
    }

    #[test]
    fn test_header_mapping() {
        let registry = ConverterRegistry::builtin();
        let catalog = catalog();
        let store = MemoryStore::new();
        let importer = Importer::new(&registry, &catalog, &store);
        let columns = importer.analyse_headers(["Server Name", "O/S", "Colour", "Serial"]);
        assert_eq!(columns[0], Column::Hostname);
        assert_eq!(
            columns[1],
            Column::Mapped {
                header: "O/S".to_string(),
                key: "os".to_string()
            }
        );
        assert_eq!(columns[2], Column::Unmapped("Colour".to_string()));
        assert!(matches!(&columns[3], Column::Mapped { key, .. } if key == "serial"));
    }

    #[test]
    fn test_basic_import() {
        let (store, result) = run(
            "Hostname,Operating System,Location,Serial\n\
             Alpha,RedHat 7.2,QV,SGH123\n\
             bravo,solaris,n/a,unknown\n",
            ImportConfig::default(),
        );
        let summary = result.unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.new_hosts, 2);
        assert_eq!(value(&store, "alpha", "os").as_deref(), Some("redhat"));
        assert_eq!(value(&store, "alpha", "osrev").as_deref(), Some("7.2"));
        assert_eq!(value(&store, "alpha", "site").as_deref(), Some("222lonsdale"));
        assert_eq!(value(&store, "alpha", "serial").as_deref(), Some("sgh123"));
        assert_eq!(value(&store, "bravo", "os").as_deref(), Some("solaris"));
        assert_eq!(value(&store, "bravo", "site"), None);
        assert_eq!(value(&store, "bravo", "serial"), None);
        assert!(summary.warnings.is_empty());
    }

    #[test]
    fn test_origin_recorded() {
        let config = ImportConfig {
            origin: "asset-register".to_string(),
            ..ImportConfig::default()
        };
        let (store, result) = run("host,os\nalpha,linux\n", config);
        result.unwrap();
        let stored = store.get("alpha", "os").unwrap().unwrap();
        assert_eq!(stored.origin.as_deref(), Some("asset-register"));
    }

    #[test]
    fn test_bad_hostnames_skipped() {
        let (store, result) = run(
            "host,os\n,linux\n????,aix\nalpha,linux\n",
            ImportConfig::default(),
        );
        let summary = result.unwrap();
        assert_eq!(summary.skipped_rows, 2);
        assert_eq!(
            summary.warnings,
            vec![
                ImportWarning::MissingHostname { line: 2 },
                ImportWarning::BadHostname {
                    line: 3,
                    host: "????".to_string()
                },
            ]
        );
        assert_eq!(store.hosts().unwrap(), vec!["alpha"]);
    }

    #[test]
    fn test_converter_warning_kept_with_raw_value() {
        let (store, result) = run(
            "host,site,class\nalpha,Nowhere Pty Ltd,qa\n",
            ImportConfig::default(),
        );
        let summary = result.unwrap();
        assert_eq!(summary.warnings.len(), 2);
        assert_eq!(value(&store, "alpha", "site").as_deref(), Some("nowhere pty ltd"));
        assert_eq!(value(&store, "alpha", "class").as_deref(), Some("qa"));
    }

    #[test]
    fn test_list_key_appends_without_duplicates() {
        let (store, result) = run(
            "host,databases\nalpha,orders\nalpha,billing\nalpha,orders\n",
            ImportConfig::default(),
        );
        let summary = result.unwrap();
        assert_eq!(value(&store, "alpha", "databases").as_deref(), Some("orders,billing"));
        assert_eq!(summary.written, 2);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.hosts.len(), 1);
    }

    #[test]
    fn test_single_key_overwrites() {
        let (store, result) = run(
            "host,os\nalpha,linux\nalpha,aix\n",
            ImportConfig::default(),
        );
        result.unwrap();
        assert_eq!(value(&store, "alpha", "os").as_deref(), Some("aix"));
    }

    #[test]
    fn test_fanout_to_undeclared_key_dropped() {
        // hwdesc converters emit hardware and type, neither declared here.
        let registry = ConverterRegistry::builtin();
        let catalog = KeyCatalog::from_specs([KeySpec::new("hwdesc")]).unwrap();
        let store = MemoryStore::new();
        let summary = Importer::new(&registry, &catalog, &store)
            .import("host,model\nalpha,Sun Fire V240\n".as_bytes())
            .unwrap();
        assert_eq!(value(&store, "alpha", "hwdesc").as_deref(), Some("sun_fire_v240"));
        assert_eq!(summary.warnings.len(), 2);
        assert!(summary
            .warnings
            .iter()
            .all(|w| matches!(w, ImportWarning::UndeclaredKey { .. })));
    }

    #[test]
    fn test_strict_aborts_on_first_warning() {
        let config = ImportConfig {
            strict: true,
            ..ImportConfig::default()
        };
        let (store, result) = run("host,class\nalpha,dev\nbravo,qa\ncharlie,prod\n", config);
        let err = result.unwrap_err();
        assert!(matches!(err, HostinfoError::Strict(ref msg) if msg.contains("line 3")));
        assert_eq!(value(&store, "alpha", "class").as_deref(), Some("dev"));
        assert!(!store.has_host("charlie").unwrap());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let registry = ConverterRegistry::builtin();
        let catalog = catalog();
        let store = MemoryStore::new();
        let summary = Importer::new(&registry, &catalog, &store)
            .with_dry_run(true)
            .import("host,os\nalpha,linux\nbravo,aix\n".as_bytes())
            .unwrap();
        assert_eq!(summary.written, 2);
        assert_eq!(summary.new_hosts, 2);
        assert!(summary.dry_run);
        assert!(store.hosts().unwrap().is_empty());
    }

    #[test]
    fn test_case_preserved_when_lowercase_off() {
        let config = ImportConfig {
            lowercase: false,
            ..ImportConfig::default()
        };
        let (store, result) = run("host,serial\nalpha,SGH123\nbravo,UNKNOWN\n", config);
        result.unwrap();
        assert_eq!(value(&store, "alpha", "serial").as_deref(), Some("SGH123"));
        assert_eq!(value(&store, "bravo", "serial"), None);
    }

    #[test]
    fn test_short_and_long_rows() {
        let (store, result) = run(
            "host,os,serial\nalpha,linux\nbravo,aix,s1,extra\n",
            ImportConfig::default(),
        );
        let summary = result.unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(value(&store, "alpha", "serial"), None);
        assert_eq!(value(&store, "bravo", "serial").as_deref(), Some("s1"));
    }

    #[test]
    fn test_readonly_key_not_written() {
        let (store, result) = run(
            "host,asset tag,os\nalpha,A100,linux\n",
            ImportConfig::default(),
        );
        let summary = result.unwrap();
        assert_eq!(value(&store, "alpha", "asset"), None);
        assert_eq!(value(&store, "alpha", "os").as_deref(), Some("linux"));
        assert_eq!(
            summary.warnings,
            vec![ImportWarning::ReadonlyKey {
                line: 2,
                host: "alpha".to_string(),
                attribute: CanonicalAttribute::new("asset", "a100"),
            }]
        );
        assert_eq!(summary.written, 1);
    }

    #[test]
    fn test_readonly_key_aborts_strict_import() {
        let config = ImportConfig {
            strict: true,
            ..ImportConfig::default()
        };
        let (store, result) = run("host,asset\nalpha,A100\n", config);
        let err = result.unwrap_err();
        assert!(matches!(err, HostinfoError::Strict(ref msg) if msg.contains("read-only")));
        assert_eq!(value(&store, "alpha", "asset"), None);
    }

    #[test]
    fn test_date_values_normalized() {
        let (store, result) = run(
            "host,installed\nalpha,30/04/2013\nbravo,2013/04/30\ncharlie,Today\n",
            ImportConfig::default(),
        );
        let summary = result.unwrap();
        assert!(summary.warnings.is_empty());
        assert_eq!(value(&store, "alpha", "installed").as_deref(), Some("2013-04-30"));
        assert_eq!(value(&store, "bravo", "installed").as_deref(), Some("2013-04-30"));
        let today = value(&store, "charlie", "installed").unwrap();
        assert_eq!(normalize_date(&today), Some(today.clone()));
    }

    #[test]
    fn test_invalid_date_dropped() {
        let (store, result) = run(
            "host,installed\nalpha,last tuesday\n",
            ImportConfig::default(),
        );
        let summary = result.unwrap();
        assert_eq!(value(&store, "alpha", "installed"), None);
        assert!(matches!(
            &summary.warnings[..],
            [ImportWarning::InvalidDate { line: 2, attribute, .. }] if attribute.value == "last tuesday"
        ));
    }
}
