//! # Persistent Storage Layer
//!
//! The default store backend, built on Sled. Host names and attribute
//! values survive restarts and can be audited by a later process.
//!
//! ## Storage Structure
//!
//! | Tree | Key | Value | Purpose |
//! |------|-----|-------|---------|
//! | `hosts` | host name | empty | Host registry |
//! | `attributes` | `<key>\0<host>` | JSON `{value, origin}` | Attribute values |
//!
//! Attribute records are keyed by attribute first, so a per-key scan is a
//! single prefix scan and comes back in host order.
//!
//! ## Corruption
//!
//! A record whose key is not UTF-8 or whose value does not decode is yielded
//! by [`SledStore::scan_key`] as [`StoreError::UnreadableRecord`]; the scan
//! continues with the next record.

use std::path::Path;

use crate::models::{HostValue, Result, StoreError, StoredValue};
use crate::store::{check_name, AttributeStore, Scan};

/// Tree name for the host registry.
const HOST_TREE: &str = "hosts";

/// Tree name for attribute values.
const ATTRIBUTE_TREE: &str = "attributes";

const SEPARATOR: u8 = 0;

fn record_key(key: &str, host: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(key.len() + host.len() + 1);
    bytes.extend_from_slice(key.as_bytes());
    bytes.push(SEPARATOR);
    bytes.extend_from_slice(host.as_bytes());
    bytes
}

fn scan_prefix(key: &str) -> Vec<u8> {
    let mut bytes = key.as_bytes().to_vec();
    bytes.push(SEPARATOR);
    bytes
}

/// Sled-backed attribute store.
///
/// # Thread Safety
///
/// Sled handles concurrent readers and writers; clones share the same
/// database.
///
/// # Example
///
/// ```rust
/// use hostinfo_store::{AttributeStore, SledStore};
///
/// let store = SledStore::temporary().unwrap();
/// store.add_host("alpha").unwrap();
/// store.put("alpha", "site", "melbourne", Some("import")).unwrap();
///
/// let value = store.get("alpha", "site").unwrap().unwrap();
/// assert_eq!(value.value, "melbourne");
/// assert_eq!(value.origin.as_deref(), Some("import"));
/// ```
#[derive(Clone)]
pub struct SledStore {
    db: sled::Db,
    hosts: sled::Tree,
    attributes: sled::Tree,
}

impl SledStore {
    /// Opens or creates a store at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the path is unusable or the
    /// database is corrupted.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_db(sled::open(path)?)
    }

    /// Creates a store that is discarded when dropped.
    pub fn temporary() -> Result<Self> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: sled::Db) -> Result<Self> {
        let hosts = db.open_tree(HOST_TREE)?;
        let attributes = db.open_tree(ATTRIBUTE_TREE)?;
        Ok(SledStore {
            db,
            hosts,
            attributes,
        })
    }

    /// Number of stored attribute values.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns true if no attribute values are stored.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Flushes pending writes to disk, returning the bytes written.
    pub fn flush(&self) -> Result<usize> {
        Ok(self.db.flush()?)
    }

    #[cfg(test)]
    fn insert_raw(&self, key: &[u8], value: &[u8]) {
        self.attributes.insert(key, value).unwrap();
    }
}

fn decode(key: &str, entry: sled::Result<(sled::IVec, sled::IVec)>) -> Result<HostValue> {
    let (record_key, bytes) = entry?;
    let host_bytes = &record_key[key.len() + 1..];
    let host = std::str::from_utf8(host_bytes).map_err(|e| StoreError::UnreadableRecord {
        host: String::from_utf8_lossy(host_bytes).into_owned(),
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    let stored: StoredValue =
        serde_json::from_slice(&bytes).map_err(|e| StoreError::UnreadableRecord {
            host: host.to_string(),
            key: key.to_string(),
            reason: e.to_string(),
        })?;
    Ok(stored.into_host_value(host, key))
}

impl AttributeStore for SledStore {
    fn add_host(&self, host: &str) -> Result<bool> {
        check_name(host)?;
        Ok(self.hosts.insert(host.as_bytes(), Vec::new())?.is_none())
    }

    fn has_host(&self, host: &str) -> Result<bool> {
        Ok(self.hosts.contains_key(host.as_bytes())?)
    }

    fn hosts(&self) -> Result<Vec<String>> {
        let mut hosts = Vec::with_capacity(self.hosts.len());
        for entry in self.hosts.iter() {
            let (name, _) = entry?;
            let name = String::from_utf8(name.to_vec()).map_err(|e| {
                StoreError::UnreadableRecord {
                    host: String::from_utf8_lossy(e.as_bytes()).into_owned(),
                    key: HOST_TREE.to_string(),
                    reason: e.utf8_error().to_string(),
                }
            })?;
            hosts.push(name);
        }
        Ok(hosts)
    }

    fn get(&self, host: &str, key: &str) -> Result<Option<HostValue>> {
        match self.attributes.get(record_key(key, host))? {
            Some(bytes) => {
                let stored: StoredValue = serde_json::from_slice(&bytes).map_err(|e| {
                    StoreError::UnreadableRecord {
                        host: host.to_string(),
                        key: key.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Some(stored.into_host_value(host, key)))
            }
            None => Ok(None),
        }
    }

    fn put(&self, host: &str, key: &str, value: &str, origin: Option<&str>) -> Result<()> {
        check_name(key)?;
        if !self.has_host(host)? {
            return Err(StoreError::MissingHost(host.to_string()));
        }
        let stored = StoredValue {
            value: value.to_string(),
            origin: origin.map(str::to_string),
        };
        self.attributes
            .insert(record_key(key, host), serde_json::to_vec(&stored)?)?;
        Ok(())
    }

    fn scan_key<'a>(&'a self, key: &str) -> Scan<'a> {
        let key = key.to_string();
        let prefix = scan_prefix(&key);
        Box::new(
            self.attributes
                .scan_prefix(prefix)
                .map(move |entry| decode(&key, entry)),
        )
    }
}

impl std::fmt::Debug for SledStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledStore")
            .field("hosts", &self.hosts.len())
            .field("attributes", &self.len())
            .finish()
    }
}
