//! In-memory store for tests and dry runs.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{HostValue, Result, StoreError, StoredValue};
use crate::store::{check_name, AttributeStore, Scan};

#[derive(Debug, Default)]
struct Inner {
    hosts: BTreeSet<String>,
    // (key, host) so one key's records are contiguous and host-ordered.
    values: BTreeMap<(String, String), StoredValue>,
}

/// A `BTreeMap`-backed store.
///
/// # Example
///
/// ```rust
/// use hostinfo_store::{AttributeStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.add_host("alpha").unwrap();
/// store.put("alpha", "os", "linux", None).unwrap();
///
/// let values: Vec<_> = store.scan_key("os").collect::<Result<_, _>>().unwrap();
/// assert_eq!(values[0].value, "linux");
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values across all hosts.
    pub fn len(&self) -> usize {
        self.read().values.len()
    }

    /// Returns true if no values are stored.
    pub fn is_empty(&self) -> bool {
        self.read().values.is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AttributeStore for MemoryStore {
    fn add_host(&self, host: &str) -> Result<bool> {
        check_name(host)?;
        Ok(self.write().hosts.insert(host.to_string()))
    }

    fn has_host(&self, host: &str) -> Result<bool> {
        Ok(self.read().hosts.contains(host))
    }

    fn hosts(&self) -> Result<Vec<String>> {
        Ok(self.read().hosts.iter().cloned().collect())
    }

    fn get(&self, host: &str, key: &str) -> Result<Option<HostValue>> {
        let inner = self.read();
        Ok(inner
            .values
            .get(&(key.to_string(), host.to_string()))
            .cloned()
            .map(|stored| stored.into_host_value(host, key)))
    }

    fn put(&self, host: &str, key: &str, value: &str, origin: Option<&str>) -> Result<()> {
        check_name(key)?;
        let mut inner = self.write();
        if !inner.hosts.contains(host) {
            return Err(StoreError::MissingHost(host.to_string()));
        }
        inner.values.insert(
            (key.to_string(), host.to_string()),
            StoredValue {
                value: value.to_string(),
                origin: origin.map(str::to_string),
            },
        );
        Ok(())
    }

    fn scan_key<'a>(&'a self, key: &str) -> Scan<'a> {
        let inner = self.read();
        let records: Vec<Result<HostValue>> = inner
            .values
            .range((key.to_string(), String::new())..)
            .take_while(|((k, _), _)| k == key)
            .map(|((k, host), stored)| Ok(stored.clone().into_host_value(host, k)))
            .collect();
        Box::new(records.into_iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> MemoryStore {
        let store = MemoryStore::new();
        for host in ["gamma", "alpha", "beta"] {
            store.add_host(host).unwrap();
        }
        store.put("gamma", "os", "solaris", None).unwrap();
        store.put("alpha", "os", "linux", Some("import")).unwrap();
        store.put("beta", "site", "melbourne", None).unwrap();
        store
    }

    #[test]
    fn test_add_host_reports_new() {
        let store = MemoryStore::new();
        assert!(store.add_host("alpha").unwrap());
        assert!(!store.add_host("alpha").unwrap());
        assert!(store.has_host("alpha").unwrap());
        assert!(!store.has_host("beta").unwrap());
    }

    #[test]
    fn test_hosts_are_ordered() {
        assert_eq!(populated().hosts().unwrap(), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_put_overwrites() {
        let store = populated();
        store.put("alpha", "os", "aix", None).unwrap();
        let value = store.get("alpha", "os").unwrap().unwrap();
        assert_eq!(value.value, "aix");
        assert_eq!(value.origin, None);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_put_unknown_host() {
        let err = MemoryStore::new().put("ghost", "os", "linux", None).unwrap_err();
        assert!(matches!(err, StoreError::MissingHost(h) if h == "ghost"));
    }

    #[test]
    fn test_scan_key_only_that_key_in_host_order() {
        let store = populated();
        let hosts: Vec<String> = store
            .scan_key("os")
            .map(|r| r.unwrap().host)
            .collect();
        assert_eq!(hosts, vec!["alpha", "gamma"]);
        assert_eq!(store.scan_key("rack").count(), 0);
    }

    #[test]
    fn test_scan_key_does_not_match_prefix() {
        let store = populated();
        store.put("alpha", "osrev", "7.2", None).unwrap();
        assert_eq!(store.scan_key("os").count(), 2);
        assert_eq!(store.scan_key("osrev").count(), 1);
    }

    #[test]
    fn test_invalid_names() {
        let store = MemoryStore::new();
        assert!(matches!(store.add_host(""), Err(StoreError::InvalidName(_))));
        store.add_host("alpha").unwrap();
        assert!(matches!(
            store.put("alpha", "bad\0key", "x", None),
            Err(StoreError::InvalidName(_))
        ));
    }
}
