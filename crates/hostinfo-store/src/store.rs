//! # Attribute Store Seam
//!
//! The importer writes through this trait and the auditor reads through it.
//! Backends take `&self` on every method so one store can be shared by the
//! audit passes running on separate threads.

use crate::models::{HostValue, Result, StoreError};

/// Iterator over one key's records. Unreadable records appear as `Err`
/// items without ending the scan.
pub type Scan<'a> = Box<dyn Iterator<Item = Result<HostValue>> + 'a>;

/// Host and attribute persistence.
pub trait AttributeStore: Send + Sync {
    /// Adds a host. Returns `false` if it already existed.
    fn add_host(&self, host: &str) -> Result<bool>;

    /// Returns true if the host exists.
    fn has_host(&self, host: &str) -> Result<bool>;

    /// All hosts in order.
    fn hosts(&self) -> Result<Vec<String>>;

    /// One host's value for a key.
    fn get(&self, host: &str, key: &str) -> Result<Option<HostValue>>;

    /// Stores a value, replacing any previous value for the pair.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingHost`] if the host was never added.
    fn put(&self, host: &str, key: &str, value: &str, origin: Option<&str>) -> Result<()>;

    /// Every host defining `key`, in host order.
    fn scan_key<'a>(&'a self, key: &str) -> Scan<'a>;
}

impl<S: AttributeStore + ?Sized> AttributeStore for &S {
    fn add_host(&self, host: &str) -> Result<bool> {
        (**self).add_host(host)
    }

    fn has_host(&self, host: &str) -> Result<bool> {
        (**self).has_host(host)
    }

    fn hosts(&self) -> Result<Vec<String>> {
        (**self).hosts()
    }

    fn get(&self, host: &str, key: &str) -> Result<Option<HostValue>> {
        (**self).get(host, key)
    }

    fn put(&self, host: &str, key: &str, value: &str, origin: Option<&str>) -> Result<()> {
        (**self).put(host, key, value, origin)
    }

    fn scan_key<'a>(&'a self, key: &str) -> Scan<'a> {
        (**self).scan_key(key)
    }
}

/// Rejects names the record key encoding cannot hold.
pub(crate) fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('\0') {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}
