//! The synchronous key-value facility that persistent cells write through.

use crate::{DocshelfError, Result};
use std::collections::HashMap;

/// A synchronous string key-value store.
///
/// Implementations hold raw serialized text; JSON encoding is the caller's
/// concern. Every call completes before returning.
pub trait StorageBackend {
    /// Returns the value stored at `key`, or `None` if nothing is stored there.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` at `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected, e.g.
    /// [`DocshelfError::QuotaExceeded`].
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes the value at `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

/// An in-process backend, optionally capped at a byte quota.
///
/// Usage is counted as the byte length of every key plus its value. A write
/// that would push usage past the quota is rejected and leaves the previous
/// value in place.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    items: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty backend that rejects writes beyond `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Total bytes currently held, keys included.
    pub fn used_bytes(&self) -> usize {
        self.items.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(limit) = self.quota {
            let replaced = self.items.get(key).map_or(0, |old| key.len() + old.len());
            let needed = self.used_bytes() - replaced + key.len() + value.len();
            if needed > limit {
                return Err(DocshelfError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// A backend whose reads and writes can be made to fail on demand.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FlakyBackend {
    pub(crate) inner: MemoryBackend,
    pub(crate) fail_reads: bool,
    pub(crate) fail_writes: bool,
}

#[cfg(test)]
impl StorageBackend for FlakyBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads {
            return Err(DocshelfError::StorageUnavailable("reads disabled".to_string()));
        }
        self.inner.get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(DocshelfError::StorageUnavailable("writes disabled".to_string()));
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.inner.remove_item(key)
    }
}
