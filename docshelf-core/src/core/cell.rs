//! A single JSON value mirrored in memory and persisted under one storage key.
//!
//! Storage failures never escape a [`PersistentCell`]. A failed or garbled
//! read yields the default value; a failed write is logged and the in-memory
//! mirror keeps the new value anyway, so memory and storage can diverge until
//! the next successful write. [`PersistentCell::is_persisted`] reports that
//! divergence.
//!
//! ```rust
//! use docshelf_core::{MemoryBackend, PersistentCell};
//!
//! let mut cell = PersistentCell::initialize(MemoryBackend::new(), "counter", 0u32);
//! cell.update(|n| n + 1);
//! assert_eq!(*cell.get(), 1);
//! assert!(cell.is_persisted());
//! ```

use crate::StorageBackend;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// One named value with an in-memory mirror and a durable copy in `B`.
pub struct PersistentCell<T, B> {
    key: String,
    value: T,
    backend: B,
    persisted: bool,
}

impl<T, B> PersistentCell<T, B>
where
    T: Serialize + DeserializeOwned,
    B: StorageBackend,
{
    /// Loads the value stored at `key`, or `default` if it is absent or unreadable.
    pub fn initialize(backend: B, key: impl Into<String>, default: T) -> Self {
        let key = key.into();
        let value = match backend.get_item(&key) {
            Ok(Some(raw)) if !raw.is_empty() => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    log::error!("discarding undecodable value at '{key}': {e}");
                    default
                }
            },
            Ok(_) => {
                log::debug!("no stored value at '{key}', using default");
                default
            }
            Err(e) => {
                log::error!("failed to read '{key}': {e}");
                default
            }
        };

        Self {
            key,
            value,
            backend,
            persisted: true,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// `false` after a write failed, until a later write succeeds.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Replaces the value and writes it through to storage.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.persist();
    }

    /// Replaces the value with `f(current)` and writes it through to storage.
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.value);
        self.set(next);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consumes the cell, returning the backend it wrote to.
    pub fn into_backend(self) -> B {
        self.backend
    }

    fn persist(&mut self) {
        let encoded = match serde_json::to_string(&self.value) {
            Ok(encoded) => encoded,
            Err(e) => {
                log::error!("failed to encode value for '{}': {e}", self.key);
                self.persisted = false;
                return;
            }
        };
        match self.backend.set_item(&self.key, &encoded) {
            Ok(()) => self.persisted = true,
            Err(e) => {
                log::error!("failed to write '{}': {e}", self.key);
                self.persisted = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::FlakyBackend;
    use crate::MemoryBackend;

    #[test]
    fn test_initialize_reads_stored_value() {
        let mut backend = MemoryBackend::new();
        backend.set_item("names", r#"["a","b"]"#).unwrap();

        let cell = PersistentCell::initialize(backend, "names", Vec::<String>::new());
        assert_eq!(cell.get(), &vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_initialize_absent_key_uses_default() {
        let cell = PersistentCell::initialize(MemoryBackend::new(), "names", vec!["x".to_string()]);
        assert_eq!(cell.get(), &vec!["x".to_string()]);
        assert!(cell.is_persisted());
    }

    #[test]
    fn test_initialize_empty_string_uses_default() {
        let mut backend = MemoryBackend::new();
        backend.set_item("n", "").unwrap();
        let cell = PersistentCell::initialize(backend, "n", 7i32);
        assert_eq!(*cell.get(), 7);
    }

    #[test]
    fn test_initialize_corrupt_json_uses_default() {
        let mut backend = MemoryBackend::new();
        backend.set_item("n", "{not json").unwrap();
        let cell = PersistentCell::initialize(backend, "n", 7i32);
        assert_eq!(*cell.get(), 7);
    }

    #[test]
    fn test_initialize_read_failure_uses_default() {
        let backend = FlakyBackend {
            fail_reads: true,
            ..FlakyBackend::default()
        };
        let cell = PersistentCell::initialize(backend, "n", 7i32);
        assert_eq!(*cell.get(), 7);
    }

    #[test]
    fn test_set_writes_through() {
        let mut cell = PersistentCell::initialize(MemoryBackend::new(), "n", 0i32);
        cell.set(42);
        assert_eq!(cell.backend().get_item("n").unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn test_update_applies_to_current_value() {
        let mut cell = PersistentCell::initialize(MemoryBackend::new(), "n", 10i32);
        cell.update(|n| n * 2);
        cell.update(|n| n + 1);
        assert_eq!(*cell.get(), 21);
        assert_eq!(cell.backend().get_item("n").unwrap().as_deref(), Some("21"));
    }

    #[test]
    fn test_write_failure_keeps_mirror_and_flags_divergence() {
        let backend = FlakyBackend {
            fail_writes: true,
            ..FlakyBackend::default()
        };
        let mut cell = PersistentCell::initialize(backend, "n", 1i32);
        cell.set(2);

        assert_eq!(*cell.get(), 2);
        assert!(!cell.is_persisted());
        assert_eq!(cell.backend().inner.get_item("n").unwrap(), None);
    }

    #[test]
    fn test_successful_write_clears_divergence() {
        let backend = FlakyBackend {
            fail_writes: true,
            ..FlakyBackend::default()
        };
        let mut cell = PersistentCell::initialize(backend, "n", 1i32);
        cell.set(2);
        assert!(!cell.is_persisted());

        cell.backend_mut().fail_writes = false;
        cell.set(3);
        assert!(cell.is_persisted());
        assert_eq!(cell.backend().inner.get_item("n").unwrap().as_deref(), Some("3"));
    }
}
