//! Directory-backed key-value storage: one `<key>.json` file per key.

use crate::{DocshelfError, Result, StorageBackend};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A [`StorageBackend`] that stores each key as a file inside `dir`.
///
/// Writes go to a sibling `.tmp` file first and are renamed into place, so a
/// crash mid-write leaves the previous value readable.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Uses `dir` as the storage directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DocshelfError::Io`] if the directory cannot be created, or
    /// [`DocshelfError::InvalidStorage`] if `dir` exists but is not a directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if dir.exists() && !dir.is_dir() {
            return Err(DocshelfError::InvalidStorage(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(DocshelfError::StorageUnavailable(format!(
                "key '{key}' cannot be used as a file name"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl StorageBackend for FileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                log::warn!("failed to remove {}: {cleanup}", tmp.display());
            }
            return Err(e.into());
        }
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_round_trip_on_disk() {
        let dir = TempDir::new().unwrap();
        let mut backend = FileBackend::new(dir.path()).unwrap();
        backend.set_item("documents", r#"[{"id":"1"}]"#).unwrap();

        assert!(dir.path().join("documents.json").exists());
        assert!(!dir.path().join("documents.json.tmp").exists());

        let reopened = FileBackend::new(dir.path()).unwrap();
        assert_eq!(
            reopened.get_item("documents").unwrap().as_deref(),
            Some(r#"[{"id":"1"}]"#)
        );
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("documents.json");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("occupied"), "x").unwrap();

        let mut backend = FileBackend::new(dir.path()).unwrap();
        assert!(matches!(
            backend.set_item("documents", "[]"),
            Err(DocshelfError::Io(_))
        ));
        assert!(!dir.path().join("documents.json.tmp").exists());
    }

    #[test]
    fn test_missing_key_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();
        assert_eq!(backend.get_item("documents").unwrap(), None);
    }

    #[test]
    fn test_creates_nested_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let backend = FileBackend::new(&nested).unwrap();
        assert!(backend.dir().is_dir());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let mut backend = FileBackend::new(dir.path()).unwrap();
        assert!(backend.set_item("../escape", "x").is_err());
        assert!(backend.set_item("", "x").is_err());
        assert!(backend.get_item(".hidden").is_err());
    }

    #[test]
    fn test_rejects_file_as_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain");
        std::fs::write(&file, "x").unwrap();
        assert!(matches!(
            FileBackend::new(&file),
            Err(DocshelfError::InvalidStorage(_))
        ));
    }

    #[test]
    fn test_remove_item_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut backend = FileBackend::new(dir.path()).unwrap();
        backend.set_item("k", "v").unwrap();
        backend.remove_item("k").unwrap();
        backend.remove_item("k").unwrap();
        assert_eq!(backend.get_item("k").unwrap(), None);
    }
}
