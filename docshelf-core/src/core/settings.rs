//! Application settings persistence for Docshelf.
//!
//! Stores user preferences (data directory, storage key, backend) in a JSON
//! file at an OS-appropriate location, and opens the configured document store.

use crate::{DocumentStore, FileBackend, Result, SqliteBackend, StorageBackend, DOCUMENTS_KEY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory name used under the platform config and documents folders.
const APP_NAME: &str = "Docshelf";

const SETTINGS_FILE: &str = "settings.json";

/// File name of the SQLite database inside the data directory.
const DATABASE_FILE: &str = "docshelf.db";

/// Which [`StorageBackend`] holds the document collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// One JSON file per key in the data directory.
    #[default]
    File,
    /// A single SQLite database in the data directory.
    Sqlite,
}

/// Persisted application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Directory holding the document storage.
    pub data_directory: String,
    /// Key the collection is stored under.
    pub storage_key: String,
    pub backend: BackendKind,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory().to_string_lossy().to_string(),
            storage_key: DOCUMENTS_KEY.to_string(),
            backend: BackendKind::default(),
        }
    }
}

/// Returns the path to the settings JSON file.
///
/// - macOS / Linux: `~/.config/docshelf/settings.json`
/// - Windows: `%APPDATA%/Docshelf/settings.json`
pub fn settings_file_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    let dir = app_dir(dirs::config_dir(), APP_NAME);
    #[cfg(not(target_os = "windows"))]
    let dir = app_dir(
        dirs::home_dir().map(|home| home.join(".config")),
        &APP_NAME.to_lowercase(),
    );
    dir.join(SETTINGS_FILE)
}

/// Returns the default data directory: `~/Documents/Docshelf`.
pub fn default_data_directory() -> PathBuf {
    let documents = dirs::document_dir().or_else(|| dirs::home_dir().map(|home| home.join("Documents")));
    app_dir(documents, APP_NAME)
}

/// `base/name`, or `./name` when the platform directory is unknown.
fn app_dir(base: Option<PathBuf>, name: &str) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join(name)
}

/// Loads settings from the default location; returns defaults if the file is missing or corrupt.
pub fn load_settings() -> AppSettings {
    load_settings_from(settings_file_path())
}

/// Loads settings from `path`; returns defaults if the file is missing or corrupt.
pub fn load_settings_from<P: AsRef<Path>>(path: P) -> AppSettings {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring corrupt settings file {}: {e}", path.display());
            AppSettings::default()
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => AppSettings::default(),
        Err(e) => {
            log::warn!("cannot read settings file {}: {e}", path.display());
            AppSettings::default()
        }
    }
}

/// Saves settings to the default location, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`crate::DocshelfError::Io`] if the file cannot be written.
pub fn save_settings(settings: &AppSettings) -> Result<()> {
    save_settings_to(settings, settings_file_path())
}

/// Saves settings to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`crate::DocshelfError::Io`] if the file cannot be written, or
/// [`crate::DocshelfError::Json`] if the settings cannot be serialized.
pub fn save_settings_to<P: AsRef<Path>>(settings: &AppSettings, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}

/// Opens the document store described by `settings`.
///
/// # Errors
///
/// Returns an error if the data directory or database cannot be created.
/// Once open, the store itself never fails.
pub fn open_configured_store(
    settings: &AppSettings,
) -> Result<DocumentStore<Box<dyn StorageBackend>>> {
    let dir = PathBuf::from(&settings.data_directory);
    let backend: Box<dyn StorageBackend> = match settings.backend {
        BackendKind::File => Box::new(FileBackend::new(&dir)?),
        BackendKind::Sqlite => {
            fs::create_dir_all(&dir)?;
            Box::new(SqliteBackend::create(dir.join(DATABASE_FILE))?)
        }
    };
    log::info!(
        "opening {:?} document store in {}",
        settings.backend,
        dir.display()
    );
    Ok(DocumentStore::open_with_key(backend, &settings.storage_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, NewDocument};
    use tempfile::TempDir;

    fn settings_in(dir: &Path, backend: BackendKind) -> AppSettings {
        AppSettings {
            data_directory: dir.join("data").to_string_lossy().to_string(),
            storage_key: DOCUMENTS_KEY.to_string(),
            backend,
        }
    }

    #[test]
    fn test_defaults_use_documents_key_and_file_backend() {
        let settings = AppSettings::default();
        assert_eq!(settings.storage_key, "documents");
        assert_eq!(settings.backend, BackendKind::File);
        assert!(settings.data_directory.ends_with("Docshelf"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = settings_in(dir.path(), BackendKind::Sqlite);

        save_settings_to(&settings, &path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"dataDirectory\""));
        assert!(raw.contains("\"backend\": \"sqlite\""));

        assert_eq!(load_settings_from(&path), settings);
    }

    #[test]
    fn test_missing_or_corrupt_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(load_settings_from(&path), AppSettings::default());

        std::fs::write(&path, "{ nope").unwrap();
        assert_eq!(load_settings_from(&path), AppSettings::default());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"storageKey":"archive"}"#).unwrap();

        let settings = load_settings_from(&path);
        assert_eq!(settings.storage_key, "archive");
        assert_eq!(settings.backend, BackendKind::File);
    }

    #[test]
    fn test_app_dir_falls_back_to_working_directory() {
        assert_eq!(
            app_dir(Some(PathBuf::from("/base")), "Docshelf"),
            PathBuf::from("/base/Docshelf")
        );
        assert_eq!(app_dir(None, "docshelf"), PathBuf::from("./docshelf"));
        assert!(settings_file_path().ends_with("settings.json"));
    }

    #[test]
    fn test_unreadable_settings_path_yields_defaults() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a file.
        assert_eq!(load_settings_from(dir.path()), AppSettings::default());
    }

    #[test]
    fn test_open_configured_store_persists_for_each_backend() {
        for kind in [BackendKind::File, BackendKind::Sqlite] {
            let dir = TempDir::new().unwrap();
            let settings = settings_in(dir.path(), kind);

            let created = {
                let mut store = open_configured_store(&settings).unwrap();
                let mut draft = NewDocument::default();
                draft.set_category(Category::Legal);
                store.create(draft)
            };

            let store = open_configured_store(&settings).unwrap();
            assert_eq!(store.documents(), &[created], "backend {kind:?}");
        }
    }
}
