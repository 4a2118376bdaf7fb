//! Error types for the Docshelf core library.

use thiserror::Error;

/// All errors that can occur within the Docshelf core library.
///
/// These surface from storage backends and from settings handling. The
/// [`DocumentStore`](crate::DocumentStore) itself absorbs them: its mutating
/// operations never return an error.
#[derive(Debug, Error)]
pub enum DocshelfError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be encoded to or decoded from JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A write would grow the storage beyond its configured byte quota.
    #[error("Storage quota exceeded writing '{key}': {needed} bytes needed, limit is {limit}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    /// The backing storage facility is disabled or cannot be reached.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The opened file or directory is not valid Docshelf storage.
    #[error("Invalid storage: {0}")]
    InvalidStorage(String),
}

/// Convenience alias that pins the error type to [`DocshelfError`].
pub type Result<T> = std::result::Result<T, DocshelfError>;

impl DocshelfError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
            Self::QuotaExceeded { .. } => {
                "Storage is full; recent changes will be lost on restart".to_string()
            }
            Self::StorageUnavailable(_) => "Storage is not available".to_string(),
            Self::InvalidStorage(_) => "Could not open document storage".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_exceeded_message_names_key() {
        let e = DocshelfError::QuotaExceeded {
            key: "documents".to_string(),
            needed: 120,
            limit: 100,
        };
        assert!(e.to_string().contains("documents"));
        assert!(e.to_string().contains("120"));
        assert!(e.user_message().contains("full"));
    }

    #[test]
    fn test_json_error_converts() {
        let err = serde_json::from_str::<Vec<String>>("not json").unwrap_err();
        let e: DocshelfError = err.into();
        assert!(matches!(e, DocshelfError::Json(_)));
        assert!(e.user_message().starts_with("Data format error"));
    }
}
