//! Core library for Docshelf, a local-first catalog of document metadata.
//!
//! The primary entry point is [`DocumentStore`], which owns the full document
//! collection and persists it through a [`PersistentCell`] on top of any
//! [`StorageBackend`]. All document mutations go through `DocumentStore` methods.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    backend::{MemoryBackend, StorageBackend},
    cell::PersistentCell,
    document::{Category, Document, DocumentStatus, DocumentType, NewDocument},
    error::{DocshelfError, Result},
    file_backend::FileBackend,
    filter::DocumentFilter,
    settings::{load_settings, open_configured_store, save_settings, AppSettings, BackendKind},
    storage::SqliteBackend,
    store::{DocumentStore, DOCUMENTS_KEY},
};
