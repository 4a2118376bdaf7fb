//! Internal domain modules for the Docshelf core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod backend;
pub mod cell;
pub mod document;
pub mod error;
pub mod file_backend;
pub mod filter;
pub mod settings;
pub mod storage;
pub mod store;

#[doc(inline)]
pub use backend::{MemoryBackend, StorageBackend};
#[doc(inline)]
pub use cell::PersistentCell;
#[doc(inline)]
pub use document::{Category, Document, DocumentStatus, DocumentType, NewDocument};
#[doc(inline)]
pub use error::{DocshelfError, Result};
#[doc(inline)]
pub use file_backend::FileBackend;
#[doc(inline)]
pub use filter::DocumentFilter;
#[doc(inline)]
pub use settings::{AppSettings, BackendKind};
#[doc(inline)]
pub use storage::SqliteBackend;
#[doc(inline)]
pub use store::{DocumentStore, DOCUMENTS_KEY};
