//! The authoritative document collection and its mutations.

use crate::core::document::timestamp_now;
use crate::{
    Category, Document, DocumentFilter, DocumentType, NewDocument, PersistentCell, StorageBackend,
};
use uuid::Uuid;

/// Storage key under which the whole collection is persisted.
pub const DOCUMENTS_KEY: &str = "documents";

/// The in-memory document collection, written through to a storage backend.
///
/// Every mutation persists the full collection before returning. None of the
/// operations report errors: storage failures are logged by the underlying
/// [`PersistentCell`] and can be observed through [`is_persisted`](Self::is_persisted).
/// Updating or deleting an unknown id is a silent no-op.
///
/// The collection keeps insertion order.
pub struct DocumentStore<B> {
    cell: PersistentCell<Vec<Document>, B>,
}

impl<B: StorageBackend> DocumentStore<B> {
    /// Loads the collection stored under [`DOCUMENTS_KEY`] in `backend`.
    ///
    /// An unreadable or missing collection starts out empty.
    pub fn open(backend: B) -> Self {
        Self::open_with_key(backend, DOCUMENTS_KEY)
    }

    /// Loads the collection stored under `key` in `backend`.
    pub fn open_with_key(backend: B, key: &str) -> Self {
        let cell = PersistentCell::initialize(backend, key, Vec::new());
        log::debug!("opened document store '{}' with {} documents", key, cell.get().len());
        Self { cell }
    }

    /// Every document, in insertion order.
    pub fn documents(&self) -> &[Document] {
        self.cell.get()
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents().iter().find(|doc| doc.id == id)
    }

    pub fn len(&self) -> usize {
        self.documents().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents().is_empty()
    }

    /// `false` if the last write did not reach storage.
    pub fn is_persisted(&self) -> bool {
        self.cell.is_persisted()
    }

    /// Appends a new document built from `fields`, assigning a fresh id and
    /// the current instant as its upload timestamp.
    ///
    /// Returns a copy of the stored record.
    pub fn create(&mut self, fields: NewDocument) -> Document {
        let doc = fields.into_document(Uuid::new_v4().to_string(), timestamp_now());
        let created = doc.clone();
        self.cell.update(move |docs| {
            let mut next = docs.clone();
            next.push(doc);
            next
        });
        log::debug!("created document {}", created.id);
        created
    }

    /// Replaces the document whose id matches `document.id` with `document`
    /// verbatim, including its upload timestamp.
    pub fn update(&mut self, document: Document) {
        if self.get(&document.id).is_none() {
            log::debug!("update ignored, no document {}", document.id);
            return;
        }
        self.cell.update(move |docs| {
            docs.iter()
                .map(|doc| {
                    if doc.id == document.id {
                        document.clone()
                    } else {
                        doc.clone()
                    }
                })
                .collect()
        });
    }

    /// Removes the document with `id`, if present.
    pub fn delete(&mut self, id: &str) {
        if self.get(id).is_none() {
            log::debug!("delete ignored, no document {id}");
            return;
        }
        self.cell
            .update(|docs| docs.iter().filter(|doc| doc.id != id).cloned().collect());
    }

    /// Documents matching every supplied classification criterion, in
    /// collection order. `None` or an empty subcategory matches everything.
    pub fn filter(
        &self,
        category: Option<Category>,
        subcategory: Option<&str>,
        doc_type: Option<DocumentType>,
    ) -> Vec<Document> {
        self.search(&DocumentFilter::new(category, subcategory, doc_type))
    }

    /// Documents satisfying `filter`, including its search term, in
    /// collection order.
    pub fn search(&self, filter: &DocumentFilter) -> Vec<Document> {
        self.documents()
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect()
    }

    /// Consumes the store, returning its backend.
    pub fn into_backend(self) -> B {
        self.cell.into_backend()
    }
}
