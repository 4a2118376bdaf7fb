//! Typed filter criteria applied by [`DocumentStore::search`](crate::DocumentStore::search).

use crate::{Category, Document, DocumentType};
use serde::{Deserialize, Serialize};

/// Criteria a document must satisfy to be listed.
///
/// Every criterion is optional; an unset or empty one matches everything.
/// `category`, `subcategory` and `doc_type` compare by exact equality.
/// `search_term` is trimmed and matches case-insensitively against the name
/// or description; a whitespace-only term matches everything.
///
/// ```rust
/// use docshelf_core::{Category, DocumentFilter};
///
/// let mut filter = DocumentFilter::default();
/// filter.set_category(Some(Category::Legal));
/// filter.subcategory = Some("Contrato".to_string());
/// assert_eq!(filter.active_count(), 2);
///
/// filter.set_category(Some(Category::Financial));
/// assert_eq!(filter.subcategory, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<DocumentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
}

impl DocumentFilter {
    /// Filter on the three classification criteria, without a search term.
    pub fn new(
        category: Option<Category>,
        subcategory: Option<&str>,
        doc_type: Option<DocumentType>,
    ) -> Self {
        Self {
            category,
            subcategory: subcategory.map(str::to_string),
            doc_type,
            search_term: None,
        }
    }

    /// Sets the category criterion and clears the subcategory criterion.
    pub fn set_category(&mut self, category: Option<Category>) {
        self.category = category;
        self.subcategory = None;
    }

    /// Resets every criterion.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Number of criteria that currently narrow the result.
    pub fn active_count(&self) -> usize {
        [
            self.category.is_some(),
            non_empty(&self.subcategory).is_some(),
            self.doc_type.is_some(),
            non_blank(&self.search_term).is_some(),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Returns `true` if `doc` satisfies every active criterion.
    pub fn matches(&self, doc: &Document) -> bool {
        if self.category.is_some_and(|c| c != doc.category) {
            return false;
        }
        if non_empty(&self.subcategory).is_some_and(|s| s != doc.subcategory) {
            return false;
        }
        if self.doc_type.is_some_and(|t| t != doc.doc_type) {
            return false;
        }
        match non_blank(&self.search_term) {
            Some(term) => {
                let needle = term.trim().to_lowercase();
                doc.name.to_lowercase().contains(&needle)
                    || doc.description.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
