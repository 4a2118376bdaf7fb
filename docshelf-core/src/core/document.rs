//! The document record and its closed classification enums.
//!
//! Field names and enum values serialize to the literal schema of the stored
//! collection (`nombre`, `tipo`, `fechaSubida`, ... with values such as
//! `"Imagen"` or `"activo"`), so existing stored data round-trips unchanged.
//!
//! ```rust
//! use docshelf_core::{Category, DocumentType};
//!
//! assert_eq!(serde_json::to_string(&DocumentType::Image).unwrap(), r#""Imagen""#);
//! assert_eq!(Category::Legal.default_subcategory(), "Contrato");
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The file format a document record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "Word")]
    Word,
    #[serde(rename = "Imagen")]
    Image,
}

impl DocumentType {
    /// All types in display order.
    pub const ALL: [DocumentType; 3] = [Self::Pdf, Self::Word, Self::Image];

    /// The stored literal for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Word => "Word",
            Self::Image => "Imagen",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a document is currently in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[default]
    #[serde(rename = "activo")]
    Active,
    #[serde(rename = "inactivo")]
    Inactive,
}

impl DocumentStatus {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }

    /// The stored literal for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "activo",
            Self::Inactive => "inactivo",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top level of the two-level classification taxonomy.
///
/// Each category owns a fixed, ordered list of subcategories. The list is
/// what a form offers; the store accepts any subcategory string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "Administrativo")]
    Administrative,
    #[serde(rename = "Financiero")]
    Financial,
    #[serde(rename = "Legal")]
    Legal,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 3] = [Self::Administrative, Self::Financial, Self::Legal];

    /// The stored literal for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Administrative => "Administrativo",
            Self::Financial => "Financiero",
            Self::Legal => "Legal",
        }
    }

    /// The subcategories offered for this category, in display order.
    pub fn subcategories(self) -> &'static [&'static str] {
        match self {
            Self::Administrative => &["Acta", "Memorando", "Circular", "Resolución"],
            Self::Financial => &["Factura", "Recibo", "Balance", "Estado Financiero"],
            Self::Legal => &["Contrato", "Poder", "Demanda", "Sentencia"],
        }
    }

    /// The first listed subcategory, preselected when the category is chosen.
    pub fn default_subcategory(self) -> &'static str {
        self.subcategories()[0]
    }

    /// Returns `true` if `subcategory` is one of this category's listed entries.
    pub fn accepts(self, subcategory: &str) -> bool {
        self.subcategories().contains(&subcategory)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metadata record describing one file-like artifact.
///
/// `id` and `upload_timestamp` are assigned by
/// [`DocumentStore::create`](crate::DocumentStore::create). An update replaces
/// the whole record, so callers carry the original timestamp through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub doc_type: DocumentType,
    /// ISO-8601 UTC instant, e.g. `2024-03-01T09:30:00.000Z`.
    #[serde(rename = "fechaSubida")]
    pub upload_timestamp: String,
    #[serde(rename = "estado")]
    pub status: DocumentStatus,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(rename = "subcategoria")]
    pub subcategory: String,
}

impl Document {
    /// Parses `upload_timestamp`, or `None` if the stored text is not RFC 3339.
    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.upload_timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Returns the editable fields of this record, e.g. to prefill an edit form.
    pub fn to_draft(&self) -> NewDocument {
        NewDocument {
            name: self.name.clone(),
            doc_type: self.doc_type,
            status: self.status,
            description: self.description.clone(),
            category: self.category,
            subcategory: self.subcategory.clone(),
        }
    }
}

/// Every document field except the store-assigned `id` and `upload_timestamp`.
///
/// The default is the blank form: an active PDF in the first subcategory of
/// [`Category::Administrative`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDocument {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub doc_type: DocumentType,
    #[serde(rename = "estado")]
    pub status: DocumentStatus,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(rename = "subcategoria")]
    pub subcategory: String,
}

impl Default for NewDocument {
    fn default() -> Self {
        Self {
            name: String::new(),
            doc_type: DocumentType::Pdf,
            status: DocumentStatus::Active,
            description: String::new(),
            category: Category::Administrative,
            subcategory: Category::Administrative.default_subcategory().to_string(),
        }
    }
}

impl NewDocument {
    /// Switches the category and resets the subcategory to its first entry.
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.subcategory = category.default_subcategory().to_string();
    }

    /// Combines the draft with an identity and timestamp into a full record.
    pub fn into_document(self, id: String, upload_timestamp: String) -> Document {
        Document {
            id,
            name: self.name,
            doc_type: self.doc_type,
            upload_timestamp,
            status: self.status,
            description: self.description,
            category: self.category,
            subcategory: self.subcategory,
        }
    }
}

/// Formats `now` the way upload timestamps are stored: UTC, milliseconds, `Z`.
pub(crate) fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
