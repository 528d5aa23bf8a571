//! Field Burn - place UI fields into PDF page space and burn them in
//!
//! This crate provides:
//! - The field data model produced by the placement UI
//! - Coordinate transformation from percentage placement to PDF points
//! - Aspect-preserving image fitting
//! - Batch and single-image burn-in with deterministic output
//! - SHA-256 content hashing of documents
//!
//! # Example
//!
//! ```ignore
//! use field_burn::{burn, BurnOptions, Field};
//!
//! let fields: Vec<Field> = serde_json::from_str(fields_json)?;
//! let output = burn(&pdf_bytes, &fields, &BurnOptions::default())?;
//! println!("signed document hash: {}", output.hash);
//! ```

mod burner;
mod field;
mod geometry;
mod hash;
mod options;
mod payload;

pub use burner::{burn, burn_one, BurnOutput};
pub use field::{Field, FieldKind};
pub use geometry::{clamp_page, fit_image, resolve, resolve_field, Coordinates, PagePolicy, Placement};
pub use hash::{artifact_id, content_hash, ARTIFACT_ID_LEN};
pub use options::BurnOptions;
pub use payload::decode_image_payload;

use pdf_core::PdfError;
use thiserror::Error;

/// Errors that can occur while resolving or burning fields
///
/// Errors raised while drawing a field name the field id and the page it
/// was resolved to.
#[derive(Debug, Error)]
pub enum BurnError {
    #[error("Invalid input{}: {message}", location_suffix(.field, .page))]
    Validation {
        field: Option<String>,
        page: Option<usize>,
        message: String,
    },

    #[error("Failed to decode PDF: {0}")]
    Decode(String),

    #[error("Page {page} out of range{} (document has {page_count} pages)", location_suffix(.field, &None))]
    PageIndexOutOfRange {
        field: Option<String>,
        page: usize,
        page_count: usize,
    },

    #[error("Unsupported image format{}: {message}", location_suffix(.field, .page))]
    UnsupportedImageFormat {
        field: Option<String>,
        page: Option<usize>,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

fn location_suffix(field: &Option<String>, page: &Option<usize>) -> String {
    match (field, page) {
        (Some(id), Some(page)) => format!(" for field {id} on page {page}"),
        (Some(id), None) => format!(" for field {id}"),
        (None, Some(page)) => format!(" on page {page}"),
        (None, None) => String::new(),
    }
}

impl BurnError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        BurnError::Validation {
            field: None,
            page: None,
            message: message.into(),
        }
    }

    /// Attach a field id to the error if it does not name one yet
    pub fn with_field(self, id: &str) -> Self {
        match self {
            BurnError::Validation {
                field: None,
                page,
                message,
            } => BurnError::Validation {
                field: Some(id.to_string()),
                page,
                message,
            },
            BurnError::PageIndexOutOfRange {
                field: None,
                page,
                page_count,
            } => BurnError::PageIndexOutOfRange {
                field: Some(id.to_string()),
                page,
                page_count,
            },
            BurnError::UnsupportedImageFormat {
                field: None,
                page,
                message,
            } => BurnError::UnsupportedImageFormat {
                field: Some(id.to_string()),
                page,
                message,
            },
            other => other,
        }
    }

    /// Attach the page being drawn if the error does not name one yet
    pub fn on_page(self, page: usize) -> Self {
        match self {
            BurnError::Validation {
                field,
                page: None,
                message,
            } => BurnError::Validation {
                field,
                page: Some(page),
                message,
            },
            BurnError::UnsupportedImageFormat {
                field,
                page: None,
                message,
            } => BurnError::UnsupportedImageFormat {
                field,
                page: Some(page),
                message,
            },
            other => other,
        }
    }

    /// Page the error refers to, if any
    pub fn page(&self) -> Option<usize> {
        match self {
            BurnError::Validation { page, .. } | BurnError::UnsupportedImageFormat { page, .. } => *page,
            BurnError::PageIndexOutOfRange { page, .. } => Some(*page),
            _ => None,
        }
    }
}

impl From<PdfError> for BurnError {
    fn from(err: PdfError) -> Self {
        match err {
            PdfError::DecodeError(message) => BurnError::Decode(message),
            PdfError::InvalidPage(page, page_count) => BurnError::PageIndexOutOfRange {
                field: None,
                page,
                page_count,
            },
            PdfError::UnsupportedImageFormat(message) | PdfError::ImageError(message) => {
                BurnError::UnsupportedImageFormat {
                    field: None,
                    page: None,
                    message,
                }
            }
            other => BurnError::Internal(other.to_string()),
        }
    }
}

/// Result type for burn operations
pub type Result<T> = std::result::Result<T, BurnError>;
