//! PDF Core - Low-level PDF overlay drawing
//!
//! This crate provides functionality for:
//! - Decoding PDF documents from bytes and re-serializing them deterministically
//! - Reading page geometry (MediaBox, inherited through the page tree)
//! - Drawing text with the standard Helvetica fonts
//! - Drawing filled circles
//! - Embedding raster images (PNG with alpha, JPEG)
//!
//! All page indexes in this crate are zero-based.
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Color, PdfDocument, StandardFont};
//!
//! let mut doc = PdfDocument::open_from_bytes(&bytes)?;
//! let page = doc.page_geometry(0)?;
//! doc.draw_text(0, "Hello", 72.0, page.height - 72.0, StandardFont::Helvetica, 11.0, Color::black())?;
//! let output = doc.to_bytes()?;
//! ```

mod document;
mod image;
mod page;
mod sample;
mod shapes;
mod text;

pub use document::{Color, PdfDocument};
pub use image::{fit_within, ImageXObject};
pub use page::PageGeometry;
pub use sample::{blank_document, sample_document};
pub use shapes::generate_circle_operators;
pub use text::{encode_win_ansi, generate_text_operators, StandardFont, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to decode PDF: {0}")]
    DecodeError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Invalid page index: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;
