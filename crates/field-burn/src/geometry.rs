//! Coordinate transformation
//!
//! The UI places fields in percent of the rendered page with the origin at
//! the top-left corner. PDF pages use points with the origin at the
//! bottom-left corner of the MediaBox. Everything here is a pure function of
//! the page geometry and the placement.

use crate::field::Field;
use crate::{BurnError, Result};
use pdf_core::{fit_within, PageGeometry, PdfDocument};
use serde::{Deserialize, Serialize};

/// Box in percent (0-100) of the rendered page, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Placement {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check that the box is finite with a positive size
    pub fn validate(&self) -> Result<()> {
        validate_box(self.x, self.y, self.width, self.height)
    }
}

/// Box in PDF points, bottom-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Zero-based page index
    #[serde(default)]
    pub page: usize,
}

impl Coordinates {
    /// Check that the box is finite with a positive size
    pub fn validate(&self) -> Result<()> {
        validate_box(self.x, self.y, self.width, self.height)
    }
}

fn validate_box(x: f64, y: f64, width: f64, height: f64) -> Result<()> {
    if ![x, y, width, height].iter().all(|v| v.is_finite()) {
        return Err(BurnError::validation("coordinates must be finite numbers"));
    }
    if width <= 0.0 || height <= 0.0 {
        return Err(BurnError::validation(format!(
            "width and height must be positive (got {width} x {height})"
        )));
    }
    Ok(())
}

/// How to treat a page index past the end of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagePolicy {
    /// Use the last page
    #[default]
    Clamp,
    /// Fail with `PageIndexOutOfRange`
    Strict,
}

/// Map a percentage placement onto a page
///
/// ```text
/// x'      = originX + x / 100 * W
/// width'  = width / 100 * W
/// height' = height / 100 * H
/// y'      = originY + H - (y / 100 * H + height')
/// ```
pub fn resolve(page: &PageGeometry, placement: &Placement) -> Coordinates {
    let width = placement.width / 100.0 * page.width;
    let height = placement.height / 100.0 * page.height;
    let top = placement.y / 100.0 * page.height;

    Coordinates {
        x: page.origin_x + placement.x / 100.0 * page.width,
        y: page.origin_y + page.height - (top + height),
        width,
        height,
        page: page.page_index,
    }
}

/// Clamp a page index to the last page of a document
pub fn clamp_page(page: usize, page_count: usize) -> usize {
    page.min(page_count.saturating_sub(1))
}

/// Resolve a field against the page it is placed on
pub fn resolve_field(doc: &PdfDocument, field: &Field, policy: PagePolicy) -> Result<Coordinates> {
    let page_count = doc.page_count();
    let page = match policy {
        PagePolicy::Strict if field.page >= page_count => {
            return Err(BurnError::PageIndexOutOfRange {
                field: Some(field.id.clone()),
                page: field.page,
                page_count,
            });
        }
        PagePolicy::Strict => field.page,
        PagePolicy::Clamp => {
            let page = clamp_page(field.page, page_count);
            if page != field.page {
                tracing::warn!(
                    field = %field.id,
                    requested = field.page,
                    page,
                    "page index past end of document, using last page"
                );
            }
            page
        }
    };

    let geometry = doc
        .page_geometry(page)
        .map_err(|e| BurnError::from(e).with_field(&field.id))?;

    Ok(resolve(&geometry, &field.placement))
}

/// Fit an image into a box without distortion
///
/// Uses one uniform scale `min(boxW / imgW, boxH / imgH)` and centers the
/// result in the box on both axes.
pub fn fit_image(image_width: u32, image_height: u32, bounds: &Coordinates) -> Coordinates {
    let (width, height) = fit_within(image_width, image_height, bounds.width, bounds.height);

    Coordinates {
        x: bounds.x + (bounds.width - width) / 2.0,
        y: bounds.y + (bounds.height - height) / 2.0,
        width,
        height,
        page: bounds.page,
    }
}
