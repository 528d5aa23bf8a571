//! Page geometry

/// A4 page width in points, used when a page tree carries no MediaBox
pub const A4_WIDTH: f64 = 595.28;
/// A4 page height in points
pub const A4_HEIGHT: f64 = 841.89;

/// Size and origin of one page in PDF point units
///
/// Derived from the decoded document on every call; never cached across
/// documents since the bytes may change between burns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Zero-based page index
    pub page_index: usize,
    /// Page width in points
    pub width: f64,
    /// Page height in points
    pub height: f64,
    /// MediaBox lower-left x (usually 0)
    pub origin_x: f64,
    /// MediaBox lower-left y (usually 0)
    pub origin_y: f64,
}

impl PageGeometry {
    /// Geometry for a page whose MediaBox starts at the origin
    pub fn new(page_index: usize, width: f64, height: f64) -> Self {
        Self {
            page_index,
            width,
            height,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }

    /// Build geometry from the four MediaBox numbers `[llx lly urx ury]`
    ///
    /// Handles boxes written with swapped corners.
    pub fn from_media_box(page_index: usize, llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        Self {
            page_index,
            width: (urx - llx).abs(),
            height: (ury - lly).abs(),
            origin_x: llx.min(urx),
            origin_y: lly.min(ury),
        }
    }
}
