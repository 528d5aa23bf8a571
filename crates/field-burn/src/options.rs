//! Burn options

use crate::geometry::PagePolicy;
use pdf_core::Color;
use serde::{Deserialize, Serialize};

/// Tunable rendering parameters
///
/// Defaults reproduce the look of the placement UI: 6-11pt text sized to
/// 60% of the box height, black text, blue radio dots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BurnOptions {
    /// Smallest font size in points
    pub min_font_size: f32,
    /// Largest font size in points
    pub max_font_size: f32,
    /// Font size as a fraction of the box height
    pub font_height_factor: f32,
    /// Line advance as a multiple of the font size (multi-line text)
    pub line_height_factor: f32,
    /// Left inset of text inside its box, in points
    pub text_inset: f64,
    /// Text color as RGB components (0.0 - 1.0)
    pub text_color: [f32; 3],
    /// Fill color of checked radio fields
    pub radio_color: [f32; 3],
    /// Handling of page indexes past the end of the document
    pub page_policy: PagePolicy,
}

impl Default for BurnOptions {
    fn default() -> Self {
        Self {
            min_font_size: 6.0,
            max_font_size: 11.0,
            font_height_factor: 0.6,
            line_height_factor: 1.2,
            text_inset: 4.0,
            text_color: [0.0, 0.0, 0.0],
            radio_color: [0.25, 0.45, 0.95],
            page_policy: PagePolicy::Clamp,
        }
    }
}

impl BurnOptions {
    /// Font size for a box of the given height in points
    pub fn font_size(&self, box_height: f64) -> f32 {
        (box_height as f32 * self.font_height_factor)
            .max(self.min_font_size)
            .min(self.max_font_size)
    }

    pub fn text_color(&self) -> Color {
        let [r, g, b] = self.text_color;
        Color::rgb(r, g, b)
    }

    pub fn radio_color(&self) -> Color {
        let [r, g, b] = self.radio_color;
        Color::rgb(r, g, b)
    }
}
