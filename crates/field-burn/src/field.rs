//! Field data model
//!
//! Fields arrive from the placement UI as flat JSON objects:
//!
//! ```json
//! {"id": "f1", "type": "SIGNATURE", "page": 0,
//!  "x": 10, "y": 80, "width": 25, "height": 12,
//!  "value": "data:image/png;base64,..."}
//! ```

use crate::geometry::Placement;
use serde::{Deserialize, Serialize};

/// A placed field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Opaque identifier, stable for one editing session
    pub id: String,
    /// Zero-based page index (clamped against the document when resolved)
    #[serde(default)]
    pub page: usize,
    /// Box on the page in percent of the rendered page
    #[serde(flatten)]
    pub placement: Placement,
    /// Field type and its payload
    #[serde(flatten)]
    pub kind: FieldKind,
}

/// Field type with the payload each type carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum FieldKind {
    /// Single-line text drawn in bold
    Input {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    /// Multi-line text, one line per `\n`
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    /// Handwritten signature as a data URI
    Signature {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    /// Date string (ISO format from the UI)
    Date {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    /// Raster image as a data URI
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    /// Checkbox drawn as a filled dot when checked
    Radio {
        #[serde(default)]
        checked: bool,
    },
    /// Any type tag this crate does not know; burned as a no-op
    #[serde(other)]
    Unknown,
}

impl FieldKind {
    /// The wire tag of this kind
    pub fn tag(&self) -> &'static str {
        match self {
            FieldKind::Input { .. } => "INPUT",
            FieldKind::Text { .. } => "TEXT",
            FieldKind::Signature { .. } => "SIGNATURE",
            FieldKind::Date { .. } => "DATE",
            FieldKind::Image { .. } => "IMAGE",
            FieldKind::Radio { .. } => "RADIO",
            FieldKind::Unknown => "UNKNOWN",
        }
    }
}

impl Field {
    /// Build a field from its parts
    pub fn new(id: impl Into<String>, page: usize, placement: Placement, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            page,
            placement,
            kind,
        }
    }
}
