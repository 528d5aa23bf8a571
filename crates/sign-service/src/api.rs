//! Request and response payloads
//!
//! All payloads use camelCase JSON. Responses are wrapped in
//! [`ApiResponse`]:
//!
//! ```json
//! {"success": true, "message": "PDF signed successfully", "data": {...}}
//! ```

use audit_trail::AuditEntry;
use field_burn::Coordinates;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MSG_UPLOAD_MISSING: &str = "Missing required field: pdfData is required";
pub const MSG_SIGN_MISSING: &str =
    "Missing required fields: pdfId, signatureImage, and coordinates are required";
pub const MSG_COORDINATES_MISSING: &str =
    "Invalid coordinates: x, y, width, and height are required";
pub const MSG_INVALID_IMAGE: &str = "Invalid image format. Please provide PNG or JPEG image.";

/// Upload an original document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Base64 of the PDF bytes
    #[serde(default)]
    pub pdf_data: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub pdf_id: String,
    pub hash: String,
    pub file_name: String,
}

/// Box for a sign request in PDF points, bottom-left origin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignCoordinates {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    /// Zero-based page, first page when absent
    #[serde(default)]
    pub page: Option<usize>,
}

impl SignCoordinates {
    /// Resolved coordinates, `None` if any of the box values is missing
    pub fn resolved(&self) -> Option<Coordinates> {
        Some(Coordinates {
            x: self.x?,
            y: self.y?,
            width: self.width?,
            height: self.height?,
            page: self.page.unwrap_or(0),
        })
    }
}

impl From<Coordinates> for SignCoordinates {
    fn from(c: Coordinates) -> Self {
        Self {
            x: Some(c.x),
            y: Some(c.y),
            width: Some(c.width),
            height: Some(c.height),
            page: Some(c.page),
        }
    }
}

/// Burn a signature image into a stored document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    #[serde(default)]
    pub pdf_id: Option<String>,
    /// Data URI or bare base64 of a PNG or JPEG
    #[serde(default)]
    pub signature_image: Option<String>,
    #[serde(default)]
    pub coordinates: Option<SignCoordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignResponse {
    pub signed_pdf_url: String,
    pub original_hash: String,
    pub signed_hash: String,
    pub audit_trail_id: Uuid,
}

/// Audit history of one artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub pdf_id: String,
    pub entries: Vec<AuditEntry>,
    /// Whether every step starts from the previous step's output
    pub chain_intact: bool,
}

/// Response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// HTTP-style status code (not part of the JSON body)
    #[serde(skip)]
    pub status: u16,
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: 200,
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn fail(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            message: message.into(),
            data: None,
            error: None,
        }
    }

    /// Failure that also carries the internal error text
    pub fn internal(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::fail(500, message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sign_request_from_ui_json() {
        let json = r#"{
            "pdfId": "0123456789abcdef",
            "signatureImage": "data:image/png;base64,AAAA",
            "coordinates": {"x": 59.5, "y": 67.36, "width": 148.75, "height": 101.04}
        }"#;
        let request: SignRequest = serde_json::from_str(json).unwrap();

        let coords = request.coordinates.unwrap().resolved().unwrap();
        assert_eq!(coords.page, 0);
        assert_eq!(coords.width, 148.75);
    }

    #[test]
    fn test_incomplete_coordinates() {
        let coords: SignCoordinates = serde_json::from_str(r#"{"x": 1, "y": 2, "width": 3}"#).unwrap();
        assert_eq!(coords.resolved(), None);
    }

    #[test]
    fn test_envelope_shape() {
        let ok = ApiResponse::ok(
            "PDF uploaded successfully",
            UploadResponse {
                pdf_id: "id".into(),
                hash: "h".into(),
                file_name: "document.pdf".into(),
            },
        );
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({
                "success": true,
                "message": "PDF uploaded successfully",
                "data": {"pdfId": "id", "hash": "h", "fileName": "document.pdf"}
            })
        );

        let err: ApiResponse<UploadResponse> = ApiResponse::internal("Internal server error", "disk full");
        assert_eq!(err.status, 500);
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            serde_json::json!({
                "success": false,
                "message": "Internal server error",
                "error": "disk full"
            })
        );
    }
}
