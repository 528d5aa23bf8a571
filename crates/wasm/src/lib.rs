//! WASM bindings for the field burn engine
//!
//! This crate provides JavaScript-friendly API for:
//! - Resolving UI field placements into PDF points
//! - Burning fields or a single signature into a PDF
//! - Hashing documents
//! - Generating the sample document
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { PdfSigner, samplePdf } from 'field-burn-wasm';
//!
//! await init();
//!
//! const signer = new PdfSigner(samplePdf());
//! const coords = signer.resolveField(field);
//! const { bytes, hash } = signer.burnFields(fields);
//! ```

use field_burn::{BurnOptions, Coordinates, Field};
use js_sys::{Object, Reflect, Uint8Array};
use pdf_core::PdfDocument;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[derive(Serialize)]
struct PageSize {
    width: f64,
    height: f64,
}

/// `{ bytes: Uint8Array, hash: string }`
fn burn_result(output: field_burn::BurnOutput) -> Result<JsValue, JsValue> {
    let result = Object::new();
    let bytes = Uint8Array::from(output.bytes.as_slice());
    Reflect::set(&result, &"bytes".into(), &bytes)?;
    Reflect::set(&result, &"hash".into(), &output.hash.into())?;
    Ok(result.into())
}

/// A loaded PDF with burn options
#[wasm_bindgen]
pub struct PdfSigner {
    bytes: Vec<u8>,
    page_count: usize,
    options: BurnOptions,
}

#[wasm_bindgen]
impl PdfSigner {
    /// Load a PDF
    ///
    /// @param data - PDF file bytes (Uint8Array)
    #[wasm_bindgen(constructor)]
    pub fn new(data: &[u8]) -> Result<PdfSigner, JsValue> {
        let doc = PdfDocument::open_from_bytes(data).map_err(js_error)?;
        Ok(PdfSigner {
            bytes: data.to_vec(),
            page_count: doc.page_count(),
            options: BurnOptions::default(),
        })
    }

    /// Replace the burn options
    ///
    /// @param options - Partial options object, missing keys keep their defaults
    #[wasm_bindgen(js_name = setOptions)]
    pub fn set_options(&mut self, options: JsValue) -> Result<(), JsValue> {
        self.options = serde_wasm_bindgen::from_value(options)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Size of a page in points
    ///
    /// @returns { width, height }
    #[wasm_bindgen(js_name = pageSize)]
    pub fn page_size(&self, page: usize) -> Result<JsValue, JsValue> {
        let doc = PdfDocument::open_from_bytes(&self.bytes).map_err(js_error)?;
        let geometry = doc.page_geometry(page).map_err(js_error)?;
        let size = PageSize {
            width: geometry.width,
            height: geometry.height,
        };
        Ok(serde_wasm_bindgen::to_value(&size)?)
    }

    /// Resolve a field placement into PDF points
    ///
    /// @param field - Field object as produced by the placement UI
    /// @returns { x, y, width, height, page }
    #[wasm_bindgen(js_name = resolveField)]
    pub fn resolve_field(&self, field: JsValue) -> Result<JsValue, JsValue> {
        let field: Field = serde_wasm_bindgen::from_value(field)?;
        let doc = PdfDocument::open_from_bytes(&self.bytes).map_err(js_error)?;
        let coords =
            field_burn::resolve_field(&doc, &field, self.options.page_policy).map_err(js_error)?;
        Ok(serde_wasm_bindgen::to_value(&coords)?)
    }

    /// Burn fields into the loaded PDF
    ///
    /// The loaded PDF is not changed; load the returned bytes to continue
    /// from the burned state.
    ///
    /// @param fields - Array of field objects
    /// @returns { bytes: Uint8Array, hash: string }
    #[wasm_bindgen(js_name = burnFields)]
    pub fn burn_fields(&self, fields: JsValue) -> Result<JsValue, JsValue> {
        let fields: Vec<Field> = serde_wasm_bindgen::from_value(fields)?;
        let output = field_burn::burn(&self.bytes, &fields, &self.options).map_err(js_error)?;
        burn_result(output)
    }

    /// Burn one PNG or JPEG image into resolved coordinates
    ///
    /// @param coordinates - { x, y, width, height, page } in points
    /// @param image - Image bytes (Uint8Array)
    /// @returns { bytes: Uint8Array, hash: string }
    #[wasm_bindgen(js_name = burnImage)]
    pub fn burn_image(&self, coordinates: JsValue, image: &[u8]) -> Result<JsValue, JsValue> {
        let coordinates: Coordinates = serde_wasm_bindgen::from_value(coordinates)?;
        let output =
            field_burn::burn_one(&self.bytes, &coordinates, image, &self.options).map_err(js_error)?;
        burn_result(output)
    }

    /// SHA-256 of the loaded PDF as hex
    pub fn hash(&self) -> String {
        field_burn::content_hash(&self.bytes)
    }
}

/// SHA-256 of bytes as lower-case hex
#[wasm_bindgen(js_name = contentHash)]
pub fn content_hash(data: &[u8]) -> String {
    field_burn::content_hash(data)
}

/// Artifact id of an upload (first 16 hex chars of its hash)
#[wasm_bindgen(js_name = artifactId)]
pub fn artifact_id(data: &[u8]) -> String {
    field_burn::artifact_id(data)
}

/// One-page A4 sample document
#[wasm_bindgen(js_name = samplePdf)]
pub fn sample_pdf() -> Result<Vec<u8>, JsValue> {
    pdf_core::sample_document().map_err(js_error)
}
