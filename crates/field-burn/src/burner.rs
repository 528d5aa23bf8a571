//! Field burn-in

use crate::field::{Field, FieldKind};
use crate::geometry::{clamp_page, fit_image, resolve_field, Coordinates, PagePolicy};
use crate::hash::content_hash;
use crate::options::BurnOptions;
use crate::payload::decode_image_payload;
use crate::{BurnError, Result};
use pdf_core::{ImageXObject, PdfDocument, StandardFont};

/// A freshly serialized document and its content hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnOutput {
    /// The new document bytes
    pub bytes: Vec<u8>,
    /// SHA-256 of `bytes` as lower-case hex
    pub hash: String,
}

/// Burn a list of fields into a document
///
/// The input is decoded once, every field is drawn in list order and the
/// result is serialized to a new buffer. An empty field list re-serializes
/// the document unchanged, which is a fixed point from the second pass on.
///
/// # Arguments
/// * `document` - Source PDF bytes (never modified)
/// * `fields` - Fields in percent placement
/// * `options` - Rendering parameters
pub fn burn(document: &[u8], fields: &[Field], options: &BurnOptions) -> Result<BurnOutput> {
    for field in fields {
        field
            .placement
            .validate()
            .map_err(|e| e.with_field(&field.id))?;
    }

    let mut doc = PdfDocument::open_from_bytes(document)?;
    let burner = FieldBurner::new(options);

    for field in fields {
        burner
            .render_field(&mut doc, field)
            .map_err(|e| e.with_field(&field.id))?;
    }

    let output = finish(doc)?;
    tracing::info!(fields = fields.len(), hash = %output.hash, "burned fields into document");
    Ok(output)
}

/// Burn one image into an already resolved box
///
/// This is the signing path: `coordinates` are PDF points with a bottom-left
/// origin and `image` holds the decoded PNG or JPEG bytes. The page index is
/// clamped or checked according to `options.page_policy`.
pub fn burn_one(
    document: &[u8],
    coordinates: &Coordinates,
    image: &[u8],
    options: &BurnOptions,
) -> Result<BurnOutput> {
    coordinates.validate()?;
    if image.is_empty() {
        return Err(BurnError::validation("signature image is empty"));
    }

    let mut doc = PdfDocument::open_from_bytes(document)?;
    let page = page_for(&doc, coordinates.page, options)?;
    let bounds = Coordinates {
        page,
        ..*coordinates
    };

    FieldBurner::new(options)
        .draw_image(&mut doc, &bounds, image)
        .map_err(|e| e.on_page(page))?;

    let output = finish(doc)?;
    tracing::info!(page, hash = %output.hash, "burned image into document");
    Ok(output)
}

fn page_for(doc: &PdfDocument, page: usize, options: &BurnOptions) -> Result<usize> {
    let page_count = doc.page_count();
    match options.page_policy {
        PagePolicy::Strict if page >= page_count => Err(BurnError::PageIndexOutOfRange {
            field: None,
            page,
            page_count,
        }),
        PagePolicy::Strict => Ok(page),
        PagePolicy::Clamp => {
            let clamped = clamp_page(page, page_count);
            if clamped != page {
                tracing::warn!(
                    requested = page,
                    page = clamped,
                    "page index past end of document, using last page"
                );
            }
            Ok(clamped)
        }
    }
}

fn finish(mut doc: PdfDocument) -> Result<BurnOutput> {
    let bytes = doc.to_bytes()?;
    let hash = content_hash(&bytes);
    Ok(BurnOutput { bytes, hash })
}

/// Draws single fields onto an open document
struct FieldBurner<'a> {
    options: &'a BurnOptions,
}

impl<'a> FieldBurner<'a> {
    fn new(options: &'a BurnOptions) -> Self {
        Self { options }
    }

    fn render_field(&self, doc: &mut PdfDocument, field: &Field) -> Result<()> {
        let coords = resolve_field(doc, field, self.options.page_policy)?;
        tracing::debug!(
            field = %field.id,
            kind = field.kind.tag(),
            page = coords.page,
            x = coords.x,
            y = coords.y,
            "drawing field"
        );

        self.draw_field(doc, field, coords)
            .map_err(|e| e.on_page(coords.page))
    }

    fn draw_field(&self, doc: &mut PdfDocument, field: &Field, coords: Coordinates) -> Result<()> {
        match &field.kind {
            FieldKind::Input { value } => {
                self.draw_single_line(doc, &coords, value.as_deref(), StandardFont::HelveticaBold)
            }
            FieldKind::Date { value } => {
                self.draw_single_line(doc, &coords, value.as_deref(), StandardFont::Helvetica)
            }
            FieldKind::Text { value } => self.draw_lines(doc, &coords, value.as_deref()),
            FieldKind::Radio { checked } => {
                if *checked {
                    let radius = coords.width.min(coords.height) / 3.0;
                    doc.fill_circle(
                        coords.page,
                        coords.x + coords.width / 2.0,
                        coords.y + coords.height / 2.0,
                        radius,
                        self.options.radio_color(),
                    )?;
                }
                Ok(())
            }
            FieldKind::Signature { value } | FieldKind::Image { value } => {
                match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                    Some(payload) => {
                        let image = decode_image_payload(payload)?;
                        self.draw_image(doc, &coords, &image)
                    }
                    None => {
                        tracing::warn!(field = %field.id, kind = field.kind.tag(), "field has no image, skipping");
                        Ok(())
                    }
                }
            }
            FieldKind::Unknown => {
                tracing::debug!(field = %field.id, "unknown field type, nothing to draw");
                Ok(())
            }
        }
    }

    /// One line, vertically centered on the box
    fn draw_single_line(
        &self,
        doc: &mut PdfDocument,
        coords: &Coordinates,
        value: Option<&str>,
        font: StandardFont,
    ) -> Result<()> {
        let Some(text) = value.filter(|v| !v.is_empty()) else {
            return Ok(());
        };

        let font_size = self.options.font_size(coords.height);
        let baseline = coords.y + coords.height / 2.0 - font_size as f64 / 2.5;

        doc.draw_text(
            coords.page,
            text,
            coords.x + self.options.text_inset,
            baseline,
            font,
            font_size,
            self.options.text_color(),
        )?;
        Ok(())
    }

    /// One line per `\n`, from the top of the box downward
    fn draw_lines(&self, doc: &mut PdfDocument, coords: &Coordinates, value: Option<&str>) -> Result<()> {
        let Some(text) = value.filter(|v| !v.is_empty()) else {
            return Ok(());
        };

        let font_size = self.options.font_size(coords.height);
        let line_height = font_size as f64 * self.options.line_height_factor as f64;
        let top = coords.y + coords.height;

        for (i, line) in text.split('\n').enumerate() {
            let line = line.trim_end_matches('\r');
            doc.draw_text(
                coords.page,
                line,
                coords.x + self.options.text_inset,
                top - line_height * (i + 1) as f64,
                StandardFont::Helvetica,
                font_size,
                self.options.text_color(),
            )?;
        }
        Ok(())
    }

    /// Embed an image and draw it contained and centered in the box
    fn draw_image(&self, doc: &mut PdfDocument, bounds: &Coordinates, data: &[u8]) -> Result<()> {
        let image = ImageXObject::decode(data)?;
        let fitted = fit_image(image.width, image.height, bounds);

        doc.draw_image(
            bounds.page,
            &image,
            fitted.x,
            fitted.y,
            fitted.width,
            fitted.height,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Placement;
    use pdf_core::blank_document;

    fn blank() -> Vec<u8> {
        blank_document(1, 595.0, 842.0).unwrap()
    }

    fn overlay(bytes: &[u8]) -> String {
        let doc = lopdf::Document::load_mem(bytes).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();
        String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
    }

    #[test]
    fn test_input_draws_bold_centered_line() {
        let field = Field::new(
            "name",
            0,
            Placement::new(10.0, 10.0, 40.0, 2.0),
            FieldKind::Input {
                value: Some("Jane".to_string()),
            },
        );
        let output = burn(&blank(), &[field], &BurnOptions::default()).unwrap();
        let content = overlay(&output.bytes);

        assert!(content.contains("/FbHelvB"));
        assert!(content.contains("<4A616E65> Tj"));
    }

    #[test]
    fn test_text_draws_one_line_per_newline() {
        let field = Field::new(
            "notes",
            0,
            Placement::new(10.0, 10.0, 40.0, 10.0),
            FieldKind::Text {
                value: Some("one\r\ntwo\nthree".to_string()),
            },
        );
        let output = burn(&blank(), &[field], &BurnOptions::default()).unwrap();
        let content = overlay(&output.bytes);

        assert_eq!(content.matches(" Tj").count(), 3);
        assert!(content.contains("/FbHelv "));
    }

    #[test]
    fn test_unchecked_radio_and_empty_text_draw_nothing() {
        let fields = vec![
            Field::new(
                "r",
                0,
                Placement::new(1.0, 1.0, 2.0, 2.0),
                FieldKind::Radio { checked: false },
            ),
            Field::new(
                "t",
                0,
                Placement::new(1.0, 1.0, 2.0, 2.0),
                FieldKind::Text { value: None },
            ),
            Field::new(
                "s",
                0,
                Placement::new(1.0, 1.0, 2.0, 2.0),
                FieldKind::Signature { value: Some(String::new()) },
            ),
            Field::new("u", 0, Placement::new(1.0, 1.0, 2.0, 2.0), FieldKind::Unknown),
        ];
        let options = BurnOptions::default();

        let burned = burn(&blank(), &fields, &options).unwrap();
        let empty = burn(&blank(), &[], &options).unwrap();
        assert_eq!(burned, empty);
    }

    #[test]
    fn test_checked_radio_uses_radio_color() {
        let field = Field::new(
            "r",
            0,
            Placement::new(50.0, 50.0, 4.0, 4.0),
            FieldKind::Radio { checked: true },
        );
        let output = burn(&blank(), &[field], &BurnOptions::default()).unwrap();
        assert!(overlay(&output.bytes).contains("0.25 0.45 0.95 rg"));
    }

    #[test]
    fn test_invalid_box_fails_before_decode() {
        let field = Field::new(
            "bad",
            0,
            Placement::new(10.0, 10.0, 0.0, 5.0),
            FieldKind::Input { value: None },
        );
        let err = burn(b"not a pdf", &[field], &BurnOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            BurnError::Validation { field: Some(ref id), .. } if id == "bad"
        ));
    }

    #[test]
    fn test_garbage_document_is_decode_error() {
        let err = burn(b"garbage", &[], &BurnOptions::default()).unwrap_err();
        assert!(matches!(err, BurnError::Decode(_)));
    }

    #[test]
    fn test_unsupported_image_names_field() {
        let field = Field::new(
            "sig",
            0,
            Placement::new(10.0, 10.0, 20.0, 10.0),
            FieldKind::Signature {
                value: Some("data:image/gif;base64,R0lGODlhAQABAAAAACw=".to_string()),
            },
        );
        let err = burn(&blank(), &[field], &BurnOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            BurnError::UnsupportedImageFormat { field: Some(ref id), page: Some(0), .. } if id == "sig"
        ));
        assert!(err.to_string().contains("for field sig on page 0"));
    }

    #[test]
    fn test_bad_payload_names_clamped_page() {
        let field = Field::new(
            "photo",
            5,
            Placement::new(10.0, 10.0, 20.0, 10.0),
            FieldKind::Image {
                value: Some("data:image/png,not-base64".to_string()),
            },
        );
        let pdf = blank_document(2, 595.0, 842.0).unwrap();
        let err = burn(&pdf, &[field], &BurnOptions::default()).unwrap_err();

        assert_eq!(err.page(), Some(1));
        assert_eq!(
            err.to_string(),
            "Invalid input for field photo on page 1: data URI is not base64 encoded"
        );
    }

    #[test]
    fn test_burn_one_rejects_empty_image() {
        let coords = Coordinates {
            x: 10.0,
            y: 10.0,
            width: 100.0,
            height: 40.0,
            page: 0,
        };
        let err = burn_one(&blank(), &coords, &[], &BurnOptions::default()).unwrap_err();
        assert!(matches!(err, BurnError::Validation { .. }));
    }
}
