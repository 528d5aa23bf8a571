//! In-memory document generation
//!
//! Builds small documents from scratch for trying out field placement
//! without an upload.

use crate::text::{encode_win_ansi, generate_text_operators, StandardFont, TextRenderContext};
use crate::{Color, PdfError, Result};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// Build a document of `page_count` empty pages of the given size in points
pub fn blank_document(page_count: usize, width: f64, height: f64) -> Result<Vec<u8>> {
    let pages = (0..page_count).map(|_| Vec::new()).collect();
    build(pages, width, height)
}

/// Build the one-page A4 certificate template
///
/// It carries a title band, a few lines of body text and outlined
/// placeholder boxes for a signature and a date.
pub fn sample_document() -> Result<Vec<u8>> {
    let width = 595.276;
    let height = 841.89;
    let mut content = Vec::new();

    // Title band
    content.extend_from_slice(
        format!("q\n0.05 0.1 0.2 rg\n0 {} 595 120 re\nf\nQ\n", height - 120.0).as_bytes(),
    );

    let bold = |size: f32, color: Color| TextRenderContext {
        font_name: StandardFont::HelveticaBold.resource_name().to_string(),
        font_size: size,
        color,
    };
    let regular = |size: f32, color: Color| TextRenderContext {
        font_name: StandardFont::Helvetica.resource_name().to_string(),
        font_size: size,
        color,
    };

    let mut line = |text: &str, x: f64, y: f64, ctx: TextRenderContext| {
        content.extend(generate_text_operators(&encode_win_ansi(text), x, y, &ctx));
    };

    line(
        "CERTIFICATE OF VERIFICATION",
        50.0,
        height - 60.0,
        bold(24.0, Color::white()),
    );
    line(
        "FIELD BURN-IN SAMPLE TEMPLATE",
        50.0,
        height - 85.0,
        regular(10.0, Color::rgb(0.7, 0.7, 0.8)),
    );

    let body = [
        "This is a sample document for testing field placement.",
        "Placement points are resolution-independent percentages of the page",
        "and are mapped into PDF points when the document is signed.",
        "",
        "Place a signature and a date in the boxes below.",
    ];
    for (i, text) in body.iter().enumerate() {
        line(
            text,
            50.0,
            height - 200.0 - (i as f64 * 20.0),
            regular(11.0, Color::rgb(0.2, 0.2, 0.2)),
        );
    }

    line(
        "PLACE SIGNATURE HERE",
        55.0,
        140.0,
        bold(8.0, Color::rgb(0.6, 0.6, 0.6)),
    );
    line(
        "PLACE DATE HERE",
        350.0,
        140.0,
        bold(8.0, Color::rgb(0.6, 0.6, 0.6)),
    );

    // Placeholder outlines
    content.extend_from_slice(
        b"q\n0.8 0.8 0.8 RG\n1 w\n50 150 200 80 re\nS\n345 150 200 25 re\nS\nQ\n",
    );

    build(vec![content], width, height)
}

fn build(page_contents: Vec<Vec<u8>>, width: f64, height: f64) -> Result<Vec<u8>> {
    if page_contents.is_empty() {
        return Err(PdfError::SaveError(
            "a document needs at least one page".to_string(),
        ));
    }

    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => StandardFont::Helvetica.base_font(),
        "Encoding" => "WinAnsiEncoding",
    });
    let font_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => StandardFont::HelveticaBold.base_font(),
        "Encoding" => "WinAnsiEncoding",
    });

    let page_ids: Vec<ObjectId> = page_contents
        .into_iter()
        .map(|content| {
            let contents_id = doc.add_object(Stream::new(dictionary! {}, content));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), (width as f32).into(), (height as f32).into()],
                "Resources" => dictionary! {
                    "Font" => dictionary! {
                        StandardFont::Helvetica.resource_name() => font_regular,
                        StandardFont::HelveticaBold.resource_name() => font_bold,
                    },
                },
                "Contents" => contents_id,
            })
        })
        .collect();

    let count = page_ids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PdfError::SaveError(e.to_string()))?;
    Ok(buffer)
}
