//! Integration tests for pdf-core
//!
//! These tests verify end-to-end drawing against real PDF bytes.

use lopdf::{dictionary, Object};
use pdf_core::{
    blank_document, Color, ImageXObject, PdfDocument, PdfError, StandardFont,
};

/// Create a minimal valid PDF whose pages inherit MediaBox and Resources from the page tree
fn create_inherited_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let shared_resources = doc.add_object(dictionary! {
        "ProcSet" => vec![Object::Name(b"PDF".to_vec())],
    });

    let mut kids = Vec::new();
    for _ in 0..page_count {
        let contents_id = doc.add_object(lopdf::Stream::new(
            dictionary! {},
            b"0 0 1 rg 10 10 50 50 re f\n".to_vec(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => contents_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => shared_resources,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Create a PNG image for testing
fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    use image::{ImageBuffer, Rgba};

    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_pixel(width, height, Rgba([20, 20, 120, 128]));
    let mut buffer = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut buffer),
        image::ImageFormat::Png,
    )
    .expect("Failed to create PNG");
    buffer
}

fn page_dict(doc: &PdfDocument, page: usize) -> lopdf::Dictionary {
    let page_id = *doc
        .inner()
        .get_pages()
        .get(&(page as u32 + 1))
        .expect("page exists");
    doc.inner()
        .get_object(page_id)
        .unwrap()
        .as_dict()
        .unwrap()
        .clone()
}

#[test]
fn test_open_save_roundtrip() {
    let pdf_data = blank_document(1, 595.0, 842.0).unwrap();

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    assert_eq!(doc.page_count(), 1);

    let saved_data = doc.to_bytes().expect("Failed to save PDF");

    let doc2 = PdfDocument::open_from_bytes(&saved_data).expect("Failed to re-open PDF");
    assert_eq!(doc2.page_count(), 1);
}

#[test]
fn test_resave_is_fixed_point() {
    let pdf_data = create_inherited_pdf(2);

    let once = PdfDocument::open_from_bytes(&pdf_data)
        .unwrap()
        .to_bytes()
        .unwrap();
    let twice = PdfDocument::open_from_bytes(&once)
        .unwrap()
        .to_bytes()
        .unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_repeated_saves_keep_xref_id() {
    let pdf_data = blank_document(2, 595.0, 842.0).unwrap();
    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    let max_id = doc.inner().max_id;

    let first = doc.to_bytes().unwrap();
    let second = doc.to_bytes().unwrap();
    assert_eq!(first, second);

    let mut cycled = first.clone();
    for _ in 0..3 {
        cycled = PdfDocument::open_from_bytes(&cycled)
            .unwrap()
            .to_bytes()
            .unwrap();
    }
    assert_eq!(cycled, first);

    let reloaded = PdfDocument::open_from_bytes(&cycled).unwrap();
    assert_eq!(reloaded.inner().max_id, max_id);
    assert!(reloaded.inner().trailer.get(b"Prev").is_err());
}

#[test]
fn test_drawn_document_resave_is_fixed_point() {
    let pdf_data = create_inherited_pdf(1);
    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    let image = ImageXObject::decode(&create_test_png(8, 8)).unwrap();
    doc.draw_image(0, &image, 10.0, 10.0, 40.0, 40.0).unwrap();
    let drawn = doc.to_bytes().unwrap();

    let resaved = PdfDocument::open_from_bytes(&drawn)
        .unwrap()
        .to_bytes()
        .unwrap();
    assert_eq!(drawn, resaved);
}

#[test]
fn test_inherited_media_box() {
    let pdf_data = create_inherited_pdf(2);
    let doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();

    let geometry = doc.page_geometry(1).unwrap();
    assert_eq!(geometry.width, 612.0);
    assert_eq!(geometry.height, 792.0);
    assert_eq!(geometry.page_index, 1);
}

#[test]
fn test_page_geometry_invalid_page() {
    let pdf_data = blank_document(3, 595.0, 842.0).unwrap();
    let doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();

    match doc.page_geometry(3) {
        Err(PdfError::InvalidPage(page, total)) => {
            assert_eq!(page, 3);
            assert_eq!(total, 3);
        }
        other => panic!("Expected InvalidPage error, got {other:?}"),
    }
}

#[test]
fn test_draw_text_adds_font_resource() {
    let pdf_data = blank_document(1, 595.0, 842.0).unwrap();

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    doc.draw_text(0, "Hello", 100.0, 700.0, StandardFont::HelveticaBold, 11.0, Color::black())
        .expect("Failed to draw text");
    let saved = doc.to_bytes().unwrap();

    let doc = PdfDocument::open_from_bytes(&saved).unwrap();
    let page = page_dict(&doc, 0);
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
    assert!(fonts.has(StandardFont::HelveticaBold.resource_name().as_bytes()));
}

#[test]
fn test_empty_text_leaves_page_untouched() {
    let pdf_data = blank_document(1, 595.0, 842.0).unwrap();

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    doc.draw_text(0, "", 100.0, 700.0, StandardFont::Helvetica, 11.0, Color::black())
        .unwrap();
    let saved = doc.to_bytes().unwrap();

    let baseline = PdfDocument::open_from_bytes(&pdf_data)
        .unwrap()
        .to_bytes()
        .unwrap();
    assert_eq!(saved, baseline);
}

#[test]
fn test_overlay_wraps_existing_content() {
    let pdf_data = create_inherited_pdf(1);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    doc.fill_circle(0, 50.0, 50.0, 10.0, Color::rgb(0.25, 0.45, 0.95))
        .unwrap();
    let saved = doc.to_bytes().unwrap();

    let doc = PdfDocument::open_from_bytes(&saved).unwrap();
    let page = page_dict(&doc, 0);
    let contents = page.get(b"Contents").unwrap().as_array().unwrap();
    assert_eq!(contents.len(), 3);

    let first = doc
        .inner()
        .get_object(contents[0].as_reference().unwrap())
        .unwrap()
        .as_stream()
        .unwrap();
    assert_eq!(first.content, b"q\n".to_vec());

    let last = doc
        .inner()
        .get_object(contents[2].as_reference().unwrap())
        .unwrap()
        .as_stream()
        .unwrap();
    assert!(last.content.starts_with(b"Q\n"));
}

#[test]
fn test_inherited_resources_are_copied_per_page() {
    let pdf_data = create_inherited_pdf(2);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    doc.draw_text(1, "Only page two", 72.0, 72.0, StandardFont::Helvetica, 10.0, Color::black())
        .unwrap();
    let saved = doc.to_bytes().unwrap();

    let doc = PdfDocument::open_from_bytes(&saved).unwrap();
    assert!(page_dict(&doc, 0).get(b"Resources").is_err());

    let second = page_dict(&doc, 1);
    let resources = second.get(b"Resources").unwrap().as_dict().unwrap();
    assert!(resources.has(b"ProcSet"));
    assert!(resources.has(b"Font"));
}

#[test]
fn test_draw_png_with_soft_mask() {
    let pdf_data = blank_document(1, 595.0, 842.0).unwrap();
    let image = ImageXObject::decode(&create_test_png(30, 10)).unwrap();

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    doc.draw_image(0, &image, 100.0, 100.0, 90.0, 30.0).unwrap();
    let saved = doc.to_bytes().unwrap();

    let doc = PdfDocument::open_from_bytes(&saved).unwrap();
    let page = page_dict(&doc, 0);
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    let image_ref = xobjects.get(b"FbIm1").unwrap().as_reference().unwrap();
    let image_stream = doc.inner().get_object(image_ref).unwrap().as_stream().unwrap();
    assert!(image_stream.dict.has(b"SMask"));
}

#[test]
fn test_image_deduplication() {
    let pdf_data = blank_document(2, 595.0, 842.0).unwrap();
    let image = ImageXObject::decode(&create_test_png(16, 16)).unwrap();

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    let objects_before = doc.inner().objects.len();
    doc.draw_image(0, &image, 10.0, 10.0, 16.0, 16.0).unwrap();
    doc.draw_image(0, &image, 40.0, 10.0, 16.0, 16.0).unwrap();
    doc.draw_image(1, &image, 10.0, 10.0, 16.0, 16.0).unwrap();

    // one image plus its soft mask
    assert_eq!(doc.inner().objects.len(), objects_before + 2);
}

#[test]
fn test_drawing_is_deterministic() {
    let pdf_data = blank_document(2, 595.0, 842.0).unwrap();
    let png = create_test_png(12, 6);

    let render = || {
        let image = ImageXObject::decode(&png).unwrap();
        let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
        doc.draw_image(1, &image, 10.0, 10.0, 24.0, 12.0).unwrap();
        doc.draw_text(0, "Name", 20.0, 20.0, StandardFont::Helvetica, 9.0, Color::black())
            .unwrap();
        doc.fill_circle(1, 100.0, 100.0, 4.0, Color::black()).unwrap();
        doc.to_bytes().unwrap()
    };

    assert_eq!(render(), render());
}

#[test]
fn test_draw_on_invalid_page() {
    let pdf_data = blank_document(1, 595.0, 842.0).unwrap();

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    let result = doc.fill_circle(5, 0.0, 0.0, 1.0, Color::black());
    assert!(matches!(result, Err(PdfError::InvalidPage(5, 1))));
}
