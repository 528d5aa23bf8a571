//! Integration tests for the signing service

use audit_trail::verify_chain;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use field_burn::{content_hash, resolve_field, Coordinates, Field, FieldKind, PagePolicy, Placement};
use pdf_core::{blank_document, sample_document, PdfDocument};
use pretty_assertions::assert_eq;
use sign_service::api::{SignRequest, UploadRequest};
use sign_service::{ServiceConfig, SigningService, SigningSession};

fn signature_png(width: u32, height: u32) -> Vec<u8> {
    use image::{ImageBuffer, Rgba};

    let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_fn(width, height, |x, y| {
        if (x + y) % 3 == 0 {
            Rgba([10, 10, 80, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    let mut buffer = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)
        .unwrap();
    buffer
}

fn data_uri(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

fn fs_config(root: &std::path::Path) -> ServiceConfig {
    ServiceConfig {
        storage_root: root.join("uploads"),
        audit_log: root.join("uploads").join("audit.jsonl"),
        ..ServiceConfig::default()
    }
}

#[test]
fn test_upload_sign_history_over_json() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = SigningService::from_config(fs_config(dir.path())).unwrap();
    let pdf = sample_document().unwrap();

    let upload: UploadRequest = serde_json::from_value(serde_json::json!({
        "pdfData": STANDARD.encode(&pdf),
        "fileName": "certificate.pdf"
    }))
    .unwrap();
    let uploaded = service.handle_upload(&upload);
    assert_eq!(uploaded.status, 200);
    let uploaded = uploaded.data.unwrap();
    assert_eq!(uploaded.hash, content_hash(&pdf));
    assert_eq!(uploaded.file_name, "certificate.pdf");
    assert!(dir
        .path()
        .join("uploads")
        .join(format!("{}.pdf", uploaded.pdf_id))
        .is_file());

    let sign: SignRequest = serde_json::from_value(serde_json::json!({
        "pdfId": uploaded.pdf_id,
        "signatureImage": data_uri(&signature_png(120, 40)),
        "coordinates": {"x": 50, "y": 150, "width": 200, "height": 80, "page": 0}
    }))
    .unwrap();
    let signed = service.handle_sign(&sign);
    assert_eq!(signed.status, 200, "{}", signed.message);
    assert_eq!(signed.message, "PDF signed successfully");
    let signed = signed.data.unwrap();

    assert_eq!(signed.original_hash, uploaded.hash);
    assert_ne!(signed.signed_hash, signed.original_hash);
    let prefix = format!("/uploads/signed/{}_signed_", uploaded.pdf_id);
    assert!(signed.signed_pdf_url.starts_with(&prefix));
    assert!(signed.signed_pdf_url.ends_with(".pdf"));

    let name = signed.signed_pdf_url.rsplit('/').next().unwrap();
    let stored = service.signed(name).unwrap();
    assert_eq!(content_hash(&stored), signed.signed_hash);
    assert_eq!(PdfDocument::open_from_bytes(&stored).unwrap().page_count(), 1);

    // A fresh service over the same directories sees the audit entry
    drop(service);
    let service = SigningService::from_config(fs_config(dir.path())).unwrap();
    let history = service.handle_history(&uploaded.pdf_id);
    assert_eq!(history.status, 200);
    let history = history.data.unwrap();
    assert_eq!(history.entries.len(), 1);
    assert_eq!(history.entries[0].id, signed.audit_trail_id);
    assert_eq!(history.entries[0].artifact_location, signed.signed_pdf_url);
    assert!(history.chain_intact);
}

#[test]
fn test_sign_rejects_unsupported_image() {
    let mut service = SigningService::in_memory(ServiceConfig::default());
    let pdf = blank_document(1, 595.0, 842.0).unwrap();
    let pdf_id = service.upload(&pdf, None).unwrap().pdf_id;

    let response = service.handle_sign(&SignRequest {
        pdf_id: Some(pdf_id.clone()),
        signature_image: Some(format!("data:image/gif;base64,{}", STANDARD.encode(b"GIF89a"))),
        coordinates: Some(
            Coordinates {
                x: 10.0,
                y: 10.0,
                width: 100.0,
                height: 40.0,
                page: 0,
            }
            .into(),
        ),
    });

    assert_eq!(response.status, 400);
    assert_eq!(
        response.message,
        "Invalid image format. Please provide PNG or JPEG image."
    );
    assert!(service.history(&pdf_id).unwrap().entries.is_empty());
}

#[test]
fn test_session_chains_three_signatures() {
    let mut service = SigningService::in_memory(ServiceConfig::default());
    let pdf = blank_document(3, 595.0, 842.0).unwrap();
    let signature = data_uri(&signature_png(300, 100));

    let summary = {
        let mut session = SigningSession::start(&mut service, &pdf, Some("three.pdf")).unwrap();
        let doc = PdfDocument::open_from_bytes(&pdf).unwrap();

        for page in [0usize, 1, 999] {
            let field = Field::new(
                format!("sig-{page}"),
                page,
                Placement::new(10.0, 80.0, 25.0, 12.0),
                FieldKind::Signature { value: None },
            );
            let coordinates = resolve_field(&doc, &field, PagePolicy::Clamp).unwrap();
            let before = session.current_hash().to_string();

            let step = session.sign(&signature, &coordinates).unwrap();
            assert_eq!(step.original_hash, before);
        }

        session.finish()
    };

    assert_eq!(summary.steps.len(), 3);
    assert_eq!(summary.original_hash, content_hash(&pdf));
    assert_eq!(summary.final_hash, content_hash(&summary.final_bytes));
    assert_eq!(summary.final_hash, summary.steps[2].signed_hash);

    let history = service.history(&summary.artifact_id).unwrap();
    assert_eq!(history.entries.len(), 3);
    let report = verify_chain(&history.entries);
    assert!(report.is_intact());
    assert_eq!(report.steps, 3);
}

#[test]
fn test_failed_step_keeps_last_good_state() {
    let mut service = SigningService::in_memory(ServiceConfig::default());
    let pdf = blank_document(1, 595.0, 842.0).unwrap();
    let signature = data_uri(&signature_png(20, 20));
    let coordinates = Coordinates {
        x: 20.0,
        y: 20.0,
        width: 100.0,
        height: 50.0,
        page: 0,
    };

    let mut session = SigningSession::start(&mut service, &pdf, None).unwrap();
    session.sign(&signature, &coordinates).unwrap();
    let good_hash = session.current_hash().to_string();

    let bad = Coordinates {
        width: 0.0,
        ..coordinates
    };
    let err = session.sign(&signature, &bad).unwrap_err();
    assert_eq!(err.status(), 400);
    assert_eq!(session.current_hash(), good_hash);
    assert_eq!(session.steps().len(), 1);

    session.sign(&signature, &coordinates).unwrap();
    let summary = session.finish();
    assert_eq!(summary.steps[1].original_hash, good_hash);

    assert_eq!(service.history(&summary.artifact_id).unwrap().entries.len(), 2);
}

#[test]
fn test_session_burns_ui_fields() {
    let mut service = SigningService::in_memory(ServiceConfig::default());
    let pdf = sample_document().unwrap();
    let fields: Vec<Field> = serde_json::from_value(serde_json::json!([
        {"id": "n", "type": "INPUT", "page": 0, "x": 8, "y": 70, "width": 40, "height": 3, "value": "Jane Doe"},
        {"id": "d", "type": "DATE", "page": 0, "x": 58, "y": 79, "width": 33, "height": 3, "value": "2024-05-01"},
        {"id": "s", "type": "SIGNATURE", "page": 0, "x": 8, "y": 73, "width": 33, "height": 9,
         "value": data_uri(&signature_png(90, 30))}
    ]))
    .unwrap();

    let mut session = SigningSession::start(&mut service, &pdf, None).unwrap();
    let artifact_id = session.artifact_id().to_string();
    let step = session.burn_fields(&fields).unwrap().clone();

    assert_eq!(step.original_hash, content_hash(&pdf));
    assert!(step.signed_pdf_url.starts_with(&format!("/uploads/signed/{artifact_id}_signed_")));
    assert_eq!(content_hash(session.current_bytes()), step.signed_hash);
}
