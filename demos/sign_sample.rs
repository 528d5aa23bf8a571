//! Sign Sample - runs a complete signing session on the sample certificate
//!
//! This example shows:
//! - Uploading the generated A4 sample document
//! - Burning percentage-placed text and date fields
//! - Burning two signatures in sequence, each step feeding the next
//! - Reading back the audit history and checking the hash chain
//!
//! The store and audit log come from the JSON config file given as the
//! first argument (defaults under `uploads/` without one), and
//! FIELDBURN_STORAGE_ROOT / FIELDBURN_AUDIT_LOG override either. The final
//! document is always written to `output/sign_sample.pdf`.
//!
//! Run with: RUST_LOG=debug cargo run --example sign_sample -p sign-service [config.json]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use field_burn::{resolve_field, Field, FieldKind, PagePolicy, Placement};
use pdf_core::{sample_document, PdfDocument};
use sign_service::{ServiceConfig, SigningService, SigningSession};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("sign_service=info".parse()?),
        )
        .init();

    std::fs::create_dir_all("output")?;

    let config_path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let config = ServiceConfig::load(config_path.as_deref())?;
    println!("Storing artifacts under {}", config.storage_root.display());

    let mut service = SigningService::from_config(config)?;
    let pdf = sample_document()?;

    let summary = {
        let mut session = SigningSession::start(&mut service, &pdf, Some("certificate.pdf"))?;
        println!("Uploaded sample as {}", session.artifact_id());

        // Text fields placed the way the UI does, in percent of the page
        let fields = vec![
            Field::new(
                "name",
                0,
                Placement::new(8.4, 70.0, 33.6, 3.0),
                FieldKind::Input {
                    value: Some("Jane Doe".to_string()),
                },
            ),
            Field::new(
                "date",
                0,
                Placement::new(58.0, 79.2, 33.6, 3.0),
                FieldKind::Date {
                    value: Some("2024-05-01".to_string()),
                },
            ),
            Field::new(
                "agree",
                0,
                Placement::new(8.4, 40.0, 2.5, 1.8),
                FieldKind::Radio { checked: true },
            ),
        ];
        let step = session.burn_fields(&fields)?;
        println!("Fields burned: {}", step.signed_hash);

        // Two signatures into the same box, one after the other
        let doc = PdfDocument::open_from_bytes(&pdf)?;
        let signature_box = Field::new(
            "signature",
            0,
            Placement::new(8.4, 72.7, 33.6, 9.5),
            FieldKind::Signature { value: None },
        );
        let coordinates = resolve_field(&doc, &signature_box, PagePolicy::Clamp)?;
        println!(
            "Signature box: x={:.2} y={:.2} w={:.2} h={:.2}",
            coordinates.x, coordinates.y, coordinates.width, coordinates.height
        );

        for (i, width) in [240u32, 180].into_iter().enumerate() {
            let image = format!("data:image/png;base64,{}", STANDARD.encode(signature_png(width, 80)?));
            let step = session.sign(&image, &coordinates)?;
            println!("Signature {} -> {}", i + 1, step.signed_pdf_url);
        }

        session.finish()
    };

    std::fs::write("output/sign_sample.pdf", &summary.final_bytes)?;

    let history = service.history(&summary.artifact_id)?;
    println!(
        "{} audit entries, chain intact: {}",
        history.entries.len(),
        history.chain_intact
    );
    println!("{}", serde_json::to_string_pretty(&history)?);
    println!("Final document: output/sign_sample.pdf ({})", summary.final_hash);

    Ok(())
}

/// A stroke-like PNG with a transparent background
fn signature_png(width: u32, height: u32) -> Result<Vec<u8>, image::ImageError> {
    use image::{ImageBuffer, Rgba};

    let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_fn(width, height, |x, y| {
        let wave = (height as f64 / 2.0) + (x as f64 / 12.0).sin() * (height as f64 / 4.0);
        if (y as f64 - wave).abs() < 2.5 {
            Rgba([15, 25, 90, 255])
        } else {
            Rgba([255, 255, 255, 0])
        }
    });

    let mut buffer = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)?;
    Ok(buffer)
}
