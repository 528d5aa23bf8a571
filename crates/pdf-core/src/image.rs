//! Raster image handling for PDF documents

use crate::{PdfError, Result};
use image::{DynamicImage, ImageFormat};
use lopdf::{Dictionary, Object, ObjectId, Stream};
use std::io::{Cursor, Write};

impl From<image::ImageError> for PdfError {
    fn from(err: image::ImageError) -> Self {
        PdfError::ImageError(err.to_string())
    }
}

/// Scale an image to fit within a box, preserving aspect ratio
///
/// Uses a single scale factor `min(box_w / img_w, box_h / img_h)` for both
/// axes, so the result never exceeds the box and is never stretched.
///
/// # Returns
/// (width, height) in points
pub fn fit_within(image_width: u32, image_height: u32, box_width: f64, box_height: f64) -> (f64, f64) {
    if image_width == 0 || image_height == 0 {
        return (0.0, 0.0);
    }
    let width_ratio = box_width / image_width as f64;
    let height_ratio = box_height / image_height as f64;
    let scale = width_ratio.min(height_ratio);
    (image_width as f64 * scale, image_height as f64 * scale)
}

/// JPEG frame info including dimensions and color components
#[derive(Debug, Clone, Copy)]
struct JpegInfo {
    width: u32,
    height: u32,
    num_components: u8,
}

/// Image XObject for PDF embedding
#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Color space ("DeviceRGB", "DeviceGray", "DeviceCMYK")
    pub color_space: String,
    /// Bits per component
    pub bits_per_component: u8,
    /// PDF filter ("DCTDecode" for JPEG, "FlateDecode" for PNG)
    pub filter: String,
    /// Encoded sample data
    pub data: Vec<u8>,
    /// Zlib-compressed 8-bit alpha channel, when the source had transparency
    pub alpha: Option<Vec<u8>>,
}

/// Parse the SOF segment of a JPEG stream
fn get_jpeg_info(data: &[u8]) -> Result<JpegInfo> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(PdfError::UnsupportedImageFormat(
            "missing JPEG SOI marker".to_string(),
        ));
    }

    // SOF segment: marker (2), length (2), precision (1), height (2), width (2), components (1)
    let mut i = 2;
    while i + 10 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }

        let marker = data[i + 1];

        if (0xC0..=0xCF).contains(&marker) && marker != 0xC4 && marker != 0xC8 && marker != 0xCC {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            let num_components = data[i + 9];
            return Ok(JpegInfo {
                width,
                height,
                num_components,
            });
        }

        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if length < 2 {
            break;
        }
        i += 2 + length;
    }

    Err(PdfError::UnsupportedImageFormat(
        "could not find JPEG frame header".to_string(),
    ))
}

fn zlib(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

impl ImageXObject {
    /// Decode a raster payload, trying PNG first and JPEG second
    ///
    /// Fails with `UnsupportedImageFormat` when neither decoder accepts the bytes.
    pub fn decode(data: &[u8]) -> Result<Self> {
        match Self::from_png(data) {
            Ok(image) => Ok(image),
            Err(png_err) => Self::from_jpeg(data).map_err(|jpeg_err| {
                PdfError::UnsupportedImageFormat(format!(
                    "not a PNG ({png_err}) or JPEG ({jpeg_err})"
                ))
            }),
        }
    }

    /// Create XObject from JPEG data
    ///
    /// JPEG images are embedded as-is with the DCTDecode filter after the
    /// header has been validated by the decoder.
    pub fn from_jpeg(data: &[u8]) -> Result<Self> {
        let info = get_jpeg_info(data)?;

        let _decoder =
            image::ImageReader::with_format(Cursor::new(data), ImageFormat::Jpeg).into_decoder()?;

        if info.width == 0 || info.height == 0 {
            return Err(PdfError::UnsupportedImageFormat(
                "JPEG has zero dimensions".to_string(),
            ));
        }

        let color_space = match info.num_components {
            1 => "DeviceGray",
            4 => "DeviceCMYK",
            _ => "DeviceRGB",
        };

        Ok(Self {
            width: info.width,
            height: info.height,
            color_space: color_space.to_string(),
            bits_per_component: 8,
            filter: "DCTDecode".to_string(),
            data: data.to_vec(),
            alpha: None,
        })
    }

    /// Create XObject from PNG data
    ///
    /// PNG samples are decoded, reduced to 8 bits per component and
    /// re-compressed with FlateDecode. Transparency is kept as a separate
    /// alpha channel that becomes the image's soft mask.
    pub fn from_png(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory_with_format(data, ImageFormat::Png)?;
        let (width, height) = (image.width(), image.height());

        let has_alpha = image.color().has_alpha();
        let is_gray = !image.color().has_color();

        let alpha = if has_alpha {
            let channel: Vec<u8> = image.to_rgba8().pixels().map(|p| p[3]).collect();
            if channel.iter().all(|&a| a == u8::MAX) {
                None
            } else {
                Some(zlib(&channel)?)
            }
        } else {
            None
        };

        let (raw, color_space) = samples(&image, is_gray);

        Ok(Self {
            width,
            height,
            color_space: color_space.to_string(),
            bits_per_component: 8,
            filter: "FlateDecode".to_string(),
            data: zlib(&raw)?,
            alpha,
        })
    }

    /// Build the soft mask stream for the alpha channel, if any
    pub fn soft_mask_stream(&self) -> Option<Stream> {
        self.alpha.as_ref().map(|alpha| {
            let mut dict = Dictionary::new();
            dict.set("Type", Object::Name(b"XObject".to_vec()));
            dict.set("Subtype", Object::Name(b"Image".to_vec()));
            dict.set("Width", self.width as i64);
            dict.set("Height", self.height as i64);
            dict.set("ColorSpace", Object::Name(b"DeviceGray".to_vec()));
            dict.set("BitsPerComponent", 8_i64);
            dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
            Stream::new(dict, alpha.clone())
        })
    }

    /// Convert to lopdf Stream object
    ///
    /// `soft_mask` is the object id of the stream built by `soft_mask_stream`.
    pub fn to_pdf_stream(&self, soft_mask: Option<ObjectId>) -> Stream {
        let mut dict = Dictionary::new();

        dict.set("Type", Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", Object::Name(b"Image".to_vec()));
        dict.set("Width", self.width as i64);
        dict.set("Height", self.height as i64);
        dict.set(
            "ColorSpace",
            Object::Name(self.color_space.as_bytes().to_vec()),
        );
        dict.set("BitsPerComponent", self.bits_per_component as i64);
        dict.set("Filter", Object::Name(self.filter.as_bytes().to_vec()));
        if let Some(mask_id) = soft_mask {
            dict.set("SMask", Object::Reference(mask_id));
        }

        Stream::new(dict, self.data.clone())
    }
}

/// Flatten decoded samples to 8-bit gray or RGB
fn samples(image: &DynamicImage, is_gray: bool) -> (Vec<u8>, &'static str) {
    if is_gray {
        (image.to_luma8().into_raw(), "DeviceGray")
    } else {
        (image.to_rgb8().into_raw(), "DeviceRGB")
    }
}

/// Generate operators to draw image at position
///
/// # Arguments
/// * `image_name` - Image resource name (e.g., "FbIm1")
/// * `x` - X coordinate in points
/// * `y` - Y coordinate in points (from bottom, PDF coordinates)
/// * `width` - Image width in points
/// * `height` - Image height in points
pub fn generate_image_operators(
    image_name: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<u8> {
    format!("q\n{width} 0 0 {height} {x} {y} cm\n/{image_name} Do\nQ\n").into_bytes()
}
