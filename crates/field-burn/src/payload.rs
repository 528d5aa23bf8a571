//! Image payload decoding

use crate::{BurnError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Decode an image payload from a `data:` URI or bare base64
///
/// Accepts `data:image/png;base64,....` as produced by a canvas, or the
/// base64 text alone. Whitespace inside the payload is ignored.
pub fn decode_image_payload(value: &str) -> Result<Vec<u8>> {
    let value = value.trim();

    let encoded = match value.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest
                .split_once(',')
                .ok_or_else(|| BurnError::validation("data URI has no payload"))?;
            if !header.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
                return Err(BurnError::validation("data URI is not base64 encoded"));
            }
            data
        }
        None => value,
    };

    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(BurnError::validation("image payload is empty"));
    }

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| BurnError::validation(format!("invalid base64 image payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri() {
        let bytes = decode_image_payload("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_bare_base64_with_whitespace() {
        let bytes = decode_image_payload("  aGVs\nbG8=  ").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_rejects_non_base64_uri() {
        let err = decode_image_payload("data:text/plain,hello").unwrap_err();
        assert!(matches!(err, BurnError::Validation { .. }));
    }

    #[test]
    fn test_rejects_empty_payload() {
        assert!(decode_image_payload("data:image/png;base64,").is_err());
        assert!(decode_image_payload("").is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(decode_image_payload("data:image/png;base64,@@@@").is_err());
    }
}
