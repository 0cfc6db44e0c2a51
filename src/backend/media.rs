use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;

use crate::error::{NanobrushError, Result};

/// MIME type assumed for masks and for headerless base64 image payloads.
pub const PNG_MIME: &str = "image/png";

/// An image to send upstream: base64 payload plus its MIME type.
///
/// Built per call from caller-provided bytes and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// Base64-encoded image bytes (no `data:` header)
    pub data: String,
    pub mime_type: String,
}

impl ImageInput {
    /// Wrap an already base64-encoded payload.
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Encode raw image bytes.
    ///
    /// ```
    /// use nanobrush::ImageInput;
    ///
    /// let image = ImageInput::from_bytes(b"abc", "image/jpeg");
    /// assert_eq!(image.data, "YWJj");
    /// assert_eq!(image.to_data_uri(), "data:image/jpeg;base64,YWJj");
    /// ```
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self::new(BASE64.encode(bytes), mime_type)
    }

    /// A mask image. Masks are always sent as PNG.
    pub fn mask_png(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes, PNG_MIME)
    }

    /// Split an existing `data:<mime>;base64,<payload>` URI, e.g. a previous edit result.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri.strip_prefix("data:").ok_or_else(|| {
            NanobrushError::Configuration("image data URI must start with 'data:'".to_string())
        })?;
        let (mime_type, data) = rest.split_once(";base64,").ok_or_else(|| {
            NanobrushError::Configuration("image data URI must be base64 encoded".to_string())
        })?;
        if mime_type.is_empty() || data.is_empty() {
            return Err(NanobrushError::Configuration(
                "image data URI has an empty MIME type or payload".to_string(),
            ));
        }
        Ok(Self::new(data, mime_type))
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decode the payload back into bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(self.data.as_bytes())
            .map_err(|e| NanobrushError::Unknown(format!("invalid base64 image payload: {}", e)))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum MessagePart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl MessagePart {
    pub(crate) fn image(input: &ImageInput) -> Self {
        MessagePart::ImageUrl {
            image_url: ImageUrl {
                url: input.to_data_uri(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ImageUrl {
    pub(crate) url: String,
}

/// Returns true when a base64 payload starts with the PNG signature.
pub(crate) fn has_png_signature(data: &str) -> bool {
    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
    // 12 base64 chars decode to 9 bytes, enough for the 8-byte signature
    let Some(head) = data.get(..12) else {
        return false;
    };
    match BASE64.decode(head.as_bytes()) {
        Ok(bytes) => bytes.starts_with(&PNG_SIGNATURE),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_part_serializes_as_data_uri() {
        let part = MessagePart::image(&ImageInput::from_bytes(b"abc", "image/png"));
        let json = serde_json::to_value(&part).expect("part should serialize");
        assert_eq!(json["type"], "image_url");
        assert_eq!(json["image_url"]["url"], "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_text_part_serializes() {
        let part = MessagePart::Text {
            text: "hello".to_string(),
        };
        let json = serde_json::to_value(&part).expect("part should serialize");
        assert_eq!(json, serde_json::json!({"type": "text", "text": "hello"}));
    }

    #[test]
    fn test_from_data_uri_splits_header() {
        let image = ImageInput::from_data_uri("data:image/webp;base64,QUJD").expect("valid uri");
        assert_eq!(image.mime_type, "image/webp");
        assert_eq!(image.data, "QUJD");
        assert_eq!(image.decode().expect("decodes"), b"ABC");
    }

    #[test]
    fn test_from_data_uri_rejects_plain_url() {
        let err = ImageInput::from_data_uri("https://example.com/cat.png").unwrap_err();
        assert!(matches!(err, NanobrushError::Configuration(_)));
    }

    #[test]
    fn test_mask_is_png() {
        assert_eq!(ImageInput::mask_png(b"m").mime_type, "image/png");
    }

    #[test]
    fn test_png_signature_detection() {
        let png = BASE64.encode([0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n', 0, 0, 0, 13]);
        assert!(has_png_signature(&png));
        let jpeg = BASE64.encode([0xff, 0xd8, 0xff, 0xe0, 0, 16, b'J', b'F', b'I', b'F', 0, 1]);
        assert!(!has_png_signature(&jpeg));
        assert!(!has_png_signature("QUJD"));
    }
}
