use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::global_constants;

#[derive(Clone)]
pub struct UploadedImage {
    pub mime_type: String,
    pub data_url: String,
    bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedImage")
            .field("mime_type", &self.mime_type)
            .field("byte_len", &self.bytes.len())
            .finish()
    }
}

impl UploadedImage {
    pub fn is_supported_mime_type(mime_type: &str) -> bool {
        mime_type
            .trim()
            .to_ascii_lowercase()
            .starts_with(global_constants::ACCEPTED_MIME_PREFIX)
    }

    /// Builds the displayable reference. Pixel data is not decoded here; a
    /// corrupt image surfaces later as a recognition failure.
    pub fn build_from_bytes(bytes: Vec<u8>, mime_type: &str) -> Self {
        let mime_type = mime_type.trim().to_ascii_lowercase();

        log::debug!(
            "[UPLOADED_IMAGE] building preview: {} bytes, type={}",
            bytes.len(),
            mime_type
        );

        let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(&bytes));

        Self {
            mime_type,
            data_url,
            bytes: Arc::new(bytes),
        }
    }

    pub fn bytes(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.bytes)
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_mime_types_start_with_image_category() {
        assert!(UploadedImage::is_supported_mime_type("image/png"));
        assert!(UploadedImage::is_supported_mime_type("image/jpeg"));
        assert!(UploadedImage::is_supported_mime_type("IMAGE/GIF"));
        assert!(!UploadedImage::is_supported_mime_type("text/plain"));
        assert!(!UploadedImage::is_supported_mime_type("application/pdf"));
        assert!(!UploadedImage::is_supported_mime_type(""));
    }

    #[test]
    fn test_build_from_bytes_creates_base64_data_url() {
        let image = UploadedImage::build_from_bytes(b"abc".to_vec(), "image/png");

        assert_eq!(image.data_url, "data:image/png;base64,YWJj");
        assert_eq!(image.byte_len(), 3);
        assert_eq!(image.mime_type, "image/png");
    }
}
