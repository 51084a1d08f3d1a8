//! Image decoding.
//!
//! All images are decoded to tightly packed RGBA8 regardless of their
//! on-disk format, so the device backend only ever sees one layout.

use std::path::Path;

use tracing::info;

use ember_gpu::DecodedImage;

use crate::error::{AssetError, AssetResult};

/// Load and decode an image file from disk into RGBA8.
pub fn load_image(path: &Path) -> AssetResult<DecodedImage> {
    if !path.exists() {
        return Err(AssetError::FileNotFound(path.to_path_buf()));
    }

    let decoded = decode(image::open(path)?);
    info!(
        path = %path.display(),
        width = decoded.width,
        height = decoded.height,
        "Loaded texture"
    );
    Ok(decoded)
}

/// Decode image bytes from memory into RGBA8.
pub fn load_image_from_memory(bytes: &[u8]) -> AssetResult<DecodedImage> {
    Ok(decode(image::load_from_memory(bytes)?))
}

fn decode(img: image::DynamicImage) -> DecodedImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    DecodedImage {
        pixels: rgba.into_raw(),
        width,
        height,
        channels: 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2x2 RGBA8 PNG: red, green / blue, white.
    const TINY_PNG: &[u8] = &[
        0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d,
        0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x02,
        0x08, 0x06, 0x00, 0x00, 0x00, 0x72, 0xb6, 0x0d, 0x24, 0x00, 0x00, 0x00,
        0x12, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0xf8, 0xcf, 0xc0, 0xf0,
        0x1f, 0x0c, 0x81, 0x34, 0x18, 0x00, 0x00, 0x49, 0xc8, 0x09, 0xf7, 0xf9,
        0xab, 0xb6, 0x0d, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae,
        0x42, 0x60, 0x82,
    ];

    #[test]
    fn test_png_decodes_to_rgba8() {
        let decoded = load_image_from_memory(TINY_PNG).unwrap();
        assert_eq!(decoded.width, 2);
        assert_eq!(decoded.height, 2);
        assert_eq!(decoded.channels, 4);
        assert_eq!(
            decoded.pixels.len(),
            decoded.width as usize * decoded.height as usize * 4
        );
        assert_eq!(&decoded.pixels[0..4], &[255, 0, 0, 255]);
        assert_eq!(&decoded.pixels[12..16], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let err = load_image_from_memory(&[0xde, 0xad, 0xbe, 0xef]).unwrap_err();
        assert!(matches!(err, AssetError::Image(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_image(Path::new("/nonexistent/tex.png")).unwrap_err();
        assert!(matches!(err, AssetError::FileNotFound(_)));
    }
}
