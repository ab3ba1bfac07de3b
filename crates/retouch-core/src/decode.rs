//! Image decoding and the in-memory bitmap type.
//!
//! The browser shell hands us raw file bytes; format detection and
//! decoding go through the `image` crate. Everything downstream works on
//! [`Bitmap`]: straight-alpha RGBA8 in row-major order, which is also the
//! layout the compositor and the canvas `ImageData` interface expect.

use std::io::Cursor;

use image::ImageReader;
use thiserror::Error;

use crate::CropRect;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The decoded image has a zero dimension.
    #[error("Image has empty dimensions")]
    EmptyImage,
}

/// A decoded image with straight-alpha RGBA pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length is width * height * 4.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a new Bitmap with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width * height * 4) as usize,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create an opaque black bitmap, e.g. as a placeholder surface.
    pub fn blank(width: u32, height: u32) -> Self {
        let mut pixels = vec![0; (width * height * 4) as usize];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk[3] = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a Bitmap from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbaImage for encoding.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Extract a sub-rectangle as a new bitmap.
    ///
    /// The rectangle is rounded to whole pixels and clamped to the image
    /// bounds; a rectangle that rounds/clamps to nothing yields `None`.
    pub fn crop(&self, rect: &CropRect) -> Option<Bitmap> {
        let clamped = rect.clamp_to(self.width as f32, self.height as f32);
        let x = clamped.x.round() as u32;
        let y = clamped.y.round() as u32;
        let w = (clamped.width.round() as u32).min(self.width - x);
        let h = (clamped.height.round() as u32).min(self.height - y);
        if w == 0 || h == 0 {
            return None;
        }

        let mut pixels = Vec::with_capacity((w * h * 4) as usize);
        for row in y..y + h {
            let start = ((row * self.width + x) * 4) as usize;
            let end = start + (w * 4) as usize;
            pixels.extend_from_slice(&self.pixels[start..end]);
        }
        Some(Bitmap::new(w, h, pixels))
    }
}

/// Decode an image from raw file bytes.
///
/// Format is sniffed from the content, so PNG, JPEG, and WebP uploads all
/// go through the same entry point.
///
/// # Arguments
///
/// * `bytes` - Raw image file bytes
///
/// # Returns
///
/// A `Bitmap` with RGBA pixel data.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be sniffed,
/// `DecodeError::CorruptedFile` if decoding fails partway through.
pub fn decode_image(bytes: &[u8]) -> Result<Bitmap, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let rgba = img.into_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(DecodeError::EmptyImage);
    }
    Ok(Bitmap::from_rgba_image(rgba))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_png(img: &image::RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png_round_trip() {
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let bitmap = decode_image(&encode_png(&img)).unwrap();
        assert_eq!(bitmap.width, 3);
        assert_eq!(bitmap.height, 2);
        assert_eq!(&bitmap.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_rejects_truncated_png() {
        let img = image::RgbaImage::from_pixel(16, 16, image::Rgba([255, 0, 0, 255]));
        let bytes = encode_png(&img);
        let result = decode_image(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_bitmap_crop_extracts_region() {
        // 4x4 with a distinct pixel at (2, 1).
        let mut bitmap = Bitmap::blank(4, 4);
        let idx = ((1 * 4 + 2) * 4) as usize;
        bitmap.pixels[idx] = 200;

        let cropped = bitmap
            .crop(&CropRect::new(2.0, 1.0, 2.0, 2.0))
            .unwrap();
        assert_eq!(cropped.width, 2);
        assert_eq!(cropped.height, 2);
        assert_eq!(cropped.pixels[0], 200);
    }

    #[test]
    fn test_bitmap_crop_clamps_to_bounds() {
        let bitmap = Bitmap::blank(10, 10);
        let cropped = bitmap
            .crop(&CropRect::new(5.0, 5.0, 100.0, 100.0))
            .unwrap();
        assert_eq!(cropped.width, 5);
        assert_eq!(cropped.height, 5);
    }

    #[test]
    fn test_bitmap_crop_degenerate_is_none() {
        let bitmap = Bitmap::blank(10, 10);
        assert!(bitmap.crop(&CropRect::new(10.0, 10.0, 5.0, 5.0)).is_none());
        assert!(bitmap.crop(&CropRect::new(0.0, 0.0, 0.2, 0.2)).is_none());
    }

    #[test]
    fn test_blank_is_opaque_black() {
        let bitmap = Bitmap::blank(2, 2);
        assert_eq!(&bitmap.pixels[..4], &[0, 0, 0, 255]);
        assert_eq!(bitmap.pixel_count(), 4);
    }
}
