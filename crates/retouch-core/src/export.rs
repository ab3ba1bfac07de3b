//! Export pipeline: render a scene at a chosen scale and encode it.
//!
//! Export runs the exact same compositor pass as the display, so the file
//! matches what the user saw, just at a different resolution. Encoding
//! goes through the `image` crate's PNG, JPEG, and WebP encoders.
//!
//! Quality only applies to JPEG. PNG is always lossless, and the WebP
//! encoder here is lossless-only, so both ignore the quality setting.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compositor::{render, RenderError, Scene};
use crate::decode::Bitmap;

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The compositor pass failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The encoder rejected the rendered image.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// An export is already running for this session.
    #[error("An export is already in progress")]
    InFlight,
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ExportFormat {
    /// MIME type for the download blob.
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Webp => "image/webp",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Webp => "webp",
        }
    }
}

/// Output resolution multiplier. The catalog is fixed; arbitrary factors
/// are not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScale {
    Half,
    #[default]
    X1,
    X2,
    X3,
}

impl ExportScale {
    pub const ALL: [ExportScale; 4] = [
        ExportScale::Half,
        ExportScale::X1,
        ExportScale::X2,
        ExportScale::X3,
    ];

    /// The numeric multiplier.
    pub fn factor(self) -> f32 {
        match self {
            ExportScale::Half => 0.5,
            ExportScale::X1 => 1.0,
            ExportScale::X2 => 2.0,
            ExportScale::X3 => 3.0,
        }
    }

    /// Look up the scale for a numeric factor.
    pub fn from_factor(factor: f32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.factor() == factor)
    }
}

// Crosses the JS boundary as the bare number (0.5, 1, 2, 3).
impl Serialize for ExportScale {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f32(self.factor())
    }
}

impl<'de> Deserialize<'de> for ExportScale {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let factor = f32::deserialize(deserializer)?;
        ExportScale::from_factor(factor)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid export scale: {factor}")))
    }
}

/// User-facing export options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub format: ExportFormat,
    /// JPEG quality (1-100). Ignored by PNG and WebP.
    pub quality: u8,
    pub scale: ExportScale,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: 90,
            scale: ExportScale::X1,
        }
    }
}

/// Render a scene at the export scale and encode it.
///
/// # Returns
///
/// The encoded file bytes, ready to wrap in a download blob.
pub fn export_image(scene: &Scene, settings: &ExportSettings) -> Result<Vec<u8>, ExportError> {
    let bitmap = render(scene, settings.scale.factor())?;
    encode(&bitmap, settings)
}

fn encode(bitmap: &Bitmap, settings: &ExportSettings) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    match settings.format {
        ExportFormat::Png => {
            PngEncoder::new(&mut bytes)
                .write_image(
                    &bitmap.pixels,
                    bitmap.width,
                    bitmap.height,
                    ExtendedColorType::Rgba8,
                )
                .map_err(|e| ExportError::EncodingFailed(e.to_string()))?;
        }
        ExportFormat::Jpeg => {
            // JPEG has no alpha channel; transparent regions flatten to
            // black, matching canvas export behavior.
            let rgb = flatten_to_rgb(bitmap);
            let quality = settings.quality.clamp(1, 100);
            JpegEncoder::new_with_quality(&mut bytes, quality)
                .write_image(&rgb, bitmap.width, bitmap.height, ExtendedColorType::Rgb8)
                .map_err(|e| ExportError::EncodingFailed(e.to_string()))?;
        }
        ExportFormat::Webp => {
            WebPEncoder::new_lossless(&mut bytes)
                .encode(
                    &bitmap.pixels,
                    bitmap.width,
                    bitmap.height,
                    ExtendedColorType::Rgba8,
                )
                .map_err(|e| ExportError::EncodingFailed(e.to_string()))?;
        }
    }
    Ok(bytes)
}

fn flatten_to_rgb(bitmap: &Bitmap) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(bitmap.pixel_count() as usize * 3);
    for chunk in bitmap.pixels.chunks_exact(4) {
        let a = chunk[3] as u16;
        rgb.push((chunk[0] as u16 * a / 255) as u8);
        rgb.push((chunk[1] as u16 * a / 255) as u8);
        rgb.push((chunk[2] as u16 * a / 255) as u8);
    }
    rgb
}
