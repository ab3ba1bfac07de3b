//! WASM-compatible wrapper types for pixel buffers.
//!
//! This module provides JavaScript-friendly types that wrap the core Retouch
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use retouch_core::Bitmap;
use wasm_bindgen::prelude::*;

/// A rendered frame for JavaScript.
///
/// Wraps an RGBA8 pixel buffer sized for `ImageData`. The pixel data lives
/// in WASM memory; `pixels()` copies it out as a `Uint8Array`, which the
/// host wraps in a `Uint8ClampedArray` for `new ImageData(...)`.
#[wasm_bindgen]
pub struct JsFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsFrame {
    /// Get the frame width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the frame height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional - wasm-bindgen's finalizer handles cleanup automatically.
    pub fn free(self) {}
}

impl JsFrame {
    pub(crate) fn from_bitmap(bitmap: Bitmap) -> Self {
        Self {
            width: bitmap.width,
            height: bitmap.height,
            pixels: bitmap.pixels,
        }
    }
}

/// An encoded export, bytes plus the metadata the download link needs.
#[wasm_bindgen]
pub struct JsExportedFile {
    bytes: Vec<u8>,
    mime_type: String,
    extension: String,
}

#[wasm_bindgen]
impl JsExportedFile {
    /// MIME type for the download blob, e.g. `image/png`
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    /// File extension without the dot, e.g. `png`
    #[wasm_bindgen(getter)]
    pub fn extension(&self) -> String {
        self.extension.clone()
    }

    /// The encoded file bytes as Uint8Array
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl JsExportedFile {
    pub(crate) fn new(bytes: Vec<u8>, mime_type: &str, extension: &str) -> Self {
        Self {
            bytes,
            mime_type: mime_type.to_string(),
            extension: extension.to_string(),
        }
    }
}
