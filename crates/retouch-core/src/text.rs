//! Font registry and text measurement.
//!
//! The engine has no font files of its own; the host registers font bytes
//! at runtime for each family/style it wants rasterized. Measurement
//! falls back to a width heuristic when a family is unregistered, so hit
//! testing and drag still work even if the glyphs cannot be drawn.

use std::collections::HashMap;

use ab_glyph::{Font, FontArc, InvalidFont, PxScale, ScaleFont};
use thiserror::Error;

use crate::overlay::{TextAlign, TextOverlay};

/// Line advance as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.2;

/// Fallback per-character width as a multiple of the font size, used when
/// no font is registered for the requested family.
const FALLBACK_CHAR_WIDTH: f32 = 0.6;

/// Error types for font registration.
#[derive(Debug, Error)]
pub enum FontError {
    /// The provided bytes are not a parseable font.
    #[error("Invalid font data for family '{0}'")]
    InvalidFont(String),
}

/// Identifies one registered face: family name plus style flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FaceKey {
    family: String,
    bold: bool,
    italic: bool,
}

/// Runtime-registered fonts, keyed by family and style.
#[derive(Debug, Clone, Default)]
pub struct FontStore {
    faces: HashMap<FaceKey, FontArc>,
}

impl FontStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font bytes for a family/style combination, replacing any
    /// previous registration.
    pub fn register(
        &mut self,
        family: &str,
        bold: bool,
        italic: bool,
        bytes: Vec<u8>,
    ) -> Result<(), FontError> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|InvalidFont| FontError::InvalidFont(family.to_string()))?;
        self.faces.insert(
            FaceKey {
                family: family.to_string(),
                bold,
                italic,
            },
            font,
        );
        Ok(())
    }

    /// Look up a face, falling back to the family's regular style when
    /// the exact style is missing.
    pub fn face(&self, family: &str, bold: bool, italic: bool) -> Option<&FontArc> {
        let exact = FaceKey {
            family: family.to_string(),
            bold,
            italic,
        };
        if let Some(font) = self.faces.get(&exact) {
            return Some(font);
        }
        self.faces.get(&FaceKey {
            family: family.to_string(),
            bold: false,
            italic: false,
        })
    }

    /// Measure the advance width of a single line at the given size.
    pub fn line_width(&self, line: &str, family: &str, bold: bool, italic: bool, size: f32) -> f32 {
        match self.face(family, bold, italic) {
            Some(font) => {
                let scaled = font.as_scaled(PxScale::from(size));
                let mut width = 0.0;
                let mut prev = None;
                for c in line.chars() {
                    let id = scaled.glyph_id(c);
                    if let Some(prev) = prev {
                        width += scaled.kern(prev, id);
                    }
                    width += scaled.h_advance(id);
                    prev = Some(id);
                }
                width
            }
            None => line.chars().count() as f32 * size * FALLBACK_CHAR_WIDTH,
        }
    }

    /// Bounding box of a text overlay in image space, honoring multi-line
    /// content and alignment. Used for hit testing and drag.
    pub fn bounds(&self, overlay: &TextOverlay) -> TextBounds {
        let lines: Vec<&str> = overlay.text.split('\n').collect();
        let width = lines
            .iter()
            .map(|line| {
                self.line_width(
                    line,
                    &overlay.font_family,
                    overlay.bold,
                    overlay.italic,
                    overlay.font_size,
                )
            })
            .fold(0.0f32, f32::max);
        let height = lines.len() as f32 * overlay.font_size * LINE_HEIGHT;
        let x = match overlay.align {
            TextAlign::Left => overlay.x,
            TextAlign::Center => overlay.x - width / 2.0,
            TextAlign::Right => overlay.x - width,
        };
        TextBounds {
            x,
            y: overlay.y,
            width,
            height,
        }
    }
}

/// Axis-aligned bounding box of a laid-out text overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl TextBounds {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Lay out one overlay into per-line anchor positions.
///
/// Each entry is `(line, x, baseline_top_y)`: y is the top of the line
/// box (the overlay renders with a top baseline), x is the left edge
/// after alignment.
pub fn layout_lines<'a>(store: &FontStore, overlay: &'a TextOverlay) -> Vec<(&'a str, f32, f32)> {
    overlay
        .text
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let width = store.line_width(
                line,
                &overlay.font_family,
                overlay.bold,
                overlay.italic,
                overlay.font_size,
            );
            let x = match overlay.align {
                TextAlign::Left => overlay.x,
                TextAlign::Center => overlay.x - width / 2.0,
                TextAlign::Right => overlay.x - width,
            };
            let y = overlay.y + i as f32 * overlay.font_size * LINE_HEIGHT;
            (line, x, y)
        })
        .collect()
}

/// The CSS shorthand the DOM preview uses for the same overlay, e.g.
/// `"italic bold 32px Arial"`.
pub fn css_font_string(overlay: &TextOverlay) -> String {
    let mut parts = Vec::new();
    if overlay.italic {
        parts.push("italic".to_string());
    }
    if overlay.bold {
        parts.push("bold".to_string());
    }
    parts.push(format!("{}px {}", overlay.font_size, overlay.font_family));
    parts.join(" ")
}
