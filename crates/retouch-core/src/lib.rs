//! Retouch Core - Image editing engine
//!
//! This crate provides the editing engine behind Retouch: the adjustment
//! model, overlay stores, pointer interaction state machine, undo history,
//! and the software compositor that flattens an editing session into pixels
//! for both interactive display and export.

pub mod adjustments;
pub mod compositor;
pub mod decode;
pub mod export;
pub mod history;
pub mod interaction;
pub mod overlay;
pub mod presets;
pub mod session;
pub mod text;
pub mod viewport;

pub use adjustments::{apply_filter_chain, css_filter_string, filter_chain, FilterOp};
pub use compositor::{
    render, render_overlay, OverlayScene, RenderError, Scene, SelectionBox, SoftwareSurface,
    Surface,
};
pub use decode::{decode_image, Bitmap, DecodeError};
pub use export::{export_image, ExportError, ExportFormat, ExportScale, ExportSettings};
pub use history::{History, Snapshot};
pub use interaction::{AspectRatio, CropHandle, Interaction, PointerKind};
pub use overlay::{
    BrushKind, DrawingPath, DrawingSettings, ShapeKind, ShapeOverlay, ShapeSettings, TextAlign,
    TextOverlay, TextSettings,
};
pub use presets::{find_preset, presets, FilterPreset};
pub use session::{shortcut, Command, EditorSession, TextEdit, Tool};
pub use text::{FontError, FontStore};
pub use viewport::{DisplayBox, ViewState};

use serde::{Deserialize, Serialize};

/// The complete set of tonal/effect sliders for one image.
///
/// Always a full record: consumers never see a partial set, and the
/// `Default` value is the canonical identity (rendering with it must be a
/// bit-for-bit no-op on the base image).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    /// Brightness (-100 to 100)
    pub brightness: f32,
    /// Contrast (-100 to 100)
    pub contrast: f32,
    /// Saturation (-100 to 100)
    pub saturation: f32,
    /// Exposure (-100 to 100)
    pub exposure: f32,
    /// Highlights (-100 to 100)
    pub highlights: f32,
    /// Shadows (-100 to 100)
    pub shadows: f32,
    /// White balance temperature (-100 to 100)
    pub temperature: f32,
    /// White balance tint (-100 to 100)
    pub tint: f32,
    /// Vibrance (-100 to 100)
    pub vibrance: f32,
    /// Sharpness (0 to 100)
    pub sharpness: f32,
    /// Blur (0 to 100)
    pub blur: f32,
    /// Vignette (0 to 100)
    pub vignette: f32,
    /// Hue rotation in degrees (-180 to 180)
    pub hue: f32,
    /// Sepia (0 to 100)
    pub sepia: f32,
    /// Grayscale (0 to 100)
    pub grayscale: f32,
    /// Invert (0 to 100)
    pub invert: f32,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            exposure: 0.0,
            highlights: 0.0,
            shadows: 0.0,
            temperature: 0.0,
            tint: 0.0,
            vibrance: 0.0,
            sharpness: 0.0,
            blur: 0.0,
            vignette: 0.0,
            hue: 0.0,
            sepia: 0.0,
            grayscale: 0.0,
            invert: 0.0,
        }
    }
}

impl Adjustments {
    /// Create a new Adjustments record with default (identity) values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all sliders are at their defaults.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Read a slider by name.
    pub fn get(&self, slider: Slider) -> f32 {
        match slider {
            Slider::Brightness => self.brightness,
            Slider::Contrast => self.contrast,
            Slider::Saturation => self.saturation,
            Slider::Exposure => self.exposure,
            Slider::Highlights => self.highlights,
            Slider::Shadows => self.shadows,
            Slider::Temperature => self.temperature,
            Slider::Tint => self.tint,
            Slider::Vibrance => self.vibrance,
            Slider::Sharpness => self.sharpness,
            Slider::Blur => self.blur,
            Slider::Vignette => self.vignette,
            Slider::Hue => self.hue,
            Slider::Sepia => self.sepia,
            Slider::Grayscale => self.grayscale,
            Slider::Invert => self.invert,
        }
    }

    /// Write a slider by name, clamping to the slider's valid range.
    pub fn set(&mut self, slider: Slider, value: f32) {
        let (min, max) = slider.range();
        let value = value.clamp(min, max);
        match slider {
            Slider::Brightness => self.brightness = value,
            Slider::Contrast => self.contrast = value,
            Slider::Saturation => self.saturation = value,
            Slider::Exposure => self.exposure = value,
            Slider::Highlights => self.highlights = value,
            Slider::Shadows => self.shadows = value,
            Slider::Temperature => self.temperature = value,
            Slider::Tint => self.tint = value,
            Slider::Vibrance => self.vibrance = value,
            Slider::Sharpness => self.sharpness = value,
            Slider::Blur => self.blur = value,
            Slider::Vignette => self.vignette = value,
            Slider::Hue => self.hue = value,
            Slider::Sepia => self.sepia = value,
            Slider::Grayscale => self.grayscale = value,
            Slider::Invert => self.invert = value,
        }
    }
}

/// Named handle for one adjustment slider.
///
/// Lets presets, commands, and the settings UI address fields uniformly
/// without stringly-typed lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slider {
    Brightness,
    Contrast,
    Saturation,
    Exposure,
    Highlights,
    Shadows,
    Temperature,
    Tint,
    Vibrance,
    Sharpness,
    Blur,
    Vignette,
    Hue,
    Sepia,
    Grayscale,
    Invert,
}

impl Slider {
    /// All sliders, in the order the adjustments panel lists them.
    pub const ALL: [Slider; 16] = [
        Slider::Brightness,
        Slider::Contrast,
        Slider::Saturation,
        Slider::Exposure,
        Slider::Highlights,
        Slider::Shadows,
        Slider::Temperature,
        Slider::Tint,
        Slider::Vibrance,
        Slider::Sharpness,
        Slider::Blur,
        Slider::Vignette,
        Slider::Hue,
        Slider::Sepia,
        Slider::Grayscale,
        Slider::Invert,
    ];

    /// Valid (min, max) range for the slider.
    pub fn range(self) -> (f32, f32) {
        match self {
            Slider::Hue => (-180.0, 180.0),
            Slider::Sharpness
            | Slider::Blur
            | Slider::Vignette
            | Slider::Sepia
            | Slider::Grayscale
            | Slider::Invert => (0.0, 100.0),
            _ => (-100.0, 100.0),
        }
    }
}

/// Discrete geometric transform of the base image.
///
/// Applied to the base image only; overlays are never rotated or flipped.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    /// Rotation in degrees, kept normalized to [0, 360).
    pub rotation: f32,
    /// Mirror across the vertical axis.
    pub flip_x: bool,
    /// Mirror across the horizontal axis.
    pub flip_y: bool,
}

impl Transform {
    /// Rotate by a number of degrees, normalizing the result mod 360.
    pub fn rotate(&mut self, degrees: f32) {
        self.rotation = (self.rotation + degrees).rem_euclid(360.0);
    }

    /// True when the transform is the identity.
    pub fn is_identity(&self) -> bool {
        self.rotation == 0.0 && !self.flip_x && !self.flip_y
    }
}

/// A point in image space (native pixel coordinates of the loaded image).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A crop rectangle in image pixel space.
///
/// Exists only while the crop tool has a pending selection; applying or
/// cancelling the crop destroys it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clamp the rectangle so it lies entirely within an image of the
    /// given dimensions. Origin is clamped first, then extent.
    pub fn clamp_to(&self, image_width: f32, image_height: f32) -> Self {
        let x = self.x.max(0.0).min(image_width);
        let y = self.y.max(0.0).min(image_height);
        Self {
            x,
            y,
            width: self.width.min(image_width - x).max(0.0),
            height: self.height.min(image_height - y).max(0.0),
        }
    }

    /// True when the point lies strictly inside the rectangle.
    pub fn contains(&self, p: Point) -> bool {
        p.x > self.x && p.x < self.x + self.width && p.y > self.y && p.y < self.y + self.height
    }
}

/// An RGBA color carried by overlays and tool settings.
///
/// Serialized as a `#rrggbb`/`#rrggbbaa` hex string so the browser shell
/// can pass CSS colors straight through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a CSS hex color: `#rgb`, `#rrggbb`, or `#rrggbbaa`.
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        let nib = |c: u8| -> Option<u8> {
            match c {
                b'0'..=b'9' => Some(c - b'0'),
                b'a'..=b'f' => Some(c - b'a' + 10),
                b'A'..=b'F' => Some(c - b'A' + 10),
                _ => None,
            }
        };
        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = nib(bytes[0])?;
                let g = nib(bytes[1])?;
                let b = nib(bytes[2])?;
                Some(Self::new(r * 17, g * 17, b * 17, 255))
            }
            6 | 8 => {
                let mut ch = [0u8; 4];
                ch[3] = 255;
                for (i, pair) in bytes.chunks(2).enumerate() {
                    ch[i] = nib(pair[0])? * 16 + nib(pair[1])?;
                }
                Some(Self::new(ch[0], ch[1], ch[2], ch[3]))
            }
            _ => None,
        }
    }

    /// Format back to a `#rrggbb` (or `#rrggbbaa` when translucent) string.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl std::str::FromStr for Rgba {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgba::parse(s).ok_or(())
    }
}

impl Serialize for Rgba {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color: {s}")))
    }
}
