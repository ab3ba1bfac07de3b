//! Overlay objects layered above the base image.
//!
//! Three independent stores: freehand paths, text blocks, and geometric
//! shapes. Overlay coordinates live in image pixel space, so they survive
//! zooming and panning unchanged, and are scaled along with the image at
//! export time. Overlays are never affected by the base transform
//! (rotate/flip) or by the adjustment filter chain.
//!
//! Each object carries a session-unique string id (`path-3`, `text-1`,
//! `shape-7`) minted by the session's monotonic counter; the id is how
//! selection, hit testing, and removal address objects.

use serde::{Deserialize, Serialize};

use crate::{Point, Rgba};

/// Which mark a freehand path leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushKind {
    /// Deposits the path color.
    Brush,
    /// Punches transparency through earlier paths (destination-out).
    Eraser,
}

/// A committed freehand stroke.
///
/// Always has at least two points; single-click strokes are discarded at
/// gesture end instead of being committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingPath {
    pub id: String,
    pub points: Vec<Point>,
    pub color: Rgba,
    /// Stroke width in image pixels.
    pub size: f32,
    pub kind: BrushKind,
}

/// Horizontal anchoring of a text block around its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// A positioned text block.
///
/// `text` may contain `\n`; lines are laid out top-down with a line
/// advance of `1.2 * font_size`, each line anchored per `align`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlay {
    pub id: String,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub font_family: String,
    pub color: Rgba,
    pub bold: bool,
    pub italic: bool,
    pub align: TextAlign,
}

/// Geometric shape variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    /// An ellipse inscribed in the bounding box.
    Circle,
    /// Isoceles triangle: apex at top-center, base along the bottom edge.
    Triangle,
    /// Diagonal from top-left to bottom-right of the bounding box.
    Line,
    /// Line plus an arrowhead at the end point.
    Arrow,
    /// Five-point star inscribed in the bounding box, first point up.
    Star,
}

/// A committed shape, stored as a normalized bounding box
/// (width and height always non-negative).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeOverlay {
    pub id: String,
    pub kind: ShapeKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: bool,
    pub fill_color: Rgba,
    pub stroke_color: Rgba,
    /// Outline width in image pixels.
    pub stroke_width: f32,
}

impl ShapeOverlay {
    /// Bounding box containment, inclusive of edges.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x
            && p.x <= self.x + self.width
            && p.y >= self.y
            && p.y <= self.y + self.height
    }
}

/// Normalize a drag rectangle so width/height are non-negative, shifting
/// the origin when the drag ran up or left.
pub fn normalize_rect(x: f32, y: f32, width: f32, height: f32) -> (f32, f32, f32, f32) {
    let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
    let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
    (x, y, width, height)
}

/// Live settings for the draw tool, applied to the next stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingSettings {
    pub kind: BrushKind,
    pub color: Rgba,
    pub size: f32,
}

impl Default for DrawingSettings {
    fn default() -> Self {
        Self {
            kind: BrushKind::Brush,
            color: Rgba::new(0x3b, 0x82, 0xf6, 255),
            size: 5.0,
        }
    }
}

/// Live settings for the text tool, applied to newly created text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSettings {
    pub text: String,
    pub font_size: f32,
    pub font_family: String,
    pub color: Rgba,
    pub bold: bool,
    pub italic: bool,
    pub align: TextAlign,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            text: "Text".to_string(),
            font_size: 32.0,
            font_family: "Arial".to_string(),
            color: Rgba::WHITE,
            bold: false,
            italic: false,
            align: TextAlign::Left,
        }
    }
}

/// Live settings for the shapes tool, applied to the next shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSettings {
    pub kind: ShapeKind,
    pub fill: bool,
    pub fill_color: Rgba,
    pub stroke_color: Rgba,
    pub stroke_width: f32,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            kind: ShapeKind::Rectangle,
            fill: false,
            fill_color: Rgba::new(0x3b, 0x82, 0xf6, 255),
            stroke_color: Rgba::new(0x3b, 0x82, 0xf6, 255),
            stroke_width: 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_positive_rect_unchanged() {
        assert_eq!(
            normalize_rect(10.0, 20.0, 30.0, 40.0),
            (10.0, 20.0, 30.0, 40.0)
        );
    }

    #[test]
    fn test_normalize_negative_width_shifts_origin() {
        assert_eq!(normalize_rect(100.0, 0.0, -50.0, 20.0), (50.0, 0.0, 50.0, 20.0));
    }

    #[test]
    fn test_normalize_both_negative() {
        assert_eq!(
            normalize_rect(100.0, 100.0, -40.0, -60.0),
            (60.0, 40.0, 40.0, 60.0)
        );
    }

    #[test]
    fn test_shape_contains_edges_inclusive() {
        let shape = ShapeOverlay {
            id: "shape-1".to_string(),
            kind: ShapeKind::Rectangle,
            x: 10.0,
            y: 10.0,
            width: 20.0,
            height: 20.0,
            fill: false,
            fill_color: Rgba::WHITE,
            stroke_color: Rgba::WHITE,
            stroke_width: 1.0,
        };
        assert!(shape.contains(Point::new(10.0, 10.0)));
        assert!(shape.contains(Point::new(30.0, 30.0)));
        assert!(!shape.contains(Point::new(30.1, 15.0)));
    }

    #[test]
    fn test_settings_defaults() {
        let draw = DrawingSettings::default();
        assert_eq!(draw.kind, BrushKind::Brush);
        assert_eq!(draw.size, 5.0);

        let text = TextSettings::default();
        assert_eq!(text.align, TextAlign::Left);
        assert_eq!(text.font_size, 32.0);

        let shape = ShapeSettings::default();
        assert_eq!(shape.kind, ShapeKind::Rectangle);
        assert!(!shape.fill);
    }

    #[test]
    fn test_overlay_serde_uses_hex_colors() {
        let path = DrawingPath {
            id: "path-1".to_string(),
            points: vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)],
            color: Rgba::new(0x3b, 0x82, 0xf6, 255),
            size: 5.0,
            kind: BrushKind::Brush,
        };
        let json = serde_json::to_string(&path).unwrap();
        assert!(json.contains("\"#3b82f6\""));
        assert!(json.contains("\"brush\""));
        let back: DrawingPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
