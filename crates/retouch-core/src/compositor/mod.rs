//! The software compositor.
//!
//! One pass flattens a scene into pixels, in a fixed order:
//!
//! 1. Clear to transparent
//! 2. Base image, through the adjustment filter chain, under the
//!    rotate/flip transform (about the image center)
//! 3. Vignette (radial black fade)
//! 4. Sharpness (unsharp mask over the flattened result)
//! 5. Freehand paths (eraser strokes punch transparency)
//! 6. Shapes
//! 7. Text
//!
//! Overlays are drawn in image coordinates and never rotate or flip with
//! the base. Display rendering and export run this same pass; export
//! merely uses a different output scale, so what the user exports is what
//! they saw.
//!
//! A second, interactive-only pass ([`render_overlay`]) draws the editing
//! chrome over transparency: the in-flight stroke or rubber-band shape,
//! the crop dim mask with its thirds grid and handles, and the dashed
//! outline around the selected overlay. Chrome never reaches export.

mod sharpen;
mod surface;

pub use sharpen::unsharp_mask;
pub use surface::{SoftwareSurface, Surface};

use thiserror::Error;
use tiny_skia::{
    BlendMode, LineCap, LineJoin, Path, PathBuilder, Rect, Stroke, StrokeDash,
    Transform as SkTransform,
};

use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};

use crate::adjustments::{apply_filter_chain, filter_chain};
use crate::decode::Bitmap;
use crate::overlay::{BrushKind, DrawingPath, ShapeKind, ShapeOverlay, TextOverlay};
use crate::text::FontStore;
use crate::{Adjustments, CropRect, Point as ImgPoint, Rgba, Transform};

/// Arrowhead length in image pixels.
const ARROW_HEAD_LENGTH: f32 = 15.0;
/// Arrowhead half-angle.
const ARROW_HEAD_ANGLE: f32 = std::f32::consts::PI / 6.0;
/// Star inner radius as a fraction of the outer radius.
const STAR_INNER_RATIO: f32 = 0.4;
/// Vignette radius as a fraction of the larger image dimension.
const VIGNETTE_RADIUS_RATIO: f32 = 0.7;
/// Alpha of the dim mask outside the pending crop.
const CROP_DIM_ALPHA: u8 = 153;
/// Crop handle bar thickness.
const HANDLE_THICKNESS: f32 = 4.0;
/// Crop corner handle bar length.
const CORNER_HANDLE_LENGTH: f32 = 12.0;
/// Crop edge handle bar length.
const EDGE_HANDLE_LENGTH: f32 = 8.0;
/// How far the dashed selection outline sits outside the object.
const SELECTION_INFLATE: f32 = 4.0;
/// Accent color for the selection outline.
const SELECTION_COLOR: Rgba = Rgba::new(59, 130, 246, 255);

/// Error types for compositor passes.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The render target could not be allocated.
    #[error("Cannot allocate {width}x{height} surface")]
    SurfaceAlloc { width: u32, height: u32 },

    /// The requested output scale produced a degenerate surface.
    #[error("Invalid output scale: {0}")]
    InvalidScale(f32),
}

/// Everything one full render pass reads.
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    pub base: &'a Bitmap,
    pub adjustments: &'a Adjustments,
    pub transform: Transform,
    pub paths: &'a [DrawingPath],
    pub shapes: &'a [ShapeOverlay],
    pub texts: &'a [TextOverlay],
    pub fonts: &'a FontStore,
}

/// Bounding box of the selected overlay, in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Everything the interactive chrome pass reads. All transient: the
/// in-flight gesture preview, the pending crop, and the selection.
#[derive(Clone, Copy, Default)]
pub struct OverlayScene<'a> {
    pub width: u32,
    pub height: u32,
    pub live_path: Option<&'a DrawingPath>,
    pub live_shape: Option<&'a ShapeOverlay>,
    pub crop: Option<CropRect>,
    pub selection: Option<SelectionBox>,
}

/// Flatten a scene at the given output scale.
///
/// The output is `round(base dimensions * scale)`; display uses 1.0 and
/// export passes its chosen scale.
pub fn render(scene: &Scene, scale: f32) -> Result<Bitmap, RenderError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(RenderError::InvalidScale(scale));
    }
    let out_w = (scene.base.width as f32 * scale).round() as u32;
    let out_h = (scene.base.height as f32 * scale).round() as u32;
    let mut target = SoftwareSurface::new(out_w, out_h)?;
    render_to(&mut target, scene, scale)?;
    Ok(target.to_bitmap())
}

/// Run the full pass onto an existing surface.
pub fn render_to<S: Surface>(target: &mut S, scene: &Scene, scale: f32) -> Result<(), RenderError> {
    target.clear();

    // Filter chain runs on a straight-alpha copy of the base, before any
    // compositing touches it.
    let ops = filter_chain(scene.adjustments);
    let base_transform = base_transform(scene, scale);
    if ops.is_empty() {
        target.draw_bitmap(scene.base, base_transform)?;
    } else {
        let mut filtered = scene.base.clone();
        apply_filter_chain(&mut filtered.pixels, filtered.width, filtered.height, &ops);
        target.draw_bitmap(&filtered, base_transform)?;
    }

    let overlay_transform = SkTransform::from_scale(scale, scale);
    let image_w = scene.base.width as f32;
    let image_h = scene.base.height as f32;

    if scene.adjustments.vignette > 0.0 {
        draw_vignette(
            target,
            scene.adjustments.vignette,
            image_w,
            image_h,
            overlay_transform,
        );
    }

    if scene.adjustments.sharpness > 0.0 {
        let sharpness = scene.adjustments.sharpness;
        target.with_straight_pixels(&mut |pixels, w, h| unsharp_mask(pixels, w, h, sharpness));
    }

    for path in scene.paths {
        draw_path(target, path, overlay_transform);
    }
    for shape in scene.shapes {
        draw_shape(target, shape, overlay_transform);
    }
    for text in scene.texts {
        draw_text(target, text, scene.fonts, scale);
    }

    Ok(())
}

/// Render the interactive chrome over transparency.
pub fn render_overlay(scene: &OverlayScene) -> Result<Bitmap, RenderError> {
    let mut target = SoftwareSurface::new(scene.width, scene.height)?;
    let transform = SkTransform::identity();

    if let Some(path) = scene.live_path {
        draw_path(&mut target, path, transform);
    }
    if let Some(shape) = scene.live_shape {
        draw_shape(&mut target, shape, transform);
    }
    if let Some(rect) = scene.crop {
        draw_crop_chrome(
            &mut target,
            &rect,
            scene.width as f32,
            scene.height as f32,
        );
    }
    if let Some(selection) = scene.selection {
        draw_selection_outline(&mut target, &selection);
    }

    Ok(target.to_bitmap())
}

fn fill_rect<S: Surface>(target: &mut S, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
    let Some(rect) = Rect::from_xywh(x, y, w, h) else {
        return;
    };
    let mut pb = PathBuilder::new();
    pb.push_rect(rect);
    let Some(path) = pb.finish() else { return };
    target.fill_path(&path, color, BlendMode::SourceOver, SkTransform::identity());
}

/// Dim mask outside the crop, rule-of-thirds grid inside it, and the
/// grab handles: 4x12 bars forming an L at each corner, 4x8 bars at the
/// edge midpoints.
fn draw_crop_chrome<S: Surface>(target: &mut S, rect: &CropRect, image_w: f32, image_h: f32) {
    let dim = Rgba::new(0, 0, 0, CROP_DIM_ALPHA);
    let right = rect.x + rect.width;
    let bottom = rect.y + rect.height;
    fill_rect(target, 0.0, 0.0, image_w, rect.y, dim);
    fill_rect(target, 0.0, bottom, image_w, image_h - bottom, dim);
    fill_rect(target, 0.0, rect.y, rect.x, rect.height, dim);
    fill_rect(target, right, rect.y, image_w - right, rect.height, dim);

    let grid = Rgba::new(255, 255, 255, 128);
    let grid_stroke = Stroke::default();
    for i in 1..3 {
        let gx = rect.x + rect.width * i as f32 / 3.0;
        let gy = rect.y + rect.height * i as f32 / 3.0;
        let mut pb = PathBuilder::new();
        pb.move_to(gx, rect.y);
        pb.line_to(gx, bottom);
        pb.move_to(rect.x, gy);
        pb.line_to(right, gy);
        if let Some(path) = pb.finish() {
            target.stroke_path(
                &path,
                grid,
                &grid_stroke,
                BlendMode::SourceOver,
                SkTransform::identity(),
            );
        }
    }

    let t = HANDLE_THICKNESS;
    let c = CORNER_HANDLE_LENGTH;
    let e = EDGE_HANDLE_LENGTH;
    let white = Rgba::WHITE;
    // Corners: one horizontal and one vertical bar each.
    for (cx, cy, dir_x, dir_y) in [
        (rect.x, rect.y, 1.0, 1.0),
        (right, rect.y, -1.0, 1.0),
        (rect.x, bottom, 1.0, -1.0),
        (right, bottom, -1.0, -1.0),
    ] {
        let x0 = if dir_x > 0.0 { cx } else { cx - c };
        let y0 = if dir_y > 0.0 { cy } else { cy - t };
        fill_rect(target, x0, y0, c, t, white);
        let x1 = if dir_x > 0.0 { cx } else { cx - t };
        let y1 = if dir_y > 0.0 { cy } else { cy - c };
        fill_rect(target, x1, y1, t, c, white);
    }
    // Edge midpoints.
    let mid_x = rect.x + rect.width / 2.0;
    let mid_y = rect.y + rect.height / 2.0;
    fill_rect(target, mid_x - e / 2.0, rect.y, e, t, white);
    fill_rect(target, mid_x - e / 2.0, bottom - t, e, t, white);
    fill_rect(target, rect.x, mid_y - e / 2.0, t, e, white);
    fill_rect(target, right - t, mid_y - e / 2.0, t, e, white);
}

fn draw_selection_outline<S: Surface>(target: &mut S, selection: &SelectionBox) {
    let Some(rect) = Rect::from_xywh(
        selection.x - SELECTION_INFLATE,
        selection.y - SELECTION_INFLATE,
        selection.width + SELECTION_INFLATE * 2.0,
        selection.height + SELECTION_INFLATE * 2.0,
    ) else {
        return;
    };
    let mut pb = PathBuilder::new();
    pb.push_rect(rect);
    let Some(path) = pb.finish() else { return };
    let stroke = Stroke {
        width: 1.5,
        dash: StrokeDash::new(vec![6.0, 4.0], 0.0),
        ..Stroke::default()
    };
    target.stroke_path(
        &path,
        SELECTION_COLOR,
        &stroke,
        BlendMode::SourceOver,
        SkTransform::identity(),
    );
}

/// Base placement: output scale, then rotate/flip about the image center.
fn base_transform(scene: &Scene, scale: f32) -> SkTransform {
    let mut t = SkTransform::from_scale(scale, scale);
    if !scene.transform.is_identity() {
        let cx = scene.base.width as f32 / 2.0;
        let cy = scene.base.height as f32 / 2.0;
        let fx = if scene.transform.flip_x { -1.0 } else { 1.0 };
        let fy = if scene.transform.flip_y { -1.0 } else { 1.0 };
        t = t
            .pre_concat(SkTransform::from_translate(cx, cy))
            .pre_concat(SkTransform::from_rotate(scene.transform.rotation))
            .pre_concat(SkTransform::from_scale(fx, fy))
            .pre_concat(SkTransform::from_translate(-cx, -cy));
    }
    t
}

fn draw_vignette<S: Surface>(
    target: &mut S,
    vignette: f32,
    image_w: f32,
    image_h: f32,
    transform: SkTransform,
) {
    let strength = vignette / 100.0;
    let radius = image_w.max(image_h) * VIGNETTE_RADIUS_RATIO;
    let inner = radius * (1.0 - strength * 0.5);
    let alpha = (strength * 0.8 * 255.0).round() as u8;

    let Some(rect) = Rect::from_xywh(0.0, 0.0, image_w, image_h) else {
        return;
    };
    let mut pb = PathBuilder::new();
    pb.push_rect(rect);
    let Some(path) = pb.finish() else { return };

    target.fill_radial_fade(
        &path,
        (image_w / 2.0, image_h / 2.0),
        inner,
        radius,
        Rgba::new(0, 0, 0, alpha),
        transform,
    );
}

/// Midpoint-smoothed polyline: quadratic segments through each interior
/// point toward the midpoint of the next pair, then a line to the last
/// point. `None` for fewer than two points.
pub fn smoothed_path(points: &[ImgPoint]) -> Option<Path> {
    if points.len() < 2 {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(points[0].x, points[0].y);
    for i in 1..points.len() - 1 {
        let xc = (points[i].x + points[i + 1].x) / 2.0;
        let yc = (points[i].y + points[i + 1].y) / 2.0;
        pb.quad_to(points[i].x, points[i].y, xc, yc);
    }
    let last = points[points.len() - 1];
    pb.line_to(last.x, last.y);
    pb.finish()
}

fn draw_path<S: Surface>(target: &mut S, path: &DrawingPath, transform: SkTransform) {
    let Some(outline) = smoothed_path(&path.points) else {
        return;
    };
    // Stroke width rides the overlay transform, so pass it unscaled.
    let stroke = Stroke {
        width: path.size,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    let (color, blend) = match path.kind {
        BrushKind::Brush => (path.color, BlendMode::SourceOver),
        BrushKind::Eraser => (Rgba::BLACK, BlendMode::DestinationOut),
    };
    target.stroke_path(&outline, color, &stroke, blend, transform);
}

fn draw_shape<S: Surface>(target: &mut S, shape: &ShapeOverlay, transform: SkTransform) {
    let stroke = Stroke {
        width: shape.stroke_width,
        ..Stroke::default()
    };

    match shape.kind {
        ShapeKind::Rectangle => {
            let Some(rect) = Rect::from_xywh(shape.x, shape.y, shape.width, shape.height) else {
                return;
            };
            let mut pb = PathBuilder::new();
            pb.push_rect(rect);
            let Some(path) = pb.finish() else { return };
            if shape.fill {
                target.fill_path(&path, shape.fill_color, BlendMode::SourceOver, transform);
            }
            target.stroke_path(&path, shape.stroke_color, &stroke, BlendMode::SourceOver, transform);
        }
        ShapeKind::Circle => {
            let Some(rect) = Rect::from_xywh(shape.x, shape.y, shape.width, shape.height) else {
                return;
            };
            let mut pb = PathBuilder::new();
            pb.push_oval(rect);
            let Some(path) = pb.finish() else { return };
            if shape.fill {
                target.fill_path(&path, shape.fill_color, BlendMode::SourceOver, transform);
            }
            target.stroke_path(&path, shape.stroke_color, &stroke, BlendMode::SourceOver, transform);
        }
        ShapeKind::Triangle => {
            let mut pb = PathBuilder::new();
            pb.move_to(shape.x + shape.width / 2.0, shape.y);
            pb.line_to(shape.x + shape.width, shape.y + shape.height);
            pb.line_to(shape.x, shape.y + shape.height);
            pb.close();
            let Some(path) = pb.finish() else { return };
            if shape.fill {
                target.fill_path(&path, shape.fill_color, BlendMode::SourceOver, transform);
            }
            target.stroke_path(&path, shape.stroke_color, &stroke, BlendMode::SourceOver, transform);
        }
        ShapeKind::Line => {
            let mut pb = PathBuilder::new();
            pb.move_to(shape.x, shape.y);
            pb.line_to(shape.x + shape.width, shape.y + shape.height);
            let Some(path) = pb.finish() else { return };
            target.stroke_path(&path, shape.stroke_color, &stroke, BlendMode::SourceOver, transform);
        }
        ShapeKind::Arrow => {
            let end_x = shape.x + shape.width;
            let end_y = shape.y + shape.height;
            let angle = shape.height.atan2(shape.width);

            let mut pb = PathBuilder::new();
            pb.move_to(shape.x, shape.y);
            pb.line_to(end_x, end_y);
            pb.move_to(end_x, end_y);
            pb.line_to(
                end_x - ARROW_HEAD_LENGTH * (angle - ARROW_HEAD_ANGLE).cos(),
                end_y - ARROW_HEAD_LENGTH * (angle - ARROW_HEAD_ANGLE).sin(),
            );
            pb.move_to(end_x, end_y);
            pb.line_to(
                end_x - ARROW_HEAD_LENGTH * (angle + ARROW_HEAD_ANGLE).cos(),
                end_y - ARROW_HEAD_LENGTH * (angle + ARROW_HEAD_ANGLE).sin(),
            );
            let Some(path) = pb.finish() else { return };
            target.stroke_path(&path, shape.stroke_color, &stroke, BlendMode::SourceOver, transform);
        }
        ShapeKind::Star => {
            let cx = shape.x + shape.width / 2.0;
            let cy = shape.y + shape.height / 2.0;
            let outer = shape.width.min(shape.height) / 2.0;
            let inner = outer * STAR_INNER_RATIO;

            let mut pb = PathBuilder::new();
            for i in 0..10 {
                let radius = if i % 2 == 0 { outer } else { inner };
                // First point straight up, alternating outer/inner.
                let a = std::f32::consts::FRAC_PI_2 * 3.0
                    + i as f32 * std::f32::consts::PI / 5.0;
                let px = cx + a.cos() * radius;
                let py = cy + a.sin() * radius;
                if i == 0 {
                    pb.move_to(px, py);
                } else {
                    pb.line_to(px, py);
                }
            }
            pb.close();
            let Some(path) = pb.finish() else { return };
            if shape.fill {
                target.fill_path(&path, shape.fill_color, BlendMode::SourceOver, transform);
            }
            target.stroke_path(&path, shape.stroke_color, &stroke, BlendMode::SourceOver, transform);
        }
    }
}

/// Rasterize one text overlay. Skipped silently when no font is
/// registered for the family (measurement still works via fallback
/// metrics, so hit testing is unaffected).
fn draw_text<S: Surface>(target: &mut S, overlay: &TextOverlay, fonts: &FontStore, scale: f32) {
    let Some(font) = fonts.face(&overlay.font_family, overlay.bold, overlay.italic) else {
        return;
    };
    let font = font.clone();
    for (line, x, y) in crate::text::layout_lines(fonts, overlay) {
        draw_line(target, &font, line, x * scale, y * scale, overlay.font_size * scale, overlay.color);
    }
}

fn draw_line<S: Surface>(
    target: &mut S,
    font: &FontArc,
    line: &str,
    x: f32,
    top_y: f32,
    size: f32,
    color: Rgba,
) {
    let px = PxScale::from(size);
    let scaled = font.as_scaled(px);
    // Top baseline: the anchor is the top of the em box.
    let baseline = top_y + scaled.ascent();

    let mut caret = x;
    let mut prev = None;
    for c in line.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(px, point(caret, baseline));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                target.blend_pixel(
                    bounds.min.x as i32 + gx as i32,
                    bounds.min.y as i32 + gy as i32,
                    color,
                    coverage,
                );
            });
        }
        caret += scaled.h_advance(id);
        prev = Some(id);
    }
}
