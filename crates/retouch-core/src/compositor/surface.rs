//! Render target abstraction over tiny-skia.
//!
//! The compositor draws through the [`Surface`] trait so the render
//! pipeline stays independent of the backing store. [`SoftwareSurface`]
//! is the only production implementation: a premultiplied-alpha pixmap
//! that converts back to the engine's straight-alpha [`Bitmap`] at the
//! end of a pass.

use tiny_skia::{
    BlendMode, Color, FilterQuality, GradientStop, IntSize, Paint, Path, Pixmap, PixmapPaint,
    Point as SkPoint, RadialGradient, Shader, SpreadMode, Stroke, Transform,
};

use crate::decode::Bitmap;
use crate::Rgba;

use super::RenderError;

/// A drawing target for one compositor pass.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    /// Draw a straight-alpha bitmap under an affine transform.
    fn draw_bitmap(&mut self, bitmap: &Bitmap, transform: Transform) -> Result<(), RenderError>;

    /// Fill a path with a solid color.
    fn fill_path(&mut self, path: &Path, color: Rgba, blend: BlendMode, transform: Transform);

    /// Stroke a path with a solid color.
    fn stroke_path(
        &mut self,
        path: &Path,
        color: Rgba,
        stroke: &Stroke,
        blend: BlendMode,
        transform: Transform,
    );

    /// Fill a path with a radial fade from transparent at `inner_radius`
    /// to `color` at `outer_radius`, centered on `center`.
    fn fill_radial_fade(
        &mut self,
        path: &Path,
        center: (f32, f32),
        inner_radius: f32,
        outer_radius: f32,
        color: Rgba,
        transform: Transform,
    );

    /// Blend a single pixel at the given coverage (used by the glyph
    /// rasterizer). Out-of-bounds writes are ignored.
    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba, coverage: f32);

    /// Run a pixel pass over the flattened surface in straight-alpha
    /// RGBA, writing the result back.
    fn with_straight_pixels(&mut self, f: &mut dyn FnMut(&mut [u8], u32, u32));

    /// Convert the surface contents to a straight-alpha bitmap.
    fn to_bitmap(&self) -> Bitmap;
}

/// CPU raster surface backed by a tiny-skia pixmap.
pub struct SoftwareSurface {
    pixmap: Pixmap,
}

impl SoftwareSurface {
    /// Allocate a transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(width, height)
            .ok_or(RenderError::SurfaceAlloc { width, height })?;
        Ok(Self { pixmap })
    }

    fn solid_paint(color: Rgba, blend: BlendMode) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.shader = Shader::SolidColor(Color::from_rgba8(color.r, color.g, color.b, color.a));
        paint.blend_mode = blend;
        paint.anti_alias = true;
        paint
    }
}

impl Surface for SoftwareSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, transform: Transform) -> Result<(), RenderError> {
        // tiny-skia wants premultiplied data.
        let mut data = bitmap.pixels.clone();
        for chunk in data.chunks_exact_mut(4) {
            let a = chunk[3] as u16;
            if a < 255 {
                chunk[0] = (chunk[0] as u16 * a / 255) as u8;
                chunk[1] = (chunk[1] as u16 * a / 255) as u8;
                chunk[2] = (chunk[2] as u16 * a / 255) as u8;
            }
        }
        let size = IntSize::from_wh(bitmap.width, bitmap.height).ok_or(
            RenderError::SurfaceAlloc {
                width: bitmap.width,
                height: bitmap.height,
            },
        )?;
        let src = Pixmap::from_vec(data, size).ok_or(RenderError::SurfaceAlloc {
            width: bitmap.width,
            height: bitmap.height,
        })?;

        let mut paint = PixmapPaint::default();
        paint.quality = FilterQuality::Bilinear;
        self.pixmap
            .draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);
        Ok(())
    }

    fn fill_path(&mut self, path: &Path, color: Rgba, blend: BlendMode, transform: Transform) {
        let paint = Self::solid_paint(color, blend);
        self.pixmap
            .fill_path(path, &paint, tiny_skia::FillRule::Winding, transform, None);
    }

    fn stroke_path(
        &mut self,
        path: &Path,
        color: Rgba,
        stroke: &Stroke,
        blend: BlendMode,
        transform: Transform,
    ) {
        let paint = Self::solid_paint(color, blend);
        self.pixmap.stroke_path(path, &paint, stroke, transform, None);
    }

    fn fill_radial_fade(
        &mut self,
        path: &Path,
        center: (f32, f32),
        inner_radius: f32,
        outer_radius: f32,
        color: Rgba,
        transform: Transform,
    ) {
        if outer_radius <= 0.0 {
            return;
        }
        let inner_stop = (inner_radius / outer_radius).clamp(0.0, 1.0);
        let transparent = Color::from_rgba8(color.r, color.g, color.b, 0);
        let full = Color::from_rgba8(color.r, color.g, color.b, color.a);
        let stops = vec![
            GradientStop::new(0.0, transparent),
            GradientStop::new(inner_stop, transparent),
            GradientStop::new(1.0, full),
        ];
        let Some(shader) = RadialGradient::new(
            SkPoint::from_xy(center.0, center.1),
            SkPoint::from_xy(center.0, center.1),
            outer_radius,
            stops,
            SpreadMode::Pad,
            Transform::identity(),
        ) else {
            return;
        };
        let mut paint = Paint::default();
        paint.shader = shader;
        paint.anti_alias = true;
        self.pixmap
            .fill_path(path, &paint, tiny_skia::FillRule::Winding, transform, None);
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.pixmap.width() as i32 || y >= self.pixmap.height() as i32 {
            return;
        }
        let coverage = coverage.clamp(0.0, 1.0);
        if coverage <= 0.0 {
            return;
        }
        let src_a = color.a as f32 / 255.0 * coverage;
        // Premultiplied source-over.
        let sr = color.r as f32 / 255.0 * src_a;
        let sg = color.g as f32 / 255.0 * src_a;
        let sb = color.b as f32 / 255.0 * src_a;

        let idx = ((y as u32 * self.pixmap.width() + x as u32) * 4) as usize;
        let data = self.pixmap.data_mut();
        let inv = 1.0 - src_a;
        data[idx] = ((sr + data[idx] as f32 / 255.0 * inv) * 255.0).round() as u8;
        data[idx + 1] = ((sg + data[idx + 1] as f32 / 255.0 * inv) * 255.0).round() as u8;
        data[idx + 2] = ((sb + data[idx + 2] as f32 / 255.0 * inv) * 255.0).round() as u8;
        data[idx + 3] = ((src_a + data[idx + 3] as f32 / 255.0 * inv) * 255.0).round() as u8;
    }

    fn with_straight_pixels(&mut self, f: &mut dyn FnMut(&mut [u8], u32, u32)) {
        let width = self.pixmap.width();
        let height = self.pixmap.height();
        let mut straight = self.to_bitmap().pixels;
        f(&mut straight, width, height);

        let data = self.pixmap.data_mut();
        for (dst, src) in data.chunks_exact_mut(4).zip(straight.chunks_exact(4)) {
            let a = src[3] as u16;
            dst[0] = (src[0] as u16 * a / 255) as u8;
            dst[1] = (src[1] as u16 * a / 255) as u8;
            dst[2] = (src[2] as u16 * a / 255) as u8;
            dst[3] = src[3];
        }
    }

    fn to_bitmap(&self) -> Bitmap {
        let width = self.pixmap.width();
        let height = self.pixmap.height();
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            pixels.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Bitmap::new(width, height, pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::PathBuilder;

    fn full_rect(w: f32, h: f32) -> Path {
        let mut pb = PathBuilder::new();
        pb.push_rect(tiny_skia::Rect::from_xywh(0.0, 0.0, w, h).unwrap());
        pb.finish().unwrap()
    }

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = SoftwareSurface::new(4, 4).unwrap();
        let bitmap = surface.to_bitmap();
        assert!(bitmap.pixels.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zero_size_surface_fails() {
        assert!(matches!(
            SoftwareSurface::new(0, 10),
            Err(RenderError::SurfaceAlloc { .. })
        ));
    }

    #[test]
    fn test_fill_path_solid() {
        let mut surface = SoftwareSurface::new(4, 4).unwrap();
        surface.fill_path(
            &full_rect(4.0, 4.0),
            Rgba::new(255, 0, 0, 255),
            BlendMode::SourceOver,
            Transform::identity(),
        );
        let bitmap = surface.to_bitmap();
        assert_eq!(&bitmap.pixels[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_destination_out_erases() {
        let mut surface = SoftwareSurface::new(4, 4).unwrap();
        surface.fill_path(
            &full_rect(4.0, 4.0),
            Rgba::new(0, 255, 0, 255),
            BlendMode::SourceOver,
            Transform::identity(),
        );
        surface.fill_path(
            &full_rect(2.0, 4.0),
            Rgba::BLACK,
            BlendMode::DestinationOut,
            Transform::identity(),
        );
        let bitmap = surface.to_bitmap();
        // Left half erased to transparent, right half still green.
        assert_eq!(bitmap.pixels[3], 0);
        let right = ((2 * 4) + 3) as usize;
        assert_eq!(bitmap.pixels[right], 255);
    }

    #[test]
    fn test_draw_bitmap_round_trips_opaque_pixels() {
        let mut surface = SoftwareSurface::new(2, 2).unwrap();
        let src = Bitmap::new(2, 2, vec![7, 8, 9, 255].repeat(4));
        surface.draw_bitmap(&src, Transform::identity()).unwrap();
        assert_eq!(&surface.to_bitmap().pixels[..4], &[7, 8, 9, 255]);
    }

    #[test]
    fn test_blend_pixel_full_coverage() {
        let mut surface = SoftwareSurface::new(2, 2).unwrap();
        surface.blend_pixel(1, 1, Rgba::WHITE, 1.0);
        let bitmap = surface.to_bitmap();
        let idx = ((1 * 2 + 1) * 4) as usize;
        assert_eq!(bitmap.pixels[idx + 3], 255);
        assert_eq!(bitmap.pixels[idx], 255);
    }

    #[test]
    fn test_blend_pixel_out_of_bounds_ignored() {
        let mut surface = SoftwareSurface::new(2, 2).unwrap();
        surface.blend_pixel(-1, 0, Rgba::WHITE, 1.0);
        surface.blend_pixel(5, 5, Rgba::WHITE, 1.0);
        assert!(surface.to_bitmap().pixels.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_with_straight_pixels_round_trip() {
        let mut surface = SoftwareSurface::new(2, 2).unwrap();
        surface.fill_path(
            &full_rect(2.0, 2.0),
            Rgba::new(100, 150, 200, 255),
            BlendMode::SourceOver,
            Transform::identity(),
        );
        surface.with_straight_pixels(&mut |pixels, _, _| {
            for chunk in pixels.chunks_exact_mut(4) {
                chunk[0] = 255 - chunk[0];
            }
        });
        let bitmap = surface.to_bitmap();
        assert_eq!(bitmap.pixels[0], 155);
        assert_eq!(bitmap.pixels[1], 150);
    }
}
