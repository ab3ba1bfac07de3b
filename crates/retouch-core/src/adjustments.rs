//! The adjustment model: slider values to pixel operations.
//!
//! Each slider maps to one conceptual image operation, applied in a fixed
//! order regardless of which sliders are active:
//! 1. Brightness
//! 2. Contrast
//! 3. Saturation
//! 4. Hue rotation
//! 5. Sepia
//! 6. Grayscale
//! 7. Invert
//! 8. Blur
//!
//! Sharpness and vignette are compositor passes (see `compositor`), not
//! part of this chain. Operations at their identity value are omitted from
//! the chain; omission is an optimization only, so applying an identity
//! operation explicitly must also be a bit-for-bit no-op.
//!
//! The per-pixel math follows the CSS/SVG filter definitions so the raster
//! pipeline and the CSS preview string produced by [`css_filter_string`]
//! agree on what every slider means.

use crate::Adjustments;

/// One pixel operation in the filter chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    /// Channel multiplier (`1 + brightness/100`).
    Brightness(f32),
    /// Contrast factor around mid-gray (`1 + contrast/100`).
    Contrast(f32),
    /// Saturation factor around per-pixel luminance (`1 + saturation/100`).
    Saturate(f32),
    /// Hue rotation in degrees.
    HueRotate(f32),
    /// Sepia amount (0.0 to 1.0).
    Sepia(f32),
    /// Grayscale amount (0.0 to 1.0).
    Grayscale(f32),
    /// Invert amount (0.0 to 1.0).
    Invert(f32),
    /// Box blur radius in pixels (`blur/10`).
    Blur(f32),
}

/// Build the ordered operation list for an adjustment record.
///
/// Identity values are omitted, so default adjustments produce an empty
/// chain and the render path can skip per-pixel work entirely.
pub fn filter_chain(adjustments: &Adjustments) -> Vec<FilterOp> {
    let mut ops = Vec::new();

    if adjustments.brightness != 0.0 {
        ops.push(FilterOp::Brightness(1.0 + adjustments.brightness / 100.0));
    }
    if adjustments.contrast != 0.0 {
        ops.push(FilterOp::Contrast(1.0 + adjustments.contrast / 100.0));
    }
    if adjustments.saturation != 0.0 {
        ops.push(FilterOp::Saturate(1.0 + adjustments.saturation / 100.0));
    }
    if adjustments.hue != 0.0 {
        ops.push(FilterOp::HueRotate(adjustments.hue));
    }
    if adjustments.sepia > 0.0 {
        ops.push(FilterOp::Sepia(adjustments.sepia / 100.0));
    }
    if adjustments.grayscale > 0.0 {
        ops.push(FilterOp::Grayscale(adjustments.grayscale / 100.0));
    }
    if adjustments.invert > 0.0 {
        ops.push(FilterOp::Invert(adjustments.invert / 100.0));
    }
    if adjustments.blur > 0.0 {
        ops.push(FilterOp::Blur(adjustments.blur / 10.0));
    }

    ops
}

/// Apply a filter chain to RGBA pixel data in place.
///
/// # Arguments
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width`, `height` - Buffer dimensions (needed by the blur pass)
/// * `ops` - Operations from [`filter_chain`], applied in order
pub fn apply_filter_chain(pixels: &mut [u8], width: u32, height: u32, ops: &[FilterOp]) {
    for op in ops {
        match *op {
            FilterOp::Blur(radius) => box_blur(pixels, width, height, radius),
            _ => {
                for chunk in pixels.chunks_exact_mut(4) {
                    let rgb = (
                        chunk[0] as f32 / 255.0,
                        chunk[1] as f32 / 255.0,
                        chunk[2] as f32 / 255.0,
                    );
                    let (r, g, b) = apply_color_op(rgb, *op);
                    chunk[0] = (r.clamp(0.0, 1.0) * 255.0).round() as u8;
                    chunk[1] = (g.clamp(0.0, 1.0) * 255.0).round() as u8;
                    chunk[2] = (b.clamp(0.0, 1.0) * 255.0).round() as u8;
                }
            }
        }
    }
}

#[inline]
fn apply_color_op(rgb: (f32, f32, f32), op: FilterOp) -> (f32, f32, f32) {
    let (r, g, b) = rgb;
    match op {
        FilterOp::Brightness(m) => (r * m, g * m, b * m),
        FilterOp::Contrast(m) => (
            (r - 0.5) * m + 0.5,
            (g - 0.5) * m + 0.5,
            (b - 0.5) * m + 0.5,
        ),
        FilterOp::Saturate(m) => {
            let gray = luminance(r, g, b);
            (
                gray + (r - gray) * m,
                gray + (g - gray) * m,
                gray + (b - gray) * m,
            )
        }
        FilterOp::HueRotate(degrees) => hue_rotate(r, g, b, degrees),
        FilterOp::Sepia(amount) => {
            // Interpolate between identity and the full sepia matrix.
            let sr = 0.393 * r + 0.769 * g + 0.189 * b;
            let sg = 0.349 * r + 0.686 * g + 0.168 * b;
            let sb = 0.272 * r + 0.534 * g + 0.131 * b;
            (
                r + (sr - r) * amount,
                g + (sg - g) * amount,
                b + (sb - b) * amount,
            )
        }
        FilterOp::Grayscale(amount) => {
            let gray = luminance(r, g, b);
            (
                r + (gray - r) * amount,
                g + (gray - g) * amount,
                b + (gray - b) * amount,
            )
        }
        FilterOp::Invert(amount) => (
            r + (1.0 - 2.0 * r) * amount,
            g + (1.0 - 2.0 * g) * amount,
            b + (1.0 - 2.0 * b) * amount,
        ),
        FilterOp::Blur(_) => (r, g, b),
    }
}

/// Calculate luminance using ITU-R BT.709 coefficients.
#[inline]
fn luminance(r: f32, g: f32, b: f32) -> f32 {
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// Hue rotation via the SVG `feColorMatrix type="hueRotate"` matrix.
#[inline]
fn hue_rotate(r: f32, g: f32, b: f32, degrees: f32) -> (f32, f32, f32) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let nr = (0.213 + cos * 0.787 - sin * 0.213) * r
        + (0.715 - cos * 0.715 - sin * 0.715) * g
        + (0.072 - cos * 0.072 + sin * 0.928) * b;
    let ng = (0.213 - cos * 0.213 + sin * 0.143) * r
        + (0.715 + cos * 0.285 + sin * 0.140) * g
        + (0.072 - cos * 0.072 - sin * 0.283) * b;
    let nb = (0.213 - cos * 0.213 - sin * 0.787) * r
        + (0.715 - cos * 0.715 + sin * 0.715) * g
        + (0.072 + cos * 0.928 + sin * 0.072) * b;
    (nr, ng, nb)
}

/// Separable box blur over all four RGBA channels.
///
/// A single box pass approximates the CSS gaussian closely enough at the
/// small radii this slider produces (at most 10px).
fn box_blur(pixels: &mut [u8], width: u32, height: u32, radius: f32) {
    let radius = radius.round() as i32;
    if radius <= 0 || width == 0 || height == 0 {
        return;
    }

    let w = width as i32;
    let h = height as i32;
    let mut scratch = pixels.to_vec();

    // Horizontal pass: pixels -> scratch
    for y in 0..h {
        for x in 0..w {
            let mut sum = [0u32; 4];
            let mut count = 0u32;
            for dx in -radius..=radius {
                let sx = x + dx;
                if sx < 0 || sx >= w {
                    continue;
                }
                let idx = ((y * w + sx) * 4) as usize;
                for c in 0..4 {
                    sum[c] += pixels[idx + c] as u32;
                }
                count += 1;
            }
            let idx = ((y * w + x) * 4) as usize;
            for c in 0..4 {
                scratch[idx + c] = (sum[c] / count) as u8;
            }
        }
    }

    // Vertical pass: scratch -> pixels
    for y in 0..h {
        for x in 0..w {
            let mut sum = [0u32; 4];
            let mut count = 0u32;
            for dy in -radius..=radius {
                let sy = y + dy;
                if sy < 0 || sy >= h {
                    continue;
                }
                let idx = ((sy * w + x) * 4) as usize;
                for c in 0..4 {
                    sum[c] += scratch[idx + c] as u32;
                }
                count += 1;
            }
            let idx = ((y * w + x) * 4) as usize;
            for c in 0..4 {
                pixels[idx + c] = (sum[c] / count) as u8;
            }
        }
    }
}

/// Build the CSS `filter` string for the interactive DOM preview.
///
/// Mirrors the raster chain's semantics; the multiplier filters are always
/// present (identity multipliers are harmless in CSS), the one-sided
/// filters appear only when active.
pub fn css_filter_string(adjustments: &Adjustments) -> String {
    let mut filters = vec![
        format!("brightness({})", 1.0 + adjustments.brightness / 100.0),
        format!("contrast({})", 1.0 + adjustments.contrast / 100.0),
        format!("saturate({})", 1.0 + adjustments.saturation / 100.0),
    ];

    if adjustments.hue != 0.0 {
        filters.push(format!("hue-rotate({}deg)", adjustments.hue));
    }
    if adjustments.sepia > 0.0 {
        filters.push(format!("sepia({})", adjustments.sepia / 100.0));
    }
    if adjustments.grayscale > 0.0 {
        filters.push(format!("grayscale({})", adjustments.grayscale / 100.0));
    }
    if adjustments.invert > 0.0 {
        filters.push(format!("invert({})", adjustments.invert / 100.0));
    }
    if adjustments.blur > 0.0 {
        filters.push(format!("blur({}px)", adjustments.blur / 10.0));
    }

    filters.join(" ")
}


// ============================================================================
// Property-Based Tests
// ============================================================================
