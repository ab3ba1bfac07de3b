//! Unsharp mask sharpening pass.
//!
//! Runs on the flattened surface after the base image, vignette, and
//! filter chain have been composited. A 3x3 box blur builds the mask and
//! each color channel moves away from its blurred value:
//! `out = clamp(orig + (orig - blur) * amount)` with
//! `amount = sharpness / 100 * 2`.
//!
//! The 1px border is left untouched; the kernel never reads outside the
//! buffer. Alpha is not sharpened.

/// Apply unsharp mask sharpening in place. `sharpness` is the slider
/// value (0 to 100); 0 is a no-op.
pub fn unsharp_mask(pixels: &mut [u8], width: u32, height: u32, sharpness: f32) {
    if sharpness <= 0.0 || width < 3 || height < 3 {
        return;
    }
    let amount = sharpness / 100.0 * 2.0;
    let w = width as usize;
    let h = height as usize;

    // Blur buffer starts as a copy so the border keeps original values.
    let mut blurred = pixels.to_vec();
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let idx = (y * w + x) * 4;
            for c in 0..3 {
                let mut sum = 0u32;
                for ky in 0..3 {
                    for kx in 0..3 {
                        let kidx = ((y + ky - 1) * w + (x + kx - 1)) * 4 + c;
                        sum += pixels[kidx] as u32;
                    }
                }
                blurred[idx + c] = (sum / 9) as u8;
            }
        }
    }

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let idx = (y * w + x) * 4;
            for c in 0..3 {
                let orig = pixels[idx + c] as f32;
                let diff = orig - blurred[idx + c] as f32;
                pixels[idx + c] = (orig + diff * amount).clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_image(w: u32, h: u32, value: u8) -> Vec<u8> {
        let mut pixels = vec![value; (w * h * 4) as usize];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk[3] = 255;
        }
        pixels
    }

    #[test]
    fn test_zero_sharpness_is_noop() {
        let mut pixels = gray_image(5, 5, 100);
        let before = pixels.clone();
        unsharp_mask(&mut pixels, 5, 5, 0.0);
        assert_eq!(pixels, before);
    }

    #[test]
    fn test_flat_image_unchanged() {
        // Uniform image: blur equals original, so the mask is zero.
        let mut pixels = gray_image(5, 5, 100);
        let before = pixels.clone();
        unsharp_mask(&mut pixels, 5, 5, 100.0);
        assert_eq!(pixels, before);
    }

    #[test]
    fn test_edge_contrast_increases() {
        // Left half dark, right half bright, 6x5.
        let w = 6u32;
        let h = 5u32;
        let mut pixels = Vec::new();
        for _y in 0..h {
            for x in 0..w {
                let v = if x < 3 { 50 } else { 200 };
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let before = pixels.clone();
        unsharp_mask(&mut pixels, w, h, 100.0);

        // Interior pixel just left of the edge gets darker, just right
        // gets brighter.
        let left = ((2 * w + 2) * 4) as usize;
        let right = ((2 * w + 3) * 4) as usize;
        assert!(pixels[left] < before[left]);
        assert!(pixels[right] > before[right]);
    }

    #[test]
    fn test_border_untouched() {
        let w = 5u32;
        let mut pixels = Vec::new();
        for i in 0..25u8 {
            pixels.extend_from_slice(&[i * 10, 0, 0, 255]);
        }
        let before = pixels.clone();
        unsharp_mask(&mut pixels, w, 5, 100.0);
        // Corner pixels are outside the kernel's reach.
        assert_eq!(&pixels[..4], &before[..4]);
        let last = pixels.len() - 4;
        assert_eq!(&pixels[last..], &before[last..]);
    }

    #[test]
    fn test_alpha_never_sharpened() {
        let mut pixels = Vec::new();
        for i in 0..25u8 {
            pixels.extend_from_slice(&[i * 10, 0, 0, 200]);
        }
        unsharp_mask(&mut pixels, 5, 5, 100.0);
        for chunk in pixels.chunks_exact(4) {
            assert_eq!(chunk[3], 200);
        }
    }

    #[test]
    fn test_tiny_image_skipped() {
        let mut pixels = gray_image(2, 2, 50);
        let before = pixels.clone();
        unsharp_mask(&mut pixels, 2, 2, 100.0);
        assert_eq!(pixels, before);
    }
}
