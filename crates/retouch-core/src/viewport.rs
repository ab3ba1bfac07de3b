//! Viewport state and the screen/image coordinate mapper.
//!
//! The host measures where the (already zoomed and panned) canvas element
//! sits on screen and hands that rectangle in as a [`DisplayBox`] with
//! every pointer event. Mapping back to image pixels is then a pure
//! per-axis scale from the box to the image dimensions. Nothing here
//! re-derives zoom or pan from the box; they only affect *where* the box
//! is, which the measurement already accounts for.
//!
//! Zoom and pan are view-only state: they change what the user sees, are
//! never recorded in undo history, and never alter image or overlay data.

use serde::{Deserialize, Serialize};

use crate::Point;

/// Zoom step per zoom-in/out command.
const ZOOM_STEP: f32 = 1.25;
/// Zoom bounds.
const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 5.0;

/// Screen-space rectangle of the displayed canvas, as measured by the
/// host after zoom and pan are applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayBox {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Map a screen-space point to image pixel coordinates, clamped to
    /// the image bounds.
    ///
    /// A degenerate (zero-sized) box maps everything to the origin rather
    /// than producing non-finite coordinates.
    pub fn to_image(&self, screen: Point, image_width: f32, image_height: f32) -> Point {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Point::new(0.0, 0.0);
        }
        let scale_x = image_width / self.width;
        let scale_y = image_height / self.height;
        let x = (screen.x - self.left) * scale_x;
        let y = (screen.y - self.top) * scale_y;
        Point::new(x.clamp(0.0, image_width), y.clamp(0.0, image_height))
    }

    /// Map an image pixel coordinate back to screen space.
    pub fn to_screen(&self, image: Point, image_width: f32, image_height: f32) -> Point {
        if image_width <= 0.0 || image_height <= 0.0 {
            return Point::new(self.left, self.top);
        }
        Point::new(
            self.left + image.x / image_width * self.width,
            self.top + image.y / image_height * self.height,
        )
    }
}

/// Current zoom factor and pan offset of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Zoom factor (1.0 = fit size chosen by the host).
    pub zoom: f32,
    /// Pan offset in screen pixels.
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl ViewState {
    /// Multiply zoom by one step, clamped to the maximum.
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    /// Divide zoom by one step, clamped to the minimum.
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Reset zoom and pan to defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Shift the pan offset by a screen-space delta.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: mapped coordinates always land inside the image.
        #[test]
        fn prop_to_image_stays_in_bounds(
            left in -1000.0f32..1000.0,
            top in -1000.0f32..1000.0,
            width in 1.0f32..2000.0,
            height in 1.0f32..2000.0,
            sx in -5000.0f32..5000.0,
            sy in -5000.0f32..5000.0,
        ) {
            let display = DisplayBox::new(left, top, width, height);
            let p = display.to_image(Point::new(sx, sy), 1000.0, 800.0);
            prop_assert!(p.x >= 0.0 && p.x <= 1000.0);
            prop_assert!(p.y >= 0.0 && p.y <= 800.0);
        }

        /// Property: zoom stays within bounds under any command sequence.
        #[test]
        fn prop_zoom_bounded(steps in proptest::collection::vec(any::<bool>(), 0..100)) {
            let mut view = ViewState::default();
            for zoom_in in steps {
                if zoom_in {
                    view.zoom_in();
                } else {
                    view.zoom_out();
                }
                prop_assert!(view.zoom >= 0.1 && view.zoom <= 5.0);
            }
        }
    }
}
