//! Pointer interaction state machine.
//!
//! One gesture is in flight at a time. `pointer_down` classifies the
//! gesture from the active tool and what lies under the pointer,
//! `pointer_move` feeds it, and `pointer_up` commits or discards it.
//! Commits that change durable state push exactly one history entry;
//! panning and abandoned gestures push nothing.
//!
//! All hit testing and gesture geometry happen in image coordinates; the
//! host passes raw screen coordinates plus the measured [`DisplayBox`]
//! and the mapping happens here. Panning is the exception: its deltas
//! stay in screen space.

use serde::{Deserialize, Serialize};

use crate::overlay::{normalize_rect, BrushKind, DrawingPath, ShapeOverlay, TextOverlay};
use crate::session::{EditorSession, Tool};
use crate::viewport::DisplayBox;
use crate::{CropRect, Point};

/// Crop handle hit box half-size in image pixels.
const CROP_HANDLE_HIT: f32 = 20.0;
/// Minimum crop dimension for a fresh rubber-band selection.
const MIN_RUBBER_BAND: f32 = 5.0;
/// Minimum crop dimension while resizing with a mouse.
const MIN_RESIZE_MOUSE: f32 = 20.0;
/// Minimum crop dimension while resizing with touch.
const MIN_RESIZE_TOUCH: f32 = 10.0;
/// Minimum committed shape dimension.
const MIN_SHAPE: f32 = 5.0;

/// What kind of pointer started the gesture. Touch gets looser minimums
/// on crop resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Crop aspect ratio constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "free")]
    Free,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Wide16x9,
    #[serde(rename = "9:16")]
    Tall9x16,
    #[serde(rename = "4:3")]
    Standard4x3,
    #[serde(rename = "3:4")]
    Tall3x4,
    #[serde(rename = "3:2")]
    Classic3x2,
    #[serde(rename = "2:3")]
    Tall2x3,
}

impl AspectRatio {
    /// Width/height ratio, or `None` for free-form.
    pub fn ratio(self) -> Option<f32> {
        match self {
            AspectRatio::Free => None,
            AspectRatio::Square => Some(1.0),
            AspectRatio::Wide16x9 => Some(16.0 / 9.0),
            AspectRatio::Tall9x16 => Some(9.0 / 16.0),
            AspectRatio::Standard4x3 => Some(4.0 / 3.0),
            AspectRatio::Tall3x4 => Some(3.0 / 4.0),
            AspectRatio::Classic3x2 => Some(3.0 / 2.0),
            AspectRatio::Tall2x3 => Some(2.0 / 3.0),
        }
    }
}

/// Which part of the pending crop a drag grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropHandle {
    Nw,
    Ne,
    Sw,
    Se,
    N,
    S,
    W,
    E,
    /// Inside the rectangle: drag the whole selection.
    Move,
}

impl CropHandle {
    fn touches_horizontal_edge(self) -> bool {
        matches!(
            self,
            CropHandle::E | CropHandle::W | CropHandle::Ne | CropHandle::Nw | CropHandle::Se | CropHandle::Sw
        )
    }
}

/// Hit test a point against a crop rectangle's handles, corners first,
/// then edge midpoints, then the interior.
pub fn hit_crop_handle(rect: &CropRect, p: Point) -> Option<CropHandle> {
    let candidates = [
        (rect.x, rect.y, CropHandle::Nw),
        (rect.x + rect.width, rect.y, CropHandle::Ne),
        (rect.x, rect.y + rect.height, CropHandle::Sw),
        (rect.x + rect.width, rect.y + rect.height, CropHandle::Se),
        (rect.x + rect.width / 2.0, rect.y, CropHandle::N),
        (rect.x + rect.width / 2.0, rect.y + rect.height, CropHandle::S),
        (rect.x, rect.y + rect.height / 2.0, CropHandle::W),
        (rect.x + rect.width, rect.y + rect.height / 2.0, CropHandle::E),
    ];
    for (hx, hy, handle) in candidates {
        if (p.x - hx).abs() < CROP_HANDLE_HIT && (p.y - hy).abs() < CROP_HANDLE_HIT {
            return Some(handle);
        }
    }
    if rect.contains(p) {
        return Some(CropHandle::Move);
    }
    None
}

/// The gesture currently in flight.
#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Idle,
    /// Select-tool drag on empty canvas; deltas in screen space.
    Panning { last_screen: Point },
    /// Freehand stroke in progress.
    Drawing { points: Vec<Point> },
    /// Dragging out a fresh crop selection.
    CropRubberBand { origin: Point },
    /// Resizing or moving the pending crop.
    CropAdjust {
        handle: CropHandle,
        start: Point,
        initial: CropRect,
    },
    /// Dragging out a new shape.
    ShapeRubberBand { origin: Point, current: Point },
    /// Moving an existing text overlay.
    DragText { id: String, offset: Point },
    /// Moving an existing shape.
    DragShape { id: String, offset: Point },
}

/// Pointer gesture tracker. One per session.
#[derive(Debug, Clone)]
pub struct Interaction {
    gesture: Gesture,
    pointer: PointerKind,
    moved: bool,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            gesture: Gesture::Idle,
            pointer: PointerKind::Mouse,
            moved: false,
        }
    }
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    /// The in-progress stroke, for live preview. `None` outside a draw
    /// gesture or before the stroke has two points.
    pub fn live_path(&self, session: &EditorSession) -> Option<DrawingPath> {
        let Gesture::Drawing { points } = &self.gesture else {
            return None;
        };
        if points.len() < 2 {
            return None;
        }
        let settings = &session.draw_settings;
        Some(DrawingPath {
            id: "path-pending".to_string(),
            points: points.clone(),
            color: match settings.kind {
                BrushKind::Brush => settings.color,
                BrushKind::Eraser => crate::Rgba::BLACK,
            },
            size: settings.size,
            kind: settings.kind,
        })
    }

    /// The in-progress shape rubber band, for live preview.
    pub fn live_shape(&self, session: &EditorSession) -> Option<ShapeOverlay> {
        let Gesture::ShapeRubberBand { origin, current } = &self.gesture else {
            return None;
        };
        let (x, y, w, h) = normalize_rect(
            origin.x,
            origin.y,
            current.x - origin.x,
            current.y - origin.y,
        );
        let settings = &session.shape_settings;
        Some(ShapeOverlay {
            id: "shape-pending".to_string(),
            kind: settings.kind,
            x,
            y,
            width: w,
            height: h,
            fill: settings.fill,
            fill_color: settings.fill_color,
            stroke_color: settings.stroke_color,
            stroke_width: settings.stroke_width,
        })
    }

    /// Begin a gesture.
    pub fn pointer_down(
        &mut self,
        session: &mut EditorSession,
        screen: Point,
        display: &DisplayBox,
        kind: PointerKind,
    ) {
        let p = session.to_image(screen, display);
        self.pointer = kind;
        self.moved = false;

        // Existing overlays win over tool defaults for the tools that
        // can manipulate them.
        if matches!(session.tool, Tool::Text | Tool::Select) {
            let hit = hit_text(session, p).map(|t| (t.id.clone(), Point::new(p.x - t.x, p.y - t.y)));
            if let Some((id, offset)) = hit {
                session.selected_text = Some(id.clone());
                session.selected_shape = None;
                self.gesture = Gesture::DragText { id, offset };
                return;
            }
        }
        if matches!(session.tool, Tool::Shapes | Tool::Select) {
            if let Some(shape) = session.shapes.iter().find(|s| s.contains(p)) {
                let offset = Point::new(p.x - shape.x, p.y - shape.y);
                session.selected_shape = Some(shape.id.clone());
                session.selected_text = None;
                self.gesture = Gesture::DragShape {
                    id: shape.id.clone(),
                    offset,
                };
                return;
            }
        }

        // Empty-canvas press always clears the selection.
        session.selected_text = None;
        session.selected_shape = None;

        match session.tool {
            Tool::Select => {
                self.gesture = Gesture::Panning {
                    last_screen: screen,
                };
            }
            Tool::Crop => {
                if let Some(rect) = session.crop {
                    if let Some(handle) = hit_crop_handle(&rect, p) {
                        self.gesture = Gesture::CropAdjust {
                            handle,
                            start: p,
                            initial: rect,
                        };
                        return;
                    }
                }
                session.crop = None;
                self.gesture = Gesture::CropRubberBand { origin: p };
            }
            Tool::Draw => {
                self.gesture = Gesture::Drawing { points: vec![p] };
            }
            Tool::Text => {
                // Creates immediately; there is nothing to drag out.
                let id = session.add_text_at(p);
                session.selected_text = Some(id);
                session.push_history();
                self.gesture = Gesture::Idle;
            }
            Tool::Shapes => {
                self.gesture = Gesture::ShapeRubberBand {
                    origin: p,
                    current: p,
                };
            }
            // Panel tools leave the canvas pointer inert.
            Tool::Adjustments | Tool::Filters | Tool::Export => {
                self.gesture = Gesture::Idle;
            }
        }
    }

    /// Feed pointer motion into the gesture.
    pub fn pointer_move(
        &mut self,
        session: &mut EditorSession,
        screen: Point,
        display: &DisplayBox,
    ) {
        let p = session.to_image(screen, display);

        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { last_screen } => {
                let dx = screen.x - last_screen.x;
                let dy = screen.y - last_screen.y;
                if dx != 0.0 || dy != 0.0 {
                    session.view.pan_by(dx, dy);
                    *last_screen = screen;
                    self.moved = true;
                }
            }
            Gesture::Drawing { points } => {
                points.push(p);
                self.moved = true;
            }
            Gesture::CropRubberBand { origin } => {
                let origin = *origin;
                self.moved = true;
                update_rubber_band_crop(session, origin, p);
            }
            Gesture::CropAdjust {
                handle,
                start,
                initial,
            } => {
                let handle = *handle;
                let dx = p.x - start.x;
                let dy = p.y - start.y;
                let initial = *initial;
                self.moved = true;
                let min = match self.pointer {
                    PointerKind::Mouse => MIN_RESIZE_MOUSE,
                    PointerKind::Touch => MIN_RESIZE_TOUCH,
                };
                if let Some(rect) = adjust_crop(session, initial, handle, dx, dy, min) {
                    session.crop = Some(rect);
                }
            }
            Gesture::ShapeRubberBand { current, .. } => {
                *current = p;
                self.moved = true;
            }
            Gesture::DragText { id, offset } => {
                let x = p.x - offset.x;
                let y = p.y - offset.y;
                let id = id.clone();
                if let Some(text) = session.texts.iter_mut().find(|t| t.id == id) {
                    text.x = x;
                    text.y = y;
                    self.moved = true;
                }
            }
            Gesture::DragShape { id, offset } => {
                let x = p.x - offset.x;
                let y = p.y - offset.y;
                let id = id.clone();
                if let Some(shape) = session.shapes.iter_mut().find(|s| s.id == id) {
                    shape.x = x;
                    shape.y = y;
                    self.moved = true;
                }
            }
        }
    }

    /// End the gesture, committing anything durable.
    pub fn pointer_up(&mut self, session: &mut EditorSession) {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        match gesture {
            Gesture::Idle | Gesture::Panning { .. } => {}
            Gesture::Drawing { points } => {
                // Single-click strokes are noise, not edits.
                if points.len() >= 2 {
                    let settings = session.draw_settings.clone();
                    let id = session.mint_id("path");
                    session.paths.push(DrawingPath {
                        id,
                        points,
                        color: match settings.kind {
                            BrushKind::Brush => settings.color,
                            BrushKind::Eraser => crate::Rgba::BLACK,
                        },
                        size: settings.size,
                        kind: settings.kind,
                    });
                    session.push_history();
                }
            }
            Gesture::CropRubberBand { .. } => {
                if self.moved && session.crop.is_some() {
                    session.push_history();
                }
            }
            Gesture::CropAdjust { .. } => {
                if self.moved {
                    session.push_history();
                }
            }
            Gesture::ShapeRubberBand { origin, current } => {
                let (x, y, w, h) = normalize_rect(
                    origin.x,
                    origin.y,
                    current.x - origin.x,
                    current.y - origin.y,
                );
                if w > MIN_SHAPE && h > MIN_SHAPE {
                    let settings = session.shape_settings.clone();
                    let id = session.mint_id("shape");
                    session.shapes.push(ShapeOverlay {
                        id,
                        kind: settings.kind,
                        x,
                        y,
                        width: w,
                        height: h,
                        fill: settings.fill,
                        fill_color: settings.fill_color,
                        stroke_color: settings.stroke_color,
                        stroke_width: settings.stroke_width,
                    });
                    session.push_history();
                }
            }
            Gesture::DragText { .. } | Gesture::DragShape { .. } => {
                if self.moved {
                    session.push_history();
                }
            }
        }
        self.moved = false;
    }

    /// Abandon the gesture without committing anything.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
        self.moved = false;
    }
}

/// Topmost text overlay under the point, measured with the session's
/// fonts.
fn hit_text(session: &EditorSession, p: Point) -> Option<&TextOverlay> {
    session
        .texts
        .iter()
        .rev()
        .find(|text| session.fonts.bounds(text).contains(p.x, p.y))
}

/// Fresh crop rubber band: aspect lock lets the longer drag axis drive,
/// and the rectangle only takes effect past the minimum size.
fn update_rubber_band_crop(session: &mut EditorSession, origin: Point, p: Point) {
    let mut width = p.x - origin.x;
    let mut height = p.y - origin.y;

    if let Some(ratio) = session.aspect.ratio() {
        if width.abs() > height.abs() {
            let sign = if height < 0.0 { -1.0 } else { 1.0 };
            height = sign * width.abs() / ratio;
        } else {
            let sign = if width < 0.0 { -1.0 } else { 1.0 };
            width = sign * height.abs() * ratio;
        }
    }

    let (x, y, w, h) = normalize_rect(origin.x, origin.y, width, height);
    let (image_w, image_h) = session.image_size();
    let clamped_x = x.max(0.0);
    let clamped_y = y.max(0.0);
    let clamped_w = w.min(image_w - clamped_x);
    let clamped_h = h.min(image_h - clamped_y);

    if clamped_w > MIN_RUBBER_BAND && clamped_h > MIN_RUBBER_BAND {
        session.crop = Some(CropRect::new(clamped_x, clamped_y, clamped_w, clamped_h));
    }
}

/// Resize or move the pending crop by a drag delta, preserving the
/// opposite anchor. Returns `None` when the result would fall below the
/// minimum size (the previous rect stays in place).
fn adjust_crop(
    session: &EditorSession,
    initial: CropRect,
    handle: CropHandle,
    dx: f32,
    dy: f32,
    min: f32,
) -> Option<CropRect> {
    let (image_w, image_h) = session.image_size();
    let mut rect = initial;

    match handle {
        CropHandle::Move => {
            // The upper bound can go negative for a stale rect wider than
            // the image; order max before min so it collapses to 0.
            rect.x = (initial.x + dx).max(0.0).min((image_w - rect.width).max(0.0));
            rect.y = (initial.y + dy).max(0.0).min((image_h - rect.height).max(0.0));
        }
        CropHandle::Nw => {
            rect.x = initial.x + dx;
            rect.y = initial.y + dy;
            rect.width = initial.width - dx;
            rect.height = initial.height - dy;
        }
        CropHandle::Ne => {
            rect.y = initial.y + dy;
            rect.width = initial.width + dx;
            rect.height = initial.height - dy;
        }
        CropHandle::Sw => {
            rect.x = initial.x + dx;
            rect.width = initial.width - dx;
            rect.height = initial.height + dy;
        }
        CropHandle::Se => {
            rect.width = initial.width + dx;
            rect.height = initial.height + dy;
        }
        CropHandle::N => {
            rect.y = initial.y + dy;
            rect.height = initial.height - dy;
        }
        CropHandle::S => {
            rect.height = initial.height + dy;
        }
        CropHandle::W => {
            rect.x = initial.x + dx;
            rect.width = initial.width - dx;
        }
        CropHandle::E => {
            rect.width = initial.width + dx;
        }
    }

    if handle != CropHandle::Move {
        if let Some(ratio) = session.aspect.ratio() {
            if handle.touches_horizontal_edge() {
                rect.height = rect.width / ratio;
            } else {
                rect.width = rect.height * ratio;
            }
        }
    }

    if rect.width < min || rect.height < min {
        return None;
    }

    rect.x = rect.x.max(0.0);
    rect.y = rect.y.max(0.0);
    rect.width = rect.width.min(image_w - rect.x);
    rect.height = rect.height.min(image_h - rect.y);
    Some(rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Bitmap;
    use crate::session::{EditorSession, Tool};

    fn session() -> EditorSession {
        EditorSession::new(Bitmap::blank(1000, 800))
    }

    // Display box that maps screen coordinates 1:1 onto image pixels.
    fn display() -> DisplayBox {
        DisplayBox::new(0.0, 0.0, 1000.0, 800.0)
    }

    fn press(i: &mut Interaction, s: &mut EditorSession, x: f32, y: f32) {
        i.pointer_down(s, Point::new(x, y), &display(), PointerKind::Mouse);
    }

    fn drag(i: &mut Interaction, s: &mut EditorSession, x: f32, y: f32) {
        i.pointer_move(s, Point::new(x, y), &display());
    }

    #[test]
    fn test_draw_gesture_commits_path() {
        let mut s = session();
        s.tool = Tool::Draw;
        let mut i = Interaction::new();

        press(&mut i, &mut s, 10.0, 10.0);
        drag(&mut i, &mut s, 20.0, 20.0);
        drag(&mut i, &mut s, 30.0, 25.0);
        i.pointer_up(&mut s);

        assert_eq!(s.paths.len(), 1);
        assert_eq!(s.paths[0].points.len(), 3);
        assert_eq!(s.paths[0].id, "path-1");
        assert!(s.history.can_undo());
    }

    #[test]
    fn test_single_click_draw_discarded() {
        let mut s = session();
        s.tool = Tool::Draw;
        let mut i = Interaction::new();

        press(&mut i, &mut s, 10.0, 10.0);
        i.pointer_up(&mut s);

        assert!(s.paths.is_empty());
        assert!(!s.history.can_undo());
    }

    #[test]
    fn test_eraser_path_uses_black() {
        let mut s = session();
        s.tool = Tool::Draw;
        s.draw_settings.kind = BrushKind::Eraser;
        let mut i = Interaction::new();

        press(&mut i, &mut s, 10.0, 10.0);
        drag(&mut i, &mut s, 50.0, 50.0);
        i.pointer_up(&mut s);

        assert_eq!(s.paths[0].kind, BrushKind::Eraser);
        assert_eq!(s.paths[0].color, crate::Rgba::BLACK);
    }

    #[test]
    fn test_live_path_needs_two_points() {
        let mut s = session();
        s.tool = Tool::Draw;
        let mut i = Interaction::new();

        press(&mut i, &mut s, 10.0, 10.0);
        assert!(i.live_path(&s).is_none());
        drag(&mut i, &mut s, 20.0, 20.0);
        assert_eq!(i.live_path(&s).unwrap().points.len(), 2);
    }

    #[test]
    fn test_crop_rubber_band_sets_rect() {
        let mut s = session();
        s.tool = Tool::Crop;
        let mut i = Interaction::new();

        press(&mut i, &mut s, 100.0, 100.0);
        drag(&mut i, &mut s, 300.0, 250.0);
        i.pointer_up(&mut s);

        let rect = s.crop.unwrap();
        assert_eq!((rect.x, rect.y), (100.0, 100.0));
        assert_eq!((rect.width, rect.height), (200.0, 150.0));
        assert!(s.history.can_undo());
    }

    #[test]
    fn test_crop_rubber_band_reverse_drag_normalizes() {
        let mut s = session();
        s.tool = Tool::Crop;
        let mut i = Interaction::new();

        press(&mut i, &mut s, 300.0, 250.0);
        drag(&mut i, &mut s, 100.0, 100.0);
        i.pointer_up(&mut s);

        let rect = s.crop.unwrap();
        assert_eq!((rect.x, rect.y), (100.0, 100.0));
        assert_eq!((rect.width, rect.height), (200.0, 150.0));
    }

    #[test]
    fn test_tiny_rubber_band_leaves_no_crop() {
        let mut s = session();
        s.tool = Tool::Crop;
        let mut i = Interaction::new();

        press(&mut i, &mut s, 100.0, 100.0);
        drag(&mut i, &mut s, 103.0, 103.0);
        i.pointer_up(&mut s);

        assert!(s.crop.is_none());
        assert!(!s.history.can_undo());
    }

    #[test]
    fn test_rubber_band_aspect_lock_wider_drag() {
        let mut s = session();
        s.tool = Tool::Crop;
        s.aspect = AspectRatio::Square;
        let mut i = Interaction::new();

        press(&mut i, &mut s, 100.0, 100.0);
        // Horizontal delta is longer, so it drives.
        drag(&mut i, &mut s, 300.0, 150.0);

        let rect = s.crop.unwrap();
        assert_eq!(rect.width, 200.0);
        assert_eq!(rect.height, 200.0);
    }

    #[test]
    fn test_crop_resize_se_handle() {
        let mut s = session();
        s.tool = Tool::Crop;
        s.crop = Some(CropRect::new(100.0, 100.0, 200.0, 200.0));
        let mut i = Interaction::new();

        // Press on the SE corner (300, 300), drag outward.
        press(&mut i, &mut s, 300.0, 300.0);
        drag(&mut i, &mut s, 350.0, 340.0);
        i.pointer_up(&mut s);

        let rect = s.crop.unwrap();
        assert_eq!((rect.x, rect.y), (100.0, 100.0));
        assert_eq!((rect.width, rect.height), (250.0, 240.0));
        assert!(s.history.can_undo());
    }

    #[test]
    fn test_crop_resize_nw_preserves_far_corner() {
        let mut s = session();
        s.tool = Tool::Crop;
        s.crop = Some(CropRect::new(100.0, 100.0, 200.0, 200.0));
        let mut i = Interaction::new();

        press(&mut i, &mut s, 100.0, 100.0);
        drag(&mut i, &mut s, 150.0, 130.0);
        i.pointer_up(&mut s);

        let rect = s.crop.unwrap();
        assert_eq!((rect.x, rect.y), (150.0, 130.0));
        // Far corner stays at (300, 300).
        assert_eq!(rect.x + rect.width, 300.0);
        assert_eq!(rect.y + rect.height, 300.0);
    }

    #[test]
    fn test_crop_resize_refuses_below_minimum() {
        let mut s = session();
        s.tool = Tool::Crop;
        s.crop = Some(CropRect::new(100.0, 100.0, 100.0, 100.0));
        let mut i = Interaction::new();

        // Drag the E edge far left, collapsing the rect.
        press(&mut i, &mut s, 200.0, 150.0);
        drag(&mut i, &mut s, 50.0, 150.0);

        // Rect unchanged: the update would violate the minimum.
        let rect = s.crop.unwrap();
        assert_eq!(rect.width, 100.0);
    }

    #[test]
    fn test_crop_move_clamps_to_image() {
        let mut s = session();
        s.tool = Tool::Crop;
        s.crop = Some(CropRect::new(100.0, 100.0, 200.0, 200.0));
        let mut i = Interaction::new();

        // Press inside, away from all handles.
        press(&mut i, &mut s, 200.0, 200.0);
        drag(&mut i, &mut s, 1500.0, 900.0);

        let rect = s.crop.unwrap();
        assert_eq!(rect.x, 800.0);
        assert_eq!(rect.y, 600.0);
        assert_eq!((rect.width, rect.height), (200.0, 200.0));
    }

    #[test]
    fn test_crop_move_with_stale_oversized_rect() {
        // A rect restored from history can be larger than the re-baked
        // bitmap. Moving it must collapse to the origin, not panic.
        let s = EditorSession::new(Bitmap::blank(200, 200));
        let stale = CropRect::new(100.0, 100.0, 400.0, 400.0);
        let rect = adjust_crop(&s, stale, CropHandle::Move, 50.0, -30.0, 20.0).unwrap();
        assert_eq!((rect.x, rect.y), (0.0, 0.0));
        assert!(rect.width <= 200.0);
        assert!(rect.height <= 200.0);
    }

    #[test]
    fn test_crop_aspect_lock_on_edge_resize() {
        let mut s = session();
        s.tool = Tool::Crop;
        s.aspect = AspectRatio::Square;
        s.crop = Some(CropRect::new(100.0, 100.0, 200.0, 200.0));
        let mut i = Interaction::new();

        press(&mut i, &mut s, 300.0, 200.0); // E handle
        drag(&mut i, &mut s, 400.0, 200.0);

        let rect = s.crop.unwrap();
        assert_eq!(rect.width, 300.0);
        assert_eq!(rect.height, 300.0);
    }

    #[test]
    fn test_shape_rubber_band_commits() {
        let mut s = session();
        s.tool = Tool::Shapes;
        let mut i = Interaction::new();

        press(&mut i, &mut s, 50.0, 50.0);
        drag(&mut i, &mut s, 150.0, 120.0);
        assert!(i.live_shape(&s).is_some());
        i.pointer_up(&mut s);

        assert_eq!(s.shapes.len(), 1);
        let shape = &s.shapes[0];
        assert_eq!((shape.x, shape.y), (50.0, 50.0));
        assert_eq!((shape.width, shape.height), (100.0, 70.0));
        assert_eq!(shape.id, "shape-1");
        assert!(s.history.can_undo());
    }

    #[test]
    fn test_shape_negative_drag_normalizes() {
        let mut s = session();
        s.tool = Tool::Shapes;
        let mut i = Interaction::new();

        press(&mut i, &mut s, 100.0, 100.0);
        drag(&mut i, &mut s, 50.0, 100.1);
        drag(&mut i, &mut s, 50.0, 160.0);
        i.pointer_up(&mut s);

        let shape = &s.shapes[0];
        assert_eq!((shape.x, shape.y), (50.0, 100.0));
        assert_eq!((shape.width, shape.height), (50.0, 60.0));
    }

    #[test]
    fn test_tiny_shape_discarded() {
        let mut s = session();
        s.tool = Tool::Shapes;
        let mut i = Interaction::new();

        press(&mut i, &mut s, 100.0, 100.0);
        drag(&mut i, &mut s, 104.0, 104.0);
        i.pointer_up(&mut s);

        assert!(s.shapes.is_empty());
        assert!(!s.history.can_undo());
    }

    #[test]
    fn test_text_tool_creates_on_empty_press() {
        let mut s = session();
        s.tool = Tool::Text;
        let mut i = Interaction::new();

        press(&mut i, &mut s, 400.0, 300.0);
        i.pointer_up(&mut s);

        assert_eq!(s.texts.len(), 1);
        assert_eq!((s.texts[0].x, s.texts[0].y), (400.0, 300.0));
        assert_eq!(s.selected_text.as_deref(), Some("text-1"));
        assert!(s.history.can_undo());
    }

    #[test]
    fn test_press_on_text_selects_and_drags_it() {
        let mut s = session();
        s.tool = Tool::Text;
        let mut i = Interaction::new();
        press(&mut i, &mut s, 100.0, 100.0);
        i.pointer_up(&mut s);

        s.tool = Tool::Select;
        press(&mut i, &mut s, 120.0, 110.0);
        assert_eq!(s.selected_text.as_deref(), Some("text-1"));
        assert!(s.selected_shape.is_none());
        drag(&mut i, &mut s, 160.0, 150.0);
        i.pointer_up(&mut s);

        assert_eq!((s.texts[0].x, s.texts[0].y), (140.0, 140.0));
    }

    #[test]
    fn test_select_drag_moves_shape_and_pushes_once() {
        let mut s = session();
        s.tool = Tool::Shapes;
        let mut i = Interaction::new();
        press(&mut i, &mut s, 50.0, 50.0);
        drag(&mut i, &mut s, 150.0, 150.0);
        i.pointer_up(&mut s);
        assert_eq!(s.history.len(), 2);

        s.tool = Tool::Select;
        press(&mut i, &mut s, 100.0, 100.0);
        drag(&mut i, &mut s, 140.0, 130.0);
        drag(&mut i, &mut s, 180.0, 160.0);
        i.pointer_up(&mut s);

        let shape = &s.shapes[0];
        assert_eq!((shape.x, shape.y), (130.0, 110.0));
        assert_eq!(s.selected_shape.as_deref(), Some("shape-1"));
        // One entry for the whole drag.
        assert_eq!(s.history.len(), 3);
    }

    #[test]
    fn test_select_click_without_motion_pushes_nothing() {
        let mut s = session();
        s.tool = Tool::Shapes;
        let mut i = Interaction::new();
        press(&mut i, &mut s, 50.0, 50.0);
        drag(&mut i, &mut s, 150.0, 150.0);
        i.pointer_up(&mut s);
        let depth = s.history.len();

        s.tool = Tool::Select;
        press(&mut i, &mut s, 100.0, 100.0);
        i.pointer_up(&mut s);
        assert_eq!(s.history.len(), depth);
    }

    #[test]
    fn test_select_pan_on_empty_never_pushes_history() {
        let mut s = session();
        s.tool = Tool::Select;
        let mut i = Interaction::new();

        press(&mut i, &mut s, 500.0, 400.0);
        drag(&mut i, &mut s, 520.0, 390.0);
        i.pointer_up(&mut s);

        assert_eq!((s.view.pan_x, s.view.pan_y), (20.0, -10.0));
        assert!(!s.history.can_undo());
    }

    #[test]
    fn test_empty_press_deselects() {
        let mut s = session();
        s.tool = Tool::Shapes;
        let mut i = Interaction::new();
        press(&mut i, &mut s, 50.0, 50.0);
        drag(&mut i, &mut s, 150.0, 150.0);
        i.pointer_up(&mut s);
        s.selected_shape = Some("shape-1".to_string());

        s.tool = Tool::Select;
        press(&mut i, &mut s, 700.0, 700.0);
        i.pointer_up(&mut s);
        assert!(s.selected_shape.is_none());
    }

    #[test]
    fn test_cancel_discards_gesture() {
        let mut s = session();
        s.tool = Tool::Draw;
        let mut i = Interaction::new();

        press(&mut i, &mut s, 10.0, 10.0);
        drag(&mut i, &mut s, 100.0, 100.0);
        i.cancel();
        i.pointer_up(&mut s);

        assert!(s.paths.is_empty());
        assert!(i.is_idle());
    }

    #[test]
    fn test_hit_crop_handle_corners_and_edges() {
        let rect = CropRect::new(100.0, 100.0, 200.0, 200.0);
        assert_eq!(hit_crop_handle(&rect, Point::new(105.0, 95.0)), Some(CropHandle::Nw));
        assert_eq!(hit_crop_handle(&rect, Point::new(300.0, 300.0)), Some(CropHandle::Se));
        assert_eq!(hit_crop_handle(&rect, Point::new(200.0, 100.0)), Some(CropHandle::N));
        assert_eq!(hit_crop_handle(&rect, Point::new(300.0, 200.0)), Some(CropHandle::E));
        assert_eq!(hit_crop_handle(&rect, Point::new(200.0, 200.0)), Some(CropHandle::Move));
        assert_eq!(hit_crop_handle(&rect, Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_aspect_ratio_values() {
        assert_eq!(AspectRatio::Free.ratio(), None);
        assert_eq!(AspectRatio::Square.ratio(), Some(1.0));
        assert_eq!(AspectRatio::Wide16x9.ratio(), Some(16.0 / 9.0));
        let json = serde_json::to_string(&AspectRatio::Wide16x9).unwrap();
        assert_eq!(json, "\"16:9\"");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
