//! Editing session: single owner of one image's state.
//!
//! Every mutation funnels through [`EditorSession::apply`] with a
//! [`Command`], or through the pointer state machine in `interaction`.
//! Discrete commands (rotate, crop apply, remove text) push exactly one
//! history entry; continuous ones (sliders, zoom, settings edits) push
//! none, so undo always lands on a gesture boundary.
//!
//! Loading a new image is a hard reset of everything except registered
//! fonts.

use serde::{Deserialize, Serialize};

use crate::compositor::{render, RenderError, Scene, SelectionBox};
use crate::decode::{decode_image, Bitmap, DecodeError};
use crate::export::{export_image, ExportError, ExportSettings};
use crate::history::{History, Snapshot};
use crate::interaction::AspectRatio;
use crate::overlay::{
    DrawingPath, DrawingSettings, ShapeOverlay, ShapeSettings, TextAlign, TextOverlay, TextSettings,
};
use crate::presets::find_preset;
use crate::text::FontStore;
use crate::viewport::{DisplayBox, ViewState};
use crate::{Adjustments, CropRect, Point, Rgba, Slider, Transform};

/// Placeholder content for text created with an empty settings field.
const EMPTY_TEXT_PLACEHOLDER: &str = "Double click to edit";

/// The active editing tool. Panel-only tools (adjustments, filters,
/// export) select a side panel and leave the canvas pointer inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Select,
    Crop,
    Adjustments,
    Filters,
    Draw,
    Text,
    Shapes,
    Export,
}

/// Panel edits to an existing text overlay (everything but position,
/// which only drag changes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEdit {
    pub text: String,
    pub font_size: f32,
    pub font_family: String,
    pub color: Rgba,
    pub bold: bool,
    pub italic: bool,
    pub align: TextAlign,
}

/// The single mutation vocabulary for everything that is not a pointer
/// gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetTool(Tool),
    /// Continuous slider update; never pushes history.
    SetAdjustment(Slider, f32),
    /// Replace the whole adjustment record with a preset's.
    ApplyPreset(String),
    Rotate(f32),
    FlipX,
    FlipY,
    SetAspect(AspectRatio),
    /// Re-bake the bitmap to the pending crop rect.
    ApplyCrop,
    /// Drop the pending crop rect without touching history.
    CancelCrop,
    ClearDrawings,
    AddTextAtCenter,
    UpdateText { id: String, edit: TextEdit },
    RemoveText(String),
    RemoveShape(String),
    /// Delete the selected text, or failing that the selected shape.
    RemoveSelected,
    SelectText(Option<String>),
    SelectShape(Option<String>),
    SetDrawingSettings(DrawingSettings),
    SetTextSettings(TextSettings),
    SetShapeSettings(ShapeSettings),
    SetExportSettings(ExportSettings),
    ZoomIn,
    ZoomOut,
    ResetView,
    /// Continuous view pan by screen-space deltas; never pushes history.
    Pan { dx: f32, dy: f32 },
    Undo,
    Redo,
}

/// Map a keydown to a command. `modifier` is ctrl or meta; `typing`
/// means focus is in a text input, which suppresses every shortcut.
pub fn shortcut(key: &str, modifier: bool, shift: bool, typing: bool) -> Option<Command> {
    if typing {
        return None;
    }
    let key = key.to_ascii_lowercase();
    if modifier && key == "z" {
        return Some(if shift { Command::Redo } else { Command::Undo });
    }
    if modifier {
        return None;
    }
    match key.as_str() {
        "v" => Some(Command::SetTool(Tool::Select)),
        "c" => Some(Command::SetTool(Tool::Crop)),
        "a" => Some(Command::SetTool(Tool::Adjustments)),
        "f" => Some(Command::SetTool(Tool::Filters)),
        "d" => Some(Command::SetTool(Tool::Draw)),
        "t" => Some(Command::SetTool(Tool::Text)),
        "s" => Some(Command::SetTool(Tool::Shapes)),
        "e" => Some(Command::SetTool(Tool::Export)),
        "+" | "=" => Some(Command::ZoomIn),
        "-" => Some(Command::ZoomOut),
        "0" => Some(Command::ResetView),
        "delete" | "backspace" => Some(Command::RemoveSelected),
        _ => None,
    }
}

/// All state for one loaded image.
#[derive(Debug, Clone)]
pub struct EditorSession {
    pub base: Bitmap,
    pub adjustments: Adjustments,
    /// Id of the preset the current adjustments came from, if any.
    /// Cleared by any manual slider change.
    pub active_preset: Option<String>,
    pub transform: Transform,
    pub crop: Option<CropRect>,
    pub aspect: AspectRatio,
    pub paths: Vec<DrawingPath>,
    pub texts: Vec<TextOverlay>,
    pub shapes: Vec<ShapeOverlay>,
    pub selected_text: Option<String>,
    pub selected_shape: Option<String>,
    pub tool: Tool,
    pub view: ViewState,
    pub draw_settings: DrawingSettings,
    pub text_settings: TextSettings,
    pub shape_settings: ShapeSettings,
    pub export_settings: ExportSettings,
    pub history: History,
    pub fonts: FontStore,
    next_id: u64,
    exporting: bool,
}

impl EditorSession {
    /// Start a fresh session around a decoded image.
    pub fn new(base: Bitmap) -> Self {
        Self {
            base,
            adjustments: Adjustments::default(),
            active_preset: None,
            transform: Transform::default(),
            crop: None,
            aspect: AspectRatio::Free,
            paths: Vec::new(),
            texts: Vec::new(),
            shapes: Vec::new(),
            selected_text: None,
            selected_shape: None,
            tool: Tool::Select,
            view: ViewState::default(),
            draw_settings: DrawingSettings::default(),
            text_settings: TextSettings::default(),
            shape_settings: ShapeSettings::default(),
            export_settings: ExportSettings::default(),
            history: History::new(Snapshot::default()),
            fonts: FontStore::new(),
            next_id: 0,
            exporting: false,
        }
    }

    /// Decode new image bytes and hard-reset the session around them.
    /// Registered fonts survive; nothing else does. On decode failure
    /// the existing session is left untouched.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        let bitmap = decode_image(bytes)?;
        let fonts = std::mem::take(&mut self.fonts);
        *self = EditorSession::new(bitmap);
        self.fonts = fonts;
        Ok(())
    }

    /// Image dimensions as floats, for gesture math.
    pub fn image_size(&self) -> (f32, f32) {
        (self.base.width as f32, self.base.height as f32)
    }

    /// Map a screen point into image coordinates through the measured
    /// display box.
    pub fn to_image(&self, screen: Point, display: &DisplayBox) -> Point {
        let (w, h) = self.image_size();
        display.to_image(screen, w, h)
    }

    /// Mint a session-unique overlay id, e.g. `path-7`.
    pub fn mint_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    /// Capture the current undoable state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            adjustments: self.adjustments,
            transform: self.transform,
            paths: self.paths.clone(),
            texts: self.texts.clone(),
            shapes: self.shapes.clone(),
            crop: self.crop,
        }
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        self.adjustments = snapshot.adjustments;
        self.transform = snapshot.transform;
        self.paths = snapshot.paths.clone();
        self.texts = snapshot.texts.clone();
        self.shapes = snapshot.shapes.clone();
        // A crop applied after the snapshot re-baked the bitmap, so a
        // restored rect can exceed the current image. Clamp it back in.
        let (w, h) = self.image_size();
        self.crop = snapshot.crop.map(|c| c.clamp_to(w, h));
        // Restored objects may no longer include the selection.
        if let Some(id) = &self.selected_text {
            if !self.texts.iter().any(|t| &t.id == id) {
                self.selected_text = None;
            }
        }
        if let Some(id) = &self.selected_shape {
            if !self.shapes.iter().any(|s| &s.id == id) {
                self.selected_shape = None;
            }
        }
    }

    /// Record the current state as one history entry.
    pub fn push_history(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    /// Step back one history entry. Returns false at the bottom.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(&snapshot);
        true
    }

    /// Step forward one history entry. Returns false at the top.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(&snapshot);
        true
    }

    /// Create a text overlay at an image point from the current text
    /// settings. Returns the new id. Caller handles selection/history.
    pub fn add_text_at(&mut self, p: Point) -> String {
        let id = self.mint_id("text");
        let settings = &self.text_settings;
        let text = if settings.text.is_empty() {
            EMPTY_TEXT_PLACEHOLDER.to_string()
        } else {
            settings.text.clone()
        };
        self.texts.push(TextOverlay {
            id: id.clone(),
            text,
            x: p.x,
            y: p.y,
            font_size: settings.font_size,
            font_family: settings.font_family.clone(),
            color: settings.color,
            bold: settings.bold,
            italic: settings.italic,
            align: settings.align,
        });
        id
    }

    /// Bounding box of the selected overlay, for the chrome pass.
    /// Text is measured through the session's fonts.
    pub fn selection_box(&self) -> Option<SelectionBox> {
        if let Some(id) = &self.selected_text {
            let text = self.texts.iter().find(|t| &t.id == id)?;
            let b = self.fonts.bounds(text);
            return Some(SelectionBox {
                x: b.x,
                y: b.y,
                width: b.width,
                height: b.height,
            });
        }
        let id = self.selected_shape.as_ref()?;
        let shape = self.shapes.iter().find(|s| &s.id == id)?;
        Some(SelectionBox {
            x: shape.x,
            y: shape.y,
            width: shape.width,
            height: shape.height,
        })
    }

    /// The scene a compositor pass reads.
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            base: &self.base,
            adjustments: &self.adjustments,
            transform: self.transform,
            paths: &self.paths,
            shapes: &self.shapes,
            texts: &self.texts,
            fonts: &self.fonts,
        }
    }

    /// Flatten the session for display (scale 1).
    pub fn render_display(&self) -> Result<Bitmap, RenderError> {
        render(&self.scene(), 1.0)
    }

    /// Render and encode with the current export settings. The in-flight
    /// flag rejects re-entry and is always cleared on the way out.
    pub fn export(&mut self) -> Result<Vec<u8>, ExportError> {
        if self.exporting {
            return Err(ExportError::InFlight);
        }
        self.exporting = true;
        let result = export_image(&self.scene(), &self.export_settings);
        self.exporting = false;
        result
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    /// Apply one command.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::SetTool(tool) => {
                self.tool = tool;
            }
            Command::SetAdjustment(slider, value) => {
                self.adjustments.set(slider, value);
                self.active_preset = None;
            }
            Command::ApplyPreset(id) => {
                if let Some(preset) = find_preset(&id) {
                    self.adjustments = preset.adjustments;
                    self.active_preset = Some(id);
                    self.push_history();
                }
            }
            Command::Rotate(degrees) => {
                self.transform.rotate(degrees);
                self.push_history();
            }
            Command::FlipX => {
                self.transform.flip_x = !self.transform.flip_x;
                self.push_history();
            }
            Command::FlipY => {
                self.transform.flip_y = !self.transform.flip_y;
                self.push_history();
            }
            Command::SetAspect(aspect) => {
                self.aspect = aspect;
            }
            Command::ApplyCrop => {
                let Some(rect) = self.crop else { return };
                let Some(cropped) = self.base.crop(&rect) else {
                    return;
                };
                self.base = cropped;
                self.crop = None;
                self.tool = Tool::Select;
                self.push_history();
            }
            Command::CancelCrop => {
                self.crop = None;
            }
            Command::ClearDrawings => {
                if !self.paths.is_empty() {
                    self.paths.clear();
                    self.push_history();
                }
            }
            Command::AddTextAtCenter => {
                let (w, h) = self.image_size();
                let id = self.add_text_at(Point::new(w / 2.0, h / 2.0));
                self.selected_text = Some(id);
                self.push_history();
            }
            Command::UpdateText { id, edit } => {
                if let Some(text) = self.texts.iter_mut().find(|t| t.id == id) {
                    text.text = edit.text;
                    text.font_size = edit.font_size;
                    text.font_family = edit.font_family;
                    text.color = edit.color;
                    text.bold = edit.bold;
                    text.italic = edit.italic;
                    text.align = edit.align;
                    self.push_history();
                }
            }
            Command::RemoveText(id) => {
                let before = self.texts.len();
                self.texts.retain(|t| t.id != id);
                if self.texts.len() != before {
                    if self.selected_text.as_deref() == Some(id.as_str()) {
                        self.selected_text = None;
                    }
                    self.push_history();
                }
            }
            Command::RemoveShape(id) => {
                let before = self.shapes.len();
                self.shapes.retain(|s| s.id != id);
                if self.shapes.len() != before {
                    if self.selected_shape.as_deref() == Some(id.as_str()) {
                        self.selected_shape = None;
                    }
                    self.push_history();
                }
            }
            Command::RemoveSelected => {
                if let Some(id) = self.selected_text.clone() {
                    self.apply(Command::RemoveText(id));
                } else if let Some(id) = self.selected_shape.clone() {
                    self.apply(Command::RemoveShape(id));
                }
            }
            Command::SelectText(id) => {
                self.selected_text = id;
                if self.selected_text.is_some() {
                    self.selected_shape = None;
                }
            }
            Command::SelectShape(id) => {
                self.selected_shape = id;
                if self.selected_shape.is_some() {
                    self.selected_text = None;
                }
            }
            Command::SetDrawingSettings(settings) => {
                self.draw_settings = settings;
            }
            Command::SetTextSettings(settings) => {
                self.text_settings = settings;
            }
            Command::SetShapeSettings(settings) => {
                self.shape_settings = settings;
            }
            Command::SetExportSettings(settings) => {
                self.export_settings = settings;
            }
            Command::ZoomIn => self.view.zoom_in(),
            Command::ZoomOut => self.view.zoom_out(),
            Command::ResetView => self.view.reset(),
            Command::Pan { dx, dy } => self.view.pan_by(dx, dy),
            Command::Undo => {
                self.undo();
            }
            Command::Redo => {
                self.redo();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::BrushKind;

    fn session() -> EditorSession {
        EditorSession::new(Bitmap::blank(500, 400))
    }

    #[test]
    fn test_slider_updates_without_history() {
        let mut s = session();
        s.apply(Command::SetAdjustment(Slider::Brightness, 40.0));
        assert_eq!(s.adjustments.brightness, 40.0);
        assert!(!s.history.can_undo());
    }

    #[test]
    fn test_slider_clears_active_preset() {
        let mut s = session();
        s.apply(Command::ApplyPreset("vivid".to_string()));
        assert_eq!(s.active_preset.as_deref(), Some("vivid"));
        s.apply(Command::SetAdjustment(Slider::Contrast, 1.0));
        assert!(s.active_preset.is_none());
    }

    #[test]
    fn test_preset_replaces_whole_record() {
        let mut s = session();
        s.apply(Command::SetAdjustment(Slider::Brightness, 80.0));
        s.apply(Command::ApplyPreset("mono".to_string()));
        assert_eq!(s.adjustments.grayscale, 100.0);
        assert_eq!(s.adjustments.contrast, 10.0);
        // Manual brightness did not survive the replacement.
        assert_eq!(s.adjustments.brightness, 0.0);
        assert!(s.history.can_undo());
    }

    #[test]
    fn test_unknown_preset_is_noop() {
        let mut s = session();
        s.apply(Command::ApplyPreset("nope".to_string()));
        assert!(s.adjustments.is_default());
        assert!(!s.history.can_undo());
    }

    #[test]
    fn test_rotate_flip_push_history() {
        let mut s = session();
        s.apply(Command::Rotate(90.0));
        s.apply(Command::Rotate(90.0));
        s.apply(Command::FlipX);
        assert_eq!(s.transform.rotation, 180.0);
        assert!(s.transform.flip_x);
        assert_eq!(s.history.len(), 4);

        s.apply(Command::Undo);
        assert!(!s.transform.flip_x);
        s.apply(Command::Undo);
        assert_eq!(s.transform.rotation, 90.0);
        s.apply(Command::Redo);
        assert_eq!(s.transform.rotation, 180.0);
    }

    #[test]
    fn test_apply_crop_rebakes_bitmap() {
        let mut s = session();
        s.tool = Tool::Crop;
        s.crop = Some(CropRect::new(100.0, 50.0, 200.0, 100.0));
        s.apply(Command::ApplyCrop);

        assert_eq!((s.base.width, s.base.height), (200, 100));
        assert!(s.crop.is_none());
        assert_eq!(s.tool, Tool::Select);
        assert!(s.history.can_undo());
    }

    #[test]
    fn test_apply_crop_without_rect_is_noop() {
        let mut s = session();
        s.apply(Command::ApplyCrop);
        assert_eq!(s.base.width, 500);
        assert!(!s.history.can_undo());
    }

    #[test]
    fn test_cancel_crop_clears_without_history() {
        let mut s = session();
        s.crop = Some(CropRect::new(0.0, 0.0, 100.0, 100.0));
        s.apply(Command::CancelCrop);
        assert!(s.crop.is_none());
        assert!(!s.history.can_undo());
    }

    #[test]
    fn test_undo_after_crop_restores_rect_not_pixels() {
        let mut s = session();
        s.crop = Some(CropRect::new(0.0, 0.0, 100.0, 100.0));
        s.push_history();
        s.apply(Command::ApplyCrop);
        s.apply(Command::Undo);
        // The crop rect comes back; the discarded pixels do not.
        assert!(s.crop.is_some());
        assert_eq!((s.base.width, s.base.height), (100, 100));
    }

    #[test]
    fn test_undo_clamps_stale_crop_to_rebaked_image() {
        let mut s = session();
        s.crop = Some(CropRect::new(50.0, 50.0, 400.0, 300.0));
        s.push_history();
        s.crop = Some(CropRect::new(0.0, 0.0, 100.0, 100.0));
        s.apply(Command::ApplyCrop);
        s.apply(Command::Undo);
        // The restored rect cannot outgrow the 100x100 re-baked bitmap.
        let rect = s.crop.unwrap();
        assert!(rect.x + rect.width <= 100.0);
        assert!(rect.y + rect.height <= 100.0);
        assert!(rect.width > 0.0 && rect.height > 0.0);
    }

    #[test]
    fn test_clear_drawings() {
        let mut s = session();
        s.paths.push(DrawingPath {
            id: "path-1".to_string(),
            points: vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)],
            color: Rgba::WHITE,
            size: 3.0,
            kind: BrushKind::Brush,
        });
        s.push_history();
        s.apply(Command::ClearDrawings);
        assert!(s.paths.is_empty());

        s.apply(Command::Undo);
        assert_eq!(s.paths.len(), 1);
    }

    #[test]
    fn test_clear_drawings_when_empty_is_noop() {
        let mut s = session();
        s.apply(Command::ClearDrawings);
        assert!(!s.history.can_undo());
    }

    #[test]
    fn test_add_text_at_center() {
        let mut s = session();
        s.apply(Command::AddTextAtCenter);
        assert_eq!(s.texts.len(), 1);
        assert_eq!((s.texts[0].x, s.texts[0].y), (250.0, 200.0));
        assert_eq!(s.selected_text.as_deref(), Some("text-1"));
        assert!(s.history.can_undo());
    }

    #[test]
    fn test_update_text_edits_fields() {
        let mut s = session();
        s.apply(Command::AddTextAtCenter);
        s.apply(Command::UpdateText {
            id: "text-1".to_string(),
            edit: TextEdit {
                text: "Hello".to_string(),
                font_size: 48.0,
                font_family: "Georgia".to_string(),
                color: Rgba::BLACK,
                bold: true,
                italic: false,
                align: TextAlign::Center,
            },
        });
        let text = &s.texts[0];
        assert_eq!(text.text, "Hello");
        assert_eq!(text.font_size, 48.0);
        assert!(text.bold);
        assert_eq!(text.align, TextAlign::Center);
        // Position untouched by panel edits.
        assert_eq!(text.x, 250.0);
    }

    #[test]
    fn test_remove_selected_prefers_text() {
        let mut s = session();
        s.apply(Command::AddTextAtCenter);
        s.shapes.push(ShapeOverlay {
            id: "shape-9".to_string(),
            kind: crate::overlay::ShapeKind::Rectangle,
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            fill: false,
            fill_color: Rgba::WHITE,
            stroke_color: Rgba::WHITE,
            stroke_width: 1.0,
        });
        s.selected_shape = Some("shape-9".to_string());
        s.selected_text = Some("text-1".to_string());

        s.apply(Command::RemoveSelected);
        assert!(s.texts.is_empty());
        assert_eq!(s.shapes.len(), 1);
        assert!(s.selected_text.is_none());
    }

    #[test]
    fn test_selection_is_exclusive() {
        let mut s = session();
        s.apply(Command::SelectText(Some("text-1".to_string())));
        s.apply(Command::SelectShape(Some("shape-1".to_string())));
        assert!(s.selected_text.is_none());
        assert_eq!(s.selected_shape.as_deref(), Some("shape-1"));
    }

    #[test]
    fn test_undo_drops_dangling_selection() {
        let mut s = session();
        s.apply(Command::AddTextAtCenter);
        assert!(s.selected_text.is_some());
        s.apply(Command::Undo);
        assert!(s.texts.is_empty());
        assert!(s.selected_text.is_none());
    }

    #[test]
    fn test_mint_id_is_monotonic_across_kinds() {
        let mut s = session();
        assert_eq!(s.mint_id("path"), "path-1");
        assert_eq!(s.mint_id("shape"), "shape-2");
        assert_eq!(s.mint_id("text"), "text-3");
    }

    #[test]
    fn test_load_image_resets_but_keeps_fonts() {
        let mut s = session();
        s.apply(Command::Rotate(90.0));
        s.apply(Command::AddTextAtCenter);

        let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([1, 2, 3, 255]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        s.load_image(&bytes).unwrap();

        assert_eq!((s.base.width, s.base.height), (4, 3));
        assert!(s.texts.is_empty());
        assert!(s.transform.is_identity());
        assert!(!s.history.can_undo());
    }

    #[test]
    fn test_load_image_failure_leaves_state() {
        let mut s = session();
        s.apply(Command::Rotate(90.0));
        assert!(s.load_image(&[1, 2, 3]).is_err());
        assert_eq!(s.transform.rotation, 90.0);
        assert_eq!(s.base.width, 500);
    }

    #[test]
    fn test_export_produces_png_and_clears_flag() {
        let mut s = EditorSession::new(Bitmap::blank(8, 8));
        let bytes = s.export().unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n']);
        assert!(!s.is_exporting());
    }

    #[test]
    fn test_zoom_commands() {
        let mut s = session();
        s.apply(Command::ZoomIn);
        assert!((s.view.zoom - 1.25).abs() < 1e-6);
        s.apply(Command::ResetView);
        assert_eq!(s.view.zoom, 1.0);
    }

    #[test]
    fn test_shortcut_mapping() {
        assert_eq!(
            shortcut("v", false, false, false),
            Some(Command::SetTool(Tool::Select))
        );
        assert_eq!(
            shortcut("C", false, false, false),
            Some(Command::SetTool(Tool::Crop))
        );
        assert_eq!(shortcut("z", true, false, false), Some(Command::Undo));
        assert_eq!(shortcut("z", true, true, false), Some(Command::Redo));
        assert_eq!(shortcut("=", false, false, false), Some(Command::ZoomIn));
        assert_eq!(shortcut("0", false, false, false), Some(Command::ResetView));
        assert_eq!(
            shortcut("Delete", false, false, false),
            Some(Command::RemoveSelected)
        );
        assert_eq!(shortcut("q", false, false, false), None);
    }

    #[test]
    fn test_shortcut_suppressed_while_typing() {
        assert_eq!(shortcut("v", false, false, true), None);
        assert_eq!(shortcut("z", true, false, true), None);
    }
}
