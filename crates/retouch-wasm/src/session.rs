//! Editor session WASM bindings.
//!
//! One [`JsEditorSession`] wraps a core `EditorSession` plus its pointer
//! interaction tracker, and is the only stateful object the host keeps.
//! The host forwards pointer and keyboard events in, pulls rendered
//! frames out, and exchanges structured state (adjustments, overlays,
//! settings) as plain JS objects through `serde-wasm-bindgen`.
//!
//! Coordinates for pointer events are raw screen positions; each event
//! also carries the measured bounding box of the on-screen image so the
//! core can map into image space.

use retouch_core::compositor::{render_overlay, OverlayScene};
use retouch_core::session::shortcut;
use retouch_core::{
    presets, Command, EditorSession, Interaction, Point, PointerKind, Slider, TextEdit, Tool,
};
use retouch_core::viewport::DisplayBox;
use wasm_bindgen::prelude::*;

use crate::types::{JsExportedFile, JsFrame};

/// The editing session wrapper for JavaScript.
#[wasm_bindgen]
pub struct JsEditorSession {
    session: EditorSession,
    interaction: Interaction,
}

#[wasm_bindgen]
impl JsEditorSession {
    /// Decode image bytes and open a session around them.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The image file bytes (PNG, JPEG, or WebP) as a `Uint8Array`
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a decodable image.
    #[wasm_bindgen(constructor)]
    pub fn new(bytes: &[u8]) -> Result<JsEditorSession, JsValue> {
        let bitmap =
            retouch_core::decode_image(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            session: EditorSession::new(bitmap),
            interaction: Interaction::new(),
        })
    }

    /// Replace the loaded image, hard-resetting all edits. Registered
    /// fonts survive. On decode failure the current session is untouched.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.session
            .load_image(bytes)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.interaction.cancel();
        Ok(())
    }

    /// Image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.session.base.width
    }

    /// Image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.session.base.height
    }

    // ----- Rendering -----

    /// Flatten the session into an RGBA frame for the main canvas.
    pub fn render(&self) -> Result<JsFrame, JsValue> {
        let bitmap = self
            .session
            .render_display()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(JsFrame::from_bitmap(bitmap))
    }

    /// Render the transparent chrome layer at image size: the in-flight
    /// stroke or rubber-band shape, the crop mask with grid and handles,
    /// and the dashed outline around the selected overlay.
    pub fn render_overlay(&self) -> Result<JsFrame, JsValue> {
        let live_path = self.interaction.live_path(&self.session);
        let live_shape = self.interaction.live_shape(&self.session);
        let scene = OverlayScene {
            width: self.session.base.width,
            height: self.session.base.height,
            live_path: live_path.as_ref(),
            live_shape: live_shape.as_ref(),
            // Crop chrome only shows while the crop tool is active.
            crop: (self.session.tool == Tool::Crop)
                .then_some(self.session.crop)
                .flatten(),
            selection: self.session.selection_box(),
        };
        let bitmap = render_overlay(&scene).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(JsFrame::from_bitmap(bitmap))
    }

    /// The CSS `filter` string equivalent to the current adjustments,
    /// for DOM-side live preview.
    pub fn css_filter(&self) -> String {
        retouch_core::css_filter_string(&self.session.adjustments)
    }

    // ----- Pointer events -----

    /// Begin a pointer gesture. `pointer` is `"mouse"` or `"touch"`.
    pub fn pointer_down(
        &mut self,
        x: f32,
        y: f32,
        box_left: f32,
        box_top: f32,
        box_width: f32,
        box_height: f32,
        pointer: &str,
    ) {
        let kind = match pointer {
            "touch" => PointerKind::Touch,
            _ => PointerKind::Mouse,
        };
        let display = DisplayBox::new(box_left, box_top, box_width, box_height);
        self.interaction
            .pointer_down(&mut self.session, Point::new(x, y), &display, kind);
    }

    /// Feed pointer motion into the active gesture.
    pub fn pointer_move(
        &mut self,
        x: f32,
        y: f32,
        box_left: f32,
        box_top: f32,
        box_width: f32,
        box_height: f32,
    ) {
        let display = DisplayBox::new(box_left, box_top, box_width, box_height);
        self.interaction
            .pointer_move(&mut self.session, Point::new(x, y), &display);
    }

    /// End the active gesture, committing anything durable.
    pub fn pointer_up(&mut self) {
        self.interaction.pointer_up(&mut self.session);
    }

    /// Abandon the active gesture without committing.
    pub fn pointer_cancel(&mut self) {
        self.interaction.cancel();
    }

    // ----- Keyboard -----

    /// Handle a keydown. Returns true when the key mapped to a command
    /// (so the host calls `preventDefault`).
    pub fn handle_key(&mut self, key: &str, modifier: bool, shift: bool, typing: bool) -> bool {
        match shortcut(key, modifier, shift, typing) {
            Some(command) => {
                self.session.apply(command);
                true
            }
            None => false,
        }
    }

    // ----- Tools -----

    /// Set the active tool, e.g. `"crop"`. Unknown names are rejected.
    pub fn set_tool(&mut self, tool: &str) -> Result<(), JsValue> {
        let tool = serde_wasm_bindgen::from_value(JsValue::from_str(tool))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.interaction.cancel();
        self.session.apply(Command::SetTool(tool));
        Ok(())
    }

    /// The active tool name
    #[wasm_bindgen(getter)]
    pub fn tool(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.tool)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    // ----- Adjustments and filters -----

    /// Set one adjustment slider, e.g. `set_adjustment("brightness", 40)`.
    /// Values are clamped to the slider's range; any manual change clears
    /// the active preset marker.
    pub fn set_adjustment(&mut self, slider: &str, value: f32) -> Result<(), JsValue> {
        let slider: Slider = serde_wasm_bindgen::from_value(JsValue::from_str(slider))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.session.apply(Command::SetAdjustment(slider, value));
        Ok(())
    }

    /// The full adjustments record as a plain object
    pub fn adjustments(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.adjustments)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Reset every slider to its default.
    pub fn reset_adjustments(&mut self) {
        for slider in Slider::ALL {
            self.session.apply(Command::SetAdjustment(slider, 0.0));
        }
    }

    /// The filter preset catalog, as an array of `{id, name, adjustments}`
    pub fn filter_presets(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&presets()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Apply a preset by id. Unknown ids log a console warning and leave
    /// the adjustments untouched.
    pub fn apply_preset(&mut self, id: &str) {
        if retouch_core::find_preset(id).is_none() {
            web_sys::console::warn_1(&JsValue::from_str(&format!("unknown filter preset: {id}")));
            return;
        }
        self.session.apply(Command::ApplyPreset(id.to_string()));
    }

    /// Id of the active preset, or undefined after any manual change
    #[wasm_bindgen(getter)]
    pub fn active_preset(&self) -> Option<String> {
        self.session.active_preset.clone()
    }

    // ----- Transform and crop -----

    /// Rotate the base image by degrees (normalized mod 360).
    pub fn rotate(&mut self, degrees: f32) {
        self.session.apply(Command::Rotate(degrees));
    }

    pub fn flip_horizontal(&mut self) {
        self.session.apply(Command::FlipX);
    }

    pub fn flip_vertical(&mut self) {
        self.session.apply(Command::FlipY);
    }

    /// Constrain the crop aspect ratio, e.g. `"free"`, `"1:1"`, `"16:9"`.
    pub fn set_aspect_ratio(&mut self, aspect: &str) -> Result<(), JsValue> {
        let aspect = serde_wasm_bindgen::from_value(JsValue::from_str(aspect))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.session.apply(Command::SetAspect(aspect));
        Ok(())
    }

    /// The pending crop rectangle `{x, y, width, height}`, or undefined
    pub fn crop_rect(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.crop)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Re-bake the bitmap to the pending crop and switch to select.
    pub fn apply_crop(&mut self) {
        self.session.apply(Command::ApplyCrop);
    }

    /// Drop the pending crop without touching history.
    pub fn cancel_crop(&mut self) {
        self.session.apply(Command::CancelCrop);
    }

    // ----- Overlays -----

    /// Committed freehand paths
    pub fn paths(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.paths)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Text overlays
    pub fn texts(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.texts)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Shape overlays
    pub fn shapes(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.shapes)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn selected_text(&self) -> Option<String> {
        self.session.selected_text.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn selected_shape(&self) -> Option<String> {
        self.session.selected_shape.clone()
    }

    /// Clear every freehand path in one undoable step.
    pub fn clear_drawings(&mut self) {
        self.session.apply(Command::ClearDrawings);
    }

    /// Add a text overlay at the image center and select it.
    pub fn add_text_at_center(&mut self) {
        self.session.apply(Command::AddTextAtCenter);
    }

    /// Edit a text overlay's content and styling from the panel.
    /// `edit` is `{text, font_size, font_family, color, bold, italic, align}`.
    pub fn update_text(&mut self, id: &str, edit: JsValue) -> Result<(), JsValue> {
        let edit: TextEdit =
            serde_wasm_bindgen::from_value(edit).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.session.apply(Command::UpdateText {
            id: id.to_string(),
            edit,
        });
        Ok(())
    }

    pub fn remove_text(&mut self, id: &str) {
        self.session.apply(Command::RemoveText(id.to_string()));
    }

    pub fn remove_shape(&mut self, id: &str) {
        self.session.apply(Command::RemoveShape(id.to_string()));
    }

    /// Delete the selected text, or failing that the selected shape.
    pub fn remove_selected(&mut self) {
        self.session.apply(Command::RemoveSelected);
    }

    // ----- Tool settings -----

    /// Replace the draw tool settings: `{kind, color, size}`.
    pub fn set_draw_settings(&mut self, settings: JsValue) -> Result<(), JsValue> {
        let settings =
            serde_wasm_bindgen::from_value(settings).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.session.apply(Command::SetDrawingSettings(settings));
        Ok(())
    }

    /// Replace the text tool settings used for new overlays.
    pub fn set_text_settings(&mut self, settings: JsValue) -> Result<(), JsValue> {
        let settings =
            serde_wasm_bindgen::from_value(settings).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.session.apply(Command::SetTextSettings(settings));
        Ok(())
    }

    /// Replace the shape tool settings used for new shapes.
    pub fn set_shape_settings(&mut self, settings: JsValue) -> Result<(), JsValue> {
        let settings =
            serde_wasm_bindgen::from_value(settings).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.session.apply(Command::SetShapeSettings(settings));
        Ok(())
    }

    // ----- Fonts -----

    /// Register font bytes for a family/style so text overlays in that
    /// family rasterize into rendered and exported frames.
    pub fn register_font(
        &mut self,
        family: &str,
        bold: bool,
        italic: bool,
        bytes: Vec<u8>,
    ) -> Result<(), JsValue> {
        self.session
            .fonts
            .register(family, bold, italic, bytes)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    // ----- History -----

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_undo(&self) -> bool {
        self.session.history.can_undo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_redo(&self) -> bool {
        self.session.history.can_redo()
    }

    // ----- View -----

    pub fn zoom_in(&mut self) {
        self.session.apply(Command::ZoomIn);
    }

    pub fn zoom_out(&mut self) {
        self.session.apply(Command::ZoomOut);
    }

    pub fn reset_view(&mut self) {
        self.session.apply(Command::ResetView);
    }

    /// Pan the view by screen-space deltas.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.session.apply(Command::Pan { dx, dy });
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f32 {
        self.session.view.zoom
    }

    #[wasm_bindgen(getter)]
    pub fn pan_x(&self) -> f32 {
        self.session.view.pan_x
    }

    #[wasm_bindgen(getter)]
    pub fn pan_y(&self) -> f32 {
        self.session.view.pan_y
    }

    // ----- Export -----

    /// Replace the export settings: `{format, quality, scale}`.
    pub fn set_export_settings(&mut self, settings: JsValue) -> Result<(), JsValue> {
        let settings =
            serde_wasm_bindgen::from_value(settings).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.session.apply(Command::SetExportSettings(settings));
        Ok(())
    }

    /// Render at the export scale and encode with the current settings.
    ///
    /// # Returns
    ///
    /// The encoded bytes plus MIME type and extension for the download.
    pub fn export(&mut self) -> Result<JsExportedFile, JsValue> {
        let format = self.session.export_settings.format;
        let bytes = self
            .session
            .export()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(JsExportedFile::new(
            bytes,
            format.mime_type(),
            format.extension(),
        ))
    }
}

impl JsEditorSession {
    #[allow(dead_code)] // Native-side test constructor; wasm hosts use `new`.
    pub(crate) fn from_bitmap(bitmap: retouch_core::Bitmap) -> Self {
        Self {
            session: EditorSession::new(bitmap),
            interaction: Interaction::new(),
        }
    }
}
