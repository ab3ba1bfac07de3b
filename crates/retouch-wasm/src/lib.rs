//! Retouch WASM - WebAssembly bindings for Retouch
//!
//! This crate exposes the retouch-core editing engine to
//! JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `session` - The stateful editor session (tools, gestures, history, export)
//! - `types` - WASM-compatible wrapper types for frames and exported files
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditorSession } from '@retouch/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const session = new JsEditorSession(bytes);
//!
//! session.set_adjustment('brightness', 20);
//! const frame = session.render();
//! const imageData = new ImageData(
//!   new Uint8ClampedArray(frame.pixels()), frame.width, frame.height,
//! );
//! ```

use wasm_bindgen::prelude::*;

mod session;
mod types;

// Re-export public types
pub use session::JsEditorSession;
pub use types::{JsExportedFile, JsFrame};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
