//! The built-in filter preset catalog.
//!
//! A preset is a complete adjustment record built by layering a small
//! delta over the defaults. Applying one replaces the session's current
//! adjustments wholesale, so switching from "Vivid" to "Mono" does not
//! leave Vivid's saturation behind.

use serde::Serialize;

use crate::Adjustments;

/// A named adjustment recipe. Serializable so the catalog can cross
/// the wasm boundary for the filter panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterPreset {
    /// Stable identifier used by the UI and the apply-preset command.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// The full adjustment record this preset resolves to.
    pub adjustments: Adjustments,
}

/// Build the full preset catalog, "Original" first.
pub fn presets() -> Vec<FilterPreset> {
    let base = Adjustments::default;
    vec![
        FilterPreset {
            id: "none",
            name: "Original",
            adjustments: base(),
        },
        FilterPreset {
            id: "vivid",
            name: "Vivid",
            adjustments: Adjustments {
                saturation: 30.0,
                contrast: 15.0,
                vibrance: 25.0,
                ..base()
            },
        },
        FilterPreset {
            id: "dramatic",
            name: "Dramatic",
            adjustments: Adjustments {
                contrast: 40.0,
                shadows: -20.0,
                highlights: 20.0,
                saturation: 10.0,
                ..base()
            },
        },
        FilterPreset {
            id: "mono",
            name: "Mono",
            adjustments: Adjustments {
                grayscale: 100.0,
                contrast: 10.0,
                ..base()
            },
        },
        FilterPreset {
            id: "noir",
            name: "Noir",
            adjustments: Adjustments {
                grayscale: 100.0,
                contrast: 30.0,
                shadows: -30.0,
                highlights: 20.0,
                ..base()
            },
        },
        FilterPreset {
            id: "silvertone",
            name: "Silvertone",
            adjustments: Adjustments {
                grayscale: 100.0,
                contrast: 5.0,
                brightness: 10.0,
                ..base()
            },
        },
        FilterPreset {
            id: "sepia",
            name: "Sepia",
            adjustments: Adjustments {
                sepia: 80.0,
                contrast: 5.0,
                ..base()
            },
        },
        FilterPreset {
            id: "vintage",
            name: "Vintage",
            adjustments: Adjustments {
                sepia: 30.0,
                contrast: -10.0,
                brightness: 5.0,
                vignette: 30.0,
                ..base()
            },
        },
        FilterPreset {
            id: "fade",
            name: "Fade",
            adjustments: Adjustments {
                contrast: -20.0,
                saturation: -15.0,
                brightness: 10.0,
                ..base()
            },
        },
        FilterPreset {
            id: "cool",
            name: "Cool",
            adjustments: Adjustments {
                temperature: -30.0,
                tint: -10.0,
                saturation: 5.0,
                hue: -10.0,
                ..base()
            },
        },
        FilterPreset {
            id: "warm",
            name: "Warm",
            adjustments: Adjustments {
                temperature: 30.0,
                tint: 10.0,
                saturation: 10.0,
                hue: 10.0,
                ..base()
            },
        },
        FilterPreset {
            id: "golden",
            name: "Golden",
            adjustments: Adjustments {
                temperature: 40.0,
                highlights: 20.0,
                saturation: 15.0,
                contrast: 10.0,
                sepia: 20.0,
                ..base()
            },
        },
        FilterPreset {
            id: "cinematic",
            name: "Cinematic",
            adjustments: Adjustments {
                contrast: 20.0,
                saturation: -10.0,
                temperature: -10.0,
                shadows: -15.0,
                vignette: 25.0,
                ..base()
            },
        },
        FilterPreset {
            id: "matte",
            name: "Matte",
            adjustments: Adjustments {
                contrast: -15.0,
                shadows: 20.0,
                saturation: -10.0,
                ..base()
            },
        },
        FilterPreset {
            id: "punch",
            name: "Punch",
            adjustments: Adjustments {
                contrast: 25.0,
                saturation: 20.0,
                vibrance: 30.0,
                sharpness: 20.0,
                ..base()
            },
        },
        FilterPreset {
            id: "dreamy",
            name: "Dreamy",
            adjustments: Adjustments {
                brightness: 15.0,
                contrast: -10.0,
                saturation: -5.0,
                blur: 5.0,
                highlights: 20.0,
                ..base()
            },
        },
        FilterPreset {
            id: "retro",
            name: "Retro",
            adjustments: Adjustments {
                sepia: 40.0,
                saturation: -20.0,
                contrast: 10.0,
                vignette: 20.0,
                ..base()
            },
        },
        FilterPreset {
            id: "neon",
            name: "Neon",
            adjustments: Adjustments {
                saturation: 50.0,
                contrast: 30.0,
                vibrance: 40.0,
                hue: 20.0,
                ..base()
            },
        },
        FilterPreset {
            id: "invert",
            name: "Invert",
            adjustments: Adjustments {
                invert: 100.0,
                ..base()
            },
        },
    ]
}

/// Look up a preset by id.
pub fn find_preset(id: &str) -> Option<FilterPreset> {
    presets().into_iter().find(|p| p.id == id)
}
