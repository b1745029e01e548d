use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::params::CompositeParams;

/// Window, pacing, and presentation colors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
pub struct DisplayOptions {
    /// Window title (native viewer only).
    #[schemars(skip)]
    pub title: String,
    /// Requested window width in logical pixels.
    #[schemars(skip)]
    pub width: u32,
    /// Requested window height in logical pixels.
    #[schemars(skip)]
    pub height: u32,
    /// Color at full ink alpha.
    #[schemars(title = "Ink Color")]
    pub ink_color: [f32; 3],
    /// Color where there is no ink.
    #[schemars(title = "Background")]
    pub background: [f32; 3],
    /// Frame cap (0 = present every redraw).
    #[schemars(title = "Target FPS", range(min = 0, max = 240))]
    pub target_fps: u32,
    /// Longest `dt` handed to the pipeline, in seconds.
    #[schemars(skip)]
    pub max_frame_delta: f32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        let composite = CompositeParams::default();
        Self {
            title: "inkflow".into(),
            width: 960,
            height: 720,
            ink_color: composite.ink_color,
            background: composite.background,
            target_fps: 0,
            max_frame_delta: 0.1,
        }
    }
}

impl DisplayOptions {
    /// Presentation colors for the composite pass.
    pub fn composite_params(&self) -> CompositeParams {
        CompositeParams {
            ink_color: self.ink_color,
            background: self.background,
        }
    }
}
