use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Flow-field noise parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Noise", inline)]
#[serde(default)]
pub struct NoiseOptions {
    /// Field width in samples.
    #[schemars(title = "Width", range(min = 2, max = 256))]
    pub width: u32,
    /// Field height in samples.
    #[schemars(title = "Height", range(min = 2, max = 256))]
    pub height: u32,
    /// Noise lattice cells spanned by the field.
    #[schemars(title = "Frequency", range(min = 0.5, max = 16.0), extend("step" = 0.5))]
    pub frequency: f32,
    /// Noise-space units travelled per second along the time axis.
    #[schemars(title = "Speed", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub speed: f32,
    /// Permutation seed; the second channel uses `seed + 1`.
    #[schemars(skip)]
    pub seed: u64,
}

impl Default for NoiseOptions {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
            frequency: 3.0,
            speed: 0.25,
            seed: 0x1f10,
        }
    }
}
