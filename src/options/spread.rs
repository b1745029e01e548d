use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::params::{BLUR_RADIUS, DECAY_FLOOR, DECAY_RATE, FLOW_SCALE};

/// Advection, blur, and decay tuning of the spread pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Spread", inline)]
#[serde(default)]
pub struct SpreadOptions {
    /// Flow displacement multiplier, in texels.
    #[schemars(title = "Flow Scale", range(min = 0.0, max = 8.0), extend("step" = 0.1))]
    pub flow_scale: f32,
    /// Distance between blur taps, in texels.
    #[schemars(title = "Blur Radius", range(min = 0.0, max = 4.0), extend("step" = 0.1))]
    pub blur_radius: f32,
    /// Fraction of ink removed per second.
    #[schemars(title = "Decay Rate", range(min = 0.0, max = 2.0), extend("step" = 0.01))]
    pub decay_rate: f32,
    /// Minimum ink removed per tick.
    #[schemars(title = "Decay Floor", range(min = 0.0, max = 0.01), extend("step" = 0.0001))]
    pub decay_floor: f32,
}

impl Default for SpreadOptions {
    fn default() -> Self {
        Self {
            flow_scale: FLOW_SCALE,
            blur_radius: BLUR_RADIUS,
            decay_rate: DECAY_RATE,
            decay_floor: DECAY_FLOOR,
        }
    }
}
