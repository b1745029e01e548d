//! Per-pass parameter structs and the numeric constants of the sketch.
//!
//! The driver rebuilds these every tick and hands them to the backend
//! explicitly; nothing here is shared mutable state. The constants are the
//! single source for both the software raster kernels and the WGSL passes
//! (which receive them through uniforms).

use glam::Vec2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Upper bound on blobs; matches the uniform array length in `seed.wgsl`.
pub const MAX_BLOBS: usize = 8;

/// Seed color channels. Only the alpha channel feeds the spread pass.
pub const SEED_TINT: [f32; 3] = [1.0, 0.5, 0.5];

/// Multiplier applied to the recentered flow vector before dividing by
/// resolution (displacement in texels).
pub const FLOW_SCALE: f32 = 1.0;

/// Distance between blur taps, in texels.
pub const BLUR_RADIUS: f32 = 1.5;

/// Fraction of the blurred value removed per second of `dt`.
pub const DECAY_RATE: f32 = 0.1;

/// Minimum amount removed per tick, regardless of `dt`.
pub const DECAY_FLOOR: f32 = 0.0005;

/// 3x3 blur weights, row-major, indexed by `[dy + 1][dx + 1]`.
pub const BLUR_KERNEL: [[f32; 3]; 3] = [[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]];

/// Sum of [`BLUR_KERNEL`].
pub const BLUR_NORMALIZATION: f32 = 16.0;

/// One orbiting radial blob of the seed pass.
///
/// Its center at time `t` is
/// `(amplitude.x * sin(t * speed.x), amplitude.y * cos(t * speed.y))` in
/// aspect-corrected coordinates where the longer screen axis spans
/// `[-0.5, 0.5]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Blob {
    /// Orbit amplitude on each axis.
    pub amplitude: [f32; 2],
    /// Angular speed on each axis, radians per second.
    pub speed: [f32; 2],
    /// Falloff radius; alpha reaches zero at this distance.
    pub radius: f32,
}

impl Blob {
    /// Create a blob from its orbit and falloff radius.
    pub const fn new(amplitude: [f32; 2], speed: [f32; 2], radius: f32) -> Self {
        Self {
            amplitude,
            speed,
            radius,
        }
    }

    /// Center of the blob at `time`.
    pub fn center(&self, time: f32) -> Vec2 {
        Vec2::new(
            self.amplitude[0] * (time * self.speed[0]).sin(),
            self.amplitude[1] * (time * self.speed[1]).cos(),
        )
    }
}

/// The four blobs of the original sketch.
pub const DEFAULT_BLOBS: [Blob; 4] = [
    Blob::new([0.10, 0.10], [0.10, 0.10], 0.05),
    Blob::new([0.20, 0.20], [0.12, 0.12], 0.02),
    Blob::new([0.15, 0.15], [0.08, 0.12], 0.03),
    Blob::new([0.10, 0.05], [0.13, 0.30], 0.01),
];

/// Inputs of one seed pass invocation.
#[derive(Debug, Clone, Copy)]
pub struct SeedParams<'a> {
    /// Target size in pixels.
    pub resolution: Vec2,
    /// Absolute elapsed time in seconds.
    pub time: f32,
    /// Constant color channels of the seed buffer.
    pub tint: [f32; 3],
    /// Blobs to draw (at most [`MAX_BLOBS`] are honored by the GPU pass).
    pub blobs: &'a [Blob],
}

/// Inputs of one spread pass invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadParams {
    /// Target size in pixels.
    pub resolution: Vec2,
    /// Seconds since the previous tick.
    pub dt: f32,
    /// See [`FLOW_SCALE`].
    pub flow_scale: f32,
    /// See [`BLUR_RADIUS`].
    pub blur_radius: f32,
    /// See [`DECAY_RATE`].
    pub decay_rate: f32,
    /// See [`DECAY_FLOOR`].
    pub decay_floor: f32,
}

impl SpreadParams {
    /// Parameters with the sketch's default constants.
    pub fn new(resolution: Vec2, dt: f32) -> Self {
        Self {
            resolution,
            dt,
            flow_scale: FLOW_SCALE,
            blur_radius: BLUR_RADIUS,
            decay_rate: DECAY_RATE,
            decay_floor: DECAY_FLOOR,
        }
    }
}

/// Colors used when presenting the ink buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeParams {
    /// Color at full ink alpha.
    pub ink_color: [f32; 3],
    /// Color where there is no ink.
    pub background: [f32; 3],
}

impl Default for CompositeParams {
    fn default() -> Self {
        Self {
            ink_color: [1.0, 1.0, 1.0],
            background: [0.0, 0.0, 0.0],
        }
    }
}
