//! Shared utilities.

/// Frame clock: absolute time, clamped deltas, and frame pacing.
pub mod frame_timing;
