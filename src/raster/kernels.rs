//! Per-pixel formulas of the seed and spread passes.
//!
//! These mirror `seed.wgsl` and `spread.wgsl` line for line.

use glam::Vec2;

use super::Image;
use crate::params::{Blob, SpreadParams, BLUR_KERNEL, BLUR_NORMALIZATION, MAX_BLOBS};

/// GLSL/WGSL `smoothstep`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Aspect-corrected, y-up coordinates: the longer axis spans `[-0.5, 0.5]`.
pub fn centered_coords(uv: Vec2, resolution: Vec2) -> Vec2 {
    let centered = Vec2::new(uv.x - 0.5, 0.5 - uv.y);
    centered * resolution / resolution.max_element()
}

/// Seed alpha at `st`: the sum of every blob's radial falloff.
pub fn seed_alpha(st: Vec2, time: f32, blobs: &[Blob]) -> f32 {
    blobs
        .iter()
        .take(MAX_BLOBS)
        .map(|blob| 1.0 - smoothstep(0.0, blob.radius, st.distance(blob.center(time))))
        .sum()
}

/// 3x3 weighted blur of `previous`'s alpha around `st`, taps
/// `texel` apart.
pub fn blur(previous: &Image, st: Vec2, texel: Vec2) -> f32 {
    let mut sum = 0.0;
    for (row, dy) in BLUR_KERNEL.iter().zip(-1..=1) {
        for (weight, dx) in row.iter().zip(-1..=1) {
            let offset = Vec2::new(dx as f32, dy as f32) * texel;
            sum += previous.sample_alpha(st + offset) * weight;
        }
    }
    sum / BLUR_NORMALIZATION
}

/// New accumulated alpha at `uv`.
///
/// `flow` is the noise field sample at `uv` and `fresh` the seed alpha
/// there. The result is saturated to `[0, 1]`.
pub fn spread_alpha(
    previous: &Image,
    uv: Vec2,
    flow: [f32; 2],
    fresh: f32,
    params: &SpreadParams,
) -> f32 {
    let displacement =
        (Vec2::from(flow) - Vec2::splat(0.5)) * params.flow_scale / params.resolution;
    let texel = params.blur_radius / params.resolution;

    let blurred = blur(previous, uv + displacement, texel);
    let decayed = blurred - params.decay_floor.max(params.dt * blurred * params.decay_rate);
    (decayed + fresh).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{DECAY_FLOOR, DEFAULT_BLOBS};

    #[test]
    fn smoothstep_matches_hermite_curve() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        // reversed edges equal the complement
        let d = 0.013;
        assert!((smoothstep(0.05, 0.0, d) - (1.0 - smoothstep(0.0, 0.05, d))).abs() < 1e-6);
    }

    #[test]
    fn centered_coords_follow_longer_axis() {
        let res = Vec2::new(200.0, 100.0);
        assert_eq!(centered_coords(Vec2::new(0.5, 0.5), res), Vec2::ZERO);
        assert_eq!(centered_coords(Vec2::new(1.0, 0.0), res), Vec2::new(0.5, 0.25));
        assert_eq!(centered_coords(Vec2::new(0.0, 1.0), res), Vec2::new(-0.5, -0.25));
    }

    #[test]
    fn first_blob_center_is_fully_inked_at_time_zero() {
        let st = DEFAULT_BLOBS[0].center(0.0);
        assert_eq!(st, Vec2::new(0.0, 0.1));
        assert_eq!(seed_alpha(st, 0.0, &DEFAULT_BLOBS), 1.0);
    }

    #[test]
    fn seed_alpha_is_bounded_by_blob_count() {
        let max = DEFAULT_BLOBS.len() as f32;
        for step in 0..40 {
            let time = step as f32 * 1.7;
            for j in 0..21 {
                for i in 0..21 {
                    let st = Vec2::new(i as f32 / 20.0 - 0.5, j as f32 / 20.0 - 0.5);
                    let a = seed_alpha(st, time, &DEFAULT_BLOBS);
                    assert!((0.0..=max).contains(&a), "{a}");
                }
            }
        }
    }

    #[test]
    fn far_from_every_blob_is_empty() {
        assert_eq!(seed_alpha(Vec2::new(0.5, -0.5), 3.0, &DEFAULT_BLOBS), 0.0);
    }

    #[test]
    fn blur_preserves_uniform_images() {
        let image = Image::filled(8, 8, [1.0, 1.0, 1.0, 0.5]);
        let blurred = blur(&image, Vec2::new(0.3, 0.7), Vec2::splat(1.5 / 8.0));
        assert!((blurred - 0.5).abs() < 1e-6, "{blurred}");
    }

    #[test]
    fn zero_dt_removes_exactly_the_floor() {
        let previous = Image::filled(16, 16, [1.0, 1.0, 1.0, 0.5]);
        let params = SpreadParams::new(previous.resolution(), 0.0);
        let alpha = spread_alpha(&previous, Vec2::new(0.4, 0.6), [0.9, 0.1], 0.0, &params);
        assert!((alpha - (0.5 - DECAY_FLOOR)).abs() < 1e-6, "{alpha}");
    }

    #[test]
    fn proportional_decay_dominates_for_large_dt() {
        let previous = Image::filled(4, 4, [1.0, 1.0, 1.0, 0.8]);
        let params = SpreadParams::new(previous.resolution(), 0.5);
        let alpha = spread_alpha(&previous, Vec2::splat(0.5), [0.5, 0.5], 0.0, &params);
        // 0.8 - 0.5 * 0.8 * 0.1
        assert!((alpha - 0.76).abs() < 1e-6, "{alpha}");
    }

    #[test]
    fn spread_output_saturates() {
        let previous = Image::filled(4, 4, [1.0, 1.0, 1.0, 1.0]);
        let params = SpreadParams::new(previous.resolution(), 0.0);
        assert_eq!(spread_alpha(&previous, Vec2::splat(0.5), [0.5, 0.5], 2.0, &params), 1.0);

        let empty = Image::new(4, 4);
        assert_eq!(spread_alpha(&empty, Vec2::splat(0.5), [0.5, 0.5], 0.0, &params), 0.0);
    }

    #[test]
    fn flow_displaces_the_read_position() {
        // ink only in the right column; flow pushes the read to the right
        let mut previous = Image::new(4, 1);
        previous.set(3, 0, [1.0, 1.0, 1.0, 1.0]);
        let mut params = SpreadParams::new(previous.resolution(), 0.0);
        params.blur_radius = 0.0;
        params.decay_floor = 0.0;
        params.flow_scale = 2.0;

        let uv = previous.uv(2, 0);
        let still = spread_alpha(&previous, uv, [0.5, 0.5], 0.0, &params);
        let pushed = spread_alpha(&previous, uv, [1.0, 0.5], 0.0, &params);
        assert_eq!(still, 0.0);
        assert_eq!(pushed, 1.0);
    }
}
