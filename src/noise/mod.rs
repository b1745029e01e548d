//! Animated two-channel flow field.
//!
//! Two independent Perlin fields (flow X and flow Y) are evaluated on a
//! small grid, with the noise's third axis advancing with time so the
//! field drifts smoothly between frames. Values are remapped to `[0, 1]`
//! and sampled bilinearly, matching how the GPU reads the uploaded
//! texture.

mod perlin;

use glam::Vec2;
pub use perlin::Perlin;

use crate::options::NoiseOptions;
use crate::raster::bilinear;

/// Width×height×2 field of flow samples in `[0, 1]`.
pub struct NoiseSource {
    fields: [Perlin; 2],
    width: u32,
    height: u32,
    frequency: f32,
    speed: f32,
    depth: f32,
    texels: Vec<[f32; 2]>,
}

impl NoiseSource {
    /// Build both fields from `options` and evaluate them at time zero.
    pub fn new(options: &NoiseOptions) -> Self {
        let width = options.width.max(1);
        let height = options.height.max(1);
        let mut source = Self {
            fields: [
                Perlin::new(options.seed),
                Perlin::new(options.seed.wrapping_add(1)),
            ],
            width,
            height,
            frequency: options.frequency,
            speed: options.speed,
            depth: 0.0,
            texels: vec![[0.5; 2]; (width * height) as usize],
        };
        source.regenerate();
        source
    }

    /// Advance the field by `dt` seconds and re-evaluate every sample.
    pub fn update(&mut self, dt: f32) {
        self.depth += dt * self.speed;
        self.regenerate();
    }

    fn regenerate(&mut self) {
        let (w, h) = (self.width as f32, self.height as f32);
        let depth = self.depth;
        let frequency = self.frequency;
        for (i, texel) in self.texels.iter_mut().enumerate() {
            let x = (i as u32 % self.width) as f32;
            let y = (i as u32 / self.width) as f32;
            let px = (x + 0.5) / w * frequency;
            let py = (y + 0.5) / h * frequency;
            for (channel, field) in texel.iter_mut().zip(&self.fields) {
                let n = field.sample(px, py, depth);
                *channel = (n * 0.5 + 0.5).clamp(0.0, 1.0);
            }
        }
    }

    /// Row-major samples, top row first.
    pub fn texels(&self) -> &[[f32; 2]] {
        &self.texels
    }

    /// Bilinear, clamp-to-edge lookup at texture coordinate `uv`.
    pub fn sample(&self, uv: Vec2) -> [f32; 2] {
        bilinear(
            &self.texels,
            self.width as usize,
            self.height as usize,
            uv,
        )
    }

    /// Field width in samples.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Field height in samples.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Accumulated position along the noise time axis.
    pub fn depth(&self) -> f32 {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_unit_range(source: &NoiseSource) -> bool {
        source
            .texels()
            .iter()
            .flatten()
            .all(|v| (0.0..=1.0).contains(v))
    }

    #[test]
    fn default_field_is_sixteen_square() {
        let source = NoiseSource::new(&NoiseOptions::default());
        assert_eq!((source.width(), source.height()), (16, 16));
        assert_eq!(source.texels().len(), 256);
    }

    #[test]
    fn values_stay_in_unit_range_across_updates() {
        let mut source = NoiseSource::new(&NoiseOptions::default());
        assert!(in_unit_range(&source));
        for step in 0..50 {
            source.update(0.05 + step as f32 * 0.3);
            assert!(in_unit_range(&source));
            for j in 0..9 {
                for i in 0..9 {
                    let uv = Vec2::new(i as f32 / 8.0, j as f32 / 8.0);
                    let [x, y] = source.sample(uv);
                    assert!((0.0..=1.0).contains(&x));
                    assert!((0.0..=1.0).contains(&y));
                }
            }
        }
    }

    #[test]
    fn fixed_seed_and_deltas_reproduce_the_field() {
        let options = NoiseOptions::default();
        let mut a = NoiseSource::new(&options);
        let mut b = NoiseSource::new(&options);
        for dt in [0.016, 0.033, 0.0, 0.1] {
            a.update(dt);
            b.update(dt);
        }
        assert_eq!(a.texels(), b.texels());
    }

    #[test]
    fn channels_use_distinct_seeds() {
        let source = NoiseSource::new(&NoiseOptions::default());
        assert!(source.texels().iter().any(|[x, y]| x != y));
    }

    #[test]
    fn update_moves_the_field() {
        let mut source = NoiseSource::new(&NoiseOptions::default());
        let before = source.texels().to_vec();
        source.update(1.0);
        assert_eq!(source.depth(), 0.25);
        assert_ne!(before, source.texels());
    }

    #[test]
    fn zero_dt_keeps_the_field() {
        let mut source = NoiseSource::new(&NoiseOptions::default());
        let before = source.texels().to_vec();
        source.update(0.0);
        assert_eq!(before, source.texels());
    }

    #[test]
    fn sampling_a_texel_center_returns_the_texel() {
        let source = NoiseSource::new(&NoiseOptions::default());
        let uv = Vec2::new(3.5 / 16.0, 10.5 / 16.0);
        assert_eq!(source.sample(uv), source.texels()[10 * 16 + 3]);
    }
}
