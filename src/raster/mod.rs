//! Software rendition of the pipeline.
//!
//! [`CpuBackend`] runs the same per-pixel formulas as the WGSL passes on
//! `f32` images. It needs no GPU, which makes it the backend for tests,
//! benchmarks, and headless inspection of the ink field.

mod image;
pub mod kernels;

use std::convert::Infallible;

use glam::Vec2;
pub use image::{bilinear, Image};

use crate::driver::FrameBackend;
use crate::noise::NoiseSource;
use crate::options::Options;
use crate::params::{CompositeParams, SeedParams, SpreadParams};

/// CPU implementation of [`FrameBackend`].
pub struct CpuBackend {
    noise: NoiseSource,
    seed: Image,
    buffers: [Image; 2],
    composite: CompositeParams,
    frame: Image,
    presented: Option<usize>,
}

impl CpuBackend {
    /// Allocate every buffer at `width`×`height` with the noise field and
    /// colors described by `options`.
    pub fn new(width: u32, height: u32, options: &Options) -> Self {
        Self {
            noise: NoiseSource::new(&options.noise),
            seed: Image::new(width, height),
            buffers: [Image::new(width, height), Image::new(width, height)],
            composite: options.display.composite_params(),
            frame: Image::new(width, height),
            presented: None,
        }
    }

    /// The most recent seed pass output.
    pub fn seed(&self) -> &Image {
        &self.seed
    }

    /// Ping-pong buffer `slot` (0 or 1).
    pub fn buffer(&self, slot: usize) -> &Image {
        &self.buffers[slot]
    }

    /// Mutable access to a ping-pong buffer, e.g. to preload ink.
    pub fn buffer_mut(&mut self, slot: usize) -> &mut Image {
        &mut self.buffers[slot]
    }

    /// The buffer handed to the last `present` call.
    pub fn presented(&self) -> Option<&Image> {
        self.presented.map(|slot| &self.buffers[slot])
    }

    /// Slot index of the last presented buffer.
    pub fn presented_slot(&self) -> Option<usize> {
        self.presented
    }

    /// Composited output colors of the last present.
    pub fn frame(&self) -> &Image {
        &self.frame
    }

    /// The flow field.
    pub fn noise(&self) -> &NoiseSource {
        &self.noise
    }
}

impl FrameBackend for CpuBackend {
    type Error = Infallible;

    fn resolution(&self) -> Vec2 {
        self.seed.resolution()
    }

    fn update_noise(&mut self, dt: f32) {
        self.noise.update(dt);
    }

    fn render_seed(&mut self, params: &SeedParams<'_>) {
        let [r, g, b] = params.tint;
        self.seed.fill_with(|uv| {
            let st = kernels::centered_coords(uv, params.resolution);
            [r, g, b, kernels::seed_alpha(st, params.time, params.blobs)]
        });
    }

    fn render_spread(&mut self, params: &SpreadParams, read: usize, write: usize) {
        let [first, second] = &mut self.buffers;
        let (previous, target) = match (read, write) {
            (0, 1) => (&*first, second),
            (1, 0) => (&*second, first),
            _ => {
                log::error!("invalid spread slots read={read} write={write}");
                return;
            }
        };
        let noise = &self.noise;
        let seed = &self.seed;
        target.fill_with(|uv| {
            let fresh = seed.sample_alpha(uv);
            let alpha =
                kernels::spread_alpha(previous, uv, noise.sample(uv), fresh, params);
            [1.0, 1.0, 1.0, alpha]
        });
    }

    fn present(&mut self, slot: usize) -> Result<(), Self::Error> {
        let ink = &self.buffers[slot];
        let CompositeParams {
            ink_color,
            background,
        } = self.composite;
        self.frame.fill_with(|uv| {
            let a = ink.sample_alpha(uv).clamp(0.0, 1.0);
            let mix = |c: usize| background[c] + (ink_color[c] - background[c]) * a;
            [mix(0), mix(1), mix(2), 1.0]
        });
        self.presented = Some(slot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_pass_writes_tint_and_blob_alpha() {
        let options = Options::default();
        let mut backend = CpuBackend::new(16, 16, &options);
        backend.render_seed(&SeedParams {
            resolution: backend.resolution(),
            time: 0.0,
            tint: options.seed.tint,
            blobs: &options.seed.blobs,
        });

        let center = backend.seed().get(8, 6);
        assert_eq!(&center[..3], &options.seed.tint);
        assert!(center[3] > 0.25, "{}", center[3]);
        assert_eq!(backend.seed().alpha(0, 0), 0.0);
    }

    #[test]
    fn spread_writes_only_the_write_slot() {
        let options = Options::default();
        let mut backend = CpuBackend::new(8, 8, &options);
        *backend.buffer_mut(0) = Image::filled(8, 8, [1.0, 1.0, 1.0, 0.5]);

        let params = SpreadParams::new(backend.resolution(), 0.0);
        backend.render_spread(&params, 0, 1);

        assert_eq!(backend.buffer(0).alpha(3, 3), 0.5);
        let written = backend.buffer(1).alpha(3, 3);
        assert!((written - 0.4995).abs() < 1e-6, "{written}");
    }

    #[test]
    fn invalid_slots_leave_buffers_untouched() {
        let options = Options::default();
        let mut backend = CpuBackend::new(4, 4, &options);
        let params = SpreadParams::new(backend.resolution(), 0.0);
        backend.render_spread(&params, 1, 1);
        assert_eq!(backend.buffer(1).alpha_sum(), 0.0);
    }

    #[test]
    fn present_mixes_background_and_ink() {
        let mut options = Options::default();
        options.display.background = [0.0, 0.0, 0.2];
        options.display.ink_color = [1.0, 0.0, 0.2];
        let mut backend = CpuBackend::new(2, 2, &options);
        *backend.buffer_mut(1) = Image::filled(2, 2, [1.0, 1.0, 1.0, 0.5]);

        backend.present(1).unwrap();
        assert_eq!(backend.presented_slot(), Some(1));
        let texel = backend.frame().get(0, 1);
        assert!((texel[0] - 0.5).abs() < 1e-6);
        assert_eq!(texel[1], 0.0);
        assert!((texel[2] - 0.2).abs() < 1e-6);
        assert_eq!(texel[3], 1.0);
    }
}
