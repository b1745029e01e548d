//! wgpu implementation of the frame pipeline.
//!
//! [`GpuBackend`] owns every GPU resource: the seed buffer, the ping-pong
//! pair, the flow-noise texture, and the three pass pipelines. All work of
//! a tick is recorded into a single command encoder and submitted when the
//! frame is presented.

pub mod composite;
pub mod noise_texture;
pub mod seed;
pub mod spread;

use glam::Vec2;

use self::composite::CompositePass;
use self::noise_texture::NoiseTexture;
use self::seed::SeedPass;
use self::spread::{SpreadInputs, SpreadPass};
use crate::driver::FrameBackend;
use crate::error::InkflowError;
use crate::gpu::pipeline_helpers::linear_sampler;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::{RenderTarget, RenderTargetDesc};
use crate::noise::NoiseSource;
use crate::options::Options;
use crate::params::{SeedParams, SpreadParams};

/// What a host does after [`GpuBackend::present`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRecovery {
    /// The surface must be configured again before the next frame.
    Reconfigure,
    /// Transient (timeout, hidden window); drop this frame quietly.
    SkipFrame,
    /// Unrecoverable for this frame; worth an error in the log.
    Report,
}

impl FrameRecovery {
    /// Classify a presentation error.
    pub fn for_error(error: &wgpu::SurfaceError) -> Self {
        match error {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigure,
            wgpu::SurfaceError::OutOfMemory => Self::Report,
            _ => Self::SkipFrame,
        }
    }
}

/// GPU implementation of [`FrameBackend`].
pub struct GpuBackend {
    context: RenderContext,
    noise: NoiseSource,
    noise_texture: NoiseTexture,
    seed_target: RenderTarget,
    buffers: [RenderTarget; 2],
    seed_pass: SeedPass,
    spread_pass: SpreadPass,
    composite_pass: CompositePass,
    encoder: Option<wgpu::CommandEncoder>,
}

impl GpuBackend {
    /// Create all buffers at the context's current size and compile the
    /// passes.
    ///
    /// # Errors
    ///
    /// Returns [`InkflowError::Shader`] if any pass shader fails to compose.
    pub fn new(context: RenderContext, options: &Options) -> Result<Self, InkflowError> {
        let (width, height) = context.size();
        log::info!("offscreen buffers {width}x{height}");

        let mut shader_composer = ShaderComposer::new()?;
        let device = &context.device;

        let noise = NoiseSource::new(&options.noise);
        let mut noise_texture = NoiseTexture::new(device, &noise);
        noise_texture.upload(&context.queue, &noise);

        let seed_target = RenderTarget::new(device, &RenderTargetDesc::float("Seed Buffer", width, height));
        let buffers = [
            RenderTarget::new(device, &RenderTargetDesc::float("Ink Buffer 0", width, height)),
            RenderTarget::new(device, &RenderTargetDesc::float("Ink Buffer 1", width, height)),
        ];
        let sampler = linear_sampler(device, "Spread Sampler");

        let seed_pass = SeedPass::new(&context, &mut shader_composer)?;
        let spread_pass = SpreadPass::new(
            &context,
            &mut shader_composer,
            &SpreadInputs {
                buffers: &buffers,
                seed: &seed_target,
                noise: &noise_texture,
                sampler: &sampler,
            },
        )?;
        let composite_pass = CompositePass::new(
            &context,
            &mut shader_composer,
            &buffers,
            &options.display.composite_params(),
        )?;

        Ok(Self {
            context,
            noise,
            noise_texture,
            seed_target,
            buffers,
            seed_pass,
            spread_pass,
            composite_pass,
            encoder: None,
        })
    }

    /// The wgpu context.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Reconfigure the presentation surface. Offscreen buffers keep their
    /// size and are stretched onto the new surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
    }

    /// Re-apply the surface configuration after it was lost or outdated.
    pub fn reconfigure(&mut self) {
        log::warn!("reconfiguring surface");
        self.context.reconfigure();
    }

    /// Handle a failed present: reconfigure, skip, or log it.
    pub fn recover(&mut self, error: &wgpu::SurfaceError) {
        match FrameRecovery::for_error(error) {
            FrameRecovery::Reconfigure => self.reconfigure(),
            FrameRecovery::SkipFrame => log::debug!("frame skipped: {error}"),
            FrameRecovery::Report => log::error!("render error: {error}"),
        }
    }

    /// Ping-pong buffer `slot`, e.g. for copying results out.
    pub fn buffer(&self, slot: usize) -> &RenderTarget {
        &self.buffers[slot]
    }
}

impl FrameBackend for GpuBackend {
    type Error = wgpu::SurfaceError;

    fn resolution(&self) -> Vec2 {
        let (width, height) = self.seed_target.size();
        Vec2::new(width as f32, height as f32)
    }

    fn update_noise(&mut self, dt: f32) {
        self.noise.update(dt);
        self.noise_texture.upload(&self.context.queue, &self.noise);
    }

    fn render_seed(&mut self, params: &SeedParams<'_>) {
        self.seed_pass.prepare(&self.context.queue, params);
        let encoder = {
            let context = &self.context;
            self.encoder.get_or_insert_with(|| context.create_encoder())
        };
        self.seed_pass.render(encoder, &self.seed_target);
    }

    fn render_spread(&mut self, params: &SpreadParams, read: usize, write: usize) {
        self.spread_pass.prepare(&self.context.queue, params);
        let encoder = {
            let context = &self.context;
            self.encoder.get_or_insert_with(|| context.create_encoder())
        };
        self.spread_pass.render(encoder, read, &self.buffers[write]);
    }

    fn present(&mut self, slot: usize) -> Result<(), Self::Error> {
        let mut encoder = self
            .encoder
            .take()
            .unwrap_or_else(|| self.context.create_encoder());

        if !self.context.has_surface() {
            self.context.submit(encoder);
            return Ok(());
        }

        let frame = match self.context.acquire_frame() {
            Ok(frame) => frame,
            Err(e) => {
                // keep the offscreen feedback loop advancing
                self.context.submit(encoder);
                return Err(e);
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.composite_pass.render(&mut encoder, slot, &view);
        self.context.submit(encoder);
        frame.present();
        Ok(())
    }
}
