//! Seed pass: orbiting radial blobs drawn into an offscreen buffer.

use bytemuck::Zeroable;
use wgpu::util::DeviceExt;

use crate::error::InkflowError;
use crate::gpu::pipeline_helpers::{create_screen_space_pipeline, draw_fullscreen, uniform_buffer};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::{RenderTarget, FRAME_BUFFER_FORMAT};
use crate::params::{SeedParams, MAX_BLOBS};

/// One blob as laid out in `seed.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuBlob {
    /// amplitude x, amplitude y, speed x, speed y
    pub orbit: [f32; 4],
    /// x: radius
    pub shape: [f32; 4],
}

/// Uniform block of the seed pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SeedUniform {
    /// Target size in pixels.
    pub resolution: [f32; 2],
    /// Absolute time in seconds.
    pub time: f32,
    /// Number of valid entries in `blobs`.
    pub blob_count: u32,
    /// rgb tint, w unused.
    pub tint: [f32; 4],
    /// Blob table; entries past `blob_count` are ignored.
    pub blobs: [GpuBlob; MAX_BLOBS],
}

impl SeedUniform {
    /// Pack `params`, keeping at most [`MAX_BLOBS`] blobs.
    pub fn from_params(params: &SeedParams<'_>) -> Self {
        let mut blobs = [GpuBlob::default(); MAX_BLOBS];
        for (slot, blob) in blobs.iter_mut().zip(params.blobs) {
            *slot = GpuBlob {
                orbit: [blob.amplitude[0], blob.amplitude[1], blob.speed[0], blob.speed[1]],
                shape: [blob.radius, 0.0, 0.0, 0.0],
            };
        }
        let [r, g, b] = params.tint;
        Self {
            resolution: params.resolution.to_array(),
            time: params.time,
            blob_count: params.blobs.len().min(MAX_BLOBS) as u32,
            tint: [r, g, b, 1.0],
            blobs,
        }
    }
}

/// Pipeline and uniform buffer of the seed pass.
pub struct SeedPass {
    pipeline: wgpu::RenderPipeline,
    params_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl SeedPass {
    /// Compile `screen/seed.wgsl` and allocate its uniform.
    ///
    /// # Errors
    ///
    /// Returns [`InkflowError::Shader`] if the shader fails to compose.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, InkflowError> {
        let device = &context.device;
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Seed Params Buffer"),
            contents: bytemuck::bytes_of(&SeedUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Seed Bind Group Layout"),
            entries: &[uniform_buffer(0)],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Seed Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: params_buffer.as_entire_binding(),
            }],
        });

        let shader = shader_composer.compose(device, "Seed Shader", "screen/seed.wgsl")?;
        let pipeline = create_screen_space_pipeline(
            device,
            "Seed",
            &shader,
            FRAME_BUFFER_FORMAT,
            &[&layout],
        );

        Ok(Self {
            pipeline,
            params_buffer,
            bind_group,
        })
    }

    /// Upload this tick's parameters.
    pub fn prepare(&self, queue: &wgpu::Queue, params: &SeedParams<'_>) {
        let uniform = SeedUniform::from_params(params);
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Record the pass into `target`.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, target: &RenderTarget) {
        draw_fullscreen(
            encoder,
            "Seed Pass",
            &target.view,
            wgpu::Color::TRANSPARENT,
            &self.pipeline,
            &self.bind_group,
        );
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::params::{Blob, DEFAULT_BLOBS, SEED_TINT};

    #[test]
    fn uniform_matches_wgsl_layout() {
        assert_eq!(size_of::<GpuBlob>(), 32);
        assert_eq!(size_of::<SeedUniform>(), 32 + 32 * MAX_BLOBS);
    }

    #[test]
    fn packs_blobs_and_tint() {
        let uniform = SeedUniform::from_params(&SeedParams {
            resolution: Vec2::new(640.0, 480.0),
            time: 2.5,
            tint: SEED_TINT,
            blobs: &DEFAULT_BLOBS,
        });
        assert_eq!(uniform.resolution, [640.0, 480.0]);
        assert_eq!(uniform.blob_count, 4);
        assert_eq!(uniform.tint, [1.0, 0.5, 0.5, 1.0]);
        assert_eq!(uniform.blobs[2].orbit, [0.15, 0.15, 0.08, 0.12]);
        assert_eq!(uniform.blobs[3].shape[0], 0.01);
        assert_eq!(uniform.blobs[4].shape[0], 0.0);
    }

    #[test]
    fn extra_blobs_are_dropped() {
        let blobs = vec![Blob::new([0.1, 0.1], [1.0, 1.0], 0.02); MAX_BLOBS + 3];
        let uniform = SeedUniform::from_params(&SeedParams {
            resolution: Vec2::ONE,
            time: 0.0,
            tint: SEED_TINT,
            blobs: &blobs,
        });
        assert_eq!(uniform.blob_count, MAX_BLOBS as u32);
    }
}
