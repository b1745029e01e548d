//! Spread pass: blur, advect, and decay the accumulated ink, then add the
//! fresh seed layer.
//!
//! Two bind groups are built up front, one per ping-pong read slot, so a
//! tick only selects which one to use.

use wgpu::util::DeviceExt;

use super::noise_texture::NoiseTexture;
use crate::error::InkflowError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, draw_fullscreen, filtering_sampler, texture_2d, uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::{RenderTarget, FRAME_BUFFER_FORMAT};
use crate::params::SpreadParams;

/// Uniform block of the spread pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpreadUniform {
    /// Target size in pixels.
    pub resolution: [f32; 2],
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Flow displacement multiplier.
    pub flow_scale: f32,
    /// Blur tap spacing in texels.
    pub blur_radius: f32,
    /// Proportional decay per second.
    pub decay_rate: f32,
    /// Minimum decay per tick.
    pub decay_floor: f32,
    _pad: f32,
}

impl From<&SpreadParams> for SpreadUniform {
    fn from(params: &SpreadParams) -> Self {
        Self {
            resolution: params.resolution.to_array(),
            dt: params.dt,
            flow_scale: params.flow_scale,
            blur_radius: params.blur_radius,
            decay_rate: params.decay_rate,
            decay_floor: params.decay_floor,
            _pad: 0.0,
        }
    }
}

/// Textures the spread pass reads besides the previous buffer.
pub struct SpreadInputs<'a> {
    /// Ping-pong pair; the bind group for slot `i` reads `buffers[i]`.
    pub buffers: &'a [RenderTarget; 2],
    /// Seed pass output.
    pub seed: &'a RenderTarget,
    /// Flow field.
    pub noise: &'a NoiseTexture,
    /// Sampler shared by all three textures.
    pub sampler: &'a wgpu::Sampler,
}

/// Pipeline, uniform, and per-slot bind groups of the spread pass.
pub struct SpreadPass {
    pipeline: wgpu::RenderPipeline,
    params_buffer: wgpu::Buffer,
    bind_groups: [wgpu::BindGroup; 2],
}

impl SpreadPass {
    /// Compile `screen/spread.wgsl` and bind both ping-pong layouts.
    ///
    /// # Errors
    ///
    /// Returns [`InkflowError::Shader`] if the shader fails to compose.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
        inputs: &SpreadInputs<'_>,
    ) -> Result<Self, InkflowError> {
        let device = &context.device;
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Spread Params Buffer"),
            contents: bytemuck::bytes_of(&<SpreadUniform as bytemuck::Zeroable>::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Spread Bind Group Layout"),
            entries: &[
                // binding 0: previous accumulation
                texture_2d(0),
                // binding 1: seed
                texture_2d(1),
                // binding 2: flow noise
                texture_2d(2),
                filtering_sampler(3),
                uniform_buffer(4),
            ],
        });

        let bind_group = |slot: usize| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Spread Bind Group {slot}")),
                layout: &layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&inputs.buffers[slot].view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&inputs.seed.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(&inputs.noise.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(inputs.sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: params_buffer.as_entire_binding(),
                    },
                ],
            })
        };
        let bind_groups = [bind_group(0), bind_group(1)];

        let shader = shader_composer.compose(device, "Spread Shader", "screen/spread.wgsl")?;
        let pipeline = create_screen_space_pipeline(
            device,
            "Spread",
            &shader,
            FRAME_BUFFER_FORMAT,
            &[&layout],
        );

        Ok(Self {
            pipeline,
            params_buffer,
            bind_groups,
        })
    }

    /// Upload this tick's parameters.
    pub fn prepare(&self, queue: &wgpu::Queue, params: &SpreadParams) {
        let uniform = SpreadUniform::from(params);
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Record the pass reading slot `read` into `target`.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, read: usize, target: &RenderTarget) {
        draw_fullscreen(
            encoder,
            "Spread Pass",
            &target.view,
            wgpu::Color::TRANSPARENT,
            &self.pipeline,
            &self.bind_groups[read],
        );
    }
}
