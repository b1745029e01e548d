//! Composite pass: maps ink alpha onto the presentation surface.

use wgpu::util::DeviceExt;

use crate::error::InkflowError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, draw_fullscreen, filtering_sampler, texture_2d, uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::RenderTarget;
use crate::params::CompositeParams;

/// Uniform block of the composite pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CompositeUniform {
    /// rgb at full ink, w unused.
    pub ink_color: [f32; 4],
    /// rgb without ink, w unused.
    pub background: [f32; 4],
}

impl From<&CompositeParams> for CompositeUniform {
    fn from(params: &CompositeParams) -> Self {
        let [r, g, b] = params.ink_color;
        let [br, bg, bb] = params.background;
        Self {
            ink_color: [r, g, b, 1.0],
            background: [br, bg, bb, 1.0],
        }
    }
}

/// Pipeline and per-slot bind groups of the composite pass.
pub struct CompositePass {
    pipeline: wgpu::RenderPipeline,
    bind_groups: [wgpu::BindGroup; 2],
    background: wgpu::Color,
}

impl CompositePass {
    /// Compile `screen/composite.wgsl` targeting the surface format.
    ///
    /// # Errors
    ///
    /// Returns [`InkflowError::Shader`] if the shader fails to compose.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
        buffers: &[RenderTarget; 2],
        params: &CompositeParams,
    ) -> Result<Self, InkflowError> {
        let device = &context.device;
        let uniform = CompositeUniform::from(params);
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Composite Params Buffer"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Composite Bind Group Layout"),
            entries: &[texture_2d(0), filtering_sampler(1), uniform_buffer(2)],
        });
        let bind_group = |target: &RenderTarget, slot: usize| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Composite Bind Group {slot}")),
                layout: &layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&target.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&target.sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: params_buffer.as_entire_binding(),
                    },
                ],
            })
        };
        let bind_groups = [bind_group(&buffers[0], 0), bind_group(&buffers[1], 1)];

        let shader = shader_composer.compose(device, "Composite Shader", "screen/composite.wgsl")?;
        let pipeline = create_screen_space_pipeline(
            device,
            "Composite",
            &shader,
            context.format(),
            &[&layout],
        );

        let [r, g, b] = params.background;
        Ok(Self {
            pipeline,
            bind_groups,
            background: wgpu::Color {
                r: f64::from(r),
                g: f64::from(g),
                b: f64::from(b),
                a: 1.0,
            },
        })
    }

    /// Record the pass showing ping-pong slot `slot` into `output`.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, slot: usize, output: &wgpu::TextureView) {
        draw_fullscreen(
            encoder,
            "Composite Pass",
            output,
            self.background,
            &self.pipeline,
            &self.bind_groups[slot],
        );
    }
}
