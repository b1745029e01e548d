//! GPU copy of the flow field.

use half::f16;

use crate::noise::NoiseSource;

/// Two-channel half-float texture holding the flow field.
pub struct NoiseTexture {
    texture: wgpu::Texture,
    /// Default view bound by the spread pass.
    pub view: wgpu::TextureView,
    width: u32,
    height: u32,
    staging: Vec<u16>,
}

impl NoiseTexture {
    /// Allocate a texture matching `source`'s dimensions.
    pub fn new(device: &wgpu::Device, source: &NoiseSource) -> Self {
        let (width, height) = (source.width(), source.height());
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Flow Noise Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rg16Float,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
            staging: Vec::with_capacity((width * height * 2) as usize),
        }
    }

    /// Copy the current field into the texture.
    pub fn upload(&mut self, queue: &wgpu::Queue, source: &NoiseSource) {
        encode_half(source.texels(), &mut self.staging);
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&self.staging),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * 4),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }
}

/// Convert `[x, y]` samples to interleaved f16 bit patterns.
fn encode_half(texels: &[[f32; 2]], out: &mut Vec<u16>) {
    out.clear();
    out.extend(
        texels
            .iter()
            .flatten()
            .map(|&v| f16::from_f32(v).to_bits()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_encoding_interleaves_channels() {
        let mut out = vec![7];
        encode_half(&[[0.0, 1.0], [0.5, 0.25]], &mut out);
        let decoded: Vec<f32> = out.iter().map(|&b| f16::from_bits(b).to_f32()).collect();
        assert_eq!(decoded, vec![0.0, 1.0, 0.5, 0.25]);
    }
}
