//! Offscreen render-target textures.

/// Format of every offscreen ink buffer: filterable and renderable without
/// optional device features.
pub const FRAME_BUFFER_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Size, format, and sampling behavior of a [`RenderTarget`].
#[derive(Debug, Clone, Copy)]
pub struct RenderTargetDesc<'a> {
    /// Debug label.
    pub label: &'a str,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Texel format.
    pub format: wgpu::TextureFormat,
    /// Magnification/minification filter.
    pub filter: wgpu::FilterMode,
    /// Edge behavior on both axes.
    pub wrap: wgpu::AddressMode,
}

impl<'a> RenderTargetDesc<'a> {
    /// Floating-point, linearly filtered, clamp-to-edge target.
    pub fn float(label: &'a str, width: u32, height: u32) -> Self {
        Self {
            label,
            width,
            height,
            format: FRAME_BUFFER_FORMAT,
            filter: wgpu::FilterMode::Linear,
            wrap: wgpu::AddressMode::ClampToEdge,
        }
    }
}

/// A render-target texture, its default view, and the sampler passes use
/// to read it.
///
/// The texture is created with `RENDER_ATTACHMENT | TEXTURE_BINDING |
/// COPY_SRC | COPY_DST` usage, making it suitable for offscreen rendering
/// followed by sampling, read-back, or direct uploads.
pub struct RenderTarget {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
    /// Sampler honoring the descriptor's filter and wrap modes.
    pub sampler: wgpu::Sampler,
    width: u32,
    height: u32,
}

impl RenderTarget {
    /// Create a new render target.
    #[must_use]
    pub fn new(device: &wgpu::Device, desc: &RenderTargetDesc<'_>) -> Self {
        let width = desc.width.max(1);
        let height = desc.height.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(desc.label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: desc.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(desc.label),
            address_mode_u: desc.wrap,
            address_mode_v: desc.wrap,
            address_mode_w: desc.wrap,
            mag_filter: desc.filter,
            min_filter: desc.filter,
            ..Default::default()
        });
        Self {
            texture,
            view,
            sampler,
            width,
            height,
        }
    }

    /// Texture size in texels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
