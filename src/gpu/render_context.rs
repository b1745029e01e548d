use std::fmt;

/// Errors that can occur while opening the GPU.
#[derive(Debug)]
pub enum RenderContextError {
    /// The window or canvas handle could not back a wgpu surface.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No adapter can render (to the surface, if there is one).
    AdapterRequest(wgpu::RequestAdapterError),
    /// The adapter refused the requested limits or features.
    DeviceRequest(wgpu::RequestDeviceError),
    /// The adapter cannot present to the surface.
    UnsupportedSurface,
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceCreation(e) => write!(f, "surface creation failed: {e}"),
            Self::AdapterRequest(e) => write!(f, "no compatible GPU adapter found: {e}"),
            Self::DeviceRequest(e) => write!(f, "device request failed: {e}"),
            Self::UnsupportedSurface => f.write_str("surface not supported by adapter"),
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SurfaceCreation(e) => Some(e),
            Self::AdapterRequest(e) => Some(e),
            Self::DeviceRequest(e) => Some(e),
            Self::UnsupportedSurface => None,
        }
    }
}

/// Device, queue, and (when drawing to a window or canvas) the surface.
///
/// Without a surface the context still reports a size and a color format,
/// which size the offscreen buffers and the composite pipeline.
pub struct RenderContext {
    /// The wgpu logical device.
    pub device: wgpu::Device,
    /// The wgpu command queue.
    pub queue: wgpu::Queue,
    /// Presentation surface; `None` when headless.
    pub surface: Option<wgpu::Surface<'static>>,
    /// Surface configuration, or the nominal one when headless.
    pub config: wgpu::SurfaceConfiguration,
}

impl RenderContext {
    /// Open the GPU for a window or canvas of `initial_size` physical
    /// pixels.
    ///
    /// # Errors
    ///
    /// Any step of surface, adapter, or device creation can fail; see
    /// [`RenderContextError`].
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(target)
            .map_err(RenderContextError::SurfaceCreation)?;
        let adapter = request_adapter(&instance, Some(&surface)).await?;
        let (device, queue) = request_device(&adapter).await?;

        let (width, height) = (initial_size.0.max(1), initial_size.1.max(1));
        let mut config = surface
            .get_default_config(&adapter, width, height)
            .ok_or(RenderContextError::UnsupportedSurface)?;
        config.format = pick_surface_format(&surface.get_capabilities(&adapter).formats);
        config.present_mode = wgpu::PresentMode::Fifo;
        surface.configure(&device, &config);
        log::info!("surface {width}x{height} {:?}", config.format);

        Ok(Self {
            device,
            queue,
            surface: Some(surface),
            config,
        })
    }

    /// Open the GPU without any surface, for offscreen rendering.
    ///
    /// # Errors
    ///
    /// Fails if no adapter or device is available.
    pub async fn headless(width: u32, height: u32) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let adapter = request_adapter(&instance, None).await?;
        let (device, queue) = request_device(&adapter).await?;
        Ok(Self::from_device(
            device,
            queue,
            pick_surface_format(&[]),
            width,
            height,
        ))
    }

    /// Wrap a device and queue owned by an embedding application. No
    /// surface is attached.
    #[must_use]
    pub fn from_device(
        device: wgpu::Device,
        queue: wgpu::Queue,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
        };
        Self {
            device,
            queue,
            surface: None,
            config,
        }
    }

    /// Color format of the output (surface or nominal).
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Output size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Returns `true` if frames are presented to a surface.
    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Adopt a new output size. Zero-sized requests (minimized windows)
    /// are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == self.size() {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
    }

    /// Re-apply the configuration, e.g. after the surface was lost.
    pub fn reconfigure(&self) {
        if let Some(surface) = &self.surface {
            surface.configure(&self.device, &self.config);
        }
    }

    /// Acquire the next surface texture.
    ///
    /// # Errors
    ///
    /// Returns the surface's error, or [`wgpu::SurfaceError::Lost`] when
    /// headless.
    pub fn acquire_frame(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        match &self.surface {
            Some(surface) => surface.get_current_texture(),
            None => Err(wgpu::SurfaceError::Lost),
        }
    }

    /// Start recording the commands of one frame.
    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            })
    }

    /// Finish `encoder` and queue it for execution.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}

/// Choose the output format among those the surface supports.
///
/// The composite pass writes display values directly, so a non-sRGB format
/// is preferred; otherwise the first format with its sRGB suffix removed.
/// An empty list yields `Rgba8Unorm`.
pub fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> wgpu::TextureFormat {
    formats
        .iter()
        .copied()
        .find(|format| !format.is_srgb())
        .or_else(|| formats.first().copied().map(|f| f.remove_srgb_suffix()))
        .unwrap_or(wgpu::TextureFormat::Rgba8Unorm)
}

async fn request_adapter(
    instance: &wgpu::Instance,
    surface: Option<&wgpu::Surface<'_>>,
) -> Result<wgpu::Adapter, RenderContextError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: surface,
            force_fallback_adapter: false,
        })
        .await
        .map_err(RenderContextError::AdapterRequest)?;
    let info = adapter.get_info();
    log::info!("using adapter {} ({:?})", info.name, info.backend);
    Ok(adapter)
}

async fn request_device(
    adapter: &wgpu::Adapter,
) -> Result<(wgpu::Device, wgpu::Queue), RenderContextError> {
    // WebGL2 limits keep the browser build working on every backend.
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("inkflow device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                .using_resolution(adapter.limits()),
            ..Default::default()
        })
        .await
        .map_err(RenderContextError::DeviceRequest)
}
