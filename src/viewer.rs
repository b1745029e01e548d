//! Standalone window backed by winit.
//!
//! ```no_run
//! # use inkflow::Viewer;
//! Viewer::builder()
//!     .with_preset("assets/presets/ember.toml")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    driver::FrameDriver, error::InkflowError, gpu::render_context::RenderContext,
    options::Options, renderer::GpuBackend, util::frame_timing::FrameClock,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    preset: Option<PathBuf>,
    options: Option<Options>,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            preset: None,
            options: None,
        }
    }

    /// Load options from a TOML preset when the viewer starts.
    #[must_use]
    pub fn with_preset(mut self, path: impl Into<PathBuf>) -> Self {
        self.preset = Some(path.into());
        self
    }

    /// Use these options directly. Takes precedence over a preset.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            preset: self.preset,
            options: self.options,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window that runs the ink sketch until closed.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    preset: Option<PathBuf>,
    options: Option<Options>,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns the preset's load error, or [`InkflowError::Viewer`] if the
    /// event loop cannot be created or fails.
    pub fn run(self) -> Result<(), InkflowError> {
        let options = match (self.options, self.preset) {
            (Some(options), _) => {
                options.validate()?;
                options
            }
            (None, Some(path)) => Options::load(&path)?,
            (None, None) => Options::default(),
        };

        let event_loop = EventLoop::new().map_err(|e| InkflowError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            driver: None,
            clock: FrameClock::new(options.display.target_fps, options.display.max_frame_delta),
            options,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| InkflowError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    driver: Option<FrameDriver<GpuBackend>>,
    clock: FrameClock,
    options: Options,
}

fn surface_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    fn create_driver(&self, window: Arc<Window>) -> Result<FrameDriver<GpuBackend>, InkflowError> {
        let size = surface_size(window.inner_size());
        let context = pollster::block_on(RenderContext::new(window, size))?;
        let backend = GpuBackend::new(context, &self.options)?;
        Ok(FrameDriver::new(backend, &self.options))
    }

    fn redraw(&mut self) {
        let (Some(window), Some(driver)) = (&self.window, &mut self.driver) else {
            return;
        };
        if self.clock.should_render() {
            let (time, dt) = self.clock.tick();
            if let Err(e) = driver.tick(time, dt) {
                driver.backend_mut().recover(&e);
            }
        }
        window.request_redraw();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let display = &self.options.display;
        let attrs = Window::default_attributes()
            .with_title(&display.title)
            .with_inner_size(winit::dpi::LogicalSize::new(display.width, display.height));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let driver = match self.create_driver(window.clone()) {
            Ok(driver) => driver,
            Err(e) => {
                log::error!("Failed to initialize renderer: {e}");
                event_loop.exit();
                return;
            }
        };

        window.request_redraw();
        self.window = Some(window);
        self.driver = Some(driver);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(driver) = &mut self.driver {
                    let (width, height) = surface_size(size);
                    driver.backend_mut().resize(width, height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}
