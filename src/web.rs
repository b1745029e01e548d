//! Browser entry point.
//!
//! Renders the sketch on `<canvas id="inkflow">` with the default options,
//! driven by `requestAnimationFrame`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::driver::FrameDriver;
use crate::error::InkflowError;
use crate::gpu::render_context::RenderContext;
use crate::options::Options;
use crate::renderer::GpuBackend;
use crate::util::frame_timing::FrameClock;

/// Id of the canvas element the sketch draws into.
pub const CANVAS_ID: &str = "inkflow";

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Install logging, then start rendering asynchronously.
///
/// # Errors
///
/// Fails if the page has no `<canvas id="inkflow">`.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .ok_or("canvas not found")?
        .dyn_into::<web_sys::HtmlCanvasElement>()?;

    wasm_bindgen_futures::spawn_local(async move {
        match create_driver(canvas).await {
            Ok(driver) => run_loop(driver),
            Err(e) => log::error!("failed to start: {e}"),
        }
    });
    Ok(())
}

async fn create_driver(
    canvas: web_sys::HtmlCanvasElement,
) -> Result<FrameDriver<GpuBackend>, InkflowError> {
    let options = Options::default();
    let size = (canvas.width().max(1), canvas.height().max(1));
    let context = RenderContext::new(wgpu::SurfaceTarget::Canvas(canvas), size).await?;
    let backend = GpuBackend::new(context, &options)?;
    Ok(FrameDriver::new(backend, &options))
}

fn request_frame(callback: &FrameCallback) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Some(closure) = callback.borrow().as_ref() {
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {e:?}");
        }
    }
}

fn run_loop(mut driver: FrameDriver<GpuBackend>) {
    let display = Options::default().display;
    let mut clock = FrameClock::new(display.target_fps, display.max_frame_delta);

    // The closure re-schedules itself through its own slot.
    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let next = callback.clone();
    *callback.borrow_mut() = Some(Closure::new(move || {
        if clock.should_render() {
            let (time, dt) = clock.tick();
            if let Err(e) = driver.tick(time, dt) {
                driver.backend_mut().recover(&e);
            }
        }
        request_frame(&next);
    }));
    request_frame(&callback);
}
