// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Tests may unwrap
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! Noise-advected ink feedback sketch rendered with chained wgpu passes.
//!
//! Every frame, a handful of orbiting radial blobs are drawn into a seed
//! buffer; a spread pass then blurs the previous frame's ink, pushes it
//! along a drifting Perlin flow field, lets it decay, and adds the fresh
//! seed on top. The result feeds back into the next frame through a
//! ping-pong buffer pair and is composited onto the window.
//!
//! # Key entry points
//!
//! - [`FrameDriver`] - runs one tick: noise, seed, spread, swap, present
//! - [`GpuBackend`] - the wgpu renderer
//! - [`CpuBackend`] - the same pipeline on `f32` images, no GPU needed
//! - [`Options`] - blob layout, spread tuning, noise, display (TOML presets)
//! - `Viewer` - a winit window running the sketch (`viewer` feature)

pub mod driver;
pub mod error;
pub mod gpu;
pub mod noise;
pub mod options;
pub mod params;
pub mod raster;
pub mod renderer;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use driver::{DriverState, FrameBackend, FrameDriver, PingPong};
pub use error::InkflowError;
pub use gpu::render_context::{RenderContext, RenderContextError};
pub use noise::NoiseSource;
pub use options::Options;
pub use params::{Blob, CompositeParams, SeedParams, SpreadParams};
pub use raster::CpuBackend;
pub use renderer::GpuBackend;
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
