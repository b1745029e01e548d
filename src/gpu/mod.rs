//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, offscreen render targets,
//! full-screen pipeline helpers, and shader composition.

/// Shared wgpu boilerplate helpers for full-screen pass pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Offscreen render-target textures.
pub mod texture;
