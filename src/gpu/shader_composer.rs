use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage, ShaderType,
};

use crate::error::InkflowError;

/// Shared modules, registered in dependency order: (source, file_path).
const MODULES: &[(&str, &str)] = &[(
    include_str!("../../assets/shaders/modules/fullscreen.wgsl"),
    "modules/fullscreen.wgsl",
)];

/// Pass shaders addressable by asset path: (source, file_path).
const SHADERS: &[(&str, &str)] = &[
    (
        include_str!("../../assets/shaders/screen/seed.wgsl"),
        "screen/seed.wgsl",
    ),
    (
        include_str!("../../assets/shaders/screen/spread.wgsl"),
        "screen/spread.wgsl",
    ),
    (
        include_str!("../../assets/shaders/screen/composite.wgsl"),
        "screen/composite.wgsl",
    ),
];

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Pre-loads the shared WGSL modules at construction time. Pass shaders use
/// `#import inkflow::fullscreen` to pull in the full-screen triangle. The
/// composer produces `naga::Module` IR directly, skipping WGSL re-parse at
/// runtime.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Create a composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// Returns [`InkflowError::Shader`] if a shared module fails to parse.
    pub fn new() -> Result<Self, InkflowError> {
        let mut composer = Composer::default();

        for &(source, file_path) in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source,
                    file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    InkflowError::Shader(format!(
                        "failed to register shader module '{file_path}': {e:?}"
                    ))
                })?;
        }

        Ok(Self { composer })
    }

    /// Look up the embedded source of a pass shader by its asset path.
    pub fn source(path: &str) -> Option<&'static str> {
        SHADERS
            .iter()
            .find(|(_, file_path)| *file_path == path)
            .map(|(source, _)| *source)
    }

    /// Asset paths of every pass shader.
    pub fn shader_paths() -> impl Iterator<Item = &'static str> {
        SHADERS.iter().map(|(_, file_path)| *file_path)
    }

    /// Compose the pass shader at `path` into a `wgpu::ShaderModule` ready
    /// for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`InkflowError::Shader`] for an unknown path or a composition
    /// failure.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        path: &str,
    ) -> Result<wgpu::ShaderModule, InkflowError> {
        let naga_module = self.compose_naga(path)?;
        log::debug!("composed shader {path}");

        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose the pass shader at `path` into a `naga::Module` without
    /// creating a wgpu shader module. Useful for testing shader composition
    /// without a GPU device.
    ///
    /// # Errors
    ///
    /// Returns [`InkflowError::Shader`] for an unknown path or a composition
    /// failure.
    pub fn compose_naga(&mut self, path: &str) -> Result<naga::Module, InkflowError> {
        let source = Self::source(path)
            .ok_or_else(|| InkflowError::Shader(format!("unknown shader asset '{path}'")))?;
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path: path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| InkflowError::Shader(format!("failed to compose '{path}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for path in ShaderComposer::shader_paths() {
            let module = composer
                .compose_naga(path)
                .unwrap_or_else(|e| panic!("Shader '{}' failed to compose: {}", path, e));
            let entry_points: Vec<&str> =
                module.entry_points.iter().map(|ep| ep.name.as_str()).collect();
            assert!(entry_points.contains(&"vs_main"), "{path}: {entry_points:?}");
            assert!(entry_points.contains(&"fs_main"), "{path}: {entry_points:?}");
        }
    }

    #[test]
    fn unknown_shader_is_an_error() {
        let mut composer = ShaderComposer::new().unwrap();
        let err = composer.compose_naga("screen/missing.wgsl").unwrap_err();
        assert!(err.to_string().contains("unknown shader asset"));
    }
}
