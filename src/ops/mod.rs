//! Image operations and the contract every operation implements.

pub(crate) mod flip;
pub(crate) mod registry;

use serde::de::DeserializeOwned;

use crate::foundation::error::{RetouchError, RetouchResult};
use crate::render::backend::{BackendKind, Renderer};
use crate::render::raster::RasterRenderer;
use crate::render::shader::ShaderSource;
use crate::render::shading::ShaderRenderer;
use crate::render::software::FragmentKernel;

/// Caller-supplied option values, keyed by option name.
pub type OptionsMap = serde_json::Map<String, serde_json::Value>;

/// A unit of image transformation applied in place to a renderer's live surface.
///
/// [`Operation::render`] dispatches on the renderer variant. An operation that only overrides
/// one of `render_shader` / `render_raster` declares the other backend unsupported, and rendering
/// against it fails with [`RetouchError::UnsupportedBackend`].
pub trait Operation: std::fmt::Debug {
    /// Unique identifier used to look the operation up by name.
    fn identifier(&self) -> &'static str;

    /// Shader program used by the shader path, if the operation has one.
    fn shader_program(&self) -> Option<&ShaderSource> {
        None
    }

    /// Apply the operation to `renderer`'s live surface.
    fn render(&self, renderer: &mut Renderer) -> RetouchResult<()> {
        match renderer {
            Renderer::Shader(r) => self.render_shader(r),
            Renderer::Raster(r) => self.render_raster(r),
        }
    }

    /// Shader path.
    fn render_shader(&self, _renderer: &mut ShaderRenderer) -> RetouchResult<()> {
        Err(RetouchError::unsupported_backend(
            self.identifier(),
            BackendKind::ShaderBased,
        ))
    }

    /// Raster path.
    fn render_raster(&self, _renderer: &mut RasterRenderer) -> RetouchResult<()> {
        Err(RetouchError::unsupported_backend(
            self.identifier(),
            BackendKind::Raster2D,
        ))
    }
}

/// Parse an options map into an operation's config struct.
///
/// Declared keys missing from `options` take the struct's defaults; undeclared keys are ignored.
/// A declared key holding a value of the wrong type is a validation error.
pub(crate) fn parse_options<T: DeserializeOwned>(
    identifier: &'static str,
    declared: &[&str],
    options: &OptionsMap,
) -> RetouchResult<T> {
    for key in options.keys() {
        if !declared.contains(&key.as_str()) {
            tracing::debug!(operation = identifier, key = %key, "ignoring unknown option");
        }
    }
    let known: OptionsMap = options
        .iter()
        .filter(|(k, _)| declared.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    serde_json::from_value(serde_json::Value::Object(known))
        .map_err(|e| RetouchError::validation(format!("invalid {identifier} options: {e}")))
}

/// CPU kernels for every built-in shader program, used by the software shader device.
pub(crate) fn builtin_kernels() -> Vec<(ShaderSource, FragmentKernel)> {
    vec![(flip::flip_shader(), flip::flip_kernel as FragmentKernel)]
}

#[cfg(test)]
#[path = "../../tests/unit/ops/operation.rs"]
mod tests;
