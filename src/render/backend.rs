use crate::foundation::error::RetouchResult;
use crate::render::raster::RasterRenderer;
use crate::render::shader::ShaderDevice;
use crate::render::shading::ShaderRenderer;
use crate::render::software::SoftwareShaderDevice;
use crate::render::surface::{Snapshot, Surface};

/// Available backend kinds. The set is closed: operations match on it exhaustively.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Operations run as shader programs on a [`ShaderDevice`].
    ShaderBased,
    /// Operations draw through a 2D raster context on the CPU.
    #[default]
    #[serde(rename = "raster2d")]
    Raster2D,
}

impl BackendKind {
    /// Stable string identifier of the backend.
    pub fn identifier(self) -> &'static str {
        match self {
            Self::ShaderBased => "shader",
            Self::Raster2D => "raster2d",
        }
    }
}

/// Which device a [`BackendKind::ShaderBased`] renderer executes on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderDeviceKind {
    /// CPU kernels standing in for the built-in shader programs.
    #[default]
    Software,
    /// Real GPU execution through `wgpu` (requires the `gpu` feature).
    Wgpu,
}

/// Backend selection declared by the caller. Nothing is auto-detected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Backend the renderer is built for.
    pub backend: BackendKind,
    /// Device used when `backend` is [`BackendKind::ShaderBased`].
    pub shader_device: ShaderDeviceKind,
}

impl RenderSettings {
    /// Return settings with a different backend.
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Return settings with a different shader device.
    pub fn with_shader_device(mut self, device: ShaderDeviceKind) -> Self {
        self.shader_device = device;
        self
    }
}

/// The backend-specific execution context that owns the live drawing surface.
#[derive(Debug)]
pub enum Renderer {
    /// Shader-based backend.
    Shader(ShaderRenderer),
    /// 2D raster backend.
    Raster(RasterRenderer),
}

impl Renderer {
    /// Raster renderer over `surface`.
    pub fn raster(surface: Surface) -> Self {
        Self::Raster(RasterRenderer::new(surface))
    }

    /// Shader renderer over `surface` executing on `device`.
    pub fn shader(surface: Surface, device: Box<dyn ShaderDevice>) -> Self {
        Self::Shader(ShaderRenderer::new(surface, device))
    }

    /// Backend this renderer was constructed with.
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Shader(_) => BackendKind::ShaderBased,
            Self::Raster(_) => BackendKind::Raster2D,
        }
    }

    /// Stable string identifier of the backend.
    pub fn identifier(&self) -> &'static str {
        self.kind().identifier()
    }

    /// The live surface.
    pub fn surface(&self) -> &Surface {
        match self {
            Self::Shader(r) => r.surface(),
            Self::Raster(r) => r.surface(),
        }
    }

    /// The live surface, mutably.
    pub fn surface_mut(&mut self) -> &mut Surface {
        match self {
            Self::Shader(r) => r.surface_mut(),
            Self::Raster(r) => r.surface_mut(),
        }
    }

    /// Take an immutable copy of the live surface.
    pub fn clone_surface(&self) -> Snapshot {
        Snapshot::capture(self.surface())
    }

    /// Consume the renderer and return its surface.
    pub fn into_surface(self) -> Surface {
        match self {
            Self::Shader(r) => r.into_surface(),
            Self::Raster(r) => r.into_surface(),
        }
    }
}

/// Create a renderer over `surface` for the backend declared in `settings`.
pub fn create_renderer(surface: Surface, settings: &RenderSettings) -> RetouchResult<Renderer> {
    match settings.backend {
        BackendKind::Raster2D => Ok(Renderer::raster(surface)),
        BackendKind::ShaderBased => {
            let device = create_shader_device(settings.shader_device)?;
            Ok(Renderer::shader(surface, device))
        }
    }
}

fn create_shader_device(kind: ShaderDeviceKind) -> RetouchResult<Box<dyn ShaderDevice>> {
    match kind {
        ShaderDeviceKind::Software => Ok(Box::new(SoftwareShaderDevice::with_builtin_kernels())),
        #[cfg(feature = "gpu")]
        ShaderDeviceKind::Wgpu => Ok(Box::new(crate::render::gpu::WgpuShaderDevice::new()?)),
        #[cfg(not(feature = "gpu"))]
        ShaderDeviceKind::Wgpu => Err(crate::foundation::error::RetouchError::validation(
            "wgpu shader device requires the `gpu` feature",
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
