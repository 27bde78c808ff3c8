use crate::foundation::error::{RetouchError, RetouchResult};
use crate::render::shader::{
    ProgramCache, ProgramCacheStats, ShaderDevice, ShaderSource, Uniforms,
};
use crate::render::surface::{Snapshot, Surface};

/// Shader-based renderer: one live surface, a device, and a program cache.
pub struct ShaderRenderer {
    surface: Surface,
    device: Box<dyn ShaderDevice>,
    cache: ProgramCache,
}

impl ShaderRenderer {
    /// Create a shader renderer that owns `surface` and executes on `device`.
    pub fn new(surface: Surface, device: Box<dyn ShaderDevice>) -> Self {
        Self {
            surface,
            device,
            cache: ProgramCache::default(),
        }
    }

    /// The live surface.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The live surface, mutably.
    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Consume the renderer and return its surface.
    pub fn into_surface(self) -> Surface {
        self.surface
    }

    /// The device programs run on.
    pub fn device_mut(&mut self) -> &mut dyn ShaderDevice {
        self.device.as_mut()
    }

    /// Program cache counters.
    pub fn cache_stats(&self) -> ProgramCacheStats {
        self.cache.stats()
    }

    /// Take an immutable copy of the live surface.
    pub fn clone_surface(&self) -> Snapshot {
        Snapshot::capture(&self.surface)
    }

    /// Run `source` against the live surface.
    ///
    /// The result is written into `target`, or back into the live surface when `target` is
    /// `None`. The program is compiled at most once per distinct source text; `uniforms` are
    /// bound fresh on every call.
    pub fn run_shader(
        &mut self,
        target: Option<&mut Surface>,
        source: &ShaderSource,
        uniforms: &Uniforms,
    ) -> RetouchResult<()> {
        let program = self.cache.get_or_compile(self.device.as_mut(), source)?;
        match target {
            Some(out) => {
                if !out.same_size(&self.surface) {
                    return Err(RetouchError::validation(format!(
                        "shader target is {}x{}, live surface is {}x{}",
                        out.width(),
                        out.height(),
                        self.surface.width(),
                        self.surface.height()
                    )));
                }
                self.device.run(program, uniforms, &self.surface, out)
            }
            None => {
                let input = self.surface.clone();
                self.device.run(program, uniforms, &input, &mut self.surface)
            }
        }
    }
}

impl std::fmt::Debug for ShaderRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderRenderer")
            .field("width", &self.surface.width())
            .field("height", &self.surface.height())
            .field("device", &self.device.name())
            .field("programs", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/shading.rs"]
mod tests;
