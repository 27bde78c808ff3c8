use std::collections::HashMap;

use crate::foundation::error::{RetouchError, RetouchResult};
use crate::render::shader::{ProgramHandle, ShaderDevice, ShaderSource, Uniforms};
use crate::render::surface::Surface;

/// CPU stand-in for a fragment shader: returns the output pixel at `(x, y)`.
pub type FragmentKernel = fn(uniforms: &Uniforms, input: &Surface, x: u32, y: u32) -> [u8; 4];

/// Reference shader device that runs registered CPU kernels instead of GPU programs.
///
/// A kernel is registered against the exact shader text it stands in for. Compiling any other
/// source fails, so the software device only accepts programs it can execute faithfully.
#[derive(Default)]
pub struct SoftwareShaderDevice {
    kernels: HashMap<ShaderSource, FragmentKernel>,
    programs: Vec<FragmentKernel>,
}

impl SoftwareShaderDevice {
    /// Device with no kernels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Device with kernels for every built-in operation shader.
    pub fn with_builtin_kernels() -> Self {
        let mut dev = Self::new();
        for (source, kernel) in crate::ops::builtin_kernels() {
            dev.register_kernel(source, kernel);
        }
        dev
    }

    /// Register (or replace) the kernel that stands in for `source`.
    pub fn register_kernel(&mut self, source: ShaderSource, kernel: FragmentKernel) {
        self.kernels.insert(source, kernel);
    }

    /// Number of compiled programs.
    pub fn program_count(&self) -> usize {
        self.programs.len()
    }
}

impl ShaderDevice for SoftwareShaderDevice {
    fn name(&self) -> &'static str {
        "software"
    }

    fn compile(&mut self, source: &ShaderSource) -> RetouchResult<ProgramHandle> {
        let kernel = *self.kernels.get(source).ok_or_else(|| {
            RetouchError::shader_compile("software device has no kernel for this shader source")
        })?;
        let id = u32::try_from(self.programs.len())
            .map_err(|_| RetouchError::shader_compile("program id overflow"))?;
        self.programs.push(kernel);
        Ok(ProgramHandle(id))
    }

    fn run(
        &mut self,
        program: ProgramHandle,
        uniforms: &Uniforms,
        input: &Surface,
        output: &mut Surface,
    ) -> RetouchResult<()> {
        let kernel = *self
            .programs
            .get(program.0 as usize)
            .ok_or_else(|| RetouchError::validation(format!("unknown program {program:?}")))?;
        if !input.same_size(output) {
            return Err(RetouchError::validation(
                "software shader output must match input dimensions",
            ));
        }
        for y in 0..output.height() {
            for x in 0..output.width() {
                let px = kernel(uniforms, input, x, y);
                output.px_mut(x, y).copy_from_slice(&px);
            }
        }
        Ok(())
    }
}
