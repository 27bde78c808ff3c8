use crate::foundation::core::Affine;
use crate::foundation::error::{RetouchError, RetouchResult};
use crate::ops::{OptionsMap, Operation, parse_options};
use crate::render::context::CompositeMode;
use crate::render::raster::RasterRenderer;
use crate::render::shader::{ShaderSource, UniformValue, Uniforms};
use crate::render::shading::ShaderRenderer;
use crate::render::surface::Surface;

/// Identifier of [`FlipOperation`].
pub const FLIP: &str = "flip";

const FLIP_WGSL: &str = r#"
struct FlipParams {
  flip_vertical: u32,
  flip_horizontal: u32,
};

@group(0) @binding(0) var t_src: texture_2d<f32>;
@group(0) @binding(1) var<uniform> params: FlipParams;

@fragment
fn fs(in: VsOut) -> @location(0) vec4<f32> {
  let size = vec2<i32>(textureDimensions(t_src));
  var p = vec2<i32>(floor(in.pos.xy));
  if (params.flip_vertical != 0u) {
    p.y = size.y - 1 - p.y;
  }
  if (params.flip_horizontal != 0u) {
    p.x = size.x - 1 - p.x;
  }
  return textureLoad(t_src, p, 0);
}
"#;

const U_FLIP_VERTICAL: &str = "flip_vertical";
const U_FLIP_HORIZONTAL: &str = "flip_horizontal";

/// The built-in flip fragment program (WGSL).
pub fn flip_shader() -> ShaderSource {
    ShaderSource::from(FLIP_WGSL)
}

/// Software kernel equivalent of [`flip_shader`].
pub(crate) fn flip_kernel(uniforms: &Uniforms, input: &Surface, x: u32, y: u32) -> [u8; 4] {
    let sx = if uniforms.get_bool(U_FLIP_HORIZONTAL) {
        input.width() - 1 - x
    } else {
        x
    };
    let sy = if uniforms.get_bool(U_FLIP_VERTICAL) {
        input.height() - 1 - y
    } else {
        y
    };
    input.px(i64::from(sx), i64::from(sy))
}

/// Options for [`FlipOperation`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FlipOptions {
    /// Mirror left to right.
    pub horizontal: bool,
    /// Mirror top to bottom.
    pub vertical: bool,
}

impl FlipOptions {
    const KEYS: &'static [&'static str] = &["horizontal", "vertical"];

    /// Parse from an options map. Unknown keys are ignored.
    pub fn from_options(options: &OptionsMap) -> RetouchResult<Self> {
        parse_options(FLIP, Self::KEYS, options)
    }

    /// Return options with `horizontal` set.
    pub fn with_horizontal(mut self, horizontal: bool) -> Self {
        self.horizontal = horizontal;
        self
    }

    /// Return options with `vertical` set.
    pub fn with_vertical(mut self, vertical: bool) -> Self {
        self.vertical = vertical;
        self
    }

    /// Whether neither axis is flipped.
    pub fn is_identity(self) -> bool {
        !self.horizontal && !self.vertical
    }

    /// Mirror transform for a `width` x `height` surface.
    ///
    /// `-1` scale on each flipped axis, with a translation by the surface extent on that axis.
    pub fn affine(self, width: u32, height: u32) -> Affine {
        let (sx, tx) = if self.horizontal {
            (-1.0, f64::from(width))
        } else {
            (1.0, 0.0)
        };
        let (sy, ty) = if self.vertical {
            (-1.0, f64::from(height))
        } else {
            (1.0, 0.0)
        };
        Affine::translate((tx, ty)) * Affine::scale_non_uniform(sx, sy)
    }
}

/// Mirrors the surface horizontally and/or vertically.
#[derive(Clone, Debug)]
pub struct FlipOperation {
    options: FlipOptions,
    program: ShaderSource,
}

impl FlipOperation {
    /// Flip with the built-in shader program.
    pub fn new(options: FlipOptions) -> Self {
        Self {
            options,
            program: flip_shader(),
        }
    }

    /// Build from an options map and an explicit shader program.
    ///
    /// Flip is shader-capable, so a missing program is a construction error.
    pub fn from_options(options: &OptionsMap, program: Option<ShaderSource>) -> RetouchResult<Self> {
        let program = program.ok_or(RetouchError::MissingShaderProgram(FLIP))?;
        Ok(Self {
            options: FlipOptions::from_options(options)?,
            program,
        })
    }

    /// The resolved options.
    pub fn options(&self) -> FlipOptions {
        self.options
    }

    fn uniforms(&self) -> Uniforms {
        Uniforms::new()
            .with(U_FLIP_VERTICAL, UniformValue::Bool(self.options.vertical))
            .with(U_FLIP_HORIZONTAL, UniformValue::Bool(self.options.horizontal))
    }
}

impl Operation for FlipOperation {
    fn identifier(&self) -> &'static str {
        FLIP
    }

    fn shader_program(&self) -> Option<&ShaderSource> {
        Some(&self.program)
    }

    fn render_shader(&self, renderer: &mut ShaderRenderer) -> RetouchResult<()> {
        renderer.run_shader(None, &self.program, &self.uniforms())
    }

    fn render_raster(&self, renderer: &mut RasterRenderer) -> RetouchResult<()> {
        if self.options.is_identity() {
            return Ok(());
        }
        let (w, h) = (renderer.surface().width(), renderer.surface().height());
        let snapshot = renderer.clone_surface();

        let mut scope = renderer.save_state();
        let ctx = scope.context_mut();
        ctx.transform(self.options.affine(w, h));
        ctx.set_composite(CompositeMode::Copy);
        scope.draw_image(&snapshot, 0.0, 0.0);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/flip.rs"]
mod tests;
