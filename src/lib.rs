//! Retouch applies pipelines of image-editing operations to premultiplied RGBA8 surfaces.
//!
//! Each [`Operation`] is written once and rendered through either backend of a [`Renderer`]:
//!
//! - [`Renderer::Shader`]: fragment programs executed by a [`ShaderDevice`] (a CPU reference
//!   device, or `wgpu` with the `gpu` feature)
//! - [`Renderer::Raster`]: a 2D drawing context with transforms, composite modes and
//!   scoped state
//!
//! The backend is picked once, from [`RenderSettings`], when the renderer is created.
//! [`layout`] wraps text into lines that fit a pixel width for text overlays.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod ops;
/// Ordered operation pipelines and their JSON form.
pub mod pipeline;
pub(crate) mod render;
pub(crate) mod text;

pub use crate::foundation::core::{Affine, Point, Rgba8Premul, Vec2};
pub use crate::foundation::error::{RetouchError, RetouchResult};

pub use crate::ops::flip::{FLIP, FlipOperation, FlipOptions, flip_shader};
pub use crate::ops::registry::{OperationFactory, OperationRegistry};
pub use crate::ops::{Operation, OptionsMap};
pub use crate::pipeline::{OperationDef, Pipeline, PipelineDef, RenderStats, Step};
pub use crate::render::backend::{
    BackendKind, RenderSettings, Renderer, ShaderDeviceKind, create_renderer,
};
pub use crate::render::context::{CompositeMode, DrawState, DrawingContext};
#[cfg(feature = "gpu")]
pub use crate::render::gpu::WgpuShaderDevice;
pub use crate::render::raster::{RasterRenderer, StateGuard};
pub use crate::render::shader::{
    ProgramCacheStats, ProgramHandle, ShaderDevice, ShaderSource, UniformValue, Uniforms,
};
pub use crate::render::shading::ShaderRenderer;
pub use crate::render::software::{FragmentKernel, SoftwareShaderDevice};
pub use crate::render::surface::{Snapshot, Surface};
pub use crate::text::layout::{PARAGRAPH_SEPARATOR, WORD_SEPARATOR, WordSplit, layout, split_word};
pub use crate::text::measure::{MonospaceMeasure, ParleyMeasure, TextMeasure};
