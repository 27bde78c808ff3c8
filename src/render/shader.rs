use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::foundation::error::RetouchResult;
use crate::render::surface::Surface;

/// Immutable shader source text. Renderers key compiled programs by this text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShaderSource(Arc<str>);

impl ShaderSource {
    /// Wrap shader text.
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        Self(source.into())
    }

    /// Borrow the source text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for ShaderSource {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

/// A single uniform value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    /// Uploaded as `u32` (0 or 1); WGSL has no host-shareable `bool`.
    Bool(bool),
    /// `f32`.
    Float(f32),
    /// `vec2<f32>`.
    Vec2([f32; 2]),
    /// `vec4<f32>`.
    Vec4([f32; 4]),
}

impl UniformValue {
    fn align(self) -> usize {
        match self {
            Self::Bool(_) | Self::Float(_) => 4,
            Self::Vec2(_) => 8,
            Self::Vec4(_) => 16,
        }
    }
}

/// Ordered uniform values for one shader invocation.
///
/// Order matters: [`Uniforms::to_bytes`] packs values in insertion order, which must match the
/// member order of the shader's uniform struct.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Uniforms {
    entries: SmallVec<[(Cow<'static, str>, UniformValue); 4]>,
}

impl Uniforms {
    /// Empty uniform set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append or replace a value, builder style.
    pub fn with(mut self, name: impl Into<Cow<'static, str>>, value: UniformValue) -> Self {
        self.set(name, value);
        self
    }

    /// Append a value, or replace it in place if the name already exists.
    pub fn set(&mut self, name: impl Into<Cow<'static, str>>, value: UniformValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look a value up by name.
    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Look a boolean up by name. Missing or non-boolean values read as `false`.
    pub fn get_bool(&self, name: &str) -> bool {
        matches!(self.get(name), Some(UniformValue::Bool(true)))
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no values are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, UniformValue)> {
        self.entries.iter().map(|(n, v)| (n.as_ref(), *v))
    }

    /// Pack values with WGSL uniform alignment; the result is at least 16 bytes and a
    /// multiple of 16.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(16);
        for (_, v) in &self.entries {
            let align = v.align();
            out.resize(out.len().next_multiple_of(align), 0);
            match *v {
                UniformValue::Bool(b) => out.extend_from_slice(&u32::from(b).to_le_bytes()),
                UniformValue::Float(f) => out.extend_from_slice(&f.to_le_bytes()),
                UniformValue::Vec2(xs) => xs
                    .iter()
                    .for_each(|f| out.extend_from_slice(&f.to_le_bytes())),
                UniformValue::Vec4(xs) => xs
                    .iter()
                    .for_each(|f| out.extend_from_slice(&f.to_le_bytes())),
            }
        }
        let len = out.len().max(16).next_multiple_of(16);
        out.resize(len, 0);
        out
    }
}

/// Device-local id of a compiled program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// Executes shader programs against surfaces.
///
/// Devices own their compiled programs; the renderer only holds handles and never compiles the
/// same source twice.
pub trait ShaderDevice {
    /// Short device name used in logs.
    fn name(&self) -> &'static str;

    /// Compile `source` into a program owned by this device.
    fn compile(&mut self, source: &ShaderSource) -> RetouchResult<ProgramHandle>;

    /// Run `program` reading `input` and writing every pixel of `output`.
    fn run(
        &mut self,
        program: ProgramHandle,
        uniforms: &Uniforms,
        input: &Surface,
        output: &mut Surface,
    ) -> RetouchResult<()>;
}

/// Cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgramCacheStats {
    /// Programs compiled by the device.
    pub compiles: u64,
    /// Lookups answered from the cache.
    pub hits: u64,
}

/// Compiled-program cache keyed by shader source text.
#[derive(Debug, Default)]
pub(crate) struct ProgramCache {
    by_source: HashMap<ShaderSource, ProgramHandle>,
    stats: ProgramCacheStats,
}

impl ProgramCache {
    pub(crate) fn stats(&self) -> ProgramCacheStats {
        self.stats
    }

    pub(crate) fn len(&self) -> usize {
        self.by_source.len()
    }

    pub(crate) fn get_or_compile(
        &mut self,
        device: &mut dyn ShaderDevice,
        source: &ShaderSource,
    ) -> RetouchResult<ProgramHandle> {
        if let Some(&h) = self.by_source.get(source) {
            self.stats.hits = self.stats.hits.saturating_add(1);
            return Ok(h);
        }
        let h = device.compile(source)?;
        tracing::debug!(
            device = device.name(),
            program = h.0,
            bytes = source.as_str().len(),
            "compiled shader program"
        );
        self.by_source.insert(source.clone(), h);
        self.stats.compiles = self.stats.compiles.saturating_add(1);
        Ok(h)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/shader.rs"]
mod tests;
