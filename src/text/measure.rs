use std::borrow::Cow;
use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{RetouchError, RetouchResult};

/// Measures the rendered width of a string with the active font.
///
/// Must be deterministic for a fixed font state. Any `FnMut(&str) -> f64` is a measure.
pub trait TextMeasure {
    /// Rendered width of `text` in pixels.
    fn measure(&mut self, text: &str) -> f64;
}

impl<F: FnMut(&str) -> f64> TextMeasure for F {
    fn measure(&mut self, text: &str) -> f64 {
        self(text)
    }
}

/// Every `char` advances by the same width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasure {
    /// Advance per character, in pixels.
    pub advance: f64,
}

impl MonospaceMeasure {
    /// Monospace measure with the given per-character advance.
    pub fn new(advance: f64) -> Self {
        Self { advance }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&mut self, text: &str) -> f64 {
        text.chars().count() as f64 * self.advance
    }
}

/// Font-metrics-accurate widths from shaping with `parley`.
pub struct ParleyMeasure {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family: String,
    size_px: f32,
}

impl ParleyMeasure {
    /// Register `font_bytes` and measure with its first family at `size_px`.
    pub fn from_font_bytes(font_bytes: &[u8], size_px: f32) -> RetouchResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(RetouchError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            RetouchError::validation("no font families registered from font bytes")
        })?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| RetouchError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            size_px,
        })
    }

    /// Read a font file and measure with its first family at `size_px`.
    pub fn from_font_file(path: impl AsRef<Path>, size_px: f32) -> RetouchResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font bytes from '{}'", path.display()))?;
        Self::from_font_bytes(&bytes, size_px)
    }

    /// Family name resolved from the font bytes.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Font size in pixels.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }
}

impl TextMeasure for ParleyMeasure {
    fn measure(&mut self, text: &str) -> f64 {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        // Trailing spaces advance the pen too; `width()` would drop them.
        f64::from(layout.full_width())
    }
}

impl std::fmt::Debug for ParleyMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyMeasure")
            .field("family", &self.family)
            .field("size_px", &self.size_px)
            .finish_non_exhaustive()
    }
}
