use std::ops::ControlFlow;
use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{RetouchError, RetouchResult};
use crate::ops::registry::OperationRegistry;
use crate::ops::{OptionsMap, Operation};
use crate::render::backend::Renderer;

/// Serialized form of a [`Pipeline`].
///
/// ```json
/// {"operations": [{"operation": "flip", "options": {"horizontal": true}}]}
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineDef {
    /// Steps in render order.
    #[serde(default)]
    pub operations: Vec<OperationDef>,
}

/// One step of a [`PipelineDef`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationDef {
    /// Registered operation identifier.
    pub operation: String,
    /// Operation options. Missing options take their defaults.
    #[serde(default)]
    pub options: OptionsMap,
}

impl PipelineDef {
    /// Parse a pipeline definition from JSON.
    pub fn from_json_str(json: &str) -> RetouchResult<Self> {
        serde_json::from_str(json).map_err(|e| RetouchError::serde(e.to_string()))
    }

    /// Read and parse a pipeline definition from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> RetouchResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read pipeline JSON from '{}'", path.display()))?;
        Self::from_json_str(&json)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Rendering stats for one [`Pipeline::render_with`] call.
pub struct RenderStats {
    /// Operations in the pipeline.
    pub steps_total: usize,
    /// Operations that ran to completion.
    pub steps_rendered: usize,
    /// `true` when the caller stopped the run before every step was rendered.
    pub cancelled: bool,
}

/// The step about to render, passed to the [`Pipeline::render_with`] callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// Zero-based position in the pipeline.
    pub index: usize,
    /// Identifier of the operation at `index`.
    pub identifier: &'static str,
}

/// Ordered operations rendered in sequence against one renderer.
///
/// Each operation mutates the renderer's live surface in place; that surface is the input of
/// the next operation.
#[derive(Debug, Default)]
pub struct Pipeline {
    operations: Vec<Box<dyn Operation>>,
}

impl Pipeline {
    /// Empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every step of `def` through `registry`.
    pub fn from_def(def: &PipelineDef, registry: &OperationRegistry) -> RetouchResult<Self> {
        let operations = def
            .operations
            .iter()
            .map(|step| registry.create(&step.operation, &step.options))
            .collect::<RetouchResult<Vec<_>>>()?;
        Ok(Self { operations })
    }

    /// Parse JSON and build it through `registry`.
    pub fn from_json_str(json: &str, registry: &OperationRegistry) -> RetouchResult<Self> {
        Self::from_def(&PipelineDef::from_json_str(json)?, registry)
    }

    /// Append an operation.
    pub fn push(&mut self, operation: impl Operation + 'static) {
        self.operations.push(Box::new(operation));
    }

    /// Return the pipeline with `operation` appended.
    pub fn with(mut self, operation: impl Operation + 'static) -> Self {
        self.push(operation);
        self
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the pipeline has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Operations in render order.
    pub fn operations(&self) -> impl Iterator<Item = &dyn Operation> {
        self.operations.iter().map(|op| op.as_ref())
    }

    /// Render every operation in order. The first error stops the run and is returned.
    pub fn render(&self, renderer: &mut Renderer) -> RetouchResult<RenderStats> {
        self.render_with(renderer, |_| ControlFlow::Continue(()))
    }

    /// Render like [`Pipeline::render`], asking `before_step` whether to go on before each
    /// operation. Returning [`ControlFlow::Break`] stops the run; operations already rendered
    /// keep their effect on the surface.
    #[tracing::instrument(skip(self, renderer, before_step), fields(steps = self.len(), backend = renderer.identifier()))]
    pub fn render_with(
        &self,
        renderer: &mut Renderer,
        mut before_step: impl FnMut(Step) -> ControlFlow<()>,
    ) -> RetouchResult<RenderStats> {
        let mut stats = RenderStats {
            steps_total: self.len(),
            ..RenderStats::default()
        };
        for (index, op) in self.operations.iter().enumerate() {
            let step = Step {
                index,
                identifier: op.identifier(),
            };
            if before_step(step).is_break() {
                tracing::debug!(index, operation = step.identifier, "pipeline cancelled");
                stats.cancelled = true;
                break;
            }
            op.render(renderer)?;
            stats.steps_rendered += 1;
        }
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
