use crate::foundation::core::{Affine, Vec2};

/// How drawn pixels combine with the destination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompositeMode {
    /// Premultiplied source-over.
    #[default]
    SourceOver,
    /// Destination pixels covered by the source are replaced.
    Copy,
}

/// The save/restore-able part of a raster drawing context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawState {
    /// Current user-space to surface-space transform.
    pub transform: Affine,
    /// Multiplier applied to drawn pixels, `[0, 1]`.
    pub global_alpha: f32,
    /// Current composite mode.
    pub composite: CompositeMode,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            global_alpha: 1.0,
            composite: CompositeMode::SourceOver,
        }
    }
}

/// Drawing state for the raster backend.
///
/// Transform calls post-multiply the current transform, so the last call applies first to
/// drawn coordinates (`translate` then `scale` maps `p` to `T * S * p`).
#[derive(Clone, Debug, Default)]
pub struct DrawingContext {
    state: DrawState,
    stack: Vec<DrawState>,
}

impl DrawingContext {
    /// Fresh context with the identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> DrawState {
        self.state
    }

    /// Number of saved states.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Push the current state.
    pub fn save(&mut self) {
        self.stack.push(self.state);
    }

    /// Pop the most recently saved state. No-op on an empty stack.
    pub fn restore(&mut self) {
        if let Some(s) = self.stack.pop() {
            self.state = s;
        }
    }

    /// Unwind the stack to `depth` saved states, restoring the state saved at that level.
    /// No-op when the stack is already at or below `depth`.
    pub(crate) fn restore_to(&mut self, depth: usize) {
        if self.stack.len() > depth {
            self.stack.truncate(depth + 1);
            self.restore();
        }
    }

    /// Post-multiply a translation.
    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.state.transform = self.state.transform * Affine::translate(Vec2::new(tx, ty));
    }

    /// Post-multiply a non-uniform scale.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform = self.state.transform * Affine::scale_non_uniform(sx, sy);
    }

    /// Post-multiply an arbitrary affine.
    pub fn transform(&mut self, affine: Affine) {
        self.state.transform = self.state.transform * affine;
    }

    /// Replace the transform.
    pub fn set_transform(&mut self, affine: Affine) {
        self.state.transform = affine;
    }

    /// Set global alpha, clamped to `[0, 1]`. Non-finite values are ignored.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() {
            self.state.global_alpha = alpha.clamp(0.0, 1.0);
        }
    }

    /// Set the composite mode.
    pub fn set_composite(&mut self, mode: CompositeMode) {
        self.state.composite = mode;
    }
}
