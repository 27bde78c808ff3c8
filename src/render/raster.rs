use std::ops::{Deref, DerefMut};

use crate::foundation::core::Point;
use crate::foundation::math::{premul_over_px, premul_scale_px};
use crate::render::context::{CompositeMode, DrawingContext};
use crate::render::surface::{Snapshot, Surface};

/// CPU renderer modelled on a 2D canvas: one live surface plus a drawing context.
#[derive(Debug)]
pub struct RasterRenderer {
    surface: Surface,
    ctx: DrawingContext,
}

impl RasterRenderer {
    /// Create a raster renderer that owns `surface`.
    pub fn new(surface: Surface) -> Self {
        Self {
            surface,
            ctx: DrawingContext::new(),
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

    /// The drawing context.
    pub fn context(&self) -> &DrawingContext {
        &self.ctx
    }

    /// The drawing context, mutably.
    pub fn context_mut(&mut self) -> &mut DrawingContext {
        &mut self.ctx
    }

    /// Take an immutable copy of the live surface.
    pub fn clone_surface(&self) -> Snapshot {
        Snapshot::capture(&self.surface)
    }

    /// Save the drawing state and return a guard that restores it when dropped.
    ///
    /// State changes made through the guard never outlive it, including when the caller
    /// returns early with an error.
    pub fn save_state(&mut self) -> StateGuard<'_> {
        let depth = self.ctx.depth();
        self.ctx.save();
        StateGuard {
            renderer: self,
            depth,
        }
    }

    /// Draw `image` with its top-left corner at `(dx, dy)` in user space.
    ///
    /// Each destination pixel centre is mapped back through the current transform and sampled
    /// nearest-neighbour from the image. A non-invertible transform draws nothing.
    pub fn draw_image(&mut self, image: &Snapshot, dx: f64, dy: f64) {
        let state = self.ctx.state();
        let t = state.transform;
        if t.determinant() == 0.0 || !t.is_finite() {
            return;
        }
        let inv = t.inverse();
        let alpha = (state.global_alpha * 255.0).round().clamp(0.0, 255.0) as u16;
        let src = image.surface();
        let (sw, sh) = (f64::from(src.width()), f64::from(src.height()));

        for y in 0..self.surface.height() {
            for x in 0..self.surface.width() {
                let p = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let (u, v) = (p.x - dx, p.y - dy);
                if u < 0.0 || v < 0.0 || u >= sw || v >= sh {
                    continue;
                }
                let sp = premul_scale_px(src.px(u.floor() as i64, v.floor() as i64), alpha);
                let d = self.surface.px_mut(x, y);
                let out = match state.composite {
                    CompositeMode::Copy => sp,
                    CompositeMode::SourceOver => premul_over_px([d[0], d[1], d[2], d[3]], sp),
                };
                d.copy_from_slice(&out);
            }
        }
    }
}

/// Scoped drawing state. Restores the state saved by [`RasterRenderer::save_state`] on drop,
/// discarding any saves made inside the scope that were never restored.
pub struct StateGuard<'a> {
    renderer: &'a mut RasterRenderer,
    depth: usize,
}

impl Deref for StateGuard<'_> {
    type Target = RasterRenderer;

    fn deref(&self) -> &Self::Target {
        self.renderer
    }
}

impl DerefMut for StateGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.renderer
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        self.renderer.ctx.restore_to(self.depth);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
