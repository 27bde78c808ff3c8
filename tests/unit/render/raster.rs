use super::*;
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{RetouchError, RetouchResult};

fn gradient(w: u32, h: u32) -> Surface {
    let mut s = Surface::new(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            s.set_pixel(
                x,
                y,
                Rgba8Premul::from_straight_rgba((x * 40) as u8, (y * 40) as u8, 7, 255),
            );
        }
    }
    s
}

#[test]
fn draw_image_identity_copies_pixels() {
    let src = gradient(4, 3);
    let mut r = RasterRenderer::new(Surface::new(4, 3).unwrap());
    let snap = Snapshot::capture(&src);
    r.draw_image(&snap, 0.0, 0.0);
    assert_eq!(r.surface(), &src);
}

#[test]
fn draw_image_respects_offset() {
    let src = gradient(2, 2);
    let mut r = RasterRenderer::new(Surface::new(4, 4).unwrap());
    r.draw_image(&Snapshot::capture(&src), 2.0, 1.0);
    assert_eq!(r.surface().pixel(0, 0), Rgba8Premul::transparent());
    assert_eq!(r.surface().pixel(2, 1), src.pixel(0, 0));
    assert_eq!(r.surface().pixel(3, 2), src.pixel(1, 1));
    assert_eq!(r.surface().pixel(1, 3), Rgba8Premul::transparent());
}

#[test]
fn global_alpha_zero_draws_nothing() {
    let src = gradient(2, 2);
    let mut r = RasterRenderer::new(Surface::new(2, 2).unwrap());
    r.context_mut().set_global_alpha(0.0);
    r.draw_image(&Snapshot::capture(&src), 0.0, 0.0);
    assert_eq!(r.surface().fingerprint(), Surface::new(2, 2).unwrap().fingerprint());
}

#[test]
fn copy_mode_replaces_instead_of_blending() {
    let half = Rgba8Premul::from_straight_rgba(255, 255, 255, 128);
    let src = Surface::filled(1, 1, half).unwrap();
    let base = Rgba8Premul::from_straight_rgba(0, 0, 255, 255);

    let mut over = RasterRenderer::new(Surface::filled(1, 1, base).unwrap());
    over.draw_image(&Snapshot::capture(&src), 0.0, 0.0);
    assert_eq!(over.surface().pixel(0, 0).a, 255);

    let mut copy = RasterRenderer::new(Surface::filled(1, 1, base).unwrap());
    copy.context_mut().set_composite(CompositeMode::Copy);
    copy.draw_image(&Snapshot::capture(&src), 0.0, 0.0);
    assert_eq!(copy.surface().pixel(0, 0), half);
}

#[test]
fn degenerate_transform_draws_nothing() {
    let src = gradient(2, 2);
    let mut r = RasterRenderer::new(Surface::new(2, 2).unwrap());
    r.context_mut().scale(0.0, 1.0);
    r.draw_image(&Snapshot::capture(&src), 0.0, 0.0);
    assert!(r.surface().data().iter().all(|&b| b == 0));
}

#[test]
fn state_guard_restores_on_scope_exit() {
    let mut r = RasterRenderer::new(Surface::new(2, 2).unwrap());
    {
        let mut g = r.save_state();
        g.context_mut().translate(2.0, 0.0);
        g.context_mut().scale(-1.0, 1.0);
        assert_eq!(g.context().depth(), 1);
    }
    assert_eq!(r.context().depth(), 0);
    assert_eq!(r.context().state().transform, crate::foundation::core::Affine::IDENTITY);
}

#[test]
fn state_guard_restores_on_error_path() {
    fn failing(r: &mut RasterRenderer) -> RetouchResult<()> {
        let mut g = r.save_state();
        g.context_mut().scale(-1.0, -1.0);
        Err(RetouchError::validation("bail out mid-draw"))
    }

    let mut r = RasterRenderer::new(Surface::new(2, 2).unwrap());
    assert!(failing(&mut r).is_err());
    assert_eq!(r.context().depth(), 0);
    assert_eq!(r.context().state().transform, crate::foundation::core::Affine::IDENTITY);
}

#[test]
fn state_guard_discards_unbalanced_inner_saves() {
    let mut r = RasterRenderer::new(Surface::new(2, 2).unwrap());
    r.context_mut().set_global_alpha(0.25);
    let outer = r.context().state();
    {
        let mut g = r.save_state();
        g.context_mut().translate(5.0, 0.0);
        g.context_mut().save();
        g.context_mut().set_composite(CompositeMode::Copy);
        g.context_mut().save();
        assert_eq!(g.context().depth(), 3);
    }
    assert_eq!(r.context().depth(), 0);
    assert_eq!(r.context().state(), outer);
}

#[test]
fn nested_guards_unwind_to_their_own_level() {
    let mut r = RasterRenderer::new(Surface::new(2, 2).unwrap());
    let mut outer = r.save_state();
    outer.context_mut().translate(1.0, 0.0);
    let translated = outer.context().state();
    {
        let mut inner = outer.save_state();
        inner.context_mut().scale(2.0, 2.0);
        inner.context_mut().save();
    }
    assert_eq!(outer.context().depth(), 1);
    assert_eq!(outer.context().state(), translated);
    drop(outer);
    assert_eq!(r.context().depth(), 0);
}
