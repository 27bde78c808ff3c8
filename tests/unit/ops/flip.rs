use super::*;
use crate::foundation::core::Rgba8Premul;
use crate::render::backend::{BackendKind, RenderSettings, Renderer, create_renderer};

const BACKENDS: [BackendKind; 2] = [BackendKind::ShaderBased, BackendKind::Raster2D];

/// 3x2 surface whose pixels are all distinct, one of them translucent.
fn pattern() -> Surface {
    let mut s = Surface::new(3, 2).unwrap();
    let mut v = 10u8;
    for y in 0..2 {
        for x in 0..3 {
            s.set_pixel(x, y, Rgba8Premul::from_straight_rgba(v, v + 1, v + 2, 255));
            v += 30;
        }
    }
    s.set_pixel(2, 1, Rgba8Premul::from_straight_rgba(200, 100, 50, 128));
    s
}

fn renderer(backend: BackendKind) -> Renderer {
    create_renderer(pattern(), &RenderSettings::default().with_backend(backend)).unwrap()
}

fn flip(h: bool, v: bool) -> FlipOperation {
    FlipOperation::new(FlipOptions::default().with_horizontal(h).with_vertical(v))
}

fn expected(h: bool, v: bool) -> Surface {
    let src = pattern();
    let mut out = Surface::new(3, 2).unwrap();
    for y in 0..2 {
        for x in 0..3 {
            let sx = if h { 2 - x } else { x };
            let sy = if v { 1 - y } else { y };
            out.set_pixel(x, y, src.pixel(sx, sy));
        }
    }
    out
}

#[test]
fn mirrors_pixels_on_both_backends() {
    for backend in BACKENDS {
        for (h, v) in [(true, false), (false, true), (true, true)] {
            let mut r = renderer(backend);
            flip(h, v).render(&mut r).unwrap();
            assert_eq!(r.surface(), &expected(h, v), "{backend:?} h={h} v={v}");
        }
    }
}

#[test]
fn identity_flip_leaves_surface_unchanged() {
    for backend in BACKENDS {
        let mut r = renderer(backend);
        flip(false, false).render(&mut r).unwrap();
        assert_eq!(r.surface(), &pattern());
    }
}

#[test]
fn flipping_twice_restores_the_original() {
    for backend in BACKENDS {
        let mut r = renderer(backend);
        let op = flip(true, true);
        op.render(&mut r).unwrap();
        op.render(&mut r).unwrap();
        assert_eq!(r.surface(), &pattern());
    }
}

#[test]
fn raster_path_restores_drawing_state() {
    let mut r = RasterRenderer::new(pattern());
    let before = r.context().state();
    flip(true, false).render_raster(&mut r).unwrap();
    assert_eq!(r.context().state(), before);
    assert_eq!(r.context().depth(), 0);
}

#[test]
fn shader_path_binds_both_flags() {
    let u = flip(true, false).uniforms();
    assert!(u.get_bool("flip_horizontal"));
    assert!(!u.get_bool("flip_vertical"));
    assert_eq!(u.len(), 2);
}

#[test]
fn affine_maps_the_surface_onto_itself() {
    let a = FlipOptions::default().with_horizontal(true).affine(10, 4);
    let p = a * kurbo::Point::new(3.0, 1.0);
    assert_eq!((p.x, p.y), (7.0, 1.0));

    let a = FlipOptions::default().with_vertical(true).affine(10, 4);
    let p = a * kurbo::Point::new(3.0, 1.0);
    assert_eq!((p.x, p.y), (3.0, 3.0));

    assert_eq!(FlipOptions::default().affine(10, 4), Affine::IDENTITY);
}

#[test]
fn options_parse_with_defaults() {
    let map: OptionsMap = serde_json::from_str(r#"{"horizontal": true, "angle": 90}"#).unwrap();
    let o = FlipOptions::from_options(&map).unwrap();
    assert_eq!(o, FlipOptions { horizontal: true, vertical: false });
    assert!(FlipOptions::default().is_identity());

    let map: OptionsMap = serde_json::from_str(r#"{"vertical": 1}"#).unwrap();
    assert!(matches!(
        FlipOptions::from_options(&map),
        Err(RetouchError::Validation(_))
    ));
}

#[test]
fn construction_requires_a_shader_program() {
    let err = FlipOperation::from_options(&OptionsMap::new(), None).unwrap_err();
    assert!(matches!(err, RetouchError::MissingShaderProgram("flip")));

    let op = FlipOperation::from_options(&OptionsMap::new(), Some(flip_shader())).unwrap();
    assert_eq!(op.identifier(), "flip");
    assert_eq!(op.shader_program(), Some(&flip_shader()));
    assert!(op.options().is_identity());
}

#[test]
fn one_pixel_surface_is_a_fixed_point() {
    let px = Rgba8Premul::from_straight_rgba(1, 2, 3, 4);
    for backend in BACKENDS {
        let s = Surface::filled(1, 1, px).unwrap();
        let mut r = create_renderer(s, &RenderSettings::default().with_backend(backend)).unwrap();
        flip(true, true).render(&mut r).unwrap();
        assert_eq!(r.surface().pixel(0, 0), px);
    }
}
