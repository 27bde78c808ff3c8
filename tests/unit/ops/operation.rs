use super::*;
use crate::foundation::core::Rgba8Premul;
use crate::render::backend::{RenderSettings, create_renderer};
use crate::render::surface::Surface;

/// Raster-only: paints the surface opaque white.
#[derive(Debug)]
struct Whiteout;

impl Operation for Whiteout {
    fn identifier(&self) -> &'static str {
        "whiteout"
    }

    fn render_raster(&self, renderer: &mut RasterRenderer) -> RetouchResult<()> {
        renderer
            .surface_mut()
            .fill(Rgba8Premul::from_straight_rgba(255, 255, 255, 255));
        Ok(())
    }
}

/// Implements neither path.
#[derive(Debug)]
struct Inert;

impl Operation for Inert {
    fn identifier(&self) -> &'static str {
        "inert"
    }
}

fn settings(backend: BackendKind) -> RenderSettings {
    RenderSettings::default().with_backend(backend)
}

fn surface() -> Surface {
    Surface::filled(2, 2, Rgba8Premul::from_straight_rgba(9, 8, 7, 255)).unwrap()
}

#[test]
fn render_dispatches_to_the_raster_path() {
    let mut r = create_renderer(surface(), &settings(BackendKind::Raster2D)).unwrap();
    Whiteout.render(&mut r).unwrap();
    assert_eq!(r.surface().pixel(1, 1).r, 255);
}

#[test]
fn missing_path_is_unsupported_and_surface_untouched() {
    let mut r = create_renderer(surface(), &settings(BackendKind::ShaderBased)).unwrap();
    let err = Whiteout.render(&mut r).unwrap_err();
    assert!(matches!(
        err,
        RetouchError::UnsupportedBackend {
            operation: "whiteout",
            backend: BackendKind::ShaderBased
        }
    ));
    assert_eq!(r.surface(), &surface());
}

#[test]
fn operation_without_paths_fails_on_both_backends() {
    for backend in [BackendKind::ShaderBased, BackendKind::Raster2D] {
        let mut r = create_renderer(surface(), &settings(backend)).unwrap();
        match Inert.render(&mut r) {
            Err(RetouchError::UnsupportedBackend { backend: b, .. }) => assert_eq!(b, backend),
            other => panic!("expected unsupported backend, got {other:?}"),
        }
    }
    assert!(Inert.shader_program().is_none());
}

#[derive(Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
struct Knobs {
    amount: f64,
    enabled: bool,
}

fn options(json: &str) -> OptionsMap {
    serde_json::from_str(json).unwrap()
}

#[test]
fn parse_options_fills_defaults_and_ignores_unknown_keys() {
    let k: Knobs = parse_options("knobs", &["amount", "enabled"], &options(r#"{"amount": 0.5, "color": "red"}"#)).unwrap();
    assert_eq!(k, Knobs { amount: 0.5, enabled: false });

    let k: Knobs = parse_options("knobs", &["amount", "enabled"], &OptionsMap::new()).unwrap();
    assert_eq!(k, Knobs::default());
}

#[test]
fn parse_options_rejects_wrong_types() {
    let err = parse_options::<Knobs>("knobs", &["amount", "enabled"], &options(r#"{"enabled": "yes"}"#))
        .unwrap_err();
    assert!(matches!(err, RetouchError::Validation(_)));
    assert!(err.to_string().contains("knobs"));
}

#[test]
fn builtin_kernels_are_keyed_by_exact_source() {
    let kernels = builtin_kernels();
    assert_eq!(kernels.len(), 1);
    assert_eq!(kernels[0].0, flip::flip_shader());
}
