use super::*;

fn opts(json: &str) -> OptionsMap {
    serde_json::from_str(json).unwrap()
}

#[test]
fn builtins_include_flip_with_its_shader() {
    let reg = OperationRegistry::default();
    assert!(reg.contains("flip"));
    assert_eq!(reg.identifiers().collect::<Vec<_>>(), vec!["flip"]);
    assert_eq!(reg.shader("flip"), Some(&flip_shader()));
}

#[test]
fn create_builds_from_options() {
    let reg = OperationRegistry::with_builtins();
    let op = reg.create("flip", &opts(r#"{"vertical": true}"#)).unwrap();
    assert_eq!(op.identifier(), "flip");
    assert_eq!(op.shader_program(), Some(&flip_shader()));
    let debug = format!("{op:?}");
    assert!(debug.contains("vertical: true"), "{debug}");
}

#[test]
fn unknown_identifier_is_a_validation_error() {
    let reg = OperationRegistry::with_builtins();
    let err = reg.create("crop", &OptionsMap::new()).unwrap_err();
    assert!(matches!(err, RetouchError::Validation(_)));
    assert!(err.to_string().contains("crop"));
    assert!(OperationRegistry::empty().create("flip", &OptionsMap::new()).is_err());
}

#[test]
fn removing_the_shader_makes_construction_fail() {
    let mut reg = OperationRegistry::with_builtins();
    assert_eq!(reg.remove_shader("flip"), Some(flip_shader()));
    assert!(reg.remove_shader("flip").is_none());
    let err = reg.create("flip", &OptionsMap::new()).unwrap_err();
    assert!(matches!(err, RetouchError::MissingShaderProgram("flip")));
}

#[test]
fn overridden_shader_reaches_new_operations() {
    let mut reg = OperationRegistry::with_builtins();
    let custom = ShaderSource::new("// custom flip");
    reg.set_shader("flip", custom.clone()).unwrap();
    let op = reg.create("flip", &OptionsMap::new()).unwrap();
    assert_eq!(op.shader_program(), Some(&custom));

    assert!(reg.set_shader("crop", custom).is_err());
}

#[test]
fn register_replaces_existing_entries() {
    fn ignore_options(
        _: &OptionsMap,
        shader: Option<ShaderSource>,
    ) -> RetouchResult<Box<dyn Operation>> {
        Ok(Box::new(FlipOperation::from_options(&OptionsMap::new(), shader)?))
    }

    let mut reg = OperationRegistry::empty();
    reg.register("flip", None, ignore_options);
    assert!(matches!(
        reg.create("flip", &OptionsMap::new()),
        Err(RetouchError::MissingShaderProgram(_))
    ));
    reg.register("flip", Some(flip_shader()), ignore_options);
    assert!(reg.create("flip", &OptionsMap::new()).is_ok());
}
