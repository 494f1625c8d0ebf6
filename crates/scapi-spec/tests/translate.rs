use scapi_parse::parse_str;
use scapi_spec::{translate, ApiSpec, ObjectType, PathError, TranslateError, Translator, Type};

fn lower(src: &str) -> Result<ApiSpec, TranslateError> {
    translate(&parse_str("<test>", src).unwrap())
}

#[test]
fn primitives_always_present() {
    let api = lower("api Empty").unwrap();
    for name in ["string", "integer", "float", "boolean"] {
        assert!(matches!(api.types.get(name), Some(Type::Primitive(_))), "{name}");
    }
    assert!(api.endpoints.is_empty());
}

#[test]
fn user_type_named_like_a_primitive_is_rejected() {
    // primitive names are keywords in the grammar, so build the table directly
    let mut types = indexmap::IndexMap::new();
    types.insert("float".to_string(), Type::Object(ObjectType::default()));
    let err = ApiSpec::new("T", "localhost", types, vec![]).unwrap_err();
    assert_eq!(err, TranslateError::PrimitiveCollision { name: "float".into() });
    assert!(err.to_string().contains("collides with the built-in primitive"));
}

#[test]
fn endpoint_without_blocks_has_no_input() {
    let api = lower("api T endpoint GET /ping Ping { responses { 204 string } }").unwrap();
    assert!(api.endpoints[0].input.is_none());
}

#[test]
fn empty_params_block_still_creates_input() {
    let api =
        lower("api T endpoint GET /ping Ping { params { } responses { 204 string } }").unwrap();
    let input = api.endpoints[0].input.as_ref().unwrap();
    assert!(input.params.is_empty() && input.query.is_empty() && input.body.is_none());
}

#[test]
fn duplicate_type_is_rejected() {
    let err = lower("api T type A { } type A { }").unwrap_err();
    assert_eq!(err, TranslateError::DuplicateType { name: "A".into() });
}

#[test]
fn duplicate_field_is_rejected() {
    let err = lower("api T type A { x: string x: integer }").unwrap_err();
    assert_eq!(
        err,
        TranslateError::DuplicateField {
            owner: "type A".into(),
            field: "x".into(),
        }
    );
    let err = lower("api T endpoint GET /q Q { query { a: string a: string } responses { } }")
        .unwrap_err();
    assert!(err.to_string().contains("endpoint Q query declares field a"));
}

#[test]
fn duplicate_endpoint_is_rejected() {
    let src = "api T endpoint GET /a A { responses { } } endpoint POST /b A { responses { } }";
    assert_eq!(
        lower(src).unwrap_err(),
        TranslateError::DuplicateEndpoint { name: "A".into() }
    );
}

#[test]
fn bad_path_template_is_reported_with_endpoint() {
    let err = lower("api T endpoint GET /users/{id GetUser { responses { } }").unwrap_err();
    match err {
        TranslateError::InvalidPath { endpoint, source } => {
            assert_eq!(endpoint, "GetUser");
            assert!(matches!(source, PathError::Unterminated { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn custom_base_url_is_normalized() {
    let spec = parse_str("<test>", "api T").unwrap();
    let api = Translator::new()
        .with_base_url("https://api.example.com/v1")
        .translate(&spec)
        .unwrap();
    assert_eq!(api.base_url, "https://api.example.com/v1/");
    api.validate().unwrap();
}

#[test]
fn references_are_copied_without_resolution() {
    let api = lower("api T type A { missing: Nowhere }").unwrap();
    let Some(Type::Object(a)) = api.types.get("A") else {
        panic!("A should be an object");
    };
    assert_eq!(a.fields["missing"].type_ref.name, "Nowhere");
}
