use indexmap::IndexMap;
use scapi_spec::{
    ApiSpec, Endpoint, Field, HttpMethod, InputShape, PathTemplate, RefSite, Response, Type,
    ValidationError,
};

fn endpoint(path: &str, params: &[(&str, Field)], responses: Vec<Response>) -> Endpoint {
    Endpoint {
        name: "Op".into(),
        method: HttpMethod::Get,
        path: PathTemplate::parse(path).unwrap(),
        input: if params.is_empty() {
            None
        } else {
            Some(InputShape {
                params: params.iter().map(|(n, f)| (n.to_string(), f.clone())).collect(),
                ..InputShape::default()
            })
        },
        responses,
    }
}

fn api(types: Vec<(&str, Type)>, endpoints: Vec<Endpoint>) -> ApiSpec {
    let types: IndexMap<String, Type> =
        types.into_iter().map(|(n, t)| (n.to_string(), t)).collect();
    ApiSpec::new("Test", "http://localhost:8080", types, endpoints).unwrap()
}

fn ok_responses() -> Vec<Response> {
    vec![Response::new(200, "string")]
}

#[test]
fn header_checks() {
    let mut a = api(vec![], vec![]);
    a.name.clear();
    assert_eq!(a.validate().unwrap_err(), ValidationError::EmptyName);

    let mut a = api(vec![], vec![]);
    a.base_url.clear();
    assert_eq!(a.validate().unwrap_err(), ValidationError::EmptyBaseUrl);

    let a = ApiSpec::new("T", "not a url", IndexMap::new(), vec![]).unwrap();
    let err = a.validate().unwrap_err();
    assert!(matches!(err, ValidationError::InvalidBaseUrl { .. }));
    assert!(err.to_string().starts_with("invalid API base URL not a url/"));
}

#[test]
fn unresolved_field_type() {
    let a = api(
        vec![("User", Type::object([("pet", Field::new("Pet"))]))],
        vec![],
    );
    let err = a.validate_types().unwrap_err();
    assert_eq!(
        err,
        ValidationError::UnresolvedType {
            name: "Pet".into(),
            site: RefSite::Field {
                ty: "User".into(),
                field: "pet".into(),
            },
        }
    );
    assert_eq!(
        err.to_string(),
        "unresolved type reference: Pet in field pet of type User"
    );
}

#[test]
fn nested_types_are_walked() {
    let a = api(
        vec![
            ("Outer", Type::object([("inner", Field::new("Inner"))])),
            ("Inner", Type::object([("list", Field::new("Names"))])),
            ("Names", Type::array("Name")),
        ],
        vec![],
    );
    let err = a.validate_types().unwrap_err();
    assert_eq!(
        err,
        ValidationError::UnresolvedType {
            name: "Name".into(),
            site: RefSite::ArrayElement { ty: "Names".into() },
        }
    );
}

#[test]
fn shared_types_are_not_recursion() {
    let a = api(
        vec![
            ("A", Type::object([("x", Field::new("C")), ("y", Field::new("C"))])),
            ("B", Type::object([("z", Field::new("C").multiple())])),
            ("C", Type::object([("n", Field::new("integer"))])),
        ],
        vec![],
    );
    a.validate_types().unwrap();
}

#[test]
fn self_reference_is_recursion() {
    let a = api(
        vec![("Node", Type::object([("next", Field::new("Node").optional())]))],
        vec![],
    );
    assert_eq!(
        a.validate_types().unwrap_err(),
        ValidationError::RecursiveType {
            cycle: vec!["Node".into(), "Node".into()],
        }
    );
}

#[test]
fn mutual_recursion_through_array_is_reported() {
    let a = api(
        vec![
            ("A", Type::object([("b", Field::new("B"))])),
            ("B", Type::object([("as", Field::new("As"))])),
            ("As", Type::array("A")),
        ],
        vec![],
    );
    let err = a.validate_types().unwrap_err();
    assert_eq!(err.to_string(), "recursive type: A -> B -> As -> A");
}

#[test]
fn params_cannot_be_optional_or_nullable() {
    let a = api(
        vec![],
        vec![endpoint("/x/{id}", &[("id", Field::new("string").optional())], ok_responses())],
    );
    assert_eq!(
        a.validate_endpoints().unwrap_err(),
        ValidationError::OptionalParam {
            endpoint: "Op".into(),
            param: "id".into(),
        }
    );

    let a = api(
        vec![],
        vec![endpoint("/x/{id}", &[("id", Field::new("string").nullable())], ok_responses())],
    );
    assert_eq!(
        a.validate_endpoints().unwrap_err(),
        ValidationError::NullableParam {
            endpoint: "Op".into(),
            param: "id".into(),
        }
    );
}

#[test]
fn unresolved_param_query_and_body() {
    let a = api(vec![], vec![endpoint("/x/{id}", &[("id", Field::new("Id"))], ok_responses())]);
    assert!(a.validate_endpoints().unwrap_err().to_string().contains("endpoint Op param id"));

    let mut ep = endpoint("/x", &[], ok_responses());
    ep.input = Some(InputShape {
        query: IndexMap::from([("q".to_string(), Field::new("Q"))]),
        ..InputShape::default()
    });
    let a = api(vec![], vec![ep]);
    assert!(a.validate_endpoints().unwrap_err().to_string().contains("endpoint Op query q"));

    let mut ep = endpoint("/x", &[], ok_responses());
    ep.input = Some(InputShape {
        body: Some(scapi_spec::TypeRef::new("Payload")),
        ..InputShape::default()
    });
    let a = api(vec![], vec![ep]);
    assert_eq!(
        a.validate_endpoints().unwrap_err().to_string(),
        "unresolved type reference: Payload in endpoint Op body"
    );
}

#[test]
fn response_rules() {
    let a = api(vec![], vec![endpoint("/x", &[], vec![])]);
    assert_eq!(
        a.validate_endpoints().unwrap_err(),
        ValidationError::NoResponses { endpoint: "Op".into() }
    );

    for code in [99, 600, 0] {
        let a = api(vec![], vec![endpoint("/x", &[], vec![Response::empty(code)])]);
        assert_eq!(
            a.validate_endpoints().unwrap_err(),
            ValidationError::InvalidResponseCode {
                endpoint: "Op".into(),
                code,
            }
        );
    }

    for code in [100, 599] {
        let a = api(vec![], vec![endpoint("/x", &[], vec![Response::empty(code)])]);
        a.validate_endpoints().unwrap();
    }

    let a = api(
        vec![],
        vec![endpoint("/x", &[], vec![Response::empty(204), Response::empty(204)])],
    );
    assert!(matches!(
        a.validate_endpoints().unwrap_err(),
        ValidationError::DuplicateResponseCode { code: 204, .. }
    ));

    let a = api(vec![], vec![endpoint("/x", &[], vec![Response::new(404, "Missing")])]);
    assert!(matches!(
        a.validate_endpoints().unwrap_err(),
        ValidationError::UnresolvedType {
            site: RefSite::Response { code: 404, .. },
            ..
        }
    ));
}

#[test]
fn path_params_must_match_declared_params() {
    // extra path parameter
    let params = [("id", Field::new("string"))];
    let a = api(vec![], vec![endpoint("/x/{id}/{sub}", &params, ok_responses())]);
    assert_eq!(
        a.validate_paths().unwrap_err(),
        ValidationError::UndeclaredPathParam {
            endpoint: "Op".into(),
            param: "sub".into(),
        }
    );

    // declared param missing from the path
    let a = api(
        vec![],
        vec![endpoint(
            "/x/{id}",
            &[("id", Field::new("string")), ("other", Field::new("integer"))],
            ok_responses(),
        )],
    );
    assert_eq!(
        a.validate_paths().unwrap_err(),
        ValidationError::ParamNotInPath {
            endpoint: "Op".into(),
            param: "other".into(),
            path: "/x/{id}".into(),
        }
    );

    // same set, different order
    let a = api(
        vec![],
        vec![endpoint(
            "/a/{x}/b/{y}",
            &[("y", Field::new("integer")), ("x", Field::new("string"))],
            ok_responses(),
        )],
    );
    a.validate_paths().unwrap();
}

#[test]
fn validation_does_not_mutate() {
    let a = api(
        vec![("User", Type::object([("id", Field::new("string"))]))],
        vec![endpoint("/u/{id}", &[("id", Field::new("string"))], ok_responses())],
    );
    let before = a.clone();
    a.validate().unwrap();
    assert_eq!(a, before);
}
