use scapi_codegen::{CodegenError, Generator, Surface, TsGenerator};
use scapi_parse::parse_str;
use scapi_spec::{translate, ApiSpec, ResolveError, Translator};

const PETS: &str = r#"
api pets

type Pet {
    id: integer
    name: string
    tag?: string
    owner: Owner?
    tags: [string]
}

type Owner { name: string }
type ApiError { message: string }

endpoint GET /pets/{id} GetPet {
    params { id: integer }
    query { verbose?: boolean labels: [string] }
    responses { 200 Pet 404 ApiError }
}

endpoint PUT /pets/{id}/name Rename {
    params { id: integer }
    body string
    responses { 200 Pet }
}
"#;

fn compile(src: &str) -> ApiSpec {
    let api = translate(&parse_str("<test>", src).unwrap()).unwrap();
    api.validate().unwrap();
    api
}

#[test]
fn interfaces_mark_optional_and_nullable_fields() {
    let out = TsGenerator::new().generate_types(&compile(PETS)).unwrap();
    let expected = "export interface Pet {
  id: number;
  name: string;
  tag?: string;
  owner: Owner | null;
  tags: string[];
}
";
    assert!(out.starts_with(expected), "{out}");
    assert!(out.contains(
        "export interface GetPetQuery {\n  verbose?: boolean;\n  labels: string[];\n}"
    ));
    assert!(out.contains(
        "export interface RenameInput {\n  params: RenameParams;\n  body: string;\n}"
    ));
}

#[test]
fn server_interface_is_named_after_api() {
    let out = TsGenerator::new().generate_server(&compile(PETS)).unwrap();
    assert!(out.starts_with("export interface PetsServer {\n"));
    assert!(out.contains("  GetPet(input: GetPetInput, signal?: AbortSignal): Promise<Pet>;\n"));
}

#[test]
fn client_interpolates_path_components() {
    let out = TsGenerator::new().generate_client(&compile(PETS)).unwrap();
    assert!(out.contains("export class PetsClient {"));
    assert!(out.contains("async GetPet(input: GetPetInput, signal?: AbortSignal): Promise<Pet> {"));
    assert!(out.contains(
        "let url = `${this.baseURL}/pets/${encodeURIComponent(String(input.params.id))}`;"
    ));
    assert!(out.contains(
        "let url = `${this.baseURL}/pets/${encodeURIComponent(String(input.params.id))}/name`;"
    ));
    assert!(out.contains("if (input.query.verbose != null) {"));
    assert!(out.contains("query.append(\"verbose\", String(input.query.verbose));"));
    assert!(out.contains("for (const v of input.query.labels) {"));
    assert!(out.contains("query.append(\"labels\", v);"));
}

#[test]
fn client_sends_method_and_body() {
    let out = TsGenerator::new().generate_client(&compile(PETS)).unwrap();
    assert!(out.contains("method: \"GET\","));
    assert!(out.contains("method: \"PUT\","));
    assert!(out.contains("body: JSON.stringify(input.body),"));
    assert!(out.contains("return (await response.json()) as Pet;"));
    assert!(out.contains(
        "throw new HTTPError(response.status, (await response.json()) as ApiError);"
    ));
    assert!(out.contains("throw new Error(`unexpected status code: ${response.status}`);"));
}

#[test]
fn base_url_default_has_no_trailing_slash() {
    let spec = parse_str("<test>", PETS).unwrap();
    let api = Translator::new()
        .with_base_url("https://pets.example.com/v1")
        .translate(&spec)
        .unwrap();
    let out = TsGenerator::new().generate_client(&api).unwrap();
    assert!(out.contains("export const DEFAULT_BASE_URL = \"https://pets.example.com/v1\";"));
}

#[test]
fn file_starts_with_banner() {
    let out = TsGenerator::new()
        .generate_file(&compile(PETS), Surface::Client)
        .unwrap();
    assert!(out.starts_with("// Code generated by scapi from api pets. DO NOT EDIT.\n\n"));
    let types_at = out.find("export interface Pet").unwrap();
    assert!(types_at < out.find("export class HTTPError").unwrap());
}

#[test]
fn missing_success_response_is_an_error() {
    let src = "api A type E { m: string } endpoint GET /x OnlyMissing { responses { 404 E } }";
    let err = TsGenerator::new().generate_server(&compile(src)).unwrap_err();
    assert_eq!(
        err,
        CodegenError::Resolve(ResolveError::NoSuccessResponse {
            endpoint: "OnlyMissing".into()
        })
    );
}

#[test]
fn type_named_like_error_class_is_rejected() {
    let src = "api pets type HTTPError { m: string } \
        endpoint GET /x Get { responses { 200 HTTPError } }";
    let err = TsGenerator::new().generate_client(&compile(src)).unwrap_err();
    assert_eq!(
        err,
        CodegenError::NameCollision {
            name: "HTTPError".into(),
            first: "generated scaffolding".into(),
            second: "type HTTPError".into(),
        }
    );
}

#[test]
fn type_named_like_input_wrapper_is_rejected() {
    let src = "api pets type GetPetInput { id: integer } \
        endpoint GET /pets/{id} GetPet { params { id: integer } responses { 200 GetPetInput } }";
    let err = TsGenerator::new().generate_types(&compile(src)).unwrap_err();
    assert!(matches!(
        err,
        CodegenError::NameCollision { ref name, ref second, .. }
            if name == "GetPetInput" && second == "input wrapper of endpoint GetPet"
    ));
}

#[test]
fn interface_names_are_case_sensitive() {
    let src = "api pets type pet { x: string } type Pet { y: string }";
    let out = TsGenerator::new().generate_types(&compile(src)).unwrap();
    assert!(out.contains("export interface pet {"));
    assert!(out.contains("export interface Pet {"));
}

#[test]
fn endpoint_named_constructor_is_rejected() {
    let src = "api pets endpoint GET /x constructor { responses { 204 string } }";
    let err = TsGenerator::new().generate_client(&compile(src)).unwrap_err();
    assert!(matches!(err, CodegenError::NameCollision { ref name, .. } if name == "constructor"));
}

#[test]
fn absent_optional_body_sends_no_content_type() {
    let src = "api pets type P { x: string } \
        endpoint PATCH /p Touch { body P? responses { 200 P } }";
    let out = TsGenerator::new().generate_client(&compile(src)).unwrap();
    assert!(out.contains("...(input.body === undefined\n        ? {}\n        : {\n"), "{out}");
    assert!(out.contains(
        "          headers: { \"Content-Type\": \"application/json\" },\n          \
         body: JSON.stringify(input.body),\n        }),\n"
    ));
}
