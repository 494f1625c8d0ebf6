//! CLI integration tests: these invoke the compiled `scapi` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const PETS: &str = r#"
// Pet store
api Pets

type Pet {
    id: integer
    name: string
    tags: [string]
}

type ApiError { message: string }

endpoint GET /pets/{id} GetPet {
    params { id: integer }
    responses { 200 Pet 404 ApiError }
}
"#;

fn scapi_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_scapi"))
}

fn write_source(dir: &Path, name: &str, src: &str) -> PathBuf {
    let file = dir.join(name);
    std::fs::write(&file, src).expect("write source");
    file
}

fn run(args: &[&str]) -> Output {
    scapi_bin().args(args).output().expect("run binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn validate_reports_success() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(dir.path(), "pets.scapi", PETS);

    let output = run(&["validate", file.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "Validation successful");
}

#[test]
fn validate_summary_lists_endpoints() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(dir.path(), "pets.scapi", PETS);

    let output = run(&["validate", "--summary", file.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("GetPet"), "{out}");
    assert!(out.contains("/pets/{id}"), "{out}");
}

#[test]
fn validate_json_dumps_model() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(dir.path(), "pets.scapi", PETS);

    let output = run(&[
        "validate",
        "--json",
        "--base-url",
        "https://api.example.com",
        file.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(json["name"], "Pets");
    assert_eq!(json["base_url"], "https://api.example.com/");
    assert_eq!(json["endpoints"][0]["name"], "GetPet");
}

#[test]
fn validate_rejects_path_param_mismatch() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let src = "api A type U { id: string } endpoint GET /u/{id} GetU { responses { 200 U } }";
    let file = write_source(dir.path(), "bad.scapi", src);

    let output = run(&["validate", file.to_str().unwrap()]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("validation failed"), "{err}");
    assert!(err.contains("id"), "{err}");
}

#[test]
fn parse_error_reports_line_and_column() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(dir.path(), "lex.scapi", "api A\ntype B {\n  x: @\n}");

    let output = run(&["validate", file.to_str().unwrap()]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("lex.scapi:3:6: parse error"), "{err}");
    assert!(err.contains("unexpected character '@'"), "{err}");
}

#[test]
fn generate_go_client_to_stdout() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(dir.path(), "pets.scapi", PETS);

    let output = run(&["generate", "go", "client", "--package", "pets", file.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("package pets"));
    assert!(out.contains("type Pet struct {"));
    assert!(out.contains("Tags []string `json:\"tags\"`"));
    assert!(out.contains(
        "func (c *Client) GetPet(ctx context.Context, input GetPetInput) (*Pet, error) {"
    ));
}

#[test]
fn generate_ts_server_to_file() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(dir.path(), "pets.scapi", PETS);
    let out_path = dir.path().join("server.ts");

    let output = run(&[
        "generate",
        "ts",
        "server",
        file.to_str().unwrap(),
        "-o",
        out_path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());

    let code = std::fs::read_to_string(&out_path).expect("read output");
    assert!(code.contains("export interface Pet {"));
    assert!(code.contains("tags: string[];"));
    assert!(code.contains("export interface PetsServer {"));
    assert!(!code.contains("PetsClient"));
}

#[test]
fn generate_fails_without_success_response() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let src = "api A type E { m: string } endpoint GET /x Missing { responses { 404 E } }";
    let file = write_source(dir.path(), "nosuccess.scapi", src);

    let output = run(&["generate", "go", "client", file.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Missing"), "{}", stderr(&output));
}

#[test]
fn parse_dumps_json_ast() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(dir.path(), "pets.scapi", PETS);

    let output = run(&["parse", "--format", "json", file.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(json["name"]["text"], "Pets");
    assert_eq!(json["declarations"].as_array().map(Vec::len), Some(3));
}

#[test]
fn oversized_source_is_rejected() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let mut src = String::from("api Big\n");
    while src.len() <= scapi_cli::MAX_SOURCE_SIZE {
        src.push_str("// padding padding padding padding padding padding padding\n");
    }
    let file = write_source(dir.path(), "big.scapi", &src);

    let output = run(&["validate", file.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("exceeds 1MB limit"), "{}", stderr(&output));
}

#[test]
fn verbose_logs_pipeline_stages() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(dir.path(), "pets.scapi", PETS);

    let output = run(&["--verbose", "validate", file.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("tokenized source"), "{}", stderr(&output));
}
