use scapi_ast::ast::Declaration;
use scapi_parse::parse_str;

#[test]
fn line_comments_and_ws_are_ignored() {
    let src = r#"
// leading comment
api Pets // inline
type Pet {
  // inside a block
  name: string
}
// tail"#;
    let spec = parse_str("<mem>", src).unwrap();
    assert_eq!(spec.name.text, "Pets");
    let Declaration::Type(pet) = &spec.declarations[0] else {
        panic!("expected type declaration");
    };
    assert_eq!(pet.fields.len(), 1);
}
