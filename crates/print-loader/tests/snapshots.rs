//! Snapshot tests for generated printing modules.
//!
//! These tests pin the exact text of the generated module and source map.

use print_loader::{transform, ResourceIdentity};

fn transform_in_proj(path: &str, source: &str) -> print_loader::TransformResult {
    transform(source, &ResourceIdentity::new(path, "/proj")).expect("transform")
}

#[test]
fn test_stylesheet_module() {
    let result = transform_in_proj("/proj/app/style/main.scss", "body{\n  background:yellow;\n}");
    insta::assert_snapshot!(result.code, @r#"
exports.print = function(){

  console.log("body{");
  console.log("  background:yellow;");
  console.log("}");
}
"#);
}

#[test]
fn test_stylesheet_source_map() {
    let result = transform_in_proj("/proj/app/style/main.scss", "body{\n  background:yellow;\n}");
    insta::assert_snapshot!(result.source_map.to_json_pretty().unwrap(), @r#"
{
  "version": 3,
  "file": "/proj/app/style/main.scss",
  "sources": [
    "app/style/main.scss"
  ],
  "sourcesContent": [
    "body{\n  background:yellow;\n}"
  ],
  "names": [],
  "mappings": ";;EAAA;EACA;EACA",
  "sourceRoot": ""
}
"#);
}

#[test]
fn test_quotes_backslashes_and_carriage_returns() {
    let result = transform_in_proj("/proj/notes.txt", "He said \"hi\"\n\tC:\\temp\\x\r\n");
    insta::assert_snapshot!(result.code, @r#"
exports.print = function(){

  console.log("He said \"hi\"");
  console.log("\tC:\\temp\\x\r");
  console.log("");
}
"#);
}

#[test]
fn test_empty_source() {
    let result = transform_in_proj("/proj/empty.txt", "");
    insta::assert_snapshot!(result.code, @r#"
exports.print = function(){

  console.log("");
}
"#);
}
