use display_tree::AsTree;
use serde_json::json;
use shift_reduce::grammars::json::{self, JsonReader};

#[test]
fn documents() {
    let mut reader = JsonReader::new().unwrap();

    let source = r#"
        {
            "name": "shift-reduce",
            "version": [0, 1, 0],
            "stable": false,
            "license": null,
            "nested": {"empty": {}, "list": [[], [{}], -2.5]}
        }
    "#;
    assert_eq!(
        reader.read(source),
        Ok(json!({
            "name": "shift-reduce",
            "version": [0, 1, 0],
            "stable": false,
            "license": null,
            "nested": {"empty": {}, "list": [[], [{}], -2.5]}
        }))
    );
}

#[test]
fn later_keys_win() {
    let mut reader = JsonReader::new().unwrap();
    assert_eq!(reader.read(r#"{"a": 1, "a": 2}"#), Ok(json!({"a": 2})));
}

#[test]
fn keys_are_only_strings() {
    let mut reader = JsonReader::new().unwrap();
    assert!(reader.read(r#"{1: 2}"#).is_err());
    assert!(reader.read(r#"["a": 2]"#).is_err());
    assert!(reader.read(r#""a": 2"#).is_err());
}

#[test]
fn agrees_with_serde_json() {
    let mut reader = JsonReader::new().unwrap();
    for source in [
        "[1, 2.5, -3e2, true, null, \"\\u00e9\\t\"]",
        r#"{"a": {"b": {"c": [1, {"d": []}]}}}"#,
        "  \"  spaced  \"  ",
    ] {
        let expected: serde_json::Value = serde_json::from_str(source).unwrap();
        assert_eq!(reader.read(source), Ok(expected), "{source}");
    }
}

#[test]
fn grammar_tree() {
    let grammar = json::grammar().unwrap();
    let tree = AsTree::new(&grammar).to_string();
    println!("{tree}");
    assert!(tree.contains("symbols: 16"), "{tree}");
    assert!(tree.contains("rules: 15"), "{tree}");
    assert!(tree.contains("pattern: properties , key value"), "{tree}");
}
