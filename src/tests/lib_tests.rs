use super::*;

fn strip(source: &str) -> String {
    compile(source, &CompileOptions::default())
        .unwrap_or_else(|err| panic!("compile failed: {err}"))
        .code
}

#[test]
fn test_scenarios() {
    assert_eq!(
        strip("function foo(param1: bool) { return param1; }"),
        "function foo(param1) { return param1; }"
    );
    assert_eq!(strip("var myNum:?number = 42;"), "var myNum = 42;");
    assert_eq!(
        strip("class Foo<T> { method1(param1) { return param1; } }"),
        "class Foo { method1(param1) { return param1; } }"
    );
    assert_eq!(
        strip("function foo(param1, ...rest): void { param1(); }"),
        "function foo(param1, ...rest) { param1(); }"
    );
    assert_eq!(
        strip("var {x, y}: {x: number; y: string} = {x: 42, y: \"hello\"};"),
        "var {x, y} = {x: 42, y: \"hello\"};"
    );
    assert_eq!(strip("class Foo { prop1: T; }"), "class Foo { }");
}

#[test]
fn test_transform_reports_stats() {
    let mut parsed = parse("type A = number;\nvar a: A = 1;", &ParseOptions::default()).expect("parse");
    let stats = transform(&mut parsed);
    assert_eq!(stats.nodes_deleted, 1);
    assert_eq!(stats.fields_cleared, 1);
    assert!(!transform(&mut parsed).changed());
}

#[test]
fn test_parse_errors_carry_the_file_name() {
    let options = CompileOptions {
        source_file_name: Some("cast.js".into()),
        source_map_name: None,
    };
    let err = compile("var x = (y: number);", &options).expect_err("type cast");
    assert!(matches!(err, CompileError::Parse(_)));
    assert_eq!(
        err.to_string(),
        "cast.js:1:11: Type cast expressions are not supported."
    );
}

#[test]
fn test_map_follows_options() {
    let options = CompileOptions {
        source_file_name: Some("a.js".into()),
        source_map_name: Some("a.out.js".into()),
    };
    let result = compile("var a: number = 1;", &options).expect("compile");
    let map = result.map.expect("map");
    assert_eq!(map.file.as_deref(), Some("a.out.js"));
    assert_eq!(map.sources, vec!["a.js".to_string()]);
    assert!(compile("var a;", &CompileOptions::default()).expect("compile").map.is_none());
}

#[test]
fn test_options_use_camel_case_keys() {
    let options: CompileOptions =
        serde_json::from_str(r#"{"sourceFileName": "a.js", "sourceMapName": "a.js.map"}"#)
            .expect("valid options");
    assert_eq!(options.source_file_name.as_deref(), Some("a.js"));
    assert_eq!(options.source_map_name.as_deref(), Some("a.js.map"));

    let empty: CompileOptions = serde_json::from_str("{}").expect("valid options");
    assert_eq!(empty, CompileOptions::default());

    assert!(serde_json::from_str::<CompileOptions>(r#"{"target": "es5"}"#).is_err());
}
