use super::*;
use std::io::Cursor;
use tempfile::TempDir;

fn args(argv: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("flowstrip").chain(argv.iter().copied()))
        .unwrap_or_else(|err| panic!("bad arguments: {err}"))
}

struct Run {
    status: i32,
    stdout: String,
    stderr: String,
}

fn run_with_stdin(args: &CliArgs, stdin: &str) -> Run {
    let mut output = Vec::new();
    let mut diagnostics = Vec::new();
    let status = run(
        args,
        &mut Cursor::new(stdin.as_bytes()),
        &mut output,
        &mut diagnostics,
        false,
    )
    .expect("run");
    Run {
        status,
        stdout: String::from_utf8(output).expect("utf-8"),
        stderr: String::from_utf8(diagnostics).expect("utf-8"),
    }
}

#[test]
fn test_parses_flags() {
    let parsed = args(&[
        "--source-file-name",
        "a.js",
        "--source-map-name",
        "a.out.js",
        "--map-file",
        "a.out.js.map",
        "input.js",
    ]);
    assert_eq!(parsed.input, Some(PathBuf::from("input.js")));
    assert_eq!(parsed.source_file_name.as_deref(), Some("a.js"));
    assert_eq!(parsed.source_map_name.as_deref(), Some("a.out.js"));
    assert_eq!(parsed.map_file, Some(PathBuf::from("a.out.js.map")));
    assert!(parsed.config.is_none());
}

#[test]
fn test_flags_override_config_file() {
    let dir = TempDir::new().expect("temp dir");
    let config = dir.path().join("flowstrip.json");
    std::fs::write(
        &config,
        r#"{"sourceFileName": "from-config.js", "sourceMapName": "config.out.js"}"#,
    )
    .expect("write config");
    let config = config.to_string_lossy().into_owned();

    let options = args(&["--config", config.as_str()]).compile_options().expect("options");
    assert_eq!(options.source_file_name.as_deref(), Some("from-config.js"));
    assert_eq!(options.source_map_name.as_deref(), Some("config.out.js"));

    let options = args(&["--config", config.as_str(), "--source-file-name", "flag.js"])
        .compile_options()
        .expect("options");
    assert_eq!(options.source_file_name.as_deref(), Some("flag.js"));
    assert_eq!(options.source_map_name.as_deref(), Some("config.out.js"));
}

#[test]
fn test_defaults_come_from_paths() {
    let options = args(&["--map-file", "out/bundle.js.map", "src/input.js"])
        .compile_options()
        .expect("options");
    assert_eq!(
        options.source_file_name,
        Some(PathBuf::from("src/input.js").display().to_string())
    );
    assert_eq!(options.source_map_name.as_deref(), Some("bundle.js"));

    assert_eq!(args(&[]).compile_options().expect("options"), CompileOptions::default());
}

#[test]
fn test_bad_config_files_are_errors() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("missing.json").to_string_lossy().into_owned();
    let err = args(&["--config", missing.as_str()]).compile_options().expect_err("missing");
    assert!(err.to_string().starts_with("failed to read config file"));

    let unknown = dir.path().join("unknown.json");
    std::fs::write(&unknown, r#"{"target": "es5"}"#).expect("write config");
    let unknown = unknown.to_string_lossy().into_owned();
    let err = args(&["--config", unknown.as_str()]).compile_options().expect_err("unknown key");
    assert!(err.to_string().starts_with("invalid config file"));
}

#[test]
fn test_strips_standard_input() {
    let result = run_with_stdin(&args(&[]), "var a: number = 1;\n");
    assert_eq!(result.status, EXIT_SUCCESS);
    assert_eq!(result.stdout, "var a = 1;\n");
    assert!(result.stderr.is_empty());
}

#[test]
fn test_parse_error_exit_code() {
    let result = run_with_stdin(&args(&[]), "var x = (y: number);");
    assert_eq!(result.status, EXIT_DIAGNOSTICS);
    assert!(result.stdout.is_empty());
    assert!(
        result
            .stderr
            .starts_with("source.js:1:11 - error FS9003: Type cast expressions are not supported."),
        "{}",
        result.stderr
    );
}

#[test]
fn test_reads_input_file_and_writes_map() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("in.js");
    std::fs::write(&input, "function f(x: number): number { return x; }\n").expect("write input");
    let map_file = dir.path().join("out.js.map");

    let map_arg = map_file.to_string_lossy().into_owned();
    let input_arg = input.to_string_lossy().into_owned();
    let cli = args(&[
        "--source-file-name",
        "in.js",
        "--map-file",
        map_arg.as_str(),
        input_arg.as_str(),
    ]);
    let result = run_with_stdin(&cli, "ignored");
    assert_eq!(result.status, EXIT_SUCCESS);
    assert_eq!(result.stdout, "function f(x) { return x; }\n");

    let map: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&map_file).expect("map written"))
            .expect("map is JSON");
    assert_eq!(map["version"], 3);
    assert_eq!(map["file"], "out.js");
    assert_eq!(map["sources"], serde_json::json!(["in.js"]));
}

#[test]
fn test_missing_input_file_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("nope.js").to_string_lossy().into_owned();
    let err = run(
        &args(&[missing.as_str()]),
        &mut Cursor::new(Vec::new()),
        &mut Vec::new(),
        &mut Vec::new(),
        false,
    )
    .expect_err("missing input");
    assert!(err.to_string().starts_with("failed to read"));
}
