//! Independent compiles share nothing and can run on any thread.

use flowstrip::{CompileOptions, ParsedSource, compile};
use std::thread;

fn assert_send<T: Send>() {}

#[test]
fn test_parsed_source_is_send() {
    assert_send::<ParsedSource>();
    assert_send::<CompileOptions>();
}

#[test]
fn test_parallel_compiles_match_sequential() {
    let sources: Vec<String> = (0..8)
        .map(|i| format!("type T{i} = number;\nvar v{i}: T{i} = {i};\nfunction f{i}(x: T{i}): T{i} {{ return x; }}\n"))
        .collect();
    let expected: Vec<String> = sources
        .iter()
        .map(|source| {
            compile(source, &CompileOptions::default())
                .expect("compile")
                .code
        })
        .collect();

    let handles: Vec<_> = sources
        .iter()
        .cloned()
        .map(|source| {
            thread::spawn(move || {
                compile(&source, &CompileOptions::default())
                    .expect("compile")
                    .code
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let code = handle.join().expect("thread panicked");
        assert_eq!(code, expected[i]);
        assert_eq!(
            code,
            format!("var v{i} = {i};\nfunction f{i}(x) {{ return x; }}\n")
        );
    }
}
