use super::*;

#[test]
fn test_vlq_encode() {
    assert_eq!(vlq::encode(0), "A");
    assert_eq!(vlq::encode(1), "C");
    assert_eq!(vlq::encode(-1), "D");
    assert_eq!(vlq::encode(15), "e");
    assert_eq!(vlq::encode(-15), "f");
    assert_eq!(vlq::encode(16), "gB");
    assert_eq!(vlq::encode(-18), "lB");
}

#[test]
fn test_vlq_decode() {
    assert_eq!(vlq::decode("A"), Some((0, 1)));
    assert_eq!(vlq::decode("gBAAA"), Some((16, 2)));
    assert_eq!(vlq::decode("lB"), Some((-18, 2)));
    for value in [0, 7, -7, 31, -32, 1024, -100_000, i32::from(u16::MAX)] {
        let encoded = vlq::encode(value);
        assert_eq!(vlq::decode(&encoded), Some((value, encoded.len())));
    }
}

#[test]
fn test_vlq_decode_rejects_bad_input() {
    assert_eq!(vlq::decode(""), None);
    // Continuation bit with nothing after it.
    assert_eq!(vlq::decode("g"), None);
    assert_eq!(vlq::decode("!"), None);
}

#[test]
fn test_sources_are_deduplicated() {
    let mut generator = SourceMapGenerator::new(None);
    assert_eq!(generator.add_source("a.js"), 0);
    assert_eq!(generator.add_source("b.js"), 1);
    assert_eq!(generator.add_source("a.js"), 0);
    assert_eq!(generator.generate().sources, vec!["a.js", "b.js"]);
}

#[test]
fn test_mappings_are_delta_encoded() {
    let mut generator = SourceMapGenerator::new(Some("out.js".into()));
    let source = generator.add_source("in.js");
    generator.add_mapping(0, 0, source, 0, 0);
    generator.add_mapping(0, 4, source, 0, 4);
    generator.add_mapping(1, 0, source, 1, 0);
    assert_eq!(generator.mapping_count(), 3);
    assert_eq!(generator.generate().mappings, "AAAA,IAAI;AACJ");
}

#[test]
fn test_empty_lines_are_kept() {
    let mut generator = SourceMapGenerator::new(None);
    generator.add_mapping(2, 0, 0, 0, 0);
    assert_eq!(generator.generate().mappings, ";;AAAA");
}

#[test]
fn test_later_mapping_at_same_position_wins() {
    let mut generator = SourceMapGenerator::new(None);
    generator.add_mapping(0, 0, 0, 0, 0);
    generator.add_mapping(0, 0, 0, 3, 1);
    assert_eq!(generator.mapping_count(), 1);
    assert_eq!(generator.generate().mappings, "AAGC");
}

#[test]
fn test_out_of_order_mappings_are_sorted() {
    let mut generator = SourceMapGenerator::new(None);
    generator.add_mapping(1, 0, 0, 1, 0);
    generator.add_mapping(0, 0, 0, 0, 0);
    assert_eq!(generator.generate().mappings, "AAAA;AACA");
}

#[test]
fn test_json_shape() {
    let mut generator = SourceMapGenerator::new(Some("out.js".into()));
    generator.add_source("in.js");
    generator.add_mapping(0, 0, 0, 0, 0);
    let map = generator.generate();
    assert_eq!(
        map.to_json(),
        r#"{"version":3,"file":"out.js","sources":["in.js"],"names":[],"mappings":"AAAA"}"#
    );
    let parsed: SourceMap = serde_json::from_str(&map.to_json()).expect("valid JSON");
    assert_eq!(parsed, map);

    let anonymous = SourceMapGenerator::new(None).generate();
    assert!(!anonymous.to_json().contains("\"file\""));
}
